use super::*;
use actix_web::Error;
use actix_web::FromRequest;
use actix_web::HttpMessage;
use actix_web::HttpRequest;
use actix_web::dev::Payload;
use actix_web::dev::Service;
use actix_web::dev::ServiceRequest;
use actix_web::dev::ServiceResponse;
use actix_web::dev::Transform;
use actix_web::dev::forward_ready;
use actix_web::http::header::AUTHORIZATION;
use futures::future::LocalBoxFuture;
use std::future::Ready;
use std::future::ready;
use std::rc::Rc;

/// Middleware running the [`Gate`] once per request and storing the
/// resulting [`Context`] in the request extensions.
pub struct Authentication {
    gate: Gate,
}

impl Authentication {
    pub fn new(gate: Gate) -> Self {
        Self { gate }
    }
}

impl<S, B> Transform<S, ServiceRequest> for Authentication
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Transform = AuthenticationService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;
    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AuthenticationService {
            service: Rc::new(service),
            gate: self.gate.clone(),
        }))
    }
}

pub struct AuthenticationService<S> {
    service: Rc<S>,
    gate: Gate,
}

impl<S, B> Service<ServiceRequest> for AuthenticationService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = self.service.clone();
        let gate = self.gate.clone();
        Box::pin(async move {
            let header = req
                .headers()
                .get(AUTHORIZATION)
                .and_then(|h| h.to_str().ok())
                .map(str::to_owned);
            let origin = req
                .connection_info()
                .realip_remote_addr()
                .map(str::to_owned);
            let mut context = req
                .extensions_mut()
                .remove::<Context>()
                .unwrap_or_default();
            gate.authenticate(header.as_deref(), &mut context, origin.as_deref())
                .await;
            req.extensions_mut().insert(context);
            service.call(req).await
        })
    }
}

fn principal(req: &HttpRequest) -> Option<Principal> {
    req.extensions()
        .get::<Context>()
        .and_then(Context::principal)
        .cloned()
}

/// Extractor for routes that require an authenticated principal.
pub struct Auth(pub Principal);

impl Auth {
    pub fn principal(&self) -> &Principal {
        &self.0
    }
}

impl FromRequest for Auth {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;
    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        ready(
            principal(req)
                .map(Auth)
                .ok_or_else(|| actix_web::error::ErrorUnauthorized("authentication required")),
        )
    }
}

/// Extractor for routes that require the admin authority.
pub struct Admin(pub Principal);

impl FromRequest for Admin {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;
    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        ready(match principal(req) {
            None => Err(actix_web::error::ErrorUnauthorized("authentication required")),
            Some(p) if p.has(Authority::Admin) => Ok(Admin(p)),
            Some(_) => Err(actix_web::error::ErrorForbidden("insufficient authority")),
        })
    }
}

/// Optional authentication extractor - never fails.
pub struct MaybeAuth(pub Option<Principal>);

impl MaybeAuth {
    pub fn principal(&self) -> Option<&Principal> {
        self.0.as_ref()
    }
}

impl FromRequest for MaybeAuth {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;
    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        ready(Ok(MaybeAuth(principal(req))))
    }
}
