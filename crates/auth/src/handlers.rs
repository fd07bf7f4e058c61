use super::*;
use actix_web::HttpResponse;
use actix_web::Responder;
use actix_web::web;
use bh_core::ID;

fn internal(e: impl std::fmt::Display) -> HttpResponse {
    log::error!("{}", e);
    HttpResponse::InternalServerError().body("internal error")
}

fn valid_password(password: &str) -> bool {
    password.chars().count() >= bh_core::PASSWORD_MIN
}

pub async fn register(db: web::Data<Store>, req: web::Json<RegisterRequest>) -> impl Responder {
    let length = req.username.chars().count();
    if length < bh_core::USERNAME_MIN || length > bh_core::USERNAME_MAX {
        return HttpResponse::BadRequest().body("username must be 3-32 characters");
    }
    if !valid_password(&req.password) {
        return HttpResponse::BadRequest().body("password must be at least 8 characters");
    }
    if !req.email.contains('@') {
        return HttpResponse::BadRequest().body("email must be an address");
    }
    if req.email.chars().count() > bh_core::EMAIL_MAX {
        return HttpResponse::BadRequest().body("email must be at most 255 characters");
    }
    let hashword = match password::hash(&req.password) {
        Ok(h) => h,
        Err(e) => return internal(e),
    };
    let account = Account::new(
        ID::default(),
        req.username.clone(),
        req.email.clone(),
        hashword,
    );
    match db.create(&account).await {
        Ok(()) => {}
        Err(StoreError::Conflict) => {
            return HttpResponse::Conflict().body("username or email already exists");
        }
        Err(e) => return internal(e),
    }
    log::info!("registered {}", account.username());
    HttpResponse::Created().json(UserInfo::from(&account))
}

pub async fn login(
    db: web::Data<Store>,
    crypto: web::Data<Crypto>,
    req: web::Json<LoginRequest>,
) -> impl Responder {
    match crate::login(db.get_ref().as_ref(), &crypto, &req.username, &req.password).await {
        Ok(token) => HttpResponse::Ok().json(TokenResponse { token }),
        Err(AuthError::InvalidCredentials) => {
            HttpResponse::Unauthorized().body("invalid credentials")
        }
        Err(e) => internal(e),
    }
}

/// Always accepted, whether or not the username exists.
pub async fn reset(
    db: web::Data<Store>,
    crypto: web::Data<Crypto>,
    courier: web::Data<Dispatch>,
    req: web::Json<ResetRequest>,
) -> impl Responder {
    match db.find(&req.username).await {
        Ok(Some(account)) => match crypto.action(account.username()) {
            Ok(token) => courier.deliver(account.username(), &token).await,
            Err(e) => return internal(e),
        },
        Ok(None) => log::debug!("reset requested for unknown account"),
        Err(e) => return internal(e),
    }
    HttpResponse::Accepted().finish()
}

pub async fn confirm(
    db: web::Data<Store>,
    crypto: web::Data<Crypto>,
    req: web::Json<ConfirmRequest>,
) -> impl Responder {
    if !valid_password(&req.password) {
        return HttpResponse::BadRequest().body("password must be at least 8 characters");
    }
    let claims = match crypto.verify(&req.token) {
        Ok(claims) => claims,
        Err(_) => return HttpResponse::Unauthorized().body("invalid token"),
    };
    let account = match db.find(claims.subject()).await {
        Ok(Some(account)) => account,
        Ok(None) => return HttpResponse::Unauthorized().body("invalid token"),
        Err(e) => return internal(e),
    };
    let hashword = match password::hash(&req.password) {
        Ok(h) => h,
        Err(e) => return internal(e),
    };
    match db.save(&account.with_hashword(hashword)).await {
        Ok(account) => {
            log::info!("password reset for {}", account.username());
            HttpResponse::NoContent().finish()
        }
        Err(e) => internal(e),
    }
}

pub async fn me(auth: Auth) -> impl Responder {
    HttpResponse::Ok().json(PrincipalInfo::from(auth.principal()))
}
