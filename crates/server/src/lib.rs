//! HTTP backend.
//!
//! Assembles the authentication routes into a single actix-web server.
//! Every request passes through [`Authentication`] first; routes that need
//! an identity ask for it with the [`bh_auth::Auth`] extractor.
mod config;

pub use config::*;

use actix_cors::Cors;
use actix_web::App;
use actix_web::HttpResponse;
use actix_web::HttpServer;
use actix_web::Responder;
use actix_web::middleware::Logger;
use actix_web::web;
use anyhow::Context as _;
use bh_auth::Account;
use bh_auth::Authentication;
use bh_auth::Crypto;
use bh_auth::Dispatch;
use bh_auth::Gate;
use bh_auth::Journal;
use bh_auth::Secret;
use bh_auth::Store;
use bh_auth::handlers;
use std::sync::Arc;

async fn health(db: web::Data<Store>) -> impl Responder {
    match db
        .ping()
        .await
        .inspect_err(|e| log::error!("health check failed: {}", e))
    {
        Ok(_) => HttpResponse::Ok().body("ok"),
        Err(_) => HttpResponse::ServiceUnavailable().body("database unavailable"),
    }
}

/// Route table. Everything outside `/auth/me` is reachable anonymously.
#[rustfmt::skip]
pub fn routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health))
        .service(
            web::scope("/auth")
                .route("/register",      web::post().to(handlers::register))
                .route("/login",         web::post().to(handlers::login))
                .route("/reset",         web::post().to(handlers::reset))
                .route("/reset/confirm", web::post().to(handlers::confirm))
                .route("/me",            web::get().to(handlers::me)),
        );
}

pub async fn run(config: Config) -> anyhow::Result<()> {
    let secret = Secret::new(config.secret.as_bytes()).context("JWT_SECRET must not be empty")?;
    let crypto = Crypto::new(secret).with_lifetimes(config.session(), config.action());
    let client = bh_database::db(&config.database).await?;
    bh_database::prepare::<Account>(&client).await?;
    let store: Store = client;
    let courier: Dispatch = Arc::new(Journal);
    let gate = Gate::new(store.clone(), crypto.clone());
    let store = web::Data::new(store);
    let crypto = web::Data::new(crypto);
    let courier = web::Data::new(courier);
    log::info!("starting server on {}", config.bind);
    HttpServer::new(move || {
        App::new()
            .wrap(Authentication::new(gate.clone()))
            .wrap(Logger::new("%r %s %Ts"))
            .wrap(
                Cors::default()
                    .allow_any_origin()
                    .allow_any_method()
                    .allow_any_header(),
            )
            .app_data(store.clone())
            .app_data(crypto.clone())
            .app_data(courier.clone())
            .configure(routes)
    })
    .workers(config.workers)
    .bind(&config.bind)?
    .run()
    .await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::StatusCode;
    use actix_web::http::header::AUTHORIZATION;
    use actix_web::test;
    use bh_auth::Credentials;
    use bh_auth::Outbox;
    use bh_auth::TokenResponse;
    use bh_auth::password;
    use bh_core::ID;

    const SECRET: &[u8] = b"server-tests";

    macro_rules! app {
        ($store:expr, $outbox:expr) => {{
            let store: Store = $store;
            let courier: Dispatch = $outbox;
            let crypto = crypto();
            test::init_service(
                App::new()
                    .wrap(Authentication::new(Gate::new(store.clone(), crypto.clone())))
                    .app_data(web::Data::new(store))
                    .app_data(web::Data::new(crypto))
                    .app_data(web::Data::new(courier))
                    .configure(routes),
            )
            .await
        }};
    }

    fn crypto() -> Crypto {
        Crypto::new(Secret::new(SECRET).expect("secret"))
    }

    fn seeded() -> Arc<bh_auth::Memory> {
        let admin = Account::new(
            ID::default(),
            "admin".to_string(),
            "admin@band.example".to_string(),
            password::hash("admin").expect("hash"),
        )
        .with_enabled(true);
        Arc::new(bh_auth::Memory::from_iter([admin]))
    }

    fn me(token: &str) -> test::TestRequest {
        test::TestRequest::get()
            .uri("/auth/me")
            .insert_header((AUTHORIZATION, format!("Bearer {}", token)))
    }

    fn login(username: &str, password: &str) -> test::TestRequest {
        test::TestRequest::post()
            .uri("/auth/login")
            .set_json(serde_json::json!({ "username": username, "password": password }))
    }

    #[actix_web::test]
    async fn login_then_access_protected_route() {
        let app = app!(seeded(), Arc::new(Outbox::default()));
        let body: TokenResponse = test::call_and_read_body_json(&app, login("admin", "admin").to_request()).await;
        assert_eq!(crypto().extract_subject(&body.token).expect("subject"), "admin");
        let res = test::call_service(&app, me(&body.token).to_request()).await;
        assert_eq!(res.status(), StatusCode::OK);
        let json: serde_json::Value = test::read_body_json(res).await;
        assert_eq!(json["username"], "admin");
        assert_eq!(json["authorities"], serde_json::json!(["ROLE_USER"]));
    }

    #[actix_web::test]
    async fn wrong_password_is_unauthorized() {
        let app = app!(seeded(), Arc::new(Outbox::default()));
        let wrong = test::call_service(&app, login("admin", "nimda").to_request()).await;
        let unknown = test::call_service(&app, login("nobody", "admin").to_request()).await;
        assert_eq!(wrong.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(unknown.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(test::read_body(wrong).await, test::read_body(unknown).await);
    }

    #[actix_web::test]
    async fn anonymous_requests_reach_public_routes_only() {
        let app = app!(seeded(), Arc::new(Outbox::default()));
        let health = test::call_service(&app, test::TestRequest::get().uri("/health").to_request()).await;
        assert_eq!(health.status(), StatusCode::OK);
        let res = test::call_service(&app, test::TestRequest::get().uri("/auth/me").to_request()).await;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    }

    #[actix_web::test]
    async fn garbage_token_is_anonymous() {
        let app = app!(seeded(), Arc::new(Outbox::default()));
        let res = test::call_service(&app, me("definitely.not.ajwt").to_request()).await;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
        let health = test::call_service(
            &app,
            test::TestRequest::get()
                .uri("/health")
                .insert_header((AUTHORIZATION, "Bearer garbage"))
                .to_request(),
        )
        .await;
        assert_eq!(health.status(), StatusCode::OK);
    }

    #[actix_web::test]
    async fn expired_token_is_anonymous() {
        let app = app!(seeded(), Arc::new(Outbox::default()));
        let token = crypto().issue("admin", -1).expect("issue");
        let res = test::call_service(&app, me(&token).to_request()).await;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    }

    #[actix_web::test]
    async fn registration_activates_on_first_authenticated_request() {
        let store = seeded();
        let app = app!(store.clone(), Arc::new(Outbox::default()));
        let register = test::TestRequest::post()
            .uri("/auth/register")
            .set_json(serde_json::json!({
                "username": "bassist",
                "email": "bassist@band.example",
                "password": "low-end-theory",
            }))
            .to_request();
        let res = test::call_service(&app, register).await;
        assert_eq!(res.status(), StatusCode::CREATED);
        let json: serde_json::Value = test::read_body_json(res).await;
        assert_eq!(json["enabled"], false);
        let body: TokenResponse =
            test::call_and_read_body_json(&app, login("bassist", "low-end-theory").to_request()).await;
        let res = test::call_service(&app, me(&body.token).to_request()).await;
        assert_eq!(res.status(), StatusCode::OK);
        let account = store.find("bassist").await.expect("find").expect("present");
        assert!(account.enabled());
    }

    #[actix_web::test]
    async fn registration_rejects_bad_input() {
        let app = app!(seeded(), Arc::new(Outbox::default()));
        for (username, email, password, status) in [
            ("ab", "ab@band.example", "long-enough", StatusCode::BAD_REQUEST),
            ("drummer", "drummer@band.example", "short", StatusCode::BAD_REQUEST),
            ("drummer", "no-at-sign", "long-enough", StatusCode::BAD_REQUEST),
            ("admin", "other@band.example", "long-enough", StatusCode::CONFLICT),
        ] {
            let req = test::TestRequest::post()
                .uri("/auth/register")
                .set_json(serde_json::json!({
                    "username": username,
                    "email": email,
                    "password": password,
                }))
                .to_request();
            assert_eq!(test::call_service(&app, req).await.status(), status);
        }
        let long = format!("{}@band.example", "a".repeat(bh_core::EMAIL_MAX));
        let req = test::TestRequest::post()
            .uri("/auth/register")
            .set_json(serde_json::json!({
                "username": "drummer",
                "email": long,
                "password": "long-enough",
            }))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn password_reset_round_trip() {
        let outbox = Arc::new(Outbox::default());
        let app = app!(seeded(), outbox.clone());
        let reset = test::TestRequest::post()
            .uri("/auth/reset")
            .set_json(serde_json::json!({ "username": "admin" }))
            .to_request();
        assert_eq!(test::call_service(&app, reset).await.status(), StatusCode::ACCEPTED);
        let token = outbox.latest("admin").expect("delivered");
        let confirm = test::TestRequest::post()
            .uri("/auth/reset/confirm")
            .set_json(serde_json::json!({ "token": token, "password": "fresh-strings" }))
            .to_request();
        assert_eq!(test::call_service(&app, confirm).await.status(), StatusCode::NO_CONTENT);
        let old = test::call_service(&app, login("admin", "admin").to_request()).await;
        assert_eq!(old.status(), StatusCode::UNAUTHORIZED);
        let new = test::call_service(&app, login("admin", "fresh-strings").to_request()).await;
        assert_eq!(new.status(), StatusCode::OK);
    }

    #[actix_web::test]
    async fn reset_for_unknown_user_looks_the_same() {
        let outbox = Arc::new(Outbox::default());
        let app = app!(seeded(), outbox.clone());
        let reset = test::TestRequest::post()
            .uri("/auth/reset")
            .set_json(serde_json::json!({ "username": "nobody" }))
            .to_request();
        assert_eq!(test::call_service(&app, reset).await.status(), StatusCode::ACCEPTED);
        assert_eq!(outbox.latest("nobody"), None);
    }

    #[actix_web::test]
    async fn reset_confirm_rejects_bad_tokens() {
        let app = app!(seeded(), Arc::new(Outbox::default()));
        let expired = crypto().issue("admin", -1).expect("issue");
        let unknown = crypto().action("ghost").expect("issue");
        for token in ["garbage".to_string(), expired, unknown] {
            let confirm = test::TestRequest::post()
                .uri("/auth/reset/confirm")
                .set_json(serde_json::json!({ "token": token, "password": "fresh-strings" }))
                .to_request();
            assert_eq!(test::call_service(&app, confirm).await.status(), StatusCode::UNAUTHORIZED);
        }
    }

    #[actix_web::test]
    async fn authority_extractors() {
        let admin = Account::new(
            ID::default(),
            "manager".to_string(),
            "manager@band.example".to_string(),
            "unused".to_string(),
        )
        .with_enabled(true)
        .with_role(bh_auth::Role::Admin);
        let user = Account::new(
            ID::default(),
            "fan".to_string(),
            "fan@band.example".to_string(),
            "unused".to_string(),
        )
        .with_enabled(true);
        let store: Store = Arc::new(bh_auth::Memory::from_iter([admin, user]));
        let app = test::init_service(
            App::new()
                .wrap(Authentication::new(Gate::new(store, crypto())))
                .route(
                    "/admin",
                    web::get().to(|_: bh_auth::Admin| async { HttpResponse::Ok().finish() }),
                )
                .route(
                    "/maybe",
                    web::get().to(|auth: bh_auth::MaybeAuth| async move {
                        HttpResponse::Ok().body(
                            auth.principal()
                                .map(|p| p.username().to_string())
                                .unwrap_or_default(),
                        )
                    }),
                ),
        )
        .await;
        let get = |uri: &str, token: Option<String>| {
            let req = test::TestRequest::get().uri(uri);
            let req = match token {
                Some(token) => req.insert_header((AUTHORIZATION, format!("Bearer {}", token))),
                None => req,
            };
            req.to_request()
        };
        let manager = crypto().session("manager").ok();
        let fan = crypto().session("fan").ok();
        let res = test::call_service(&app, get("/admin", manager)).await;
        assert_eq!(res.status(), StatusCode::OK);
        let res = test::call_service(&app, get("/admin", fan.clone())).await;
        assert_eq!(res.status(), StatusCode::FORBIDDEN);
        let res = test::call_service(&app, get("/admin", None)).await;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
        let body = test::call_and_read_body(&app, get("/maybe", fan)).await;
        assert_eq!(body, web::Bytes::from_static(b"fan"));
        let body = test::call_and_read_body(&app, get("/maybe", None)).await;
        assert_eq!(body, web::Bytes::new());
    }
}
