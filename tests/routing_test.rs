//! Routing and gatekeeping tests against the full route table. The backend
//! URL points at a closed port: none of these requests may reach it.

use std::time::Duration;

use actix_session::{Session, SessionMiddleware, storage::CookieSessionStore};
use actix_web::{App, HttpResponse, cookie::Key, http::StatusCode, test, web};

use dormsync::api::ApiClient;
use dormsync::auth::{rate_limit::RateLimiter, session};
use dormsync::config::AppConfig;
use dormsync::models::account::SessionUser;
use dormsync::routes;

macro_rules! app {
    () => {{
        let api = ApiClient::new("http://127.0.0.1:9", Duration::from_secs(1)).unwrap();
        test::init_service(
            App::new()
                .wrap(
                    SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
                        .cookie_secure(false)
                        .build(),
                )
                .app_data(web::Data::new(api))
                .app_data(web::Data::new(AppConfig::default()))
                .app_data(web::Data::new(RateLimiter::default()))
                .route("/test/sign-in", web::get().to(sign_in_as_admin))
                .configure(routes::configure)
                .default_service(web::to(routes::not_found)),
        )
        .await
    }};
}

async fn sign_in_as_admin(s: Session) -> HttpResponse {
    let user: SessionUser = serde_json::from_str(
        r#"{"_id":"u1","name":"Jane","email":"j@d.ph","role":"admin","status":"approved"}"#,
    )
    .unwrap();
    session::sign_in(&s, "tok", &user).unwrap();
    HttpResponse::Ok().finish()
}

fn location<B>(resp: &actix_web::dev::ServiceResponse<B>) -> String {
    resp.headers()
        .get("Location")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string()
}

#[actix_web::test]
async fn test_protected_pages_redirect_to_login() {
    let app = app!();

    for path in ["/dashboard", "/rooms", "/payments", "/attendance/scan", "/logs/export"] {
        let req = test::TestRequest::get().uri(path).to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::SEE_OTHER, "{path}");
        assert_eq!(location(&resp), "/login", "{path}");
    }
}

#[actix_web::test]
async fn test_root_shows_landing_page_to_visitors() {
    let app = app!();

    let req = test::TestRequest::get().uri("/").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body = test::read_body(resp).await;
    let html = String::from_utf8_lossy(&body);
    assert!(html.contains("Get Started"));
    assert!(html.contains("href=\"/login\""));
    assert!(html.contains("id=\"location\""));
}

#[actix_web::test]
async fn test_root_redirects_signed_in_users_to_dashboard() {
    let app = app!();

    let req = test::TestRequest::get().uri("/test/sign-in").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let cookie = resp.response().cookies().next().unwrap().into_owned();

    let req = test::TestRequest::get().uri("/").cookie(cookie).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), "/dashboard");
}

#[actix_web::test]
async fn test_login_page_renders_with_csrf_field() {
    let app = app!();

    let req = test::TestRequest::get().uri("/login").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body = test::read_body(resp).await;
    let html = String::from_utf8_lossy(&body);
    assert!(html.contains("Sign in"));
    assert!(html.contains("name=\"csrf_token\""));
}

#[actix_web::test]
async fn test_login_without_csrf_session_is_forbidden() {
    let app = app!();

    let req = test::TestRequest::post()
        .uri("/login")
        .set_form([("email", "a@b.ph"), ("password", "secret"), ("csrf_token", "forged")])
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
}

#[actix_web::test]
async fn test_not_found_page() {
    let resp = routes::not_found().await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}
