//! Contract tests for the token-protected scope: requests without a valid
//! token never reach a handler, and valid tokens surface claims in request
//! extensions. No database required.

use actix_web::{test, web, App, HttpMessage, HttpRequest, HttpResponse};
use backend::middleware::jwt_extract::JwtExtract;
use backend::middleware::request_trace::RequestTrace;
use backend::state::app_state::AppState;
use backend::state::security_config::SecurityConfig;
use backend::{mint_access_token, AppError, Claims};
use std::time::SystemTime;

fn test_security() -> SecurityConfig {
    SecurityConfig::new(b"integration_test_secret_key".to_vec())
}

fn test_state() -> AppState {
    AppState::without_db(test_security())
}

async fn whoami(req: HttpRequest) -> Result<HttpResponse, AppError> {
    let sub = req
        .extensions()
        .get::<Claims>()
        .map(|claims| claims.sub.clone())
        .ok_or_else(AppError::unauthorized)?;
    Ok(HttpResponse::Ok().json(serde_json::json!({ "sub": sub })))
}

/// JwtExtract rejects before a handler runs, so the app service yields
/// `Err(AppError)` rather than a response. Render it the way the server
/// would and hand back status plus problem body.
async fn call_and_render_error<S, B>(app: &S, req: actix_http::Request) -> (u16, serde_json::Value)
where
    S: actix_web::dev::Service<
        actix_http::Request,
        Response = actix_web::dev::ServiceResponse<B>,
        Error = actix_web::Error,
    >,
    B: actix_web::body::MessageBody,
    <B as actix_web::body::MessageBody>::Error: actix_web::ResponseError + 'static,
{
    let err = test::try_call_service(app, req)
        .await
        .expect_err("expected auth rejection");
    let resp = err.as_response_error().error_response();
    let status = resp.status().as_u16();
    let body = actix_web::body::to_bytes(resp.into_body())
        .await
        .expect("body");
    let problem = serde_json::from_slice(&body).expect("problem json");
    (status, problem)
}

macro_rules! protected_app {
    () => {
        test::init_service(
            App::new()
                .wrap(RequestTrace)
                .app_data(web::Data::new(test_state()))
                .service(
                    web::scope("/api")
                        .wrap(JwtExtract)
                        .route("/whoami", web::get().to(whoami)),
                ),
        )
        .await
    };
}

#[actix_web::test]
async fn missing_bearer_is_401() {
    let app = protected_app!();

    let req = test::TestRequest::get().uri("/api/whoami").to_request();
    let (status, problem) = call_and_render_error(&app, req).await;
    assert_eq!(status, 401);
    assert_eq!(problem["code"], "UNAUTHORIZED_MISSING_BEARER");
}

#[actix_web::test]
async fn garbage_token_is_401() {
    let app = protected_app!();

    let req = test::TestRequest::get()
        .uri("/api/whoami")
        .insert_header(("Authorization", "Bearer not-a-jwt"))
        .to_request();
    let (status, problem) = call_and_render_error(&app, req).await;
    assert_eq!(status, 401);
    assert_eq!(problem["code"], "UNAUTHORIZED_INVALID_JWT");
}

#[actix_web::test]
async fn token_signed_with_other_secret_is_401() {
    let app = protected_app!();

    let other = SecurityConfig::new(b"a_completely_different_secret".to_vec());
    let token = mint_access_token("player-1", SystemTime::now(), &other).unwrap();

    let req = test::TestRequest::get()
        .uri("/api/whoami")
        .insert_header(("Authorization", format!("Bearer {token}")))
        .to_request();
    let (status, problem) = call_and_render_error(&app, req).await;
    assert_eq!(status, 401);
    assert_eq!(problem["code"], "UNAUTHORIZED_INVALID_JWT");
}

#[actix_web::test]
async fn valid_bearer_reaches_handler_with_claims() {
    let app = protected_app!();

    let token = mint_access_token("player-1", SystemTime::now(), &test_security()).unwrap();

    let req = test::TestRequest::get()
        .uri("/api/whoami")
        .insert_header(("Authorization", format!("Bearer {token}")))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status().as_u16(), 200);

    let body = test::read_body(resp).await;
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["sub"], "player-1");
}

#[actix_web::test]
async fn token_query_parameter_is_accepted() {
    // Browsers cannot set headers on a WebSocket handshake, so the
    // middleware also accepts ?token= on protected routes.
    let app = protected_app!();

    let token = mint_access_token("player-2", SystemTime::now(), &test_security()).unwrap();

    let req = test::TestRequest::get()
        .uri(&format!("/api/whoami?token={token}"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status().as_u16(), 200);

    let body = test::read_body(resp).await;
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["sub"], "player-2");
}
