use actix_web::{test, web, App, HttpResponse};
use backend::middleware::request_trace::RequestTrace;
use backend::AppError;

async fn test_error_handler() -> Result<HttpResponse, AppError> {
    Err(AppError::invalid(
        "INVALID_EXAMPLE",
        "Example failure".to_string(),
    ))
}

#[actix_web::test]
async fn test_error_shape() {
    let app = test::init_service(
        App::new()
            .wrap(RequestTrace)
            .route("/_test/error", web::get().to(test_error_handler)),
    )
    .await;

    let req = test::TestRequest::get().uri("/_test/error").to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status().as_u16(), 400);

    // Extract headers before reading body to avoid borrowing issues
    let headers = resp.headers().clone();
    let request_id = headers
        .get("x-request-id")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
        .unwrap_or_default();
    assert!(!request_id.is_empty());

    let content_type = headers.get("content-type").unwrap().to_str().unwrap();
    assert_eq!(content_type, "application/problem+json");

    let body = test::read_body(resp).await;
    let problem_details: serde_json::Value = serde_json::from_slice(&body).unwrap();

    // All RFC 7807 keys plus our extensions are present
    assert!(problem_details.get("type").is_some());
    assert!(problem_details.get("title").is_some());
    assert!(problem_details.get("status").is_some());
    assert!(problem_details.get("detail").is_some());
    assert!(problem_details.get("code").is_some());
    assert!(problem_details.get("trace_id").is_some());

    assert_eq!(problem_details["code"], "INVALID_EXAMPLE");
    assert_eq!(problem_details["detail"], "Example failure");
    assert_eq!(problem_details["status"], 400);
    assert_eq!(problem_details["title"], "Invalid Example");

    // trace_id in the body matches the x-trace-id and x-request-id headers
    let trace_id_in_body = problem_details["trace_id"].as_str().unwrap();
    assert_eq!(trace_id_in_body, request_id);
    let trace_id_header = headers.get("x-trace-id").unwrap().to_str().unwrap();
    assert_eq!(trace_id_in_body, trace_id_header);
}

#[actix_web::test]
async fn test_not_found_shape() {
    async fn handler() -> Result<HttpResponse, AppError> {
        Err(AppError::not_found(
            "DEAL_NOT_FOUND",
            "Deal 42 not found".to_string(),
        ))
    }

    let app = test::init_service(
        App::new()
            .wrap(RequestTrace)
            .route("/_test/missing", web::get().to(handler)),
    )
    .await;

    let req = test::TestRequest::get().uri("/_test/missing").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status().as_u16(), 404);

    let body = test::read_body(resp).await;
    let problem_details: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(problem_details["code"], "DEAL_NOT_FOUND");
    assert_eq!(problem_details["title"], "Deal Not Found");
}
