use std::env;

use actix_cors::Cors;
use actix_web::http::header;

/// Origins allowed when CORS_ALLOWED_ORIGINS is unset or holds nothing usable.
const DEV_ORIGINS: [&str; 2] = ["http://localhost:3000", "http://127.0.0.1:3000"];

fn configured_origins() -> Vec<String> {
    // Comma-separated origins, e.g.:
    // CORS_ALLOWED_ORIGINS=http://localhost:3000,https://board.example.com
    let raw = env::var("CORS_ALLOWED_ORIGINS").unwrap_or_default();

    raw.split(',')
        .map(str::trim)
        .filter(|s| s.starts_with("http://") || s.starts_with("https://"))
        .map(str::to_string)
        .collect()
}

/// Build CORS middleware. Origins come from CORS_ALLOWED_ORIGINS (string-level
/// validation only); entries that are empty, "null", or not http(s) are ignored.
pub fn cors_middleware() -> Cors {
    let mut origins = configured_origins();
    if origins.is_empty() {
        origins = DEV_ORIGINS.iter().map(|s| s.to_string()).collect();
    }

    let mut cors = Cors::default()
        .allowed_methods(vec!["GET", "POST", "PUT", "DELETE", "OPTIONS"])
        .allowed_headers(vec![
            header::AUTHORIZATION,
            header::CONTENT_TYPE,
            header::ACCEPT,
        ])
        .expose_headers(vec![
            header::HeaderName::from_static("x-trace-id"),
            header::HeaderName::from_static("x-request-id"),
        ])
        .max_age(3600);

    for origin in &origins {
        cors = cors.allowed_origin(origin);
    }

    cors
}
