//! JWT extraction middleware.
//!
//! Extracts claims from the Authorization header (or a `token` query
//! parameter, the fallback browsers need for WebSocket upgrades) and stores
//! them in request extensions. Runs only on protected scopes; requests
//! without valid claims are rejected with 401 before reaching a handler.

use std::collections::HashMap;

use actix_web::dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::http::header;
use actix_web::{web, Error, HttpMessage};
use futures_util::future::{ready, LocalBoxFuture, Ready};

use crate::auth::jwt;
use crate::error::AppError;
use crate::state::app_state::AppState;

pub struct JwtExtract;

impl<S, B> Transform<S, ServiceRequest> for JwtExtract
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = JwtExtractMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(JwtExtractMiddleware { service }))
    }
}

pub struct JwtExtractMiddleware<S> {
    service: S,
}

impl<S, B> Service<ServiceRequest> for JwtExtractMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let auth_header = req.headers().get(header::AUTHORIZATION).cloned();
        let app_state = req.app_data::<web::Data<AppState>>().cloned();

        let token = match extract_bearer_from_header(auth_header.as_ref()) {
            Ok(Some(token)) => token,
            Ok(None) => match extract_token_from_query(req.uri().query()) {
                Some(token) => token,
                None => {
                    return Box::pin(async {
                        Err(AppError::unauthorized_missing_bearer().into())
                    })
                }
            },
            Err(err) => return Box::pin(async { Err(err) }),
        };

        let app_state = match app_state {
            Some(state) => state,
            None => {
                return Box::pin(async {
                    Err(AppError::internal("AppState not available".to_string()).into())
                });
            }
        };

        match jwt::verify_access_token(&token, &app_state.security) {
            Ok(claims) => {
                // Store claims in extensions BEFORE calling the service
                req.extensions_mut().insert(claims);
                Box::pin(self.service.call(req))
            }
            Err(e) => Box::pin(async move { Err(e.into()) }),
        }
    }
}

fn extract_bearer_from_header(
    header_value: Option<&actix_web::http::header::HeaderValue>,
) -> Result<Option<String>, Error> {
    let auth_value = match header_value {
        Some(value) => value,
        None => return Ok(None),
    };

    let auth_str = auth_value
        .to_str()
        .map_err(|_| Error::from(AppError::unauthorized_missing_bearer()))?;

    let parts: Vec<&str> = auth_str.split_whitespace().collect();
    match parts.as_slice() {
        ["Bearer", token] if !token.is_empty() => Ok(Some(token.to_string())),
        _ => Err(AppError::unauthorized_missing_bearer().into()),
    }
}

fn extract_token_from_query(query: Option<&str>) -> Option<String> {
    let query_str = query?;
    let params = web::Query::<HashMap<String, String>>::from_query(query_str).ok()?;
    params
        .get("token")
        .cloned()
        .filter(|value| !value.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bearer_header_parses() {
        let value = actix_web::http::header::HeaderValue::from_static("Bearer abc.def.ghi");
        let token = extract_bearer_from_header(Some(&value)).unwrap();
        assert_eq!(token.as_deref(), Some("abc.def.ghi"));
    }

    #[test]
    fn missing_header_is_ok_none() {
        assert!(extract_bearer_from_header(None).unwrap().is_none());
    }

    #[test]
    fn malformed_scheme_is_rejected() {
        let value = actix_web::http::header::HeaderValue::from_static("Basic abc");
        assert!(extract_bearer_from_header(Some(&value)).is_err());
    }

    #[test]
    fn query_token_fallback() {
        assert_eq!(
            extract_token_from_query(Some("token=abc&lobby=1")).as_deref(),
            Some("abc")
        );
        assert!(extract_token_from_query(Some("token=")).is_none());
        assert!(extract_token_from_query(None).is_none());
    }
}
