//! Registration and token minting.

use std::time::SystemTime;

use actix_web::http::header;
use actix_web::{web, HttpRequest, HttpResponse};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::auth::jwt;
use crate::db::txn::with_txn;
use crate::error::AppError;
use crate::protocol::views::PlayerView;
use crate::services::players as players_service;
use crate::state::app_state::AppState;

#[derive(Debug, Deserialize)]
struct RegisterRequest {
    name: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct RegisterResponse {
    token: String,
    player: PlayerView,
    is_new_player: bool,
}

/// Best-effort: a returning client sends its old token so registration
/// refreshes the same player instead of minting a new identity. A missing
/// or stale token is not an error here.
fn existing_sub(req: &HttpRequest, state: &AppState) -> Option<String> {
    let header_value = req.headers().get(header::AUTHORIZATION)?;
    let auth_str = header_value.to_str().ok()?;
    let token = auth_str.strip_prefix("Bearer ")?.trim();
    if token.is_empty() {
        return None;
    }
    jwt::verify_access_token(token, &state.security)
        .ok()
        .map(|claims| claims.sub)
}

/// POST /api/auth/register
///
/// Creates a player (or refreshes the name of a returning one) and returns
/// a fresh token.
async fn register(
    http_req: HttpRequest,
    app_state: web::Data<AppState>,
    body: web::Json<RegisterRequest>,
) -> Result<HttpResponse, AppError> {
    let sub = existing_sub(&http_req, &app_state);
    let name = body.into_inner().name;

    let (player, is_new_player) = with_txn(Some(&http_req), &app_state, |txn| {
        let name = name.clone();
        let sub = sub.clone();
        Box::pin(async move { Ok(players_service::register(txn, sub.as_deref(), &name).await?) })
    })
    .await?;

    let token = jwt::mint_access_token(&player.sub, SystemTime::now(), &app_state.security)?;
    let now = OffsetDateTime::now_utc();

    Ok(HttpResponse::Created().json(RegisterResponse {
        token,
        player: PlayerView::from_player(&player, now),
        is_new_player,
    }))
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/register").route(web::post().to(register)));
}
