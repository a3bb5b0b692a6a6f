//! Player self-service routes.

use actix_web::{web, HttpRequest, HttpResponse};
use serde::Serialize;
use time::OffsetDateTime;

use crate::db::txn::with_txn;
use crate::error::AppError;
use crate::extractors::current_player::CurrentPlayer;
use crate::protocol::views::{LobbyView, PlayerView};
use crate::repos::players;
use crate::services::lobbies as lobbies_service;
use crate::state::app_state::AppState;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct MeResponse {
    player: PlayerView,
    lobbies: Vec<LobbyView>,
}

/// GET /api/players/me — the caller plus the active lobbies they are in.
async fn me(
    http_req: HttpRequest,
    current_player: CurrentPlayer,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let player_id = current_player.id;
    let (player, lobbies) = with_txn(Some(&http_req), &app_state, |txn| {
        Box::pin(async move {
            let player = players::require_player(txn, player_id).await?;
            let lobbies = lobbies_service::list_lobbies_for_player(txn, player_id).await?;
            Ok((player, lobbies))
        })
    })
    .await?;

    let now = OffsetDateTime::now_utc();
    Ok(HttpResponse::Ok().json(MeResponse {
        player: PlayerView::from_player(&player, now),
        lobbies,
    }))
}

/// POST /api/heartbeat
///
/// No-op endpoint: resolving `CurrentPlayer` already refreshed last_active.
async fn heartbeat(current_player: CurrentPlayer) -> Result<HttpResponse, AppError> {
    Ok(HttpResponse::Ok().json(serde_json::json!({ "playerId": current_player.id })))
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/players/me").route(web::get().to(me)));
    cfg.service(web::resource("/heartbeat").route(web::post().to(heartbeat)));
}
