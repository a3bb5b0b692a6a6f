//! Lobby lifecycle routes.

use actix_web::{web, HttpRequest, HttpResponse};
use serde::Deserialize;

use crate::db::txn::with_txn;
use crate::error::AppError;
use crate::extractors::current_player::CurrentPlayer;
use crate::services::lobbies as lobbies_service;
use crate::services::lobbies::LobbyRef;
use crate::state::app_state::AppState;
use crate::ws::protocol::ServerEvent;

#[derive(Debug, Deserialize)]
struct CreateLobbyRequest {
    name: String,
}

/// Body of the join endpoint: either a code from another player's screen or
/// a raw lobby id (rejoins from the client's own lobby list).
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct JoinLobbyRequest {
    code: Option<String>,
    lobby_id: Option<i64>,
}

/// POST /api/lobbies
async fn create_lobby(
    http_req: HttpRequest,
    current_player: CurrentPlayer,
    app_state: web::Data<AppState>,
    body: web::Json<CreateLobbyRequest>,
) -> Result<HttpResponse, AppError> {
    let host_id = current_player.id;
    let name = body.into_inner().name;

    let lobby = with_txn(Some(&http_req), &app_state, |txn| {
        let name = name.clone();
        Box::pin(async move { Ok(lobbies_service::create_lobby(txn, &name, host_id).await?) })
    })
    .await?;

    Ok(HttpResponse::Created().json(lobby))
}

/// GET /api/lobbies — active lobbies the caller belongs to.
async fn list_lobbies(
    http_req: HttpRequest,
    current_player: CurrentPlayer,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let player_id = current_player.id;
    let lobbies = with_txn(Some(&http_req), &app_state, |txn| {
        Box::pin(async move {
            Ok(lobbies_service::list_lobbies_for_player(txn, player_id).await?)
        })
    })
    .await?;

    Ok(HttpResponse::Ok().json(lobbies))
}

/// GET /api/lobbies/{lobby_id}
async fn get_lobby(
    http_req: HttpRequest,
    _current_player: CurrentPlayer,
    path: web::Path<i64>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let lobby_id = path.into_inner();
    let detail = with_txn(Some(&http_req), &app_state, |txn| {
        Box::pin(async move { Ok(lobbies_service::get_lobby(txn, lobby_id).await?) })
    })
    .await?;

    Ok(HttpResponse::Ok().json(detail))
}

/// GET /api/lobbies/code/{code} — preview a lobby before joining.
async fn get_lobby_by_code(
    http_req: HttpRequest,
    _current_player: CurrentPlayer,
    path: web::Path<String>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let code = path.into_inner().trim().to_uppercase();
    let detail = with_txn(Some(&http_req), &app_state, |txn| {
        let code = code.clone();
        Box::pin(async move { Ok(lobbies_service::get_lobby_by_code(txn, &code).await?) })
    })
    .await?;

    Ok(HttpResponse::Ok().json(detail))
}

/// POST /api/lobbies/join
async fn join_lobby(
    http_req: HttpRequest,
    current_player: CurrentPlayer,
    app_state: web::Data<AppState>,
    body: web::Json<JoinLobbyRequest>,
) -> Result<HttpResponse, AppError> {
    let player_id = current_player.id;
    let body = body.into_inner();
    let lobby_ref = match (body.code, body.lobby_id) {
        (Some(code), _) => LobbyRef::Code(code.trim().to_uppercase()),
        (None, Some(id)) => LobbyRef::Id(id),
        (None, None) => {
            return Err(AppError::invalid(
                "MISSING_FIELD",
                "either code or lobbyId is required".to_string(),
            ))
        }
    };

    let (detail, entry) = with_txn(Some(&http_req), &app_state, |txn| {
        let lobby_ref = lobby_ref.clone();
        Box::pin(async move { Ok(lobbies_service::join_lobby(txn, lobby_ref, player_id).await?) })
    })
    .await?;

    // Notify after commit; delivery failures are not the joiner's problem.
    let lobby_id = detail.lobby.id;
    app_state.lobbies.broadcast(
        lobby_id,
        ServerEvent::PlayerJoined {
            lobby_id,
            player: entry,
        },
    );

    Ok(HttpResponse::Ok().json(detail))
}

/// POST /api/lobbies/{lobby_id}/leave
async fn leave_lobby(
    http_req: HttpRequest,
    current_player: CurrentPlayer,
    path: web::Path<i64>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let lobby_id = path.into_inner();
    let player_id = current_player.id;

    with_txn(Some(&http_req), &app_state, |txn| {
        Box::pin(async move { Ok(lobbies_service::leave_lobby(txn, lobby_id, player_id).await?) })
    })
    .await?;

    Ok(HttpResponse::NoContent().finish())
}

/// DELETE /api/lobbies/{lobby_id} — dissolve (host only).
async fn dissolve_lobby(
    http_req: HttpRequest,
    current_player: CurrentPlayer,
    path: web::Path<i64>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let lobby_id = path.into_inner();
    let player_id = current_player.id;

    with_txn(Some(&http_req), &app_state, |txn| {
        Box::pin(
            async move { Ok(lobbies_service::dissolve_lobby(txn, lobby_id, player_id).await?) },
        )
    })
    .await?;

    app_state
        .lobbies
        .broadcast(lobby_id, ServerEvent::LobbyDissolved { lobby_id });

    Ok(HttpResponse::NoContent().finish())
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/lobbies")
            .route(web::post().to(create_lobby))
            .route(web::get().to(list_lobbies)),
    );
    cfg.service(web::resource("/lobbies/join").route(web::post().to(join_lobby)));
    cfg.service(web::resource("/lobbies/code/{code}").route(web::get().to(get_lobby_by_code)));
    cfg.service(
        web::resource("/lobbies/{lobby_id}")
            .route(web::get().to(get_lobby))
            .route(web::delete().to(dissolve_lobby)),
    );
    cfg.service(web::resource("/lobbies/{lobby_id}/leave").route(web::post().to(leave_lobby)));
}
