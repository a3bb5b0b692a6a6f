//! Deal lifecycle routes.

use actix_web::{web, HttpRequest, HttpResponse};
use serde::Deserialize;

use crate::db::txn::with_txn;
use crate::domain::actions::DealAction;
use crate::domain::deal_flow::DealCommand;
use crate::entities::deals::DealStatus;
use crate::error::AppError;
use crate::extractors::current_player::CurrentPlayer;
use crate::services::deals as deals_service;
use crate::services::deals::DealProposal;
use crate::state::app_state::AppState;
use crate::ws::protocol::ServerEvent;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateDealRequest {
    lobby_id: i64,
    receiver_id: i64,
    #[serde(default)]
    proposer_actions: Vec<DealAction>,
    #[serde(default)]
    receiver_actions: Vec<DealAction>,
    notes: Option<String>,
    summary: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListDealsQuery {
    lobby_id: Option<i64>,
    status: Option<String>,
}

/// POST /api/deals
async fn create_deal(
    http_req: HttpRequest,
    current_player: CurrentPlayer,
    app_state: web::Data<AppState>,
    body: web::Json<CreateDealRequest>,
) -> Result<HttpResponse, AppError> {
    let proposer_id = current_player.id;
    let body = body.into_inner();
    let proposal = DealProposal {
        lobby_id: body.lobby_id,
        receiver_id: body.receiver_id,
        proposer_actions: body.proposer_actions,
        receiver_actions: body.receiver_actions,
        notes: body.notes,
        summary: body.summary,
    };

    let deal = with_txn(Some(&http_req), &app_state, |txn| {
        let proposal = proposal.clone();
        Box::pin(async move { Ok(deals_service::create_deal(txn, proposer_id, proposal).await?) })
    })
    .await?;

    app_state.lobbies.broadcast(
        deal.lobby_id,
        ServerEvent::NewDeal {
            lobby_id: deal.lobby_id,
            deal: deal.clone(),
        },
    );

    Ok(HttpResponse::Created().json(deal))
}

/// GET /api/deals?lobbyId=&status=
async fn list_deals(
    http_req: HttpRequest,
    current_player: CurrentPlayer,
    app_state: web::Data<AppState>,
    query: web::Query<ListDealsQuery>,
) -> Result<HttpResponse, AppError> {
    let caller_id = current_player.id;
    let query = query.into_inner();

    let status = query
        .status
        .as_deref()
        .map(str::parse::<DealStatus>)
        .transpose()
        .map_err(|e| AppError::invalid("INVALID_STATUS", e))?;
    let lobby_id = query.lobby_id;

    let deals = with_txn(Some(&http_req), &app_state, |txn| {
        Box::pin(async move {
            Ok(deals_service::list_deals(txn, caller_id, lobby_id, status).await?)
        })
    })
    .await?;

    Ok(HttpResponse::Ok().json(deals))
}

/// GET /api/deals/{deal_id}
async fn get_deal(
    http_req: HttpRequest,
    current_player: CurrentPlayer,
    path: web::Path<i64>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let deal_id = path.into_inner();
    let caller_id = current_player.id;

    let deal = with_txn(Some(&http_req), &app_state, |txn| {
        Box::pin(async move { Ok(deals_service::get_deal(txn, deal_id, caller_id).await?) })
    })
    .await?;

    Ok(HttpResponse::Ok().json(deal))
}

async fn transition(
    http_req: &HttpRequest,
    current_player: CurrentPlayer,
    deal_id: i64,
    app_state: &web::Data<AppState>,
    command: DealCommand,
) -> Result<HttpResponse, AppError> {
    let caller_id = current_player.id;

    let deal = with_txn(Some(http_req), app_state, |txn| {
        Box::pin(async move {
            Ok(deals_service::transition_deal(txn, deal_id, caller_id, command).await?)
        })
    })
    .await?;

    app_state.lobbies.broadcast(
        deal.lobby_id,
        ServerEvent::DealUpdated {
            lobby_id: deal.lobby_id,
            deal: deal.clone(),
        },
    );

    Ok(HttpResponse::Ok().json(deal))
}

/// PUT /api/deals/{deal_id}/accept
async fn accept_deal(
    http_req: HttpRequest,
    current_player: CurrentPlayer,
    path: web::Path<i64>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    transition(&http_req, current_player, path.into_inner(), &app_state, DealCommand::Accept).await
}

/// PUT /api/deals/{deal_id}/reject
async fn reject_deal(
    http_req: HttpRequest,
    current_player: CurrentPlayer,
    path: web::Path<i64>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    transition(&http_req, current_player, path.into_inner(), &app_state, DealCommand::Reject).await
}

/// PUT /api/deals/{deal_id}/cancel
async fn cancel_deal(
    http_req: HttpRequest,
    current_player: CurrentPlayer,
    path: web::Path<i64>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    transition(&http_req, current_player, path.into_inner(), &app_state, DealCommand::Cancel).await
}

/// PUT /api/deals/{deal_id}/complete
async fn complete_deal(
    http_req: HttpRequest,
    current_player: CurrentPlayer,
    path: web::Path<i64>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    transition(&http_req, current_player, path.into_inner(), &app_state, DealCommand::Complete)
        .await
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/deals")
            .route(web::post().to(create_deal))
            .route(web::get().to(list_deals)),
    );
    cfg.service(web::resource("/deals/{deal_id}").route(web::get().to(get_deal)));
    cfg.service(web::resource("/deals/{deal_id}/accept").route(web::put().to(accept_deal)));
    cfg.service(web::resource("/deals/{deal_id}/reject").route(web::put().to(reject_deal)));
    cfg.service(web::resource("/deals/{deal_id}/cancel").route(web::put().to(cancel_deal)));
    cfg.service(web::resource("/deals/{deal_id}/complete").route(web::put().to(complete_deal)));
}
