use sea_orm::{ConnectionTrait, DatabaseTransaction};
use tracing::info;

use crate::domain::actions::{self, DealAction};
use crate::domain::deal_flow::{self, DealCommand, Participants};
use crate::entities::deals::DealStatus;
use crate::errors::domain::{DomainError, ForbiddenKind, ValidationKind};
use crate::protocol::views::DealView;
use crate::repos::{deals, lobbies, memberships, players};

/// Everything the create endpoint needs, already deserialized.
#[derive(Debug, Clone)]
pub struct DealProposal {
    pub lobby_id: i64,
    pub receiver_id: i64,
    pub proposer_actions: Vec<DealAction>,
    pub receiver_actions: Vec<DealAction>,
    pub notes: Option<String>,
    pub summary: Option<String>,
}

async fn resolve_view<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    deal: &deals::Deal,
) -> Result<DealView, DomainError> {
    let actions = deals::find_actions(conn, deal.id).await?;
    let proposer = players::require_player(conn, deal.proposer_id).await?;
    let receiver = players::require_player(conn, deal.receiver_id).await?;
    Ok(DealView::new(deal, &actions, proposer.name, receiver.name))
}

/// Propose a deal. Validation happens before any row is written, and the
/// deal plus all action rows land in one transaction.
pub async fn create_deal(
    txn: &DatabaseTransaction,
    proposer_id: i64,
    proposal: DealProposal,
) -> Result<DealView, DomainError> {
    if proposer_id == proposal.receiver_id {
        return Err(DomainError::validation(
            ValidationKind::SameParticipant,
            "a deal needs two distinct participants",
        ));
    }
    actions::validate_actions(&proposal.proposer_actions, &proposal.receiver_actions)?;

    let lobby = lobbies::require_active_lobby(txn, proposal.lobby_id).await?;
    memberships::require_active_member(txn, lobby.id, proposer_id).await?;
    memberships::require_active_member(txn, lobby.id, proposal.receiver_id).await?;

    let participants = Participants {
        proposer_id,
        receiver_id: proposal.receiver_id,
    };
    let summary = proposal.summary.or_else(|| {
        let all: Vec<DealAction> = proposal
            .proposer_actions
            .iter()
            .chain(&proposal.receiver_actions)
            .cloned()
            .collect();
        Some(actions::summarize(&all))
    });

    let (deal, _) = deals::create_deal(
        txn,
        lobby.id,
        participants,
        &proposal.proposer_actions,
        &proposal.receiver_actions,
        proposal.notes,
        summary,
    )
    .await?;

    info!(deal_id = deal.id, lobby_id = lobby.id, proposer_id, "Deal proposed");
    resolve_view(txn, &deal).await
}

/// Fetch a single deal; participants only.
pub async fn get_deal<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    deal_id: i64,
    caller_id: i64,
) -> Result<DealView, DomainError> {
    let deal = deals::require_deal(conn, deal_id).await?;
    if caller_id != deal.proposer_id && caller_id != deal.receiver_id {
        return Err(DomainError::forbidden(
            ForbiddenKind::NotParticipant,
            "only a deal participant may view it",
        ));
    }
    resolve_view(conn, &deal).await
}

/// All deals where the caller is a participant, newest first, optionally
/// narrowed by lobby and status.
pub async fn list_deals<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    caller_id: i64,
    lobby_id: Option<i64>,
    status: Option<DealStatus>,
) -> Result<Vec<DealView>, DomainError> {
    let found = deals::list_deals(
        conn,
        deals::DealListFilter {
            participant_id: caller_id,
            lobby_id,
            status,
        },
    )
    .await?;

    let mut views = Vec::with_capacity(found.len());
    for deal in &found {
        views.push(resolve_view(conn, deal).await?);
    }
    Ok(views)
}

/// Run one lifecycle command. The pure checks gate authorization and status
/// first; the conditional update then settles any race that slipped between
/// read and write.
pub async fn transition_deal<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    deal_id: i64,
    caller_id: i64,
    command: DealCommand,
) -> Result<DealView, DomainError> {
    let deal = deals::require_deal(conn, deal_id).await?;

    let target =
        deal_flow::authorize_transition(command, deal.participants(), caller_id, deal.status)?;

    let updated =
        deals::transition_status(conn, deal_id, command.required_status(), target).await?;

    info!(
        deal_id,
        caller_id,
        from = deal.status.as_str(),
        to = updated.status.as_str(),
        "Deal transitioned"
    );
    resolve_view(conn, &updated).await
}
