//! Deal repository functions for the domain layer.

use sea_orm::{ConnectionTrait, DatabaseTransaction};

use crate::adapters::deals_sea as deals_adapter;
use crate::domain::actions::DealAction;
use crate::domain::deal_flow::Participants;
use crate::entities::deals::{self, DealStatus};
use crate::entities::deal_actions;
use crate::errors::domain::{DomainError, NotFoundKind, ValidationKind};

pub use deals_adapter::DealListFilter;

/// Deal domain model, converted from `deals::Model` when loaded.
#[derive(Debug, Clone, PartialEq)]
pub struct Deal {
    pub id: i64,
    pub lobby_id: i64,
    pub proposer_id: i64,
    pub receiver_id: i64,
    pub notes: Option<String>,
    pub summary: Option<String>,
    pub status: DealStatus,
    pub created_at: time::OffsetDateTime,
    pub updated_at: time::OffsetDateTime,
}

impl Deal {
    pub fn participants(&self) -> Participants {
        Participants {
            proposer_id: self.proposer_id,
            receiver_id: self.receiver_id,
        }
    }
}

impl From<deals::Model> for Deal {
    fn from(m: deals::Model) -> Self {
        Self {
            id: m.id,
            lobby_id: m.lobby_id,
            proposer_id: m.proposer_id,
            receiver_id: m.receiver_id,
            notes: m.notes,
            summary: m.summary,
            status: m.status,
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }
}

/// One persisted action row with its decoded payload.
#[derive(Debug, Clone, PartialEq)]
pub struct DealActionRecord {
    pub id: i64,
    pub deal_id: i64,
    pub player_id: i64,
    pub action: DealAction,
}

impl TryFrom<deal_actions::Model> for DealActionRecord {
    type Error = DomainError;

    fn try_from(m: deal_actions::Model) -> Result<Self, DomainError> {
        let action: DealAction = serde_json::from_value(m.payload).map_err(|e| {
            DomainError::validation(
                ValidationKind::InvalidAction,
                format!("Stored action {} has an unreadable payload: {e}", m.id),
            )
        })?;
        Ok(Self {
            id: m.id,
            deal_id: m.deal_id,
            player_id: m.player_id,
            action,
        })
    }
}

pub async fn find_by_id<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    deal_id: i64,
) -> Result<Option<Deal>, DomainError> {
    let deal = deals_adapter::find_by_id(conn, deal_id).await?;
    Ok(deal.map(Deal::from))
}

pub async fn require_deal<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    deal_id: i64,
) -> Result<Deal, DomainError> {
    find_by_id(conn, deal_id).await?.ok_or_else(|| {
        DomainError::not_found(NotFoundKind::Deal, format!("Deal {deal_id} not found"))
    })
}

pub async fn find_actions<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    deal_id: i64,
) -> Result<Vec<DealActionRecord>, DomainError> {
    let rows = deals_adapter::find_actions(conn, deal_id).await?;
    rows.into_iter().map(DealActionRecord::try_from).collect()
}

/// Persist a deal and both sides' actions atomically.
pub async fn create_deal(
    txn: &DatabaseTransaction,
    lobby_id: i64,
    participants: Participants,
    proposer_actions: &[DealAction],
    receiver_actions: &[DealAction],
    notes: Option<String>,
    summary: Option<String>,
) -> Result<(Deal, Vec<DealActionRecord>), DomainError> {
    let mut action_dtos = Vec::with_capacity(proposer_actions.len() + receiver_actions.len());
    for (player_id, actions) in [
        (participants.proposer_id, proposer_actions),
        (participants.receiver_id, receiver_actions),
    ] {
        for action in actions {
            let payload = serde_json::to_value(action).map_err(|e| {
                DomainError::validation(
                    ValidationKind::InvalidAction,
                    format!("Action could not be encoded: {e}"),
                )
            })?;
            action_dtos.push(deals_adapter::DealActionCreate {
                player_id,
                kind: action.kind(),
                payload,
            });
        }
    }

    let dto = deals_adapter::DealCreate {
        lobby_id,
        proposer_id: participants.proposer_id,
        receiver_id: participants.receiver_id,
        notes,
        summary,
        actions: action_dtos,
    };
    let (deal, actions) = deals_adapter::create_deal_with_actions(txn, dto).await?;

    let records = actions
        .into_iter()
        .map(DealActionRecord::try_from)
        .collect::<Result<Vec<_>, _>>()?;
    Ok((Deal::from(deal), records))
}

pub async fn list_deals<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    filter: DealListFilter,
) -> Result<Vec<Deal>, DomainError> {
    let deals = deals_adapter::list_deals(conn, filter).await?;
    Ok(deals.into_iter().map(Deal::from).collect())
}

/// Conditional transition; loses cleanly (Conflict) when a concurrent
/// request moved the deal first.
pub async fn transition_status<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    deal_id: i64,
    expected: DealStatus,
    target: DealStatus,
) -> Result<Deal, DomainError> {
    let deal = deals_adapter::transition_status(conn, deal_id, expected, target).await?;
    Ok(Deal::from(deal))
}

pub async fn cancel_pending_for_lobby(
    txn: &DatabaseTransaction,
    lobby_id: i64,
) -> Result<u64, DomainError> {
    Ok(deals_adapter::cancel_pending_for_lobby(txn, lobby_id).await?)
}
