//! DTOs for the deals adapter.

use crate::entities::deal_actions::DealActionKind;
use crate::entities::deals::DealStatus;

#[derive(Debug, Clone)]
pub struct DealCreate {
    pub lobby_id: i64,
    pub proposer_id: i64,
    pub receiver_id: i64,
    pub notes: Option<String>,
    pub summary: Option<String>,
    pub actions: Vec<DealActionCreate>,
}

/// One action row to insert alongside the deal. The payload is the already
/// serialized tagged JSON form of `domain::actions::DealAction`.
#[derive(Debug, Clone)]
pub struct DealActionCreate {
    pub player_id: i64,
    pub kind: DealActionKind,
    pub payload: serde_json::Value,
}

#[derive(Debug, Clone)]
pub struct DealListFilter {
    /// Deals where this player is proposer or receiver.
    pub participant_id: i64,
    pub lobby_id: Option<i64>,
    pub status: Option<DealStatus>,
}
