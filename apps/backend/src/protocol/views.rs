//! Wire-facing view types shared by the HTTP routes and the WS events.
//!
//! Timestamps go out as RFC 3339 strings. Field names are camelCase to match
//! what the polling clients expect.

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::domain::actions::DealAction;
use crate::repos::deals::{Deal, DealActionRecord};
use crate::repos::lobbies::Lobby;
use crate::repos::memberships::LobbyMembership;
use crate::repos::players::Player;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerView {
    pub id: i64,
    pub name: String,
    /// Advisory: last_active older than the away threshold.
    pub away: bool,
    #[serde(with = "time::serde::rfc3339")]
    pub last_active: OffsetDateTime,
}

impl PlayerView {
    pub fn from_player(player: &Player, now: OffsetDateTime) -> Self {
        Self {
            id: player.id,
            name: player.name.clone(),
            away: player.is_away_at(now),
            last_active: player.last_active,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LobbyView {
    pub id: i64,
    pub name: String,
    pub code: String,
    pub host_id: i64,
    pub is_active: bool,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl From<&Lobby> for LobbyView {
    fn from(lobby: &Lobby) -> Self {
        Self {
            id: lobby.id,
            name: lobby.name.clone(),
            code: lobby.code.clone(),
            host_id: lobby.host_id,
            is_active: lobby.is_active,
            created_at: lobby.created_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LobbyPlayerView {
    pub id: i64,
    pub name: String,
    pub is_host: bool,
    pub away: bool,
    #[serde(with = "time::serde::rfc3339")]
    pub joined_at: OffsetDateTime,
}

impl LobbyPlayerView {
    pub fn new(
        player: &Player,
        membership: &LobbyMembership,
        host_id: i64,
        now: OffsetDateTime,
    ) -> Self {
        Self {
            id: player.id,
            name: player.name.clone(),
            is_host: player.id == host_id,
            away: player.is_away_at(now),
            joined_at: membership.joined_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LobbyDetailView {
    #[serde(flatten)]
    pub lobby: LobbyView,
    pub players: Vec<LobbyPlayerView>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DealActionView {
    pub id: i64,
    pub player_id: i64,
    #[serde(flatten)]
    pub action: DealAction,
}

impl From<&DealActionRecord> for DealActionView {
    fn from(record: &DealActionRecord) -> Self {
        Self {
            id: record.id,
            player_id: record.player_id,
            action: record.action.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DealView {
    pub id: i64,
    pub lobby_id: i64,
    pub proposer_id: i64,
    pub receiver_id: i64,
    pub proposer_name: String,
    pub receiver_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    pub status: crate::entities::deals::DealStatus,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
    pub actions: Vec<DealActionView>,
}

impl DealView {
    pub fn new(
        deal: &Deal,
        actions: &[DealActionRecord],
        proposer_name: String,
        receiver_name: String,
    ) -> Self {
        Self {
            id: deal.id,
            lobby_id: deal.lobby_id,
            proposer_id: deal.proposer_id,
            receiver_id: deal.receiver_id,
            proposer_name,
            receiver_name,
            notes: deal.notes.clone(),
            summary: deal.summary.clone(),
            status: deal.status,
            created_at: deal.created_at,
            updated_at: deal.updated_at,
            actions: actions.iter().map(DealActionView::from).collect(),
        }
    }
}
