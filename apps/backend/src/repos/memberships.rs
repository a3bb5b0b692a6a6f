//! Lobby membership repository functions for the domain layer.

use sea_orm::{ConnectionTrait, DatabaseTransaction};

use crate::adapters::memberships_sea as memberships_adapter;
use crate::adapters::memberships_sea::MembershipKey;
use crate::entities::lobby_players;
use crate::errors::domain::{DomainError, ForbiddenKind};

/// Lobby membership domain model
#[derive(Debug, Clone, PartialEq)]
pub struct LobbyMembership {
    pub id: i64,
    pub lobby_id: i64,
    pub player_id: i64,
    pub joined_at: time::OffsetDateTime,
    pub is_active: bool,
}

impl From<lobby_players::Model> for LobbyMembership {
    fn from(m: lobby_players::Model) -> Self {
        Self {
            id: m.id,
            lobby_id: m.lobby_id,
            player_id: m.player_id,
            joined_at: m.joined_at,
            is_active: m.is_active,
        }
    }
}

pub async fn find_membership<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    lobby_id: i64,
    player_id: i64,
) -> Result<Option<LobbyMembership>, DomainError> {
    let membership =
        memberships_adapter::find_membership(conn, MembershipKey { lobby_id, player_id }).await?;
    Ok(membership.map(LobbyMembership::from))
}

pub async fn is_active_member<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    lobby_id: i64,
    player_id: i64,
) -> Result<bool, DomainError> {
    Ok(find_membership(conn, lobby_id, player_id)
        .await?
        .is_some_and(|m| m.is_active))
}

/// Fail with Forbidden unless the player is an active member of the lobby.
pub async fn require_active_member<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    lobby_id: i64,
    player_id: i64,
) -> Result<(), DomainError> {
    if is_active_member(conn, lobby_id, player_id).await? {
        Ok(())
    } else {
        Err(DomainError::forbidden(
            ForbiddenKind::NotAMember,
            format!("Player {player_id} is not an active member of lobby {lobby_id}"),
        ))
    }
}

pub async fn find_active_members<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    lobby_id: i64,
) -> Result<Vec<LobbyMembership>, DomainError> {
    let members = memberships_adapter::find_active_members(conn, lobby_id).await?;
    Ok(members.into_iter().map(LobbyMembership::from).collect())
}

/// Insert-or-reactivate; joining twice is a no-op.
pub async fn upsert_membership(
    txn: &DatabaseTransaction,
    lobby_id: i64,
    player_id: i64,
) -> Result<LobbyMembership, DomainError> {
    let membership =
        memberships_adapter::upsert_membership(txn, MembershipKey { lobby_id, player_id }).await?;
    Ok(LobbyMembership::from(membership))
}

pub async fn deactivate_membership(
    txn: &DatabaseTransaction,
    membership_id: i64,
) -> Result<LobbyMembership, DomainError> {
    let membership = memberships_adapter::deactivate_membership(txn, membership_id).await?;
    Ok(LobbyMembership::from(membership))
}

pub async fn deactivate_all_for_lobby(
    txn: &DatabaseTransaction,
    lobby_id: i64,
) -> Result<u64, DomainError> {
    Ok(memberships_adapter::deactivate_all_for_lobby(txn, lobby_id).await?)
}
