//! Player repository functions for the domain layer.

use sea_orm::{ConnectionTrait, DatabaseTransaction};

use crate::adapters::players_sea as players_adapter;
use crate::entities::players;
use crate::errors::domain::{DomainError, NotFoundKind};

/// How long since last_active before a player shows as away.
pub const AWAY_AFTER: time::Duration = time::Duration::minutes(2);

/// Player domain model, converted from `players::Model` when loaded.
#[derive(Debug, Clone, PartialEq)]
pub struct Player {
    pub id: i64,
    pub sub: String,
    pub name: String,
    pub last_active: time::OffsetDateTime,
    pub created_at: time::OffsetDateTime,
}

impl Player {
    /// Advisory liveness for display; nothing in the state machine keys off it.
    pub fn is_away_at(&self, now: time::OffsetDateTime) -> bool {
        now - self.last_active > AWAY_AFTER
    }
}

impl From<players::Model> for Player {
    fn from(m: players::Model) -> Self {
        Self {
            id: m.id,
            sub: m.sub,
            name: m.name,
            last_active: m.last_active,
            created_at: m.created_at,
        }
    }
}

pub async fn find_by_id<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    player_id: i64,
) -> Result<Option<Player>, DomainError> {
    let player = players_adapter::find_by_id(conn, player_id).await?;
    Ok(player.map(Player::from))
}

pub async fn require_player<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    player_id: i64,
) -> Result<Player, DomainError> {
    find_by_id(conn, player_id).await?.ok_or_else(|| {
        DomainError::not_found(NotFoundKind::Player, format!("Player {player_id} not found"))
    })
}

pub async fn find_by_sub<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    sub: &str,
) -> Result<Option<Player>, DomainError> {
    let player = players_adapter::find_by_sub(conn, sub).await?;
    Ok(player.map(Player::from))
}

pub async fn create_player(
    txn: &DatabaseTransaction,
    sub: &str,
    name: &str,
) -> Result<Player, DomainError> {
    let dto = players_adapter::PlayerCreate {
        sub: sub.to_string(),
        name: name.to_string(),
    };
    let player = players_adapter::create_player(txn, dto).await?;
    Ok(Player::from(player))
}

pub async fn rename_player(
    txn: &DatabaseTransaction,
    player_id: i64,
    name: &str,
) -> Result<Player, DomainError> {
    let dto = players_adapter::PlayerRename {
        id: player_id,
        name: name.to_string(),
    };
    let player = players_adapter::rename_player(txn, dto).await?;
    Ok(Player::from(player))
}

pub async fn touch_last_active<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    player_id: i64,
) -> Result<(), DomainError> {
    players_adapter::touch_last_active(conn, player_id).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn player_active_at(last_active: time::OffsetDateTime) -> Player {
        Player {
            id: 1,
            sub: "sub-1".into(),
            name: "Ada".into(),
            last_active,
            created_at: last_active,
        }
    }

    #[test]
    fn away_threshold_is_two_minutes() {
        let now = time::OffsetDateTime::now_utc();

        let fresh = player_active_at(now - time::Duration::seconds(90));
        assert!(!fresh.is_away_at(now));

        let stale = player_active_at(now - time::Duration::seconds(121));
        assert!(stale.is_away_at(now));
    }
}
