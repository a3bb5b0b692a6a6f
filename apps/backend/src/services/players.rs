use sea_orm::DatabaseTransaction;
use tracing::{debug, info};
use uuid::Uuid;

use crate::errors::domain::{DomainError, ValidationKind};
use crate::repos::players::{self, Player};

/// Register a player, or refresh the name of an existing one.
///
/// Idempotent on `sub`: re-registering with a known identity updates the
/// display name instead of creating a duplicate row. A fresh registration
/// (no sub yet) mints a new opaque identity. The flag says which happened.
pub async fn register(
    txn: &DatabaseTransaction,
    existing_sub: Option<&str>,
    name: &str,
) -> Result<(Player, bool), DomainError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(DomainError::validation(
            ValidationKind::MissingField,
            "name must not be empty",
        ));
    }

    if let Some(sub) = existing_sub {
        if let Some(player) = players::find_by_sub(txn, sub).await? {
            debug!(player_id = player.id, "Repeat registration, refreshing name");
            let player = players::rename_player(txn, player.id, name).await?;
            return Ok((player, false));
        }
    }

    let sub = Uuid::new_v4().to_string();
    let player = players::create_player(txn, &sub, name).await?;
    info!(player_id = player.id, "Registered new player");
    Ok((player, true))
}
