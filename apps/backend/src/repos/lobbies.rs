//! Lobby repository functions for the domain layer.

use sea_orm::{ConnectionTrait, DatabaseTransaction};

use crate::adapters::lobbies_sea as lobbies_adapter;
use crate::entities::lobbies;
use crate::errors::domain::{DomainError, NotFoundKind};

/// Lobby domain model, converted from `lobbies::Model` when loaded.
#[derive(Debug, Clone, PartialEq)]
pub struct Lobby {
    pub id: i64,
    pub name: String,
    pub code: String,
    pub host_id: i64,
    pub is_active: bool,
    pub created_at: time::OffsetDateTime,
}

impl From<lobbies::Model> for Lobby {
    fn from(m: lobbies::Model) -> Self {
        Self {
            id: m.id,
            name: m.name,
            code: m.code,
            host_id: m.host_id,
            is_active: m.is_active,
            created_at: m.created_at,
        }
    }
}

pub async fn find_by_id<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    lobby_id: i64,
) -> Result<Option<Lobby>, DomainError> {
    let lobby = lobbies_adapter::find_by_id(conn, lobby_id).await?;
    Ok(lobby.map(Lobby::from))
}

/// Load a lobby that must exist and still be active. Dissolved lobbies look
/// the same as missing ones to callers.
pub async fn require_active_lobby<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    lobby_id: i64,
) -> Result<Lobby, DomainError> {
    match find_by_id(conn, lobby_id).await? {
        Some(lobby) if lobby.is_active => Ok(lobby),
        _ => Err(DomainError::not_found(
            NotFoundKind::Lobby,
            format!("Lobby {lobby_id} not found"),
        )),
    }
}

pub async fn find_active_by_code<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    code: &str,
) -> Result<Option<Lobby>, DomainError> {
    let lobby = lobbies_adapter::find_active_by_code(conn, code).await?;
    Ok(lobby.map(Lobby::from))
}

pub async fn code_in_use<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    code: &str,
) -> Result<bool, DomainError> {
    Ok(lobbies_adapter::code_in_use(conn, code).await?)
}

pub async fn create_lobby(
    txn: &DatabaseTransaction,
    name: &str,
    code: &str,
    host_id: i64,
) -> Result<Lobby, DomainError> {
    let dto = lobbies_adapter::LobbyCreate {
        name: name.to_string(),
        code: code.to_string(),
        host_id,
    };
    let lobby = lobbies_adapter::create_lobby(txn, dto).await?;
    Ok(Lobby::from(lobby))
}

pub async fn deactivate_lobby(
    txn: &DatabaseTransaction,
    lobby_id: i64,
) -> Result<Lobby, DomainError> {
    let lobby = lobbies_adapter::deactivate_lobby(txn, lobby_id).await?;
    Ok(Lobby::from(lobby))
}

pub async fn find_active_for_player<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    player_id: i64,
) -> Result<Vec<Lobby>, DomainError> {
    let lobbies = lobbies_adapter::find_active_for_player(conn, player_id).await?;
    Ok(lobbies.into_iter().map(Lobby::from).collect())
}
