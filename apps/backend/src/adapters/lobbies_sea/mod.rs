//! SeaORM adapter for the lobby repository.

use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseTransaction, EntityTrait, NotSet,
    QueryFilter, Set,
};

use crate::entities::lobbies;

pub mod dto;

pub use dto::LobbyCreate;

pub async fn find_by_id<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    lobby_id: i64,
) -> Result<Option<lobbies::Model>, sea_orm::DbErr> {
    lobbies::Entity::find_by_id(lobby_id).one(conn).await
}

/// Codes are only unique among active lobbies, so the active filter is part
/// of the lookup, not an optimization.
pub async fn find_active_by_code<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    code: &str,
) -> Result<Option<lobbies::Model>, sea_orm::DbErr> {
    lobbies::Entity::find()
        .filter(lobbies::Column::Code.eq(code))
        .filter(lobbies::Column::IsActive.eq(true))
        .one(conn)
        .await
}

pub async fn code_in_use<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    code: &str,
) -> Result<bool, sea_orm::DbErr> {
    Ok(find_active_by_code(conn, code).await?.is_some())
}

pub async fn create_lobby(
    txn: &DatabaseTransaction,
    dto: LobbyCreate,
) -> Result<lobbies::Model, sea_orm::DbErr> {
    let now = time::OffsetDateTime::now_utc();
    let lobby_active = lobbies::ActiveModel {
        id: NotSet,
        name: Set(dto.name),
        code: Set(dto.code),
        host_id: Set(dto.host_id),
        is_active: Set(true),
        created_at: Set(now),
        updated_at: Set(now),
    };
    lobby_active.insert(txn).await
}

/// Mark a lobby inactive. Membership and deal cascades are the caller's job,
/// inside the same transaction.
pub async fn deactivate_lobby(
    txn: &DatabaseTransaction,
    lobby_id: i64,
) -> Result<lobbies::Model, sea_orm::DbErr> {
    let lobby = lobbies::ActiveModel {
        id: Set(lobby_id),
        name: NotSet,
        code: NotSet,
        host_id: NotSet,
        is_active: Set(false),
        created_at: NotSet,
        updated_at: Set(time::OffsetDateTime::now_utc()),
    };
    lobby.update(txn).await
}

pub async fn find_active_for_player<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    player_id: i64,
) -> Result<Vec<lobbies::Model>, sea_orm::DbErr> {
    use sea_orm::{JoinType, QueryOrder, QuerySelect, RelationTrait};

    use crate::entities::lobby_players;

    lobbies::Entity::find()
        .join(JoinType::InnerJoin, lobbies::Relation::LobbyPlayers.def())
        .filter(lobby_players::Column::PlayerId.eq(player_id))
        .filter(lobby_players::Column::IsActive.eq(true))
        .filter(lobbies::Column::IsActive.eq(true))
        .order_by_desc(lobbies::Column::CreatedAt)
        .all(conn)
        .await
}
