//! SeaORM adapter for the lobby membership repository.

use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseTransaction, EntityTrait, NotSet,
    QueryFilter, Set,
};

use crate::entities::lobby_players;

pub mod dto;

pub use dto::MembershipKey;

pub async fn find_membership<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    key: MembershipKey,
) -> Result<Option<lobby_players::Model>, sea_orm::DbErr> {
    lobby_players::Entity::find()
        .filter(lobby_players::Column::LobbyId.eq(key.lobby_id))
        .filter(lobby_players::Column::PlayerId.eq(key.player_id))
        .one(conn)
        .await
}

pub async fn find_active_members<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    lobby_id: i64,
) -> Result<Vec<lobby_players::Model>, sea_orm::DbErr> {
    use sea_orm::QueryOrder;

    lobby_players::Entity::find()
        .filter(lobby_players::Column::LobbyId.eq(lobby_id))
        .filter(lobby_players::Column::IsActive.eq(true))
        .order_by_asc(lobby_players::Column::JoinedAt)
        .all(conn)
        .await
}

/// Insert a membership row, or reactivate the existing one. The (lobby,
/// player) pair is unique, so rejoining flips is_active back on rather than
/// duplicating the row. joined_at keeps the original join time.
pub async fn upsert_membership(
    txn: &DatabaseTransaction,
    key: MembershipKey,
) -> Result<lobby_players::Model, sea_orm::DbErr> {
    let now = time::OffsetDateTime::now_utc();

    if let Some(existing) = find_membership(txn, key).await? {
        if existing.is_active {
            return Ok(existing);
        }
        let membership = lobby_players::ActiveModel {
            id: Set(existing.id),
            lobby_id: NotSet,
            player_id: NotSet,
            joined_at: NotSet,
            is_active: Set(true),
            updated_at: Set(now),
        };
        return membership.update(txn).await;
    }

    let membership_active = lobby_players::ActiveModel {
        id: NotSet,
        lobby_id: Set(key.lobby_id),
        player_id: Set(key.player_id),
        joined_at: Set(now),
        is_active: Set(true),
        updated_at: Set(now),
    };
    membership_active.insert(txn).await
}

pub async fn deactivate_membership(
    txn: &DatabaseTransaction,
    membership_id: i64,
) -> Result<lobby_players::Model, sea_orm::DbErr> {
    let membership = lobby_players::ActiveModel {
        id: Set(membership_id),
        lobby_id: NotSet,
        player_id: NotSet,
        joined_at: NotSet,
        is_active: Set(false),
        updated_at: Set(time::OffsetDateTime::now_utc()),
    };
    membership.update(txn).await
}

/// Deactivate every membership of a lobby. Used by dissolve, in the same
/// transaction that deactivates the lobby row.
pub async fn deactivate_all_for_lobby(
    txn: &DatabaseTransaction,
    lobby_id: i64,
) -> Result<u64, sea_orm::DbErr> {
    use sea_orm::sea_query::Expr;

    let now = time::OffsetDateTime::now_utc();
    let result = lobby_players::Entity::update_many()
        .col_expr(lobby_players::Column::IsActive, Expr::val(false).into())
        .col_expr(lobby_players::Column::UpdatedAt, Expr::val(now).into())
        .filter(lobby_players::Column::LobbyId.eq(lobby_id))
        .filter(lobby_players::Column::IsActive.eq(true))
        .exec(txn)
        .await?;
    Ok(result.rows_affected)
}
