//! SeaORM adapter for the player repository.

use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseTransaction, EntityTrait, NotSet,
    QueryFilter, Set,
};

use crate::entities::players;

pub mod dto;

pub use dto::{PlayerCreate, PlayerRename};

pub async fn find_by_id<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    player_id: i64,
) -> Result<Option<players::Model>, sea_orm::DbErr> {
    players::Entity::find_by_id(player_id).one(conn).await
}

pub async fn find_by_sub<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    sub: &str,
) -> Result<Option<players::Model>, sea_orm::DbErr> {
    players::Entity::find()
        .filter(players::Column::Sub.eq(sub))
        .one(conn)
        .await
}

pub async fn create_player(
    txn: &DatabaseTransaction,
    dto: PlayerCreate,
) -> Result<players::Model, sea_orm::DbErr> {
    let now = time::OffsetDateTime::now_utc();
    let player_active = players::ActiveModel {
        id: NotSet,
        sub: Set(dto.sub),
        name: Set(dto.name),
        last_active: Set(now),
        created_at: Set(now),
        updated_at: Set(now),
    };
    player_active.insert(txn).await
}

pub async fn rename_player(
    txn: &DatabaseTransaction,
    dto: PlayerRename,
) -> Result<players::Model, sea_orm::DbErr> {
    let now = time::OffsetDateTime::now_utc();
    let player = players::ActiveModel {
        id: Set(dto.id),
        sub: NotSet,
        name: Set(dto.name),
        last_active: Set(now),
        created_at: NotSet,
        updated_at: Set(now),
    };
    player.update(txn).await
}

/// Refresh last_active without touching anything else. Runs on every
/// authenticated request, so it deliberately skips the refetch.
pub async fn touch_last_active<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    player_id: i64,
) -> Result<(), sea_orm::DbErr> {
    use sea_orm::sea_query::Expr;

    let now = time::OffsetDateTime::now_utc();
    players::Entity::update_many()
        .col_expr(players::Column::LastActive, Expr::val(now).into())
        .filter(players::Column::Id.eq(player_id))
        .exec(conn)
        .await?;
    Ok(())
}
