//! SeaORM adapter for the deal repository: deal rows, their action rows, and
//! the conditional status update that makes concurrent transitions race-safe.

use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, DatabaseTransaction, EntityTrait,
    NotSet, QueryFilter, QueryOrder, Set,
};

use crate::entities::{deal_actions, deals};
use crate::infra::db_errors::{StatusConflict, DEAL_NOT_FOUND_PREFIX, STATUS_CONFLICT_PREFIX};

pub mod dto;

pub use dto::{DealActionCreate, DealCreate, DealListFilter};

pub async fn find_by_id<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    deal_id: i64,
) -> Result<Option<deals::Model>, sea_orm::DbErr> {
    deals::Entity::find_by_id(deal_id).one(conn).await
}

pub async fn find_actions<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    deal_id: i64,
) -> Result<Vec<deal_actions::Model>, sea_orm::DbErr> {
    deal_actions::Entity::find()
        .filter(deal_actions::Column::DealId.eq(deal_id))
        .order_by_asc(deal_actions::Column::Id)
        .all(conn)
        .await
}

/// Insert a deal and all of its action rows. Callers run this inside a
/// transaction so the deal and its actions commit or roll back together.
pub async fn create_deal_with_actions(
    txn: &DatabaseTransaction,
    dto: DealCreate,
) -> Result<(deals::Model, Vec<deal_actions::Model>), sea_orm::DbErr> {
    let now = time::OffsetDateTime::now_utc();

    let deal_active = deals::ActiveModel {
        id: NotSet,
        lobby_id: Set(dto.lobby_id),
        proposer_id: Set(dto.proposer_id),
        receiver_id: Set(dto.receiver_id),
        notes: Set(dto.notes),
        summary: Set(dto.summary),
        status: Set(deals::DealStatus::Pending),
        created_at: Set(now),
        updated_at: Set(now),
    };
    let deal = deal_active.insert(txn).await?;

    let mut actions = Vec::with_capacity(dto.actions.len());
    for action in dto.actions {
        let action_active = deal_actions::ActiveModel {
            id: NotSet,
            deal_id: Set(deal.id),
            player_id: Set(action.player_id),
            kind: Set(action.kind),
            payload: Set(action.payload),
            created_at: Set(now),
        };
        actions.push(action_active.insert(txn).await?);
    }

    Ok((deal, actions))
}

pub async fn list_deals<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    filter: DealListFilter,
) -> Result<Vec<deals::Model>, sea_orm::DbErr> {
    let mut query = deals::Entity::find().filter(
        Condition::any()
            .add(deals::Column::ProposerId.eq(filter.participant_id))
            .add(deals::Column::ReceiverId.eq(filter.participant_id)),
    );
    if let Some(lobby_id) = filter.lobby_id {
        query = query.filter(deals::Column::LobbyId.eq(lobby_id));
    }
    if let Some(status) = filter.status {
        query = query.filter(deals::Column::Status.eq(status));
    }
    // Newest first; id breaks created_at ties deterministically.
    query
        .order_by_desc(deals::Column::CreatedAt)
        .order_by_desc(deals::Column::Id)
        .all(conn)
        .await
}

/// Conditional status update: succeeds only if the row still holds
/// `expected`. On rows_affected == 0 the row is refetched to distinguish a
/// missing deal from a lost race, and the latter is reported as a structured
/// `DbErr::Custom` payload that `db_errors::map_db_err` understands.
pub async fn transition_status<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    deal_id: i64,
    expected: deals::DealStatus,
    target: deals::DealStatus,
) -> Result<deals::Model, sea_orm::DbErr> {
    let now = time::OffsetDateTime::now_utc();

    // .set() goes through the ActiveEnum machinery, which casts the status
    // value to the deal_status pg type.
    let result = deals::Entity::update_many()
        .set(deals::ActiveModel {
            status: Set(target),
            updated_at: Set(now),
            ..Default::default()
        })
        .filter(deals::Column::Id.eq(deal_id))
        .filter(deals::Column::Status.eq(expected))
        .exec(conn)
        .await?;

    if result.rows_affected == 0 {
        let deal = deals::Entity::find_by_id(deal_id).one(conn).await?;
        return match deal {
            Some(deal) => {
                let payload = serde_json::to_string(&StatusConflict {
                    deal_id,
                    expected: expected.as_str().to_string(),
                    actual: deal.status.as_str().to_string(),
                })
                .unwrap_or_default();
                Err(sea_orm::DbErr::Custom(format!(
                    "{STATUS_CONFLICT_PREFIX}{payload}"
                )))
            }
            None => Err(sea_orm::DbErr::Custom(format!(
                "{DEAL_NOT_FOUND_PREFIX}{deal_id}"
            ))),
        };
    }

    deals::Entity::find_by_id(deal_id)
        .one(conn)
        .await?
        .ok_or_else(|| sea_orm::DbErr::Custom(format!("{DEAL_NOT_FOUND_PREFIX}{deal_id}")))
}

/// Cancel every pending deal in a lobby. Used by dissolve; accepted deals
/// keep their status.
pub async fn cancel_pending_for_lobby(
    txn: &DatabaseTransaction,
    lobby_id: i64,
) -> Result<u64, sea_orm::DbErr> {
    let now = time::OffsetDateTime::now_utc();
    let result = deals::Entity::update_many()
        .set(deals::ActiveModel {
            status: Set(deals::DealStatus::Cancelled),
            updated_at: Set(now),
            ..Default::default()
        })
        .filter(deals::Column::LobbyId.eq(lobby_id))
        .filter(deals::Column::Status.eq(deals::DealStatus::Pending))
        .exec(txn)
        .await?;
    Ok(result.rows_affected)
}
