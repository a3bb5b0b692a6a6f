use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// Deal lifecycle status.
///
/// `pending` and `accepted` are non-terminal; `rejected`, `cancelled`
/// and `completed` are terminal. Transitions only move forward, see
/// `crate::domain::deal_flow`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "deal_status")]
#[serde(rename_all = "lowercase")]
pub enum DealStatus {
    #[sea_orm(string_value = "pending")]
    Pending,
    #[sea_orm(string_value = "accepted")]
    Accepted,
    #[sea_orm(string_value = "rejected")]
    Rejected,
    #[sea_orm(string_value = "cancelled")]
    Cancelled,
    #[sea_orm(string_value = "completed")]
    Completed,
}

impl DealStatus {
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            DealStatus::Rejected | DealStatus::Cancelled | DealStatus::Completed
        )
    }

    pub fn as_str(self) -> &'static str {
        match self {
            DealStatus::Pending => "pending",
            DealStatus::Accepted => "accepted",
            DealStatus::Rejected => "rejected",
            DealStatus::Cancelled => "cancelled",
            DealStatus::Completed => "completed",
        }
    }
}

impl std::str::FromStr for DealStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(DealStatus::Pending),
            "accepted" => Ok(DealStatus::Accepted),
            "rejected" => Ok(DealStatus::Rejected),
            "cancelled" => Ok(DealStatus::Cancelled),
            "completed" => Ok(DealStatus::Completed),
            other => Err(format!("unknown deal status '{other}'")),
        }
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "deals")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    #[sea_orm(column_name = "lobby_id")]
    pub lobby_id: i64,
    #[sea_orm(column_name = "proposer_id")]
    pub proposer_id: i64,
    #[sea_orm(column_name = "receiver_id")]
    pub receiver_id: i64,
    pub notes: Option<String>,
    pub summary: Option<String>,
    pub status: DealStatus,
    #[sea_orm(column_name = "created_at")]
    pub created_at: OffsetDateTime,
    #[sea_orm(column_name = "updated_at")]
    pub updated_at: OffsetDateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::lobbies::Entity",
        from = "Column::LobbyId",
        to = "super::lobbies::Column::Id"
    )]
    Lobby,
    #[sea_orm(
        belongs_to = "super::players::Entity",
        from = "Column::ProposerId",
        to = "super::players::Column::Id"
    )]
    Proposer,
    #[sea_orm(
        belongs_to = "super::players::Entity",
        from = "Column::ReceiverId",
        to = "super::players::Column::Id"
    )]
    Receiver,
    #[sea_orm(has_many = "super::deal_actions::Entity")]
    DealActions,
}

impl Related<super::lobbies::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Lobby.def()
    }
}

impl Related<super::deal_actions::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::DealActions.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
