use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "lobbies")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub name: String,
    /// Six-character join code; unique among active lobbies only.
    pub code: String,
    #[sea_orm(column_name = "host_id")]
    pub host_id: i64,
    #[sea_orm(column_name = "is_active")]
    pub is_active: bool,
    #[sea_orm(column_name = "created_at")]
    pub created_at: OffsetDateTime,
    #[sea_orm(column_name = "updated_at")]
    pub updated_at: OffsetDateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::players::Entity",
        from = "Column::HostId",
        to = "super::players::Column::Id"
    )]
    Host,
    #[sea_orm(has_many = "super::lobby_players::Entity")]
    LobbyPlayers,
    #[sea_orm(has_many = "super::deals::Entity")]
    Deals,
}

impl Related<super::lobby_players::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::LobbyPlayers.def()
    }
}

impl Related<super::deals::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Deals.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
