use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "players")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Opaque external identity, minted at registration and carried in JWTs.
    pub sub: String,
    pub name: String,
    #[sea_orm(column_name = "last_active")]
    pub last_active: OffsetDateTime,
    #[sea_orm(column_name = "created_at")]
    pub created_at: OffsetDateTime,
    #[sea_orm(column_name = "updated_at")]
    pub updated_at: OffsetDateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::lobby_players::Entity")]
    LobbyPlayers,
}

impl Related<super::lobby_players::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::LobbyPlayers.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
