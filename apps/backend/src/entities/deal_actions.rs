use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// Discriminator for the structured payload stored alongside each row.
/// The payload itself is `crate::domain::actions::DealAction`, serialized
/// as tagged JSON; the kind column duplicates the tag for querying.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "deal_action_kind")]
pub enum DealActionKind {
    #[sea_orm(string_value = "deliver-goods")]
    #[serde(rename = "deliver-goods")]
    DeliverGoods,
    #[sea_orm(string_value = "payment")]
    #[serde(rename = "payment")]
    Payment,
    #[sea_orm(string_value = "track-usage")]
    #[serde(rename = "track-usage")]
    TrackUsage,
    #[sea_orm(string_value = "custom-action")]
    #[serde(rename = "custom-action")]
    Custom,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "deal_actions")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    #[sea_orm(column_name = "deal_id")]
    pub deal_id: i64,
    /// The side committing to this action; always the deal's proposer or receiver.
    #[sea_orm(column_name = "player_id")]
    pub player_id: i64,
    pub kind: DealActionKind,
    #[sea_orm(column_type = "JsonBinary")]
    pub payload: Json,
    #[sea_orm(column_name = "created_at")]
    pub created_at: OffsetDateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::deals::Entity",
        from = "Column::DealId",
        to = "super::deals::Column::Id"
    )]
    Deal,
    #[sea_orm(
        belongs_to = "super::players::Entity",
        from = "Column::PlayerId",
        to = "super::players::Column::Id"
    )]
    Player,
}

impl Related<super::deals::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Deal.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
