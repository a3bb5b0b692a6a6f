use sea_orm_migration::prelude::*;
use sea_orm_migration::sea_orm::{self, Statement};
use sea_orm_migration::sea_query::extension::postgres::Type as PgType;
use sea_orm_migration::sea_query::{ColumnDef, ForeignKeyAction, Index, Table};

#[derive(DeriveMigrationName)]
pub struct Migration;

// ----- Iden enums for tables & columns -----
#[derive(Iden)]
enum Players {
    Table,
    Id,
    Sub,
    Name,
    LastActive,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum Lobbies {
    Table,
    Id,
    Name,
    Code,
    HostId,
    IsActive,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum LobbyPlayers {
    Table,
    Id,
    LobbyId,
    PlayerId,
    JoinedAt,
    IsActive,
    UpdatedAt,
}

#[derive(Iden)]
enum Deals {
    Table,
    Id,
    LobbyId,
    ProposerId,
    ReceiverId,
    Notes,
    Summary,
    Status,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum DealActions {
    Table,
    Id,
    DealId,
    PlayerId,
    Kind,
    Payload,
    CreatedAt,
}

#[derive(Iden)]
enum DealStatusEnum {
    #[iden = "deal_status"]
    Type,
}

#[derive(Iden)]
enum DealActionKindEnum {
    #[iden = "deal_action_kind"]
    Type,
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Create Postgres enums first (PostgreSQL only; SQLite stores them as TEXT)
        match manager.get_database_backend() {
            sea_orm::DatabaseBackend::Postgres => {
                async fn enum_exists(
                    manager: &SchemaManager<'_>,
                    enum_name: &str,
                ) -> Result<bool, DbErr> {
                    let result = manager
                        .get_connection()
                        .query_one(Statement::from_string(
                            sea_orm::DatabaseBackend::Postgres,
                            format!("SELECT 1 FROM pg_type WHERE typname = '{}'", enum_name),
                        ))
                        .await?;
                    Ok(result.is_some())
                }

                if !enum_exists(manager, "deal_status").await? {
                    manager
                        .create_type(
                            PgType::create()
                                .as_enum(DealStatusEnum::Type)
                                .values([
                                    "pending",
                                    "accepted",
                                    "rejected",
                                    "cancelled",
                                    "completed",
                                ])
                                .to_owned(),
                        )
                        .await?;
                }

                if !enum_exists(manager, "deal_action_kind").await? {
                    manager
                        .create_type(
                            PgType::create()
                                .as_enum(DealActionKindEnum::Type)
                                .values(["deliver-goods", "payment", "track-usage", "custom-action"])
                                .to_owned(),
                        )
                        .await?;
                }
            }
            sea_orm::DatabaseBackend::Sqlite => {}
            _ => {
                return Err(DbErr::Custom("Unsupported database backend".into()));
            }
        }

        // players
        manager
            .create_table(
                Table::create()
                    .table(Players::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Players::Id)
                            .big_integer()
                            .not_null()
                            .primary_key()
                            .auto_increment(),
                    )
                    .col(ColumnDef::new(Players::Sub).string().not_null())
                    .col(ColumnDef::new(Players::Name).string().not_null())
                    .col(
                        ColumnDef::new(Players::LastActive)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Players::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Players::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_players_sub_unique")
                    .table(Players::Table)
                    .col(Players::Sub)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // lobbies
        manager
            .create_table(
                Table::create()
                    .table(Lobbies::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Lobbies::Id)
                            .big_integer()
                            .not_null()
                            .primary_key()
                            .auto_increment(),
                    )
                    .col(ColumnDef::new(Lobbies::Name).string().not_null())
                    .col(ColumnDef::new(Lobbies::Code).string_len(6).not_null())
                    .col(ColumnDef::new(Lobbies::HostId).big_integer().not_null())
                    .col(
                        ColumnDef::new(Lobbies::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(Lobbies::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Lobbies::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_lobbies_host_id")
                            .from(Lobbies::Table, Lobbies::HostId)
                            .to(Players::Table, Players::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        // Codes are only unique among *active* lobbies: a dissolved lobby may
        // keep a code that a later lobby reuses. The partial unique index
        // backs up the allocation-time check against concurrent creates.
        manager
            .create_index(
                Index::create()
                    .name("idx_lobbies_code_active")
                    .table(Lobbies::Table)
                    .col(Lobbies::Code)
                    .unique()
                    .and_where(Expr::col(Lobbies::IsActive).eq(true))
                    .to_owned(),
            )
            .await?;

        // lobby_players
        manager
            .create_table(
                Table::create()
                    .table(LobbyPlayers::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(LobbyPlayers::Id)
                            .big_integer()
                            .not_null()
                            .primary_key()
                            .auto_increment(),
                    )
                    .col(
                        ColumnDef::new(LobbyPlayers::LobbyId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(LobbyPlayers::PlayerId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(LobbyPlayers::JoinedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(LobbyPlayers::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(LobbyPlayers::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_lobby_players_lobby_id")
                            .from(LobbyPlayers::Table, LobbyPlayers::LobbyId)
                            .to(Lobbies::Table, Lobbies::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_lobby_players_player_id")
                            .from(LobbyPlayers::Table, LobbyPlayers::PlayerId)
                            .to(Players::Table, Players::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // One membership row per (lobby, player); rejoin reactivates it.
        manager
            .create_index(
                Index::create()
                    .name("ux_lobby_players_lobby_player")
                    .table(LobbyPlayers::Table)
                    .col(LobbyPlayers::LobbyId)
                    .col(LobbyPlayers::PlayerId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // deals
        manager
            .create_table(
                Table::create()
                    .table(Deals::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Deals::Id)
                            .big_integer()
                            .not_null()
                            .primary_key()
                            .auto_increment(),
                    )
                    .col(ColumnDef::new(Deals::LobbyId).big_integer().not_null())
                    .col(ColumnDef::new(Deals::ProposerId).big_integer().not_null())
                    .col(ColumnDef::new(Deals::ReceiverId).big_integer().not_null())
                    .col(ColumnDef::new(Deals::Notes).text().null())
                    .col(ColumnDef::new(Deals::Summary).text().null())
                    .col(
                        ColumnDef::new(Deals::Status)
                            .custom(DealStatusEnum::Type)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Deals::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Deals::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_deals_lobby_id")
                            .from(Deals::Table, Deals::LobbyId)
                            .to(Lobbies::Table, Lobbies::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_deals_proposer_id")
                            .from(Deals::Table, Deals::ProposerId)
                            .to(Players::Table, Players::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_deals_receiver_id")
                            .from(Deals::Table, Deals::ReceiverId)
                            .to(Players::Table, Players::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_deals_lobby_id")
                    .table(Deals::Table)
                    .col(Deals::LobbyId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_deals_proposer_id")
                    .table(Deals::Table)
                    .col(Deals::ProposerId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_deals_receiver_id")
                    .table(Deals::Table)
                    .col(Deals::ReceiverId)
                    .to_owned(),
            )
            .await?;

        // deal_actions
        manager
            .create_table(
                Table::create()
                    .table(DealActions::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(DealActions::Id)
                            .big_integer()
                            .not_null()
                            .primary_key()
                            .auto_increment(),
                    )
                    .col(ColumnDef::new(DealActions::DealId).big_integer().not_null())
                    .col(
                        ColumnDef::new(DealActions::PlayerId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(DealActions::Kind)
                            .custom(DealActionKindEnum::Type)
                            .not_null(),
                    )
                    .col(ColumnDef::new(DealActions::Payload).json_binary().not_null())
                    .col(
                        ColumnDef::new(DealActions::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_deal_actions_deal_id")
                            .from(DealActions::Table, DealActions::DealId)
                            .to(Deals::Table, Deals::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_deal_actions_player_id")
                            .from(DealActions::Table, DealActions::PlayerId)
                            .to(Players::Table, Players::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_deal_actions_deal_id")
                    .table(DealActions::Table)
                    .col(DealActions::DealId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(DealActions::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Deals::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(
                Table::drop()
                    .table(LobbyPlayers::Table)
                    .if_exists()
                    .to_owned(),
            )
            .await?;
        manager
            .drop_table(Table::drop().table(Lobbies::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Players::Table).if_exists().to_owned())
            .await?;

        if manager.get_database_backend() == sea_orm::DatabaseBackend::Postgres {
            manager
                .drop_type(PgType::drop().name(DealStatusEnum::Type).if_exists().to_owned())
                .await?;
            manager
                .drop_type(
                    PgType::drop()
                        .name(DealActionKindEnum::Type)
                        .if_exists()
                        .to_owned(),
                )
                .await?;
        }

        Ok(())
    }
}
