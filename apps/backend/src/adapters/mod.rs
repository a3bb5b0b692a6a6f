//! SeaORM adapters. Functions here return `DbErr`; the repos layer maps to
//! `DomainError` via `infra::db_errors`.

pub mod deals_sea;
pub mod lobbies_sea;
pub mod memberships_sea;
pub mod players_sea;
