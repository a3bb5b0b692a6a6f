//! Repository functions for the domain layer.

pub mod deals;
pub mod lobbies;
pub mod memberships;
pub mod players;
