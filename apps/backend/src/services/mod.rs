//! Service layer: business rules on top of repos, inside caller-provided
//! transactions. Notification fan-out happens in routes, after commit.

pub mod deals;
pub mod lobbies;
pub mod players;
