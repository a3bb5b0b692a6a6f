//! DTOs for the players adapter.

#[derive(Debug, Clone)]
pub struct PlayerCreate {
    pub sub: String,
    pub name: String,
}

#[derive(Debug, Clone)]
pub struct PlayerRename {
    pub id: i64,
    pub name: String,
}
