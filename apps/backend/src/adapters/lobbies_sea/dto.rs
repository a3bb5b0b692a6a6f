//! DTOs for the lobbies adapter.

#[derive(Debug, Clone)]
pub struct LobbyCreate {
    pub name: String,
    pub code: String,
    pub host_id: i64,
}
