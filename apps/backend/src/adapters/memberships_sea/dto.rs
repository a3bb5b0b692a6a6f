//! DTOs for the membership adapter.

#[derive(Debug, Clone, Copy)]
pub struct MembershipKey {
    pub lobby_id: i64,
    pub player_id: i64,
}
