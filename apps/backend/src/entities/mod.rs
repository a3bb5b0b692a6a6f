pub mod deal_actions;
pub mod deals;
pub mod lobbies;
pub mod lobby_players;
pub mod players;
