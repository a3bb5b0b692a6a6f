pub mod current_player;
