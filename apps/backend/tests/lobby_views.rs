//! Wire-format tests for lobby HTTP responses. Join and lookup both answer
//! with the lobby plus its resolved member list.

use backend::protocol::views::{LobbyDetailView, LobbyPlayerView, LobbyView};
use time::macros::datetime;

fn detail() -> LobbyDetailView {
    LobbyDetailView {
        lobby: LobbyView {
            id: 5,
            name: "Trade table".to_string(),
            code: "ABC234".to_string(),
            host_id: 1,
            is_active: true,
            created_at: datetime!(2026-01-02 03:04:05 UTC),
        },
        players: vec![
            LobbyPlayerView {
                id: 1,
                name: "Ada".to_string(),
                is_host: true,
                away: false,
                joined_at: datetime!(2026-01-02 03:04:05 UTC),
            },
            LobbyPlayerView {
                id: 2,
                name: "Grace".to_string(),
                is_host: false,
                away: true,
                joined_at: datetime!(2026-01-02 03:10:00 UTC),
            },
        ],
    }
}

#[test]
fn join_response_carries_member_list() {
    let value = serde_json::to_value(detail()).unwrap();

    // Lobby fields are flattened alongside the players array.
    assert_eq!(value["id"], 5);
    assert_eq!(value["code"], "ABC234");
    assert_eq!(value["hostId"], 1);

    let players = value["players"].as_array().unwrap();
    assert_eq!(players.len(), 2);
    assert_eq!(players[0]["isHost"], true);
    assert_eq!(players[1]["away"], true);
    assert!(players[1]["joinedAt"].as_str().unwrap().starts_with("2026-01-02"));
}
