//! Wire-format tests for the WebSocket protocol. Event payloads must stay
//! byte-compatible with what the browser clients parse.

use backend::protocol::views::LobbyPlayerView;
use backend::ws::protocol::{ClientMsg, ErrorCode, ServerEvent, ServerMsg};
use serde_json::json;
use time::macros::datetime;

#[test]
fn client_hello_parses() {
    let msg: ClientMsg = serde_json::from_value(json!({
        "type": "hello",
        "protocol": 1,
    }))
    .unwrap();
    assert!(matches!(msg, ClientMsg::Hello { protocol: 1 }));
}

#[test]
fn client_subscribe_parses() {
    let msg: ClientMsg = serde_json::from_value(json!({
        "type": "subscribe",
        "lobby_id": 7,
    }))
    .unwrap();
    assert!(matches!(msg, ClientMsg::Subscribe { lobby_id: 7 }));
}

#[test]
fn unknown_client_type_is_rejected() {
    let res: Result<ClientMsg, _> = serde_json::from_value(json!({
        "type": "launch_missiles",
    }));
    assert!(res.is_err());
}

#[test]
fn hello_ack_wire_shape() {
    let msg = ServerMsg::HelloAck {
        protocol: 1,
        player_id: 42,
    };
    assert_eq!(
        serde_json::to_value(&msg).unwrap(),
        json!({ "type": "hello_ack", "protocol": 1, "player_id": 42 })
    );
}

#[test]
fn lobby_dissolved_event_serializes_untagged() {
    // Events carry an "event" discriminator, not the "type" one control
    // messages use.
    let msg = ServerMsg::Event(ServerEvent::LobbyDissolved { lobby_id: 3 });
    assert_eq!(
        serde_json::to_value(&msg).unwrap(),
        json!({ "event": "lobbyDissolved", "lobby_id": 3 })
    );
}

#[test]
fn player_joined_event_uses_camel_case_name() {
    let player = LobbyPlayerView {
        id: 9,
        name: "Ada".to_string(),
        is_host: false,
        away: false,
        joined_at: datetime!(2026-01-02 03:04:05 UTC),
    };
    let msg = ServerMsg::Event(ServerEvent::PlayerJoined {
        lobby_id: 3,
        player,
    });
    let value = serde_json::to_value(&msg).unwrap();
    assert_eq!(value["event"], "playerJoined");
    assert_eq!(value["lobby_id"], 3);
    assert_eq!(value["player"]["name"], "Ada");
    assert_eq!(value["player"]["isHost"], false);
}

#[test]
fn error_codes_are_snake_case() {
    let msg = ServerMsg::Error {
        code: ErrorCode::BadProtocol,
        message: "Unsupported protocol version".to_string(),
    };
    let value = serde_json::to_value(&msg).unwrap();
    assert_eq!(value["type"], "error");
    assert_eq!(value["code"], "bad_protocol");
}
