use serde::{Deserialize, Serialize};

use crate::protocol::views::{DealView, LobbyPlayerView};

pub const PROTOCOL_VERSION: i32 = 1;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMsg {
    Hello { protocol: i32 },
    Subscribe { lobby_id: i64 },
    Unsubscribe { lobby_id: i64 },
}

/// Lobby-scoped events pushed to subscribers. Event names match the wire
/// format the polling clients already understand.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "camelCase")]
pub enum ServerEvent {
    PlayerJoined {
        lobby_id: i64,
        player: LobbyPlayerView,
    },
    NewDeal {
        lobby_id: i64,
        deal: DealView,
    },
    DealUpdated {
        lobby_id: i64,
        deal: DealView,
    },
    LobbyDissolved {
        lobby_id: i64,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMsg {
    HelloAck { protocol: i32, player_id: i64 },

    Subscribed { lobby_id: i64 },

    Unsubscribed { lobby_id: i64 },

    Error { code: ErrorCode, message: String },

    // Untagged variants must come last for serde to compile the enum.
    #[serde(untagged)]
    Event(ServerEvent),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    BadProtocol,
    BadRequest,
    Forbidden,
}
