//! In-process fan-out registry for lobby events.
//!
//! Sessions register a recipient per lobby they subscribe to; services
//! broadcast committed state changes to every recipient of that lobby.
//! Single-node only: delivery is best-effort do_send, and a full mailbox
//! drops the event rather than blocking the writer.

use actix::prelude::*;
use dashmap::DashMap;
use uuid::Uuid;

use crate::ws::protocol::ServerEvent;

/// One event addressed to every subscriber of a lobby.
#[derive(Message, Clone)]
#[rtype(result = "()")]
pub struct LobbyBroadcast {
    pub lobby_id: i64,
    pub event: ServerEvent,
}

/// Registry of live subscriptions, keyed lobby -> session token.
#[derive(Default)]
pub struct LobbyRegistry {
    subscribers: DashMap<i64, DashMap<Uuid, Recipient<LobbyBroadcast>>>,
}

impl LobbyRegistry {
    pub fn new() -> Self {
        Self {
            subscribers: DashMap::new(),
        }
    }

    /// Subscribe a session to a lobby; the returned token unsubscribes it.
    pub fn register(&self, lobby_id: i64, recipient: Recipient<LobbyBroadcast>) -> Uuid {
        let token = Uuid::new_v4();
        let entry = self.subscribers.entry(lobby_id).or_default();
        entry.insert(token, recipient);
        token
    }

    pub fn unregister(&self, lobby_id: i64, token: Uuid) {
        if let Some(entry) = self.subscribers.get(&lobby_id) {
            entry.remove(&token);
            if entry.is_empty() {
                drop(entry);
                self.subscribers.remove_if(&lobby_id, |_, subs| subs.is_empty());
            }
        }
    }

    /// Fan an event out to every subscriber of the lobby. Dead recipients
    /// are dropped silently; the write that produced the event has already
    /// committed, so delivery failures are log-only concerns upstream.
    pub fn broadcast(&self, lobby_id: i64, event: ServerEvent) {
        if let Some(entry) = self.subscribers.get(&lobby_id) {
            for recipient in entry.iter() {
                let _ = recipient.value().do_send(LobbyBroadcast {
                    lobby_id,
                    event: event.clone(),
                });
            }
        }
    }

    pub fn subscriber_count(&self, lobby_id: i64) -> usize {
        self.subscribers
            .get(&lobby_id)
            .map(|entry| entry.len())
            .unwrap_or(0)
    }
}
