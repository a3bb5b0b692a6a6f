//! Per-connection WebSocket actor.
//!
//! A session says hello, then subscribes to lobbies it is a member of.
//! Committed lobby changes arrive as `LobbyBroadcast` messages from the
//! registry and go out as JSON events.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use actix::prelude::*;
use actix_web::{web, Error, HttpMessage, HttpRequest, HttpResponse};
use actix_web_actors::ws;
use tracing::{info, warn};
use uuid::Uuid;

use crate::db::require_db;
use crate::db::txn::SharedTxn;
use crate::error::AppError;
use crate::extractors::current_player::CurrentPlayer;
use crate::repos::memberships;
use crate::state::app_state::AppState;
use crate::ws::hub::{LobbyBroadcast, LobbyRegistry};
use crate::ws::protocol::{ClientMsg, ErrorCode, ServerMsg, PROTOCOL_VERSION};

const HEARTBEAT_INTERVAL: Duration = Duration::from_secs(20);
const CLIENT_TIMEOUT: Duration = Duration::from_secs(40);

pub async fn upgrade(
    req: HttpRequest,
    stream: web::Payload,
    current_player: CurrentPlayer,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, Error> {
    // In tests a SharedTxn lets membership checks see uncommitted rows.
    // In production this is None.
    let shared_txn = req.extensions().get::<SharedTxn>().cloned();

    let session = WsSession::new(current_player, app_state, shared_txn);
    ws::start(session, &req, stream)
}

pub struct WsSession {
    conn_id: Uuid,
    player_id: i64,
    app_state: web::Data<AppState>,
    registry: Arc<LobbyRegistry>,
    shared_txn: Option<SharedTxn>,

    /// Registry tokens for the lobbies this session subscribed to.
    subscriptions: HashMap<i64, Uuid>,

    last_heartbeat: Instant,
    hello_done: bool,
}

impl WsSession {
    fn new(
        current_player: CurrentPlayer,
        app_state: web::Data<AppState>,
        shared_txn: Option<SharedTxn>,
    ) -> Self {
        let registry = app_state.lobbies.clone();
        Self {
            conn_id: Uuid::new_v4(),
            player_id: current_player.id,
            app_state,
            registry,
            shared_txn,
            subscriptions: HashMap::new(),
            last_heartbeat: Instant::now(),
            hello_done: false,
        }
    }

    fn send_json(ctx: &mut ws::WebsocketContext<Self>, msg: &ServerMsg) {
        match serde_json::to_string(msg) {
            Ok(payload) => ctx.text(payload),
            Err(err) => warn!(error = %err, "failed to serialize outbound ws message"),
        }
    }

    fn send_error_and_close(
        &self,
        ctx: &mut ws::WebsocketContext<Self>,
        code: ErrorCode,
        message: impl Into<String>,
    ) {
        let msg = ServerMsg::Error {
            code,
            message: message.into(),
        };
        Self::send_json(ctx, &msg);
        ctx.close(Some(ws::CloseReason::from(ws::CloseCode::Error)));
        ctx.stop();
    }

    fn start_heartbeat(&mut self, ctx: &mut ws::WebsocketContext<Self>) {
        ctx.run_interval(HEARTBEAT_INTERVAL, |actor, ctx| {
            if Instant::now().duration_since(actor.last_heartbeat) > CLIENT_TIMEOUT {
                warn!(conn_id = %actor.conn_id, player_id = actor.player_id, "ws heartbeat timed out");
                ctx.close(Some(ws::CloseReason::from(ws::CloseCode::Normal)));
                ctx.stop();
                return;
            }
            ctx.ping(b"keepalive");
        });
    }

    fn handle_subscribe(&mut self, lobby_id: i64, ctx: &mut ws::WebsocketContext<Self>) {
        if self.subscriptions.contains_key(&lobby_id) {
            Self::send_json(ctx, &ServerMsg::Subscribed { lobby_id });
            return;
        }

        let app_state = self.app_state.clone();
        let player_id = self.player_id;
        let shared_txn = self.shared_txn.clone();

        ctx.spawn(
            async move {
                if let Some(shared) = &shared_txn {
                    memberships::require_active_member(shared.transaction(), lobby_id, player_id)
                        .await?;
                } else {
                    let db = require_db(&app_state)?;
                    memberships::require_active_member(db, lobby_id, player_id).await?;
                }
                Ok::<(), AppError>(())
            }
            .into_actor(self)
            .map(move |res, actor, ctx| match res {
                Ok(()) => {
                    let recipient = ctx.address().recipient::<LobbyBroadcast>();
                    let token = actor.registry.register(lobby_id, recipient);
                    actor.subscriptions.insert(lobby_id, token);
                    Self::send_json(ctx, &ServerMsg::Subscribed { lobby_id });
                }
                Err(err) => match &err {
                    AppError::Forbidden { detail, .. } => {
                        Self::send_json(
                            ctx,
                            &ServerMsg::Error {
                                code: ErrorCode::Forbidden,
                                message: detail.clone(),
                            },
                        );
                    }
                    _ => {
                        warn!(?err, lobby_id, "ws subscribe failed");
                        ctx.close(Some(ws::CloseReason::from(ws::CloseCode::Error)));
                        ctx.stop();
                    }
                },
            }),
        );
    }
}

impl Actor for WsSession {
    type Context = ws::WebsocketContext<Self>;

    fn started(&mut self, ctx: &mut Self::Context) {
        info!(conn_id = %self.conn_id, player_id = self.player_id, "ws session started");
        self.start_heartbeat(ctx);
    }

    fn stopped(&mut self, _ctx: &mut Self::Context) {
        for (lobby_id, token) in self.subscriptions.drain() {
            self.registry.unregister(lobby_id, token);
        }
        info!(conn_id = %self.conn_id, player_id = self.player_id, "ws session stopped");
    }
}

impl Handler<LobbyBroadcast> for WsSession {
    type Result = ();

    fn handle(&mut self, msg: LobbyBroadcast, ctx: &mut Self::Context) {
        // Subscription may have raced the unregister; drop silently.
        if !self.subscriptions.contains_key(&msg.lobby_id) {
            return;
        }
        Self::send_json(ctx, &ServerMsg::Event(msg.event));
    }
}

impl StreamHandler<Result<ws::Message, ws::ProtocolError>> for WsSession {
    fn handle(&mut self, msg: Result<ws::Message, ws::ProtocolError>, ctx: &mut Self::Context) {
        match msg {
            Ok(ws::Message::Ping(payload)) => {
                self.last_heartbeat = Instant::now();
                ctx.pong(&payload);
            }
            Ok(ws::Message::Pong(_)) => {
                self.last_heartbeat = Instant::now();
            }
            Ok(ws::Message::Text(text)) => {
                self.last_heartbeat = Instant::now();

                let parsed: Result<ClientMsg, _> = serde_json::from_str(&text);
                let Ok(cmd) = parsed else {
                    self.send_error_and_close(ctx, ErrorCode::BadRequest, "Malformed JSON");
                    return;
                };

                match cmd {
                    ClientMsg::Hello { protocol } => {
                        if protocol != PROTOCOL_VERSION {
                            self.send_error_and_close(
                                ctx,
                                ErrorCode::BadProtocol,
                                "Unsupported protocol version",
                            );
                            return;
                        }
                        self.hello_done = true;
                        Self::send_json(
                            ctx,
                            &ServerMsg::HelloAck {
                                protocol: PROTOCOL_VERSION,
                                player_id: self.player_id,
                            },
                        );
                    }

                    ClientMsg::Subscribe { lobby_id } => {
                        if !self.hello_done {
                            self.send_error_and_close(
                                ctx,
                                ErrorCode::BadRequest,
                                "Must send hello first",
                            );
                            return;
                        }
                        self.handle_subscribe(lobby_id, ctx);
                    }

                    ClientMsg::Unsubscribe { lobby_id } => {
                        if !self.hello_done {
                            self.send_error_and_close(
                                ctx,
                                ErrorCode::BadRequest,
                                "Must send hello first",
                            );
                            return;
                        }
                        if let Some(token) = self.subscriptions.remove(&lobby_id) {
                            self.registry.unregister(lobby_id, token);
                        }
                        Self::send_json(ctx, &ServerMsg::Unsubscribed { lobby_id });
                    }
                }
            }
            Ok(ws::Message::Close(reason)) => {
                ctx.close(reason);
                ctx.stop();
            }
            Ok(_) => {}
            Err(err) => {
                warn!(error = %err, conn_id = %self.conn_id, "ws protocol error");
                ctx.stop();
            }
        }
    }
}
