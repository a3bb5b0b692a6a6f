//! WebSocket upgrade endpoint.
//!
//! GET /api/ws upgrades to a lobby event stream. Browsers cannot set an
//! Authorization header on a WebSocket handshake, so `JwtExtract` also
//! accepts a `?token=` query parameter on this route.

use actix_web::web;

use crate::ws::session;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/ws", web::get().to(session::upgrade));
}
