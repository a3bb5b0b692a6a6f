use actix_web::web;

use crate::middleware::JwtExtract;

pub mod auth;
pub mod deals;
pub mod health;
pub mod lobbies;
pub mod players;
pub mod realtime;

/// Configure application routes.
///
/// Registration is public; everything else under /api requires a valid
/// token. `main.rs` adds CORS and request tracing around the whole app.
pub fn configure(cfg: &mut web::ServiceConfig) {
    // Health check routes: /health
    cfg.service(web::scope("/health").configure(health::configure_routes));

    // Auth routes: /api/auth/** (public: this is where tokens come from)
    cfg.service(web::scope("/api/auth").configure(auth::configure_routes));

    cfg.service(
        web::scope("/api")
            .wrap(JwtExtract)
            .configure(players::configure_routes)
            .configure(lobbies::configure_routes)
            .configure(deals::configure_routes)
            .configure(realtime::configure_routes),
    );
}
