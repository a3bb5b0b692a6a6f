//! Current player extractor.
//!
//! Resolves the JWT claims placed in request extensions by `JwtExtract` into
//! the player row, and refreshes last_active as a side effect. That refresh
//! is the heartbeat contract: any authenticated request marks the player
//! active.

use actix_web::dev::Payload;
use actix_web::{web, FromRequest, HttpMessage, HttpRequest};
use serde::{Deserialize, Serialize};

use crate::auth::jwt::Claims;
use crate::db::require_db;
use crate::db::txn::SharedTxn;
use crate::error::AppError;
use crate::repos::players;
use crate::state::app_state::AppState;

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct CurrentPlayer {
    pub id: i64,
    pub sub: String,
    pub name: String,
}

impl FromRequest for CurrentPlayer {
    type Error = AppError;
    type Future = std::pin::Pin<Box<dyn std::future::Future<Output = Result<Self, Self::Error>>>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let req = req.clone();

        Box::pin(async move {
            let claims = req
                .extensions()
                .get::<Claims>()
                .cloned()
                .ok_or_else(AppError::unauthorized)?;

            let app_state = req
                .app_data::<web::Data<AppState>>()
                .ok_or_else(|| AppError::internal("AppState not available".to_string()))?;

            let shared_txn = req.extensions().get::<SharedTxn>().cloned();

            let player = if let Some(shared) = &shared_txn {
                players::find_by_sub(shared.transaction(), &claims.sub).await?
            } else {
                let db = require_db(app_state)?;
                players::find_by_sub(db, &claims.sub).await?
            };

            // A valid token whose player row is gone means the identity was
            // never registered here; treat it like a bad credential.
            let player = player.ok_or_else(AppError::unauthorized)?;

            if let Some(shared) = &shared_txn {
                players::touch_last_active(shared.transaction(), player.id).await?;
            } else {
                let db = require_db(app_state)?;
                players::touch_last_active(db, player.id).await?;
            }

            Ok(CurrentPlayer {
                id: player.id,
                sub: player.sub,
                name: player.name,
            })
        })
    }
}
