//! SeaORM -> DomainError translation helpers.
//!
//! Adapters convert `sea_orm::DbErr` into `crate::errors::domain::DomainError`
//! here; higher layers then map `DomainError` to `AppError` via `From`.

use tracing::{error, warn};

use crate::errors::domain::{
    ConflictKind, DomainError, InfraErrorKind, NotFoundKind, ValidationKind,
};
use crate::trace_ctx;

fn mentions_sqlstate(msg: &str, code: &str) -> bool {
    msg.contains(code) || msg.contains(&format!("SQLSTATE({code})"))
}

/// Map Postgres unique-constraint names to domain-specific conflicts.
fn map_unique_constraint_to_conflict(error_msg: &str) -> Option<(ConflictKind, &'static str)> {
    if error_msg.contains("idx_players_sub_unique") {
        return Some((
            ConflictKind::Other("UniqueSub".into()),
            "Identity already registered",
        ));
    }
    if error_msg.contains("ux_lobby_players_lobby_player") {
        return Some((
            ConflictKind::UniqueViolation,
            "Player is already a member of this lobby",
        ));
    }
    if error_msg.contains("idx_lobbies_code_active") {
        return Some((
            ConflictKind::UniqueViolation,
            "Join code was claimed concurrently; retry",
        ));
    }
    None
}

/// Structured payload smuggled through `DbErr::Custom` by the deals adapter
/// when a conditional status update found the row in a different status.
#[derive(serde::Serialize, serde::Deserialize)]
pub struct StatusConflict {
    pub deal_id: i64,
    pub expected: String,
    pub actual: String,
}

pub const STATUS_CONFLICT_PREFIX: &str = "STATUS_CONFLICT:";
pub const DEAL_NOT_FOUND_PREFIX: &str = "DEAL_NOT_FOUND:";

/// Translate a `DbErr` into a `DomainError` with sanitized detail.
pub fn map_db_err(e: sea_orm::DbErr) -> DomainError {
    let error_msg = e.to_string();
    let trace_id = trace_ctx::trace_id();

    match &e {
        sea_orm::DbErr::RecordNotFound(_) => {
            return DomainError::not_found(NotFoundKind::Other("Record".into()), "Record not found");
        }
        sea_orm::DbErr::Custom(msg) if msg.starts_with(DEAL_NOT_FOUND_PREFIX) => {
            // Structured deal-not-found from the deals adapter
            if let Some(deal_id_str) = msg.strip_prefix(DEAL_NOT_FOUND_PREFIX) {
                if let Ok(deal_id) = deal_id_str.parse::<i64>() {
                    warn!(trace_id = %trace_id, deal_id, "Deal not found");
                    return DomainError::not_found(
                        NotFoundKind::Deal,
                        format!("Deal {deal_id} not found"),
                    );
                }
            }
            return DomainError::not_found(NotFoundKind::Deal, "Deal not found");
        }
        sea_orm::DbErr::Custom(msg) if msg.starts_with(STATUS_CONFLICT_PREFIX) => {
            if let Some(json_str) = msg.strip_prefix(STATUS_CONFLICT_PREFIX) {
                if let Ok(info) = serde_json::from_str::<StatusConflict>(json_str) {
                    warn!(
                        trace_id = %trace_id,
                        deal_id = info.deal_id,
                        expected = %info.expected,
                        actual = %info.actual,
                        "Deal status conflict detected"
                    );
                    return DomainError::conflict(
                        ConflictKind::DealStateChanged,
                        format!(
                            "Deal status changed concurrently (expected {}, found {}). Refresh and retry.",
                            info.expected, info.actual
                        ),
                    );
                }
            }
            warn!(trace_id = %trace_id, "Deal status conflict detected (detail unavailable)");
            return DomainError::conflict(
                ConflictKind::DealStateChanged,
                "Deal was modified by another request; please refresh",
            );
        }
        sea_orm::DbErr::ConnectionAcquire(_) | sea_orm::DbErr::Conn(_) => {
            warn!(trace_id = %trace_id, raw_error = %error_msg, "Database unavailable");
            return DomainError::infra(InfraErrorKind::DbUnavailable, "Database unavailable");
        }
        _ => {}
    }

    if mentions_sqlstate(&error_msg, "23505")
        || error_msg.contains("duplicate key value violates unique constraint")
    {
        warn!(trace_id = %trace_id, raw_error = %error_msg, "Unique constraint violation");

        if let Some((kind, detail)) = map_unique_constraint_to_conflict(&error_msg) {
            return DomainError::conflict(kind, detail);
        }
        return DomainError::conflict(ConflictKind::UniqueViolation, "Unique constraint violation");
    }

    if mentions_sqlstate(&error_msg, "23503") {
        warn!(trace_id = %trace_id, raw_error = %error_msg, "Foreign key constraint violation");
        return DomainError::validation(
            ValidationKind::Other("ForeignKey".into()),
            "Foreign key constraint violation",
        );
    }

    if mentions_sqlstate(&error_msg, "23514") {
        warn!(trace_id = %trace_id, raw_error = %error_msg, "Check constraint violation");
        return DomainError::validation(
            ValidationKind::Other("Check".into()),
            "Check constraint violation",
        );
    }

    if error_msg.contains("timeout") || error_msg.contains("pool") {
        warn!(trace_id = %trace_id, raw_error = %error_msg, "Database timeout or pool issue");
        return DomainError::infra(InfraErrorKind::Timeout, "Database timeout");
    }

    error!(trace_id = %trace_id, raw_error = %error_msg, "Unhandled database error");
    DomainError::infra(
        InfraErrorKind::Other("DbErr".into()),
        "Database operation failed",
    )
}

impl From<sea_orm::DbErr> for DomainError {
    fn from(e: sea_orm::DbErr) -> Self {
        map_db_err(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_conflict_custom_err_maps_to_conflict() {
        let payload = serde_json::to_string(&StatusConflict {
            deal_id: 7,
            expected: "pending".into(),
            actual: "accepted".into(),
        })
        .expect("serialize");
        let err = sea_orm::DbErr::Custom(format!("{STATUS_CONFLICT_PREFIX}{payload}"));
        let mapped = map_db_err(err);
        assert!(matches!(
            mapped,
            DomainError::Conflict(ConflictKind::DealStateChanged, _)
        ));
    }

    #[test]
    fn deal_not_found_custom_err_maps_to_not_found() {
        let err = sea_orm::DbErr::Custom(format!("{DEAL_NOT_FOUND_PREFIX}42"));
        let mapped = map_db_err(err);
        match mapped {
            DomainError::NotFound(NotFoundKind::Deal, detail) => {
                assert!(detail.contains("42"));
            }
            other => panic!("unexpected mapping: {other:?}"),
        }
    }

    #[test]
    fn membership_unique_violation_maps_to_conflict() {
        let err = sea_orm::DbErr::Custom(
            "duplicate key value violates unique constraint \"ux_lobby_players_lobby_player\""
                .into(),
        );
        let mapped = map_db_err(err);
        assert!(matches!(
            mapped,
            DomainError::Conflict(ConflictKind::UniqueViolation, _)
        ));
    }

    // Two creates can race past the allocation-time code check; the partial
    // unique index makes the loser surface as a conflict.
    #[test]
    fn concurrent_code_claim_maps_to_conflict() {
        let err = sea_orm::DbErr::Custom(
            "duplicate key value violates unique constraint \"idx_lobbies_code_active\"".into(),
        );
        match map_db_err(err) {
            DomainError::Conflict(ConflictKind::UniqueViolation, detail) => {
                assert!(detail.contains("claimed concurrently"), "detail: {detail}");
            }
            other => panic!("unexpected mapping: {other:?}"),
        }
    }
}
