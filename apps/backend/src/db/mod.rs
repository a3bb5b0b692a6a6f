pub mod txn;

use sea_orm::DatabaseConnection;

use crate::error::AppError;
use crate::state::app_state::AppState;

/// Centralized helper to access the database connection from AppState.
///
/// Returns a borrowed reference to the DatabaseConnection if available, or
/// `AppError::db_unavailable()` if the state was built without one.
pub fn require_db(state: &AppState) -> Result<&DatabaseConnection, AppError> {
    state.db().ok_or_else(AppError::db_unavailable)
}

#[cfg(test)]
mod tests {
    use actix_web::ResponseError;

    use super::*;

    #[test]
    fn require_db_without_db_is_unavailable() {
        let app_state = AppState::for_tests_without_db();

        let result = require_db(&app_state);
        match result {
            Err(AppError::DbUnavailable) => {}
            other => panic!("expected DbUnavailable, got {other:?}"),
        }
    }

    #[test]
    fn require_db_error_maps_to_503() {
        let app_state = AppState::for_tests_without_db();

        let error = require_db(&app_state).expect_err("no db configured");
        let response = error.error_response();
        assert_eq!(
            response.status(),
            actix_web::http::StatusCode::SERVICE_UNAVAILABLE
        );
    }
}
