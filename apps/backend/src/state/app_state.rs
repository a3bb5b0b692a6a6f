use std::sync::Arc;

use sea_orm::DatabaseConnection;

use super::security_config::SecurityConfig;
use crate::ws::hub::LobbyRegistry;

/// Application state containing shared resources
#[derive(Clone)]
pub struct AppState {
    /// Database connection (optional for test scenarios). Arc rather than the
    /// connection directly: DatabaseConnection is only Clone when sea-orm's
    /// mock feature is off, and dev builds enable it.
    pub db: Option<Arc<DatabaseConnection>>,
    /// Security configuration including JWT settings
    pub security: SecurityConfig,
    /// In-process registry of lobby event subscribers
    pub lobbies: Arc<LobbyRegistry>,
}

impl AppState {
    pub fn new(db: DatabaseConnection, security: SecurityConfig) -> Self {
        Self {
            db: Some(Arc::new(db)),
            security,
            lobbies: Arc::new(LobbyRegistry::new()),
        }
    }

    /// Create an AppState without a database connection (for testing)
    pub fn without_db(security: SecurityConfig) -> Self {
        Self {
            db: None,
            security,
            lobbies: Arc::new(LobbyRegistry::new()),
        }
    }

    pub fn db(&self) -> Option<&DatabaseConnection> {
        self.db.as_deref()
    }

    #[cfg(test)]
    pub fn for_tests(db: DatabaseConnection) -> Self {
        Self::new(db, SecurityConfig::for_tests())
    }

    #[cfg(test)]
    pub fn for_tests_without_db() -> Self {
        Self::without_db(SecurityConfig::for_tests())
    }
}

#[cfg(test)]
mod tests {
    use sea_orm::{DatabaseBackend, MockDatabase};

    use super::*;

    // Mock connections are not Clone, so the state must hold the connection
    // behind an Arc for handlers to clone it.
    #[test]
    fn state_clones_with_mock_connection() {
        let conn = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
        let state = AppState::for_tests(conn);
        let copy = state.clone();
        assert!(copy.db().is_some());
    }

    #[test]
    fn state_clones_without_db() {
        let state = AppState::for_tests_without_db();
        assert!(state.clone().db().is_none());
    }
}
