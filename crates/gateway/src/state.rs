//! Application state shared across handlers.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use crud::Database;
use users::{UserManager, UserService, UserStore};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub users: Arc<dyn UserService>,
    /// Cancelled once the shutdown grace period ends
    pub shutdown: CancellationToken,
}

impl AppState {
    /// Wire the user service onto the given database.
    pub fn new(db: Database, shutdown: CancellationToken) -> Self {
        let store = UserStore::new(db.get_connection());
        let users = Arc::new(UserManager::new(Arc::new(store)));
        Self::with_users(db, users, shutdown)
    }

    pub fn with_users(db: Database, users: Arc<dyn UserService>, shutdown: CancellationToken) -> Self {
        Self {
            db,
            users,
            shutdown,
        }
    }

    /// Token for one request; cancelled with the server.
    pub fn request_token(&self) -> CancellationToken {
        self.shutdown.child_token()
    }
}
