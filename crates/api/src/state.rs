use std::sync::Arc;

use crate::config::ServerConfig;

/// State handed to every handler through `State<AppState>`. Cloned per
/// request, so everything inside is a cheap handle.
#[derive(Clone)]
pub struct AppState {
    pub pool: gearbook_db::DbPool,
    pub config: Arc<ServerConfig>,
}
