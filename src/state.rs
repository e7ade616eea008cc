use std::sync::Arc;

use crate::config::Config;
use crate::session::SessionRegistry;

pub type SharedState = Arc<AppState>;

pub struct AppState {
    pub config: Config,
    pub sessions: Arc<SessionRegistry>,
}
