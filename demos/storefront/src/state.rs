// demos/storefront/src/state.rs

use crate::config::AppConfig;
use crate::sessions::SessionRegistry;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
  pub sessions: Arc<SessionRegistry>,
  pub config: Arc<AppConfig>,
}
