use std::sync::Arc;

use crate::config::AppConfig;
use crate::identity::IdentityVerifier;
use crate::store::RecordStore;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn RecordStore>,
    pub verifier: Arc<dyn IdentityVerifier>,
    pub config: AppConfig,
}
