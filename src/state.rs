use std::sync::Arc;

use axum::http::{header, HeaderMap};

use crate::config::AppConfig;
use crate::services::http::Backend;
use crate::services::session::BearerSession;
use crate::services::ApiContext;

pub struct AppState {
    pub config: Arc<AppConfig>,
    pub backend: Arc<dyn Backend>,
}

impl AppState {
    pub fn new(config: AppConfig, backend: Arc<dyn Backend>) -> Self {
        Self {
            config: Arc::new(config),
            backend,
        }
    }

    /// Per-request context: the caller's bearer token, else the service token.
    pub fn context(&self, headers: &HeaderMap) -> ApiContext {
        let authorization = headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok());
        let session = BearerSession::from_authorization(
            authorization,
            self.config.service_token.as_deref(),
        );
        ApiContext::new(
            Arc::clone(&self.backend),
            Arc::new(session),
            Arc::clone(&self.config),
        )
    }
}
