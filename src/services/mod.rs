pub mod bookings;
pub mod cycle;
pub mod enrichment;
pub mod fallback;
pub mod fleet;
pub mod http;
pub mod normalize;
pub mod session;
pub mod stations;
pub mod users;
pub mod vehicles;

use std::sync::Arc;

use serde_json::Value;

use crate::config::AppConfig;
use crate::errors::ApiError;
use crate::services::http::{Backend, RequestSpec};
use crate::services::normalize::{list_of, pick_string, same_id, unwrap_record};
use crate::services::session::SessionContext;

/// Everything an operation needs to talk to the backend on behalf of one caller.
#[derive(Clone)]
pub struct ApiContext {
    pub backend: Arc<dyn Backend>,
    pub session: Arc<dyn SessionContext>,
    pub config: Arc<AppConfig>,
}

impl ApiContext {
    pub fn new(
        backend: Arc<dyn Backend>,
        session: Arc<dyn SessionContext>,
        config: Arc<AppConfig>,
    ) -> Self {
        Self {
            backend,
            session,
            config,
        }
    }

    pub async fn invoke(&self, operation: &str, candidates: &[RequestSpec]) -> Result<Value, ApiError> {
        fallback::invoke(self.backend.as_ref(), self.session.as_ref(), operation, candidates).await
    }

    /// A candidate answering with something that is not a list is skipped.
    /// If every answer was like that the read is empty.
    pub async fn fetch_list(&self, operation: &str, candidates: &[RequestSpec]) -> Result<Vec<Value>, ApiError> {
        let items = fallback::invoke_with(
            self.backend.as_ref(),
            self.session.as_ref(),
            operation,
            candidates,
            list_of,
        )
        .await?;
        Ok(items.unwrap_or_default())
    }

    pub async fn fetch_record(
        &self,
        operation: &str,
        candidates: &[RequestSpec],
        id_aliases: &[&str],
        id: &str,
    ) -> Result<Option<Value>, ApiError> {
        fallback::invoke_with(
            self.backend.as_ref(),
            self.session.as_ref(),
            operation,
            candidates,
            |payload| unwrap_record(payload, id_aliases, Some(id)),
        )
        .await
    }
}

/// Rejects blank ids before any request goes out.
pub fn require<'a>(value: &'a str, what: &'static str) -> Result<&'a str, ApiError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        Err(ApiError::MissingArgument(what))
    } else {
        Ok(trimmed)
    }
}

/// Lookup results for enrichment: a missing record is not an error.
pub(crate) fn found<T>(result: Result<T, ApiError>) -> Result<Option<T>, ApiError> {
    match result {
        Ok(v) => Ok(Some(v)),
        Err(ApiError::NotFound { .. }) | Err(ApiError::Exhausted { .. }) => Ok(None),
        Err(e) => Err(e),
    }
}

/// The record a write answered with, if it is the one that was written.
/// Anything else (an ack, a payment, the station) means the caller reads it back.
pub(crate) fn written_record(payload: Value, id_aliases: &[&str], id: &str) -> Option<Value> {
    unwrap_record(payload, id_aliases, Some(id))
        .filter(|raw| pick_string(raw, id_aliases).is_some_and(|found| same_id(&found, id)))
}
