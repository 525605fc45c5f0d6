use serde_json::Value;

use crate::errors::{classify_status, server_message, ApiError};
use crate::services::http::{Backend, RequestSpec, TransportError};
use crate::services::session::SessionContext;

/// Tries each candidate in order and returns the first successful payload.
///
/// 404/405 and transport failures move on to the next candidate. Auth,
/// validation and any other status abort immediately. Whatever fails on the
/// last candidate is returned as is, except 404/405 which turn into
/// `ApiError::Exhausted` so a missing endpoint never reaches the user.
pub async fn invoke(
    backend: &dyn Backend,
    session: &dyn SessionContext,
    operation: &str,
    candidates: &[RequestSpec],
) -> Result<Value, ApiError> {
    invoke_with(backend, session, operation, candidates, Some)
        .await?
        .ok_or_else(|| ApiError::Exhausted {
            operation: operation.to_string(),
            tried: candidates.iter().map(ToString::to_string).collect(),
        })
}

/// [`invoke`] for reads: `extract` decides whether a 2xx payload holds
/// what the caller wants. A payload it rejects is treated like a 404 and
/// the walk moves on.
///
/// Returns `Ok(None)` when at least one candidate answered but none held
/// anything usable.
pub async fn invoke_with<T, F>(
    backend: &dyn Backend,
    session: &dyn SessionContext,
    operation: &str,
    candidates: &[RequestSpec],
    mut extract: F,
) -> Result<Option<T>, ApiError>
where
    F: FnMut(Value) -> Option<T> + Send,
{
    let mut tried = Vec::with_capacity(candidates.len());
    let mut answered = false;

    for (idx, candidate) in candidates.iter().enumerate() {
        let endpoint = candidate.to_string();
        let is_last = idx + 1 == candidates.len();
        tried.push(endpoint.clone());

        let err = match backend.send(session, candidate).await {
            Ok(body) => match unwrap_envelope(body) {
                Ok(payload) => match extract(payload) {
                    Some(value) => {
                        if idx > 0 {
                            tracing::debug!(operation, endpoint = %endpoint, attempt = idx + 1, "fallback candidate succeeded");
                        }
                        return Ok(Some(value));
                    }
                    None => {
                        answered = true;
                        tracing::debug!(operation, endpoint = %endpoint, "nothing usable in response, trying next");
                        continue;
                    }
                },
                Err(e) => e,
            },
            Err(TransportError::Status { status, body }) => classify_status(&endpoint, status, &body),
            Err(TransportError::Network(msg)) => ApiError::Network(msg),
        };

        match err {
            ApiError::NotFoundEndpoint { status, .. } => {
                tracing::debug!(operation, endpoint = %endpoint, status, "endpoint not available, trying next");
            }
            ApiError::Network(msg) if !is_last => {
                tracing::debug!(operation, endpoint = %endpoint, error = %msg, "network failure, trying next");
            }
            fatal => {
                tracing::warn!(operation, endpoint = %endpoint, kind = fatal.kind(), error = %fatal, "operation failed");
                return Err(fatal);
            }
        }
    }

    if answered {
        tracing::debug!(operation, tried = tried.len(), "no candidate held a usable payload");
        return Ok(None);
    }
    tracing::warn!(operation, tried = tried.len(), "no candidate endpoint succeeded");
    Err(ApiError::Exhausted {
        operation: operation.to_string(),
        tried,
    })
}

/// Strips the backend's `{isSuccess, data, message}` response envelope.
///
/// Bodies without the envelope pass through untouched; list and record
/// shapes are left to the normalizer.
pub fn unwrap_envelope(body: Value) -> Result<Value, ApiError> {
    let flag = ["isSuccess", "IsSuccess", "success", "Success"]
        .iter()
        .find_map(|k| body.get(*k).and_then(Value::as_bool));

    match flag {
        None => Ok(body),
        Some(false) => Err(ApiError::Validation {
            status: 400,
            message: server_message(&body),
        }),
        Some(true) => {
            let mut body = body;
            let data = body
                .as_object_mut()
                .and_then(|o| o.remove("data").or_else(|| o.remove("Data")));
            Ok(data.unwrap_or(Value::Null))
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;
    use std::sync::Mutex;

    use async_trait::async_trait;
    use serde_json::json;

    use super::*;
    use crate::services::session::BearerSession;

    /// Replays scripted responses in order and records every request it saw.
    struct ScriptedBackend {
        responses: Mutex<VecDeque<Result<Value, TransportError>>>,
        seen: Mutex<Vec<String>>,
    }

    impl ScriptedBackend {
        fn new(responses: Vec<Result<Value, TransportError>>) -> Self {
            Self {
                responses: Mutex::new(responses.into()),
                seen: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl Backend for ScriptedBackend {
        async fn send(
            &self,
            _session: &dyn SessionContext,
            request: &RequestSpec,
        ) -> Result<Value, TransportError> {
            self.seen.lock().unwrap().push(request.to_string());
            self.responses
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Err(TransportError::Network("script exhausted".into())))
        }
    }

    fn status(code: u16) -> Result<Value, TransportError> {
        Err(TransportError::Status { status: code, body: json!({}) })
    }

    fn candidates(n: usize) -> Vec<RequestSpec> {
        (0..n).map(|i| RequestSpec::get(format!("/c{i}"))).collect()
    }

    #[tokio::test]
    async fn test_not_found_then_success_returns_second_payload() {
        let backend = ScriptedBackend::new(vec![status(404), Ok(json!([{"id": "b1"}]))]);
        let session = BearerSession::anonymous();
        let payload = invoke(&backend, &session, "list", &candidates(2)).await.unwrap();
        assert_eq!(payload, json!([{"id": "b1"}]));
        assert_eq!(backend.seen.lock().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_success_stops_iteration() {
        let backend = ScriptedBackend::new(vec![Ok(json!({"id": 1})), Ok(json!({"id": 2}))]);
        let session = BearerSession::anonymous();
        let payload = invoke(&backend, &session, "get", &candidates(2)).await.unwrap();
        assert_eq!(payload, json!({"id": 1}));
        assert_eq!(*backend.seen.lock().unwrap(), vec!["GET /c0".to_string()]);
    }

    #[tokio::test]
    async fn test_auth_error_aborts_remaining_candidates() {
        let backend = ScriptedBackend::new(vec![status(405), status(403), Ok(json!({}))]);
        let session = BearerSession::anonymous();
        let err = invoke(&backend, &session, "cancel", &candidates(3)).await.unwrap_err();
        assert!(matches!(err, ApiError::Auth { status: 403, .. }));
        assert_eq!(backend.seen.lock().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_validation_error_is_fatal() {
        let backend = ScriptedBackend::new(vec![
            Err(TransportError::Status { status: 400, body: json!({"message": "Invalid battery level"}) }),
            Ok(json!({})),
        ]);
        let session = BearerSession::anonymous();
        let err = invoke(&backend, &session, "battery", &candidates(2)).await.unwrap_err();
        assert_eq!(err.user_message(), "Invalid battery level");
    }

    #[tokio::test]
    async fn test_network_error_retries_then_surfaces_on_last() {
        let backend = ScriptedBackend::new(vec![
            Err(TransportError::Network("connection reset".into())),
            Err(TransportError::Network("timed out".into())),
        ]);
        let session = BearerSession::anonymous();
        let err = invoke(&backend, &session, "list", &candidates(2)).await.unwrap_err();
        assert_eq!(err, ApiError::Network("timed out".into()));
    }

    #[tokio::test]
    async fn test_all_not_found_is_exhausted() {
        let backend = ScriptedBackend::new(vec![status(404), status(405)]);
        let session = BearerSession::anonymous();
        let err = invoke(&backend, &session, "restore", &candidates(2)).await.unwrap_err();
        match err {
            ApiError::Exhausted { operation, tried } => {
                assert_eq!(operation, "restore");
                assert_eq!(tried, vec!["GET /c0".to_string(), "GET /c1".to_string()]);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_empty_candidate_list_is_exhausted() {
        let backend = ScriptedBackend::new(vec![]);
        let session = BearerSession::anonymous();
        let err = invoke(&backend, &session, "noop", &[]).await.unwrap_err();
        assert!(matches!(err, ApiError::Exhausted { ref tried, .. } if tried.is_empty()));
    }

    #[tokio::test]
    async fn test_server_error_is_fatal_before_last() {
        let backend = ScriptedBackend::new(vec![status(500), Ok(json!({}))]);
        let session = BearerSession::anonymous();
        let err = invoke(&backend, &session, "list", &candidates(2)).await.unwrap_err();
        assert!(matches!(err, ApiError::Unknown { status: 500, .. }));
        assert_eq!(backend.seen.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_empty_payload_moves_to_next_candidate() {
        let backend = ScriptedBackend::new(vec![
            Ok(json!({"data": null})),
            Ok(json!({"id": "v1", "name": "VF8"})),
        ]);
        let session = BearerSession::anonymous();
        let record = invoke_with(&backend, &session, "get_vehicle", &candidates(2), |p| {
            p.get("id").is_some().then_some(p)
        })
        .await
        .unwrap();
        assert_eq!(record, Some(json!({"id": "v1", "name": "VF8"})));
        assert_eq!(backend.seen.lock().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_only_unusable_payloads_is_none() {
        let backend = ScriptedBackend::new(vec![Ok(json!({"data": null})), status(404)]);
        let session = BearerSession::anonymous();
        let record = invoke_with(&backend, &session, "get_vehicle", &candidates(2), |p| {
            p.get("id").is_some().then_some(p)
        })
        .await
        .unwrap();
        assert_eq!(record, None);
        assert_eq!(backend.seen.lock().unwrap().len(), 2);
    }

    #[test]
    fn test_unwrap_envelope() {
        assert_eq!(
            unwrap_envelope(json!({"isSuccess": true, "data": {"id": "x"}})).unwrap(),
            json!({"id": "x"})
        );
        assert_eq!(unwrap_envelope(json!({"data": [1]})).unwrap(), json!({"data": [1]}));
        let err = unwrap_envelope(json!({"isSuccess": false, "errors": ["Car is rented"]})).unwrap_err();
        assert_eq!(err.user_message(), "Car is rented");
    }
}
