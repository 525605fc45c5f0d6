use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

const GENERIC_VALIDATION: &str = "The request was rejected by the server.";
const GENERIC_UNKNOWN: &str = "Something went wrong. Please try again.";
const GENERIC_NETWORK: &str = "The server could not be reached. Please try again.";

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ApiError {
    /// 404/405 from a candidate endpoint. Absorbed by the fallback invoker.
    #[error("endpoint not found ({status}): {endpoint}")]
    NotFoundEndpoint { endpoint: String, status: u16 },

    #[error("not permitted ({status}): {message}")]
    Auth { status: u16, message: String },

    #[error("validation failed ({status}): {}", .message.as_deref().unwrap_or(GENERIC_VALIDATION))]
    Validation { status: u16, message: Option<String> },

    #[error("network error: {0}")]
    Network(String),

    #[error("unexpected backend response ({status}): {message}")]
    Unknown { status: u16, message: String },

    #[error("no candidate endpoint succeeded for {operation} (tried {})", .tried.join(" | "))]
    Exhausted {
        operation: String,
        tried: Vec<String>,
    },

    /// Every candidate answered, but none of them held the requested record.
    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: String },

    #[error("load cycle cancelled before commit")]
    Cancelled,

    #[error("{0} is required")]
    MissingArgument(&'static str),
}

impl ApiError {
    pub fn kind(&self) -> &'static str {
        match self {
            ApiError::NotFoundEndpoint { .. } => "not_found_endpoint",
            ApiError::Auth { .. } => "auth",
            ApiError::Validation { .. } => "validation",
            ApiError::Network(_) => "network",
            ApiError::Unknown { .. } => "unknown",
            ApiError::Exhausted { .. } => "exhausted",
            ApiError::NotFound { .. } => "not_found",
            ApiError::Cancelled => "cancelled",
            ApiError::MissingArgument(_) => "missing_argument",
        }
    }

    /// Text for the single top-level banner a view shows for a failed operation.
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Auth { .. } => {
                "You don't have permission to perform this action.".to_string()
            }
            ApiError::Validation { message, .. } => message
                .clone()
                .unwrap_or_else(|| GENERIC_VALIDATION.to_string()),
            ApiError::Network(_) => GENERIC_NETWORK.to_string(),
            ApiError::MissingArgument(_) | ApiError::NotFound { .. } => self.to_string(),
            _ => GENERIC_UNKNOWN.to_string(),
        }
    }

    /// Fatal errors abort a candidate list; the rest may be retried on the next candidate.
    pub fn is_fatal(&self) -> bool {
        !matches!(
            self,
            ApiError::NotFoundEndpoint { .. } | ApiError::Network(_)
        )
    }
}

/// Pulls a human readable message out of an error body, the way the backend
/// reports it (`message`, `title`, `error`, or an `errors` list/map).
pub fn server_message(body: &serde_json::Value) -> Option<String> {
    if let Some(s) = body.as_str() {
        let s = s.trim();
        return (!s.is_empty()).then(|| s.to_string());
    }

    for key in ["message", "Message", "title", "error", "detail"] {
        if let Some(s) = body.get(key).and_then(|v| v.as_str()) {
            if !s.trim().is_empty() {
                return Some(s.trim().to_string());
            }
        }
    }

    let errors = body.get("errors").or_else(|| body.get("Errors"))?;
    let mut parts = Vec::new();
    match errors {
        serde_json::Value::Array(items) => {
            parts.extend(items.iter().filter_map(|v| v.as_str().map(str::to_string)));
        }
        serde_json::Value::Object(fields) => {
            for value in fields.values() {
                match value {
                    serde_json::Value::Array(items) => parts
                        .extend(items.iter().filter_map(|v| v.as_str().map(str::to_string))),
                    serde_json::Value::String(s) => parts.push(s.clone()),
                    _ => {}
                }
            }
        }
        _ => {}
    }
    (!parts.is_empty()).then(|| parts.join("; "))
}

/// Maps a non-2xx backend status onto the error taxonomy.
pub fn classify_status(endpoint: &str, status: u16, body: &serde_json::Value) -> ApiError {
    match status {
        404 | 405 => ApiError::NotFoundEndpoint {
            endpoint: endpoint.to_string(),
            status,
        },
        401 | 403 => ApiError::Auth {
            status,
            message: server_message(body).unwrap_or_else(|| "unauthorized".to_string()),
        },
        400 | 422 => ApiError::Validation {
            status,
            message: server_message(body),
        },
        _ => ApiError::Unknown {
            status,
            message: server_message(body).unwrap_or_else(|| format!("HTTP {status}")),
        },
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::Auth { status, .. } | ApiError::Validation { status, .. } => {
                StatusCode::from_u16(*status).unwrap_or(StatusCode::BAD_REQUEST)
            }
            ApiError::NotFoundEndpoint { .. } | ApiError::NotFound { .. } => StatusCode::NOT_FOUND,
            ApiError::Network(_) | ApiError::Unknown { .. } | ApiError::Exhausted { .. } => {
                StatusCode::BAD_GATEWAY
            }
            ApiError::Cancelled => StatusCode::CONFLICT,
            ApiError::MissingArgument(_) => StatusCode::BAD_REQUEST,
        };

        let body = serde_json::json!({ "error": self.user_message(), "kind": self.kind() });
        (status, axum::Json(body)).into_response()
    }
}
