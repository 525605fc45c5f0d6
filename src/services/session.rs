use std::sync::RwLock;

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;

const STATION_CLAIMS: [&str; 5] = [
    "stationId",
    "StationId",
    "station_id",
    "assignedStationId",
    "AssignedStationId",
];

/// Who is calling the backend. Passed explicitly into every backend call.
pub trait SessionContext: Send + Sync {
    fn token(&self) -> Option<String>;
    fn assigned_station(&self) -> Option<String>;
    fn clear(&self);
}

/// Session backed by a bearer token (usually a JWT issued by the backend).
#[derive(Debug, Default)]
pub struct BearerSession {
    token: RwLock<Option<String>>,
}

impl BearerSession {
    pub fn new(token: Option<String>) -> Self {
        let token = token
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty() && t != "null");
        Self {
            token: RwLock::new(token),
        }
    }

    pub fn anonymous() -> Self {
        Self::default()
    }

    /// Builds a session from an `Authorization` header value, falling back to
    /// the configured service token.
    pub fn from_authorization(header: Option<&str>, fallback: Option<&str>) -> Self {
        let token = header
            .and_then(|h| h.strip_prefix("Bearer ").or_else(|| h.strip_prefix("bearer ")))
            .map(str::to_string)
            .or_else(|| fallback.map(str::to_string));
        Self::new(token)
    }
}

impl SessionContext for BearerSession {
    fn token(&self) -> Option<String> {
        self.token.read().ok().and_then(|t| t.clone())
    }

    fn assigned_station(&self) -> Option<String> {
        let token = self.token()?;
        let claims = decode_claims(&token)?;
        STATION_CLAIMS.iter().find_map(|key| match claims.get(*key)? {
            serde_json::Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
            serde_json::Value::Number(n) => Some(n.to_string()),
            _ => None,
        })
    }

    fn clear(&self) {
        if let Ok(mut token) = self.token.write() {
            *token = None;
        }
    }
}

/// Decodes the payload segment of a JWT without verifying it.
pub fn decode_claims(token: &str) -> Option<serde_json::Value> {
    let payload = token.split('.').nth(1)?;
    let bytes = URL_SAFE_NO_PAD
        .decode(payload.trim_end_matches('='))
        .ok()?;
    serde_json::from_slice(&bytes).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn jwt(claims: serde_json::Value) -> String {
        let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"none"}"#);
        let payload = URL_SAFE_NO_PAD.encode(claims.to_string());
        format!("{header}.{payload}.sig")
    }

    #[test]
    fn test_assigned_station_from_claims() {
        let session = BearerSession::new(Some(jwt(serde_json::json!({"sub": "u1", "StationId": "{ABC-1}"}))));
        assert_eq!(session.assigned_station(), Some("{ABC-1}".to_string()));
    }

    #[test]
    fn test_malformed_token_has_no_station() {
        let session = BearerSession::new(Some("not-a-jwt".to_string()));
        assert_eq!(session.token(), Some("not-a-jwt".to_string()));
        assert_eq!(session.assigned_station(), None);
    }

    #[test]
    fn test_clear_drops_token() {
        let session = BearerSession::new(Some(jwt(serde_json::json!({"stationId": "s1"}))));
        session.clear();
        assert_eq!(session.token(), None);
        assert_eq!(session.assigned_station(), None);
    }

    #[test]
    fn test_from_authorization_prefers_header() {
        let session = BearerSession::from_authorization(Some("Bearer abc"), Some("svc"));
        assert_eq!(session.token(), Some("abc".to_string()));

        let session = BearerSession::from_authorization(None, Some("svc"));
        assert_eq!(session.token(), Some("svc".to_string()));

        let session = BearerSession::from_authorization(Some("Bearer null"), None);
        assert_eq!(session.token(), None);
    }
}
