pub mod rest;

use std::fmt;

use async_trait::async_trait;
use serde_json::Value;

use crate::services::session::SessionContext;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Patch => "PATCH",
            Method::Delete => "DELETE",
        }
    }
}

/// One concrete request shape. A fallback candidate list is a `Vec<RequestSpec>`.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestSpec {
    pub method: Method,
    pub path: String,
    pub query: Vec<(String, String)>,
    pub body: Option<Value>,
}

impl RequestSpec {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            body: None,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::Get, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::Post, path)
    }

    pub fn put(path: impl Into<String>) -> Self {
        Self::new(Method::Put, path)
    }

    pub fn patch(path: impl Into<String>) -> Self {
        Self::new(Method::Patch, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::Delete, path)
    }

    pub fn query(mut self, key: &str, value: impl ToString) -> Self {
        self.query.push((key.to_string(), value.to_string()));
        self
    }

    pub fn json(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }
}

impl fmt::Display for RequestSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.method.as_str(), self.path)?;
        if !self.query.is_empty() {
            let pairs: Vec<String> = self.query.iter().map(|(k, v)| format!("{k}={v}")).collect();
            write!(f, "?{}", pairs.join("&"))?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum TransportError {
    /// The server answered with a non-2xx status.
    Status { status: u16, body: Value },
    /// No usable answer: connect/timeout/decode failure.
    Network(String),
}

/// The HTTP collaborator. Implementations inject the session's bearer token.
#[async_trait]
pub trait Backend: Send + Sync {
    async fn send(
        &self,
        session: &dyn SessionContext,
        request: &RequestSpec,
    ) -> Result<Value, TransportError>;
}

/// Percent-encodes an id for use as a path segment.
pub fn segment(id: &str) -> String {
    let mut out = String::with_capacity(id.len());
    for b in id.bytes() {
        match b {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                out.push(b as char)
            }
            _ => out.push_str(&format!("%{b:02X}")),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_includes_query() {
        let spec = RequestSpec::get("/Cars/Get-All")
            .query("pageNumber", 1)
            .query("pageSize", 100);
        assert_eq!(spec.to_string(), "GET /Cars/Get-All?pageNumber=1&pageSize=100");
    }

    #[test]
    fn test_segment_escapes_braces() {
        assert_eq!(segment("{AB-12}"), "%7BAB-12%7D");
        assert_eq!(segment("plain-id_1"), "plain-id_1");
    }
}
