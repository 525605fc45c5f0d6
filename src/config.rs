use std::env;
use std::time::Duration;

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub port: u16,
    pub api_base_url: String,
    pub api_timeout: Duration,
    pub service_token: Option<String>,
    pub list_page_size: u32,
    pub fleet_page_size: u32,
    pub slow_request: Duration,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self {
            port: parse_var("PORT").unwrap_or(3000),
            api_base_url: env::var("API_BASE_URL")
                .map(|v| v.trim_end_matches('/').to_string())
                .unwrap_or_else(|_| "http://localhost:5054/api".to_string()),
            api_timeout: Duration::from_secs(parse_var("API_TIMEOUT_SECS").unwrap_or(10)),
            service_token: env::var("SERVICE_TOKEN")
                .ok()
                .filter(|t| !t.trim().is_empty()),
            list_page_size: parse_var("LIST_PAGE_SIZE").unwrap_or(100),
            fleet_page_size: parse_var("FLEET_PAGE_SIZE").unwrap_or(1000),
            slow_request: Duration::from_millis(parse_var("SLOW_REQUEST_MS").unwrap_or(1500)),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            port: 3000,
            api_base_url: "http://localhost:5054/api".to_string(),
            api_timeout: Duration::from_secs(10),
            service_token: None,
            list_page_size: 100,
            fleet_page_size: 1000,
            slow_request: Duration::from_millis(1500),
        }
    }
}

fn parse_var<T: std::str::FromStr>(key: &str) -> Option<T> {
    env::var(key).ok().and_then(|v| v.trim().parse().ok())
}
