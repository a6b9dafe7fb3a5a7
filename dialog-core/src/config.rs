use serde::{Deserialize, Serialize};

pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

fn default_connect_timeout_secs() -> u64 {
    DEFAULT_CONNECT_TIMEOUT_SECS
}

/// Where a remote service lives and how to authenticate against it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EndpointConfig {
    pub service_id: String,
    pub url: String,
    #[serde(default)]
    pub username: Option<String>,

    // Secrets are stored outside this struct at rest.
    #[serde(default)]
    pub password_present: bool,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,
}

impl EndpointConfig {
    pub fn new(service_id: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            service_id: service_id.into(),
            url: url.into(),
            username: None,
            password_present: false,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            connect_timeout_secs: DEFAULT_CONNECT_TIMEOUT_SECS,
        }
    }

    pub fn with_username(mut self, username: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self
    }

    /// Request timeout in seconds; 0 falls back to the default.
    pub fn effective_timeout_secs(&self) -> u64 {
        non_zero_or(self.timeout_secs, DEFAULT_TIMEOUT_SECS)
    }

    /// Connect timeout in seconds; 0 falls back to the default.
    pub fn effective_connect_timeout_secs(&self) -> u64 {
        non_zero_or(self.connect_timeout_secs, DEFAULT_CONNECT_TIMEOUT_SECS)
    }
}

fn non_zero_or(value: u64, default: u64) -> u64 {
    if value == 0 { default } else { value }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceConfig {
    pub endpoints: Vec<EndpointConfig>,
}

impl ServiceConfig {
    pub fn endpoint(&self, service_id: &str) -> Option<&EndpointConfig> {
        self.endpoints.iter().find(|e| e.service_id == service_id)
    }

    /// Inserts `endpoint`, replacing any existing entry with the same service id.
    pub fn upsert(&mut self, endpoint: EndpointConfig) {
        match self
            .endpoints
            .iter_mut()
            .find(|e| e.service_id == endpoint.service_id)
        {
            Some(existing) => *existing = endpoint,
            None => self.endpoints.push(endpoint),
        }
    }
}
