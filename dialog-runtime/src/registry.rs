use crate::connector::{HttpExecutor, ReqwestExecutor, RestConnector};
use crate::secrets;
use dialog_core::config::{EndpointConfig, ServiceConfig};
use dialog_engine::{Connector, ConnectorResolver};
use dialog_providers::rest::{Credentials, join_url};
use dialog_providers::runtime::Timeouts;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

#[derive(Debug, Clone)]
struct Endpoint {
    config: EndpointConfig,
    credentials: Option<Credentials>,
}

/// Maps service ids to configured endpoints and hands out connectors for them.
pub struct ConnectorRegistry {
    endpoints: HashMap<String, Endpoint>,
    executor: Arc<dyn HttpExecutor>,
}

impl std::fmt::Debug for ConnectorRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConnectorRegistry")
            .field("endpoints", &self.endpoints)
            .finish_non_exhaustive()
    }
}

impl Default for ConnectorRegistry {
    fn default() -> Self {
        Self::new(Arc::new(ReqwestExecutor))
    }
}

impl ConnectorRegistry {
    pub fn new(executor: Arc<dyn HttpExecutor>) -> Self {
        Self {
            endpoints: HashMap::new(),
            executor,
        }
    }

    /// Builds a registry from `cfg`, reading passwords from the OS keyring
    /// for endpoints that expect one.
    pub fn from_config(cfg: &ServiceConfig) -> anyhow::Result<Self> {
        let mut registry = Self::default();
        for endpoint in &cfg.endpoints {
            let password = if endpoint.password_present {
                secrets::get_password(&endpoint.service_id)?
            } else {
                None
            };
            registry.register(endpoint.clone(), password);
        }
        Ok(registry)
    }

    /// Adds or replaces the endpoint for `config.service_id`.
    ///
    /// Credentials are only sent when the endpoint has a username.
    pub fn register(&mut self, config: EndpointConfig, password: Option<String>) {
        let credentials = config
            .username
            .as_ref()
            .map(|user| Credentials::new(user.clone(), password.unwrap_or_default()));
        self.endpoints.insert(
            config.service_id.clone(),
            Endpoint {
                config,
                credentials,
            },
        );
    }

    pub fn contains(&self, service_id: &str) -> bool {
        self.endpoints.contains_key(service_id)
    }
}

impl ConnectorResolver for ConnectorRegistry {
    fn resolve(&self, service_id: &str, base_path: &str) -> Option<Arc<dyn Connector>> {
        let Some(endpoint) = self.endpoints.get(service_id) else {
            log::warn!("no endpoint configured for service {service_id}");
            return None;
        };

        if let Err(e) = url::Url::parse(&endpoint.config.url) {
            log::warn!(
                "invalid url for service {service_id}: {} ({e})",
                endpoint.config.url
            );
            return None;
        }

        let connector: Arc<dyn Connector> = Arc::new(
            RestConnector::new(
                join_url(&endpoint.config.url, base_path),
                self.executor.clone(),
            )
            .with_credentials(endpoint.credentials.clone())
            .with_timeouts(timeouts(&endpoint.config)),
        );
        Some(connector)
    }
}

fn timeouts(config: &EndpointConfig) -> Timeouts {
    Timeouts {
        connect: Duration::from_secs(config.effective_connect_timeout_secs()),
        total: Duration::from_secs(config.effective_timeout_secs()),
    }
}
