use dialog_core::config::{EndpointConfig, ServiceConfig};
use dialog_engine::SERVICE_ID;

pub const DEFAULT_DIALOG_URL: &str = "https://gateway.watsonplatform.net/dialog/api";

pub fn default_service_config() -> ServiceConfig {
    ServiceConfig {
        endpoints: vec![EndpointConfig::new(SERVICE_ID, DEFAULT_DIALOG_URL)],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_has_dialog_endpoint() {
        let cfg = default_service_config();
        let ep = cfg.endpoint(SERVICE_ID).unwrap();
        assert_eq!(ep.url, DEFAULT_DIALOG_URL);
        assert!(!ep.password_present);
    }
}
