pub mod config_store;
pub mod connector;
pub mod defaults;
pub mod registry;
pub mod secrets;

pub use config_store::ConfigStore;
pub use connector::{HttpExecutor, ReqwestExecutor, RestConnector};
pub use registry::ConnectorRegistry;
