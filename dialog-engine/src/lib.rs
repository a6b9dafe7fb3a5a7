pub mod decode;
pub mod dispatch;
pub mod request;
pub mod service;
pub mod traits;

pub use dispatch::Completion;
pub use request::{Request, RequestDescriptor, ResponseHandler, TransportResponse};
pub use service::{BASE_PATH, DialogService, SERVICE_ID};
pub use traits::{Connector, ConnectorResolver, FileLoader, FsFileLoader};
