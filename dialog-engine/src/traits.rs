use crate::request::Request;
use std::path::Path;
use std::sync::Arc;

/// Performs requests against one service endpoint.
pub trait Connector: Send + Sync {
    /// Hands `request` off for asynchronous dispatch.
    ///
    /// Returns `true` when the request was accepted. An accepted request has
    /// its response handler invoked exactly once; a rejected one never does.
    fn send(&self, request: Request) -> bool;
}

/// Looks up the connector for a service id and base path.
pub trait ConnectorResolver: Send + Sync {
    fn resolve(&self, service_id: &str, base_path: &str) -> Option<Arc<dyn Connector>>;
}

/// Resolves a file reference to its bytes. `None` means the file could not be loaded.
pub trait FileLoader: Send + Sync {
    fn load(&self, path: &Path) -> Option<Vec<u8>>;
}

impl<F> FileLoader for F
where
    F: Fn(&Path) -> Option<Vec<u8>> + Send + Sync,
{
    fn load(&self, path: &Path) -> Option<Vec<u8>> {
        self(path)
    }
}

/// Reads files from the local filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsFileLoader;

impl FileLoader for FsFileLoader {
    fn load(&self, path: &Path) -> Option<Vec<u8>> {
        match std::fs::read(path) {
            Ok(bytes) => Some(bytes),
            Err(e) => {
                log::error!("read {} failed: {e}", path.display());
                None
            }
        }
    }
}
