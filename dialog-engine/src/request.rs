use dialog_providers::multipart::Forms;

/// Raw outcome reported by a connector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportResponse {
    pub success: bool,
    pub data: Vec<u8>,
}

impl TransportResponse {
    pub fn ok(data: impl Into<Vec<u8>>) -> Self {
        Self {
            success: true,
            data: data.into(),
        }
    }

    pub fn failed() -> Self {
        Self {
            success: false,
            data: Vec::new(),
        }
    }
}

/// What to request, relative to the connector's base path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestDescriptor {
    /// Operation tag used in logs.
    pub operation: &'static str,
    /// Sub-path under the connector's base path; empty for the base itself.
    pub function: String,
    /// `None` means a body-less GET.
    pub forms: Option<Forms>,
}

pub type ResponseHandler = Box<dyn FnOnce(&RequestDescriptor, TransportResponse) + Send + 'static>;

/// A descriptor bound to the handler that consumes its response.
pub struct Request {
    pub descriptor: RequestDescriptor,
    on_response: ResponseHandler,
}

impl std::fmt::Debug for Request {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Request")
            .field("descriptor", &self.descriptor)
            .finish_non_exhaustive()
    }
}

impl Request {
    pub fn new(descriptor: RequestDescriptor, on_response: ResponseHandler) -> Self {
        Self {
            descriptor,
            on_response,
        }
    }

    /// Delivers the transport outcome. Consumes the request, so it runs at most once.
    pub fn respond(self, response: TransportResponse) {
        (self.on_response)(&self.descriptor, response)
    }
}
