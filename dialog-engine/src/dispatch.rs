use crate::decode::decode;
use crate::request::{RequestDescriptor, ResponseHandler, TransportResponse};
use dialog_core::types::Outcome;

/// The caller's completion handler for one operation.
///
/// `deliver` consumes the value, so a handler cannot run twice.
pub struct Completion<T> {
    callback: Box<dyn FnOnce(Outcome<T>) + Send + 'static>,
}

impl<T> std::fmt::Debug for Completion<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Completion").finish_non_exhaustive()
    }
}

impl<T: Send + 'static> Completion<T> {
    pub fn new<F>(callback: F) -> Self
    where
        F: FnOnce(Outcome<T>) + Send + 'static,
    {
        Self {
            callback: Box::new(callback),
        }
    }

    pub fn deliver(self, outcome: Outcome<T>) {
        (self.callback)(outcome)
    }

    /// Builds the response handler that decodes with `parse` and then delivers.
    pub fn into_response_handler<P>(self, parse: P) -> ResponseHandler
    where
        P: FnOnce(&[u8]) -> anyhow::Result<T> + Send + 'static,
    {
        Box::new(
            move |descriptor: &RequestDescriptor, response: TransportResponse| {
                let outcome = decode(descriptor.operation, &response, parse);
                self.deliver(outcome);
            },
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::Request;
    use dialog_core::types::UploadResult;
    use dialog_providers::parse::parse_upload_response;
    use std::sync::{Arc, Mutex};

    fn upload_request(sink: Arc<Mutex<Vec<Outcome<UploadResult>>>>) -> Request {
        let completion = Completion::new(move |out| sink.lock().unwrap().push(out));
        Request::new(
            RequestDescriptor {
                operation: "UploadDialog",
                function: String::new(),
                forms: None,
            },
            completion.into_response_handler(parse_upload_response),
        )
    }

    #[test]
    fn delivers_decoded_value_once() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        upload_request(seen.clone()).respond(TransportResponse::ok(br#"{"id":"abc123"}"#.to_vec()));

        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert_eq!(
            seen[0],
            Some(UploadResult {
                dialog_id: "abc123".into()
            })
        );
    }

    #[test]
    fn delivers_absent_on_failure() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        upload_request(seen.clone()).respond(TransportResponse::failed());
        assert_eq!(*seen.lock().unwrap(), vec![None]);
    }
}
