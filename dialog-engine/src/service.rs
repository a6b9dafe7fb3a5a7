use crate::dispatch::Completion;
use crate::request::{Request, RequestDescriptor};
use crate::traits::{Connector, ConnectorResolver, FileLoader, FsFileLoader};
use dialog_core::error::{DialogError, require_non_empty};
use dialog_core::types::{ConversationContext, ConversationTurn, DialogList, Outcome, UploadResult};
use dialog_providers::multipart::Forms;
use dialog_providers::parse::{parse_conversation_turn, parse_dialog_list, parse_upload_response};
use std::path::Path;
use std::sync::Arc;

pub const SERVICE_ID: &str = "DialogV1";
pub const BASE_PATH: &str = "/v1/dialogs";

const OP_GET_DIALOGS: &str = "GetDialogs";
const OP_UPLOAD_DIALOG: &str = "UploadDialog";
const OP_CONVERSE: &str = "Converse";

/// Client for the dialog service.
///
/// Every operation returns `Ok(true)` once its request was handed to the
/// connector, `Ok(false)` when nothing was dispatched, and `Err` for invalid
/// arguments. Only dispatched operations call `on_complete`, exactly once.
/// The service keeps no per-call state.
#[derive(Clone)]
pub struct DialogService {
    resolver: Arc<dyn ConnectorResolver>,
    file_loader: Arc<dyn FileLoader>,
}

impl DialogService {
    pub fn new(resolver: Arc<dyn ConnectorResolver>) -> Self {
        Self {
            resolver,
            file_loader: Arc::new(FsFileLoader),
        }
    }

    /// Replaces the hook used to read dialog files for upload.
    pub fn with_file_loader(mut self, file_loader: Arc<dyn FileLoader>) -> Self {
        self.file_loader = file_loader;
        self
    }

    /// Lists all dialogs available on the service.
    pub fn list_dialogs<F>(&self, on_complete: F) -> Result<bool, DialogError>
    where
        F: FnOnce(Outcome<DialogList>) + Send + 'static,
    {
        let Some(connector) = self.connector() else {
            return Ok(false);
        };

        let request = Request::new(
            RequestDescriptor {
                operation: OP_GET_DIALOGS,
                function: String::new(),
                forms: None,
            },
            Completion::new(on_complete).into_response_handler(parse_dialog_list),
        );
        Ok(connector.send(request))
    }

    /// Uploads a dialog named `name`, with the contents of `file` when given.
    pub fn upload_dialog<F>(
        &self,
        name: &str,
        file: Option<&Path>,
        on_complete: F,
    ) -> Result<bool, DialogError>
    where
        F: FnOnce(Outcome<UploadResult>) + Send + 'static,
    {
        require_non_empty("name", name)?;

        let mut forms = Forms::new().text("name", name);
        if let Some(path) = file {
            let Some(bytes) = self.file_loader.load(path) else {
                log::error!("failed to load dialog file data {}", path.display());
                return Ok(false);
            };
            let filename = path
                .file_name()
                .map(|f| f.to_string_lossy().into_owned())
                .unwrap_or_default();
            forms = forms.file("file", filename, bytes);
        }

        let Some(connector) = self.connector() else {
            return Ok(false);
        };

        let request = Request::new(
            RequestDescriptor {
                operation: OP_UPLOAD_DIALOG,
                function: String::new(),
                forms: Some(forms),
            },
            Completion::new(on_complete).into_response_handler(parse_upload_response),
        );
        Ok(connector.send(request))
    }

    /// Sends one line of user input to `dialog_id`.
    ///
    /// Zero ids in `context` are left out of the request so the service
    /// starts a new conversation or assigns a client id.
    pub fn converse<F>(
        &self,
        dialog_id: &str,
        input: &str,
        context: ConversationContext,
        on_complete: F,
    ) -> Result<bool, DialogError>
    where
        F: FnOnce(Outcome<ConversationTurn>) + Send + 'static,
    {
        require_non_empty("dialog_id", dialog_id)?;
        require_non_empty("input", input)?;

        let Some(connector) = self.connector() else {
            return Ok(false);
        };

        let request = Request::new(
            RequestDescriptor {
                operation: OP_CONVERSE,
                function: format!("/{dialog_id}/conversation"),
                forms: Some(converse_forms(input, context)),
            },
            Completion::new(on_complete).into_response_handler(parse_conversation_turn),
        );
        Ok(connector.send(request))
    }

    fn connector(&self) -> Option<Arc<dyn Connector>> {
        let connector = self.resolver.resolve(SERVICE_ID, BASE_PATH);
        if connector.is_none() {
            log::warn!("no connector for {SERVICE_ID}{BASE_PATH}");
        }
        connector
    }
}

fn converse_forms(input: &str, context: ConversationContext) -> Forms {
    let mut forms = Forms::new().text("input", input);
    if context.conversation_id != 0 {
        forms = forms.text("conversation_id", context.conversation_id.to_string());
    }
    if context.client_id != 0 {
        forms = forms.text("client_id", context.client_id.to_string());
    }
    forms
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::TransportResponse;
    use dialog_providers::multipart::FormValue;
    use std::sync::Mutex;

    /// Answers every request synchronously with a fixed response.
    struct CannedConnector {
        response: TransportResponse,
        sent: Mutex<Vec<RequestDescriptor>>,
    }

    impl Connector for CannedConnector {
        fn send(&self, request: Request) -> bool {
            self.sent.lock().unwrap().push(request.descriptor.clone());
            request.respond(self.response.clone());
            true
        }
    }

    struct Fixed(Option<Arc<CannedConnector>>);

    impl ConnectorResolver for Fixed {
        fn resolve(&self, service_id: &str, base_path: &str) -> Option<Arc<dyn Connector>> {
            assert_eq!(service_id, SERVICE_ID);
            assert_eq!(base_path, BASE_PATH);
            self.0.clone().map(|c| c as Arc<dyn Connector>)
        }
    }

    fn service(body: &[u8]) -> (DialogService, Arc<CannedConnector>) {
        let connector = Arc::new(CannedConnector {
            response: TransportResponse::ok(body.to_vec()),
            sent: Mutex::new(Vec::new()),
        });
        let svc = DialogService::new(Arc::new(Fixed(Some(connector.clone()))));
        (svc, connector)
    }

    #[test]
    fn list_sends_bodyless_request_to_base_path() {
        let (svc, connector) = service(br#"{"dialogs":[]}"#);
        let seen = Arc::new(Mutex::new(None));
        let sink = seen.clone();

        assert_eq!(svc.list_dialogs(move |out| *sink.lock().unwrap() = Some(out)), Ok(true));

        let sent = connector.sent.lock().unwrap();
        assert_eq!(sent[0].function, "");
        assert_eq!(sent[0].forms, None);
        assert_eq!(sent[0].operation, "GetDialogs");
        assert_eq!(*seen.lock().unwrap(), Some(Some(DialogList::default())));
    }

    #[test]
    fn upload_attaches_file_under_its_base_name() {
        let loader = |p: &Path| {
            assert_eq!(p, Path::new("/dialogs/pizza.xml"));
            Some(b"<dialog/>".to_vec())
        };
        let (svc, connector) = service(br#"{"id":"abc123"}"#);
        let svc = svc.with_file_loader(Arc::new(loader));

        let dispatched = svc
            .upload_dialog("pizza", Some(Path::new("/dialogs/pizza.xml")), |_| {})
            .unwrap();
        assert!(dispatched);

        let sent = connector.sent.lock().unwrap();
        let forms = sent[0].forms.as_ref().unwrap();
        assert_eq!(forms.get("name").and_then(FormValue::as_text), Some("pizza"));
        assert_eq!(
            forms.get("file"),
            Some(&FormValue::File {
                filename: "pizza.xml".into(),
                bytes: b"<dialog/>".to_vec(),
            })
        );
    }

    #[test]
    fn zero_byte_file_is_still_uploaded() {
        let (svc, connector) = service(br#"{"id":"abc123"}"#);
        let svc = svc.with_file_loader(Arc::new(|_: &Path| Some(Vec::new())));

        assert_eq!(
            svc.upload_dialog("empty", Some(Path::new("/dialogs/empty.xml")), |_| {}),
            Ok(true)
        );

        let sent = connector.sent.lock().unwrap();
        let forms = sent[0].forms.as_ref().unwrap();
        assert_eq!(
            forms.get("file"),
            Some(&FormValue::File {
                filename: "empty.xml".into(),
                bytes: Vec::new(),
            })
        );
    }

    #[test]
    fn upload_without_file_sends_only_name() {
        let (svc, connector) = service(br#"{"id":"abc123"}"#);
        assert_eq!(svc.upload_dialog("pizza", None, |_| {}), Ok(true));
        let sent = connector.sent.lock().unwrap();
        let forms = sent[0].forms.as_ref().unwrap();
        assert_eq!(forms.names().collect::<Vec<_>>(), vec!["name"]);
    }

    #[test]
    fn converse_targets_dialog_sub_resource() {
        let (svc, connector) = service(b"{}");
        svc.converse("d1", "hello", ConversationContext::default(), |_| {})
            .unwrap();
        let sent = connector.sent.lock().unwrap();
        assert_eq!(sent[0].function, "/d1/conversation");
        assert_eq!(sent[0].operation, "Converse");
    }

    #[test]
    fn converse_forms_omit_zero_ids() {
        let forms = converse_forms("hi", ConversationContext::new(0, 0));
        assert_eq!(forms.names().collect::<Vec<_>>(), vec!["input"]);

        let forms = converse_forms("hi", ConversationContext::new(12, 0));
        assert_eq!(
            forms.get("conversation_id").and_then(FormValue::as_text),
            Some("12")
        );
        assert!(!forms.contains("client_id"));

        let forms = converse_forms("hi", ConversationContext::new(0, -3));
        assert!(!forms.contains("conversation_id"));
        assert_eq!(forms.get("client_id").and_then(FormValue::as_text), Some("-3"));
    }

    #[test]
    fn missing_connector_is_not_dispatched() {
        let svc = DialogService::new(Arc::new(Fixed(None)));
        let called = Arc::new(Mutex::new(false));
        let flag = called.clone();
        assert_eq!(
            svc.list_dialogs(move |_| *flag.lock().unwrap() = true),
            Ok(false)
        );
        assert!(!*called.lock().unwrap());
    }

    #[test]
    fn invalid_arguments_fail_before_resolving() {
        struct Unreachable;
        impl ConnectorResolver for Unreachable {
            fn resolve(&self, _: &str, _: &str) -> Option<Arc<dyn Connector>> {
                panic!("resolved connector for an invalid call");
            }
        }
        let svc = DialogService::new(Arc::new(Unreachable));

        assert_eq!(
            svc.upload_dialog("", None, |_| {}),
            Err(DialogError::invalid_argument("name"))
        );
        assert_eq!(
            svc.converse("", "hi", ConversationContext::default(), |_| {}),
            Err(DialogError::invalid_argument("dialog_id"))
        );
        assert_eq!(
            svc.converse("d1", "", ConversationContext::default(), |_| {}),
            Err(DialogError::invalid_argument("input"))
        );
    }
}
