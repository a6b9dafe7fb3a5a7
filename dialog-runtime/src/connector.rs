use async_trait::async_trait;
use dialog_engine::{Connector, Request, TransportResponse};
use dialog_providers::request::HttpRequest;
use dialog_providers::rest::{Credentials, build_rest_request};
use dialog_providers::runtime::{self, HttpResponse, Timeouts};
use std::sync::Arc;

#[async_trait]
pub trait HttpExecutor: Send + Sync {
    async fn execute(&self, req: &HttpRequest, timeouts: Timeouts) -> anyhow::Result<HttpResponse>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ReqwestExecutor;

#[async_trait]
impl HttpExecutor for ReqwestExecutor {
    async fn execute(&self, req: &HttpRequest, timeouts: Timeouts) -> anyhow::Result<HttpResponse> {
        runtime::execute(req, timeouts).await
    }
}

/// Transport connector for one endpoint base URL.
///
/// Requests run on the ambient tokio runtime; `send` refuses them when there
/// is none.
#[derive(Clone)]
pub struct RestConnector {
    base_url: String,
    credentials: Option<Credentials>,
    timeouts: Timeouts,
    executor: Arc<dyn HttpExecutor>,
}

impl std::fmt::Debug for RestConnector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RestConnector")
            .field("base_url", &self.base_url)
            .field("credentials", &self.credentials)
            .field("timeouts", &self.timeouts)
            .finish_non_exhaustive()
    }
}

impl RestConnector {
    pub fn new(base_url: impl Into<String>, executor: Arc<dyn HttpExecutor>) -> Self {
        Self {
            base_url: base_url.into(),
            credentials: None,
            timeouts: Timeouts::default(),
            executor,
        }
    }

    pub fn with_credentials(mut self, credentials: Option<Credentials>) -> Self {
        self.credentials = credentials;
        self
    }

    pub fn with_timeouts(mut self, timeouts: Timeouts) -> Self {
        self.timeouts = timeouts;
        self
    }

    fn http_request(&self, request: &Request) -> HttpRequest {
        build_rest_request(
            &self.base_url,
            &request.descriptor.function,
            request.descriptor.forms.as_ref(),
            self.credentials.as_ref(),
        )
    }
}

impl Connector for RestConnector {
    fn send(&self, request: Request) -> bool {
        let operation = request.descriptor.operation;
        let Ok(handle) = tokio::runtime::Handle::try_current() else {
            log::error!("{operation}: no async runtime available, request not sent");
            return false;
        };

        let http = self.http_request(&request);
        log::debug!("{operation}: {http:?}");

        let executor = self.executor.clone();
        let timeouts = self.timeouts;
        handle.spawn(async move {
            let response = match executor.execute(&http, timeouts).await {
                Ok(resp) if resp.is_success() => TransportResponse::ok(resp.body),
                Ok(resp) => {
                    log::warn!(
                        "{operation} failed: status={} body={}",
                        resp.status,
                        String::from_utf8_lossy(&resp.body)
                    );
                    TransportResponse {
                        success: false,
                        data: resp.body,
                    }
                }
                Err(e) => {
                    log::warn!("{operation} request failed: {e:#}");
                    TransportResponse::failed()
                }
            };
            request.respond(response);
        });
        true
    }
}
