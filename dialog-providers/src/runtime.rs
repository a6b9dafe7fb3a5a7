use crate::request::{Body, HttpRequest, Method};
use anyhow::Context;
use dialog_core::config::{DEFAULT_CONNECT_TIMEOUT_SECS, DEFAULT_TIMEOUT_SECS};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..=299).contains(&self.status)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timeouts {
    pub connect: Duration,
    pub total: Duration,
}

impl Default for Timeouts {
    fn default() -> Self {
        Self {
            connect: Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS),
            total: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

pub async fn execute(req: &HttpRequest, timeouts: Timeouts) -> anyhow::Result<HttpResponse> {
    // Without an explicit timeout a broken endpoint would leave the
    // completion handler pending forever.
    let client = reqwest::Client::builder()
        .connect_timeout(timeouts.connect)
        .timeout(timeouts.total)
        .build()
        .context("build http client")?;

    let mut headers = HeaderMap::new();
    for (k, v) in &req.headers {
        let name = HeaderName::from_bytes(k.as_bytes())
            .with_context(|| format!("invalid header name: {k}"))?;
        let value =
            HeaderValue::from_str(v).with_context(|| format!("invalid header value for {k}"))?;
        headers.insert(name, value);
    }

    let builder = match req.method {
        Method::Get => client.get(&req.url),
        Method::Post => client.post(&req.url),
    }
    .headers(headers);

    let builder = match &req.body {
        Body::Empty => builder,
        Body::MultipartFormData { bytes, .. } => builder.body(bytes.clone()),
    };

    let resp = builder.send().await.context("http request failed")?;
    let status = resp.status().as_u16();
    let body = resp
        .bytes()
        .await
        .context("failed reading response body")?
        .to_vec();

    Ok(HttpResponse { status, body })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::multipart::Forms;
    use crate::rest::build_rest_request;
    use wiremock::matchers::{body_string_contains, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn sends_multipart_post_and_returns_status_and_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/dialogs/d1/conversation"))
            .and(header("accept", "application/json"))
            .and(body_string_contains("hello"))
            .respond_with(ResponseTemplate::new(201).set_body_raw(r#"{"ok":1}"#, "application/json"))
            .mount(&server)
            .await;

        let forms = Forms::new().text("input", "hello");
        let req = build_rest_request(
            &format!("{}/v1/dialogs", server.uri()),
            "/d1/conversation",
            Some(&forms),
            None,
        );
        let resp = execute(&req, Timeouts::default()).await.unwrap();
        assert_eq!(resp.status, 201);
        assert!(resp.is_success());
        assert_eq!(resp.body, br#"{"ok":1}"#);
    }

    #[test]
    fn only_2xx_is_success() {
        let mk = |status| HttpResponse {
            status,
            body: vec![],
        };
        assert!(mk(200).is_success());
        assert!(mk(299).is_success());
        assert!(!mk(404).is_success());
        assert!(!mk(500).is_success());
    }
}
