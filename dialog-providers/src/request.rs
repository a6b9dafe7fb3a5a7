use crate::multipart::{Forms, encode_multipart};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
}

/// A request against the dialog service: a body-less GET or a multipart POST,
/// both asking for JSON back.
#[derive(Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub method: Method,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Body,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Body {
    Empty,
    MultipartFormData { boundary: String, bytes: Vec<u8> },
}

impl std::fmt::Debug for HttpRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let headers: Vec<(&str, &str)> = self
            .headers
            .iter()
            .map(|(k, v)| {
                if k.eq_ignore_ascii_case("authorization") {
                    (k.as_str(), "[REDACTED]")
                } else {
                    (k.as_str(), v.as_str())
                }
            })
            .collect();

        let body = match &self.body {
            Body::Empty => "Empty".to_string(),
            Body::MultipartFormData { bytes, .. } => format!("Multipart({} bytes)", bytes.len()),
        };

        f.debug_struct("HttpRequest")
            .field("method", &self.method)
            .field("url", &self.url)
            .field("headers", &headers)
            .field("body", &body)
            .finish()
    }
}

impl HttpRequest {
    pub fn get(url: impl Into<String>) -> Self {
        Self {
            method: Method::Get,
            url: url.into(),
            headers: vec![("Accept".into(), "application/json".into())],
            body: Body::Empty,
        }
    }

    /// POST with `forms` encoded as `multipart/form-data`.
    pub fn post_multipart(url: impl Into<String>, forms: &Forms) -> Self {
        let (boundary, bytes) = encode_multipart(forms);
        let mut req = Self::get(url);
        req.method = Method::Post;
        req.headers.push((
            "Content-Type".into(),
            format!("multipart/form-data; boundary={boundary}"),
        ));
        req.body = Body::MultipartFormData { boundary, bytes };
        req
    }

    pub fn with_authorization(mut self, value: String) -> Self {
        self.headers.push(("Authorization".into(), value));
        self
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}
