use crate::multipart::Forms;
use crate::request::HttpRequest;
use base64::Engine;

#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    pub fn basic_auth_header(&self) -> String {
        let raw = format!("{}:{}", self.username, self.password);
        format!(
            "Basic {}",
            base64::engine::general_purpose::STANDARD.encode(raw)
        )
    }
}

/// Builds the HTTP request for `function` under `base_url`.
///
/// Without forms this is a GET with an empty body; with forms it is a
/// multipart POST.
pub fn build_rest_request(
    base_url: &str,
    function: &str,
    forms: Option<&Forms>,
    credentials: Option<&Credentials>,
) -> HttpRequest {
    let url = if function.is_empty() {
        base_url.trim_end_matches('/').to_string()
    } else {
        join_url(base_url, function)
    };

    let req = match forms {
        None => HttpRequest::get(url),
        Some(forms) => HttpRequest::post_multipart(url, forms),
    };

    match credentials {
        Some(creds) => req.with_authorization(creds.basic_auth_header()),
        None => req,
    }
}

pub fn join_url(base: &str, path: &str) -> String {
    let base = base.trim_end_matches('/');
    let path = path.trim_start_matches('/');
    format!("{}/{}", base, path)
}
