const FILE_MIME_TYPE: &str = "application/octet-stream";

#[derive(Clone, PartialEq, Eq)]
pub enum FormValue {
    Text(String),
    File { filename: String, bytes: Vec<u8> },
}

impl std::fmt::Debug for FormValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FormValue::Text(s) => f.debug_tuple("Text").field(s).finish(),
            FormValue::File { filename, bytes } => f
                .debug_struct("File")
                .field("filename", filename)
                .field("bytes_len", &bytes.len())
                .finish(),
        }
    }
}

impl FormValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            FormValue::Text(s) => Some(s),
            FormValue::File { .. } => None,
        }
    }
}

/// Ordered form fields. Setting an existing name replaces its value in place.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Forms {
    fields: Vec<(String, FormValue)>,
}

impl Forms {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(mut self, name: &str, value: impl Into<String>) -> Self {
        self.set(name, FormValue::Text(value.into()));
        self
    }

    pub fn file(mut self, name: &str, filename: impl Into<String>, bytes: Vec<u8>) -> Self {
        self.set(
            name,
            FormValue::File {
                filename: filename.into(),
                bytes,
            },
        );
        self
    }

    pub fn set(&mut self, name: &str, value: FormValue) {
        match self.fields.iter_mut().find(|(k, _)| k == name) {
            Some((_, v)) => *v = value,
            None => self.fields.push((name.to_string(), value)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&FormValue> {
        self.fields.iter().find(|(k, _)| k == name).map(|(_, v)| v)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(k, _)| k.as_str())
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FormValue)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }
}

/// Encodes `forms` as a `multipart/form-data` body with a fresh boundary.
/// Returns the boundary and the body bytes.
pub fn encode_multipart(forms: &Forms) -> (String, Vec<u8>) {
    let boundary = format!("Boundary-{}", uuid::Uuid::new_v4());

    let mut body: Vec<u8> = Vec::new();
    for (name, value) in forms.iter() {
        match value {
            FormValue::Text(text) => append_field(&mut body, &boundary, name, text),
            FormValue::File { filename, bytes } => {
                append_file(&mut body, &boundary, name, filename, FILE_MIME_TYPE, bytes)
            }
        }
    }
    body.extend_from_slice(format!("--{}--\r\n", boundary).as_bytes());

    (boundary, body)
}

/// Percent-encodes the characters that would break out of a quoted
/// `Content-Disposition` parameter.
fn quote_param(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '"' => out.push_str("%22"),
            '\r' => out.push_str("%0D"),
            '\n' => out.push_str("%0A"),
            c => out.push(c),
        }
    }
    out
}

fn append_field(body: &mut Vec<u8>, boundary: &str, name: &str, value: &str) {
    body.extend_from_slice(format!("--{}\r\n", boundary).as_bytes());
    body.extend_from_slice(
        format!(
            "Content-Disposition: form-data; name=\"{}\"\r\n\r\n",
            quote_param(name)
        )
        .as_bytes(),
    );
    body.extend_from_slice(value.as_bytes());
    body.extend_from_slice(b"\r\n");
}

fn append_file(
    body: &mut Vec<u8>,
    boundary: &str,
    name: &str,
    filename: &str,
    mime_type: &str,
    bytes: &[u8],
) {
    body.extend_from_slice(format!("--{}\r\n", boundary).as_bytes());
    body.extend_from_slice(
        format!(
            "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\n",
            quote_param(name),
            quote_param(filename)
        )
        .as_bytes(),
    );
    body.extend_from_slice(format!("Content-Type: {}\r\n\r\n", mime_type).as_bytes());
    body.extend_from_slice(bytes);
    body.extend_from_slice(b"\r\n");
}
