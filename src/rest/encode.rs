use bytes::{BufMut, Bytes, BytesMut};

/// A resolved request part: plain text field or file content for upload.
///
/// File paths are resolved to bytes by the client before encoding, so the
/// functions here stay pure and deterministic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BodyPart {
    Field {
        key: String,
        value: String,
    },
    File {
        key: String,
        filename: String,
        content: Bytes,
    },
}

impl BodyPart {
    pub fn field(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self::Field {
            key: key.into(),
            value: value.into(),
        }
    }

    pub fn file(key: impl Into<String>, filename: impl Into<String>, content: Bytes) -> Self {
        Self::File {
            key: key.into(),
            filename: filename.into(),
            content,
        }
    }

    fn is_file(&self) -> bool {
        matches!(self, Self::File { .. })
    }
}

/// An encoded POST body together with its `Content-Type` header value.
#[derive(Debug, Clone)]
pub struct EncodedRequest {
    pub content_type: String,
    pub body: Bytes,
}

/// Percent-encode every byte outside `[A-Za-z0-9._-]` as uppercase `%XX`.
///
/// This is the exact unreserved set the service expects. It deliberately
/// escapes more than generic URL encoders do, and space becomes `%20`,
/// never `+`.
pub fn url_escape(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for byte in input.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'.' | b'_' | b'-' => {
                out.push(byte as char);
            }
            _ => out.push_str(&format!("%{byte:02X}")),
        }
    }
    out
}

/// Encode parts as `application/x-www-form-urlencoded`, preserving order.
///
/// File parts never reach this path when going through [`encode_request`];
/// if one is supplied directly its filename is encoded as a plain value.
pub fn urlencoded_body(parts: &[BodyPart]) -> EncodedRequest {
    let mut out = String::new();
    for part in parts {
        if !out.is_empty() {
            out.push('&');
        }
        match part {
            BodyPart::Field { key, value } => {
                out.push_str(&url_escape(key));
                out.push('=');
                out.push_str(&url_escape(value));
            }
            BodyPart::File { key, filename, .. } => {
                out.push_str(&url_escape(key));
                out.push('=');
                out.push_str(&url_escape(filename));
            }
        }
    }
    EncodedRequest {
        content_type: "application/x-www-form-urlencoded".to_string(),
        body: Bytes::from(out),
    }
}

/// Encode parts as `multipart/form-data` with the given boundary.
///
/// File parts carry their content verbatim with an octet-stream part type;
/// all other parts ride along as plain fields in the original order.
pub fn multipart_body(parts: &[BodyPart], boundary: &str) -> EncodedRequest {
    let mut body = BytesMut::new();
    for part in parts {
        body.put_slice(b"--");
        body.put_slice(boundary.as_bytes());
        body.put_slice(b"\r\n");
        match part {
            BodyPart::Field { key, value } => {
                body.put_slice(b"Content-Disposition: form-data; name=\"");
                body.put_slice(escape_quoted(key).as_bytes());
                body.put_slice(b"\"\r\n\r\n");
                body.put_slice(value.as_bytes());
            }
            BodyPart::File {
                key,
                filename,
                content,
            } => {
                body.put_slice(b"Content-Disposition: form-data; name=\"");
                body.put_slice(escape_quoted(key).as_bytes());
                body.put_slice(b"\"; filename=\"");
                body.put_slice(escape_quoted(filename).as_bytes());
                body.put_slice(b"\"\r\nContent-Type: application/octet-stream\r\n\r\n");
                body.put_slice(content);
            }
        }
        body.put_slice(b"\r\n");
    }
    body.put_slice(b"--");
    body.put_slice(boundary.as_bytes());
    body.put_slice(b"--\r\n");

    EncodedRequest {
        content_type: format!("multipart/form-data; boundary={boundary}"),
        body: body.freeze(),
    }
}

/// Pick the encoding mode: multipart as soon as any part is a file,
/// urlencoded form otherwise.
pub fn encode_request(parts: &[BodyPart]) -> EncodedRequest {
    if parts.iter().any(BodyPart::is_file) {
        multipart_body(parts, &generate_boundary())
    } else {
        urlencoded_body(parts)
    }
}

fn escape_quoted(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}

fn generate_boundary() -> String {
    let nanos = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.subsec_nanos())
        .unwrap_or(0);
    format!("----------evdb-rs-{:08x}{:08x}", std::process::id(), nanos)
}
