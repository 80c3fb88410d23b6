use std::path::PathBuf;

use bytes::Bytes;
use http_body_util::{BodyExt, Full};
use hyper::{Method, Request, header};
use md5::{Digest, Md5};
use tokio::time::{Duration, timeout};
use tracing::{debug, trace};

use crate::common::http::{HttpClient, build_http_client};
use crate::rest::args::{ArgValue, CanonicalArgs, RequestArgs, normalize};
use crate::rest::encode::{BodyPart, encode_request};
use crate::rest::error::{ApiError, AuthError, ErrorRecord};
use crate::rest::types::{ClientConfig, Credential, SessionState};
use crate::rest::xml::{ForceArray, XmlValue, decode_document};

/// Client identification sent with every request.
pub const USER_AGENT: &str = concat!("evdb-rs/", env!("CARGO_PKG_VERSION"));

/// Per-request timeout applied when [`ClientConfig::timeout`] is unset.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(20);

/// Client for the evdb REST+XML API.
///
/// Owns the configuration, the login session, and a pooled hyper transport.
/// Every remote method is reached through [`call`](Self::call); the
/// challenge/response digest handshake lives in [`login`](Self::login).
///
/// `call` and `login` take `&mut self` because the session, the last-error
/// record, and the last-response cache are updated in place. A client is
/// therefore single-caller by construction; use one client per concurrent
/// task.
///
/// # Example
/// ```no_run
/// use evdb_rs::{ClientConfig, Credential, EvdbClient, ForceArray, RequestArgs};
///
/// # async fn example() -> Result<(), evdb_rs::ApiError> {
/// let mut client = EvdbClient::new(ClientConfig::new("my-app-key"))?;
/// client
///     .login("someuser", Credential::Password("secret".into()))
///     .await?;
///
/// let result = client
///     .call(
///         "events/get",
///         RequestArgs::from([("id", "E0-001-000000000-0")]),
///         ForceArray::Off,
///     )
///     .await?;
/// println!("title: {:?}", result.text_of("title"));
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct EvdbClient {
    config: ClientConfig,
    session: SessionState,
    client: HttpClient,
    default_timeout: Duration,
    last_error: Option<ErrorRecord>,
    last_raw: Option<String>,
    last_response: Option<XmlValue>,
}

impl EvdbClient {
    /// Create a client from a configuration.
    ///
    /// Fails with [`ApiError::Config`] when the app key is empty: every
    /// request must carry one, and an empty key only produces confusing
    /// remote rejections later.
    pub fn new(config: ClientConfig) -> Result<Self, ApiError> {
        if config.app_key.is_empty() {
            return Err(ApiError::Config("app_key must not be empty".to_string()));
        }
        let client = build_http_client();
        let default_timeout = config.timeout.unwrap_or(DEFAULT_TIMEOUT);

        Ok(Self {
            config,
            session: SessionState::default(),
            client,
            default_timeout,
            last_error: None,
            last_raw: None,
            last_response: None,
        })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Identity recorded by the last [`login`](Self::login) attempt.
    pub fn user(&self) -> Option<&str> {
        self.session.user.as_deref()
    }

    /// Session key obtained from a completed login, if any.
    pub fn user_key(&self) -> Option<&str> {
        if self.session.user_key.is_empty() {
            None
        } else {
            Some(&self.session.user_key)
        }
    }

    /// Error record of the most recent failing call. Not cleared by
    /// successful calls.
    pub fn last_error(&self) -> Option<&ErrorRecord> {
        self.last_error.as_ref()
    }

    /// Raw body of the most recent response, for diagnostics.
    pub fn last_response_raw(&self) -> Option<&str> {
        self.last_raw.as_deref()
    }

    /// Decoded tree of the most recent successfully decoded response. Also
    /// populated when the response carried the remote error envelope.
    pub fn last_response(&self) -> Option<&XmlValue> {
        self.last_response.as_ref()
    }

    /// Drop the local session state. No remote call is made; the service
    /// keys are stateless on the wire. A later [`login`](Self::login)
    /// restarts the handshake from scratch.
    pub fn logout(&mut self) {
        self.session = SessionState::default();
    }

    /// Invoke a remote method.
    ///
    /// `method` is the slash-separated resource path (`"events/get"`),
    /// appended to `<api_root>/rest/`. Arguments are normalized, default
    /// credential fields (`app_key`, `user`, `user_key`) are appended where
    /// the caller did not supply them, and `*_file` fields switch the whole
    /// request to multipart encoding.
    ///
    /// Failure reporting follows the service convention: a non-2xx status is
    /// [`ApiError::Transport`] (the body is not decoded); a 2xx response
    /// whose decoded tree carries a top-level `string` field is
    /// [`ApiError::Remote`] with `string` as code and `description` as
    /// detail. Either failure also updates [`last_error`](Self::last_error).
    pub async fn call(
        &mut self,
        method: &str,
        args: RequestArgs,
        force_array: ForceArray,
    ) -> Result<XmlValue, ApiError> {
        let mut entries = normalize(args);
        self.inject_defaults(&mut entries);
        let parts = resolve_file_fields(entries).await?;
        let encoded = encode_request(&parts);

        let uri: hyper::Uri = format!(
            "{}/rest/{}",
            self.config.api_root.trim_end_matches('/'),
            method
        )
        .parse()?;

        if self.config.debug {
            debug!(%uri, content_type = %encoded.content_type, "rest call");
        }
        if self.config.verbose {
            trace!(body = %String::from_utf8_lossy(&encoded.body), "request body");
        }

        let req = Request::builder()
            .method(Method::POST)
            .uri(uri)
            .header(header::USER_AGENT, USER_AGENT)
            .header(header::CONTENT_TYPE, encoded.content_type.as_str())
            .body(Full::new(encoded.body))?;

        let fut = self.client.request(req);
        let resp = timeout(self.default_timeout, fut)
            .await
            .map_err(|_| ApiError::Timeout)??;

        let status = resp.status();
        let body: Bytes = resp.into_body().collect().await?.to_bytes();
        let raw = String::from_utf8_lossy(&body).into_owned();
        if self.config.verbose {
            trace!(%status, body = %raw, "response");
        }
        self.last_raw = Some(raw.clone());

        if !status.is_success() {
            let code = status.as_str().to_string();
            let message = format!(
                "{}: {}",
                code,
                status.canonical_reason().unwrap_or("unknown status")
            );
            if self.config.debug {
                debug!(%code, "transport failure");
            }
            self.last_error = Some(ErrorRecord {
                code: code.clone(),
                message: message.clone(),
            });
            return Err(ApiError::Transport { code, message });
        }

        let tree = decode_document(&raw, &force_array)?;
        self.last_response = Some(tree.clone());

        // Remote error envelope: a top-level `string` field signals failure
        // regardless of the HTTP status.
        if let Some(code) = tree.text_of("string") {
            let description = tree.text_of("description").unwrap_or("").to_string();
            let code = code.to_string();
            if self.config.debug {
                debug!(%code, "remote error envelope");
            }
            self.last_error = Some(ErrorRecord {
                code: code.clone(),
                message: format!("{code}: {description}"),
            });
            return Err(ApiError::Remote { code, description });
        }

        Ok(tree)
    }

    /// Authenticate via the two-round challenge/response digest handshake.
    ///
    /// Round one calls `users/login` with only the identity; the service
    /// rejects it with an error envelope that nonetheless carries a `nonce`.
    /// Round two answers with `response = md5("<nonce>:" + md5(password))`.
    /// On success the returned `user_key` (or legacy `auth_token`) is stored
    /// and injected into every subsequent call.
    pub async fn login(
        &mut self,
        user: impl Into<String>,
        credential: Credential,
    ) -> Result<(), ApiError> {
        self.session.user = Some(user.into());
        self.session.user_key.clear();

        match self
            .call("users/login", RequestArgs::none(), ForceArray::Off)
            .await
        {
            // The challenge round is expected to come back as a remote
            // rejection; the nonce still rides in the decoded payload.
            Ok(_) | Err(ApiError::Remote { .. }) => {}
            Err(e) => return Err(e),
        }

        let nonce = self
            .last_response
            .as_ref()
            .and_then(|tree| tree.text_of("nonce"))
            .map(str::to_string)
            .ok_or(AuthError::MissingNonce)?;

        let pass_digest = match &credential {
            Credential::Password(password) => md5_hex(password.as_bytes()),
            Credential::PasswordDigest(digest) => digest.to_ascii_lowercase(),
        };
        let response = md5_hex(format!("{nonce}:{pass_digest}").as_bytes());

        let args = RequestArgs::pairs(["nonce", nonce.as_str(), "response", response.as_str()])?;
        let reply = self.call("users/login", args, ForceArray::Off).await?;

        let user_key = reply
            .text_of("user_key")
            .or_else(|| reply.text_of("auth_token"))
            .ok_or(AuthError::MissingSessionKey)?;
        self.session.user_key = user_key.to_string();

        Ok(())
    }

    /// Append default credential entries for every field the client holds a
    /// non-empty value for. Explicit caller entries always win.
    fn inject_defaults(&self, entries: &mut CanonicalArgs) {
        if !self.config.app_key.is_empty() {
            entries.push_default("app_key", &self.config.app_key);
        }
        if let Some(user) = &self.session.user
            && !user.is_empty()
        {
            entries.push_default("user", user);
        }
        if !self.session.user_key.is_empty() {
            entries.push_default("user_key", &self.session.user_key);
        }
    }
}

/// Lowercase MD5 hex digest, as the login wire contract requires.
pub fn md5_hex(data: &[u8]) -> String {
    let mut hasher = Md5::new();
    hasher.update(data);
    hex::encode(hasher.finalize())
}

/// Turn canonical entries into encodable parts, loading file content for
/// upload fields. A key ending in `_file` with a text value names a path to
/// upload; an explicit [`ArgValue::File`] is already file form.
async fn resolve_file_fields(entries: CanonicalArgs) -> Result<Vec<BodyPart>, ApiError> {
    let mut parts = Vec::new();
    for (key, value) in entries.into_entries() {
        match value {
            ArgValue::File(path) => parts.push(read_file_part(key, path).await?),
            ArgValue::Text(text) if key.ends_with("_file") => {
                parts.push(read_file_part(key, PathBuf::from(text)).await?);
            }
            ArgValue::Text(text) => parts.push(BodyPart::field(key, text)),
        }
    }
    Ok(parts)
}

async fn read_file_part(key: String, path: PathBuf) -> Result<BodyPart, ApiError> {
    let filename = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| key.clone());
    let content = tokio::fs::read(&path).await?;
    Ok(BodyPart::file(key, filename, Bytes::from(content)))
}
