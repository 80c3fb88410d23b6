use thiserror::Error;

/// Login-specific failures of the challenge/response handshake.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// The challenge round came back without a `nonce` field.
    #[error("login challenge returned no nonce")]
    MissingNonce,
    /// The service accepted the digest but returned neither `user_key`
    /// nor `auth_token`.
    #[error("login succeeded but no session key was returned")]
    MissingSessionKey,
}

/// All failure modes surfaced by the client.
///
/// Expected protocol failures (`Transport`, `Remote`) are also mirrored into
/// the client's last-error record so callers can branch without matching on
/// the enum.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Bad or missing client configuration.
    #[error("configuration error: {0}")]
    Config(String),

    /// Malformed argument shape handed to `call`.
    #[error("invalid arguments: {0}")]
    Argument(String),

    /// HTTP-layer failure: the service answered with a non-2xx status.
    #[error("{code}: {message}")]
    Transport { code: String, message: String },

    /// The decoded response carried the error envelope (`string` +
    /// `description` fields).
    #[error("{code}: {description}")]
    Remote { code: String, description: String },

    /// Login handshake failure.
    #[error("authentication failed: {0}")]
    Auth(#[from] AuthError),

    /// The response body could not be decoded as XML at all. There is no
    /// defined recovery for this, so it propagates as-is.
    #[error("invalid response xml: {0}")]
    Xml(#[from] quick_xml::Error),

    /// The response decoded to nothing at all (no root element).
    #[error("empty response document")]
    EmptyResponse,

    #[error("request timed out")]
    Timeout,

    #[error("invalid uri: {0}")]
    Uri(#[from] hyper::http::uri::InvalidUri),

    #[error("http request: {0}")]
    Http(#[from] hyper::http::Error),

    #[error("http connection: {0}")]
    Connect(#[from] hyper_util::client::legacy::Error),

    #[error("http body: {0}")]
    Body(#[from] hyper::Error),

    /// Reading a `*_file` upload from disk failed.
    #[error("file read: {0}")]
    Io(#[from] std::io::Error),
}

/// Last-error record kept on the client, overwritten on every failing call.
///
/// `code` is either the HTTP status (e.g. `"404"`) or the remote error code
/// from the envelope (e.g. `"Access restriction"`); `message` is the
/// human-readable `"<code>: <detail>"` rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorRecord {
    pub code: String,
    pub message: String,
}
