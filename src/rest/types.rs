use std::time::Duration;

/// Base URL of the hosted service. Overridable for staging or self-hosted
/// deployments via [`ClientConfig::api_root`].
pub const DEFAULT_API_ROOT: &str = "https://api.evdb.com";

/// Immutable client configuration. Built once, consumed by
/// [`crate::rest::client::EvdbClient::new`].
///
/// # Example
/// ```no_run
/// use evdb_rs::{ClientConfig, EvdbClient};
///
/// let config = ClientConfig::new("my-app-key").debug(true);
/// let client = EvdbClient::new(config)?;
/// # Ok::<(), evdb_rs::ApiError>(())
/// ```
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub app_key: String,
    pub api_root: String,
    pub debug: bool,
    pub verbose: bool,
    /// Per-request timeout handed to the transport. `None` does not mean
    /// unlimited: the client falls back to
    /// [`DEFAULT_TIMEOUT`](crate::rest::client::DEFAULT_TIMEOUT).
    pub timeout: Option<Duration>,
}

impl ClientConfig {
    pub fn new(app_key: impl Into<String>) -> Self {
        Self {
            app_key: app_key.into(),
            api_root: DEFAULT_API_ROOT.to_string(),
            debug: false,
            verbose: false,
            timeout: None,
        }
    }

    pub fn api_root(mut self, root: impl Into<String>) -> Self {
        self.api_root = root.into();
        self
    }

    /// Log a summary of every request at `debug` level.
    pub fn debug(mut self, on: bool) -> Self {
        self.debug = on;
        self
    }

    /// Log full request and response bodies at `trace` level.
    pub fn verbose(mut self, on: bool) -> Self {
        self.verbose = on;
        self
    }

    /// Override the per-request timeout. Unset, every request still runs
    /// under [`DEFAULT_TIMEOUT`](crate::rest::client::DEFAULT_TIMEOUT).
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

/// Login credential: a raw password, or its MD5 hex digest computed ahead of
/// time so the plaintext never has to touch the client.
#[derive(Debug, Clone)]
pub enum Credential {
    Password(String),
    PasswordDigest(String),
}

/// Mutable per-client session. `user_key` stays empty until a login
/// handshake completes; it is only ever set from a server-returned value.
#[derive(Debug, Clone, Default)]
pub(crate) struct SessionState {
    pub user: Option<String>,
    pub user_key: String,
}
