//! Purpose: Recognized client options with production defaults.
//! Exports: `ClientConfig` and the `DEFAULT_*` constants.
//! Role: Plain value handed to `NamiClient::new`; loading it from files is left to callers.
//! Invariants: Every option is overridable and falls back to the production value.
//! Invariants: The password never appears in `Debug` output.
use serde::Deserialize;
use std::fmt;
use std::time::Duration;

pub const DEFAULT_SERVER: &str = "https://nami.dpsg.de";
pub const DEFAULT_AUTH_PATH: &str = "/ica/rest/nami/auth/manual/sessionStartup";
pub const DEFAULT_SEARCH_PATH: &str = "/ica/rest/api/1/2/service/nami/search/result-list";
pub const DEFAULT_RECORD_PATH: &str =
    "/ica/rest/nami/mitglied/filtered-for-navigation/gruppierung/gruppierung";
/// Page size that makes one search page hold every row.
pub const DEFAULT_SEARCH_LIMIT: u32 = 999_999;

#[derive(Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ClientConfig {
    pub server: String,
    /// Default organizational unit for record calls.
    pub stammesnummer: Option<u64>,
    pub username: Option<String>,
    pub password: Option<String>,
    #[serde(alias = "auth_url")]
    pub auth_path: String,
    #[serde(alias = "search_url")]
    pub search_path: String,
    pub record_path: String,
    pub search_limit: u32,
    /// Whole-request timeout in milliseconds; `None` or `0` leaves the transport default in place.
    pub timeout_ms: Option<u64>,
}

impl ClientConfig {
    pub fn new() -> Self {
        Self {
            server: DEFAULT_SERVER.to_string(),
            stammesnummer: None,
            username: None,
            password: None,
            auth_path: DEFAULT_AUTH_PATH.to_string(),
            search_path: DEFAULT_SEARCH_PATH.to_string(),
            record_path: DEFAULT_RECORD_PATH.to_string(),
            search_limit: DEFAULT_SEARCH_LIMIT,
            timeout_ms: None,
        }
    }

    pub fn with_server(mut self, server: impl Into<String>) -> Self {
        self.server = server.into();
        self
    }

    pub fn with_stammesnummer(mut self, stammesnummer: u64) -> Self {
        self.stammesnummer = Some(stammesnummer);
        self
    }

    pub fn with_credentials(
        mut self,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        self.username = Some(username.into());
        self.password = Some(password.into());
        self
    }

    pub fn with_auth_path(mut self, path: impl Into<String>) -> Self {
        self.auth_path = path.into();
        self
    }

    pub fn with_search_path(mut self, path: impl Into<String>) -> Self {
        self.search_path = path.into();
        self
    }

    pub fn with_record_path(mut self, path: impl Into<String>) -> Self {
        self.record_path = path.into();
        self
    }

    pub fn with_search_limit(mut self, limit: u32) -> Self {
        self.search_limit = limit;
        self
    }

    /// Sub-millisecond remainders round up, so a non-zero timeout never becomes zero.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        let millis = timeout.as_nanos().div_ceil(1_000_000);
        self.timeout_ms = Some(u64::try_from(millis).unwrap_or(u64::MAX));
        self
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_ms
            .filter(|millis| *millis > 0)
            .map(Duration::from_millis)
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("server", &self.server)
            .field("stammesnummer", &self.stammesnummer)
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field("auth_path", &self.auth_path)
            .field("search_path", &self.search_path)
            .field("record_path", &self.record_path)
            .field("search_limit", &self.search_limit)
            .field("timeout_ms", &self.timeout_ms)
            .finish()
    }
}
