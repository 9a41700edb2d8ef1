//! Purpose: Blocking HTTP client for the NAMI registry (auth, search, record get/put).
//! Exports: `NamiClient`, `Session`, `RecordApi`, `ApiResult`.
//! Role: Owns one session cookie; maps responses through the envelope check and record codecs.
//! Invariants: One identity per client; no global state, so several clients may coexist.
//! Invariants: Calls block until the exchange completes; nothing is retried.
//! Invariants: Login follows its own redirects so cookies from every hop reach the session.
//! Invariants: `search` requests every row in a single page unless `search_page` is used.
#![allow(clippy::result_large_err)]

use super::config::ClientConfig;
use super::criteria::SearchCriteria;
use super::envelope::read_envelope;
use crate::core::error::{Error, ErrorKind};
use crate::schema::{Member, SearchResult};
use serde_json::Value;
use url::Url;

pub type ApiResult<T> = Result<T, Error>;

/// Redirect hops followed during login before giving up.
const MAX_AUTH_REDIRECTS: usize = 10;

/// Record fetch/store capability handed to entities for linked operations.
pub trait RecordApi {
    fn default_unit_id(&self) -> Option<u64>;

    fn fetch_record(&self, id: i64, unit_id: u64) -> ApiResult<Value>;

    fn store_record(&self, id: i64, data: &Value, unit_id: u64) -> ApiResult<Value>;

    fn require_default_unit(&self) -> ApiResult<u64> {
        self.default_unit_id().ok_or_else(|| {
            Error::new(ErrorKind::Usage).with_message("no default stammesnummer configured")
        })
    }
}

#[derive(Clone, Debug)]
pub struct Session {
    base_url: Url,
    cookie: Option<String>,
    stammesnummer: Option<u64>,
}

impl Session {
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn cookie(&self) -> Option<&str> {
        self.cookie.as_deref()
    }

    pub fn stammesnummer(&self) -> Option<u64> {
        self.stammesnummer
    }

    pub fn is_authenticated(&self) -> bool {
        self.cookie.is_some()
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
struct Page {
    page: u32,
    start: u64,
    limit: u32,
}

pub struct NamiClient {
    config: ClientConfig,
    session: Session,
    agent: ureq::Agent,
    /// Login agent with redirects off, so cookies set on every hop can be kept.
    auth_agent: ureq::Agent,
}

impl NamiClient {
    pub fn new(config: ClientConfig) -> ApiResult<Self> {
        let base_url = normalize_base_url(&config.server)?;
        let mut builder = ureq::AgentBuilder::new();
        let mut auth_builder = ureq::AgentBuilder::new().redirects(0);
        if let Some(timeout) = config.timeout() {
            builder = builder.timeout(timeout);
            auth_builder = auth_builder.timeout(timeout);
        }
        let session = Session {
            base_url,
            cookie: None,
            stammesnummer: config.stammesnummer,
        };
        Ok(Self {
            config,
            session,
            agent: builder.build(),
            auth_agent: auth_builder.build(),
        })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Logs in and keeps the returned session cookie for every later call.
    ///
    /// Success is judged on the HTTP status of the last redirect hop; this call has no envelope.
    /// Cookies set on any hop are kept, later values replacing earlier ones of the same name.
    pub fn authenticate(&mut self, username: &str, password: &str) -> ApiResult<()> {
        let mut url = build_url(&self.session.base_url, &self.config.auth_path, &[])?;
        tracing::debug!(url = %url, "authenticating");
        let form = [("Login", "API"), ("username", username), ("password", password)];
        let mut jar: Vec<(String, String)> = Vec::new();
        let mut response = auth_response(self.auth_agent.post(url.as_str()).send_form(&form))?;

        let mut hops = 0;
        loop {
            store_cookies(&mut jar, &response);
            let status = response.status();
            if !(300..400).contains(&status) {
                break;
            }
            let Some(location) = response.header("location") else {
                return Err(auth_error(status).with_message("redirect without location"));
            };
            if hops == MAX_AUTH_REDIRECTS {
                return Err(auth_error(status).with_message("too many login redirects"));
            }
            hops += 1;
            url = url.join(location).map_err(|err| {
                auth_error(status)
                    .with_message("invalid login redirect location")
                    .with_source(err)
            })?;
            tracing::debug!(url = %url, status, "following login redirect");
            let resend_form = matches!(status, 307 | 308);
            let mut request = if resend_form {
                self.auth_agent.post(url.as_str())
            } else {
                self.auth_agent.get(url.as_str())
            };
            if let Some(cookie) = cookie_header(&jar) {
                request = request.set("Cookie", &cookie);
            }
            let result = if resend_form {
                request.send_form(&form)
            } else {
                request.call()
            };
            response = auth_response(result)?;
        }

        if response.status() != 200 {
            return Err(auth_error(response.status()));
        }
        if let Some(cookie) = cookie_header(&jar) {
            self.session.cookie = Some(cookie);
        }
        tracing::info!(username, hops, "authenticated against registry");
        Ok(())
    }

    /// Authenticates with the credentials from the configuration.
    pub fn login(&mut self) -> ApiResult<()> {
        let (Some(username), Some(password)) =
            (self.config.username.clone(), self.config.password.clone())
        else {
            return Err(Error::new(ErrorKind::Usage)
                .with_message("username and password must be configured to log in"));
        };
        self.authenticate(&username, &password)
    }

    pub fn search(&self, criteria: &SearchCriteria) -> ApiResult<Vec<SearchResult>> {
        let page = Page {
            page: 1,
            start: 0,
            limit: self.config.search_limit,
        };
        self.search_with(criteria, page)
    }

    /// Fetches one page of `limit` rows; pages are 1-based.
    pub fn search_page(
        &self,
        criteria: &SearchCriteria,
        page: u32,
        limit: u32,
    ) -> ApiResult<Vec<SearchResult>> {
        if page == 0 || limit == 0 {
            return Err(Error::new(ErrorKind::Usage)
                .with_message("search page and limit must be at least 1"));
        }
        let start = u64::from(page - 1) * u64::from(limit);
        self.search_with(criteria, Page { page, start, limit })
    }

    pub fn get_record(&self, id: i64) -> ApiResult<Value> {
        let unit_id = self.require_default_unit()?;
        self.get_record_for_unit(id, unit_id)
    }

    pub fn get_record_for_unit(&self, id: i64, unit_id: u64) -> ApiResult<Value> {
        let url = self.record_url(id, unit_id)?;
        tracing::debug!(id, unit_id, "fetching record");
        read_envelope(self.request("GET", &url).call())
    }

    pub fn update_record(&self, id: i64, data: &Value) -> ApiResult<Value> {
        let unit_id = self.require_default_unit()?;
        self.update_record_for_unit(id, data, unit_id)
    }

    pub fn update_record_for_unit(&self, id: i64, data: &Value, unit_id: u64) -> ApiResult<Value> {
        let url = self.record_url(id, unit_id)?;
        tracing::debug!(id, unit_id, "updating record");
        let payload = serde_json::to_string(data).map_err(|err| {
            Error::new(ErrorKind::Usage)
                .with_message("failed to encode request json")
                .with_source(err)
        })?;
        let result = self
            .request("PUT", &url)
            .set("Content-Type", "application/json")
            .send_string(&payload);
        read_envelope(result)
    }

    /// Fetches and decodes one full record under the default unit.
    pub fn member(&self, id: i64) -> ApiResult<Member> {
        let raw = self.get_record(id)?;
        Member::from_json(&raw)
    }

    fn search_with(&self, criteria: &SearchCriteria, page: Page) -> ApiResult<Vec<SearchResult>> {
        let criteria = criteria.effective();
        let mut url = build_url(&self.session.base_url, &self.config.search_path, &[])?;
        url.query_pairs_mut()
            .append_pair("searchedValues", &criteria.to_query_value())
            .append_pair("page", &page.page.to_string())
            .append_pair("start", &page.start.to_string())
            .append_pair("limit", &page.limit.to_string());
        tracing::debug!(page = page.page, limit = page.limit, "searching");

        let data = read_envelope(self.request("GET", &url).call())?;
        let Value::Array(rows) = data else {
            return Err(Error::new(ErrorKind::Decode)
                .with_message("search response data must be an array"));
        };
        let results = rows
            .iter()
            .map(SearchResult::from_json)
            .collect::<ApiResult<Vec<_>>>()?;
        tracing::debug!(count = results.len(), "search decoded");
        Ok(results)
    }

    fn record_url(&self, id: i64, unit_id: u64) -> ApiResult<Url> {
        let unit_id = unit_id.to_string();
        let id = id.to_string();
        build_url(
            &self.session.base_url,
            &self.config.record_path,
            &[unit_id.as_str(), id.as_str(), ""],
        )
    }

    fn request(&self, method: &str, url: &Url) -> ureq::Request {
        let mut request = self
            .agent
            .request(method, url.as_str())
            .set("Accept", "application/json");
        if let Some(cookie) = &self.session.cookie {
            request = request.set("Cookie", cookie);
        }
        request
    }
}

impl RecordApi for NamiClient {
    fn default_unit_id(&self) -> Option<u64> {
        self.session.stammesnummer
    }

    fn fetch_record(&self, id: i64, unit_id: u64) -> ApiResult<Value> {
        self.get_record_for_unit(id, unit_id)
    }

    fn store_record(&self, id: i64, data: &Value, unit_id: u64) -> ApiResult<Value> {
        self.update_record_for_unit(id, data, unit_id)
    }
}

fn normalize_base_url(raw: &str) -> ApiResult<Url> {
    let mut url = Url::parse(raw).map_err(|err| {
        Error::new(ErrorKind::Usage)
            .with_message("invalid registry base url")
            .with_source(err)
    })?;
    let scheme = url.scheme();
    if scheme != "http" && scheme != "https" {
        return Err(Error::new(ErrorKind::Usage)
            .with_message("registry base url must use http or https scheme"));
    }
    url.set_query(None);
    url.set_fragment(None);
    Ok(url)
}

/// Appends `path` and then `segments` to the base url's own path.
fn build_url(base_url: &Url, path: &str, segments: &[&str]) -> ApiResult<Url> {
    let mut url = base_url.clone();
    {
        let mut out = url.path_segments_mut().map_err(|_| {
            Error::new(ErrorKind::Usage).with_message("registry base url cannot be a base")
        })?;
        out.pop_if_empty();
        for part in path.split('/').filter(|part| !part.is_empty()) {
            out.push(part);
        }
        for segment in segments {
            out.push(segment);
        }
    }
    Ok(url)
}

fn auth_response(result: Result<ureq::Response, ureq::Error>) -> ApiResult<ureq::Response> {
    match result {
        Ok(response) => Ok(response),
        Err(ureq::Error::Status(code, _response)) => Err(auth_error(code)),
        Err(ureq::Error::Transport(err)) => Err(Error::new(ErrorKind::Io)
            .with_message("authentication request failed")
            .with_source(err)),
    }
}

/// Adds the `name=value` part of every `Set-Cookie` header, replacing same-named entries.
fn store_cookies(jar: &mut Vec<(String, String)>, response: &ureq::Response) {
    for header in response.all("set-cookie") {
        let Some(pair) = header.split(';').next() else {
            continue;
        };
        let Some((name, value)) = pair.trim().split_once('=') else {
            continue;
        };
        let name = name.trim();
        if name.is_empty() {
            continue;
        }
        match jar.iter_mut().find(|(existing, _)| existing == name) {
            Some(entry) => entry.1 = value.trim().to_string(),
            None => jar.push((name.to_string(), value.trim().to_string())),
        }
    }
}

fn cookie_header(jar: &[(String, String)]) -> Option<String> {
    if jar.is_empty() {
        return None;
    }
    let pairs: Vec<String> = jar
        .iter()
        .map(|(name, value)| format!("{name}={value}"))
        .collect();
    Some(pairs.join("; "))
}

fn auth_error(status: u16) -> Error {
    Error::new(ErrorKind::Authentication)
        .with_message("authentication failed")
        .with_status(status)
}
