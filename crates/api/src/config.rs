use std::fmt;
use std::time::Duration;

use reqwest::header::HeaderValue;
use url::Url;

use crate::error::{ApiError, Result};

pub const DEFAULT_BASE_URL: &str = "http://beanstalkapp.com/api/";
pub const DEFAULT_USER_AGENT: &str = concat!("beanstalk-api/", env!("CARGO_PKG_VERSION"));
pub const DEFAULT_CONTENT_TYPE: &str = "application/json";
/// Per-request timeout of the default `reqwest` transport.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Connection settings shared by every call a [`Client`](crate::Client) makes.
///
/// Built once before the client is created; the client never mutates it.
#[derive(Clone)]
pub struct ClientConfig {
    base_url: Url,
    username: String,
    password: String,
    user_agent: String,
    content_type: String,
    timeout: Duration,
}

impl ClientConfig {
    /// Configuration pointing at a custom API root, e.g. a test server.
    pub fn new(base_url: impl AsRef<str>) -> Result<Self> {
        let base_url = parse_base_url(base_url.as_ref())?;
        Ok(Self {
            base_url,
            ..Self::default()
        })
    }

    /// Configuration for `https://<account>.beanstalkapp.com/api/`.
    pub fn for_account(account: &str) -> Result<Self> {
        let account = account.trim();
        let valid = !account.is_empty()
            && account
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-');
        if !valid {
            return Err(ApiError::Config(format!(
                "invalid Beanstalk account name '{account}'"
            )));
        }
        Self::new(format!("https://{account}.beanstalkapp.com/api/"))
    }

    pub fn with_basic_auth(
        mut self,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        self.username = username.into();
        self.password = password.into();
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Result<Self> {
        let user_agent = user_agent.into();
        check_header_value("user agent", &user_agent)?;
        self.user_agent = user_agent;
        Ok(self)
    }

    /// Only JSON media types are accepted.
    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Result<Self> {
        let content_type = content_type.into();
        check_header_value("content type", &content_type)?;
        if !is_json_media_type(&content_type) {
            return Err(ApiError::Config(format!(
                "unsupported content type '{content_type}', only JSON is supported"
            )));
        }
        self.content_type = content_type;
        Ok(self)
    }

    /// Applies to the built-in transport only; a custom transport brings
    /// its own timeout policy.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn password(&self) -> &str {
        &self.password
    }

    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }

    pub fn content_type(&self) -> &str {
        &self.content_type
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn has_credentials(&self) -> bool {
        !self.username.is_empty() || !self.password.is_empty()
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        let base_url = parse_base_url(DEFAULT_BASE_URL)
            .unwrap_or_else(|err| panic!("DEFAULT_BASE_URL must be a valid URL: {err}"));
        Self {
            base_url,
            username: String::new(),
            password: String::new(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            content_type: DEFAULT_CONTENT_TYPE.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("base_url", &self.base_url.as_str())
            .field("username", &self.username)
            .field("password", &if self.password.is_empty() { "" } else { "***" })
            .field("user_agent", &self.user_agent)
            .field("content_type", &self.content_type)
            .field("timeout", &self.timeout)
            .finish()
    }
}

fn parse_base_url(raw: &str) -> Result<Url> {
    let mut url = Url::parse(raw)
        .map_err(|err| ApiError::Config(format!("invalid base URL '{raw}': {err}")))?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(ApiError::Config(format!(
            "base URL '{raw}' must use http or https"
        )));
    }

    // Credentials go through with_basic_auth, never the URL.
    if !url.username().is_empty() || url.password().is_some() {
        return Err(ApiError::Config(format!(
            "base URL for host '{}' must not embed credentials",
            url.host_str().unwrap_or_default()
        )));
    }

    // Relative paths only compose under the base when it ends with a slash.
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url.set_query(None);
    url.set_fragment(None);

    Ok(url)
}

fn check_header_value(what: &str, value: &str) -> Result<()> {
    HeaderValue::from_str(value)
        .map(|_| ())
        .map_err(|_| ApiError::Config(format!("{what} {value:?} is not a valid header value")))
}

fn is_json_media_type(content_type: &str) -> bool {
    let essence = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();
    essence == "application/json" || (essence.contains('/') && essence.ends_with("+json"))
}
