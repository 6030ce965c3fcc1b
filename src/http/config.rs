use http::Uri;
use std::env;
use std::env::VarError;
use std::fmt::Display;
use std::time::Duration;

use crate::parameters::DEFAULT_REQUEST_TIMEOUT;

const HTTP_PROXY_ENV_NAME: &str = "HTTP_PROXY";
const HTTPS_PROXY_ENV_NAME: &str = "HTTPS_PROXY";

/// Settings applied to the blocking transport when it is built.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpConfig {
    pub(crate) timeout: Duration,
    pub(crate) conn_timeout: Duration,
    pub(crate) proxy: ProxyConfig,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_REQUEST_TIMEOUT,
            conn_timeout: DEFAULT_REQUEST_TIMEOUT,
            proxy: ProxyConfig::default(),
        }
    }
}

impl HttpConfig {
    pub fn new(timeout: Duration, conn_timeout: Duration, proxy: ProxyConfig) -> Self {
        Self {
            timeout,
            conn_timeout,
            proxy,
        }
    }
}

#[derive(thiserror::Error, Debug)]
pub enum ProxyError {
    #[error("invalid proxy url `{0}`: `{1}`")]
    InvalidUrl(String, String),
}

/// Optional proxy url. Empty strings map to no proxy.
#[derive(Debug, Default, PartialEq, Clone)]
pub struct ProxyUrl(Option<Uri>);

impl TryFrom<&str> for ProxyUrl {
    type Error = ProxyError;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        if s.is_empty() {
            return Ok(Self(None));
        }
        let uri = s
            .parse::<Uri>()
            .map_err(|err| ProxyError::InvalidUrl(s.to_string(), err.to_string()))?;
        if uri.host().is_none() {
            return Err(ProxyError::InvalidUrl(
                s.to_string(),
                "missing proxy host".to_string(),
            ));
        }
        Ok(Self(Some(uri)))
    }
}

impl Display for ProxyUrl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.0 {
            Some(url) => write!(f, "{url}"),
            None => write!(f, ""),
        }
    }
}

impl ProxyUrl {
    pub fn is_empty(&self) -> bool {
        self.0.is_none()
    }
}

/// Proxy used by the blocking transport.
#[derive(Debug, PartialEq, Clone, Default)]
pub struct ProxyConfig {
    /// <protocol>://<user>:<password>@<host>:<port>
    /// (All parts except host are optional)
    url: ProxyUrl,
}

impl ProxyConfig {
    pub fn new(proxy_url: &str) -> Result<Self, ProxyError> {
        Ok(Self {
            url: ProxyUrl::try_from(proxy_url)?,
        })
    }

    pub fn url(&self) -> &ProxyUrl {
        &self.url
    }

    /// Returns a new instance whose url is taken from the standard environment variables if needed.
    pub fn try_with_url_from_env(self) -> Result<Self, ProxyError> {
        self.with_env_aware_url(env::var)
    }

    fn with_env_aware_url<F>(self, env_var: F) -> Result<Self, ProxyError>
    where
        F: Fn(&'static str) -> Result<String, VarError>,
    {
        if !self.url.is_empty() {
            return Ok(self);
        }
        let url = env_var(HTTPS_PROXY_ENV_NAME)
            .or_else(|_| env_var(HTTP_PROXY_ENV_NAME))
            .unwrap_or_default()
            .as_str()
            .try_into()?;
        Ok(ProxyConfig { url })
    }
}
