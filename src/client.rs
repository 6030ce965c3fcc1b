use std::fmt;

use http::{
    HeaderValue, Method, Request, StatusCode, Uri,
    header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE},
};
use hyper::ext::ReasonPhrase;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::http::client::HttpClient as BlockingHttpClient;
use crate::http::config::HttpConfig;
use crate::http_client::HttpClient;

use credentials::Credentials;
use error::ClientError;

pub mod credentials;
pub mod error;
mod streams;

pub use streams::Direction;

const ACCEPT_JSON: &str = "application/vnd.eventstore.atom+json, application/json";
const CONTENT_TYPE_JSON: &str = "application/json";

/// Client for the EventStore HTTP API, generic over the transport used to reach the server.
pub struct EventStoreClient<C>
where
    C: HttpClient,
{
    base_url: Uri,
    credentials: Credentials,
    http_client: C,
}

impl<C: HttpClient> fmt::Debug for EventStoreClient<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventStoreClient")
            .field("base_url", &self.base_url)
            .field("credentials", &self.credentials)
            .field("http_client", &"impl HttpClient")
            .finish()
    }
}

impl EventStoreClient<BlockingHttpClient> {
    /// Creates a client using the default blocking transport.
    pub fn new(base_url: &str, username: &str, password: &str) -> Result<Self, ClientError> {
        Self::with_config(base_url, username, password, HttpConfig::default())
    }

    /// Creates a client whose blocking transport is built from `config`.
    pub fn with_config(
        base_url: &str,
        username: &str,
        password: &str,
        config: HttpConfig,
    ) -> Result<Self, ClientError> {
        let base_url = parse_base_url(base_url)?;
        let http_client = BlockingHttpClient::new(config)
            .map_err(|e| ClientError::HttpClientBuild(e.to_string()))?;
        Ok(Self {
            base_url,
            credentials: Credentials::new(username, password),
            http_client,
        })
    }
}

impl<C> EventStoreClient<C>
where
    C: HttpClient,
{
    pub fn with_http_client(
        base_url: &str,
        username: &str,
        password: &str,
        http_client: C,
    ) -> Result<Self, ClientError> {
        Ok(Self {
            base_url: parse_base_url(base_url)?,
            credentials: Credentials::new(username, password),
            http_client,
        })
    }

    pub fn base_url(&self) -> &Uri {
        &self.base_url
    }

    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    /// Sends `method` to `path` (relative to the base url) and decodes a `200 OK` JSON body into `T`.
    pub(crate) fn make_request<T>(
        &self,
        method: Method,
        path: &str,
        body: Option<Vec<u8>>,
    ) -> Result<T, ClientError>
    where
        T: DeserializeOwned,
    {
        let request = self.build_request(method, path, body)?;
        debug!(method = %request.method(), uri = %request.uri(), "sending request");

        let response = self.http_client.send(request)?;
        let body = response.body();
        debug!(status = %response.status(), "response received");

        match response.status() {
            StatusCode::OK => serde_json::from_slice(body).map_err(|e| {
                ClientError::Decode(format!(
                    "{e}. Response body: {}",
                    String::from_utf8_lossy(body)
                ))
            }),
            status => Err(ClientError::HttpStatus {
                status: status.as_u16(),
                reason: response
                    .extensions()
                    .get::<ReasonPhrase>()
                    .map(|r| String::from_utf8_lossy(r.as_bytes()).to_string())
                    .unwrap_or_else(|| status.canonical_reason().unwrap_or_default().to_string()),
                body: String::from_utf8_lossy(body).to_string(),
            }),
        }
    }

    fn build_request(
        &self,
        method: Method,
        path: &str,
        body: Option<Vec<u8>>,
    ) -> Result<Request<Vec<u8>>, ClientError> {
        let uri = join_url(&self.base_url, path)?;

        let mut builder = Request::builder()
            .uri(uri)
            .method(method)
            .header(ACCEPT, HeaderValue::from_static(ACCEPT_JSON));
        if body.is_some() {
            builder = builder.header(CONTENT_TYPE, HeaderValue::from_static(CONTENT_TYPE_JSON));
        }
        if let Some(authorization) = self.credentials.authorization_header()? {
            builder = builder.header(AUTHORIZATION, authorization);
        }

        builder
            .body(body.unwrap_or_default())
            .map_err(|e| ClientError::InvalidRequest(format!("Failed to build request: {e}")))
    }
}

/// Parses `url` requiring an absolute url: a scheme and a host, no query.
fn parse_base_url(url: &str) -> Result<Uri, ClientError> {
    let uri = url
        .parse::<Uri>()
        .map_err(|e| ClientError::InvalidUrl(url.to_string(), e.to_string()))?;

    if uri.scheme_str().is_none_or(str::is_empty) {
        return Err(ClientError::InvalidUrl(
            url.to_string(),
            "missing scheme".to_string(),
        ));
    }
    if uri.host().is_none_or(str::is_empty) {
        return Err(ClientError::InvalidUrl(
            url.to_string(),
            "missing host".to_string(),
        ));
    }
    if uri.query().is_some() {
        return Err(ClientError::InvalidUrl(
            url.to_string(),
            "query not allowed in base url".to_string(),
        ));
    }
    Ok(uri)
}

fn join_url(base_url: &Uri, path: &str) -> Result<Uri, ClientError> {
    let base = base_url.to_string();
    let joined = format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    );
    joined
        .parse::<Uri>()
        .map_err(|e| ClientError::InvalidRequest(format!("invalid request url `{joined}`: {e}")))
}
