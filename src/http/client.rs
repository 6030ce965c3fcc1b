use crate::http::config::HttpConfig;
use crate::http_client::{HttpClient as EventStoreHttpClient, HttpClientError};
use http::{Request, Response};
use reqwest::Proxy;
use reqwest::blocking::{Client, Response as BlockingResponse};
use tracing::debug;

/// Blocking reqwest transport used by default by the EventStore client.
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
}

impl HttpClient {
    /// Builds a reqwest blocking client according to the provided configuration.
    pub fn new(config: HttpConfig) -> Result<Self, HttpBuildError> {
        let mut builder = Client::builder()
            .use_rustls_tls()
            .tls_built_in_native_certs(true)
            .timeout(config.timeout)
            .connect_timeout(config.conn_timeout);

        if !config.proxy.url().is_empty() {
            let proxy_url = config.proxy.url().to_string();
            debug!(proxy = %proxy_url, "using proxy");
            let proxy = Proxy::all(proxy_url.as_str())
                .map_err(|err| HttpBuildError::InvalidProxy(err.to_string()))?;
            builder = builder.proxy(proxy);
        }

        let client = builder
            .build()
            .map_err(|err| HttpBuildError::ClientBuilder(err.to_string()))?;

        Ok(Self { client })
    }

    fn send(&self, request: Request<Vec<u8>>) -> Result<Response<Vec<u8>>, HttpResponseError> {
        let req = self
            .client
            .request(request.method().into(), request.uri().to_string().as_str())
            .headers(request.headers().clone())
            .body(request.body().to_vec());

        let res = req
            .send()
            .map_err(|err| HttpResponseError::TransportError(err.to_string()))?;

        try_build_response(res)
    }
}

/// Converts a reqwest blocking response into an [`http::Response`], keeping status, version,
/// headers and extensions (hyper stores non-canonical reason phrases there).
fn try_build_response(
    mut res: BlockingResponse,
) -> Result<Response<Vec<u8>>, HttpResponseError> {
    let status = res.status();
    let version = res.version();
    let headers = res.headers().clone();
    let extensions = std::mem::take(res.extensions_mut());

    let body: Vec<u8> = res
        .bytes()
        .map_err(|err| HttpResponseError::ReadingResponse(err.to_string()))?
        .into();

    let mut response = http::Response::builder()
        .status(status)
        .version(version)
        .body(body)
        .map_err(|err| HttpResponseError::BuildingResponse(err.to_string()))?;
    *response.headers_mut() = headers;
    *response.extensions_mut() = extensions;

    Ok(response)
}

impl EventStoreHttpClient for HttpClient {
    fn send(&self, req: Request<Vec<u8>>) -> Result<Response<Vec<u8>>, HttpClientError> {
        let response = self.send(req)?;

        Ok(response)
    }
}

impl From<HttpResponseError> for HttpClientError {
    fn from(err: HttpResponseError) -> Self {
        match err {
            HttpResponseError::TransportError(msg) => HttpClientError::TransportError(msg),
            HttpResponseError::BuildingResponse(msg) | HttpResponseError::ReadingResponse(msg) => {
                HttpClientError::InvalidResponse(msg)
            }
        }
    }
}

#[derive(thiserror::Error, Debug)]
pub enum HttpBuildError {
    #[error("could not build the http client: {0}")]
    ClientBuilder(String),
    #[error("invalid proxy: {0}")]
    InvalidProxy(String),
}

#[derive(thiserror::Error, Debug)]
enum HttpResponseError {
    #[error("could not read response body: {0}")]
    ReadingResponse(String),
    #[error("could not build response: {0}")]
    BuildingResponse(String),
    #[error("http transport error: `{0}`")]
    TransportError(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::config::ProxyConfig;
    use assert_matches::assert_matches;
    use http::header::{ACCEPT, CONTENT_TYPE};
    use httpmock::prelude::*;
    use hyper::ext::ReasonPhrase;
    use std::io::{Read, Write};
    use std::net::TcpListener;
    use std::thread;
    use std::time::Duration;

    fn request(method: &str, uri: String, body: Vec<u8>) -> Request<Vec<u8>> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header(ACCEPT, "application/json")
            .body(body)
            .unwrap()
    }

    fn client_with_timeout(timeout: Duration) -> HttpClient {
        HttpClient::new(HttpConfig::new(timeout, timeout, ProxyConfig::default())).unwrap()
    }

    #[test]
    fn send_returns_status_headers_and_body() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET)
                .path("/info")
                .header("accept", "application/json");
            then.status(200)
                .header("content-type", "application/json")
                .body(r#"{"esVersion":"5.0.8.0"}"#);
        });

        let client = client_with_timeout(Duration::from_secs(1));
        let response = EventStoreHttpClient::send(
            &client,
            request("GET", server.url("/info"), Vec::new()),
        )
        .unwrap();

        assert_eq!(response.status(), 200);
        assert_eq!(
            response.headers().get(CONTENT_TYPE).unwrap(),
            "application/json"
        );
        assert_eq!(response.body(), br#"{"esVersion":"5.0.8.0"}"#);
        mock.assert();
    }

    #[test]
    fn send_forwards_body() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(POST).path("/streams/orders").body("payload");
            then.status(201);
        });

        let client = client_with_timeout(Duration::from_secs(1));
        let response = EventStoreHttpClient::send(
            &client,
            request(
                "POST",
                server.url("/streams/orders"),
                b"payload".to_vec(),
            ),
        )
        .unwrap();

        assert_eq!(response.status(), 201);
        mock.assert();
    }

    #[test]
    fn unsuccessful_status_is_not_a_transport_error() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET).path("/streams/missing");
            then.status(404).body("not found");
        });

        let client = client_with_timeout(Duration::from_secs(1));
        let response = EventStoreHttpClient::send(
            &client,
            request("GET", server.url("/streams/missing"), Vec::new()),
        )
        .unwrap();

        assert_eq!(response.status(), 404);
        mock.assert();
    }

    #[test]
    fn non_canonical_reason_phrase_is_kept() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        let server = thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            let mut buf = [0u8; 1024];
            let _ = stream.read(&mut buf).unwrap();
            stream
                .write_all(b"HTTP/1.1 403 Access Denied By ACL\r\ncontent-length: 0\r\nconnection: close\r\n\r\n")
                .unwrap();
        });

        let client = client_with_timeout(Duration::from_secs(1));
        let response = EventStoreHttpClient::send(
            &client,
            request("GET", format!("http://{addr}/streams/$all"), Vec::new()),
        )
        .unwrap();
        server.join().unwrap();

        assert_eq!(response.status(), 403);
        assert_eq!(
            response.extensions().get::<ReasonPhrase>().unwrap().as_bytes(),
            b"Access Denied By ACL"
        );
    }

    #[test]
    fn timeout_is_a_transport_error() {
        let timeout = Duration::from_millis(10);
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET).path("/info");
            then.status(200)
                .delay(timeout.saturating_add(Duration::from_millis(100)));
        });

        let client = client_with_timeout(timeout);
        let err = EventStoreHttpClient::send(
            &client,
            request("GET", server.url("/info"), Vec::new()),
        )
        .unwrap_err();

        assert_matches!(err, HttpClientError::TransportError(_));
        mock.assert();
    }

    #[test]
    fn proxy_is_applied() {
        let proxy = ProxyConfig::new("http://localhost:3128").unwrap();
        let config = HttpConfig::new(Duration::from_secs(1), Duration::from_secs(1), proxy);
        assert!(HttpClient::new(config).is_ok());
    }
}
