use thiserror::Error;

use crate::http_client::HttpClientError;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("invalid base url `{0}`: `{1}`")]
    InvalidUrl(String, String),
    #[error("building the http client: `{0}`")]
    HttpClientBuild(String),
    #[error("building the request: `{0}`")]
    InvalidRequest(String),
    #[error("sending the request: `{0}`")]
    Transport(#[from] HttpClientError),
    #[error("unsuccessful response: `{status} {reason}`. Body: `{body}`")]
    HttpStatus {
        status: u16,
        reason: String,
        body: String,
    },
    #[error("decoding the response body: `{0}`")]
    Decode(String),
}
