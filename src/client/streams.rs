use std::fmt;

use clap::ValueEnum;
use http::Method;
use serde::{Deserialize, Serialize};

use crate::http_client::HttpClient;
use crate::server_info::ServerInfo;
use crate::stream_feed::{EventEntry, StreamFeed};

use super::EventStoreClient;
use super::error::ClientError;

/// Reading direction of a stream page.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    #[value(name = "forward")]
    Forward,
    #[value(name = "backward")]
    Backward,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Forward => write!(f, "forward"),
            Direction::Backward => write!(f, "backward"),
        }
    }
}

impl<C> EventStoreClient<C>
where
    C: HttpClient,
{
    pub fn server_info(&self) -> Result<ServerInfo, ClientError> {
        self.make_request(Method::GET, "/info", None)
    }

    /// Reads the head page of `stream` with event bodies embedded.
    pub fn read_stream(&self, stream: &str) -> Result<StreamFeed, ClientError> {
        validate_stream_name(stream)?;
        self.make_request(Method::GET, &format!("/streams/{stream}?embed=body"), None)
    }

    /// Reads `count` events of `stream` starting at `start` in the given direction.
    pub fn read_stream_page(
        &self,
        stream: &str,
        start: u64,
        count: u32,
        direction: Direction,
    ) -> Result<StreamFeed, ClientError> {
        validate_stream_name(stream)?;
        if count == 0 {
            return Err(ClientError::InvalidRequest(
                "page size must be greater than zero".to_string(),
            ));
        }
        self.make_request(
            Method::GET,
            &format!("/streams/{stream}/{start}/{direction}/{count}?embed=body"),
            None,
        )
    }

    pub fn read_event(&self, stream: &str, event_number: u64) -> Result<EventEntry, ClientError> {
        validate_stream_name(stream)?;
        self.make_request(Method::GET, &format!("/streams/{stream}/{event_number}"), None)
    }
}

fn validate_stream_name(stream: &str) -> Result<(), ClientError> {
    if stream.is_empty() {
        return Err(ClientError::InvalidRequest(
            "stream name cannot be empty".to_string(),
        ));
    }
    if stream
        .chars()
        .any(|c| c.is_whitespace() || matches!(c, '/' | '?' | '#'))
    {
        return Err(ClientError::InvalidRequest(format!(
            "invalid stream name `{stream}`"
        )));
    }
    Ok(())
}
