use std::time::Duration;

use clap::{Args, Parser, Subcommand};
use tracing::Level;

use crate::client::Direction;
use crate::http::config::{HttpConfig, ProxyConfig, ProxyError};

pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(5);
const DEFAULT_PAGE_SIZE: u32 = 20;

#[derive(Parser, Debug)]
#[command(name = "eventstore-cli", about = "Query an EventStore node over its HTTP API")]
pub struct Cli {
    #[command(flatten)]
    pub connection: ConnectionArgs,

    /// Log requests and responses to stderr
    #[arg(long, short, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    pub fn log_level(&self) -> Level {
        if self.verbose { Level::DEBUG } else { Level::WARN }
    }
}

#[derive(Args, Debug, Clone)]
pub struct ConnectionArgs {
    /// Base url of the EventStore node, e.g. http://127.0.0.1:2113
    #[arg(long, short)]
    pub base_url: String,

    /// Username for basic auth. Leave empty for anonymous access
    #[arg(long, short, default_value = "")]
    pub username: String,

    /// Password for basic auth
    #[arg(long, short, default_value = "")]
    pub password: String,

    /// Request and connection timeout in seconds
    #[arg(long, default_value_t = DEFAULT_REQUEST_TIMEOUT.as_secs())]
    pub timeout_secs: u64,

    /// Proxy url. Falls back to HTTPS_PROXY and HTTP_PROXY when empty
    #[arg(long, default_value = "")]
    pub proxy_url: String,
}

impl ConnectionArgs {
    pub fn http_config(&self) -> Result<HttpConfig, ProxyError> {
        let timeout = Duration::from_secs(self.timeout_secs);
        let proxy = ProxyConfig::new(&self.proxy_url)?.try_with_url_from_env()?;
        Ok(HttpConfig::new(timeout, timeout, proxy))
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show version and state of the node
    Info,
    /// Read a page of events from a stream
    ReadStream {
        /// Name of the stream
        stream: String,

        /// Event number the page starts at. Reads the head of the stream when omitted
        #[arg(long)]
        start: Option<u64>,

        /// Number of events in the page, only used with --start
        #[arg(long, requires = "start", default_value_t = DEFAULT_PAGE_SIZE)]
        count: u32,

        /// Reading direction, only used with --start
        #[arg(long, value_enum, requires = "start", default_value_t = Direction::Forward)]
        direction: Direction,
    },
    /// Read a single event
    ReadEvent {
        /// Name of the stream
        stream: String,

        /// Number of the event in the stream
        event_number: u64,
    },
}
