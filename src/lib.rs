pub mod client;
pub mod http;
pub mod http_client;
pub mod parameters;
pub mod server_info;
pub mod stream_feed;

pub use client::EventStoreClient;
pub use client::error::ClientError;
