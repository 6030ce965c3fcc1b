use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

/// Atom link attached to feeds and entries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Link {
    pub uri: String,
    pub relation: String,
}

/// A page of a stream as returned by `GET /streams/{stream}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StreamFeed {
    pub title: String,
    pub id: String,
    pub updated: DateTime<Utc>,
    #[serde(default)]
    pub stream_id: Option<String>,
    #[serde(default)]
    pub head_of_stream: bool,
    #[serde(default)]
    pub links: Vec<Link>,
    #[serde(default)]
    pub entries: Vec<FeedEntry>,
}

impl StreamFeed {
    /// Uri of the first link with the given relation (`self`, `first`, `next`, `previous`...).
    pub fn link(&self, relation: &str) -> Option<&str> {
        find_link(&self.links, relation)
    }
}

/// Event summary listed in a [`StreamFeed`]. Event fields are only present when the body is embedded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedEntry {
    pub title: String,
    pub id: String,
    pub updated: DateTime<Utc>,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub event_id: Option<Uuid>,
    #[serde(default)]
    pub event_type: Option<String>,
    #[serde(default)]
    pub event_number: Option<u64>,
    #[serde(default)]
    pub data: Option<Value>,
    #[serde(default)]
    pub links: Vec<Link>,
}

impl FeedEntry {
    pub fn link(&self, relation: &str) -> Option<&str> {
        find_link(&self.links, relation)
    }
}

/// A single event as returned by `GET /streams/{stream}/{event_number}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventEntry {
    pub title: String,
    pub id: String,
    pub updated: DateTime<Utc>,
    #[serde(default)]
    pub summary: String,
    pub content: RecordedEvent,
    #[serde(default)]
    pub links: Vec<Link>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordedEvent {
    pub event_stream_id: String,
    pub event_number: u64,
    pub event_type: String,
    #[serde(default)]
    pub event_id: Option<Uuid>,
    #[serde(default)]
    pub data: Value,
    #[serde(default)]
    pub metadata: Value,
}

fn find_link<'a>(links: &'a [Link], relation: &str) -> Option<&'a str> {
    links
        .iter()
        .find(|l| l.relation == relation)
        .map(|l| l.uri.as_str())
}
