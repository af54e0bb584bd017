use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Messages carried over the live channel.
///
/// Anything that fails to parse as one of these is logged and dropped;
/// a malformed frame is never fatal to the connection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum LiveMessage {
    /// Another client created a document
    #[serde(rename = "document_created")]
    DocumentCreated {
        document_id: String,
        title: String,
        created_by: String,
        created_at: DateTime<Utc>,
    },

    /// Server heartbeat; answered with `pong`
    #[serde(rename = "ping")]
    Ping,

    #[serde(rename = "pong")]
    Pong,
}
