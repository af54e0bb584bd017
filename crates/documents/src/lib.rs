/// Document domain model shared by the store, the transport clients and
/// the coordinator.
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

mod sorting;
pub use sorting::*;

/// A document as listed to the user.
///
/// Immutable once constructed; state updates replace whole documents
/// rather than mutating them in place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    /// Unique document ID (server-issued, or a fresh UUID for local creations)
    pub id: String,

    /// Display name
    pub name: String,

    /// People who worked on the document
    pub contributors: Vec<Contributor>,

    /// Document version, starting at 1
    pub version: u32,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,

    /// Attached files
    pub attachments: Vec<Attachment>,
}

impl Document {
    /// Build a locally-created document: fresh ID, version 1, current time.
    pub fn new(
        name: impl Into<String>,
        contributors: Vec<Contributor>,
        attachments: Vec<Attachment>,
    ) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            name: name.into(),
            contributors,
            version: 1,
            created_at: Utc::now(),
            attachments,
        }
    }
}

/// A person listed on a document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Contributor {
    pub name: String,
    pub avatar_url: Option<String>,
}

impl Contributor {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            avatar_url: None,
        }
    }
}

/// A file attached to a document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attachment {
    pub name: String,
    pub size_bytes: u64,
}

/// Field the document list is ordered by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortBy {
    Name,
    Version,
    CreatedAt,
}

/// Direction of the active sort
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    Asc,
    Desc,
}

/// List or grid presentation of the document collection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViewMode {
    List,
    Grid,
}

impl ViewMode {
    pub fn toggled(self) -> Self {
        match self {
            ViewMode::List => ViewMode::Grid,
            ViewMode::Grid => ViewMode::List,
        }
    }
}
