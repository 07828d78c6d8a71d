//! Gallery media models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::Identified;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    #[default]
    Image,
    Video,
}

/// Media item model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MediaItem {
    pub id: Uuid,
    pub wedding_id: Uuid,
    #[serde(rename = "type")]
    pub kind: MediaKind,
    pub url: String,
    pub caption: Option<String>,
    /// Position in the gallery, lowest first
    pub order: i32,
    pub created_at: DateTime<Utc>,
}

impl Identified for MediaItem {
    fn id(&self) -> Uuid {
        self.id
    }
}

/// New media item payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewMediaItem {
    #[serde(rename = "type")]
    pub kind: MediaKind,
    pub url: String,
    pub caption: Option<String>,
}

/// Media item update payload
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct UpdateMediaItem {
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<MediaKind>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub caption: Option<String>,
}

/// Bulk order rewrite: `ids[i]` receives order value `i`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReorderMedia {
    pub ids: Vec<Uuid>,
}
