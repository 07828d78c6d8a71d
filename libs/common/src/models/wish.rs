//! Guest wish model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{Identified, SoftDelete};

/// Guest-submitted message tied to a wedding
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Wish {
    pub id: Uuid,
    pub wedding_id: Uuid,
    pub guest_name: String,
    pub message: String,
    /// Gates public visibility
    pub is_approved: bool,
    /// Gates existence
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl Wish {
    pub fn is_visible(&self) -> bool {
        self.is_active && self.is_approved
    }
}

impl Identified for Wish {
    fn id(&self) -> Uuid {
        self.id
    }
}

impl SoftDelete for Wish {
    fn is_active(&self) -> bool {
        self.is_active
    }

    fn deactivate(&mut self) {
        self.is_active = false;
    }
}

/// Wish submission payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewWish {
    pub guest_name: String,
    pub message: String,
}

/// Wish update payload
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct UpdateWish {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_approved: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}
