//! Guest model and RSVP payloads

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{Identified, SoftDelete};

/// Guest attendance (RSVP) status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AttendanceStatus {
    #[default]
    Pending,
    Confirmed,
    Declined,
}

/// Guest entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Guest {
    pub id: Uuid,
    pub wedding_id: Uuid,
    #[serde(default)]
    pub full_name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub party_size: u32,
    #[serde(default)]
    pub status: AttendanceStatus,
    pub message: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Identified for Guest {
    fn id(&self) -> Uuid {
        self.id
    }
}

impl SoftDelete for Guest {
    fn is_active(&self) -> bool {
        self.is_active
    }

    fn deactivate(&mut self) {
        self.is_active = false;
    }
}

/// Guest update payload
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct UpdateGuest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub party_size: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<AttendanceStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl UpdateGuest {
    /// Apply every present field onto `guest`
    pub fn apply_to(self, guest: &mut Guest) {
        if let Some(full_name) = self.full_name {
            guest.full_name = full_name;
        }
        if let Some(email) = self.email {
            guest.email = Some(email);
        }
        if let Some(phone) = self.phone {
            guest.phone = Some(phone);
        }
        if let Some(party_size) = self.party_size {
            guest.party_size = party_size;
        }
        if let Some(status) = self.status {
            guest.status = status;
        }
        if let Some(message) = self.message {
            guest.message = Some(message);
        }
    }
}

/// RSVP submitted from the public invitation page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RsvpResponse {
    pub status: AttendanceStatus,
    pub party_size: u32,
    pub message: Option<String>,
}
