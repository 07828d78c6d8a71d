//! Wedding model with its nested detail

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::Identified;

/// Publication status of a wedding page
///
/// Any status may be set from any other; there is no transition table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WeddingStatus {
    #[default]
    Draft,
    Published,
    Archived,
}

/// Bride or groom profile
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Person {
    pub full_name: String,
    pub nickname: Option<String>,
    pub father_name: Option<String>,
    pub mother_name: Option<String>,
    pub photo_url: Option<String>,
    pub instagram: Option<String>,
}

/// One entry of the event schedule (ceremony, reception, ...)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeddingEvent {
    pub id: Uuid,
    pub name: String,
    pub starts_at: DateTime<Utc>,
    pub ends_at: Option<DateTime<Utc>>,
    pub venue: String,
    pub address: Option<String>,
    pub map_url: Option<String>,
}

/// One entry of the love-story timeline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoveStoryEntry {
    pub id: Uuid,
    pub title: String,
    pub story: String,
    pub happened_on: Option<NaiveDate>,
    pub image_url: Option<String>,
}

/// Bank account shown in the gift section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BankAccount {
    pub id: Uuid,
    pub bank_name: String,
    pub account_number: String,
    pub account_holder: String,
}

/// Persisted color/style descriptor, resolved to a template at render time
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ThemeSettings {
    pub template_id: Option<String>,
    pub primary_color: Option<String>,
    pub secondary_color: Option<String>,
    pub font_family: Option<String>,
}

/// Wedding entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Wedding {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub slug: String,
    pub date: Option<NaiveDate>,
    #[serde(default)]
    pub status: WeddingStatus,
    #[serde(default)]
    pub bride: Person,
    #[serde(default)]
    pub groom: Person,
    #[serde(default)]
    pub events: Vec<WeddingEvent>,
    #[serde(default)]
    pub love_story: Vec<LoveStoryEntry>,
    #[serde(default)]
    pub bank_accounts: Vec<BankAccount>,
    #[serde(default)]
    pub theme: Option<ThemeSettings>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Identified for Wedding {
    fn id(&self) -> Uuid {
        self.id
    }
}

/// New wedding creation payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewWedding {
    pub title: String,
    pub slug: String,
    pub date: Option<NaiveDate>,
}

/// Wedding partial-update payload
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct UpdateWedding {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<WeddingStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bride: Option<Person>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub groom: Option<Person>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub events: Option<Vec<WeddingEvent>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub love_story: Option<Vec<LoveStoryEntry>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bank_accounts: Option<Vec<BankAccount>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub theme: Option<ThemeSettings>,
}

impl UpdateWedding {
    /// Apply every present field onto `wedding`
    pub fn apply_to(self, wedding: &mut Wedding) {
        if let Some(title) = self.title {
            wedding.title = title;
        }
        if let Some(slug) = self.slug {
            wedding.slug = slug;
        }
        if let Some(date) = self.date {
            wedding.date = Some(date);
        }
        if let Some(status) = self.status {
            wedding.status = status;
        }
        if let Some(bride) = self.bride {
            wedding.bride = bride;
        }
        if let Some(groom) = self.groom {
            wedding.groom = groom;
        }
        if let Some(events) = self.events {
            wedding.events = events;
        }
        if let Some(love_story) = self.love_story {
            wedding.love_story = love_story;
        }
        if let Some(bank_accounts) = self.bank_accounts {
            wedding.bank_accounts = bank_accounts;
        }
        if let Some(theme) = self.theme {
            wedding.theme = Some(theme);
        }
    }
}
