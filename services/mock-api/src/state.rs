//! In-memory state of the development API

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use axum::http::{Method, StatusCode};
use chrono::{NaiveDate, TimeZone, Utc};
use common::models::{
    AttendanceStatus, AuthTokens, BankAccount, Guest, LoveStoryEntry, MediaItem, MediaKind,
    Person, ThemeSettings, User, UserRole, Wedding, WeddingEvent, WeddingStatus, Wish,
};
use tokio::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use uuid::Uuid;

use crate::error::{MockApiError, MockResult};

pub const USER_EMAIL: &str = "user@wedding.com";
pub const USER_PASSWORD: &str = "123456";
pub const ADMIN_EMAIL: &str = "admin@wedding.com";
pub const ADMIN_PASSWORD: &str = "admin123";

pub const SEED_USER_ID: Uuid = Uuid::from_u128(0x1111_0000_0000_0000_0000_0000_0000_0001);
pub const SEED_ADMIN_ID: Uuid = Uuid::from_u128(0x1111_0000_0000_0000_0000_0000_0000_0002);
pub const SEED_WEDDING_ID: Uuid = Uuid::from_u128(0x2222_0000_0000_0000_0000_0000_0000_0001);
pub const SEED_WEDDING_SLUG: &str = "anna-and-ben";
pub const SEED_GUEST_IDS: [Uuid; 2] = [
    Uuid::from_u128(0x3333_0000_0000_0000_0000_0000_0000_0001),
    Uuid::from_u128(0x3333_0000_0000_0000_0000_0000_0000_0002),
];
pub const SEED_WISH_IDS: [Uuid; 2] = [
    Uuid::from_u128(0x4444_0000_0000_0000_0000_0000_0000_0001),
    Uuid::from_u128(0x4444_0000_0000_0000_0000_0000_0000_0002),
];
pub const SEED_MEDIA_IDS: [Uuid; 3] = [
    Uuid::from_u128(0x5555_0000_0000_0000_0000_0000_0000_000a),
    Uuid::from_u128(0x5555_0000_0000_0000_0000_0000_0000_000b),
    Uuid::from_u128(0x5555_0000_0000_0000_0000_0000_0000_000c),
];

/// Registered account with its plain-text development password
#[derive(Debug, Clone)]
pub struct Account {
    pub user: User,
    pub password: String,
}

#[derive(Debug, Default)]
pub struct Db {
    pub accounts: Vec<Account>,
    pub access_tokens: HashMap<String, Uuid>,
    pub refresh_tokens: HashMap<String, Uuid>,
    pub weddings: HashMap<Uuid, Wedding>,
    pub guests: HashMap<Uuid, Guest>,
    pub wishes: HashMap<Uuid, Wish>,
    pub media: HashMap<Uuid, MediaItem>,
}

impl Db {
    pub fn issue_tokens(&mut self, user_id: Uuid) -> AuthTokens {
        let tokens = AuthTokens {
            access_token: format!("at_{}", Uuid::new_v4().simple()),
            refresh_token: format!("rt_{}", Uuid::new_v4().simple()),
        };
        self.access_tokens
            .insert(tokens.access_token.clone(), user_id);
        self.refresh_tokens
            .insert(tokens.refresh_token.clone(), user_id);
        tokens
    }

    /// Drop every token belonging to `user_id`
    pub fn revoke_user(&mut self, user_id: Uuid) {
        self.access_tokens.retain(|_, owner| *owner != user_id);
        self.refresh_tokens.retain(|_, owner| *owner != user_id);
    }

    pub fn user(&self, id: Uuid) -> Option<&User> {
        self.accounts
            .iter()
            .map(|account| &account.user)
            .find(|user| user.id == id)
    }

    pub fn user_by_access_token(&self, token: &str) -> Option<&User> {
        self.access_tokens
            .get(token)
            .and_then(|user_id| self.user(*user_id))
    }

    /// Wedding visible to `user`: its owner or any admin
    pub fn wedding_for(&self, user: &User, id: Uuid) -> MockResult<&Wedding> {
        self.weddings
            .get(&id)
            .filter(|w| user.is_admin() || w.user_id == user.id)
            .ok_or(MockApiError::NotFound("Wedding"))
    }

    pub fn wedding_for_mut(&mut self, user: &User, id: Uuid) -> MockResult<&mut Wedding> {
        self.weddings
            .get_mut(&id)
            .filter(|w| user.is_admin() || w.user_id == user.id)
            .ok_or(MockApiError::NotFound("Wedding"))
    }

    pub fn slug_taken(&self, slug: &str, except: Option<Uuid>) -> bool {
        self.weddings
            .values()
            .any(|w| w.slug == slug && Some(w.id) != except)
    }
}

#[derive(Debug, Clone)]
struct FailureRule {
    method: Method,
    path: String,
    status: StatusCode,
}

/// Shared handle to the development API state
#[derive(Clone, Default)]
pub struct MockState {
    db: Arc<RwLock<Db>>,
    failures: Arc<Mutex<Vec<FailureRule>>>,
    requests: Arc<AtomicUsize>,
}

impl MockState {
    /// No accounts and no data
    pub fn empty() -> Self {
        Self::default()
    }

    /// Two accounts and one fully populated wedding
    pub fn seeded() -> Self {
        Self {
            db: Arc::new(RwLock::new(seed())),
            ..Self::default()
        }
    }

    pub async fn read(&self) -> RwLockReadGuard<'_, Db> {
        self.db.read().await
    }

    pub async fn write(&self) -> RwLockWriteGuard<'_, Db> {
        self.db.write().await
    }

    /// Requests received since startup
    pub fn request_count(&self) -> usize {
        self.requests.load(Ordering::SeqCst)
    }

    pub(crate) fn record_request(&self) {
        self.requests.fetch_add(1, Ordering::SeqCst);
    }

    /// Answer the next `method path` request with `status` instead of handling it
    pub fn fail_next(&self, method: Method, path: impl Into<String>, status: StatusCode) {
        self.failures
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(FailureRule {
                method,
                path: path.into(),
                status,
            });
    }

    pub(crate) fn take_failure(&self, method: &Method, path: &str) -> Option<StatusCode> {
        let mut failures = self.failures.lock().unwrap_or_else(PoisonError::into_inner);
        let index = failures
            .iter()
            .position(|rule| rule.method == *method && rule.path == path)?;
        Some(failures.remove(index).status)
    }

    /// Invalidate every access token, as if all sessions expired
    pub async fn revoke_access_tokens(&self) {
        self.db.write().await.access_tokens.clear();
    }
}

fn seed() -> Db {
    let created_at = Utc.with_ymd_and_hms(2025, 1, 10, 9, 0, 0).single().unwrap_or_else(Utc::now);

    let user = User {
        id: SEED_USER_ID,
        email: USER_EMAIL.to_string(),
        display_name: "Anna".to_string(),
        role: UserRole::Standard,
        created_at,
    };
    let admin = User {
        id: SEED_ADMIN_ID,
        email: ADMIN_EMAIL.to_string(),
        display_name: "Admin".to_string(),
        role: UserRole::Admin,
        created_at,
    };

    let ceremony_at = Utc
        .with_ymd_and_hms(2025, 6, 14, 8, 0, 0)
        .single()
        .unwrap_or(created_at);

    let wedding = Wedding {
        id: SEED_WEDDING_ID,
        user_id: SEED_USER_ID,
        title: "Anna & Ben".to_string(),
        slug: SEED_WEDDING_SLUG.to_string(),
        date: NaiveDate::from_ymd_opt(2025, 6, 14),
        status: WeddingStatus::Published,
        bride: Person {
            full_name: "Anna Lestari".to_string(),
            nickname: Some("Anna".to_string()),
            ..Person::default()
        },
        groom: Person {
            full_name: "Ben Hartono".to_string(),
            nickname: Some("Ben".to_string()),
            ..Person::default()
        },
        events: vec![WeddingEvent {
            id: Uuid::new_v4(),
            name: "Holy Matrimony".to_string(),
            starts_at: ceremony_at,
            ends_at: None,
            venue: "St. Mary Chapel".to_string(),
            address: Some("Jl. Merdeka 1".to_string()),
            map_url: None,
        }],
        love_story: vec![LoveStoryEntry {
            id: Uuid::new_v4(),
            title: "First meeting".to_string(),
            story: "We met at a friend's birthday party.".to_string(),
            happened_on: NaiveDate::from_ymd_opt(2019, 3, 2),
            image_url: None,
        }],
        bank_accounts: vec![BankAccount {
            id: Uuid::new_v4(),
            bank_name: "BCA".to_string(),
            account_number: "1234567890".to_string(),
            account_holder: "Anna Lestari".to_string(),
        }],
        theme: Some(ThemeSettings {
            primary_color: Some("Blush Pink".to_string()),
            ..ThemeSettings::default()
        }),
        created_at,
        updated_at: created_at,
    };

    let guest = |id: Uuid, name: &str, status: AttendanceStatus, party_size: u32| Guest {
        id,
        wedding_id: SEED_WEDDING_ID,
        full_name: name.to_string(),
        email: None,
        phone: None,
        party_size,
        status,
        message: None,
        is_active: true,
        created_at,
        updated_at: created_at,
    };

    let wish = |id: Uuid, name: &str, message: &str, is_approved: bool| Wish {
        id,
        wedding_id: SEED_WEDDING_ID,
        guest_name: name.to_string(),
        message: message.to_string(),
        is_approved,
        is_active: true,
        created_at,
    };

    let media = |id: Uuid, order: i32| MediaItem {
        id,
        wedding_id: SEED_WEDDING_ID,
        kind: MediaKind::Image,
        url: format!("https://cdn.wedding.test/{}.jpg", id.simple()),
        caption: None,
        order,
        created_at,
    };

    let mut db = Db {
        accounts: vec![
            Account {
                user,
                password: USER_PASSWORD.to_string(),
            },
            Account {
                user: admin,
                password: ADMIN_PASSWORD.to_string(),
            },
        ],
        ..Db::default()
    };

    db.weddings.insert(wedding.id, wedding);
    for g in [
        guest(SEED_GUEST_IDS[0], "Rina", AttendanceStatus::Confirmed, 2),
        guest(SEED_GUEST_IDS[1], "Dimas", AttendanceStatus::Pending, 1),
    ] {
        db.guests.insert(g.id, g);
    }
    for w in [
        wish(SEED_WISH_IDS[0], "Rina", "Congratulations!", true),
        wish(SEED_WISH_IDS[1], "Dimas", "Happy wedding!", false),
    ] {
        db.wishes.insert(w.id, w);
    }
    for (order, id) in SEED_MEDIA_IDS.iter().enumerate() {
        let item = media(*id, order as i32);
        db.media.insert(item.id, item);
    }

    db
}
