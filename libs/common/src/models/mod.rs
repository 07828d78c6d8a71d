//! Domain models shared by the client state layer and the development API

pub mod guest;
pub mod media;
pub mod user;
pub mod wedding;
pub mod wish;

use uuid::Uuid;

// Re-export for convenience
pub use guest::{AttendanceStatus, Guest, RsvpResponse, UpdateGuest};
pub use media::{MediaItem, MediaKind, NewMediaItem, ReorderMedia, UpdateMediaItem};
pub use user::{AuthTokens, LoginCredentials, LoginResponse, RefreshRequest, User, UserRole};
pub use wedding::{
    BankAccount, LoveStoryEntry, NewWedding, Person, ThemeSettings, UpdateWedding, Wedding,
    WeddingEvent, WeddingStatus,
};
pub use wish::{NewWish, UpdateWish, Wish};

/// Records addressed by a server-assigned id
pub trait Identified {
    fn id(&self) -> Uuid;
}

/// Records that are marked inactive instead of being purged
pub trait SoftDelete {
    fn is_active(&self) -> bool;
    fn deactivate(&mut self);
}
