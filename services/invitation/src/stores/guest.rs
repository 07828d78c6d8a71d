//! Guest store and RSVP state
//!
//! Guests are created in two phases because the API only creates empty
//! records: the record is reserved first, then its details are patched in.
//! Between the phases the reserved record is already part of the collection
//! with an empty name (see [`GuestStore::create`]).

use std::sync::Arc;

use common::models::{AttendanceStatus, Guest, RsvpResponse, UpdateGuest};
use serde_json::json;
use thiserror::Error;
use tracing::{info, warn};
use uuid::Uuid;

use super::{StoreCell, StoreState, deactivate, upsert};
use crate::api::{ApiClient, ApiError, ApiResult};

/// Failure of the two-phase guest creation
#[derive(Error, Debug)]
pub enum GuestCreateError {
    /// Nothing was created
    #[error("Failed to reserve guest record: {0}")]
    Reserve(#[source] ApiError),

    /// The empty record exists; patching `guest_id` again completes it
    #[error("Guest {guest_id} was created but its details could not be saved: {source}")]
    Populate {
        guest_id: Uuid,
        #[source]
        source: ApiError,
    },
}

impl GuestCreateError {
    pub fn api_error(&self) -> &ApiError {
        match self {
            GuestCreateError::Reserve(e) => e,
            GuestCreateError::Populate { source, .. } => source,
        }
    }
}

/// Attendance summary over active guests
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GuestStats {
    pub total: usize,
    pub pending: usize,
    pub confirmed: usize,
    pub declined: usize,
    /// Sum of party sizes over confirmed guests
    pub attending_headcount: u32,
}

impl GuestStats {
    pub fn from_guests<'a>(guests: impl IntoIterator<Item = &'a Guest>) -> Self {
        let mut stats = Self::default();
        for guest in guests.into_iter().filter(|g| g.is_active) {
            stats.total += 1;
            match guest.status {
                AttendanceStatus::Pending => stats.pending += 1,
                AttendanceStatus::Confirmed => {
                    stats.confirmed += 1;
                    stats.attending_headcount += guest.party_size;
                }
                AttendanceStatus::Declined => stats.declined += 1,
            }
        }
        stats
    }
}

pub struct GuestStore {
    api: Arc<ApiClient>,
    cell: StoreCell<Guest>,
}

impl GuestStore {
    pub fn new(api: Arc<ApiClient>) -> Self {
        Self {
            api,
            cell: StoreCell::new(),
        }
    }

    pub fn state(&self) -> StoreState<Guest> {
        self.cell.snapshot()
    }

    pub fn active(&self) -> Vec<Guest> {
        self.cell
            .read(|state| state.items.iter().filter(|g| g.is_active).cloned().collect())
    }

    pub fn by_status(&self, status: AttendanceStatus) -> Vec<Guest> {
        self.cell.read(|state| {
            state
                .items
                .iter()
                .filter(|g| g.is_active && g.status == status)
                .cloned()
                .collect()
        })
    }

    pub fn stats(&self) -> GuestStats {
        self.cell.read(|state| GuestStats::from_guests(&state.items))
    }

    pub async fn fetch(&self, wedding_id: Uuid) -> ApiResult<Vec<Guest>> {
        info!("Fetching guests for wedding: {}", wedding_id);
        self.cell
            .track(
                "Failed to load guests",
                self.api
                    .get::<Vec<Guest>>(&format!("/weddings/{}/guests", wedding_id)),
                |state, guests| state.items = guests.clone(),
            )
            .await
    }

    /// Phase one: reserve an empty guest record
    pub async fn create_empty(&self, wedding_id: Uuid) -> ApiResult<Guest> {
        info!("Reserving guest record for wedding: {}", wedding_id);
        self.cell
            .track(
                "Failed to add guest",
                self.api
                    .post::<_, Guest>(&format!("/weddings/{}/guests", wedding_id), &json!({})),
                |state, guest| upsert(&mut state.items, guest.clone()),
            )
            .await
    }

    pub async fn update(&self, id: Uuid, patch: &UpdateGuest) -> ApiResult<Guest> {
        info!("Updating guest: {}", id);
        self.cell
            .track(
                "Failed to update guest",
                self.api.patch::<_, Guest>(&format!("/guests/{}", id), patch),
                |state, guest| upsert(&mut state.items, guest.clone()),
            )
            .await
    }

    /// Create a guest with its details: reserve, then patch
    ///
    /// If the patch fails the reserved record stays in the collection and
    /// on the server; [`GuestCreateError::Populate`] carries its id.
    pub async fn create(
        &self,
        wedding_id: Uuid,
        details: &UpdateGuest,
    ) -> Result<Guest, GuestCreateError> {
        let reserved = self
            .create_empty(wedding_id)
            .await
            .map_err(GuestCreateError::Reserve)?;

        self.update(reserved.id, details).await.map_err(|source| {
            warn!("Guest {} left without details", reserved.id);
            GuestCreateError::Populate {
                guest_id: reserved.id,
                source,
            }
        })
    }

    /// Soft delete: the guest stays in the collection, marked inactive
    pub async fn remove(&self, id: Uuid) -> ApiResult<()> {
        info!("Deactivating guest: {}", id);
        self.cell
            .track(
                "Failed to remove guest",
                self.api.delete(&format!("/guests/{}", id)),
                |state, _| {
                    deactivate(&mut state.items, id);
                },
            )
            .await
    }

    /// Submit an RSVP from the public invitation page
    pub async fn respond(&self, id: Uuid, rsvp: &RsvpResponse) -> ApiResult<Guest> {
        info!("RSVP for guest {}: {:?}", id, rsvp.status);
        self.cell
            .track(
                "Failed to send your response",
                self.api
                    .post::<_, Guest>(&format!("/public/guests/{}/rsvp", id), rsvp),
                |state, guest| upsert(&mut state.items, guest.clone()),
            )
            .await
    }

    pub fn reset(&self) {
        self.cell.reset();
    }
}
