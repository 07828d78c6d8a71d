//! Wedding store

use std::sync::{Arc, Mutex};

use common::models::{NewWedding, UpdateWedding, Wedding, WeddingStatus};
use serde::Deserialize;
use serde_json::json;
use tracing::info;
use uuid::Uuid;

use super::{StoreCell, StoreState, lock, remove, upsert};
use crate::api::{ApiClient, ApiResult};

/// GraphQL operation behind the public invitation page
pub const WEDDING_BY_SLUG_QUERY: &str = r#"query WeddingBySlug($slug: String!) {
  wedding(slug: $slug) {
    id user_id title slug date status
    bride groom events love_story bank_accounts theme
    created_at updated_at
  }
}"#;

#[derive(Deserialize)]
struct WeddingBySlugData {
    wedding: Option<Wedding>,
}

/// Owns the signed-in user's weddings and the wedding currently on screen
pub struct WeddingStore {
    api: Arc<ApiClient>,
    cell: StoreCell<Wedding>,
    current: Mutex<Option<Wedding>>,
}

impl WeddingStore {
    pub fn new(api: Arc<ApiClient>) -> Self {
        Self {
            api,
            cell: StoreCell::new(),
            current: Mutex::new(None),
        }
    }

    pub fn state(&self) -> StoreState<Wedding> {
        self.cell.snapshot()
    }

    pub fn current(&self) -> Option<Wedding> {
        lock(&self.current).clone()
    }

    /// Load every wedding, replacing the collection
    pub async fn fetch_all(&self) -> ApiResult<Vec<Wedding>> {
        info!("Fetching weddings");
        self.cell
            .track(
                "Failed to load weddings",
                self.api.get::<Vec<Wedding>>("/weddings"),
                |state, weddings| state.items = weddings.clone(),
            )
            .await
    }

    /// Load one wedding's full detail and make it current
    pub async fn fetch_one(&self, id: Uuid) -> ApiResult<Wedding> {
        info!("Fetching wedding: {}", id);
        let wedding = self
            .cell
            .track(
                "Failed to load wedding",
                self.api.get::<Wedding>(&format!("/weddings/{}", id)),
                |state, wedding| upsert(&mut state.items, wedding.clone()),
            )
            .await?;

        *lock(&self.current) = Some(wedding.clone());
        Ok(wedding)
    }

    /// Load a wedding for its public page; `Ok(None)` when the slug is unknown
    pub async fn fetch_by_slug(&self, slug: &str) -> ApiResult<Option<Wedding>> {
        info!("Fetching public wedding: {}", slug);
        let data = self
            .cell
            .track(
                "Failed to load invitation",
                self.api.graphql::<_, WeddingBySlugData>(
                    "WeddingBySlug",
                    WEDDING_BY_SLUG_QUERY,
                    json!({ "slug": slug }),
                ),
                |_, _| {},
            )
            .await?;

        *lock(&self.current) = data.wedding.clone();
        Ok(data.wedding)
    }

    pub async fn create(&self, payload: &NewWedding) -> ApiResult<Wedding> {
        info!("Creating wedding: {}", payload.slug);
        self.cell
            .track(
                "Failed to create wedding",
                self.api.post::<_, Wedding>("/weddings", payload),
                |state, wedding| upsert(&mut state.items, wedding.clone()),
            )
            .await
    }

    /// Partial update; the server-confirmed record replaces the local one
    pub async fn update(&self, id: Uuid, patch: &UpdateWedding) -> ApiResult<Wedding> {
        info!("Updating wedding: {}", id);
        let wedding = self
            .cell
            .track(
                "Failed to update wedding",
                self.api
                    .patch::<_, Wedding>(&format!("/weddings/{}", id), patch),
                |state, wedding| upsert(&mut state.items, wedding.clone()),
            )
            .await?;

        self.refresh_current(&wedding);
        Ok(wedding)
    }

    /// Any status may be set from any other
    pub async fn set_status(&self, id: Uuid, status: WeddingStatus) -> ApiResult<Wedding> {
        let patch = UpdateWedding {
            status: Some(status),
            ..UpdateWedding::default()
        };
        self.update(id, &patch).await
    }

    pub async fn delete(&self, id: Uuid) -> ApiResult<()> {
        info!("Deleting wedding: {}", id);
        self.cell
            .track(
                "Failed to delete wedding",
                self.api.delete(&format!("/weddings/{}", id)),
                |state, _| {
                    remove(&mut state.items, id);
                },
            )
            .await?;

        let mut current = lock(&self.current);
        if current.as_ref().is_some_and(|w| w.id == id) {
            *current = None;
        }
        Ok(())
    }

    pub fn reset(&self) {
        self.cell.reset();
        *lock(&self.current) = None;
    }

    fn refresh_current(&self, wedding: &Wedding) {
        let mut current = lock(&self.current);
        if current.as_ref().is_some_and(|w| w.id == wedding.id) {
            *current = Some(wedding.clone());
        }
    }
}
