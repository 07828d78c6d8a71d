//! Wish store

use std::sync::Arc;

use common::models::{NewWish, UpdateWish, Wish};
use tracing::info;
use uuid::Uuid;

use super::{StoreCell, StoreState, deactivate, upsert};
use crate::api::{ApiClient, ApiResult};

pub struct WishStore {
    api: Arc<ApiClient>,
    cell: StoreCell<Wish>,
}

impl WishStore {
    pub fn new(api: Arc<ApiClient>) -> Self {
        Self {
            api,
            cell: StoreCell::new(),
        }
    }

    pub fn state(&self) -> StoreState<Wish> {
        self.cell.snapshot()
    }

    /// Wishes shown on the public page: approved and active
    pub fn visible(&self) -> Vec<Wish> {
        self.cell
            .read(|state| state.items.iter().filter(|w| w.is_visible()).cloned().collect())
    }

    /// Active wishes still waiting for approval
    pub fn pending_approval(&self) -> Vec<Wish> {
        self.cell.read(|state| {
            state
                .items
                .iter()
                .filter(|w| w.is_active && !w.is_approved)
                .cloned()
                .collect()
        })
    }

    pub async fn fetch(&self, wedding_id: Uuid) -> ApiResult<Vec<Wish>> {
        info!("Fetching wishes for wedding: {}", wedding_id);
        self.cell
            .track(
                "Failed to load wishes",
                self.api
                    .get::<Vec<Wish>>(&format!("/weddings/{}/wishes", wedding_id)),
                |state, wishes| state.items = wishes.clone(),
            )
            .await
    }

    /// Guest submission from the public page; starts unapproved
    pub async fn submit(&self, wedding_id: Uuid, wish: &NewWish) -> ApiResult<Wish> {
        info!("Submitting wish for wedding: {}", wedding_id);
        self.cell
            .track(
                "Failed to send your wish",
                self.api
                    .post::<_, Wish>(&format!("/public/weddings/{}/wishes", wedding_id), wish),
                |state, wish| upsert(&mut state.items, wish.clone()),
            )
            .await
    }

    pub async fn update(&self, id: Uuid, patch: &UpdateWish) -> ApiResult<Wish> {
        info!("Updating wish: {}", id);
        self.cell
            .track(
                "Failed to update wish",
                self.api.patch::<_, Wish>(&format!("/wishes/{}", id), patch),
                |state, wish| upsert(&mut state.items, wish.clone()),
            )
            .await
    }

    pub async fn approve(&self, id: Uuid) -> ApiResult<Wish> {
        self.set_approved(id, true).await
    }

    pub async fn unapprove(&self, id: Uuid) -> ApiResult<Wish> {
        self.set_approved(id, false).await
    }

    /// Soft delete: the wish stays in the collection, marked inactive
    pub async fn remove(&self, id: Uuid) -> ApiResult<()> {
        info!("Deactivating wish: {}", id);
        self.cell
            .track(
                "Failed to remove wish",
                self.api.delete(&format!("/wishes/{}", id)),
                |state, _| {
                    deactivate(&mut state.items, id);
                },
            )
            .await
    }

    pub fn reset(&self) {
        self.cell.reset();
    }

    async fn set_approved(&self, id: Uuid, is_approved: bool) -> ApiResult<Wish> {
        let patch = UpdateWish {
            is_approved: Some(is_approved),
            ..UpdateWish::default()
        };
        self.update(id, &patch).await
    }
}
