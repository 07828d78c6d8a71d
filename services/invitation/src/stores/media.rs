//! Gallery media store
//!
//! Order is an explicit integer per item. Reordering rewrites every order
//! value in one request; deletion removes the item outright.

use std::collections::HashSet;
use std::sync::Arc;

use common::models::{MediaItem, NewMediaItem, ReorderMedia, UpdateMediaItem};
use tracing::info;
use uuid::Uuid;

use super::{StoreCell, StoreState, remove, upsert};
use crate::api::{ApiClient, ApiResult};

pub struct MediaStore {
    api: Arc<ApiClient>,
    cell: StoreCell<MediaItem>,
}

impl MediaStore {
    pub fn new(api: Arc<ApiClient>) -> Self {
        Self {
            api,
            cell: StoreCell::new(),
        }
    }

    pub fn state(&self) -> StoreState<MediaItem> {
        self.cell.snapshot()
    }

    /// Items by ascending order value
    pub fn sorted(&self) -> Vec<MediaItem> {
        let mut items = self.cell.read(|state| state.items.clone());
        items.sort_by_key(|item| item.order);
        items
    }

    pub async fn fetch(&self, wedding_id: Uuid) -> ApiResult<Vec<MediaItem>> {
        info!("Fetching media for wedding: {}", wedding_id);
        self.cell
            .track(
                "Failed to load gallery",
                self.api
                    .get::<Vec<MediaItem>>(&format!("/weddings/{}/media", wedding_id)),
                |state, items| state.items = items.clone(),
            )
            .await
    }

    pub async fn create(&self, wedding_id: Uuid, payload: &NewMediaItem) -> ApiResult<MediaItem> {
        info!("Adding media to wedding: {}", wedding_id);
        self.cell
            .track(
                "Failed to upload media",
                self.api
                    .post::<_, MediaItem>(&format!("/weddings/{}/media", wedding_id), payload),
                |state, item| upsert(&mut state.items, item.clone()),
            )
            .await
    }

    pub async fn update(&self, id: Uuid, patch: &UpdateMediaItem) -> ApiResult<MediaItem> {
        info!("Updating media item: {}", id);
        self.cell
            .track(
                "Failed to update media",
                self.api.patch::<_, MediaItem>(&format!("/media/{}", id), patch),
                |state, item| upsert(&mut state.items, item.clone()),
            )
            .await
    }

    /// Hard delete: the item leaves the collection
    pub async fn remove(&self, id: Uuid) -> ApiResult<()> {
        info!("Deleting media item: {}", id);
        self.cell
            .track(
                "Failed to delete media",
                self.api.delete(&format!("/media/{}", id)),
                |state, _| {
                    remove(&mut state.items, id);
                },
            )
            .await
    }

    /// Rewrite order values so that `ids[i]` gets order `i`
    ///
    /// Ids not in the store are ignored; items missing from `ids` keep their
    /// relative order after the listed ones.
    pub async fn reorder(&self, wedding_id: Uuid, ids: &[Uuid]) -> ApiResult<Vec<MediaItem>> {
        let plan = self.cell.read(|state| order_plan(&state.items, ids));
        info!("Reordering {} media items for wedding: {}", plan.len(), wedding_id);

        let payload = ReorderMedia { ids: plan.clone() };
        self.cell
            .track(
                "Failed to reorder gallery",
                self.api.put::<_, Vec<MediaItem>>(
                    &format!("/weddings/{}/media/order", wedding_id),
                    &payload,
                ),
                |state, confirmed| {
                    for item in state.items.iter_mut() {
                        if let Some(server) = confirmed.iter().find(|c| c.id == item.id) {
                            item.order = server.order;
                        } else if let Some(position) = plan.iter().position(|id| *id == item.id) {
                            item.order = position as i32;
                        }
                    }
                    state.items.sort_by_key(|item| item.order);
                },
            )
            .await
    }

    pub fn reset(&self) {
        self.cell.reset();
    }
}

/// Full ordering of `items` with `requested` first
fn order_plan(items: &[MediaItem], requested: &[Uuid]) -> Vec<Uuid> {
    let known: HashSet<Uuid> = items.iter().map(|item| item.id).collect();
    let mut seen = HashSet::new();

    let mut plan: Vec<Uuid> = requested
        .iter()
        .copied()
        .filter(|id| known.contains(id) && seen.insert(*id))
        .collect();

    let mut rest: Vec<&MediaItem> = items.iter().filter(|item| !seen.contains(&item.id)).collect();
    rest.sort_by_key(|item| item.order);
    plan.extend(rest.into_iter().map(|item| item.id));

    plan
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use common::models::MediaKind;

    fn media(n: u128, order: i32) -> MediaItem {
        MediaItem {
            id: Uuid::from_u128(n),
            wedding_id: Uuid::nil(),
            kind: MediaKind::Image,
            url: format!("https://cdn.example/{}.jpg", n),
            caption: None,
            order,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_order_plan_puts_requested_first() {
        let items = vec![media(1, 0), media(2, 1), media(3, 2)];
        let ids = [Uuid::from_u128(3), Uuid::from_u128(1), Uuid::from_u128(2)];
        assert_eq!(order_plan(&items, &ids), ids.to_vec());
    }

    #[test]
    fn test_order_plan_handles_partial_and_unknown_ids() {
        let items = vec![media(1, 2), media(2, 0), media(3, 1)];
        let ids = [Uuid::from_u128(1), Uuid::from_u128(99), Uuid::from_u128(1)];
        assert_eq!(
            order_plan(&items, &ids),
            vec![Uuid::from_u128(1), Uuid::from_u128(2), Uuid::from_u128(3)]
        );
    }
}
