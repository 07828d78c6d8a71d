//! Client-side entity stores
//!
//! Each store owns exactly one collection plus `is_loading`/`error` flags and
//! is mutated only through its action methods. The remote API is the source
//! of truth: fetches replace the collection, mutations patch in the
//! server-confirmed record. Stores never coordinate with each other.

pub mod guest;
pub mod media;
pub mod session;
pub mod ui;
pub mod wedding;
pub mod wish;

use std::future::Future;
use std::sync::{Mutex, MutexGuard, PoisonError};

use common::models::{Identified, SoftDelete};
use tracing::warn;
use uuid::Uuid;

use crate::api::ApiResult;

pub use guest::{GuestCreateError, GuestStats, GuestStore};
pub use media::MediaStore;
pub use session::{AuthState, SessionError, SessionStore};
pub use ui::{Toast, ToastKind, UiState, UiStore};
pub use wedding::WeddingStore;
pub use wish::WishStore;

/// Read state exposed by every entity store
#[derive(Debug, Clone, PartialEq)]
pub struct StoreState<T> {
    pub items: Vec<T>,
    pub is_loading: bool,
    pub error: Option<String>,
}

impl<T> Default for StoreState<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            is_loading: false,
            error: None,
        }
    }
}

impl<T: Identified> StoreState<T> {
    pub fn find(&self, id: Uuid) -> Option<&T> {
        self.items.iter().find(|item| item.id() == id)
    }
}

/// Runs the wrapped closure on drop unless disarmed
///
/// Keeps `is_loading` from sticking when an in-flight action is dropped.
pub(crate) struct SettleOnDrop<F: FnOnce()> {
    settle: Option<F>,
}

impl<F: FnOnce()> SettleOnDrop<F> {
    pub(crate) fn new(settle: F) -> Self {
        Self {
            settle: Some(settle),
        }
    }

    pub(crate) fn disarm(mut self) {
        self.settle = None;
    }
}

impl<F: FnOnce()> Drop for SettleOnDrop<F> {
    fn drop(&mut self) {
        if let Some(settle) = self.settle.take() {
            settle();
        }
    }
}

pub(crate) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Interior-mutable holder for one store's state
pub(crate) struct StoreCell<T> {
    state: Mutex<StoreState<T>>,
}

impl<T> StoreCell<T> {
    pub(crate) fn new() -> Self {
        Self {
            state: Mutex::new(StoreState::default()),
        }
    }

    pub(crate) fn update<R>(&self, f: impl FnOnce(&mut StoreState<T>) -> R) -> R {
        f(&mut lock(&self.state))
    }

    pub(crate) fn read<R>(&self, f: impl FnOnce(&StoreState<T>) -> R) -> R {
        f(&lock(&self.state))
    }

    pub(crate) fn reset(&self) {
        *lock(&self.state) = StoreState::default();
    }

    /// Wrap one network call with the loading/error bookkeeping
    ///
    /// `is_loading` is true while `request` is pending and false once it
    /// settles or is dropped. On success `apply` runs under the same lock that
    /// clears the flag; on failure `error` receives a user-facing message and
    /// the original error is returned to the caller.
    pub(crate) async fn track<R, Fut, F>(&self, failure: &str, request: Fut, apply: F) -> ApiResult<R>
    where
        Fut: Future<Output = ApiResult<R>>,
        F: FnOnce(&mut StoreState<T>, &R),
    {
        self.update(|state| {
            state.is_loading = true;
            state.error = None;
        });
        let guard = SettleOnDrop::new(|| self.update(|state| state.is_loading = false));

        let result = request.await;
        guard.disarm();

        match result {
            Ok(value) => {
                self.update(|state| {
                    apply(state, &value);
                    state.is_loading = false;
                });
                Ok(value)
            }
            Err(e) => {
                warn!("{}: {}", failure, e);
                self.update(|state| {
                    state.is_loading = false;
                    state.error = Some(e.user_message(failure));
                });
                Err(e)
            }
        }
    }
}

impl<T: Clone> StoreCell<T> {
    pub(crate) fn snapshot(&self) -> StoreState<T> {
        lock(&self.state).clone()
    }
}

/// Replace the item with the same id in place, or append it
pub(crate) fn upsert<T: Identified>(items: &mut Vec<T>, item: T) {
    match items.iter_mut().find(|existing| existing.id() == item.id()) {
        Some(existing) => *existing = item,
        None => items.push(item),
    }
}

/// Drop the item with `id`; returns whether one was present
pub(crate) fn remove<T: Identified>(items: &mut Vec<T>, id: Uuid) -> bool {
    let before = items.len();
    items.retain(|item| item.id() != id);
    items.len() != before
}

/// Mark the item with `id` inactive; returns whether one was present
pub(crate) fn deactivate<T: Identified + SoftDelete>(items: &mut [T], id: Uuid) -> bool {
    match items.iter_mut().find(|item| item.id() == id) {
        Some(item) => {
            item.deactivate();
            true
        }
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::ApiError;

    #[derive(Debug, Clone, PartialEq)]
    struct Item {
        id: Uuid,
        label: &'static str,
        active: bool,
    }

    impl Identified for Item {
        fn id(&self) -> Uuid {
            self.id
        }
    }

    impl SoftDelete for Item {
        fn is_active(&self) -> bool {
            self.active
        }

        fn deactivate(&mut self) {
            self.active = false;
        }
    }

    fn item(n: u128, label: &'static str) -> Item {
        Item {
            id: Uuid::from_u128(n),
            label,
            active: true,
        }
    }

    #[test]
    fn test_upsert_replaces_in_place() {
        let mut items = vec![item(1, "a"), item(2, "b"), item(3, "c")];
        upsert(&mut items, item(2, "B"));
        upsert(&mut items, item(4, "d"));

        let labels: Vec<_> = items.iter().map(|i| i.label).collect();
        assert_eq!(labels, vec!["a", "B", "c", "d"]);
    }

    #[test]
    fn test_remove_and_deactivate() {
        let mut items = vec![item(1, "a"), item(2, "b")];
        assert!(deactivate(&mut items, Uuid::from_u128(2)));
        assert_eq!(items.len(), 2);
        assert!(!items[1].active);

        assert!(remove(&mut items, Uuid::from_u128(1)));
        assert!(!remove(&mut items, Uuid::from_u128(1)));
        assert_eq!(items.len(), 1);
    }

    #[tokio::test]
    async fn test_track_success_applies_and_settles() {
        let cell: StoreCell<Item> = StoreCell::new();
        let created = cell
            .track(
                "Failed to create item",
                async { Ok(item(7, "x")) },
                |state, value| upsert(&mut state.items, value.clone()),
            )
            .await
            .expect("track should succeed");

        let state = cell.snapshot();
        assert_eq!(created.id, Uuid::from_u128(7));
        assert_eq!(state.items.len(), 1);
        assert!(!state.is_loading);
        assert!(state.error.is_none());
    }

    #[tokio::test]
    async fn test_track_failure_sets_error_and_rethrows() {
        let cell: StoreCell<Item> = StoreCell::new();
        cell.update(|state| state.items.push(item(1, "a")));

        let result: ApiResult<Item> = cell
            .track(
                "Failed to load items",
                async {
                    Err(ApiError::Status {
                        status: 503,
                        message: None,
                    })
                },
                |state, value: &Item| upsert(&mut state.items, value.clone()),
            )
            .await;

        assert!(matches!(result, Err(ApiError::Status { status: 503, .. })));
        let state = cell.snapshot();
        assert!(!state.is_loading);
        assert_eq!(state.error.as_deref(), Some("Failed to load items"));
        assert_eq!(state.items, vec![item(1, "a")]);
    }

    #[tokio::test]
    async fn test_dropped_action_does_not_stay_loading() {
        let cell: StoreCell<Item> = StoreCell::new();
        {
            let pending = cell.track(
                "Failed to load items",
                std::future::pending::<ApiResult<Item>>(),
                |_, _| {},
            );
            let _ = tokio::time::timeout(std::time::Duration::from_millis(10), pending).await;
        }
        assert!(!cell.snapshot().is_loading);
    }
}
