mod support;

use axum::http::{Method, StatusCode};
use common::models::{
    AttendanceStatus, MediaKind, NewMediaItem, NewWedding, NewWish, RsvpResponse, UpdateGuest,
    WeddingStatus,
};
use invitation::stores::GuestCreateError;
use mock_api::state::{
    SEED_GUEST_IDS, SEED_MEDIA_IDS, SEED_WEDDING_ID, SEED_WEDDING_SLUG, SEED_WISH_IDS,
};
use support::Harness;

#[tokio::test]
async fn test_fetch_replaces_collection() {
    let harness = Harness::start().await;
    let ctx = harness.signed_in().await;

    let weddings = ctx.weddings.fetch_all().await.unwrap();
    assert_eq!(weddings.len(), 1);

    let state = ctx.weddings.state();
    assert_eq!(state.items, weddings);
    assert!(!state.is_loading);
    assert_eq!(state.error, None);
}

#[tokio::test]
async fn test_failed_fetch_keeps_items_and_sets_error() {
    let harness = Harness::start().await;
    let ctx = harness.signed_in().await;
    ctx.guests.fetch(SEED_WEDDING_ID).await.unwrap();

    let path = format!("/weddings/{}/guests", SEED_WEDDING_ID);
    harness
        .server
        .fail_next(Method::GET, path, StatusCode::INTERNAL_SERVER_ERROR);

    let err = ctx.guests.fetch(SEED_WEDDING_ID).await.unwrap_err();
    assert_eq!(err.status(), Some(StatusCode::INTERNAL_SERVER_ERROR.as_u16()));

    let state = ctx.guests.state();
    assert!(!state.is_loading);
    assert!(state.error.is_some());
    assert_eq!(state.items.len(), 2);

    // The next successful action clears the error
    ctx.guests.fetch(SEED_WEDDING_ID).await.unwrap();
    assert_eq!(ctx.guests.state().error, None);
}

#[tokio::test]
async fn test_create_adds_each_id_once() {
    let harness = Harness::start().await;
    let ctx = harness.signed_in().await;
    ctx.weddings.fetch_all().await.unwrap();

    let created = ctx
        .weddings
        .create(&NewWedding {
            title: "Second Wedding".to_string(),
            slug: "second-wedding".to_string(),
            date: None,
        })
        .await
        .unwrap();

    let state = ctx.weddings.state();
    assert_eq!(state.items.len(), 2);
    assert_eq!(state.items.iter().filter(|w| w.id == created.id).count(), 1);

    let updated = ctx
        .weddings
        .set_status(created.id, WeddingStatus::Published)
        .await
        .unwrap();
    assert_eq!(updated.status, WeddingStatus::Published);
    let state = ctx.weddings.state();
    assert_eq!(state.items.len(), 2);
    assert_eq!(
        state.find(created.id).map(|w| w.status),
        Some(WeddingStatus::Published)
    );
}

#[tokio::test]
async fn test_wedding_delete_is_hard() {
    let harness = Harness::start().await;
    let ctx = harness.signed_in().await;
    ctx.weddings.fetch_one(SEED_WEDDING_ID).await.unwrap();
    assert!(ctx.weddings.current().is_some());

    ctx.weddings.delete(SEED_WEDDING_ID).await.unwrap();

    assert!(ctx.weddings.state().items.is_empty());
    assert_eq!(ctx.weddings.current(), None);
}

#[tokio::test]
async fn test_fetch_by_slug() {
    let harness = Harness::start().await;
    let ctx = harness.context();

    let wedding = ctx.weddings.fetch_by_slug(SEED_WEDDING_SLUG).await.unwrap();
    assert_eq!(wedding.map(|w| w.id), Some(SEED_WEDDING_ID));
    assert_eq!(ctx.weddings.current().map(|w| w.id), Some(SEED_WEDDING_ID));

    let missing = ctx.weddings.fetch_by_slug("no-such-couple").await.unwrap();
    assert_eq!(missing, None);
    assert_eq!(ctx.weddings.current(), None);
    assert_eq!(ctx.weddings.state().error, None);
}

#[tokio::test]
async fn test_guest_delete_is_soft() {
    let harness = Harness::start().await;
    let ctx = harness.signed_in().await;
    ctx.guests.fetch(SEED_WEDDING_ID).await.unwrap();

    ctx.guests.remove(SEED_GUEST_IDS[1]).await.unwrap();

    let state = ctx.guests.state();
    assert_eq!(state.items.len(), 2);
    assert_eq!(state.find(SEED_GUEST_IDS[1]).map(|g| g.is_active), Some(false));
    assert_eq!(ctx.guests.active().len(), 1);

    let stats = ctx.guests.stats();
    assert_eq!(stats.total, 1);
    assert_eq!(stats.confirmed, 1);
    assert_eq!(stats.attending_headcount, 2);
}

#[tokio::test]
async fn test_two_phase_guest_create() {
    let harness = Harness::start().await;
    let ctx = harness.signed_in().await;
    ctx.guests.fetch(SEED_WEDDING_ID).await.unwrap();

    let details = UpdateGuest {
        full_name: Some("Sari".to_string()),
        party_size: Some(3),
        ..UpdateGuest::default()
    };
    let guest = ctx.guests.create(SEED_WEDDING_ID, &details).await.unwrap();
    assert_eq!(guest.full_name, "Sari");
    assert_eq!(guest.party_size, 3);

    let state = ctx.guests.state();
    assert_eq!(state.items.len(), 3);
    assert_eq!(state.items.iter().filter(|g| g.id == guest.id).count(), 1);
}

#[tokio::test]
async fn test_guest_create_populate_failure_keeps_reserved_record() {
    let harness = Harness::start().await;
    let ctx = harness.signed_in().await;
    ctx.guests.fetch(SEED_WEDDING_ID).await.unwrap();

    // Rejected by validation on the server
    let details = UpdateGuest {
        full_name: Some("Crowd".to_string()),
        party_size: Some(500),
        ..UpdateGuest::default()
    };
    let err = ctx
        .guests
        .create(SEED_WEDDING_ID, &details)
        .await
        .unwrap_err();

    let guest_id = match &err {
        GuestCreateError::Populate { guest_id, .. } => *guest_id,
        other => panic!("expected populate failure, got {:?}", other),
    };

    let state = ctx.guests.state();
    assert!(!state.is_loading);
    assert!(state.error.is_some());
    let reserved = state.find(guest_id).unwrap();
    assert_eq!(reserved.full_name, "");

    // Completing the record afterwards fills in the same guest
    let fixed = UpdateGuest {
        party_size: Some(4),
        ..details
    };
    ctx.guests.update(guest_id, &fixed).await.unwrap();
    let state = ctx.guests.state();
    assert_eq!(state.items.len(), 3);
    assert_eq!(state.find(guest_id).map(|g| g.full_name.as_str()), Some("Crowd"));
}

#[tokio::test]
async fn test_guest_reserve_failure_creates_nothing() {
    let harness = Harness::start().await;
    let ctx = harness.signed_in().await;
    ctx.guests.fetch(SEED_WEDDING_ID).await.unwrap();

    let path = format!("/weddings/{}/guests", SEED_WEDDING_ID);
    harness
        .server
        .fail_next(Method::POST, path, StatusCode::SERVICE_UNAVAILABLE);

    let err = ctx
        .guests
        .create(SEED_WEDDING_ID, &UpdateGuest::default())
        .await
        .unwrap_err();
    assert!(matches!(err, GuestCreateError::Reserve(_)));
    assert_eq!(ctx.guests.state().items.len(), 2);
}

#[tokio::test]
async fn test_rsvp_from_public_page() {
    let harness = Harness::start().await;
    let ctx = harness.context();

    let guest = ctx
        .guests
        .respond(
            SEED_GUEST_IDS[1],
            &RsvpResponse {
                status: AttendanceStatus::Confirmed,
                party_size: 2,
                message: Some("See you there".to_string()),
            },
        )
        .await
        .unwrap();

    assert_eq!(guest.status, AttendanceStatus::Confirmed);
    assert_eq!(ctx.guests.by_status(AttendanceStatus::Confirmed).len(), 1);
}

#[tokio::test]
async fn test_wish_moderation() {
    let harness = Harness::start().await;
    let ctx = harness.signed_in().await;
    ctx.wishes.fetch(SEED_WEDDING_ID).await.unwrap();
    assert_eq!(ctx.wishes.visible().len(), 1);
    assert_eq!(ctx.wishes.pending_approval().len(), 1);

    ctx.wishes.approve(SEED_WISH_IDS[1]).await.unwrap();
    assert_eq!(ctx.wishes.visible().len(), 2);
    assert!(ctx.wishes.pending_approval().is_empty());

    ctx.wishes.remove(SEED_WISH_IDS[0]).await.unwrap();
    let state = ctx.wishes.state();
    assert_eq!(state.items.len(), 2);
    assert_eq!(state.find(SEED_WISH_IDS[0]).map(|w| w.is_active), Some(false));
    assert_eq!(ctx.wishes.visible().len(), 1);
}

#[tokio::test]
async fn test_public_wish_awaits_approval() {
    let harness = Harness::start().await;
    let ctx = harness.context();

    let wish = ctx
        .wishes
        .submit(
            SEED_WEDDING_ID,
            &NewWish {
                guest_name: "Tante Lia".to_string(),
                message: "Selamat!".to_string(),
            },
        )
        .await
        .unwrap();

    assert!(!wish.is_approved);
    assert!(ctx.wishes.visible().is_empty());
    assert_eq!(ctx.wishes.pending_approval().len(), 1);
}

#[tokio::test]
async fn test_media_reorder() {
    let harness = Harness::start().await;
    let ctx = harness.signed_in().await;
    ctx.media.fetch(SEED_WEDDING_ID).await.unwrap();
    let [a, b, c] = SEED_MEDIA_IDS;

    ctx.media.reorder(SEED_WEDDING_ID, &[c, a, b]).await.unwrap();

    let state = ctx.media.state();
    let order_of = |id| state.find(id).map(|m| m.order);
    assert_eq!(order_of(a), Some(1));
    assert_eq!(order_of(b), Some(2));
    assert_eq!(order_of(c), Some(0));

    let sorted: Vec<_> = ctx.media.sorted().into_iter().map(|m| m.id).collect();
    assert_eq!(sorted, vec![c, a, b]);

    // Server agrees after a refetch
    ctx.media.fetch(SEED_WEDDING_ID).await.unwrap();
    let sorted: Vec<_> = ctx.media.sorted().into_iter().map(|m| m.id).collect();
    assert_eq!(sorted, vec![c, a, b]);
}

#[tokio::test]
async fn test_media_delete_is_hard() {
    let harness = Harness::start().await;
    let ctx = harness.signed_in().await;
    ctx.media.fetch(SEED_WEDDING_ID).await.unwrap();

    let added = ctx
        .media
        .create(
            SEED_WEDDING_ID,
            &NewMediaItem {
                kind: MediaKind::Video,
                url: "https://cdn.wedding.test/teaser.mp4".to_string(),
                caption: None,
            },
        )
        .await
        .unwrap();
    assert_eq!(added.order, 3);
    assert_eq!(ctx.media.state().items.len(), 4);

    ctx.media.remove(added.id).await.unwrap();
    let state = ctx.media.state();
    assert_eq!(state.items.len(), 3);
    assert!(state.find(added.id).is_none());
}

#[tokio::test]
async fn test_reset_clears_every_store() {
    let harness = Harness::start().await;
    let ctx = harness.signed_in().await;
    ctx.weddings.fetch_all().await.unwrap();
    ctx.media.fetch(SEED_WEDDING_ID).await.unwrap();
    ctx.ui.success("Saved");
    let wedding = ctx.weddings.fetch_one(SEED_WEDDING_ID).await.unwrap();
    ctx.resolve_theme(wedding.theme.as_ref());

    ctx.reset();

    assert!(!ctx.session.is_authenticated());
    assert!(ctx.weddings.state().items.is_empty());
    assert_eq!(ctx.weddings.current(), None);
    assert!(ctx.media.state().items.is_empty());
    assert!(ctx.ui.state().toasts.is_empty());
    assert_eq!(ctx.theme_generation(), 0);
}
