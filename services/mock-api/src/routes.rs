//! Development API routes

use axum::{
    Extension, Json, Router,
    extract::{Path, State},
    http::StatusCode,
    middleware,
    response::IntoResponse,
    routing::{get, patch, post, put},
};
use chrono::Utc;
use common::models::{
    AttendanceStatus, Guest, LoginCredentials, LoginResponse, MediaItem, NewMediaItem,
    NewWedding, NewWish, RefreshRequest, ReorderMedia, RsvpResponse, UpdateGuest,
    UpdateMediaItem, UpdateWedding, UpdateWish, User, Wedding, Wish,
};
use common::validation::{
    MAX_WISH_LENGTH, validate_party_size, validate_required, validate_slug,
};
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::info;
use uuid::Uuid;

use crate::{
    error::{MockApiError, MockResult},
    middleware::{AuthUser, observe, require_user},
    state::{Db, MockState},
};

/// Create the router for the development API
pub fn create_router(state: MockState) -> Router {
    let protected_routes = Router::new()
        .route("/auth/me", get(me))
        .route("/weddings", get(list_weddings).post(create_wedding))
        .route(
            "/weddings/:id",
            get(get_wedding).patch(update_wedding).delete(delete_wedding),
        )
        .route("/weddings/:id/guests", get(list_guests).post(create_guest))
        .route("/guests/:id", patch(update_guest).delete(delete_guest))
        .route("/weddings/:id/wishes", get(list_wishes))
        .route("/wishes/:id", patch(update_wish).delete(delete_wish))
        .route("/weddings/:id/media", get(list_media).post(create_media))
        .route("/weddings/:id/media/order", put(reorder_media))
        .route("/media/:id", patch(update_media).delete(delete_media))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_user));

    Router::new()
        .route("/health", get(health_check))
        .route("/auth/login", post(login))
        .route("/auth/refresh", post(refresh))
        .route("/auth/logout", post(logout))
        .route("/graphql", post(graphql))
        .route("/public/guests/:id/rsvp", post(rsvp))
        .route("/public/weddings/:id/wishes", post(submit_wish))
        .merge(protected_routes)
        .layer(middleware::from_fn_with_state(state.clone(), observe))
        .with_state(state)
}

/// Health check endpoint
pub async fn health_check() -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "service": "mock-api"
    }))
}

async fn login(
    State(state): State<MockState>,
    Json(payload): Json<LoginCredentials>,
) -> MockResult<Json<LoginResponse>> {
    info!("Login attempt for user: {}", payload.email);
    let mut db = state.write().await;

    let user = db
        .accounts
        .iter()
        .find(|a| a.user.email.eq_ignore_ascii_case(&payload.email) && a.password == payload.password)
        .map(|a| a.user.clone())
        .ok_or_else(|| MockApiError::Unauthorized("Invalid email or password".to_string()))?;

    let tokens = db.issue_tokens(user.id);
    Ok(Json(LoginResponse {
        access_token: tokens.access_token,
        refresh_token: tokens.refresh_token,
        user,
    }))
}

async fn refresh(
    State(state): State<MockState>,
    Json(payload): Json<RefreshRequest>,
) -> MockResult<impl IntoResponse> {
    let mut db = state.write().await;
    let user_id = db
        .refresh_tokens
        .remove(&payload.refresh_token)
        .ok_or_else(|| MockApiError::Unauthorized("Invalid refresh token".to_string()))?;

    Ok(Json(db.issue_tokens(user_id)))
}

async fn logout(
    State(state): State<MockState>,
    Json(payload): Json<RefreshRequest>,
) -> MockResult<impl IntoResponse> {
    let mut db = state.write().await;
    let user_id = db
        .refresh_tokens
        .get(&payload.refresh_token)
        .copied()
        .ok_or_else(|| MockApiError::Unauthorized("Invalid refresh token".to_string()))?;

    db.revoke_user(user_id);
    Ok(Json(json!({"message": "Logged out successfully"})))
}

async fn me(Extension(AuthUser(user)): Extension<AuthUser>) -> impl IntoResponse {
    Json(user)
}

#[derive(Deserialize)]
struct GraphQlRequest {
    #[serde(default)]
    operation_name: Option<String>,
    #[serde(default)]
    variables: Value,
}

/// Minimal GraphQL endpoint; dispatches on the operation name only
async fn graphql(State(state): State<MockState>, Json(request): Json<GraphQlRequest>) -> Json<Value> {
    match request.operation_name.as_deref() {
        Some("WeddingBySlug") => {
            let Some(slug) = request.variables.get("slug").and_then(Value::as_str) else {
                return Json(json!({
                    "data": null,
                    "errors": [{"message": "Variable $slug is required"}]
                }));
            };

            let db = state.read().await;
            let wedding = db.weddings.values().find(|w| w.slug == slug).cloned();
            Json(json!({ "data": { "wedding": wedding } }))
        }
        other => Json(json!({
            "data": null,
            "errors": [{"message": format!("Unknown operation: {}", other.unwrap_or("<anonymous>"))}]
        })),
    }
}

async fn list_weddings(
    State(state): State<MockState>,
    Extension(AuthUser(user)): Extension<AuthUser>,
) -> Json<Vec<Wedding>> {
    let db = state.read().await;
    let mut weddings: Vec<Wedding> = db
        .weddings
        .values()
        .filter(|w| user.is_admin() || w.user_id == user.id)
        .cloned()
        .collect();
    weddings.sort_by_key(|w| w.created_at);
    Json(weddings)
}

async fn create_wedding(
    State(state): State<MockState>,
    Extension(AuthUser(user)): Extension<AuthUser>,
    Json(payload): Json<NewWedding>,
) -> MockResult<impl IntoResponse> {
    validate_required("Title", &payload.title, 120).map_err(MockApiError::BadRequest)?;
    validate_slug(&payload.slug).map_err(MockApiError::BadRequest)?;

    let mut db = state.write().await;
    if db.slug_taken(&payload.slug, None) {
        return Err(MockApiError::Conflict("Slug already taken".to_string()));
    }

    let now = Utc::now();
    let wedding = Wedding {
        id: Uuid::new_v4(),
        user_id: user.id,
        title: payload.title,
        slug: payload.slug,
        date: payload.date,
        status: Default::default(),
        bride: Default::default(),
        groom: Default::default(),
        events: Vec::new(),
        love_story: Vec::new(),
        bank_accounts: Vec::new(),
        theme: None,
        created_at: now,
        updated_at: now,
    };
    db.weddings.insert(wedding.id, wedding.clone());

    Ok((StatusCode::CREATED, Json(wedding)))
}

async fn get_wedding(
    State(state): State<MockState>,
    Extension(AuthUser(user)): Extension<AuthUser>,
    Path(id): Path<Uuid>,
) -> MockResult<Json<Wedding>> {
    let db = state.read().await;
    Ok(Json(db.wedding_for(&user, id)?.clone()))
}

async fn update_wedding(
    State(state): State<MockState>,
    Extension(AuthUser(user)): Extension<AuthUser>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateWedding>,
) -> MockResult<Json<Wedding>> {
    if let Some(slug) = &payload.slug {
        validate_slug(slug).map_err(MockApiError::BadRequest)?;
    }

    let mut db = state.write().await;
    if let Some(slug) = &payload.slug {
        if db.slug_taken(slug, Some(id)) {
            return Err(MockApiError::Conflict("Slug already taken".to_string()));
        }
    }

    let wedding = db.wedding_for_mut(&user, id)?;
    payload.apply_to(wedding);
    wedding.updated_at = Utc::now();
    Ok(Json(wedding.clone()))
}

async fn delete_wedding(
    State(state): State<MockState>,
    Extension(AuthUser(user)): Extension<AuthUser>,
    Path(id): Path<Uuid>,
) -> MockResult<StatusCode> {
    let mut db = state.write().await;
    db.wedding_for(&user, id)?;

    db.weddings.remove(&id);
    db.guests.retain(|_, g| g.wedding_id != id);
    db.wishes.retain(|_, w| w.wedding_id != id);
    db.media.retain(|_, m| m.wedding_id != id);
    Ok(StatusCode::NO_CONTENT)
}

async fn list_guests(
    State(state): State<MockState>,
    Extension(AuthUser(user)): Extension<AuthUser>,
    Path(id): Path<Uuid>,
) -> MockResult<Json<Vec<Guest>>> {
    let db = state.read().await;
    db.wedding_for(&user, id)?;

    let mut guests: Vec<Guest> = db
        .guests
        .values()
        .filter(|g| g.wedding_id == id)
        .cloned()
        .collect();
    guests.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
    Ok(Json(guests))
}

/// Creates an empty guest; details arrive through a follow-up PATCH
async fn create_guest(
    State(state): State<MockState>,
    Extension(AuthUser(user)): Extension<AuthUser>,
    Path(id): Path<Uuid>,
) -> MockResult<impl IntoResponse> {
    let mut db = state.write().await;
    db.wedding_for(&user, id)?;

    let now = Utc::now();
    let guest = Guest {
        id: Uuid::new_v4(),
        wedding_id: id,
        full_name: String::new(),
        email: None,
        phone: None,
        party_size: 1,
        status: AttendanceStatus::Pending,
        message: None,
        is_active: true,
        created_at: now,
        updated_at: now,
    };
    db.guests.insert(guest.id, guest.clone());

    Ok((StatusCode::CREATED, Json(guest)))
}

fn guest_for<'a>(db: &'a mut Db, user: &User, id: Uuid) -> MockResult<&'a mut Guest> {
    let wedding_id = db
        .guests
        .get(&id)
        .map(|g| g.wedding_id)
        .ok_or(MockApiError::NotFound("Guest"))?;
    db.wedding_for(user, wedding_id)
        .map_err(|_| MockApiError::NotFound("Guest"))?;
    db.guests.get_mut(&id).ok_or(MockApiError::NotFound("Guest"))
}

async fn update_guest(
    State(state): State<MockState>,
    Extension(AuthUser(user)): Extension<AuthUser>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateGuest>,
) -> MockResult<Json<Guest>> {
    if let Some(party_size) = payload.party_size {
        validate_party_size(party_size).map_err(MockApiError::BadRequest)?;
    }

    let mut db = state.write().await;
    let guest = guest_for(&mut db, &user, id)?;
    payload.apply_to(guest);
    guest.updated_at = Utc::now();
    Ok(Json(guest.clone()))
}

/// Soft delete
async fn delete_guest(
    State(state): State<MockState>,
    Extension(AuthUser(user)): Extension<AuthUser>,
    Path(id): Path<Uuid>,
) -> MockResult<StatusCode> {
    let mut db = state.write().await;
    let guest = guest_for(&mut db, &user, id)?;
    guest.is_active = false;
    guest.updated_at = Utc::now();
    Ok(StatusCode::NO_CONTENT)
}

async fn rsvp(
    State(state): State<MockState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<RsvpResponse>,
) -> MockResult<Json<Guest>> {
    validate_party_size(payload.party_size).map_err(MockApiError::BadRequest)?;

    let mut db = state.write().await;
    let guest = db
        .guests
        .get_mut(&id)
        .filter(|g| g.is_active)
        .ok_or(MockApiError::NotFound("Guest"))?;

    guest.status = payload.status;
    guest.party_size = payload.party_size;
    guest.message = payload.message;
    guest.updated_at = Utc::now();
    Ok(Json(guest.clone()))
}

async fn list_wishes(
    State(state): State<MockState>,
    Extension(AuthUser(user)): Extension<AuthUser>,
    Path(id): Path<Uuid>,
) -> MockResult<Json<Vec<Wish>>> {
    let db = state.read().await;
    db.wedding_for(&user, id)?;

    let mut wishes: Vec<Wish> = db
        .wishes
        .values()
        .filter(|w| w.wedding_id == id)
        .cloned()
        .collect();
    wishes.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
    Ok(Json(wishes))
}

async fn submit_wish(
    State(state): State<MockState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<NewWish>,
) -> MockResult<impl IntoResponse> {
    validate_required("Name", &payload.guest_name, 100).map_err(MockApiError::BadRequest)?;
    validate_required("Message", &payload.message, MAX_WISH_LENGTH)
        .map_err(MockApiError::BadRequest)?;

    let mut db = state.write().await;
    if !db.weddings.contains_key(&id) {
        return Err(MockApiError::NotFound("Wedding"));
    }

    let wish = Wish {
        id: Uuid::new_v4(),
        wedding_id: id,
        guest_name: payload.guest_name,
        message: payload.message,
        is_approved: false,
        is_active: true,
        created_at: Utc::now(),
    };
    db.wishes.insert(wish.id, wish.clone());

    Ok((StatusCode::CREATED, Json(wish)))
}

fn wish_for<'a>(db: &'a mut Db, user: &User, id: Uuid) -> MockResult<&'a mut Wish> {
    let wedding_id = db
        .wishes
        .get(&id)
        .map(|w| w.wedding_id)
        .ok_or(MockApiError::NotFound("Wish"))?;
    db.wedding_for(user, wedding_id)
        .map_err(|_| MockApiError::NotFound("Wish"))?;
    db.wishes.get_mut(&id).ok_or(MockApiError::NotFound("Wish"))
}

async fn update_wish(
    State(state): State<MockState>,
    Extension(AuthUser(user)): Extension<AuthUser>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateWish>,
) -> MockResult<Json<Wish>> {
    let mut db = state.write().await;
    let wish = wish_for(&mut db, &user, id)?;
    if let Some(is_approved) = payload.is_approved {
        wish.is_approved = is_approved;
    }
    if let Some(message) = payload.message {
        wish.message = message;
    }
    Ok(Json(wish.clone()))
}

/// Soft delete
async fn delete_wish(
    State(state): State<MockState>,
    Extension(AuthUser(user)): Extension<AuthUser>,
    Path(id): Path<Uuid>,
) -> MockResult<StatusCode> {
    let mut db = state.write().await;
    wish_for(&mut db, &user, id)?.is_active = false;
    Ok(StatusCode::NO_CONTENT)
}

fn sorted_media(db: &Db, wedding_id: Uuid) -> Vec<MediaItem> {
    let mut items: Vec<MediaItem> = db
        .media
        .values()
        .filter(|m| m.wedding_id == wedding_id)
        .cloned()
        .collect();
    items.sort_by_key(|m| m.order);
    items
}

async fn list_media(
    State(state): State<MockState>,
    Extension(AuthUser(user)): Extension<AuthUser>,
    Path(id): Path<Uuid>,
) -> MockResult<Json<Vec<MediaItem>>> {
    let db = state.read().await;
    db.wedding_for(&user, id)?;
    Ok(Json(sorted_media(&db, id)))
}

async fn create_media(
    State(state): State<MockState>,
    Extension(AuthUser(user)): Extension<AuthUser>,
    Path(id): Path<Uuid>,
    Json(payload): Json<NewMediaItem>,
) -> MockResult<impl IntoResponse> {
    validate_required("URL", &payload.url, 2048).map_err(MockApiError::BadRequest)?;

    let mut db = state.write().await;
    db.wedding_for(&user, id)?;

    let order = sorted_media(&db, id).last().map_or(0, |m| m.order + 1);
    let item = MediaItem {
        id: Uuid::new_v4(),
        wedding_id: id,
        kind: payload.kind,
        url: payload.url,
        caption: payload.caption,
        order,
        created_at: Utc::now(),
    };
    db.media.insert(item.id, item.clone());

    Ok((StatusCode::CREATED, Json(item)))
}

async fn reorder_media(
    State(state): State<MockState>,
    Extension(AuthUser(user)): Extension<AuthUser>,
    Path(id): Path<Uuid>,
    Json(payload): Json<ReorderMedia>,
) -> MockResult<Json<Vec<MediaItem>>> {
    let mut db = state.write().await;
    db.wedding_for(&user, id)?;

    for media_id in &payload.ids {
        if !db.media.get(media_id).is_some_and(|m| m.wedding_id == id) {
            return Err(MockApiError::BadRequest(format!(
                "Media item {} does not belong to this wedding",
                media_id
            )));
        }
    }

    for (order, media_id) in payload.ids.iter().enumerate() {
        if let Some(item) = db.media.get_mut(media_id) {
            item.order = order as i32;
        }
    }

    Ok(Json(sorted_media(&db, id)))
}

fn media_for<'a>(db: &'a mut Db, user: &User, id: Uuid) -> MockResult<&'a mut MediaItem> {
    let wedding_id = db
        .media
        .get(&id)
        .map(|m| m.wedding_id)
        .ok_or(MockApiError::NotFound("Media item"))?;
    db.wedding_for(user, wedding_id)
        .map_err(|_| MockApiError::NotFound("Media item"))?;
    db.media.get_mut(&id).ok_or(MockApiError::NotFound("Media item"))
}

async fn update_media(
    State(state): State<MockState>,
    Extension(AuthUser(user)): Extension<AuthUser>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateMediaItem>,
) -> MockResult<Json<MediaItem>> {
    let mut db = state.write().await;
    let item = media_for(&mut db, &user, id)?;
    if let Some(kind) = payload.kind {
        item.kind = kind;
    }
    if let Some(caption) = payload.caption {
        item.caption = Some(caption);
    }
    Ok(Json(item.clone()))
}

/// Hard delete
async fn delete_media(
    State(state): State<MockState>,
    Extension(AuthUser(user)): Extension<AuthUser>,
    Path(id): Path<Uuid>,
) -> MockResult<StatusCode> {
    let mut db = state.write().await;
    media_for(&mut db, &user, id)?;
    db.media.remove(&id);
    Ok(StatusCode::NO_CONTENT)
}
