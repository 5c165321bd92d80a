use axum::{
	extract::{Path, Query, State},
	Json,
};
use chrono::Utc;
use serde::Deserialize;
use tracing::warn;
use uuid::Uuid;

use tomo_core::{
	datastore::connect,
	domain::{Event, EventData},
	ops::{events, search},
};

use crate::{error::ApiError, routes::auth::AdminSession, AppState};

#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
	year: Option<i32>,
	month: Option<u32>,
	q: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CreateEvent {
	#[serde(flatten)]
	data: EventData,
	#[serde(default)]
	image_urls: Vec<String>,
	/// Idempotency key; retries of the same submission reuse it.
	op_id: Option<Uuid>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateEvent {
	#[serde(flatten)]
	data: EventData,
	#[serde(default)]
	added_image_urls: Vec<String>,
	#[serde(default)]
	removed_image_urls: Vec<String>,
}

/// Every list read reclassifies overdue events first, so a stale `upcoming`
/// status is corrected by the next visit. A reclassification failure is
/// logged and the (possibly stale) list served anyway.
pub async fn list(
	State(state): State<AppState>,
	Query(query): Query<ListQuery>,
) -> Result<Json<Vec<Event>>, ApiError> {
	let store = connect(&state.config);
	if let Err(err) = events::reclassify(&store, Utc::now()).await {
		warn!(%err, "event reclassification failed, serving the list as stored");
	}

	let mut events = match (query.year, query.month) {
		(Some(year), Some(month)) => events::list_by_month(&store, year, month).await?,
		(None, None) => events::list(&store).await?,
		_ => {
			return Err(ApiError::BadRequest(
				"year and month must be given together".to_string(),
			))
		}
	};
	if let Some(q) = query.q.as_deref() {
		events = search::filter_events(events, q);
	}
	Ok(Json(events))
}

pub async fn detail(
	State(state): State<AppState>,
	Path(id): Path<Uuid>,
) -> Result<Json<Event>, ApiError> {
	let store = connect(&state.config);
	Ok(Json(events::get(&store, id).await?))
}

pub async fn create(
	_session: AdminSession,
	State(state): State<AppState>,
	Json(payload): Json<CreateEvent>,
) -> Result<Json<Event>, ApiError> {
	let store = connect(&state.config);
	let op_id = payload.op_id.unwrap_or_else(Uuid::new_v4);
	let event =
		events::create_with_images(&store, payload.data, &payload.image_urls, op_id).await?;
	Ok(Json(event))
}

pub async fn update(
	_session: AdminSession,
	State(state): State<AppState>,
	Path(id): Path<Uuid>,
	Json(payload): Json<UpdateEvent>,
) -> Result<Json<Event>, ApiError> {
	let store = connect(&state.config);
	let event = events::update(
		&store,
		id,
		payload.data,
		&payload.added_image_urls,
		&payload.removed_image_urls,
	)
	.await?;
	Ok(Json(event))
}

pub async fn remove(
	_session: AdminSession,
	State(state): State<AppState>,
	Path(id): Path<Uuid>,
) -> Result<Json<Event>, ApiError> {
	let store = connect(&state.config);
	Ok(Json(events::delete(&store, id).await?))
}
