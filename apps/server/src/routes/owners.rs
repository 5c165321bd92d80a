use axum::{
	extract::{Path, Query, State},
	Json,
};
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use tomo_core::{
	datastore::connect,
	domain::{Book, Owner, OwnerData},
	ops::{books, owners, search},
};

use crate::{error::ApiError, routes::auth::AdminSession, AppState};

#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
	q: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct OwnerPayload {
	#[serde(flatten)]
	data: OwnerData,
	#[serde(default)]
	hobbies: Vec<String>,
	/// Idempotency key; retries of the same submission reuse it.
	op_id: Option<Uuid>,
}

pub async fn list(
	State(state): State<AppState>,
	Query(query): Query<ListQuery>,
) -> Result<Json<Vec<Owner>>, ApiError> {
	let store = connect(&state.config);
	let owners = owners::list(&store).await?;
	Ok(Json(search::filter_owners(
		owners,
		query.q.as_deref().unwrap_or(""),
	)))
}

/// Owner profile page: the hydrated owner plus their books, fetched
/// concurrently.
pub async fn detail(
	State(state): State<AppState>,
	Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, ApiError> {
	let store = connect(&state.config);
	let (owner, books) = tokio::join!(owners::get(&store, id), books::list_by_owner(&store, id));

	Ok(Json(json!({ "owner": owner?, "books": books? })))
}

pub async fn books_of(
	State(state): State<AppState>,
	Path(id): Path<Uuid>,
) -> Result<Json<Vec<Book>>, ApiError> {
	let store = connect(&state.config);
	Ok(Json(books::list_by_owner(&store, id).await?))
}

pub async fn create(
	_session: AdminSession,
	State(state): State<AppState>,
	Json(payload): Json<OwnerPayload>,
) -> Result<Json<Owner>, ApiError> {
	let store = connect(&state.config);
	let op_id = payload.op_id.unwrap_or_else(Uuid::new_v4);
	let owner =
		owners::create_with_hobbies(&store, payload.data, &payload.hobbies, op_id).await?;
	Ok(Json(owner))
}

pub async fn update(
	_session: AdminSession,
	State(state): State<AppState>,
	Path(id): Path<Uuid>,
	Json(payload): Json<OwnerPayload>,
) -> Result<Json<Owner>, ApiError> {
	let store = connect(&state.config);
	let owner = owners::update(&store, id, payload.data, &payload.hobbies).await?;
	Ok(Json(owner))
}

pub async fn remove(
	_session: AdminSession,
	State(state): State<AppState>,
	Path(id): Path<Uuid>,
) -> Result<Json<Owner>, ApiError> {
	let store = connect(&state.config);
	Ok(Json(owners::delete(&store, id).await?))
}
