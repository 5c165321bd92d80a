use axum::{
	extract::{Path, Query, State},
	Json,
};
use serde::Deserialize;
use uuid::Uuid;

use tomo_core::{
	catalog::{CatalogBook, CatalogClient},
	datastore::connect,
	domain::{Book, BookData},
	ops::{books, search},
};

use crate::{error::ApiError, routes::auth::AdminSession, AppState};

#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
	/// Admin-wide search: title, author, ISBN, price or owner name.
	q: Option<String>,
	/// Public filters, matched against title and price only.
	title: Option<String>,
	price: Option<String>,
}

pub async fn list(
	State(state): State<AppState>,
	Query(query): Query<ListQuery>,
) -> Result<Json<Vec<Book>>, ApiError> {
	let store = connect(&state.config);
	let mut books = books::list(&store).await?;
	if let Some(q) = query.q.as_deref() {
		books = search::filter_books(books, q);
	}
	for public in [query.title.as_deref(), query.price.as_deref()].into_iter().flatten() {
		books = search::filter_books_public(books, public);
	}
	Ok(Json(books))
}

pub async fn detail(
	State(state): State<AppState>,
	Path(id): Path<Uuid>,
) -> Result<Json<Book>, ApiError> {
	let store = connect(&state.config);
	Ok(Json(books::get(&store, id).await?))
}

#[derive(Debug, Deserialize)]
pub struct IsbnQuery {
	isbn: String,
}

/// Prefill for the admin book form from the external catalog.
pub async fn catalog_lookup(
	_session: AdminSession,
	State(state): State<AppState>,
	Query(query): Query<IsbnQuery>,
) -> Result<Json<CatalogBook>, ApiError> {
	let client = CatalogClient::new(&state.config);
	Ok(Json(client.lookup_isbn(&query.isbn).await?))
}

pub async fn create(
	_session: AdminSession,
	State(state): State<AppState>,
	Json(data): Json<BookData>,
) -> Result<Json<Book>, ApiError> {
	let store = connect(&state.config);
	Ok(Json(books::create(&store, data).await?))
}

pub async fn update(
	_session: AdminSession,
	State(state): State<AppState>,
	Path(id): Path<Uuid>,
	Json(data): Json<BookData>,
) -> Result<Json<Book>, ApiError> {
	let store = connect(&state.config);
	Ok(Json(books::update(&store, id, data).await?))
}

pub async fn remove(
	_session: AdminSession,
	State(state): State<AppState>,
	Path(id): Path<Uuid>,
) -> Result<Json<Book>, ApiError> {
	let store = connect(&state.config);
	Ok(Json(books::delete(&store, id).await?))
}
