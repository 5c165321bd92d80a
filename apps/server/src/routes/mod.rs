use axum::{
	extract::DefaultBodyLimit,
	routing::{get, post},
	Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::AppState;

pub mod auth;
pub mod books;
pub mod events;
pub mod owners;
pub mod upload;

/// Multipart bodies may carry a thumbnail plus a full gallery batch; cap the
/// request itself well above the per-field limits checked in the handler.
const UPLOAD_BODY_LIMIT: usize = 32 * 1024 * 1024;

pub fn router(state: AppState) -> Router {
	Router::new()
		.route("/health", get(|| async { "OK" }))
		.route("/api/auth/login", post(auth::login))
		.route("/api/owners", get(owners::list).post(owners::create))
		.route(
			"/api/owners/:id",
			get(owners::detail).put(owners::update).delete(owners::remove),
		)
		.route("/api/owners/:id/books", get(owners::books_of))
		.route("/api/books", get(books::list).post(books::create))
		.route(
			"/api/books/:id",
			get(books::detail).put(books::update).delete(books::remove),
		)
		.route("/api/book", get(books::catalog_lookup))
		.route("/api/events", get(events::list).post(events::create))
		.route(
			"/api/events/:id",
			get(events::detail).put(events::update).delete(events::remove),
		)
		.route(
			"/api/upload",
			post(upload::upload).layer(DefaultBodyLimit::max(UPLOAD_BODY_LIMIT)),
		)
		.layer(TraceLayer::new_for_http())
		.layer(CorsLayer::permissive())
		.with_state(state)
}
