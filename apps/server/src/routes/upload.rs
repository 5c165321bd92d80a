//! Multipart image intake for the admin forms.
//!
//! Two field names are understood: a single `thumbnail` and any number of
//! `images` gallery files. Size limits are enforced here, before any bytes
//! reach the optimizer: 5 MiB for the thumbnail, 15 MiB for the gallery
//! fields combined.

use axum::{
	extract::{Multipart, State},
	Json,
};
use serde::Serialize;

use tomo_core::{
	datastore::BucketClient,
	upload::{upload_image, upload_images, UploadFile},
};

use crate::{error::ApiError, routes::auth::AdminSession, AppState};

const MIB: usize = 1_048_576;
const THUMBNAIL_LIMIT: usize = 5 * MIB;
const GALLERY_LIMIT: usize = 15 * MIB;

#[derive(Debug, Serialize)]
pub struct UploadResponse {
	pub thumbnail_url: Option<String>,
	pub image_urls: Vec<String>,
}

pub async fn upload(
	_session: AdminSession,
	State(state): State<AppState>,
	mut multipart: Multipart,
) -> Result<Json<UploadResponse>, ApiError> {
	let mut thumbnail: Option<UploadFile> = None;
	let mut gallery: Vec<UploadFile> = Vec::new();
	let mut gallery_bytes = 0usize;

	while let Some(field) = multipart.next_field().await? {
		let field_name = field.name().unwrap_or_default().to_string();
		let file_name = field.file_name().unwrap_or("unnamed").to_string();
		let bytes = field.bytes().await?.to_vec();

		match field_name.as_str() {
			"thumbnail" => {
				if bytes.len() > THUMBNAIL_LIMIT {
					return Err(ApiError::BadRequest(format!(
						"thumbnail {file_name} exceeds the 5MiB limit"
					)));
				}
				thumbnail = Some(UploadFile {
					name: file_name,
					bytes,
				});
			}
			"images" => {
				gallery_bytes += bytes.len();
				if gallery_bytes > GALLERY_LIMIT {
					return Err(ApiError::BadRequest(
						"gallery exceeds the 15MiB combined limit".to_string(),
					));
				}
				gallery.push(UploadFile {
					name: file_name,
					bytes,
				});
			}
			other => {
				return Err(ApiError::BadRequest(format!(
					"unexpected multipart field {other:?}"
				)))
			}
		}
	}

	let store = BucketClient::new(&state.config);

	let thumbnail_url = match &thumbnail {
		Some(file) => Some(upload_image(&store, file).await?),
		None => None,
	};
	let image_urls = upload_images(&store, &gallery).await?;

	Ok(Json(UploadResponse {
		thumbnail_url,
		image_urls,
	}))
}
