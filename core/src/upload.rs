//! Image upload pipeline: optimize each submitted file, store it in the
//! bucket in small concurrent batches and hand back the public URLs.
//!
//! The pipeline is deliberately partial-failure tolerant: one bad file in a
//! gallery batch is logged and skipped, and only a batch with zero surviving
//! files is an error.

use futures::future::join_all;
use rand::{distributions::Alphanumeric, Rng};
use thiserror::Error;
use tracing::warn;

use crate::datastore::{storage::ObjectStore, StoreError};

/// Files are uploaded in batches of this size, not all at once.
pub const CONCURRENT_UPLOADS: usize = 3;

/// A submitted file, as it arrived in the multipart request.
#[derive(Debug, Clone)]
pub struct UploadFile {
	pub name: String,
	pub bytes: Vec<u8>,
}

#[derive(Debug, Error)]
pub enum UploadError {
	#[error("image rejected: {0}")]
	Image(#[from] tomo_images::Error),
	#[error("bucket upload failed: {0}")]
	Storage(#[from] StoreError),
	#[error("every file in the batch failed")]
	AllFailed,
}

/// Optimizes and stores a single file, returning its public URL.
pub async fn upload_image(
	store: &dyn ObjectStore,
	file: &UploadFile,
) -> Result<String, UploadError> {
	let optimized = tomo_images::optimize(&file.bytes)?;
	let path = object_path();
	store.put(&path, optimized.bytes, "image/jpeg").await?;
	Ok(store.public_url(&path))
}

/// Uploads a gallery batch in chunks of [`CONCURRENT_UPLOADS`]. Per-file
/// failures are logged and skipped; the call fails only when nothing
/// survives.
pub async fn upload_images(
	store: &dyn ObjectStore,
	files: &[UploadFile],
) -> Result<Vec<String>, UploadError> {
	let mut urls = Vec::with_capacity(files.len());

	for chunk in files.chunks(CONCURRENT_UPLOADS) {
		let results = join_all(chunk.iter().map(|file| upload_image(store, file))).await;
		for (file, result) in chunk.iter().zip(results) {
			match result {
				Ok(url) => urls.push(url),
				Err(err) => warn!(name = %file.name, %err, "skipping failed upload"),
			}
		}
	}

	if urls.is_empty() && !files.is_empty() {
		return Err(UploadError::AllFailed);
	}
	Ok(urls)
}

/// Bucket key for an optimized image. Everything is re-encoded as JPEG, so
/// the extension is fixed; the millisecond timestamp plus a random token
/// keeps concurrent uploads from colliding.
fn object_path() -> String {
	let token: String = rand::thread_rng()
		.sample_iter(&Alphanumeric)
		.take(8)
		.map(|c| (c as char).to_ascii_lowercase())
		.collect();
	let millis = chrono::Utc::now().timestamp_millis();
	format!("images/{millis}-{token}.jpg")
}
