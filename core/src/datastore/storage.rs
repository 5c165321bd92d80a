//! Object storage bucket client: upload + public URL derivation.

use async_trait::async_trait;

use super::StoreError;
use crate::Config;

/// One year, in seconds. Optimized images are immutable once written.
const CACHE_CONTROL_SECS: u32 = 31_536_000;

/// The seam between the upload pipeline and the bucket service.
#[async_trait]
pub trait ObjectStore: Send + Sync {
	async fn put(&self, path: &str, bytes: Vec<u8>, content_type: &str)
		-> Result<(), StoreError>;

	/// The public URL the stored object is served from. Purely derived;
	/// issuing behavior is the bucket service's concern.
	fn public_url(&self, path: &str) -> String;
}

pub struct BucketClient {
	client: reqwest::Client,
	base_url: String,
	api_key: String,
	bucket: String,
}

impl BucketClient {
	pub fn new(config: &Config) -> Self {
		Self {
			client: reqwest::Client::new(),
			base_url: config.datastore_url.trim_end_matches('/').to_string(),
			api_key: config.datastore_key.clone(),
			bucket: config.storage_bucket.clone(),
		}
	}
}

#[async_trait]
impl ObjectStore for BucketClient {
	async fn put(
		&self,
		path: &str,
		bytes: Vec<u8>,
		content_type: &str,
	) -> Result<(), StoreError> {
		let response = self
			.client
			.post(format!(
				"{}/storage/v1/object/{}/{path}",
				self.base_url, self.bucket
			))
			.header("apikey", &self.api_key)
			.bearer_auth(&self.api_key)
			.header("content-type", content_type)
			.header("cache-control", format!("max-age={CACHE_CONTROL_SECS}"))
			.header("x-upsert", "false")
			.body(bytes)
			.send()
			.await?;

		let status = response.status();
		if !status.is_success() {
			return Err(StoreError::Backend {
				status: status.as_u16(),
				message: response.text().await.unwrap_or_default(),
			});
		}
		Ok(())
	}

	fn public_url(&self, path: &str) -> String {
		format!(
			"{}/storage/v1/object/public/{}/{path}",
			self.base_url, self.bucket
		)
	}
}
