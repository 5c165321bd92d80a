//! Client for the external ISBN catalog (Google Books volume API).
//!
//! Lookups are best-effort enrichment for the admin book form: the caller
//! treats every error here as "fill the fields in by hand".

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{util::urls, Config};

const DEFAULT_BASE_URL: &str = "https://www.googleapis.com";

/// No-description fallback shown in the book form.
const NO_DESCRIPTION: &str = "概要はありません。";

#[derive(Debug, Error)]
pub enum CatalogError {
	#[error("no ISBN digits in the input")]
	MissingIsbn,
	#[error("the catalog has no volume for this ISBN")]
	NotFound,
	#[error("catalog request failed: {0}")]
	Request(#[from] reqwest::Error),
	#[error("catalog responded with status {0}")]
	Upstream(u16),
}

/// Catalog metadata mapped onto the book form's fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CatalogBook {
	pub isbn: String,
	pub title: String,
	pub author: String,
	pub description: String,
	pub thumbnail: String,
}

#[derive(Debug, Deserialize)]
struct VolumeList {
	#[serde(rename = "totalItems", default)]
	total_items: u32,
	#[serde(default)]
	items: Vec<Volume>,
}

#[derive(Debug, Deserialize)]
struct Volume {
	#[serde(rename = "volumeInfo")]
	volume_info: VolumeInfo,
}

#[derive(Debug, Default, Deserialize)]
struct VolumeInfo {
	title: Option<String>,
	#[serde(default)]
	authors: Vec<String>,
	description: Option<String>,
	#[serde(rename = "imageLinks")]
	image_links: Option<ImageLinks>,
}

#[derive(Debug, Deserialize)]
struct ImageLinks {
	thumbnail: Option<String>,
	#[serde(rename = "smallThumbnail")]
	small_thumbnail: Option<String>,
}

pub struct CatalogClient {
	client: reqwest::Client,
	base_url: String,
	api_key: String,
}

impl CatalogClient {
	pub fn new(config: &Config) -> Self {
		Self {
			client: reqwest::Client::new(),
			base_url: DEFAULT_BASE_URL.to_string(),
			api_key: config.catalog_api_key.clone(),
		}
	}

	#[cfg(test)]
	fn with_base_url(config: &Config, base_url: &str) -> Self {
		Self {
			base_url: base_url.to_string(),
			..Self::new(config)
		}
	}

	/// Looks the ISBN up and maps the first matching volume onto the book
	/// form's fields. Hyphens and whitespace in the input are ignored.
	pub async fn lookup_isbn(&self, isbn: &str) -> Result<CatalogBook, CatalogError> {
		let digits: String = isbn
			.chars()
			.filter(|c| c.is_ascii_alphanumeric())
			.collect();
		if digits.is_empty() {
			return Err(CatalogError::MissingIsbn);
		}

		let mut query = vec![("q", format!("isbn:{digits}"))];
		if !self.api_key.is_empty() {
			query.push(("key", self.api_key.clone()));
		}

		let response = self
			.client
			.get(format!("{}/books/v1/volumes", self.base_url))
			.query(&query)
			.send()
			.await?;
		if !response.status().is_success() {
			return Err(CatalogError::Upstream(response.status().as_u16()));
		}

		let list: VolumeList = response.json().await?;
		if list.total_items == 0 {
			return Err(CatalogError::NotFound);
		}
		list.items
			.into_iter()
			.next()
			.map(|volume| normalize(&digits, volume.volume_info))
			.ok_or(CatalogError::NotFound)
	}
}

/// Maps raw volume metadata onto the form fields: authors joined, missing
/// description replaced with a placeholder, thumbnail upgraded to HTTPS.
fn normalize(isbn: &str, info: VolumeInfo) -> CatalogBook {
	let thumbnail = info
		.image_links
		.and_then(|links| links.thumbnail.or(links.small_thumbnail))
		.map(|url| urls::to_https(&url))
		.unwrap_or_default();

	CatalogBook {
		isbn: isbn.to_string(),
		title: info.title.unwrap_or_default(),
		author: info.authors.join(", "),
		description: info
			.description
			.filter(|d| !d.trim().is_empty())
			.unwrap_or_else(|| NO_DESCRIPTION.to_string()),
		thumbnail,
	}
}
