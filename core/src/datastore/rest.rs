//! HTTP implementation of [`RowStore`] against a PostgREST-style service.

use async_trait::async_trait;
use reqwest::{Method, RequestBuilder, StatusCode};
use serde_json::Value;

use super::{Filter, RowStore, SelectQuery, StoreError};
use crate::Config;

pub struct RestStore {
	client: reqwest::Client,
	base_url: String,
	api_key: String,
}

impl RestStore {
	pub fn new(config: &Config) -> Self {
		Self {
			client: reqwest::Client::new(),
			base_url: config.datastore_url.trim_end_matches('/').to_string(),
			api_key: config.datastore_key.clone(),
		}
	}

	fn request(&self, method: Method, table: &str) -> RequestBuilder {
		self.client
			.request(method, format!("{}/rest/v1/{table}", self.base_url))
			.header("apikey", &self.api_key)
			.bearer_auth(&self.api_key)
			.header("Prefer", "return=representation")
	}

	fn with_filters(builder: RequestBuilder, filters: &[Filter]) -> RequestBuilder {
		builder.query(
			&filters
				.iter()
				.map(Filter::to_query_pair)
				.collect::<Vec<_>>(),
		)
	}

	async fn rows(builder: RequestBuilder) -> Result<Vec<Value>, StoreError> {
		let response = builder.send().await?;
		let status = response.status();
		if !status.is_success() {
			return Err(StoreError::Backend {
				status: status.as_u16(),
				message: response.text().await.unwrap_or_default(),
			});
		}
		if status == StatusCode::NO_CONTENT {
			return Ok(Vec::new());
		}
		Ok(response.json().await?)
	}
}

#[async_trait]
impl RowStore for RestStore {
	async fn insert(&self, table: &str, rows: Vec<Value>) -> Result<Vec<Value>, StoreError> {
		Self::rows(self.request(Method::POST, table).json(&rows)).await
	}

	async fn update(
		&self,
		table: &str,
		patch: Value,
		filters: &[Filter],
	) -> Result<Vec<Value>, StoreError> {
		debug_assert!(!filters.is_empty(), "unfiltered update would touch every row");
		Self::rows(Self::with_filters(self.request(Method::PATCH, table), filters).json(&patch))
			.await
	}

	async fn delete(&self, table: &str, filters: &[Filter]) -> Result<Vec<Value>, StoreError> {
		debug_assert!(!filters.is_empty(), "unfiltered delete would drop every row");
		Self::rows(Self::with_filters(self.request(Method::DELETE, table), filters)).await
	}

	async fn select(&self, table: &str, query: SelectQuery) -> Result<Vec<Value>, StoreError> {
		// The REST dialect rejects whitespace inside the projection
		let mut builder = self
			.request(Method::GET, table)
			.query(&[("select", query.columns.replace(' ', ""))]);
		builder = Self::with_filters(builder, &query.filters);
		if let Some(order) = &query.order {
			let direction = if order.ascending { "asc" } else { "desc" };
			builder = builder.query(&[("order", format!("{}.{direction}", order.column))]);
		}
		Self::rows(builder).await
	}
}
