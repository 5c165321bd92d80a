//! Access to the hosted row datastore and its object storage bucket.
//!
//! [`RowStore`] is the seam between the workflows and the external service:
//! the real backend is [`rest::RestStore`], a PostgREST-style HTTP client;
//! tests run against an in-memory implementation. The interface offers no
//! multi-statement transactions, which is why the workflow layer keeps the
//! compensation pattern.

pub mod rest;
pub mod storage;

#[cfg(test)]
pub mod memory;

use async_trait::async_trait;
use serde_json::Value;

use crate::Config;

pub use rest::RestStore;
pub use storage::{BucketClient, ObjectStore};

/// Opens a fresh datastore session for one workflow call.
pub fn connect(config: &Config) -> RestStore {
	RestStore::new(config)
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
	#[error("request failed: {0}")]
	Request(#[from] reqwest::Error),
	#[error("datastore responded with {status}: {message}")]
	Backend { status: u16, message: String },
	#[error("response decode failed: {0}")]
	Decode(#[from] serde_json::Error),
}

/// A row-level filter, rendered as a PostgREST query parameter.
#[derive(Debug, Clone)]
pub enum Filter {
	Eq(String, Value),
	Lt(String, Value),
	Lte(String, Value),
	Gte(String, Value),
}

impl Filter {
	pub fn eq(column: impl Into<String>, value: Value) -> Self {
		Self::Eq(column.into(), value)
	}

	pub fn lt(column: impl Into<String>, value: Value) -> Self {
		Self::Lt(column.into(), value)
	}

	pub fn lte(column: impl Into<String>, value: Value) -> Self {
		Self::Lte(column.into(), value)
	}

	pub fn gte(column: impl Into<String>, value: Value) -> Self {
		Self::Gte(column.into(), value)
	}

	/// `("col", "eq.value")` pair for the REST query string.
	pub fn to_query_pair(&self) -> (String, String) {
		let (column, op, value) = match self {
			Self::Eq(c, v) => (c, "eq", v),
			Self::Lt(c, v) => (c, "lt", v),
			Self::Lte(c, v) => (c, "lte", v),
			Self::Gte(c, v) => (c, "gte", v),
		};
		(column.clone(), format!("{op}.{}", literal(value)))
	}

	pub fn column(&self) -> &str {
		match self {
			Self::Eq(c, _) | Self::Lt(c, _) | Self::Lte(c, _) | Self::Gte(c, _) => c,
		}
	}
}

/// Renders a JSON value the way the REST dialect expects it, unquoted.
fn literal(value: &Value) -> String {
	match value {
		Value::String(s) => s.clone(),
		Value::Null => "null".to_string(),
		other => other.to_string(),
	}
}

#[derive(Debug, Clone)]
pub struct Order {
	pub column: String,
	pub ascending: bool,
}

/// A read query: column projection (with embedded relations, e.g.
/// `"*, hobby(*)"`), filters and an optional ordering.
#[derive(Debug, Clone)]
pub struct SelectQuery {
	pub columns: String,
	pub filters: Vec<Filter>,
	pub order: Option<Order>,
}

impl SelectQuery {
	pub fn new(columns: impl Into<String>) -> Self {
		Self {
			columns: columns.into(),
			filters: Vec::new(),
			order: None,
		}
	}

	pub fn eq(mut self, column: impl Into<String>, value: Value) -> Self {
		self.filters.push(Filter::eq(column, value));
		self
	}

	pub fn lt(mut self, column: impl Into<String>, value: Value) -> Self {
		self.filters.push(Filter::lt(column, value));
		self
	}

	pub fn lte(mut self, column: impl Into<String>, value: Value) -> Self {
		self.filters.push(Filter::lte(column, value));
		self
	}

	pub fn gte(mut self, column: impl Into<String>, value: Value) -> Self {
		self.filters.push(Filter::gte(column, value));
		self
	}

	pub fn order_asc(mut self, column: impl Into<String>) -> Self {
		self.order = Some(Order {
			column: column.into(),
			ascending: true,
		});
		self
	}

	pub fn order_desc(mut self, column: impl Into<String>) -> Self {
		self.order = Some(Order {
			column: column.into(),
			ascending: false,
		});
		self
	}
}

/// Row-level operations against one backing service.
///
/// Mutations return the affected rows (`Prefer: return=representation`
/// upstream), which the workflows use both for result payloads and for the
/// "insert returned nothing" defensive check.
#[async_trait]
pub trait RowStore: Send + Sync {
	async fn insert(&self, table: &str, rows: Vec<Value>) -> Result<Vec<Value>, StoreError>;

	async fn update(
		&self,
		table: &str,
		patch: Value,
		filters: &[Filter],
	) -> Result<Vec<Value>, StoreError>;

	async fn delete(&self, table: &str, filters: &[Filter]) -> Result<Vec<Value>, StoreError>;

	async fn select(&self, table: &str, query: SelectQuery) -> Result<Vec<Value>, StoreError>;
}
