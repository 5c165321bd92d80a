//! Entity workflows. Every operation opens against a caller-supplied
//! [`RowStore`] session, performs its sequence of dependent calls and
//! returns `Result` — errors are values here, nothing is thrown past this
//! boundary.
//!
//! Composite writes (parent + dependents) are sagas, not transactions: the
//! backing service has no multi-statement transaction primitive, so a
//! failed dependent insert is answered by a best-effort compensating delete
//! of the parent. Dependent rows carry the operation's idempotency key so a
//! retry of the same logical operation can clear the rows a crashed earlier
//! attempt left behind.

pub mod books;
pub mod events;
pub mod owners;
pub mod search;

use serde::de::DeserializeOwned;
use serde_json::{json, Map, Value};
use tracing::warn;
use uuid::Uuid;

use crate::{
	datastore::{Filter, RowStore, SelectQuery, StoreError},
	domain::{CascadePolicy, Dependents},
	util::datetime::DateError,
};

#[derive(Debug, thiserror::Error)]
pub enum OpError {
	#[error("datastore error: {0}")]
	Store(#[from] StoreError),
	#[error("{0} not found")]
	NotFound(&'static str),
	#[error("the datastore returned no {0} row after a successful insert")]
	EmptyInsert(&'static str),
	#[error("invalid {field}: {message}")]
	Validation { field: &'static str, message: String },
	#[error("cannot delete: dependent {0} rows exist")]
	DeleteForbidden(&'static str),
	#[error("row decode failed: {0}")]
	Decode(#[from] serde_json::Error),
}

impl From<DateError> for OpError {
	fn from(err: DateError) -> Self {
		Self::Validation {
			field: "data",
			message: err.to_string(),
		}
	}
}

pub(crate) fn decode_rows<T: DeserializeOwned>(rows: Vec<Value>) -> Result<Vec<T>, OpError> {
	rows.into_iter()
		.map(|row| serde_json::from_value(row).map_err(OpError::from))
		.collect()
}

/// `.single()` semantics: exactly the first row, or not-found.
pub(crate) fn decode_single<T: DeserializeOwned>(
	rows: Vec<Value>,
	entity: &'static str,
) -> Result<T, OpError> {
	rows.into_iter()
		.next()
		.ok_or(OpError::NotFound(entity))
		.and_then(|row| serde_json::from_value(row).map_err(OpError::from))
}

/// Applies a relationship's declared cascade policy ahead of a parent
/// deletion. Cascade and detach are best-effort (failures logged, parent
/// deletion proceeds); forbid refuses while dependents exist.
pub(crate) async fn apply_cascade(
	store: &dyn RowStore,
	dependents: &Dependents,
	parent_id: Uuid,
) -> Result<(), OpError> {
	let by_parent = [Filter::eq(dependents.fk_column, json!(parent_id))];
	match dependents.policy {
		CascadePolicy::CascadeDelete => {
			if let Err(err) = store.delete(dependents.child_table, &by_parent).await {
				warn!(
					table = dependents.child_table,
					%err,
					"dependent delete failed, deleting parent anyway"
				);
			}
		}
		CascadePolicy::Detach => {
			let mut patch = Map::new();
			patch.insert(dependents.fk_column.to_string(), Value::Null);
			if let Err(err) = store
				.update(dependents.child_table, Value::Object(patch), &by_parent)
				.await
			{
				warn!(
					table = dependents.child_table,
					%err,
					"dependent detach failed, deleting parent anyway"
				);
			}
		}
		CascadePolicy::Forbid => {
			let rows = store
				.select(
					dependents.child_table,
					SelectQuery::new("id").eq(dependents.fk_column, json!(parent_id)),
				)
				.await?;
			if !rows.is_empty() {
				return Err(OpError::DeleteForbidden(dependents.child_table));
			}
		}
	}
	Ok(())
}

/// Drops empty and whitespace-only labels and trims the rest.
pub(crate) fn valid_labels(labels: &[String]) -> Vec<String> {
	labels
		.iter()
		.map(|label| label.trim())
		.filter(|label| !label.is_empty())
		.map(str::to_string)
		.collect()
}
