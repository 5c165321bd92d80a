//! In-memory [`RowStore`] used by the workflow tests.
//!
//! Supports the same filter set, ordering and embedded-relation projection
//! as the REST backend, plus induced insert failures so the compensation
//! paths can be exercised.

use chrono::{DateTime, Utc};
use serde_json::{json, Value};
use std::{
	cmp::Ordering,
	collections::{HashMap, HashSet},
	sync::Mutex,
};
use uuid::Uuid;

use super::{Filter, RowStore, SelectQuery, StoreError};
use async_trait::async_trait;

#[derive(Debug, Clone, Copy)]
pub enum Relation {
	/// `parent` rows embed an array of `child` rows under `field`.
	HasMany {
		parent: &'static str,
		field: &'static str,
		child: &'static str,
		fk: &'static str,
	},
	/// `child` rows embed their single `parent` row under `field`.
	BelongsTo {
		child: &'static str,
		field: &'static str,
		parent: &'static str,
		fk: &'static str,
	},
}

#[derive(Default)]
pub struct MemoryStore {
	tables: Mutex<HashMap<String, Vec<Value>>>,
	relations: Vec<Relation>,
	failing_inserts: Mutex<HashSet<String>>,
}

impl MemoryStore {
	/// A store wired with the bookstore schema's relations.
	pub fn bookstore() -> Self {
		Self {
			relations: vec![
				Relation::HasMany {
					parent: "owner",
					field: "hobby",
					child: "hobby",
					fk: "owner_id",
				},
				Relation::HasMany {
					parent: "events",
					field: "event_images",
					child: "event_images",
					fk: "event_id",
				},
				Relation::BelongsTo {
					child: "books",
					field: "owner",
					parent: "owner",
					fk: "owner_id",
				},
			],
			..Default::default()
		}
	}

	/// Every insert into `table` will fail until cleared.
	pub fn fail_inserts(&self, table: &str) {
		self.failing_inserts
			.lock()
			.expect("poisoned")
			.insert(table.to_string());
	}

	/// Stores rows directly, filling in `id` and `created_at` like an
	/// insert would, and returns them.
	pub fn seed(&self, table: &str, rows: Vec<Value>) -> Vec<Value> {
		let rows: Vec<Value> = rows.into_iter().map(complete_row).collect();
		self.tables
			.lock()
			.expect("poisoned")
			.entry(table.to_string())
			.or_default()
			.extend(rows.clone());
		rows
	}

	/// Raw rows of a table, for assertions.
	pub fn rows(&self, table: &str) -> Vec<Value> {
		self.tables
			.lock()
			.expect("poisoned")
			.get(table)
			.cloned()
			.unwrap_or_default()
	}

	fn embed(&self, table: &str, field: &str, row: &Value) -> Value {
		let tables = self.tables.lock().expect("poisoned");
		for relation in &self.relations {
			match *relation {
				Relation::HasMany {
					parent,
					field: f,
					child,
					fk,
				} if parent == table && f == field => {
					let children = tables
						.get(child)
						.map(|rows| {
							rows.iter()
								.filter(|c| c.get(fk) == row.get("id"))
								.cloned()
								.collect::<Vec<_>>()
						})
						.unwrap_or_default();
					return Value::Array(children);
				}
				Relation::BelongsTo {
					child,
					field: f,
					parent,
					fk,
				} if child == table && f == field => {
					let Some(fk_value) = row.get(fk).filter(|v| !v.is_null()) else {
						return Value::Null;
					};
					return tables
						.get(parent)
						.and_then(|rows| {
							rows.iter().find(|p| p.get("id") == Some(fk_value)).cloned()
						})
						.unwrap_or(Value::Null);
				}
				_ => {}
			}
		}
		Value::Null
	}
}

#[async_trait]
impl RowStore for MemoryStore {
	async fn insert(&self, table: &str, rows: Vec<Value>) -> Result<Vec<Value>, StoreError> {
		if self.failing_inserts.lock().expect("poisoned").contains(table) {
			return Err(StoreError::Backend {
				status: 500,
				message: format!("induced insert failure for {table}"),
			});
		}
		Ok(self.seed(table, rows))
	}

	async fn update(
		&self,
		table: &str,
		patch: Value,
		filters: &[Filter],
	) -> Result<Vec<Value>, StoreError> {
		let mut tables = self.tables.lock().expect("poisoned");
		let rows = tables.entry(table.to_string()).or_default();
		let mut updated = Vec::new();
		for row in rows.iter_mut() {
			if filters.iter().all(|f| matches(f, row)) {
				if let (Some(target), Some(source)) = (row.as_object_mut(), patch.as_object()) {
					for (key, value) in source {
						target.insert(key.clone(), value.clone());
					}
				}
				updated.push(row.clone());
			}
		}
		Ok(updated)
	}

	async fn delete(&self, table: &str, filters: &[Filter]) -> Result<Vec<Value>, StoreError> {
		let mut tables = self.tables.lock().expect("poisoned");
		let rows = tables.entry(table.to_string()).or_default();
		let (removed, kept) = rows
			.drain(..)
			.partition(|row| filters.iter().all(|f| matches(f, row)));
		*rows = kept;
		Ok(removed)
	}

	async fn select(&self, table: &str, query: SelectQuery) -> Result<Vec<Value>, StoreError> {
		let mut rows: Vec<Value> = self
			.rows(table)
			.into_iter()
			.filter(|row| query.filters.iter().all(|f| matches(f, row)))
			.collect();

		if let Some(order) = &query.order {
			rows.sort_by(|a, b| {
				let ordering = compare(
					a.get(&order.column).unwrap_or(&Value::Null),
					b.get(&order.column).unwrap_or(&Value::Null),
				);
				if order.ascending {
					ordering
				} else {
					ordering.reverse()
				}
			});
		}

		let tokens: Vec<String> = query
			.columns
			.split(',')
			.map(|t| t.trim().to_string())
			.collect();
		let keep_all = tokens.iter().any(|t| t == "*");

		Ok(rows
			.into_iter()
			.map(|row| {
				let mut out = if keep_all {
					row.clone()
				} else {
					let mut picked = serde_json::Map::new();
					for token in tokens.iter().filter(|t| !t.contains('(')) {
						if let Some(value) = row.get(token) {
							picked.insert(token.clone(), value.clone());
						}
					}
					Value::Object(picked)
				};
				for token in tokens.iter().filter(|t| t.contains('(')) {
					let field = token.split('(').next().unwrap_or_default();
					let embedded = self.embed(table, field, &row);
					if let Some(object) = out.as_object_mut() {
						object.insert(field.to_string(), embedded);
					}
				}
				out
			})
			.collect())
	}
}

fn complete_row(row: Value) -> Value {
	let mut row = row;
	if let Some(object) = row.as_object_mut() {
		object
			.entry("id")
			.or_insert_with(|| json!(Uuid::new_v4()));
		object
			.entry("created_at")
			.or_insert_with(|| json!(Utc::now().to_rfc3339()));
	}
	row
}

fn matches(filter: &Filter, row: &Value) -> bool {
	let actual = row.get(filter.column()).unwrap_or(&Value::Null);
	match filter {
		Filter::Eq(_, expected) => actual == expected,
		Filter::Lt(_, expected) => compare(actual, expected) == Ordering::Less,
		Filter::Lte(_, expected) => compare(actual, expected) != Ordering::Greater,
		Filter::Gte(_, expected) => compare(actual, expected) != Ordering::Less,
	}
}

/// Orders two values the way the backend would: numerically for numbers,
/// as instants for timestamp strings, lexically otherwise.
fn compare(a: &Value, b: &Value) -> Ordering {
	if let (Some(a), Some(b)) = (a.as_f64(), b.as_f64()) {
		return a.partial_cmp(&b).unwrap_or(Ordering::Equal);
	}
	if let (Some(a), Some(b)) = (a.as_str(), b.as_str()) {
		if let (Ok(a), Ok(b)) = (
			DateTime::parse_from_rfc3339(a),
			DateTime::parse_from_rfc3339(b),
		) {
			return a.cmp(&b);
		}
		return a.cmp(b);
	}
	Ordering::Equal
}

#[cfg(test)]
mod tests {
	use super::*;
	use pretty_assertions::assert_eq;

	#[tokio::test]
	async fn test_select_embeds_has_many() {
		let store = MemoryStore::bookstore();
		let owner = store
			.seed("owner", vec![json!({ "name": "Aki" })])
			.remove(0);
		store.seed(
			"hobby",
			vec![json!({ "owner_id": owner["id"], "owner_hobby": "reading" })],
		);

		let rows = store
			.select("owner", SelectQuery::new("*, hobby(*)"))
			.await
			.unwrap();
		assert_eq!(rows.len(), 1);
		assert_eq!(rows[0]["hobby"][0]["owner_hobby"], "reading");
	}

	#[tokio::test]
	async fn test_timestamp_filters_compare_instants() {
		let store = MemoryStore::bookstore();
		// +09:00 wall-clock that is already in the past relative to the Z instant
		store.seed(
			"events",
			vec![json!({ "data": "2030-01-01T08:00:00+09:00", "status": "upcoming" })],
		);

		let hit = store
			.select(
				"events",
				SelectQuery::new("*").lt("data", json!("2030-01-01T00:00:00Z")),
			)
			.await
			.unwrap();
		assert_eq!(hit.len(), 1, "23:00Z on new year's eve is after the stored instant");
	}
}
