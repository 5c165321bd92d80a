//! Book workflows: standard create/update/delete plus the owner-hydrated
//! reads the list and detail pages consume.

use serde_json::json;
use uuid::Uuid;

use super::{decode_rows, decode_single, OpError};
use crate::{
	datastore::{Filter, RowStore, SelectQuery},
	domain::{Book, BookData},
};

const HYDRATED: &str = "*, owner(*)";

pub async fn create(store: &dyn RowStore, data: BookData) -> Result<Book, OpError> {
	let rows = store
		.insert("books", vec![serde_json::to_value(&data)?])
		.await?;
	rows.into_iter()
		.next()
		.ok_or(OpError::EmptyInsert("book"))
		.and_then(|row| serde_json::from_value(row).map_err(OpError::from))
}

pub async fn update(store: &dyn RowStore, id: Uuid, data: BookData) -> Result<Book, OpError> {
	let rows = store
		.update("books", serde_json::to_value(&data)?, &[Filter::eq("id", json!(id))])
		.await?;
	decode_single(rows, "book")
}

pub async fn delete(store: &dyn RowStore, id: Uuid) -> Result<Book, OpError> {
	let rows = store
		.delete("books", &[Filter::eq("id", json!(id))])
		.await?;
	decode_single(rows, "book")
}

pub async fn list(store: &dyn RowStore) -> Result<Vec<Book>, OpError> {
	let rows = store
		.select("books", SelectQuery::new(HYDRATED).order_desc("created_at"))
		.await?;
	decode_rows(rows)
}

pub async fn get(store: &dyn RowStore, id: Uuid) -> Result<Book, OpError> {
	let rows = store
		.select("books", SelectQuery::new(HYDRATED).eq("id", json!(id)))
		.await?;
	decode_single(rows, "book")
}

pub async fn get_by_isbn(store: &dyn RowStore, isbn: &str) -> Result<Book, OpError> {
	let rows = store
		.select("books", SelectQuery::new(HYDRATED).eq("isbn", json!(isbn)))
		.await?;
	decode_single(rows, "book")
}

pub async fn list_by_owner(store: &dyn RowStore, owner_id: Uuid) -> Result<Vec<Book>, OpError> {
	let rows = store
		.select(
			"books",
			SelectQuery::new(HYDRATED)
				.eq("owner_id", json!(owner_id))
				.order_desc("created_at"),
		)
		.await?;
	decode_rows(rows)
}
