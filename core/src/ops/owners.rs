//! Owner workflows: composite create with hobbies, wholesale hobby
//! replacement on update, and policy-driven deletion.

use serde_json::{json, Value};
use tracing::{error, warn};
use uuid::Uuid;

use super::{apply_cascade, decode_rows, decode_single, valid_labels, OpError};
use crate::{
	datastore::{Filter, RowStore, SelectQuery},
	domain::{Owner, OwnerData, OWNER_BOOKS, OWNER_HOBBIES},
};

const HYDRATED: &str = "*, hobby(*)";

/// Creates an owner and its hobby rows as a saga: the hobby bulk-insert
/// only runs once the owner row exists, and a failed hobby insert rolls the
/// owner back (best-effort) before the error propagates. Hobby rows are
/// tagged with `op_id` so a retry of the same logical operation first
/// clears whatever a crashed earlier attempt managed to write.
pub async fn create_with_hobbies(
	store: &dyn RowStore,
	data: OwnerData,
	hobbies: &[String],
	op_id: Uuid,
) -> Result<Owner, OpError> {
	let rows = store
		.insert("owner", vec![serde_json::to_value(&data)?])
		.await?;
	let owner: Owner = rows
		.into_iter()
		.next()
		.ok_or(OpError::EmptyInsert("owner"))
		.and_then(|row| serde_json::from_value(row).map_err(OpError::from))?;

	let labels = valid_labels(hobbies);
	if !labels.is_empty() {
		// Clear leftovers from a crashed earlier attempt with this op_id
		if let Err(err) = store
			.delete("hobby", &[Filter::eq("op_id", json!(op_id))])
			.await
		{
			warn!(%op_id, %err, "stale hobby cleanup failed, continuing");
		}

		let hobby_rows: Vec<Value> = labels
			.iter()
			.map(|label| {
				json!({
					"owner_id": owner.id,
					"owner_hobby": label,
					"op_id": op_id,
				})
			})
			.collect();

		if let Err(err) = store.insert("hobby", hobby_rows).await {
			warn!(owner_id = %owner.id, %err, "hobby insert failed, rolling back owner");
			if let Err(compensation) = store
				.delete("owner", &[Filter::eq("id", json!(owner.id))])
				.await
			{
				error!(owner_id = %owner.id, %compensation, "compensating owner delete failed");
			}
			return Err(err.into());
		}
	}

	// Creation path returns the bare owner row, not re-joined
	Ok(owner)
}

/// Updates the owner row, then replaces its hobby set wholesale: all
/// existing rows deleted, the filtered labels re-inserted. Any step's
/// failure aborts the remainder; no compensation for a partial replacement.
pub async fn update(
	store: &dyn RowStore,
	id: Uuid,
	data: OwnerData,
	hobbies: &[String],
) -> Result<Owner, OpError> {
	let updated = store
		.update("owner", serde_json::to_value(&data)?, &[Filter::eq("id", json!(id))])
		.await?;
	if updated.is_empty() {
		return Err(OpError::NotFound("owner"));
	}

	store
		.delete("hobby", &[Filter::eq("owner_id", json!(id))])
		.await?;

	let labels = valid_labels(hobbies);
	if !labels.is_empty() {
		let hobby_rows: Vec<Value> = labels
			.iter()
			.map(|label| json!({ "owner_id": id, "owner_hobby": label }))
			.collect();
		store.insert("hobby", hobby_rows).await?;
	}

	get(store, id).await
}

/// Deletes an owner after applying the declared cascade policies: hobbies
/// are cascade-deleted, books are detached and survive.
pub async fn delete(store: &dyn RowStore, id: Uuid) -> Result<Owner, OpError> {
	apply_cascade(store, &OWNER_HOBBIES, id).await?;
	apply_cascade(store, &OWNER_BOOKS, id).await?;

	let removed = store
		.delete("owner", &[Filter::eq("id", json!(id))])
		.await?;
	decode_single(removed, "owner")
}

pub async fn list(store: &dyn RowStore) -> Result<Vec<Owner>, OpError> {
	let rows = store
		.select("owner", SelectQuery::new(HYDRATED).order_asc("created_at"))
		.await?;
	decode_rows(rows)
}

pub async fn get(store: &dyn RowStore, id: Uuid) -> Result<Owner, OpError> {
	let rows = store
		.select("owner", SelectQuery::new(HYDRATED).eq("id", json!(id)))
		.await?;
	decode_single(rows, "owner")
}
