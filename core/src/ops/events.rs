//! Event workflows. Writes normalize the incoming datetime-input string to
//! the stored `+09:00` form before anything reaches the datastore; the
//! composite create is the same saga shape as the owner one, with gallery
//! rows as the dependent insert.

use chrono::{DateTime, Utc};
use serde_json::{json, Value};
use tracing::{error, info, warn};
use uuid::Uuid;

use super::{apply_cascade, decode_rows, decode_single, OpError};
use crate::{
	datastore::{Filter, RowStore, SelectQuery},
	domain::{Event, EventData, EventLight, EventStatus, EVENT_IMAGES},
	util::datetime,
};

const HYDRATED: &str = "*, event_images(*)";
const LIGHT: &str = "id, name, data, price, location, description, status";

fn normalized(mut data: EventData) -> Result<EventData, OpError> {
	if let Some(date) = data.date.as_deref() {
		data.date = Some(datetime::to_iso_with_jst(date)?);
	}
	Ok(data)
}

/// Creates an event and its gallery rows as a saga. The date is normalized
/// first so a bad input fails before any row exists; a failed gallery insert
/// rolls the event back (best-effort) before the error propagates. Gallery
/// rows carry `op_id` so a retried operation clears its own leftovers.
pub async fn create_with_images(
	store: &dyn RowStore,
	data: EventData,
	image_urls: &[String],
	op_id: Uuid,
) -> Result<Event, OpError> {
	let mut data = normalized(data)?;
	if data.status.is_none() {
		data.status = Some(EventStatus::Upcoming);
	}

	let rows = store
		.insert("events", vec![serde_json::to_value(&data)?])
		.await?;
	let event: Event = rows
		.into_iter()
		.next()
		.ok_or(OpError::EmptyInsert("event"))
		.and_then(|row| serde_json::from_value(row).map_err(OpError::from))?;

	if !image_urls.is_empty() {
		if let Err(err) = store
			.delete("event_images", &[Filter::eq("op_id", json!(op_id))])
			.await
		{
			warn!(%op_id, %err, "stale gallery cleanup failed, continuing");
		}

		let image_rows: Vec<Value> = image_urls
			.iter()
			.map(|url| {
				json!({
					"event_id": event.id,
					"image_url": url,
					"op_id": op_id,
				})
			})
			.collect();

		if let Err(err) = store.insert("event_images", image_rows).await {
			warn!(event_id = %event.id, %err, "gallery insert failed, rolling back event");
			if let Err(compensation) = store
				.delete("events", &[Filter::eq("id", json!(event.id))])
				.await
			{
				error!(event_id = %event.id, %compensation, "compensating event delete failed");
			}
			return Err(err.into());
		}
	}

	Ok(event)
}

/// Updates an event and reconciles its gallery: rows whose URL is in
/// `removed_urls` are deleted (scoped to this event), `added_urls` are
/// inserted, the event row is patched, and the hydrated event is re-fetched.
pub async fn update(
	store: &dyn RowStore,
	id: Uuid,
	data: EventData,
	added_urls: &[String],
	removed_urls: &[String],
) -> Result<Event, OpError> {
	let data = normalized(data)?;

	for url in removed_urls {
		store
			.delete(
				"event_images",
				&[
					Filter::eq("event_id", json!(id)),
					Filter::eq("image_url", json!(url)),
				],
			)
			.await?;
	}

	if !added_urls.is_empty() {
		let image_rows: Vec<Value> = added_urls
			.iter()
			.map(|url| json!({ "event_id": id, "image_url": url }))
			.collect();
		store.insert("event_images", image_rows).await?;
	}

	let patched = store
		.update("events", serde_json::to_value(&data)?, &[Filter::eq("id", json!(id))])
		.await?;
	if patched.is_empty() {
		return Err(OpError::NotFound("event"));
	}

	get(store, id).await
}

/// Deletes an event after cascade-deleting its gallery rows.
pub async fn delete(store: &dyn RowStore, id: Uuid) -> Result<Event, OpError> {
	apply_cascade(store, &EVENT_IMAGES, id).await?;

	let removed = store
		.delete("events", &[Filter::eq("id", json!(id))])
		.await?;
	decode_single(removed, "event")
}

pub async fn list(store: &dyn RowStore) -> Result<Vec<Event>, OpError> {
	let rows = store
		.select("events", SelectQuery::new(HYDRATED).order_asc("data"))
		.await?;
	decode_rows(rows)
}

/// Gallery-free projection for list pages.
pub async fn list_light(store: &dyn RowStore) -> Result<Vec<EventLight>, OpError> {
	let rows = store
		.select("events", SelectQuery::new(LIGHT).order_asc("data"))
		.await?;
	decode_rows(rows)
}

pub async fn get(store: &dyn RowStore, id: Uuid) -> Result<Event, OpError> {
	let rows = store
		.select("events", SelectQuery::new(HYDRATED).eq("id", json!(id)))
		.await?;
	decode_single(rows, "event")
}

/// Events whose stored timestamp falls inside the given JST calendar month.
pub async fn list_by_month(
	store: &dyn RowStore,
	year: i32,
	month: u32,
) -> Result<Vec<Event>, OpError> {
	if !(1..=12).contains(&month) {
		return Err(OpError::Validation {
			field: "month",
			message: format!("month {month} is out of range"),
		});
	}
	let start = format!("{year:04}-{month:02}-01T00:00:00+09:00");
	let (next_year, next_month) = if month == 12 { (year + 1, 1) } else { (year, month + 1) };
	let end = format!("{next_year:04}-{next_month:02}-01T00:00:00+09:00");

	let rows = store
		.select(
			"events",
			SelectQuery::new(HYDRATED)
				.gte("data", json!(start))
				.lt("data", json!(end))
				.order_asc("data"),
		)
		.await?;
	decode_rows(rows)
}

/// Promotes `upcoming` events whose timestamp has passed to `past`. The pass
/// is one-directional: a `past` event is never demoted, whatever its date.
/// A follow-up select reports rows the update somehow missed; they are only
/// logged, never retried here.
pub async fn reclassify(store: &dyn RowStore, now: DateTime<Utc>) -> Result<(), OpError> {
	let cutoff = json!(now.to_rfc3339());

	store
		.update(
			"events",
			json!({ "status": EventStatus::Past }),
			&[
				Filter::eq("status", json!(EventStatus::Upcoming)),
				Filter::lt("data", cutoff.clone()),
			],
		)
		.await?;

	let leftovers = store
		.select(
			"events",
			SelectQuery::new("id, data")
				.eq("status", json!(EventStatus::Upcoming))
				.lt("data", cutoff),
		)
		.await?;
	if !leftovers.is_empty() {
		info!(count = leftovers.len(), "events still upcoming after reclassification");
	}

	Ok(())
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::datastore::memory::MemoryStore;
	use pretty_assertions::assert_eq;

	fn dated(name: &str, date: &str) -> EventData {
		EventData {
			name: Some(name.to_string()),
			date: Some(date.to_string()),
			price: Some(0.0),
			location: Some("store".to_string()),
			description: Some(String::new()),
			..Default::default()
		}
	}

	fn image_urls(store: &MemoryStore) -> Vec<String> {
		store
			.rows("event_images")
			.iter()
			.filter_map(|row| row["image_url"].as_str().map(str::to_string))
			.collect()
	}

	#[tokio::test]
	async fn test_create_normalizes_date_and_defaults_status() {
		let store = MemoryStore::bookstore();

		let event = create_with_images(
			&store,
			dated("Reading circle", "2030-05-20T15:30"),
			&[],
			Uuid::new_v4(),
		)
		.await
		.unwrap();

		assert_eq!(event.date, "2030-05-20T15:30:00+09:00");
		assert_eq!(event.status, EventStatus::Upcoming);
	}

	#[tokio::test]
	async fn test_create_with_bad_date_writes_nothing() {
		let store = MemoryStore::bookstore();

		let result = create_with_images(
			&store,
			dated("Broken", "next tuesday"),
			&["https://img.example/a.jpg".to_string()],
			Uuid::new_v4(),
		)
		.await;

		assert!(matches!(result, Err(OpError::Validation { field: "data", .. })));
		assert!(store.rows("events").is_empty());
		assert!(store.rows("event_images").is_empty());
	}

	#[tokio::test]
	async fn test_create_inserts_gallery_rows() {
		let store = MemoryStore::bookstore();
		let urls = vec![
			"https://img.example/a.jpg".to_string(),
			"https://img.example/b.jpg".to_string(),
		];

		let event = create_with_images(
			&store,
			dated("Fair", "2030-05-20T15:30"),
			&urls,
			Uuid::new_v4(),
		)
		.await
		.unwrap();

		let rows = store.rows("event_images");
		assert_eq!(rows.len(), 2);
		assert!(rows.iter().all(|r| r["event_id"] == json!(event.id)));
	}

	#[tokio::test]
	async fn test_create_rolls_back_event_when_gallery_insert_fails() {
		let store = MemoryStore::bookstore();
		store.fail_inserts("event_images");

		let result = create_with_images(
			&store,
			dated("Fair", "2030-05-20T15:30"),
			&["https://img.example/a.jpg".to_string()],
			Uuid::new_v4(),
		)
		.await;

		assert!(result.is_err());
		assert!(store.rows("events").is_empty(), "event row must not survive");
	}

	#[tokio::test]
	async fn test_retry_with_same_op_id_clears_stale_gallery_rows() {
		let store = MemoryStore::bookstore();
		let op_id = Uuid::new_v4();
		store.seed(
			"event_images",
			vec![json!({
				"event_id": Uuid::new_v4(),
				"image_url": "https://img.example/stale.jpg",
				"op_id": op_id,
			})],
		);

		create_with_images(
			&store,
			dated("Fair", "2030-05-20T15:30"),
			&["https://img.example/fresh.jpg".to_string()],
			op_id,
		)
		.await
		.unwrap();

		assert_eq!(image_urls(&store), vec!["https://img.example/fresh.jpg"]);
	}

	#[tokio::test]
	async fn test_update_removes_matched_urls_and_adds_new_ones() {
		let store = MemoryStore::bookstore();
		let event = create_with_images(
			&store,
			dated("Fair", "2030-05-20T15:30"),
			&[
				"https://img.example/keep.jpg".to_string(),
				"https://img.example/drop.jpg".to_string(),
			],
			Uuid::new_v4(),
		)
		.await
		.unwrap();

		let updated = update(
			&store,
			event.id,
			EventData::default(),
			&["https://img.example/new.jpg".to_string()],
			&["https://img.example/drop.jpg".to_string()],
		)
		.await
		.unwrap();

		let mut urls = image_urls(&store);
		urls.sort();
		assert_eq!(
			urls,
			vec!["https://img.example/keep.jpg", "https://img.example/new.jpg"]
		);
		assert_eq!(updated.event_images.len(), 2, "re-fetch is hydrated");
	}

	#[tokio::test]
	async fn test_update_removal_is_scoped_to_the_event() {
		let store = MemoryStore::bookstore();
		let shared = "https://img.example/shared.jpg".to_string();
		let event = create_with_images(
			&store,
			dated("Fair", "2030-05-20T15:30"),
			&[shared.clone()],
			Uuid::new_v4(),
		)
		.await
		.unwrap();
		let other = create_with_images(
			&store,
			dated("Other", "2030-06-20T15:30"),
			&[shared.clone()],
			Uuid::new_v4(),
		)
		.await
		.unwrap();

		update(&store, event.id, EventData::default(), &[], &[shared])
			.await
			.unwrap();

		let rows = store.rows("event_images");
		assert_eq!(rows.len(), 1);
		assert_eq!(rows[0]["event_id"], json!(other.id));
	}

	#[tokio::test]
	async fn test_update_missing_event_is_not_found() {
		let store = MemoryStore::bookstore();
		let result = update(&store, Uuid::new_v4(), EventData::default(), &[], &[]).await;
		assert!(matches!(result, Err(OpError::NotFound("event"))));
	}

	#[tokio::test]
	async fn test_delete_cascades_gallery_rows() {
		let store = MemoryStore::bookstore();
		let event = create_with_images(
			&store,
			dated("Fair", "2030-05-20T15:30"),
			&["https://img.example/a.jpg".to_string()],
			Uuid::new_v4(),
		)
		.await
		.unwrap();

		let removed = delete(&store, event.id).await.unwrap();

		assert_eq!(removed.id, event.id);
		assert!(store.rows("events").is_empty());
		assert!(store.rows("event_images").is_empty());
	}

	#[tokio::test]
	async fn test_reclassify_promotes_only_overdue_upcoming_events() {
		let store = MemoryStore::bookstore();
		store.seed(
			"events",
			vec![
				json!({ "name": "Overdue", "data": "2020-01-01T10:00:00+09:00", "status": "upcoming",
					"price": 0.0, "location": "", "description": "" }),
				json!({ "name": "Future", "data": "2099-01-01T10:00:00+09:00", "status": "upcoming",
					"price": 0.0, "location": "", "description": "" }),
				json!({ "name": "Future but past", "data": "2099-01-01T10:00:00+09:00", "status": "past",
					"price": 0.0, "location": "", "description": "" }),
			],
		);

		reclassify(&store, Utc::now()).await.unwrap();

		let status_of = |name: &str| {
			store
				.rows("events")
				.iter()
				.find(|r| r["name"] == name)
				.map(|r| r["status"].as_str().unwrap().to_string())
				.unwrap()
		};
		assert_eq!(status_of("Overdue"), "past");
		assert_eq!(status_of("Future"), "upcoming");
		assert_eq!(status_of("Future but past"), "past", "never demoted");
	}

	#[tokio::test]
	async fn test_list_by_month_bounds() {
		let store = MemoryStore::bookstore();
		create_with_images(&store, dated("Last minute", "2030-05-31T23:59"), &[], Uuid::new_v4())
			.await
			.unwrap();
		create_with_images(&store, dated("First of next", "2030-06-01T00:00"), &[], Uuid::new_v4())
			.await
			.unwrap();

		let may = list_by_month(&store, 2030, 5).await.unwrap();
		let names: Vec<_> = may.iter().map(|e| e.name.as_str()).collect();
		assert_eq!(names, vec!["Last minute"]);
	}

	#[tokio::test]
	async fn test_list_by_month_december_wraps_the_year() {
		let store = MemoryStore::bookstore();
		create_with_images(&store, dated("NYE", "2030-12-31T23:00"), &[], Uuid::new_v4())
			.await
			.unwrap();

		let december = list_by_month(&store, 2030, 12).await.unwrap();
		assert_eq!(december.len(), 1);
		assert!(list_by_month(&store, 2031, 1).await.unwrap().is_empty());
	}

	#[tokio::test]
	async fn test_list_light_skips_the_gallery() {
		let store = MemoryStore::bookstore();
		create_with_images(
			&store,
			dated("Fair", "2030-05-20T15:30"),
			&["https://img.example/a.jpg".to_string()],
			Uuid::new_v4(),
		)
		.await
		.unwrap();

		let light = list_light(&store).await.unwrap();
		assert_eq!(light.len(), 1);
		assert_eq!(light[0].name, "Fair");
	}
}
