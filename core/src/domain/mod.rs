//! Domain entities as they are persisted in the hosted datastore.
//!
//! Field names mirror the table columns (`owner_hobby`, `image_url`, the
//! event timestamp column `data`); serde renames bridge the gap where the
//! Rust name differs.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// A shop host profile. Reads come back hydrated with the owner's hobbies.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Owner {
	pub id: Uuid,
	pub name: Option<String>,
	pub location: Option<String>,
	pub age: Option<String>,
	pub job: Option<String>,
	pub bio: Option<String>,
	pub connection: Option<String>,
	pub image_url: Option<String>,
	pub instagram_url: Option<String>,
	pub x_url: Option<String>,
	pub youtube_url: Option<String>,
	pub created_at: String,
	#[serde(default)]
	pub updated_at: Option<String>,
	#[serde(default)]
	pub hobby: Vec<Hobby>,
}

/// A free-text tag belonging to exactly one owner. Replaced wholesale on
/// every owner edit, removed with the owner.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Hobby {
	pub id: Uuid,
	pub owner_id: Option<Uuid>,
	pub owner_hobby: Option<String>,
	pub created_at: String,
}

/// An inventory item, optionally linked to an owner. Price is a display
/// string, not a number.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Book {
	pub id: Uuid,
	pub owner_id: Option<Uuid>,
	pub isbn: Option<String>,
	pub title: Option<String>,
	pub author: Option<String>,
	pub thumbnail: Option<String>,
	pub price: Option<String>,
	pub description: Option<String>,
	pub created_at: String,
	#[serde(default)]
	pub updated_at: Option<String>,
	#[serde(default)]
	pub owner: Option<Box<Owner>>,
}

/// A calendar item with a gallery. The timestamp column is named `data` and
/// stores Japan wall-clock time with an explicit `+09:00` offset.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
	pub id: Uuid,
	pub created_at: String,
	pub name: String,
	#[serde(rename = "data")]
	pub date: String,
	pub price: f64,
	pub location: String,
	pub description: String,
	pub status: EventStatus,
	#[serde(default)]
	pub thumbnail_url: Option<String>,
	#[serde(default)]
	pub event_images: Vec<EventImage>,
}

/// Lightweight event projection for list pages (no gallery).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventLight {
	pub id: Uuid,
	pub name: String,
	#[serde(rename = "data")]
	pub date: String,
	pub price: f64,
	pub location: String,
	pub description: String,
	pub status: EventStatus,
}

/// A gallery image belonging to exactly one event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventImage {
	pub id: Uuid,
	pub event_id: Option<Uuid>,
	pub image_url: Option<String>,
	pub created_at: String,
}

/// Derived classification of an event against wall-clock time. The
/// automatic pass only ever promotes `Upcoming` to `Past`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventStatus {
	Upcoming,
	Past,
}

impl fmt::Display for EventStatus {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(match self {
			Self::Upcoming => "upcoming",
			Self::Past => "past",
		})
	}
}

/// Partial owner payload for inserts and updates. `None` fields are left
/// untouched by the datastore.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OwnerData {
	#[serde(skip_serializing_if = "Option::is_none")]
	pub name: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub location: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub age: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub job: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub bio: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub connection: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub image_url: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub instagram_url: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub x_url: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub youtube_url: Option<String>,
}

/// Partial book payload for inserts and updates.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BookData {
	#[serde(skip_serializing_if = "Option::is_none")]
	pub owner_id: Option<Uuid>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub isbn: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub title: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub author: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub thumbnail: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub price: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub description: Option<String>,
}

/// Partial event payload for inserts and updates. The `date` field accepts
/// a datetime-input string and is normalized to the stored `+09:00` form by
/// the workflow layer before it reaches the datastore.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EventData {
	#[serde(skip_serializing_if = "Option::is_none")]
	pub name: Option<String>,
	#[serde(rename = "data", skip_serializing_if = "Option::is_none")]
	pub date: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub price: Option<f64>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub location: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub description: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub status: Option<EventStatus>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub thumbnail_url: Option<String>,
}

/// What happens to dependent rows when their parent is deleted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CascadePolicy {
	/// Dependents are deleted with the parent (best-effort).
	CascadeDelete,
	/// Dependents survive with their foreign key cleared.
	Detach,
	/// Deletion is refused while dependents exist.
	Forbid,
}

/// A declared parent → dependents relationship and its cascade policy.
#[derive(Debug, Clone, Copy)]
pub struct Dependents {
	pub child_table: &'static str,
	pub fk_column: &'static str,
	pub policy: CascadePolicy,
}

/// Hobbies live and die with their owner.
pub const OWNER_HOBBIES: Dependents = Dependents {
	child_table: "hobby",
	fk_column: "owner_id",
	policy: CascadePolicy::CascadeDelete,
};

/// Books outlive their owner; the link is cleared on owner deletion.
pub const OWNER_BOOKS: Dependents = Dependents {
	child_table: "books",
	fk_column: "owner_id",
	policy: CascadePolicy::Detach,
};

/// Gallery images live and die with their event.
pub const EVENT_IMAGES: Dependents = Dependents {
	child_table: "event_images",
	fk_column: "event_id",
	policy: CascadePolicy::CascadeDelete,
};
