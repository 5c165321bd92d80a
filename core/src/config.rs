//! Environment-driven configuration.
//!
//! Every value defaults to an empty string when unset; the gap is logged
//! rather than fatal so read-only deployments can come up partially
//! configured.

use std::env;
use tracing::warn;

/// Runtime configuration for the datastore, bucket, catalog and admin auth.
#[derive(Debug, Clone)]
pub struct Config {
	/// Base URL of the hosted datastore (REST + storage endpoints hang off it).
	pub datastore_url: String,

	/// API key sent with every datastore and bucket request.
	pub datastore_key: String,

	/// Object storage bucket holding optimized images.
	pub storage_bucket: String,

	/// API key for the external ISBN catalog.
	pub catalog_api_key: String,

	/// Public base URL of this application.
	pub app_url: String,

	/// Shared secret gating the admin surface.
	pub admin_password: String,

	/// Key used to sign admin session tokens.
	pub session_secret: String,

	/// Port the HTTP server binds to.
	pub port: u16,
}

impl Config {
	pub fn from_env() -> Self {
		Self {
			datastore_url: var("DATASTORE_URL"),
			datastore_key: var("DATASTORE_KEY"),
			storage_bucket: var_or("STORAGE_BUCKET", "tomodachi-bookstore"),
			catalog_api_key: var("CATALOG_API_KEY"),
			app_url: var_or("APP_URL", "http://localhost:8080"),
			admin_password: var("ADMIN_PASSWORD"),
			session_secret: var("SESSION_SECRET"),
			port: env::var("PORT")
				.ok()
				.and_then(|port| port.parse().ok())
				.unwrap_or(8080),
		}
	}
}

fn var(name: &str) -> String {
	match env::var(name) {
		Ok(value) => value,
		Err(_) => {
			warn!("{name} is not set, defaulting to an empty string");
			String::new()
		}
	}
}

fn var_or(name: &str, default: &str) -> String {
	env::var(name).unwrap_or_else(|_| default.to_string())
}
