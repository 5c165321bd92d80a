//! Admin authentication: a single shared password, verified server-side,
//! exchanged for a signed expiry token the server hands out as an http-only
//! cookie. The token is `<expiry-unix>.<hex hmac>`; there is no session
//! state to store or revoke, expiry is the only lifecycle.

use chrono::{DateTime, Utc};
use hmac::{Hmac, Mac};
use sha2::Sha256;
use thiserror::Error;

use crate::Config;

type HmacSha256 = Hmac<Sha256>;

/// Sessions last a day.
pub const SESSION_TTL_SECS: i64 = 24 * 60 * 60;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AuthError {
	#[error("wrong password")]
	InvalidCredentials,
	#[error("admin password or session secret is not configured")]
	Misconfigured,
}

/// Checks the submitted password and issues a session token. An empty
/// configured password means the admin surface is closed, not open.
pub fn login(config: &Config, password: &str, now: DateTime<Utc>) -> Result<String, AuthError> {
	if config.admin_password.is_empty() || config.session_secret.is_empty() {
		return Err(AuthError::Misconfigured);
	}
	if password != config.admin_password {
		return Err(AuthError::InvalidCredentials);
	}
	Ok(issue(&config.session_secret, now))
}

fn issue(secret: &str, now: DateTime<Utc>) -> String {
	let expiry = now.timestamp() + SESSION_TTL_SECS;
	format!("{expiry}.{}", sign(secret, expiry))
}

/// Whether a presented token is authentic and unexpired.
pub fn verify(secret: &str, token: &str, now: DateTime<Utc>) -> bool {
	if secret.is_empty() {
		return false;
	}
	let Some((expiry_part, mac_part)) = token.split_once('.') else {
		return false;
	};
	let Ok(expiry) = expiry_part.parse::<i64>() else {
		return false;
	};
	if expiry <= now.timestamp() {
		return false;
	}
	let Ok(mac_bytes) = hex::decode(mac_part) else {
		return false;
	};

	let mut mac = HmacSha256::new_from_slice(secret.as_bytes()).expect("hmac accepts any key length");
	mac.update(expiry_part.as_bytes());
	mac.verify_slice(&mac_bytes).is_ok()
}

fn sign(secret: &str, expiry: i64) -> String {
	let mut mac = HmacSha256::new_from_slice(secret.as_bytes()).expect("hmac accepts any key length");
	mac.update(expiry.to_string().as_bytes());
	hex::encode(mac.finalize().into_bytes())
}
