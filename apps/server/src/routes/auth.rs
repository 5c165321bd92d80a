//! Admin login and the extractor guarding every admin route.
//!
//! The session token never appears in a response body; it travels only in an
//! http-only cookie, so admin client code has nothing to store or leak.

use axum::{
	async_trait,
	extract::{FromRequestParts, State},
	http::{header, request::Parts, HeaderMap, HeaderValue, StatusCode},
	Json,
};
use chrono::Utc;
use serde::Deserialize;
use serde_json::json;

use tomo_core::auth;

use crate::{error::ApiError, AppState};

const COOKIE_NAME: &str = "admin_auth";

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
	password: String,
}

pub async fn login(
	State(state): State<AppState>,
	Json(body): Json<LoginRequest>,
) -> Result<(StatusCode, HeaderMap, Json<serde_json::Value>), ApiError> {
	let token = auth::login(&state.config, &body.password, Utc::now())?;

	let cookie = format!(
		"{COOKIE_NAME}={token}; Max-Age={}; Path=/; HttpOnly; Secure; SameSite=Lax",
		auth::SESSION_TTL_SECS
	);
	let mut headers = HeaderMap::new();
	headers.insert(
		header::SET_COOKIE,
		HeaderValue::from_str(&cookie).map_err(|_| ApiError::Unauthorized)?,
	);

	Ok((StatusCode::OK, headers, Json(json!({ "ok": true }))))
}

/// Proof of a valid admin session. Admin handlers take this as an argument;
/// extraction fails with 401 when the cookie is missing, forged or expired.
pub struct AdminSession;

#[async_trait]
impl FromRequestParts<AppState> for AdminSession {
	type Rejection = ApiError;

	async fn from_request_parts(
		parts: &mut Parts,
		state: &AppState,
	) -> Result<Self, Self::Rejection> {
		let token = parts
			.headers
			.get(header::COOKIE)
			.and_then(|value| value.to_str().ok())
			.and_then(|cookies| cookie_value(cookies, COOKIE_NAME))
			.ok_or(ApiError::Unauthorized)?;

		if auth::verify(&state.config.session_secret, token, Utc::now()) {
			Ok(Self)
		} else {
			Err(ApiError::Unauthorized)
		}
	}
}

fn cookie_value<'a>(header: &'a str, name: &str) -> Option<&'a str> {
	header.split(';').find_map(|pair| {
		let (key, value) = pair.trim().split_once('=')?;
		(key == name).then_some(value)
	})
}
