//! Maps core errors onto HTTP responses. Every error body is the same
//! one-field JSON object so clients have a single shape to handle.

use axum::{
	http::StatusCode,
	response::{IntoResponse, Response},
	Json,
};
use serde_json::json;

use tomo_core::{auth::AuthError, catalog::CatalogError, ops::OpError, upload::UploadError};

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
	#[error(transparent)]
	Op(#[from] OpError),
	#[error(transparent)]
	Catalog(#[from] CatalogError),
	#[error(transparent)]
	Upload(#[from] UploadError),
	#[error(transparent)]
	Auth(#[from] AuthError),
	#[error("admin session required")]
	Unauthorized,
	#[error("{0}")]
	BadRequest(String),
	#[error("malformed multipart request: {0}")]
	Multipart(#[from] axum::extract::multipart::MultipartError),
}

impl ApiError {
	fn status(&self) -> StatusCode {
		match self {
			Self::Op(OpError::NotFound(_)) => StatusCode::NOT_FOUND,
			Self::Op(OpError::Validation { .. }) => StatusCode::BAD_REQUEST,
			Self::Op(OpError::DeleteForbidden(_)) => StatusCode::CONFLICT,
			Self::Op(_) => StatusCode::INTERNAL_SERVER_ERROR,
			Self::Catalog(CatalogError::MissingIsbn) => StatusCode::BAD_REQUEST,
			Self::Catalog(CatalogError::NotFound) => StatusCode::NOT_FOUND,
			Self::Catalog(_) => StatusCode::BAD_GATEWAY,
			Self::Upload(UploadError::Storage(_)) => StatusCode::BAD_GATEWAY,
			Self::Upload(_) => StatusCode::BAD_REQUEST,
			Self::Auth(AuthError::InvalidCredentials) => StatusCode::UNAUTHORIZED,
			Self::Auth(AuthError::Misconfigured) => StatusCode::SERVICE_UNAVAILABLE,
			Self::Unauthorized => StatusCode::UNAUTHORIZED,
			Self::BadRequest(_) | Self::Multipart(_) => StatusCode::BAD_REQUEST,
		}
	}
}

impl IntoResponse for ApiError {
	fn into_response(self) -> Response {
		let status = self.status();
		if status.is_server_error() {
			tracing::error!(%status, error = %self, "request failed");
		}
		(status, Json(json!({ "error": self.to_string() }))).into_response()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use pretty_assertions::assert_eq;

	#[test]
	fn test_status_mapping() {
		assert_eq!(
			ApiError::Op(OpError::NotFound("owner")).status(),
			StatusCode::NOT_FOUND
		);
		assert_eq!(
			ApiError::Op(OpError::Validation {
				field: "data",
				message: "bad".to_string()
			})
			.status(),
			StatusCode::BAD_REQUEST
		);
		assert_eq!(
			ApiError::Catalog(CatalogError::NotFound).status(),
			StatusCode::NOT_FOUND
		);
		assert_eq!(ApiError::Unauthorized.status(), StatusCode::UNAUTHORIZED);
		assert_eq!(
			ApiError::Upload(UploadError::AllFailed).status(),
			StatusCode::BAD_REQUEST
		);
	}
}
