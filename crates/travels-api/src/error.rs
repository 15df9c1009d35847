//! API error type and [`axum::response::IntoResponse`] implementation.
//!
//! Every error renders as `{"Error": "<message>"}`. The messages are part of
//! the public contract and are matched verbatim by clients.

use axum::{
  Json,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;
use travels_core::store::StoreError;

/// An error returned by an API handler.
#[derive(Debug, Error)]
pub enum ApiError {
  /// Unknown collection name on a read by id.
  #[error("entity type doesn't exist")]
  UnknownEntityType,

  /// Unknown collection name elsewhere. Creation and listing answer with
  /// `200 OK`; update and delete with `404`.
  #[error("entity doesn't exist")]
  UnknownEntity(StatusCode),

  #[error("entity not found")]
  NotFound,

  #[error("location not found")]
  LocationNotFound,

  #[error("bad request body: {0}")]
  BadBody(String),

  #[error("bad query string: {0}")]
  BadQuery(String),

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl ApiError {
  /// Wrap a backend failure; write conflicts count as a bad body.
  pub fn store<E: StoreError>(e: E) -> Self {
    if e.is_conflict() {
      ApiError::BadBody(e.to_string())
    } else {
      ApiError::Store(Box::new(e))
    }
  }

  pub fn status(&self) -> StatusCode {
    match self {
      ApiError::UnknownEntityType | ApiError::NotFound | ApiError::LocationNotFound => {
        StatusCode::NOT_FOUND
      }
      ApiError::UnknownEntity(status) => *status,
      ApiError::BadBody(_) | ApiError::BadQuery(_) => StatusCode::BAD_REQUEST,
      ApiError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
  }

  fn message(&self) -> String {
    match self {
      ApiError::UnknownEntityType => "Entity type doesn't exist".to_owned(),
      ApiError::UnknownEntity(_) => "Entity doesn't exist".to_owned(),
      ApiError::NotFound => "Entity not found".to_owned(),
      ApiError::LocationNotFound => "Location not found".to_owned(),
      ApiError::BadBody(_) => "Bad request body parameters".to_owned(),
      ApiError::BadQuery(_) => "Bad query string parameters".to_owned(),
      ApiError::Store(e) => e.to_string(),
    }
  }
}

impl From<travels_core::Error> for ApiError {
  fn from(e: travels_core::Error) -> Self {
    match e {
      travels_core::Error::BadQueryParam { .. } => ApiError::BadQuery(e.to_string()),
      other => ApiError::BadBody(other.to_string()),
    }
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let status = self.status();
    match &self {
      ApiError::Store(_) => tracing::error!(error = %self, "request failed"),
      _ => tracing::debug!(error = %self, %status, "request rejected"),
    }
    (status, Json(json!({ "Error": self.message() }))).into_response()
  }
}
