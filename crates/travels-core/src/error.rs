//! Error types for `travels-core`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("malformed body: {0}")]
  Json(#[from] serde_json::Error),

  #[error("required field {0:?} is missing or zero")]
  MissingField(&'static str),

  #[error("field {0:?} is null")]
  NullField(String),

  #[error("query parameter {name} is not an integer: {value:?}")]
  BadQueryParam {
    name:  &'static str,
    value: String,
  },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
