//! Error type for `travels-store-sqlite`.

use thiserror::Error;
use travels_core::{
  entity::{EntityKind, Id},
  store::StoreError,
};

#[derive(Debug, Error)]
pub enum Error {
  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  /// An insert collided with an existing row (e.g. a duplicate explicit id).
  #[error("{kind} {id:?} conflicts with an existing row")]
  Conflict {
    kind: EntityKind,
    id:   Option<Id>,
  },

  /// An update was issued for a record that carries no identifier.
  #[error("cannot update {0} without an id")]
  MissingId(EntityKind),
}

impl StoreError for Error {
  fn is_conflict(&self) -> bool { matches!(self, Error::Conflict { .. }) }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
