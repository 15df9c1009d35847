//! The `TravelStore` trait.
//!
//! The trait is implemented by storage backends (e.g. `travels-store-sqlite`).
//! The HTTP layer (`travels-api`) depends on this abstraction, not on any
//! concrete backend.

use std::future::Future;

use crate::entity::{Entity, EntityKind, Id, Visit};

/// What callers may learn about a backend failure without knowing the backend.
pub trait StoreError: std::error::Error + Send + Sync + 'static {
  /// The write collided with an existing row, e.g. a duplicate explicit id.
  fn is_conflict(&self) -> bool { false }
}

/// Abstraction over a tabular store holding users, locations and visits.
///
/// Every kind supports the same primitives; dispatch happens on
/// [`EntityKind`] / [`Entity`] rather than through per-kind methods. The two
/// visit lookups exist for the derived endpoints.
///
/// All methods return `Send` futures so the trait can be used in multi-threaded
/// async runtimes (e.g. tokio with `axum`).
pub trait TravelStore: Send + Sync {
  type Error: StoreError;

  /// Remove every row of every kind.
  fn reset(&self) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// All records of `kind`, ordered by id.
  fn list(
    &self,
    kind: EntityKind,
  ) -> impl Future<Output = Result<Vec<Entity>, Self::Error>> + Send + '_;

  /// The record of `kind` with identifier `id`. Returns `None` if not found.
  fn get(
    &self,
    kind: EntityKind,
    id: Id,
  ) -> impl Future<Output = Result<Option<Entity>, Self::Error>> + Send + '_;

  /// Persist a new record and return it with its identifier set.
  ///
  /// An identifier already present on `entity` is kept; otherwise the store
  /// assigns the next one.
  fn insert(
    &self,
    entity: Entity,
  ) -> impl Future<Output = Result<Entity, Self::Error>> + Send + '_;

  /// Overwrite the stored fields of `entity`, located by its identifier.
  fn update(
    &self,
    entity: Entity,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// Delete the record of `kind` with identifier `id`. Deleting a missing
  /// record is not an error.
  fn delete(
    &self,
    kind: EntityKind,
    id: Id,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// Visits whose `user` field equals `user`, ordered by id.
  fn visits_by_user(
    &self,
    user: Id,
  ) -> impl Future<Output = Result<Vec<Visit>, Self::Error>> + Send + '_;

  /// Visits whose `location` field equals `location`, ordered by id.
  fn visits_by_location(
    &self,
    location: Id,
  ) -> impl Future<Output = Result<Vec<Visit>, Self::Error>> + Send + '_;
}
