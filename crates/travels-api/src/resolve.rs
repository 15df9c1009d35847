//! Generic resolver: one record of a kind by identifier.
//!
//! Used for reads by id, for the existence check in front of an update, and
//! for every cross-entity lookup made by the derived endpoints.

use travels_core::{
  entity::{Entity, EntityKind, Id, Patch},
  store::TravelStore,
};

use crate::error::ApiError;

/// What to do with a record once it is found.
#[derive(Debug, Clone, Copy)]
pub enum Access<'a> {
  Read,
  /// Merge the patch into the found record and write it back.
  Update(&'a Patch),
}

/// Parse a path identifier. Anything that is not an integer matches no row.
pub fn parse_id(raw: &str) -> Option<Id> { raw.parse().ok() }

/// Fetch the record of `kind` with numeric identifier `id`, if any.
pub async fn lookup<S>(store: &S, kind: EntityKind, id: Id) -> Result<Option<Entity>, ApiError>
where
  S: TravelStore,
{
  store.get(kind, id).await.map_err(ApiError::store)
}

/// Resolve `raw_id` within `kind`, applying `access` to the found record.
///
/// A missing record is [`ApiError::NotFound`] in both modes; an update is
/// only attempted after the record has been found. Returns the record as it
/// is stored afterwards.
pub async fn resolve<S>(
  store:  &S,
  kind:   EntityKind,
  raw_id: &str,
  access: Access<'_>,
) -> Result<Entity, ApiError>
where
  S: TravelStore,
{
  let id = parse_id(raw_id).ok_or(ApiError::NotFound)?;
  let found = lookup(store, kind, id).await?.ok_or(ApiError::NotFound)?;

  match access {
    Access::Read => Ok(found),
    Access::Update(patch) => {
      let merged = found.merged(patch)?;
      store.update(merged.clone()).await.map_err(ApiError::store)?;
      Ok(merged)
    }
  }
}
