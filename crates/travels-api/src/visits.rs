//! Handler for `GET /users/{id}/visits`.
//!
//! Query params: `fromDate`, `toDate`, `toDistance` (integers when present)
//! and `country`. Each visit is judged together with its location; visits
//! whose location no longer exists are left out.

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, Query, State},
};
use tracing::debug;
use travels_core::{
  entity::{Entity, EntityKind, Visit},
  filter::VisitsFilter,
  store::TravelStore,
};

use crate::{
  error::ApiError,
  resolve::{Access, lookup, resolve},
};

/// `GET /users/{id}/visits[?fromDate=...][&toDate=...][&country=...][&toDistance=...]`
pub async fn handler<S>(
  State(store): State<Arc<S>>,
  Path((entity, id)): Path<(String, String)>,
  Query(params): Query<Vec<(String, String)>>,
) -> Result<Json<Vec<Visit>>, ApiError>
where
  S: TravelStore,
{
  if EntityKind::resolve(&entity) != Some(EntityKind::Users) {
    return Err(ApiError::NotFound);
  }

  // Validated before touching the store.
  let filter = VisitsFilter::from_query(&params)?;

  let user = resolve(store.as_ref(), EntityKind::Users, &id, Access::Read).await?;
  let user_id = user.id().ok_or(ApiError::NotFound)?;

  let visits = store
    .visits_by_user(user_id)
    .await
    .map_err(ApiError::store)?;

  let mut kept = Vec::with_capacity(visits.len());
  for visit in visits {
    let location = lookup(store.as_ref(), EntityKind::Locations, visit.location)
      .await?
      .and_then(Entity::into_location);
    let Some(location) = location else {
      debug!(visit = ?visit.id, location = visit.location, "skipping visit with missing location");
      continue;
    };
    if filter.matches(&visit, &location) {
      kept.push(visit);
    }
  }

  Ok(Json(kept))
}
