//! Handler for `GET /locations/{id}/avg`.
//!
//! Query params: `fromDate`, `toDate`, `fromAge`, `toAge`, `gender`. None of
//! them can cause a 400; unusable age bounds are simply ignored.

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, Query, State},
};
use chrono::Utc;
use serde::Serialize;
use tracing::debug;
use travels_core::{
  aggregate::MarkAverage,
  entity::{Entity, EntityKind},
  filter::AvgFilter,
  store::TravelStore,
};

use crate::{
  error::ApiError,
  resolve::{Access, lookup, resolve},
};

/// Response body: `{"avg": 4.0}`.
#[derive(Debug, Serialize)]
pub struct AvgMark {
  pub avg: f64,
}

/// `GET /locations/{id}/avg[?fromDate=...][&toDate=...][&fromAge=...][&toAge=...][&gender=...]`
pub async fn handler<S>(
  State(store): State<Arc<S>>,
  Path((entity, id)): Path<(String, String)>,
  Query(params): Query<Vec<(String, String)>>,
) -> Result<Json<AvgMark>, ApiError>
where
  S: TravelStore,
{
  if EntityKind::resolve(&entity) != Some(EntityKind::Locations) {
    return Err(ApiError::NotFound);
  }

  let filter = AvgFilter::from_query(&params);

  let location = resolve(store.as_ref(), EntityKind::Locations, &id, Access::Read)
    .await
    .map_err(|e| match e {
      ApiError::NotFound => ApiError::LocationNotFound,
      other => other,
    })?;
  let location_id = location.id().ok_or(ApiError::LocationNotFound)?;

  let visits = store
    .visits_by_location(location_id)
    .await
    .map_err(ApiError::store)?;

  let now = Utc::now();
  let mut avg = MarkAverage::default();
  for visit in visits {
    let user = lookup(store.as_ref(), EntityKind::Users, visit.user)
      .await?
      .and_then(Entity::into_user);
    let Some(user) = user else {
      debug!(visit = ?visit.id, user = visit.user, "skipping visit with missing user");
      continue;
    };
    if filter.matches(&visit, &user, now) {
      avg.push(visit.mark);
    }
  }

  Ok(Json(AvgMark { avg: avg.value() }))
}
