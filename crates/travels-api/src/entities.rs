//! Handlers for the per-kind CRUD endpoints.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/{entity}` | All records of the kind |
//! | `POST`   | `/{entity}/new` | Body: full record; required fields must be non-zero |
//! | `GET`    | `/{entity}/{id}` | 404 if not found |
//! | `POST`   | `/{entity}/{id}` | Body: partial record; no `null` values |
//! | `DELETE` | `/{entity}/{id}` | Always succeeds for a known kind |

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
};
use bytes::Bytes;
use serde_json::{Value, json};
use travels_core::{
  entity::{Entity, EntityKind, parse_patch},
  store::TravelStore,
};

use crate::{
  error::ApiError,
  resolve::{Access, parse_id, resolve},
};

// ─── List ─────────────────────────────────────────────────────────────────────

/// `GET /{entity}`
pub async fn list<S>(
  State(store): State<Arc<S>>,
  Path(entity): Path<String>,
) -> Result<Json<Vec<Entity>>, ApiError>
where
  S: TravelStore,
{
  let kind = EntityKind::resolve(&entity).ok_or(ApiError::UnknownEntity(StatusCode::OK))?;
  let all = store.list(kind).await.map_err(ApiError::store)?;
  Ok(Json(all))
}

// ─── Create ───────────────────────────────────────────────────────────────────

/// `POST /{entity}/new` — returns the stored record with its identifier.
pub async fn create<S>(
  State(store): State<Arc<S>>,
  Path(entity): Path<String>,
  body: Bytes,
) -> Result<Json<Entity>, ApiError>
where
  S: TravelStore,
{
  let kind = EntityKind::resolve(&entity).ok_or(ApiError::UnknownEntity(StatusCode::OK))?;
  let record = kind.decode(&body)?;
  record.validate()?;
  let stored = store.insert(record).await.map_err(ApiError::store)?;
  Ok(Json(stored))
}

// ─── Get one ──────────────────────────────────────────────────────────────────

/// `GET /{entity}/{id}`
pub async fn get_one<S>(
  State(store): State<Arc<S>>,
  Path((entity, id)): Path<(String, String)>,
) -> Result<Json<Entity>, ApiError>
where
  S: TravelStore,
{
  let kind = EntityKind::resolve(&entity).ok_or(ApiError::UnknownEntityType)?;
  let found = resolve(store.as_ref(), kind, &id, Access::Read).await?;
  Ok(Json(found))
}

// ─── Update ───────────────────────────────────────────────────────────────────

/// `POST /{entity}/{id}` — returns `{}` on success.
pub async fn update_one<S>(
  State(store): State<Arc<S>>,
  Path((entity, id)): Path<(String, String)>,
  body: Bytes,
) -> Result<Json<Value>, ApiError>
where
  S: TravelStore,
{
  let kind =
    EntityKind::resolve(&entity).ok_or(ApiError::UnknownEntity(StatusCode::NOT_FOUND))?;
  let patch = parse_patch(&body)?;
  resolve(store.as_ref(), kind, &id, Access::Update(&patch)).await?;
  Ok(Json(json!({})))
}

// ─── Delete ───────────────────────────────────────────────────────────────────

/// `DELETE /{entity}/{id}` — no existence check.
pub async fn delete_one<S>(
  State(store): State<Arc<S>>,
  Path((entity, id)): Path<(String, String)>,
) -> Result<Json<Value>, ApiError>
where
  S: TravelStore,
{
  let kind =
    EntityKind::resolve(&entity).ok_or(ApiError::UnknownEntity(StatusCode::NOT_FOUND))?;
  if let Some(id) = parse_id(&id) {
    store.delete(kind, id).await.map_err(ApiError::store)?;
  }
  Ok(Json(json!({ "Success": true })))
}
