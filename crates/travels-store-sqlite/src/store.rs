//! [`SqliteStore`] — the SQLite implementation of [`TravelStore`].

use std::path::Path;

use rusqlite::{ErrorCode, OptionalExtension as _, params, params_from_iter};
use tracing::debug;

use travels_core::{
  entity::{Entity, EntityKind, Id, Visit},
  store::TravelStore,
};

use crate::{
  Error, Result,
  encode::{columns, decode_row, decode_visit, encode_row, insert_sql, update_sql},
  schema::{RESET, SCHEMA},
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A travels store backed by a single SQLite file.
///
/// Cloning is cheap — the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store — useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Visits whose `column` equals `value`.
  async fn visits_where(&self, column: &'static str, value: Id) -> Result<Vec<Visit>> {
    let sql = format!(
      "SELECT {} FROM visits WHERE {column} = ?1 ORDER BY id",
      columns(EntityKind::Visits)
    );

    let visits = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
          .query_map(params![value], decode_visit)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    Ok(visits)
  }
}

// ─── TravelStore impl ────────────────────────────────────────────────────────

impl TravelStore for SqliteStore {
  type Error = Error;

  async fn reset(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(RESET)?;
        Ok(())
      })
      .await?;
    debug!("store reset");
    Ok(())
  }

  async fn list(&self, kind: EntityKind) -> Result<Vec<Entity>> {
    let sql = format!("SELECT {} FROM {} ORDER BY id", columns(kind), kind.table());

    let rows = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
          .query_map([], |row| decode_row(kind, row))?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    Ok(rows)
  }

  async fn get(&self, kind: EntityKind, id: Id) -> Result<Option<Entity>> {
    let sql = format!("SELECT {} FROM {} WHERE id = ?1", columns(kind), kind.table());

    let row = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(&sql, params![id], |row| decode_row(kind, row))
            .optional()?,
        )
      })
      .await?;

    Ok(row)
  }

  async fn insert(&self, entity: Entity) -> Result<Entity> {
    let kind = entity.kind();
    let requested = entity.id();
    let values = encode_row(&entity);

    let inserted = self
      .conn
      .call(move |conn| {
        conn.execute(insert_sql(kind), params_from_iter(values))?;
        Ok(conn.last_insert_rowid())
      })
      .await;

    match inserted {
      Ok(id) => {
        debug!(%kind, id, "inserted");
        Ok(entity.with_id(id))
      }
      Err(tokio_rusqlite::Error::Rusqlite(rusqlite::Error::SqliteFailure(e, _)))
        if e.code == ErrorCode::ConstraintViolation =>
      {
        Err(Error::Conflict { kind, id: requested })
      }
      Err(e) => Err(e.into()),
    }
  }

  async fn update(&self, entity: Entity) -> Result<()> {
    let kind = entity.kind();
    if matches!(entity.id(), None | Some(0)) {
      return Err(Error::MissingId(kind));
    }
    let values = encode_row(&entity);

    self
      .conn
      .call(move |conn| {
        conn.execute(update_sql(kind), params_from_iter(values))?;
        Ok(())
      })
      .await?;

    Ok(())
  }

  async fn delete(&self, kind: EntityKind, id: Id) -> Result<()> {
    let sql = format!("DELETE FROM {} WHERE id = ?1", kind.table());

    self
      .conn
      .call(move |conn| {
        conn.execute(&sql, params![id])?;
        Ok(())
      })
      .await?;

    Ok(())
  }

  async fn visits_by_user(&self, user: Id) -> Result<Vec<Visit>> {
    self.visits_where(r#""user""#, user).await
  }

  async fn visits_by_location(&self, location: Id) -> Result<Vec<Visit>> {
    self.visits_where("location", location).await
  }
}
