//! Encoding and decoding helpers between the travel records and their SQLite
//! rows.
//!
//! Every kind uses the same parameter layout: `?1` is the identifier and the
//! remaining parameters follow the column order of [`columns`]. The insert and
//! update statements share that layout, so one encoded row serves both.

use rusqlite::{Row, types::Value};
use travels_core::entity::{Entity, EntityKind, Location, User, Visit};

// ─── SQL ──────────────────────────────────────────────────────────────────────

/// Column list in parameter order, identifier first.
pub fn columns(kind: EntityKind) -> &'static str {
  match kind {
    EntityKind::Users => "id, email, first_name, last_name, gender, birth_date",
    EntityKind::Locations => "id, place, country, city, distance",
    EntityKind::Visits => r#"id, location, "user", visited_at, mark"#,
  }
}

pub fn insert_sql(kind: EntityKind) -> &'static str {
  match kind {
    EntityKind::Users => {
      "INSERT INTO users (id, email, first_name, last_name, gender, birth_date)
       VALUES (?1, ?2, ?3, ?4, ?5, ?6)"
    }
    EntityKind::Locations => {
      "INSERT INTO locations (id, place, country, city, distance)
       VALUES (?1, ?2, ?3, ?4, ?5)"
    }
    EntityKind::Visits => {
      r#"INSERT INTO visits (id, location, "user", visited_at, mark)
         VALUES (?1, ?2, ?3, ?4, ?5)"#
    }
  }
}

pub fn update_sql(kind: EntityKind) -> &'static str {
  match kind {
    EntityKind::Users => {
      "UPDATE users
       SET email = ?2, first_name = ?3, last_name = ?4, gender = ?5, birth_date = ?6
       WHERE id = ?1"
    }
    EntityKind::Locations => {
      "UPDATE locations
       SET place = ?2, country = ?3, city = ?4, distance = ?5
       WHERE id = ?1"
    }
    EntityKind::Visits => {
      r#"UPDATE visits
         SET location = ?2, "user" = ?3, visited_at = ?4, mark = ?5
         WHERE id = ?1"#
    }
  }
}

// ─── Encode ───────────────────────────────────────────────────────────────────

fn text(s: &str) -> Value { Value::Text(s.to_owned()) }

/// Encode `entity` as positional parameters, identifier first. A missing or
/// zero identifier is bound as `NULL` so SQLite assigns one on insert.
pub fn encode_row(entity: &Entity) -> Vec<Value> {
  let id = entity
    .id()
    .filter(|&id| id != 0)
    .map_or(Value::Null, Value::Integer);
  match entity {
    Entity::User(u) => vec![
      id,
      text(&u.email),
      text(&u.first_name),
      text(&u.last_name),
      text(&u.gender),
      Value::Integer(u.birth_date),
    ],
    Entity::Location(l) => vec![
      id,
      text(&l.place),
      text(&l.country),
      text(&l.city),
      Value::Integer(l.distance),
    ],
    Entity::Visit(v) => vec![
      id,
      Value::Integer(v.location),
      Value::Integer(v.user),
      text(&v.visited_at),
      Value::Integer(v.mark),
    ],
  }
}

// ─── Decode ───────────────────────────────────────────────────────────────────

pub fn decode_user(row: &Row<'_>) -> rusqlite::Result<User> {
  Ok(User {
    id:         row.get(0)?,
    email:      row.get(1)?,
    first_name: row.get(2)?,
    last_name:  row.get(3)?,
    gender:     row.get(4)?,
    birth_date: row.get(5)?,
  })
}

pub fn decode_location(row: &Row<'_>) -> rusqlite::Result<Location> {
  Ok(Location {
    id:       row.get(0)?,
    place:    row.get(1)?,
    country:  row.get(2)?,
    city:     row.get(3)?,
    distance: row.get(4)?,
  })
}

pub fn decode_visit(row: &Row<'_>) -> rusqlite::Result<Visit> {
  Ok(Visit {
    id:         row.get(0)?,
    location:   row.get(1)?,
    user:       row.get(2)?,
    visited_at: row.get(3)?,
    mark:       row.get(4)?,
  })
}

/// Decode a row selected with [`columns`] for `kind`.
pub fn decode_row(kind: EntityKind, row: &Row<'_>) -> rusqlite::Result<Entity> {
  Ok(match kind {
    EntityKind::Users => decode_user(row)?.into(),
    EntityKind::Locations => decode_location(row)?.into(),
    EntityKind::Visits => decode_visit(row)?.into(),
  })
}
