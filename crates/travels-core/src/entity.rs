//! Entity registry — the three record kinds and closed dispatch over them.
//!
//! Requests name their target by a lowercase collection name (`users`,
//! `locations`, `visits`). [`EntityKind::resolve`] turns that name into a
//! kind once; every later step matches on [`EntityKind`] or [`Entity`]
//! instead of branching on strings.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use strum::{AsRefStr, Display, EnumIter, EnumString};

use crate::{Error, Result};

/// Store-assigned numeric identifier, unique within a kind.
pub type Id = i64;

/// A partial update body: field name to replacement value.
pub type Patch = Map<String, Value>;

const BOM: &[u8] = b"\xef\xbb\xbf";

// ─── Kind ─────────────────────────────────────────────────────────────────────

/// The kind of record a collection name refers to.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Hash, Display, AsRefStr, EnumString, EnumIter,
)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum EntityKind {
  Users,
  Locations,
  Visits,
}

impl EntityKind {
  /// Look up a kind by collection name, ignoring ASCII case.
  pub fn resolve(name: &str) -> Option<Self> { name.parse().ok() }

  /// Name of the backing table.
  pub fn table(self) -> &'static str {
    match self {
      EntityKind::Users => "users",
      EntityKind::Locations => "locations",
      EntityKind::Visits => "visits",
    }
  }

  /// Decode a creation body into a record of this kind.
  ///
  /// A leading byte-order mark is ignored. Absent fields take their zero
  /// value; an explicit `null` is rejected, `id` included.
  pub fn decode(self, body: &[u8]) -> Result<Entity> {
    let fields = parse_patch(body)?;
    self.from_value(Value::Object(fields))
  }

  fn from_value(self, value: Value) -> Result<Entity> {
    Ok(match self {
      EntityKind::Users => Entity::User(serde_json::from_value(value)?),
      EntityKind::Locations => Entity::Location(serde_json::from_value(value)?),
      EntityKind::Visits => Entity::Visit(serde_json::from_value(value)?),
    })
  }
}

/// Drop a UTF-8 byte-order mark from the front of `body`, if present.
pub fn strip_bom(body: &[u8]) -> &[u8] { body.strip_prefix(BOM).unwrap_or(body) }

/// Parse an update body as a string-keyed map.
///
/// Rejects anything that is not a JSON object, and any key whose value is
/// `null`.
pub fn parse_patch(body: &[u8]) -> Result<Patch> {
  let patch: Patch = serde_json::from_slice(strip_bom(body))?;
  if let Some((key, _)) = patch.iter().find(|(_, v)| v.is_null()) {
    return Err(Error::NullField(key.clone()));
  }
  Ok(patch)
}

// ─── Records ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct User {
  #[serde(skip_serializing_if = "Option::is_none")]
  pub id:         Option<Id>,
  pub email:      String,
  pub first_name: String,
  pub last_name:  String,
  /// Single-character code, e.g. `"m"` or `"f"`.
  pub gender:     String,
  /// Seconds since the Unix epoch.
  pub birth_date: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Location {
  #[serde(skip_serializing_if = "Option::is_none")]
  pub id:       Option<Id>,
  pub place:    String,
  pub country:  String,
  pub city:     String,
  pub distance: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Visit {
  #[serde(skip_serializing_if = "Option::is_none")]
  pub id:         Option<Id>,
  pub location:   Id,
  pub user:       Id,
  /// Kept as text and compared byte-wise by the visit filters.
  pub visited_at: String,
  pub mark:       i64,
}

fn require(field: &'static str, present: bool) -> Result<()> {
  if present { Ok(()) } else { Err(Error::MissingField(field)) }
}

impl User {
  fn validate(&self) -> Result<()> {
    require("email", !self.email.is_empty())?;
    require("first_name", !self.first_name.is_empty())?;
    require("last_name", !self.last_name.is_empty())?;
    require("gender", !self.gender.is_empty())?;
    require("birth_date", self.birth_date != 0)
  }
}

impl Visit {
  fn validate(&self) -> Result<()> {
    require("location", self.location != 0)?;
    require("user", self.user != 0)?;
    require("visited_at", !self.visited_at.is_empty())?;
    require("mark", self.mark != 0)
  }
}

// ─── Tagged union ─────────────────────────────────────────────────────────────

/// A record of any kind. Serialises as the bare inner record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Entity {
  User(User),
  Location(Location),
  Visit(Visit),
}

impl Entity {
  pub fn kind(&self) -> EntityKind {
    match self {
      Entity::User(_) => EntityKind::Users,
      Entity::Location(_) => EntityKind::Locations,
      Entity::Visit(_) => EntityKind::Visits,
    }
  }

  pub fn id(&self) -> Option<Id> {
    match self {
      Entity::User(u) => u.id,
      Entity::Location(l) => l.id,
      Entity::Visit(v) => v.id,
    }
  }

  pub fn with_id(mut self, id: Id) -> Self {
    match &mut self {
      Entity::User(u) => u.id = Some(id),
      Entity::Location(l) => l.id = Some(id),
      Entity::Visit(v) => v.id = Some(id),
    }
    self
  }

  /// Check the fields that must be present and non-zero on creation.
  pub fn validate(&self) -> Result<()> {
    match self {
      Entity::User(u) => u.validate(),
      Entity::Location(_) => Ok(()),
      Entity::Visit(v) => v.validate(),
    }
  }

  /// Apply `patch` field by field and return the merged record.
  ///
  /// Keys naming a field of this kind replace that field. `id` and unknown
  /// keys are ignored. A value of the wrong JSON type is an error.
  pub fn merged(&self, patch: &Patch) -> Result<Entity> {
    let mut value = serde_json::to_value(self)?;
    if let Value::Object(fields) = &mut value {
      for (key, new) in patch {
        if key == "id" {
          continue;
        }
        if let Some(slot) = fields.get_mut(key) {
          *slot = new.clone();
        }
      }
    }
    self.kind().from_value(value)
  }

  pub fn into_user(self) -> Option<User> {
    match self {
      Entity::User(u) => Some(u),
      _ => None,
    }
  }

  pub fn into_location(self) -> Option<Location> {
    match self {
      Entity::Location(l) => Some(l),
      _ => None,
    }
  }
}

impl From<User> for Entity {
  fn from(u: User) -> Self { Entity::User(u) }
}

impl From<Location> for Entity {
  fn from(l: Location) -> Self { Entity::Location(l) }
}

impl From<Visit> for Entity {
  fn from(v: Visit) -> Self { Entity::Visit(v) }
}

#[cfg(test)]
mod tests {
  use serde_json::json;
  use strum::IntoEnumIterator;

  use super::*;

  fn john() -> User {
    User {
      id:         Some(1),
      email:      "johsmith@mail.com".into(),
      first_name: "John".into(),
      last_name:  "Smith".into(),
      gender:     "m".into(),
      birth_date: 1_290_129_012,
    }
  }

  #[test]
  fn resolve_is_case_insensitive() {
    assert_eq!(EntityKind::resolve("users"), Some(EntityKind::Users));
    assert_eq!(EntityKind::resolve("Locations"), Some(EntityKind::Locations));
    assert_eq!(EntityKind::resolve("VISITS"), Some(EntityKind::Visits));
    assert_eq!(EntityKind::resolve("badentity"), None);
    assert_eq!(EntityKind::resolve(""), None);
  }

  #[test]
  fn table_matches_collection_name() {
    for kind in EntityKind::iter() {
      assert_eq!(kind.table(), kind.as_ref());
    }
  }

  #[test]
  fn decode_strips_bom_and_keeps_explicit_id() {
    let body = b"\xef\xbb\xbf{\"id\":3,\"place\":\"Red Square\",\"country\":\"Russia\",\"city\":\"Moscow\",\"distance\":12}";
    let entity = EntityKind::Locations.decode(body).unwrap();
    assert_eq!(entity.id(), Some(3));
    assert_eq!(entity.kind(), EntityKind::Locations);
    let Entity::Location(loc) = entity else { panic!("expected location") };
    assert_eq!(loc.city, "Moscow");
    assert_eq!(loc.distance, 12);
  }

  #[test]
  fn decode_rejects_explicit_null() {
    let body = br#"{"email":null,"first_name":"John","last_name":"Smith","gender":"m","birth_date":1}"#;
    assert!(matches!(
      EntityKind::Users.decode(body),
      Err(Error::NullField(k)) if k == "email"
    ));

    let body = br#"{"place":null}"#;
    assert!(EntityKind::Locations.decode(body).is_err());

    // `id` is optional but still may not be null.
    let body = br#"{"id":null,"location":1,"user":1,"visited_at":"1","mark":5}"#;
    assert!(matches!(
      EntityKind::Visits.decode(body),
      Err(Error::NullField(k)) if k == "id"
    ));
  }

  #[test]
  fn decode_rejects_non_object_bodies() {
    assert!(EntityKind::Locations.decode(b"[1, \"Red Square\"]").is_err());
    assert!(EntityKind::Users.decode(b"42").is_err());
  }

  #[test]
  fn validate_requires_non_zero_fields() {
    let body = br#"{"first_name":"John","last_name":"Smith","birth_date":1290129012}"#;
    let user = EntityKind::Users.decode(body).unwrap();
    assert!(matches!(user.validate(), Err(Error::MissingField("email"))));

    let visit = EntityKind::Visits
      .decode(br#"{"location":1,"user":1,"visited_at":"365299700","mark":0}"#)
      .unwrap();
    assert!(matches!(visit.validate(), Err(Error::MissingField("mark"))));

    // Locations have no required fields.
    let location = EntityKind::Locations.decode(b"{}").unwrap();
    assert!(location.validate().is_ok());
  }

  #[test]
  fn serialises_without_tag_and_omits_unset_id() {
    let mut user = john();
    user.id = None;
    let value = serde_json::to_value(Entity::from(user)).unwrap();
    assert_eq!(
      value,
      json!({
        "email": "johsmith@mail.com",
        "first_name": "John",
        "last_name": "Smith",
        "gender": "m",
        "birth_date": 1_290_129_012,
      })
    );
  }

  #[test]
  fn parse_patch_rejects_nulls_and_non_objects() {
    assert!(matches!(
      parse_patch(br#"{"first_name": null}"#),
      Err(Error::NullField(k)) if k == "first_name"
    ));
    assert!(parse_patch(b"[1, 2]").is_err());
    assert!(parse_patch(b"not json").is_err());
    assert_eq!(parse_patch(br#"{"first_name":"Jack"}"#).unwrap().len(), 1);
  }

  #[test]
  fn merged_replaces_only_named_fields() {
    let patch = parse_patch(br#"{"first_name":"Jack","id":99,"nickname":"JJ"}"#).unwrap();
    let merged = Entity::from(john()).merged(&patch).unwrap();
    let expected = User { first_name: "Jack".into(), ..john() };
    assert_eq!(merged, Entity::User(expected));
  }

  #[test]
  fn merged_rejects_wrong_type() {
    let patch = parse_patch(br#"{"birth_date":"yesterday"}"#).unwrap();
    assert!(Entity::from(john()).merged(&patch).is_err());
  }
}
