//! SQL schema for the travels SQLite store.
//!
//! Executed at connection startup. Every statement is idempotent, so opening
//! an existing file leaves its data in place.

/// Full schema DDL.
///
/// The visit references are declared but not enforced: `foreign_keys` stays
/// off so visits may be recorded before the rows they point at.
pub const SCHEMA: &str = r#"
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = OFF;

CREATE TABLE IF NOT EXISTS users (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    email       VARCHAR(100),
    last_name   VARCHAR(50),
    first_name  VARCHAR(50),
    gender      VARCHAR(1),
    birth_date  INTEGER
);

CREATE TABLE IF NOT EXISTS locations (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    place       TEXT,
    country     VARCHAR(50),
    city        VARCHAR(50),
    distance    INTEGER
);

CREATE TABLE IF NOT EXISTS visits (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    location    INTEGER,
    "user"      INTEGER,
    visited_at  VARCHAR(25),   -- compared as text by the visit filters
    mark        INTEGER,
    FOREIGN KEY (location) REFERENCES locations(id),
    FOREIGN KEY ("user")   REFERENCES users(id)
);

CREATE INDEX IF NOT EXISTS visits_user_idx     ON visits("user");
CREATE INDEX IF NOT EXISTS visits_location_idx ON visits(location);
"#;

/// Clears every table and restarts identifier assignment.
pub const RESET: &str = "
DELETE FROM visits;
DELETE FROM locations;
DELETE FROM users;
DELETE FROM sqlite_sequence;
";
