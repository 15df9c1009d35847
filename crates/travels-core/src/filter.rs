//! Cross-entity visit filters.
//!
//! A visit is judged together with the record it points at: its location for
//! [`VisitsFilter`], its user for [`AvgFilter`]. Both filters are conjunctions
//! of optional predicates; an unset predicate always holds.
//!
//! Date bounds are compared against `visited_at` as raw strings, byte by byte,
//! even though [`VisitsFilter`] insists they parse as integers. A bound of
//! `"1000"` therefore excludes `"999"` only because `'9' > '1'`.

use chrono::{DateTime, Datelike, Utc};

use crate::{
  Error, Result,
  entity::{Location, User, Visit},
};

/// First value of `key` in a decoded query string.
fn first<'a>(params: &'a [(String, String)], key: &str) -> Option<&'a str> {
  params
    .iter()
    .find(|(k, _)| k == key)
    .map(|(_, v)| v.as_str())
}

fn non_empty(value: Option<&str>) -> Option<String> {
  value.filter(|v| !v.is_empty()).map(str::to_owned)
}

fn strict_int(params: &[(String, String)], name: &'static str) -> Result<Option<i64>> {
  first(params, name)
    .map(|value| {
      value.parse::<i64>().map_err(|_| Error::BadQueryParam {
        name,
        value: value.to_owned(),
      })
    })
    .transpose()
}

/// Unparsable values and the `-1` sentinel both mean "no bound".
fn lenient_int(params: &[(String, String)], name: &str) -> Option<i64> {
  first(params, name)
    .and_then(|v| v.parse::<i64>().ok())
    .filter(|v| *v != -1)
}

fn within_dates(visited_at: &str, from: Option<&str>, to: Option<&str>) -> bool {
  from.is_none_or(|from| visited_at > from) && to.is_none_or(|to| visited_at < to)
}

/// Whole years between `birth_date` (Unix seconds) and `now`.
///
/// Only the year and month are considered: a birthday later this month still
/// counts as reached. Returns `None` if `birth_date` is out of range.
pub fn age_at(birth_date: i64, now: DateTime<Utc>) -> Option<i64> {
  let born = DateTime::from_timestamp(birth_date, 0)?;
  let mut years = i64::from(now.year() - born.year());
  if now.month() < born.month() {
    years -= 1;
  }
  Some(years)
}

// ─── User visits ──────────────────────────────────────────────────────────────

/// Filter for `GET /users/{id}/visits`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VisitsFilter {
  pub from_date:   Option<String>,
  pub to_date:     Option<String>,
  pub country:     Option<String>,
  pub to_distance: Option<i64>,
}

impl VisitsFilter {
  /// Build the filter from query pairs.
  ///
  /// `fromDate`, `toDate` and `toDistance` must be integers whenever the key
  /// is present, even with an empty value. An empty `country` is ignored.
  pub fn from_query(params: &[(String, String)]) -> Result<Self> {
    strict_int(params, "fromDate")?;
    strict_int(params, "toDate")?;
    Ok(Self {
      from_date:   non_empty(first(params, "fromDate")),
      to_date:     non_empty(first(params, "toDate")),
      country:     non_empty(first(params, "country")),
      to_distance: strict_int(params, "toDistance")?,
    })
  }

  pub fn matches(&self, visit: &Visit, location: &Location) -> bool {
    self.country.as_ref().is_none_or(|c| location.country == *c)
      && within_dates(
        &visit.visited_at,
        self.from_date.as_deref(),
        self.to_date.as_deref(),
      )
      && self.to_distance.is_none_or(|d| location.distance < d)
  }
}

// ─── Location average ─────────────────────────────────────────────────────────

/// Filter for `GET /locations/{id}/avg`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AvgFilter {
  pub from_date: Option<String>,
  pub to_date:   Option<String>,
  pub from_age:  Option<i64>,
  pub to_age:    Option<i64>,
  pub gender:    Option<String>,
}

impl AvgFilter {
  /// Build the filter from query pairs. Never fails: bad age bounds are
  /// treated as absent.
  pub fn from_query(params: &[(String, String)]) -> Self {
    Self {
      from_date: non_empty(first(params, "fromDate")),
      to_date:   non_empty(first(params, "toDate")),
      from_age:  lenient_int(params, "fromAge"),
      to_age:    lenient_int(params, "toAge"),
      gender:    non_empty(first(params, "gender")),
    }
  }

  pub fn matches(&self, visit: &Visit, user: &User, now: DateTime<Utc>) -> bool {
    // The age is only derived when a lower bound is set. Without one it stays
    // zero, and an upper bound is checked against that zero.
    let age = match self.from_age {
      Some(_) => match age_at(user.birth_date, now) {
        Some(age) => age,
        None => return false,
      },
      None => 0,
    };

    self.gender.as_ref().is_none_or(|g| user.gender == *g)
      && self.from_age.is_none_or(|from| age > from)
      && self.to_age.is_none_or(|to| age < to)
      && within_dates(
        &visit.visited_at,
        self.from_date.as_deref(),
        self.to_date.as_deref(),
      )
  }
}

#[cfg(test)]
mod tests {
  use chrono::TimeZone;

  use super::*;

  fn q(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
    pairs
      .iter()
      .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
      .collect()
  }

  fn visit(visited_at: &str) -> Visit {
    Visit {
      id:         Some(1),
      location:   1,
      user:       1,
      visited_at: visited_at.into(),
      mark:       4,
    }
  }

  fn location(country: &str, distance: i64) -> Location {
    Location {
      id: Some(1),
      place: "Red Square".into(),
      country: country.into(),
      city: "Moscow".into(),
      distance,
    }
  }

  fn user(gender: &str, birth_date: i64) -> User {
    User {
      id: Some(1),
      email: "a@b.c".into(),
      first_name: "A".into(),
      last_name: "B".into(),
      gender: gender.into(),
      birth_date,
    }
  }

  fn now() -> DateTime<Utc> { Utc.with_ymd_and_hms(2020, 6, 15, 12, 0, 0).unwrap() }

  fn born(y: i32, m: u32, d: u32) -> i64 {
    Utc.with_ymd_and_hms(y, m, d, 0, 0, 0).unwrap().timestamp()
  }

  #[test]
  fn visits_filter_rejects_non_integer_dates() {
    let err = VisitsFilter::from_query(&q(&[("fromDate", "abracadbra")])).unwrap_err();
    assert!(matches!(err, Error::BadQueryParam { name: "fromDate", .. }));
    assert!(VisitsFilter::from_query(&q(&[("toDate", "12.5")])).is_err());
    assert!(VisitsFilter::from_query(&q(&[("toDistance", "far")])).is_err());
  }

  #[test]
  fn visits_filter_rejects_present_but_empty_bounds() {
    assert!(VisitsFilter::from_query(&q(&[("fromDate", "")])).is_err());
    assert!(VisitsFilter::from_query(&q(&[("toDistance", "")])).is_err());
  }

  #[test]
  fn visits_filter_ignores_empty_country() {
    let f = VisitsFilter::from_query(&q(&[("country", "")])).unwrap();
    assert_eq!(f, VisitsFilter::default());
  }

  #[test]
  fn visits_filter_combines_predicates() {
    let f = VisitsFilter::from_query(&q(&[
      ("country", "Russia"),
      ("toDistance", "100"),
      ("fromDate", "1000"),
    ]))
    .unwrap();

    assert!(f.matches(&visit("2000"), &location("Russia", 50)));
    assert!(!f.matches(&visit("2000"), &location("France", 50)));
    assert!(!f.matches(&visit("2000"), &location("Russia", 100)));
    assert!(!f.matches(&visit("1000"), &location("Russia", 50)));
  }

  #[test]
  fn date_bounds_compare_as_strings() {
    let f = VisitsFilter::from_query(&q(&[("fromDate", "1000")])).unwrap();
    // Numerically 999 < 1000, but "999" > "1000" byte-wise.
    assert!(f.matches(&visit("999"), &location("Russia", 1)));
    // Numerically 10000 > 1000, and "10000" > "1000" as a longer prefix match.
    assert!(f.matches(&visit("10000"), &location("Russia", 1)));

    let f = VisitsFilter::from_query(&q(&[("toDate", "2000")])).unwrap();
    assert!(f.matches(&visit("10000000"), &location("Russia", 1)));
  }

  #[test]
  fn age_borrows_a_year_for_later_months() {
    assert_eq!(age_at(born(1990, 3, 1), now()), Some(30));
    assert_eq!(age_at(born(1990, 9, 1), now()), Some(29));
    // Same month, later day: days are ignored.
    assert_eq!(age_at(born(1990, 6, 30), now()), Some(30));
  }

  #[test]
  fn avg_filter_treats_bad_bounds_as_absent() {
    let f = AvgFilter::from_query(&q(&[("fromAge", "old"), ("toAge", "-1")]));
    assert_eq!(f.from_age, None);
    assert_eq!(f.to_age, None);
  }

  #[test]
  fn avg_filter_applies_age_range() {
    let f = AvgFilter::from_query(&q(&[("fromAge", "20"), ("toAge", "40")]));
    assert!(f.matches(&visit("1"), &user("m", born(1990, 1, 1)), now()));
    assert!(!f.matches(&visit("1"), &user("m", born(2005, 1, 1)), now()));
    assert!(!f.matches(&visit("1"), &user("m", born(1970, 1, 1)), now()));
  }

  #[test]
  fn to_age_alone_compares_against_zero() {
    // A 60-year-old passes `toAge=40` because no `fromAge` was given.
    let old = user("f", born(1960, 1, 1));
    let f = AvgFilter::from_query(&q(&[("toAge", "40")]));
    assert!(f.matches(&visit("1"), &old, now()));

    // `toAge=0` excludes everyone for the same reason.
    let f = AvgFilter::from_query(&q(&[("toAge", "0")]));
    assert!(!f.matches(&visit("1"), &old, now()));
  }

  #[test]
  fn avg_filter_matches_gender_and_dates() {
    let f = AvgFilter::from_query(&q(&[("gender", "f"), ("toDate", "500")]));
    assert!(f.matches(&visit("400"), &user("f", 1), now()));
    assert!(!f.matches(&visit("400"), &user("m", 1), now()));
    assert!(!f.matches(&visit("600"), &user("f", 1), now()));
  }
}
