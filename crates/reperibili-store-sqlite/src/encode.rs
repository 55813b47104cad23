//! Encoding and decoding helpers between domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Timestamps are RFC 3339 strings. Day keys are `YYYYMMDD`. A NULL, blank or
//! lowercase `cdn` platform (rows written by older tools) reads back as the
//! default platform; `ASSIGNMENT_FOR_DAY` in `store` applies the same rule.

use chrono::{DateTime, Utc};
use reperibili_core::{
  assignment::{Assignment, Platform},
  day::DayKey,
  person::{Person, PersonId},
};

use crate::{Error, Result};

// ─── DateTime<Utc> ───────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── DayKey / Platform ───────────────────────────────────────────────────────

pub fn encode_day(day: DayKey) -> String { day.to_string() }

pub fn decode_day(s: &str) -> Result<DayKey> { Ok(s.parse()?) }

pub fn encode_platform(p: &Platform) -> String { p.normalized().into() }

pub fn decode_platform(s: Option<&str>) -> Platform {
  s.map(Platform::from).unwrap_or_default()
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Raw values read directly from a `reperibile` row.
pub struct RawPerson {
  pub id:        i64,
  pub nome:      Option<String>,
  pub cognome:   Option<String>,
  pub cellulare: Option<String>,
}

impl RawPerson {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:        row.get(0)?,
      nome:      row.get(1)?,
      cognome:   row.get(2)?,
      cellulare: row.get(3)?,
    })
  }

  pub fn into_person(self) -> Person {
    Person {
      id:         PersonId(self.id),
      first_name: self.nome.unwrap_or_default(),
      last_name:  self.cognome.unwrap_or_default(),
      phone:      self.cellulare.unwrap_or_default(),
    }
  }
}

/// Raw values read directly from an `assegnazione` row.
pub struct RawAssignment {
  pub id:            i64,
  pub created_at:    Option<String>,
  pub updated_at:    Option<String>,
  pub piattaforma:   Option<String>,
  pub giorno:        String,
  pub gruppo:        Option<String>,
  pub reperibile_id: i64,
}

impl RawAssignment {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:            row.get(0)?,
      created_at:    row.get(1)?,
      updated_at:    row.get(2)?,
      piattaforma:   row.get(3)?,
      giorno:        row.get(4)?,
      gruppo:        row.get(5)?,
      reperibile_id: row.get(6)?,
    })
  }

  pub fn into_assignment(self) -> Result<Assignment> {
    // Rows imported without timestamps read as the epoch.
    let created_at = self
      .created_at
      .as_deref()
      .map(decode_dt)
      .transpose()?
      .unwrap_or_default();
    let updated_at = self
      .updated_at
      .as_deref()
      .map(decode_dt)
      .transpose()?
      .unwrap_or(created_at);

    Ok(Assignment {
      id: self.id,
      day: decode_day(&self.giorno)?,
      platform: decode_platform(self.piattaforma.as_deref()),
      group: self.gruppo.filter(|g| !g.is_empty()),
      person_id: PersonId(self.reperibile_id),
      created_at,
      updated_at,
    })
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn null_platform_is_cdn() {
    assert_eq!(decode_platform(None), Platform::Cdn);
    assert_eq!(decode_platform(Some("CDN")), Platform::Cdn);
    assert_eq!(decode_platform(Some("VOD")), Platform::Custom("VOD".into()));
  }

  #[test]
  fn default_platform_is_written_as_cdn() {
    assert_eq!(encode_platform(&Platform::Cdn), "CDN");
    assert_eq!(encode_platform(&Platform::Custom("cdn".into())), "CDN");
    assert_eq!(encode_platform(&Platform::Custom(" VOD ".into())), "VOD");
  }

  #[test]
  fn bad_day_is_a_core_error() {
    assert!(matches!(
      decode_day("2018-06-06"),
      Err(Error::Core(reperibili_core::Error::InvalidDayKey(_)))
    ));
  }

  #[test]
  fn timestamps_roundtrip() {
    let now = Utc::now();
    assert_eq!(decode_dt(&encode_dt(now)).unwrap(), now);
    assert!(matches!(decode_dt("yesterday"), Err(Error::DateParse(_))));
  }
}
