//! On-call assignments ("assegnazioni").
//!
//! Assignments are append-only. Correcting a day means recording a new row;
//! the most recently inserted row for a (day, platform) pair is the one in
//! force.

use std::{convert::Infallible, fmt, str::FromStr};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{day::DayKey, person::PersonId};

// ─── Platform ────────────────────────────────────────────────────────────────

/// The platform a rotation covers.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Platform {
  #[default]
  Cdn,
  Custom(String),
}

impl Platform {
  pub fn as_str(&self) -> &str {
    match self {
      Self::Cdn => "CDN",
      Self::Custom(name) => name,
    }
  }

  /// Whether this names the default platform, however it was spelled.
  /// `Custom("cdn")` and `Custom("")` both count.
  pub fn is_default(&self) -> bool { Self::from(self.as_str()) == Self::Cdn }

  /// Collapse alternative spellings of the default into [`Platform::Cdn`] and
  /// trim custom names.
  pub fn normalized(&self) -> Self { Self::from(self.as_str()) }
}

impl fmt::Display for Platform {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

impl From<&str> for Platform {
  fn from(s: &str) -> Self {
    let s = s.trim();
    if s.is_empty() || s.eq_ignore_ascii_case("cdn") {
      Self::Cdn
    } else {
      Self::Custom(s.to_owned())
    }
  }
}

impl From<String> for Platform {
  fn from(s: String) -> Self { Self::from(s.as_str()) }
}

impl From<Platform> for String {
  fn from(p: Platform) -> Self {
    match p {
      Platform::Cdn => "CDN".to_owned(),
      Platform::Custom(name) => name,
    }
  }
}

impl FromStr for Platform {
  type Err = Infallible;

  fn from_str(s: &str) -> Result<Self, Self::Err> { Ok(Self::from(s)) }
}

// ─── Assignment ──────────────────────────────────────────────────────────────

/// A person put on call for one day on one platform.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assignment {
  pub id:         i64,
  pub day:        DayKey,
  pub platform:   Platform,
  /// Free-form team or group label.
  pub group:      Option<String>,
  /// Not owned; the person may have been removed outside this crate.
  pub person_id:  PersonId,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
}

/// Input to [`crate::store::AssignmentStore::set_assignment`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAssignment {
  pub day:       DayKey,
  pub platform:  Platform,
  pub group:     Option<String>,
  pub person_id: PersonId,
}

impl NewAssignment {
  /// An assignment on the default platform with no group.
  pub fn new(day: DayKey, person_id: PersonId) -> Self {
    Self {
      day,
      platform: Platform::default(),
      group: None,
      person_id,
    }
  }

  pub fn on(mut self, platform: Platform) -> Self {
    self.platform = platform;
    self
  }

  pub fn in_group(mut self, group: impl Into<String>) -> Self {
    self.group = Some(group.into());
    self
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn platform_defaults_to_cdn() {
    assert_eq!(Platform::default(), Platform::Cdn);
    assert_eq!(Platform::from(""), Platform::Cdn);
    assert_eq!(Platform::from("cdn"), Platform::Cdn);
    assert_eq!(Platform::Cdn.to_string(), "CDN");
  }

  #[test]
  fn custom_platform_keeps_its_name() {
    let p: Platform = "VOD".parse().unwrap();
    assert_eq!(p, Platform::Custom("VOD".into()));
    assert_eq!(String::from(p), "VOD");
  }

  #[test]
  fn hand_built_default_spellings_normalize() {
    for spelling in ["CDN", "cdn", " Cdn ", ""] {
      let p = Platform::Custom(spelling.into());
      assert!(p.is_default(), "{spelling:?} should be the default platform");
      assert_eq!(p.normalized(), Platform::Cdn);
    }
    let vod = Platform::Custom(" VOD ".into());
    assert!(!vod.is_default());
    assert_eq!(vod.normalized(), Platform::Custom("VOD".into()));
  }

  #[test]
  fn new_assignment_uses_default_platform() {
    let day: DayKey = "20180606".parse().unwrap();
    let a = NewAssignment::new(day, PersonId(1));
    assert_eq!(a.platform, Platform::Cdn);
    assert!(a.group.is_none());

    let a = a.on(Platform::from("VOD")).in_group("notte");
    assert_eq!(a.platform.as_str(), "VOD");
    assert_eq!(a.group.as_deref(), Some("notte"));
  }
}
