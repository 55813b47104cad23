//! Error types for `reperibili-core`.

use chrono::NaiveDate;
use thiserror::Error;

use crate::{assignment::Platform, day::DayKey, person::PersonId};

#[derive(Debug, Error)]
pub enum Error {
  #[error("phone number {0:?} is not in the +39 followed by 10 digits format")]
  InvalidPhoneFormat(String),

  #[error("person {first_name} {last_name} ({phone}) already exists as {existing}")]
  DuplicatePerson {
    first_name: String,
    last_name:  String,
    phone:      String,
    existing:   PersonId,
  },

  #[error("no person with last name {0:?}")]
  LastNameNotFound(String),

  #[error("person not found: {0}")]
  PersonNotFound(PersonId),

  #[error("no on-call assignment for {day} on platform {platform}")]
  AssignmentNotFound { day: DayKey, platform: Platform },

  #[error("invalid day key {0:?}: expected YYYYMMDD")]
  InvalidDayKey(String),

  #[error("date {0} is outside the YYYYMMDD range 0000-9999")]
  DayOutOfRange(NaiveDate),

  #[error("invalid cutover hour {0}: expected 0-23")]
  InvalidCutover(u32),

  #[error("storage error: {0}")]
  Storage(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl Error {
  /// Wrap a backend error, keeping it as the `source`.
  pub fn storage(err: impl std::error::Error + Send + Sync + 'static) -> Self {
    Self::Storage(Box::new(err))
  }

  /// Whether this is one of the "nothing matched" outcomes.
  pub fn is_not_found(&self) -> bool {
    matches!(
      self,
      Self::LastNameNotFound(_)
        | Self::PersonNotFound(_)
        | Self::AssignmentNotFound { .. }
    )
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
