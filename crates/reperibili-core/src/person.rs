//! On-call persons ("reperibili").

use std::fmt;

use serde::{Deserialize, Serialize};

/// Row id assigned by the store on insertion.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct PersonId(pub i64);

impl fmt::Display for PersonId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    fmt::Display::fmt(&self.0, f)
  }
}

/// A person who can be put on call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Person {
  pub id:         PersonId,
  pub first_name: String,
  pub last_name:  String,
  /// Mobile number, `+39` followed by the national number.
  pub phone:      String,
}

impl Person {
  pub fn full_name(&self) -> String {
    format!("{} {}", self.first_name, self.last_name)
  }
}

/// Input to [`crate::store::PersonStore::add_person`]; the id is assigned by
/// the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPerson {
  pub first_name: String,
  pub last_name:  String,
  pub phone:      String,
}

impl NewPerson {
  pub fn new(
    first_name: impl Into<String>,
    last_name: impl Into<String>,
    phone: impl Into<String>,
  ) -> Self {
    Self {
      first_name: first_name.into(),
      last_name:  last_name.into(),
      phone:      phone.into(),
    }
  }
}

/// Outcome of an insert guarded by the (first name, last name, phone)
/// uniqueness rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PersonInsert {
  Created(Person),
  /// An identical triple already exists; nothing was written.
  Duplicate(PersonId),
}
