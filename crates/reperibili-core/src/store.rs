//! The storage traits for persons and assignments.
//!
//! Implemented by storage backends (e.g. `reperibili-store-sqlite`). The
//! [`RotationService`](crate::service::RotationService) depends on these
//! traits, never on a concrete backend.
//!
//! Lookups that find nothing return `Ok(None)`; the error type is reserved for
//! I/O and decoding failures.

use std::future::Future;

use crate::{
  assignment::{Assignment, NewAssignment, Platform},
  day::DayKey,
  person::{NewPerson, Person, PersonId, PersonInsert},
};

/// Persistence for on-call persons.
pub trait PersonStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Insert `input` unless a person with the identical first name, last name
  /// and phone already exists. The existence check and the insert happen
  /// atomically.
  fn add_person(
    &self,
    input: NewPerson,
  ) -> impl Future<Output = Result<PersonInsert, Self::Error>> + Send + '_;

  /// The id of the first person (in insertion order) with this last name.
  fn find_person_by_last_name(
    &self,
    last_name: String,
  ) -> impl Future<Output = Result<Option<PersonId>, Self::Error>> + Send + '_;

  /// Retrieve a person by id. Returns `None` if not found.
  fn get_person(
    &self,
    id: PersonId,
  ) -> impl Future<Output = Result<Option<Person>, Self::Error>> + Send + '_;

  /// All persons in insertion order.
  fn list_persons(
    &self,
  ) -> impl Future<Output = Result<Vec<Person>, Self::Error>> + Send + '_;
}

/// Persistence for day → person assignments. Writes are append-only.
pub trait AssignmentStore: PersonStore {
  /// Record a new assignment row.
  ///
  /// Returns `None`, writing nothing, if `input.person_id` does not resolve
  /// to a stored person. An existing assignment for the same day and platform
  /// is not an error; the new row takes precedence on lookup.
  fn set_assignment(
    &self,
    input: NewAssignment,
  ) -> impl Future<Output = Result<Option<Assignment>, Self::Error>> + Send + '_;

  /// The most recently inserted assignment for `day` on `platform`.
  fn get_assignment(
    &self,
    day: DayKey,
    platform: Platform,
  ) -> impl Future<Output = Result<Option<Assignment>, Self::Error>> + Send + '_;

  /// Every assignment recorded for `day` on `platform`, newest first.
  fn assignment_history(
    &self,
    day: DayKey,
    platform: Platform,
  ) -> impl Future<Output = Result<Vec<Assignment>, Self::Error>> + Send + '_;
}
