//! [`RotationService`]: answers "who is on call" and records assignments.

use chrono::NaiveDateTime;
use serde::Serialize;
use tracing::{debug, info};

use crate::{
  Error, Result,
  assignment::{Assignment, NewAssignment, Platform},
  day::{Clock, DayKey, DayWindow, SystemClock},
  person::{NewPerson, Person, PersonId, PersonInsert},
  phone::{ItalianMobile, PhoneValidator},
  store::AssignmentStore,
};

/// Plain calendar days around the clock reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CalendarDays {
  pub yesterday: DayKey,
  pub today:     DayKey,
  pub tomorrow:  DayKey,
}

/// The outcome of a "who is on call" resolution, with the day it resolved to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OnCall {
  pub day:      DayKey,
  pub platform: Platform,
  pub person:   Person,
}

/// Composes a store, a clock, the day-boundary rule and a phone validator.
pub struct RotationService<S, C = SystemClock, V = ItalianMobile> {
  store:     S,
  clock:     C,
  window:    DayWindow,
  validator: V,
}

impl<S: AssignmentStore> RotationService<S> {
  pub fn new(store: S) -> Self {
    Self {
      store,
      clock: SystemClock,
      window: DayWindow::default(),
      validator: ItalianMobile,
    }
  }
}

impl<S, C, V> RotationService<S, C, V>
where
  S: AssignmentStore,
  C: Clock,
  V: PhoneValidator,
{
  pub fn with_clock<C2: Clock>(self, clock: C2) -> RotationService<S, C2, V> {
    RotationService {
      store: self.store,
      clock,
      window: self.window,
      validator: self.validator,
    }
  }

  pub fn with_validator<V2: PhoneValidator>(
    self,
    validator: V2,
  ) -> RotationService<S, C, V2> {
    RotationService {
      store: self.store,
      clock: self.clock,
      window: self.window,
      validator,
    }
  }

  pub fn with_window(mut self, window: DayWindow) -> Self {
    self.window = window;
    self
  }

  pub fn store(&self) -> &S { &self.store }

  pub fn window(&self) -> DayWindow { self.window }

  // ── Days ──────────────────────────────────────────────────────────────

  /// The day whose assignment is in force right now.
  pub fn active_day(&self) -> Result<DayKey> {
    self.window.active_day(self.clock.now())
  }

  pub fn calendar(&self) -> Result<CalendarDays> {
    let now = self.clock.now();
    Ok(CalendarDays {
      yesterday: self.window.yesterday(now)?,
      today:     self.window.today(now)?,
      tomorrow:  self.window.tomorrow(now)?,
    })
  }

  // ── Persons ───────────────────────────────────────────────────────────

  /// Validate the phone number and store a new person.
  pub async fn add_person(
    &self,
    first_name: &str,
    last_name: &str,
    phone: &str,
  ) -> Result<Person> {
    if !self.validator.validate(phone) {
      return Err(Error::InvalidPhoneFormat(phone.to_owned()));
    }

    let input = NewPerson::new(first_name, last_name, phone);
    match self.store.add_person(input).await.map_err(Error::storage)? {
      PersonInsert::Created(person) => {
        info!(id = %person.id, name = %person.full_name(), "added on-call person");
        Ok(person)
      }
      PersonInsert::Duplicate(existing) => Err(Error::DuplicatePerson {
        first_name: first_name.to_owned(),
        last_name: last_name.to_owned(),
        phone: phone.to_owned(),
        existing,
      }),
    }
  }

  /// Resolve a last name to the first matching person's id. Last names are
  /// assumed unique among the handful of people on the rotation.
  pub async fn find_id_by_last_name(&self, last_name: &str) -> Result<PersonId> {
    self
      .store
      .find_person_by_last_name(last_name.to_owned())
      .await
      .map_err(Error::storage)?
      .ok_or_else(|| Error::LastNameNotFound(last_name.to_owned()))
  }

  pub async fn person_info(&self, id: PersonId) -> Result<Person> {
    self
      .store
      .get_person(id)
      .await
      .map_err(Error::storage)?
      .ok_or(Error::PersonNotFound(id))
  }

  pub async fn list_persons(&self) -> Result<Vec<Person>> {
    self.store.list_persons().await.map_err(Error::storage)
  }

  // ── Assignments ───────────────────────────────────────────────────────

  /// Put `person_id` on call for `day` on the default platform.
  pub async fn set_assignment(
    &self,
    day: DayKey,
    person_id: PersonId,
  ) -> Result<Assignment> {
    self.set_assignment_for(NewAssignment::new(day, person_id)).await
  }

  pub async fn set_assignment_for(&self, input: NewAssignment) -> Result<Assignment> {
    let person_id = input.person_id;
    let assignment = self
      .store
      .set_assignment(input)
      .await
      .map_err(Error::storage)?
      .ok_or(Error::PersonNotFound(person_id))?;

    info!(
      day = %assignment.day,
      platform = %assignment.platform,
      person = %assignment.person_id,
      "recorded on-call assignment"
    );
    Ok(assignment)
  }

  /// The assignment in force for `day`, if any. Absence is not an error.
  pub async fn get_assignment(
    &self,
    day: DayKey,
    platform: &Platform,
  ) -> Result<Option<Assignment>> {
    self
      .store
      .get_assignment(day, platform.clone())
      .await
      .map_err(Error::storage)
  }

  pub async fn assignment_history(
    &self,
    day: DayKey,
    platform: &Platform,
  ) -> Result<Vec<Assignment>> {
    self
      .store
      .assignment_history(day, platform.clone())
      .await
      .map_err(Error::storage)
  }

  /// Put the person with `last_name` on call for `day`.
  pub async fn assign(
    &self,
    day: DayKey,
    last_name: &str,
    platform: &Platform,
    group: Option<&str>,
  ) -> Result<Assignment> {
    let person_id = self.find_id_by_last_name(last_name).await?;
    let input = NewAssignment {
      day,
      platform: platform.clone(),
      group: group.map(str::to_owned),
      person_id,
    };
    self.set_assignment_for(input).await
  }

  // ── Resolution ────────────────────────────────────────────────────────

  /// Who is on call on `platform` at the instant `now`, together with the
  /// active day that instant resolved to.
  pub async fn on_call_at(
    &self,
    now: NaiveDateTime,
    platform: &Platform,
  ) -> Result<OnCall> {
    let day = self.window.active_day(now)?;
    debug!(%now, %day, %platform, "resolving on-call person");

    let assignment = self
      .get_assignment(day, platform)
      .await?
      .ok_or_else(|| Error::AssignmentNotFound {
        day,
        platform: platform.clone(),
      })?;

    let person = self.person_info(assignment.person_id).await?;
    Ok(OnCall {
      day,
      platform: platform.clone(),
      person,
    })
  }

  /// [`Self::on_call_at`] with a single reading of the service's clock.
  pub async fn on_call(&self, platform: &Platform) -> Result<OnCall> {
    self.on_call_at(self.clock.now(), platform).await
  }

  /// Who is on call on `platform` at the instant `now`.
  pub async fn who_is_on_call_at(
    &self,
    now: NaiveDateTime,
    platform: &Platform,
  ) -> Result<Person> {
    Ok(self.on_call_at(now, platform).await?.person)
  }

  /// Who is on call on `platform` according to the service's clock.
  pub async fn who_is_on_call(&self, platform: &Platform) -> Result<Person> {
    Ok(self.on_call(platform).await?.person)
  }
}
