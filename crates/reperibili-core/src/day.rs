//! Day keys and the day-boundary rule.
//!
//! The assignment for calendar day D stays active from D at the cutover
//! (07:00 by default) until just before the cutover on D+1. Everything here is
//! a pure function of a clock reading, failing only outside years 0000-9999; the reading itself comes from a
//! [`Clock`] so callers and tests can supply any instant.

use std::{fmt, str::FromStr};

use chrono::{Datelike, Days, Local, NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

// ─── DayKey ──────────────────────────────────────────────────────────────────

/// A rotation slot: one calendar date, written `YYYYMMDD` without separators.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(try_from = "String", into = "String")]
pub struct DayKey(NaiveDate);

impl DayKey {
  /// Fails with `DayOutOfRange` unless the year fits in four digits.
  pub fn new(date: NaiveDate) -> Result<Self> {
    if (0..=9999).contains(&date.year()) {
      Ok(Self(date))
    } else {
      Err(Error::DayOutOfRange(date))
    }
  }

  pub fn date(self) -> NaiveDate { self.0 }

  /// The previous day; fails at 0000-01-01.
  pub fn pred(self) -> Result<Self> {
    self
      .0
      .checked_sub_days(Days::new(1))
      .ok_or(Error::DayOutOfRange(self.0))
      .and_then(Self::new)
  }

  /// The next day; fails at 9999-12-31.
  pub fn succ(self) -> Result<Self> {
    self
      .0
      .checked_add_days(Days::new(1))
      .ok_or(Error::DayOutOfRange(self.0))
      .and_then(Self::new)
  }
}

impl TryFrom<NaiveDate> for DayKey {
  type Error = Error;

  fn try_from(date: NaiveDate) -> Result<Self> { Self::new(date) }
}

impl fmt::Display for DayKey {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{:04}{:02}{:02}", self.0.year(), self.0.month(), self.0.day())
  }
}

impl FromStr for DayKey {
  type Err = Error;

  fn from_str(s: &str) -> Result<Self> {
    // chrono's `%Y` accepts signs and short years, so check the shape first.
    if s.len() != 8 || !s.bytes().all(|b| b.is_ascii_digit()) {
      return Err(Error::InvalidDayKey(s.to_owned()));
    }
    NaiveDate::parse_from_str(s, "%Y%m%d")
      .map(Self)
      .map_err(|_| Error::InvalidDayKey(s.to_owned()))
  }
}

impl TryFrom<String> for DayKey {
  type Error = Error;

  fn try_from(s: String) -> Result<Self> { s.parse() }
}

impl From<DayKey> for String {
  fn from(key: DayKey) -> Self { key.to_string() }
}

// ─── Clock ───────────────────────────────────────────────────────────────────

/// Source of the current local wall-clock time.
pub trait Clock: Send + Sync {
  fn now(&self) -> NaiveDateTime;
}

/// Reads the system clock in the local time zone.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
  fn now(&self) -> NaiveDateTime { Local::now().naive_local() }
}

/// Always returns the same instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveDateTime);

impl Clock for FixedClock {
  fn now(&self) -> NaiveDateTime { self.0 }
}

// ─── DayWindow ───────────────────────────────────────────────────────────────

/// The hour at which the rotation rolls over to the next day.
pub const DEFAULT_CUTOVER_HOUR: u32 = 7;

/// Resolves which calendar day is "active" at a given instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayWindow {
  cutover: NaiveTime,
}

impl Default for DayWindow {
  fn default() -> Self {
    Self {
      cutover: NaiveTime::from_hms_opt(DEFAULT_CUTOVER_HOUR, 0, 0)
        .unwrap_or_default(),
    }
  }
}

impl DayWindow {
  pub fn new(cutover: NaiveTime) -> Self { Self { cutover } }

  /// A window rolling over on the hour, e.g. `from_hour(7)` for 07:00:00.
  pub fn from_hour(hour: u32) -> Result<Self> {
    NaiveTime::from_hms_opt(hour, 0, 0)
      .map(Self::new)
      .ok_or(Error::InvalidCutover(hour))
  }

  pub fn cutover(&self) -> NaiveTime { self.cutover }

  /// The day whose assignment is in force at `now`. Before the cutover the
  /// previous calendar day is still on call.
  ///
  /// Fails only when the result falls outside years 0000-9999.
  pub fn active_day(&self, now: NaiveDateTime) -> Result<DayKey> {
    let today = self.today(now)?;
    if now.time() >= self.cutover {
      Ok(today)
    } else {
      today.pred()
    }
  }

  /// Calendar yesterday, ignoring the cutover.
  pub fn yesterday(&self, now: NaiveDateTime) -> Result<DayKey> {
    self.today(now)?.pred()
  }

  /// Calendar today, ignoring the cutover.
  pub fn today(&self, now: NaiveDateTime) -> Result<DayKey> { DayKey::new(now.date()) }

  /// Calendar tomorrow, ignoring the cutover.
  pub fn tomorrow(&self, now: NaiveDateTime) -> Result<DayKey> {
    self.today(now)?.succ()
  }
}

#[cfg(test)]
mod tests {
  use chrono::NaiveDate;

  use super::*;

  fn at(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(y, m, d)
      .unwrap()
      .and_hms_opt(h, min, s)
      .unwrap()
  }

  fn key(s: &str) -> DayKey { s.parse().unwrap() }

  #[test]
  fn active_day_after_cutover_is_today() {
    let w = DayWindow::default();
    assert_eq!(w.active_day(at(2018, 6, 6, 7, 0, 0)).unwrap(), key("20180606"));
    assert_eq!(w.active_day(at(2018, 6, 6, 8, 0, 0)).unwrap(), key("20180606"));
    assert_eq!(w.active_day(at(2018, 6, 6, 23, 59, 59)).unwrap(), key("20180606"));
  }

  #[test]
  fn active_day_before_cutover_is_yesterday() {
    let w = DayWindow::default();
    assert_eq!(w.active_day(at(2018, 6, 6, 6, 59, 59)).unwrap(), key("20180605"));
    assert_eq!(w.active_day(at(2018, 6, 6, 0, 0, 0)).unwrap(), key("20180605"));
  }

  #[test]
  fn active_day_crosses_month_and_year() {
    let w = DayWindow::default();
    assert_eq!(w.active_day(at(2018, 3, 1, 3, 0, 0)).unwrap(), key("20180228"));
    assert_eq!(w.active_day(at(2019, 1, 1, 6, 0, 0)).unwrap(), key("20181231"));
  }

  #[test]
  fn custom_cutover() {
    let w = DayWindow::from_hour(9).unwrap();
    assert_eq!(w.active_day(at(2018, 6, 6, 8, 0, 0)).unwrap(), key("20180605"));
    assert_eq!(w.active_day(at(2018, 6, 6, 9, 0, 0)).unwrap(), key("20180606"));

    let midnight = DayWindow::from_hour(0).unwrap();
    assert_eq!(midnight.active_day(at(2018, 6, 6, 0, 0, 0)).unwrap(), key("20180606"));
  }

  #[test]
  fn cutover_hour_out_of_range() {
    assert!(matches!(DayWindow::from_hour(24), Err(Error::InvalidCutover(24))));
  }

  #[test]
  fn calendar_days_ignore_cutover() {
    let w = DayWindow::default();
    let early = at(2018, 6, 6, 2, 0, 0);
    assert_eq!(w.yesterday(early).unwrap(), key("20180605"));
    assert_eq!(w.today(early).unwrap(), key("20180606"));
    assert_eq!(w.tomorrow(early).unwrap(), key("20180607"));
  }

  #[test]
  fn day_key_display_and_parse() {
    let k = key("20180606");
    assert_eq!(k.to_string(), "20180606");
    assert_eq!(k.date(), NaiveDate::from_ymd_opt(2018, 6, 6).unwrap());
    let early = DayKey::new(NaiveDate::from_ymd_opt(9, 1, 2).unwrap()).unwrap();
    assert_eq!(early.to_string(), "00090102");
  }

  #[test]
  fn day_key_rejects_bad_shapes() {
    for bad in ["2018066", "2018-06-06", "20180231", "+2018060", "201806061", ""] {
      assert!(
        matches!(bad.parse::<DayKey>(), Err(Error::InvalidDayKey(_))),
        "{bad:?} should be rejected"
      );
    }
  }

  #[test]
  fn day_key_limited_to_four_digit_years() {
    let y10k = NaiveDate::from_ymd_opt(10_000, 1, 1).unwrap();
    assert!(matches!(DayKey::new(y10k), Err(Error::DayOutOfRange(d)) if d == y10k));
    assert!(DayKey::try_from(NaiveDate::from_ymd_opt(-1, 12, 31).unwrap()).is_err());

    let last = key("99991231");
    assert!(matches!(last.succ(), Err(Error::DayOutOfRange(_))));
    let first = key("00000101");
    assert!(matches!(first.pred(), Err(Error::DayOutOfRange(_))));
    assert_eq!(first.succ().unwrap(), key("00000102"));
  }

  #[test]
  fn extreme_dates_do_not_panic() {
    let w = DayWindow::default();
    let min = NaiveDate::MIN.and_hms_opt(3, 0, 0).unwrap();
    let max = NaiveDate::MAX.and_hms_opt(9, 0, 0).unwrap();
    assert!(w.active_day(min).is_err());
    assert!(w.tomorrow(max).is_err());
    assert!(w.yesterday(NaiveDate::MIN.and_hms_opt(9, 0, 0).unwrap()).is_err());
  }

  #[test]
  fn fixed_clock_returns_its_instant() {
    let t = at(2018, 6, 6, 8, 0, 0);
    assert_eq!(FixedClock(t).now(), t);
  }
}
