//! Phone-number validation applied before a person is stored.

use std::sync::LazyLock;

use regex::Regex;

/// Pass/fail check for a phone number string.
pub trait PhoneValidator: Send + Sync {
  fn validate(&self, phone: &str) -> bool;
}

static ITALIAN_MOBILE: LazyLock<Regex> =
  LazyLock::new(|| Regex::new(r"^\+39[0-9]{10}$").expect("valid phone regex"));

/// Accepts `+39` followed by exactly ten digits, e.g. `+393357291533`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ItalianMobile;

impl PhoneValidator for ItalianMobile {
  fn validate(&self, phone: &str) -> bool { ITALIAN_MOBILE.is_match(phone) }
}

impl<F> PhoneValidator for F
where
  F: Fn(&str) -> bool + Send + Sync,
{
  fn validate(&self, phone: &str) -> bool { self(phone) }
}
