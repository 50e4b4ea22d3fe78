//! Parsing of `expires_in` durations such as `24h`, `7d`, or `1h30m`.

use chrono::{DateTime, Datelike as _, Duration, Utc};

use crate::{Error, Result};

/// Latest year an expiry may fall in. Later years have no four-digit
/// RFC 3339 form.
pub const MAX_EXPIRY_YEAR: i32 = 9999;

/// Parse a duration made of one or more `<integer><unit>` groups.
///
/// Units: `ms`, `s`, `m`, `h`, `d`, `w`. The total must be positive.
pub fn parse_expires_in(input: &str) -> Result<Duration> {
  let invalid = || {
    Error::Validation(format!(
      "invalid expires_in {input:?}; use a duration like '90s', '24h' or '7d'"
    ))
  };

  let mut rest = input.trim();
  if rest.is_empty() {
    return Err(invalid());
  }

  let mut total = Duration::zero();
  while !rest.is_empty() {
    let digits = rest
      .find(|c: char| !c.is_ascii_digit())
      .unwrap_or(rest.len());
    if digits == 0 {
      return Err(invalid());
    }
    let amount: i64 = rest[..digits].parse().map_err(|_| invalid())?;
    rest = &rest[digits..];

    let unit_len = rest.find(|c: char| c.is_ascii_digit()).unwrap_or(rest.len());
    let (unit, tail) = rest.split_at(unit_len);
    rest = tail;

    let part = match unit {
      "ms" => Duration::try_milliseconds(amount),
      "s" => Duration::try_seconds(amount),
      "m" => Duration::try_minutes(amount),
      "h" => Duration::try_hours(amount),
      "d" => Duration::try_days(amount),
      "w" => Duration::try_weeks(amount),
      _ => None,
    }
    .ok_or_else(invalid)?;

    total = total.checked_add(&part).ok_or_else(invalid)?;
  }

  if total <= Duration::zero() {
    return Err(invalid());
  }
  Ok(total)
}

/// `now + expires_in`, rejecting results after [`MAX_EXPIRY_YEAR`].
pub fn expires_at(now: DateTime<Utc>, expires_in: &str) -> Result<DateTime<Utc>> {
  let duration = parse_expires_in(expires_in)?;
  now
    .checked_add_signed(duration)
    .filter(|at| at.year() <= MAX_EXPIRY_YEAR)
    .ok_or_else(|| {
      Error::Validation(format!("expires_in {expires_in:?} is out of range"))
    })
}
