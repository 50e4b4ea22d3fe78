//! Encoding and decoding helpers between Rust domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Timestamps are stored as fixed-width RFC 3339 UTC strings with microsecond
//! precision, so comparing them as text orders them chronologically. UUIDs are
//! stored as hyphenated lowercase strings.

use chrono::{DateTime, Datelike as _, SecondsFormat, Utc};
use pastebin_core::{
  ledger::ViewRecord,
  paste::{ColumnValue, Paste},
};
use rusqlite::types::Value;
use uuid::Uuid;

use crate::{Error, Result};

// ─── Uuid ─────────────────────────────────────────────────────────────────────

pub fn encode_uuid(id: Uuid) -> String { id.hyphenated().to_string() }

pub fn decode_uuid(s: &str) -> Result<Uuid> { Ok(Uuid::parse_str(s)?) }

// ─── DateTime<Utc> ───────────────────────────────────────────────────────────

/// Years with a plain four-digit RFC 3339 form.
const STORABLE_YEARS: std::ops::RangeInclusive<i32> = 0..=9999;

pub fn encode_dt(dt: DateTime<Utc>) -> Result<String> {
  if !STORABLE_YEARS.contains(&dt.year()) {
    return Err(Error::TimestampRange(dt));
  }
  Ok(dt.to_rfc3339_opts(SecondsFormat::Micros, true))
}

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(format!("{s:?}: {e}")))
}

// ─── Patch values ────────────────────────────────────────────────────────────

pub fn encode_column_value(value: ColumnValue) -> Result<Value> {
  Ok(match value {
    ColumnValue::Text(s) => Value::Text(s),
    ColumnValue::Bool(b) => Value::Integer(i64::from(b)),
    ColumnValue::Timestamp(dt) => Value::Text(encode_dt(dt)?),
    ColumnValue::Null => Value::Null,
  })
}

fn decode_count(n: i64) -> Result<u64> {
  u64::try_from(n).map_err(|_| Error::Decode(format!("negative view count: {n}")))
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Column list shared by every paste read: the paste row joined with its
/// view count, which is zero while no view record exists.
pub const PASTE_SELECT: &str = "SELECT
     p.id, p.owner_id, p.title, p.content, p.language, p.slug, p.url,
     p.is_private, p.password_hash,
     COALESCE(v.views, 0) AS views,
     p.expires_at, p.created_at, p.updated_at
   FROM pastes p
   LEFT JOIN paste_view_records v ON v.paste_id = p.id";

/// Raw values read directly from a row produced by [`PASTE_SELECT`].
pub struct RawPaste {
  pub id:            String,
  pub owner_id:      String,
  pub title:         String,
  pub content:       String,
  pub language:      String,
  pub slug:          String,
  pub url:           String,
  pub is_private:    bool,
  pub password_hash: Option<String>,
  pub views:         i64,
  pub expires_at:    Option<String>,
  pub created_at:    String,
  pub updated_at:    String,
}

impl RawPaste {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:            row.get(0)?,
      owner_id:      row.get(1)?,
      title:         row.get(2)?,
      content:       row.get(3)?,
      language:      row.get(4)?,
      slug:          row.get(5)?,
      url:           row.get(6)?,
      is_private:    row.get(7)?,
      password_hash: row.get(8)?,
      views:         row.get(9)?,
      expires_at:    row.get(10)?,
      created_at:    row.get(11)?,
      updated_at:    row.get(12)?,
    })
  }

  pub fn into_paste(self) -> Result<Paste> {
    Ok(Paste {
      id:            decode_uuid(&self.id)?,
      owner_id:      decode_uuid(&self.owner_id)?,
      title:         self.title,
      content:       self.content,
      language:      self.language,
      slug:          self.slug,
      url:           self.url,
      is_private:    self.is_private,
      password_hash: self.password_hash.filter(|h| !h.is_empty()),
      views:         decode_count(self.views)?,
      expires_at:    self.expires_at.as_deref().map(decode_dt).transpose()?,
      created_at:    decode_dt(&self.created_at)?,
      updated_at:    decode_dt(&self.updated_at)?,
    })
  }
}

pub const VIEW_RECORD_SELECT: &str = "SELECT
     v.paste_id, v.views, v.first_url, v.created_at, v.updated_at
   FROM paste_view_records v";

/// Raw values read directly from a `paste_view_records` row.
pub struct RawViewRecord {
  pub paste_id:   String,
  pub views:      i64,
  pub first_url:  String,
  pub created_at: String,
  pub updated_at: String,
}

impl RawViewRecord {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      paste_id:   row.get(0)?,
      views:      row.get(1)?,
      first_url:  row.get(2)?,
      created_at: row.get(3)?,
      updated_at: row.get(4)?,
    })
  }

  pub fn into_record(self) -> Result<ViewRecord> {
    Ok(ViewRecord {
      paste_id:   decode_uuid(&self.paste_id)?,
      views:      decode_count(self.views)?,
      first_url:  self.first_url,
      created_at: decode_dt(&self.created_at)?,
      updated_at: decode_dt(&self.updated_at)?,
    })
  }
}
