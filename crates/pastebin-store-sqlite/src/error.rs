//! Error type for `pastebin-store-sqlite`.

use chrono::{DateTime, Utc};
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum Error {
  #[error("core error: {0}")]
  Core(#[from] pastebin_core::Error),

  #[error("database error during {op}: {source}")]
  Database {
    op:     &'static str,
    #[source]
    source: tokio_rusqlite::Error,
  },

  #[error("uuid parse error: {0}")]
  Uuid(#[from] uuid::Error),

  #[error("date/time parse error: {0}")]
  DateParse(String),

  #[error("row decode error: {0}")]
  Decode(String),

  /// The timestamp has no four-digit-year RFC 3339 form, so it cannot be
  /// stored as sortable text.
  #[error("timestamp {0} is outside the storable range")]
  TimestampRange(DateTime<Utc>),

  #[error("paste not found: {0}")]
  PasteNotFound(Uuid),

  #[error("no paste with slug {0:?}")]
  SlugNotFound(String),

  /// The slug was issued before, possibly to a paste that has since been
  /// deleted.
  #[error("slug {0:?} has already been issued")]
  SlugTaken(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Attach the name of the store operation to a database failure.
pub(crate) trait OpContext<T> {
  fn op(self, op: &'static str) -> Result<T>;
}

impl<T> OpContext<T> for std::result::Result<T, tokio_rusqlite::Error> {
  fn op(self, op: &'static str) -> Result<T> {
    self.map_err(|source| Error::Database { op, source })
  }
}

impl From<Error> for pastebin_core::Error {
  fn from(e: Error) -> Self {
    match e {
      Error::Core(inner) => inner,
      Error::PasteNotFound(_) | Error::SlugNotFound(_) => Self::NotFound,
      Error::SlugTaken(slug) => {
        Self::Conflict(format!("slug {slug:?} has already been issued"))
      }
      Error::TimestampRange(at) => Self::Validation(format!(
        "timestamp {at} is outside the storable range (years 0000 to 9999)"
      )),
      Error::Database { op, source } => Self::storage(op, source),
      other @ (Error::Uuid(_) | Error::DateParse(_) | Error::Decode(_)) => {
        Self::storage("decode row", other)
      }
    }
  }
}
