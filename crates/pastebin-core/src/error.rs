//! Error taxonomy shared by every layer of the paste service.
//!
//! `NotFound` covers both "no such paste" and "paste expired", and `Forbidden`
//! covers both "no password" and "wrong password"; a caller learns nothing
//! about a paste it cannot read.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("paste not found")]
  NotFound,

  #[error("forbidden")]
  Forbidden,

  /// A uniqueness constraint was hit (slug collision on create).
  #[error("conflict: {0}")]
  Conflict(String),

  #[error("validation error: {0}")]
  Validation(String),

  /// The credential codec failed to produce a hash.
  #[error("credential error: {0}")]
  Credential(String),

  #[error("storage error during {op}: {source}")]
  Storage {
    op:     &'static str,
    #[source]
    source: Box<dyn std::error::Error + Send + Sync>,
  },
}

impl Error {
  /// Wrap an arbitrary backend failure with the name of the operation that
  /// produced it.
  pub fn storage(
    op: &'static str,
    source: impl Into<Box<dyn std::error::Error + Send + Sync>>,
  ) -> Self {
    Self::Storage { op, source: source.into() }
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
