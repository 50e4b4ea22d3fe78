//! Paste types: the central entity of the service.
//!
//! A paste is created once (its id and slug never change), mutated through
//! sparse [`PatchPaste`] descriptors, and removed either by an explicit delete
//! or passively once `expires_at` has passed.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{Result, credential::CredentialCodec, identity::CallerIdentity};

/// Title given to pastes created or patched with an empty title.
pub const DEFAULT_TITLE: &str = "Untitled";

// ─── Paste ───────────────────────────────────────────────────────────────────

/// A stored paste joined with its current view count.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Paste {
  pub id:            Uuid,
  pub owner_id:      Uuid,
  pub title:         String,
  pub content:       String,
  /// Free-form label, used only for filtering.
  pub language:      String,
  pub slug:          String,
  /// Canonical share URL, fixed at creation.
  pub url:           String,
  pub is_private:    bool,
  /// Never part of any outward representation.
  #[serde(skip)]
  pub password_hash: Option<String>,
  pub views:         u64,
  pub expires_at:    Option<DateTime<Utc>>,
  pub created_at:    DateTime<Utc>,
  pub updated_at:    DateTime<Utc>,
}

impl Paste {
  /// A paste is gone for everyone once `now` is past its expiry.
  pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
    self.expires_at.is_some_and(|at| now > at)
  }

  pub fn is_owned_by(&self, caller: Option<&CallerIdentity>) -> bool {
    caller.is_some_and(|c| c.user_id == self.owner_id)
  }
}

// ─── NewPaste ────────────────────────────────────────────────────────────────

/// Input to [`crate::store::PasteStore::create`]. The id, slug, URL, and
/// timestamps are always assigned by the store.
#[derive(Debug, Clone, Default)]
pub struct NewPaste {
  pub title:      String,
  pub content:    String,
  pub language:   String,
  /// Empty or absent means public; anything else is hashed and the paste is
  /// marked private.
  pub password:   Option<String>,
  pub expires_at: Option<DateTime<Utc>>,
}

impl NewPaste {
  /// Convenience constructor with every optional field left empty.
  pub fn new(content: impl Into<String>) -> Self {
    Self { content: content.into(), ..Self::default() }
  }

  pub fn resolved_title(&self) -> &str { non_empty_title(&self.title) }

  /// Resolve the password into `(is_private, password_hash)`.
  pub fn protection(
    &self,
    codec: &dyn CredentialCodec,
  ) -> Result<(bool, Option<String>)> {
    match self.password.as_deref() {
      None | Some("") => Ok((false, None)),
      Some(plaintext) => Ok((true, Some(codec.hash(plaintext)?))),
    }
  }
}

fn non_empty_title(title: &str) -> &str {
  if title.is_empty() { DEFAULT_TITLE } else { title }
}

// ─── PatchPaste ──────────────────────────────────────────────────────────────

/// A sparse update. `None` leaves a field untouched; `Some("")` for
/// `password` removes password protection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PatchPaste {
  pub title:      Option<String>,
  pub content:    Option<String>,
  pub language:   Option<String>,
  /// Explicit override; wins over the value implied by `password`.
  pub is_private: Option<bool>,
  pub password:   Option<String>,
}

/// The closed set of columns a patch may write. Column names only ever come
/// from [`PasteColumn::name`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PasteColumn {
  Title,
  Content,
  Language,
  IsPrivate,
  PasswordHash,
  UpdatedAt,
}

impl PasteColumn {
  pub const fn name(self) -> &'static str {
    match self {
      Self::Title => "title",
      Self::Content => "content",
      Self::Language => "language",
      Self::IsPrivate => "is_private",
      Self::PasswordHash => "password_hash",
      Self::UpdatedAt => "updated_at",
    }
  }
}

/// A value bound to a [`PasteColumn`] by a patch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColumnValue {
  Text(String),
  Bool(bool),
  Timestamp(DateTime<Utc>),
  Null,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assignment {
  pub column: PasteColumn,
  pub value:  ColumnValue,
}

impl Assignment {
  fn new(column: PasteColumn, value: ColumnValue) -> Self {
    Self { column, value }
  }
}

impl PatchPaste {
  /// `true` if the patch targets no field at all.
  pub fn is_empty(&self) -> bool {
    self.title.is_none()
      && self.content.is_none()
      && self.language.is_none()
      && self.is_private.is_none()
      && self.password.is_none()
  }

  /// Turn the patch into the column assignments to apply.
  ///
  /// Passwords are hashed here, and `is_private` is derived from the password
  /// unless the patch overrides it. `updated_at` is always bumped to `now`.
  pub fn assignments(
    &self,
    codec: &dyn CredentialCodec,
    now: DateTime<Utc>,
  ) -> Result<Vec<Assignment>> {
    use ColumnValue::{Bool, Null, Text, Timestamp};

    let mut out = Vec::new();

    if let Some(title) = &self.title {
      out.push(Assignment::new(
        PasteColumn::Title,
        Text(non_empty_title(title).to_owned()),
      ));
    }
    if let Some(content) = &self.content {
      out.push(Assignment::new(PasteColumn::Content, Text(content.clone())));
    }
    if let Some(language) = &self.language {
      out.push(Assignment::new(PasteColumn::Language, Text(language.clone())));
    }

    let implied_private = match self.password.as_deref() {
      None => None,
      Some("") => {
        out.push(Assignment::new(PasteColumn::PasswordHash, Null));
        Some(false)
      }
      Some(plaintext) => {
        let hash = codec.hash(plaintext)?;
        out.push(Assignment::new(PasteColumn::PasswordHash, Text(hash)));
        Some(true)
      }
    };

    if let Some(is_private) = self.is_private.or(implied_private) {
      out.push(Assignment::new(PasteColumn::IsPrivate, Bool(is_private)));
    }

    out.push(Assignment::new(PasteColumn::UpdatedAt, Timestamp(now)));
    Ok(out)
  }
}
