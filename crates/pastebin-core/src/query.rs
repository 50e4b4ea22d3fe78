//! Filter, sort, and paging parameters.
//!
//! Sort keys are closed enums. Storage backends turn them into query text with
//! an exhaustive `match`, so caller-supplied strings never reach the query
//! structure.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::paste::Paste;

pub const DEFAULT_PAGE_LIMIT: i64 = 10;
pub const MAX_PAGE_LIMIT: i64 = 100;

// ─── Sorting ─────────────────────────────────────────────────────────────────

/// Columns a paste listing may be ordered by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortColumn {
  #[default]
  CreatedAt,
  UpdatedAt,
  Views,
  Title,
}

impl SortColumn {
  /// Unrecognised keys fall back to [`SortColumn::CreatedAt`].
  pub fn parse_lossy(key: &str) -> Self {
    match key {
      "created_at" => Self::CreatedAt,
      "updated_at" => Self::UpdatedAt,
      "views" => Self::Views,
      "title" => Self::Title,
      _ => Self::default(),
    }
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
  Asc,
  #[default]
  Desc,
}

impl SortOrder {
  /// Anything other than `asc` (any case) is descending.
  pub fn parse_lossy(order: &str) -> Self {
    if order.eq_ignore_ascii_case("asc") { Self::Asc } else { Self::Desc }
  }
}

/// Columns the owner analytics listing may be ordered by (always descending).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LedgerOrder {
  #[default]
  CreatedAt,
  UpdatedAt,
  Views,
}

impl LedgerOrder {
  pub fn parse_lossy(key: &str) -> Self {
    match key {
      "updated_at" => Self::UpdatedAt,
      "views" => Self::Views,
      _ => Self::CreatedAt,
    }
  }
}

// ─── Filter ──────────────────────────────────────────────────────────────────

/// Parameters for [`crate::store::PasteStore::filter`]. Results are always
/// scoped to one owner and exclude expired pastes.
#[derive(Debug, Clone, Default)]
pub struct PasteFilter {
  /// Set-membership filter on `language`; empty means any language.
  pub languages:  Vec<String>,
  /// Inclusive lower bound on `created_at`.
  pub date_from:  Option<DateTime<Utc>>,
  /// Inclusive upper bound on `created_at`.
  pub date_to:    Option<DateTime<Utc>>,
  pub sort_by:    SortColumn,
  pub sort_order: SortOrder,
}

// ─── Paging ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
  pub limit:  i64,
  pub offset: i64,
}

impl Default for PageRequest {
  fn default() -> Self { Self { limit: DEFAULT_PAGE_LIMIT, offset: 0 } }
}

impl PageRequest {
  pub fn new(limit: i64, offset: i64) -> Self { Self { limit, offset } }

  /// Non-positive limits become the default, large limits are capped, and
  /// negative offsets become zero.
  pub fn normalized(self) -> Self {
    let limit = if self.limit <= 0 {
      DEFAULT_PAGE_LIMIT
    } else {
      self.limit.min(MAX_PAGE_LIMIT)
    };
    Self { limit, offset: self.offset.max(0) }
  }
}

/// One page of an owner's pastes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PastePage {
  pub pastes:   Vec<Paste>,
  pub total:    u64,
  pub limit:    i64,
  pub offset:   i64,
  pub has_more: bool,
}

impl PastePage {
  pub fn new(pastes: Vec<Paste>, total: u64, page: PageRequest) -> Self {
    let page = page.normalized();
    let has_more = u64::try_from(page.offset.saturating_add(page.limit))
      .map(|end| end < total)
      .unwrap_or(false);
    Self { pastes, total, limit: page.limit, offset: page.offset, has_more }
  }
}
