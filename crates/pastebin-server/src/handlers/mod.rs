//! Route handlers, grouped by resource.

pub mod analytics;
pub mod pastes;
pub mod public;

use pastebin_core::query::{DEFAULT_PAGE_LIMIT, PageRequest};
use serde::Deserialize;

/// `?password=` on read routes.
#[derive(Debug, Default, Deserialize)]
pub struct PasswordParams {
  pub password: Option<String>,
}

/// `?limit=&offset=`; normalised by the engine.
#[derive(Debug, Default, Deserialize)]
pub struct PageParams {
  pub limit:  Option<i64>,
  pub offset: Option<i64>,
}

impl PageParams {
  pub fn page(&self) -> PageRequest {
    PageRequest::new(
      self.limit.unwrap_or(DEFAULT_PAGE_LIMIT),
      self.offset.unwrap_or(0),
    )
  }
}
