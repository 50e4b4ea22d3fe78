//! The `PasteStore` and `ViewLedger` traits.
//!
//! Both are implemented by storage backends (e.g. `pastebin-store-sqlite`).
//! [`crate::access::PasteAccess`] depends on these abstractions, not on any
//! concrete backend.

use std::future::Future;

use uuid::Uuid;

use crate::{
  ledger::ViewRecord,
  paste::{NewPaste, Paste, PatchPaste},
  query::{LedgerOrder, PageRequest, PasteFilter},
};

/// Durable CRUD for pastes plus owner-, slug-, and filter-scoped reads.
///
/// Reads return the paste joined with its current view count. Expiration is
/// *not* applied by the point reads (`get_by_id`, `get_by_slug`); listings
/// always exclude expired pastes.
///
/// All methods return `Send` futures so the trait can be used in
/// multi-threaded async runtimes (e.g. tokio with `axum`).
pub trait PasteStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static + Into<crate::Error>;

  /// Generate a slug, resolve password protection, persist the row, and
  /// return it as freshly read. Fails with a conflict if the slug was ever
  /// issued before.
  fn create(
    &self,
    owner_id: Uuid,
    input: NewPaste,
  ) -> impl Future<Output = Result<Paste, Self::Error>> + Send + '_;

  /// Apply the present fields of `patch` and bump `updated_at`. Fails with
  /// not-found if no row matches.
  fn patch(
    &self,
    id: Uuid,
    patch: PatchPaste,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// Hard delete. Fails with not-found if no row matches.
  fn delete(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  fn get_by_id(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Paste, Self::Error>> + Send + '_;

  fn get_by_slug<'a>(
    &'a self,
    slug: &'a str,
  ) -> impl Future<Output = Result<Paste, Self::Error>> + Send + 'a;

  /// Non-expired pastes of `owner_id`, newest first, plus the total count of
  /// such pastes. `page` is normalised by the store.
  fn list_by_owner(
    &self,
    owner_id: Uuid,
    page: PageRequest,
  ) -> impl Future<Output = Result<(Vec<Paste>, u64), Self::Error>> + Send + '_;

  /// Non-expired pastes of `owner_id` matching `filter`. Never returns
  /// another owner's pastes.
  fn filter<'a>(
    &'a self,
    owner_id: Uuid,
    filter: &'a PasteFilter,
  ) -> impl Future<Output = Result<Vec<Paste>, Self::Error>> + Send + 'a;
}

/// Race-free, per-paste view counting.
pub trait ViewLedger: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static + Into<crate::Error>;

  /// Insert a record with one view, or increment the existing one, in a
  /// single atomic statement. `url` is stored only when the record is first
  /// created.
  fn record_view(
    &self,
    paste_id: Uuid,
    url: String,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// Returns `None` if no view has been recorded yet.
  fn get_by_paste_id(
    &self,
    paste_id: Uuid,
  ) -> impl Future<Output = Result<Option<ViewRecord>, Self::Error>> + Send + '_;

  /// Records of pastes currently owned by `owner_id`, ordered descending by
  /// `order`.
  fn list_for_owner(
    &self,
    owner_id: Uuid,
    order: LedgerOrder,
    page: PageRequest,
  ) -> impl Future<Output = Result<Vec<ViewRecord>, Self::Error>> + Send + '_;
}
