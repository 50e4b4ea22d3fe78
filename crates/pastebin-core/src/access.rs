//! [`PasteAccess`]: the authorization and visibility engine.
//!
//! Every read is resolved in a fixed order:
//!
//! 1. fetch the paste by id or slug (missing → [`Error::NotFound`]);
//! 2. an expired paste is missing for everyone, owner included;
//! 3. a private paste demands its password on the public slug route, and on
//!    the id route for anyone but the owner (missing or wrong →
//!    [`Error::Forbidden`]);
//! 4. the caller is the owner iff authenticated with the paste's `owner_id`;
//! 5. non-owner reads record a view, best effort;
//! 6. the paste is returned with the view count it was read with.
//!
//! Writes (patch, delete) and owner-scoped listings require the caller to be
//! the owner. The caller identity is always an explicit argument.

use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::{
  Error, Result,
  credential::CredentialCodec,
  identity::CallerIdentity,
  ledger::ViewRecord,
  paste::{NewPaste, Paste, PatchPaste},
  query::{LedgerOrder, PageRequest, PasteFilter, PastePage},
  store::{PasteStore, ViewLedger},
};

/// Attempts made by [`PasteAccess::create`] before a slug collision is
/// reported to the caller.
pub const MAX_SLUG_ATTEMPTS: usize = 5;

/// How the view-count upsert of a qualifying read is run.
///
/// Either way a failure is logged and never fails the read; the count
/// returned to the reader is the one observed before its own view lands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ViewDispatch {
  /// Await the upsert after the read, before returning.
  #[default]
  Inline,
  /// Spawn the upsert onto the tokio runtime and return immediately.
  Detached,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Route {
  Id,
  Slug,
}

/// Orchestrates a [`PasteStore`] + [`ViewLedger`] backend and a
/// [`CredentialCodec`].
///
/// Cloning is cheap; the backend and codec are reference-counted.
pub struct PasteAccess<S> {
  store:    Arc<S>,
  codec:    Arc<dyn CredentialCodec>,
  dispatch: ViewDispatch,
}

impl<S> Clone for PasteAccess<S> {
  fn clone(&self) -> Self {
    Self {
      store:    Arc::clone(&self.store),
      codec:    Arc::clone(&self.codec),
      dispatch: self.dispatch,
    }
  }
}

impl<S> PasteAccess<S>
where
  S: PasteStore + ViewLedger + 'static,
{
  pub fn new(store: Arc<S>, codec: Arc<dyn CredentialCodec>) -> Self {
    Self { store, codec, dispatch: ViewDispatch::default() }
  }

  pub fn with_view_dispatch(mut self, dispatch: ViewDispatch) -> Self {
    self.dispatch = dispatch;
    self
  }

  pub fn store(&self) -> &Arc<S> { &self.store }

  // ── Writes ──────────────────────────────────────────────────────────────

  /// Create a paste owned by the caller, retrying slug collisions up to
  /// [`MAX_SLUG_ATTEMPTS`] times.
  pub async fn create(
    &self,
    caller: Option<&CallerIdentity>,
    input: NewPaste,
  ) -> Result<Paste> {
    let caller = require_caller(caller)?;

    let mut attempt = 1;
    loop {
      match self
        .store
        .create(caller.user_id, input.clone())
        .await
        .map_err(Into::<Error>::into)
      {
        Ok(paste) => {
          info!(paste_id = %paste.id, owner_id = %caller.user_id, "paste created");
          return Ok(paste);
        }
        Err(Error::Conflict(reason)) if attempt < MAX_SLUG_ATTEMPTS => {
          debug!(attempt, %reason, "slug collision, retrying with a fresh slug");
          attempt += 1;
        }
        Err(e) => return Err(e),
      }
    }
  }

  /// Apply `patch` to a live paste owned by the caller.
  pub async fn patch(
    &self,
    caller: Option<&CallerIdentity>,
    id: Uuid,
    patch: PatchPaste,
  ) -> Result<()> {
    let paste = self.owned_live_paste(caller, id).await?;
    if patch.is_empty() {
      return Err(Error::Validation("patch must set at least one field".into()));
    }
    self.store.patch(paste.id, patch).await.map_err(Into::<Error>::into)
  }

  /// Delete a live paste owned by the caller. Its view record is left in
  /// place.
  pub async fn delete(&self, caller: Option<&CallerIdentity>, id: Uuid) -> Result<()> {
    let paste = self.owned_live_paste(caller, id).await?;
    self.store.delete(paste.id).await.map_err(Into::<Error>::into)?;
    info!(paste_id = %paste.id, "paste deleted");
    Ok(())
  }

  // ── Reads ───────────────────────────────────────────────────────────────

  pub async fn get_by_id(
    &self,
    caller: Option<&CallerIdentity>,
    id: Uuid,
    password: Option<&str>,
  ) -> Result<Paste> {
    let paste = self.store.get_by_id(id).await.map_err(Into::<Error>::into)?;
    self.resolve_read(caller, paste, Route::Id, password).await
  }

  /// The public route. A private paste always demands its password here, even
  /// from its owner.
  pub async fn get_by_slug(
    &self,
    caller: Option<&CallerIdentity>,
    slug: &str,
    password: Option<&str>,
  ) -> Result<Paste> {
    let paste = self.store.get_by_slug(slug).await.map_err(Into::<Error>::into)?;
    self.resolve_read(caller, paste, Route::Slug, password).await
  }

  pub async fn list(
    &self,
    caller: Option<&CallerIdentity>,
    page: PageRequest,
  ) -> Result<PastePage> {
    let caller = require_caller(caller)?;
    let page = page.normalized();
    let (pastes, total) = self
      .store
      .list_by_owner(caller.user_id, page)
      .await
      .map_err(Into::<Error>::into)?;
    Ok(PastePage::new(pastes, total, page))
  }

  pub async fn filter(
    &self,
    caller: Option<&CallerIdentity>,
    filter: &PasteFilter,
  ) -> Result<Vec<Paste>> {
    let caller = require_caller(caller)?;
    self
      .store
      .filter(caller.user_id, filter)
      .await
      .map_err(Into::<Error>::into)
  }

  // ── Analytics ───────────────────────────────────────────────────────────

  /// The view record of a live paste owned by the caller, if any view has
  /// been recorded.
  pub async fn view_record(
    &self,
    caller: Option<&CallerIdentity>,
    id: Uuid,
  ) -> Result<Option<ViewRecord>> {
    let paste = self.owned_live_paste(caller, id).await?;
    self
      .store
      .get_by_paste_id(paste.id)
      .await
      .map_err(Into::<Error>::into)
  }

  pub async fn view_records(
    &self,
    caller: Option<&CallerIdentity>,
    order: LedgerOrder,
    page: PageRequest,
  ) -> Result<Vec<ViewRecord>> {
    let caller = require_caller(caller)?;
    self
      .store
      .list_for_owner(caller.user_id, order, page.normalized())
      .await
      .map_err(Into::<Error>::into)
  }

  // ── Helpers ─────────────────────────────────────────────────────────────

  async fn resolve_read(
    &self,
    caller: Option<&CallerIdentity>,
    paste: Paste,
    route: Route,
    password: Option<&str>,
  ) -> Result<Paste> {
    if paste.is_expired_at(Utc::now()) {
      return Err(Error::NotFound);
    }

    let is_owner = paste.is_owned_by(caller);
    let gated = paste.is_private && (route == Route::Slug || !is_owner);
    if gated && !self.password_matches(&paste, password) {
      debug!(paste_id = %paste.id, ?route, "password gate denied read");
      return Err(Error::Forbidden);
    }

    if !is_owner {
      self.record_view(&paste).await;
    }
    Ok(paste)
  }

  fn password_matches(&self, paste: &Paste, password: Option<&str>) -> bool {
    match (paste.password_hash.as_deref(), password) {
      (Some(hash), Some(plaintext)) if !hash.is_empty() && !plaintext.is_empty() => {
        self.codec.verify(hash, plaintext)
      }
      _ => false,
    }
  }

  async fn record_view(&self, paste: &Paste) {
    let paste_id = paste.id;
    let url = paste.url.clone();
    match self.dispatch {
      ViewDispatch::Inline => {
        if let Err(e) = self.store.record_view(paste_id, url).await {
          warn!(%paste_id, error = %e, "failed to record view");
        }
      }
      ViewDispatch::Detached => {
        let store = Arc::clone(&self.store);
        tokio::spawn(async move {
          if let Err(e) = store.record_view(paste_id, url).await {
            warn!(%paste_id, error = %e, "failed to record view");
          }
        });
      }
    }
  }

  /// Steps 1–2 of the read path, followed by the ownership check for writes.
  async fn owned_live_paste(
    &self,
    caller: Option<&CallerIdentity>,
    id: Uuid,
  ) -> Result<Paste> {
    let caller = require_caller(caller)?;
    let paste = self.store.get_by_id(id).await.map_err(Into::<Error>::into)?;
    if paste.is_expired_at(Utc::now()) {
      return Err(Error::NotFound);
    }
    if paste.owner_id != caller.user_id {
      debug!(paste_id = %paste.id, caller = %caller.user_id, "caller does not own paste");
      return Err(Error::Forbidden);
    }
    Ok(paste)
  }
}

fn require_caller(caller: Option<&CallerIdentity>) -> Result<&CallerIdentity> {
  caller.ok_or(Error::Forbidden)
}
