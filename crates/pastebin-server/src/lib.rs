//! HTTP layer for the paste service.
//!
//! Exposes an axum [`Router`] over a [`PasteAccess`] engine backed by any
//! store implementing [`PasteStore`] and [`ViewLedger`]. Bearer tokens are
//! resolved into an optional caller identity by [`auth::Caller`]; every
//! authorization decision is left to the engine.

pub mod auth;
pub mod error;
pub mod extract;
pub mod handlers;

pub use error::ApiError;

use std::{path::PathBuf, sync::Arc};

use axum::{Router, routing::get};
use pastebin_core::{
  PasteAccess,
  store::{PasteStore, ViewLedger},
};
use serde::Deserialize;
use tower_http::trace::TraceLayer;

use auth::JwtIdentity;
use handlers::{analytics, pastes, public};

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml` and
/// `PASTEBIN_*` environment variables.
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
  #[serde(default = "default_host")]
  pub host:                  String,
  #[serde(default = "default_port")]
  pub port:                  u16,
  /// Prefix of every share URL, e.g. `https://paste.example`.
  #[serde(default = "default_base_url")]
  pub base_url:              String,
  #[serde(default = "default_store_path")]
  pub store_path:            PathBuf,
  /// HS256 secret for bearer tokens.
  pub jwt_secret:            String,
  #[serde(default = "default_detach_view_recording")]
  pub detach_view_recording: bool,
}

fn default_host() -> String { "127.0.0.1".to_owned() }
fn default_port() -> u16 { 8080 }
fn default_base_url() -> String { "http://localhost:8080".to_owned() }
fn default_store_path() -> PathBuf { PathBuf::from("pastebin.db") }
fn default_detach_view_recording() -> bool { true }

// ─── Application state ────────────────────────────────────────────────────────

/// Shared state threaded through all axum handlers.
pub struct AppState<S> {
  pub access:   PasteAccess<S>,
  pub identity: Arc<JwtIdentity>,
  pub config:   Arc<ServerConfig>,
}

impl<S> Clone for AppState<S> {
  fn clone(&self) -> Self {
    Self {
      access:   self.access.clone(),
      identity: Arc::clone(&self.identity),
      config:   Arc::clone(&self.config),
    }
  }
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build the axum [`Router`] for the paste API.
pub fn router<S>(state: AppState<S>) -> Router
where
  S: PasteStore + ViewLedger + 'static,
{
  Router::new()
    .route("/pastes", get(pastes::list::<S>).post(pastes::create::<S>))
    .route("/pastes/filter", get(pastes::filter::<S>))
    .route(
      "/pastes/{id}",
      get(pastes::get_one::<S>)
        .patch(pastes::patch_one::<S>)
        .delete(pastes::delete_one::<S>),
    )
    .route("/pastes/{id}/views", get(analytics::for_paste::<S>))
    .route("/p/{slug}", get(public::share::<S>))
    .route("/raw/{slug}", get(public::raw::<S>))
    .route("/analytics", get(analytics::list::<S>))
    .layer(TraceLayer::new_for_http())
    .with_state(state)
}

// ─── Integration tests ────────────────────────────────────────────────────────
