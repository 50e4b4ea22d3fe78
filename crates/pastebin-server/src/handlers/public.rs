//! Public share routes: `/p/:slug` (JSON) and `/raw/:slug` (plain text).
//!
//! A private paste always needs `?password=` here, even for its owner.

use axum::{
  Json,
  extract::State,
  http::header,
  response::IntoResponse,
};
use pastebin_core::{
  paste::Paste,
  store::{PasteStore, ViewLedger},
};

use super::PasswordParams;
use crate::{
  AppState,
  auth::Caller,
  error::ApiError,
  extract::{ApiPath, ApiQuery},
};

/// `GET /p/:slug[?password=]`
pub async fn share<S>(
  State(state): State<AppState<S>>,
  caller: Caller,
  ApiPath(slug): ApiPath<String>,
  ApiQuery(params): ApiQuery<PasswordParams>,
) -> Result<Json<Paste>, ApiError>
where
  S: PasteStore + ViewLedger + 'static,
{
  let paste = state
    .access
    .get_by_slug(caller.identity(), &slug, params.password.as_deref())
    .await?;
  Ok(Json(paste))
}

/// `GET /raw/:slug[?password=]`
pub async fn raw<S>(
  State(state): State<AppState<S>>,
  caller: Caller,
  ApiPath(slug): ApiPath<String>,
  ApiQuery(params): ApiQuery<PasswordParams>,
) -> Result<impl IntoResponse, ApiError>
where
  S: PasteStore + ViewLedger + 'static,
{
  let paste = state
    .access
    .get_by_slug(caller.identity(), &slug, params.password.as_deref())
    .await?;
  Ok((
    [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
    paste.content,
  ))
}
