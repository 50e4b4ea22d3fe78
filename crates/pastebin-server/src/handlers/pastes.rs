//! Handlers for `/pastes` endpoints.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `POST`   | `/pastes` | Optional `?expires_in=24h`; 201 with `Location` |
//! | `GET`    | `/pastes` | `?limit&offset`; the caller's own pastes |
//! | `GET`    | `/pastes/filter` | `?languages=a,b&date_from&date_to&sort_by&sort_order` |
//! | `GET`    | `/pastes/:id` | Optional `?password=` |
//! | `PATCH`  | `/pastes/:id` | Owner only; 204 |
//! | `DELETE` | `/pastes/:id` | Owner only; 204 |

use axum::{
  Json,
  extract::State,
  http::{StatusCode, header},
  response::IntoResponse,
};
use chrono::{DateTime, Utc};
use pastebin_core::{
  expiry,
  paste::{NewPaste, Paste, PatchPaste},
  query::{PasteFilter, PastePage, SortColumn, SortOrder},
  store::{PasteStore, ViewLedger},
};
use serde::Deserialize;
use uuid::Uuid;

use super::{PageParams, PasswordParams};
use crate::{
  AppState,
  auth::Caller,
  error::ApiError,
  extract::{ApiJson, ApiPath, ApiQuery},
};

// ─── Create ───────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct CreateParams {
  pub expires_in: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CreateBody {
  #[serde(default)]
  pub title:    String,
  pub content:  String,
  #[serde(default)]
  pub language: String,
  pub password: Option<String>,
}

/// `POST /pastes[?expires_in=<duration>]`
pub async fn create<S>(
  State(state): State<AppState<S>>,
  caller: Caller,
  ApiQuery(params): ApiQuery<CreateParams>,
  ApiJson(body): ApiJson<CreateBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: PasteStore + ViewLedger + 'static,
{
  // An empty `expires_in` means the paste never expires.
  let expires_at = params
    .expires_in
    .as_deref()
    .filter(|d| !d.is_empty())
    .map(|d| expiry::expires_at(Utc::now(), d))
    .transpose()?;

  let input = NewPaste {
    title: body.title,
    content: body.content,
    language: body.language,
    password: body.password,
    expires_at,
  };
  let paste = state.access.create(caller.identity(), input).await?;
  let location = format!(
    "{}/pastes/{}",
    state.config.base_url.trim_end_matches('/'),
    paste.id
  );
  Ok((StatusCode::CREATED, [(header::LOCATION, location)], Json(paste)))
}

// ─── List ─────────────────────────────────────────────────────────────────────

/// `GET /pastes[?limit=&offset=]`
pub async fn list<S>(
  State(state): State<AppState<S>>,
  caller: Caller,
  ApiQuery(params): ApiQuery<PageParams>,
) -> Result<Json<PastePage>, ApiError>
where
  S: PasteStore + ViewLedger + 'static,
{
  let page = state.access.list(caller.identity(), params.page()).await?;
  Ok(Json(page))
}

// ─── Filter ───────────────────────────────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
pub struct FilterParams {
  /// Comma-separated language labels.
  pub languages:  Option<String>,
  pub date_from:  Option<DateTime<Utc>>,
  pub date_to:    Option<DateTime<Utc>>,
  pub sort_by:    Option<String>,
  pub sort_order: Option<String>,
}

impl FilterParams {
  fn into_filter(self) -> PasteFilter {
    let languages = self
      .languages
      .as_deref()
      .map(|list| {
        list
          .split(',')
          .map(str::trim)
          .filter(|l| !l.is_empty())
          .map(str::to_owned)
          .collect()
      })
      .unwrap_or_default();

    PasteFilter {
      languages,
      date_from: self.date_from,
      date_to: self.date_to,
      sort_by: self
        .sort_by
        .as_deref()
        .map(SortColumn::parse_lossy)
        .unwrap_or_default(),
      sort_order: self
        .sort_order
        .as_deref()
        .map(SortOrder::parse_lossy)
        .unwrap_or_default(),
    }
  }
}

/// `GET /pastes/filter`
pub async fn filter<S>(
  State(state): State<AppState<S>>,
  caller: Caller,
  ApiQuery(params): ApiQuery<FilterParams>,
) -> Result<Json<Vec<Paste>>, ApiError>
where
  S: PasteStore + ViewLedger + 'static,
{
  let filter = params.into_filter();
  let pastes = state.access.filter(caller.identity(), &filter).await?;
  Ok(Json(pastes))
}

// ─── Get one ──────────────────────────────────────────────────────────────────

/// `GET /pastes/:id[?password=]`
pub async fn get_one<S>(
  State(state): State<AppState<S>>,
  caller: Caller,
  ApiPath(id): ApiPath<Uuid>,
  ApiQuery(params): ApiQuery<PasswordParams>,
) -> Result<Json<Paste>, ApiError>
where
  S: PasteStore + ViewLedger + 'static,
{
  let paste = state
    .access
    .get_by_id(caller.identity(), id, params.password.as_deref())
    .await?;
  Ok(Json(paste))
}

// ─── Patch ────────────────────────────────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
pub struct PatchBody {
  pub title:      Option<String>,
  pub content:    Option<String>,
  pub language:   Option<String>,
  pub is_private: Option<bool>,
  pub password:   Option<String>,
}

impl From<PatchBody> for PatchPaste {
  fn from(body: PatchBody) -> Self {
    PatchPaste {
      title:      body.title,
      content:    body.content,
      language:   body.language,
      is_private: body.is_private,
      password:   body.password,
    }
  }
}

/// `PATCH /pastes/:id`
pub async fn patch_one<S>(
  State(state): State<AppState<S>>,
  caller: Caller,
  ApiPath(id): ApiPath<Uuid>,
  ApiJson(body): ApiJson<PatchBody>,
) -> Result<StatusCode, ApiError>
where
  S: PasteStore + ViewLedger + 'static,
{
  state.access.patch(caller.identity(), id, body.into()).await?;
  Ok(StatusCode::NO_CONTENT)
}

// ─── Delete ───────────────────────────────────────────────────────────────────

/// `DELETE /pastes/:id`
pub async fn delete_one<S>(
  State(state): State<AppState<S>>,
  caller: Caller,
  ApiPath(id): ApiPath<Uuid>,
) -> Result<StatusCode, ApiError>
where
  S: PasteStore + ViewLedger + 'static,
{
  state.access.delete(caller.identity(), id).await?;
  Ok(StatusCode::NO_CONTENT)
}
