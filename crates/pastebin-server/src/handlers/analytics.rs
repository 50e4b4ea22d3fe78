//! Owner-only view analytics.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/pastes/:id/views` | `null` until the first counted view |
//! | `GET`  | `/analytics` | `?order=created_at\|updated_at\|views&limit&offset`, descending |

use axum::{
  Json,
  extract::State,
};
use pastebin_core::{
  ledger::ViewRecord,
  query::LedgerOrder,
  store::{PasteStore, ViewLedger},
};
use serde::Deserialize;
use uuid::Uuid;

use crate::{
  AppState,
  auth::Caller,
  error::ApiError,
  extract::{ApiPath, ApiQuery},
};

/// `GET /pastes/:id/views`
pub async fn for_paste<S>(
  State(state): State<AppState<S>>,
  caller: Caller,
  ApiPath(id): ApiPath<Uuid>,
) -> Result<Json<Option<ViewRecord>>, ApiError>
where
  S: PasteStore + ViewLedger + 'static,
{
  let record = state.access.view_record(caller.identity(), id).await?;
  Ok(Json(record))
}

#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
  pub order:  Option<String>,
  pub limit:  Option<i64>,
  pub offset: Option<i64>,
}

/// `GET /analytics`
pub async fn list<S>(
  State(state): State<AppState<S>>,
  caller: Caller,
  ApiQuery(params): ApiQuery<ListParams>,
) -> Result<Json<Vec<ViewRecord>>, ApiError>
where
  S: PasteStore + ViewLedger + 'static,
{
  let order = params
    .order
    .as_deref()
    .map(LedgerOrder::parse_lossy)
    .unwrap_or_default();
  let page = super::PageParams { limit: params.limit, offset: params.offset }.page();

  let records = state.access.view_records(caller.identity(), order, page).await?;
  Ok(Json(records))
}
