//! View ledger records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The per-paste view counter. Created lazily on the first qualifying read
/// and only ever incremented afterwards. A record may outlive its paste.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewRecord {
  pub paste_id:   Uuid,
  pub views:      u64,
  /// Share URL captured when the record was first created; never rewritten.
  pub first_url:  String,
  /// Time of the first qualifying view.
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
}
