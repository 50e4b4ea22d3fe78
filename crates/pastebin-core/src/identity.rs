//! The verified identity of whoever issued a request.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A caller whose credential has already been verified by the transport
/// layer. Anonymous callers are represented by `None` wherever an
/// `Option<&CallerIdentity>` is accepted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallerIdentity {
  pub user_id: Uuid,
  pub email:   String,
}

impl CallerIdentity {
  pub fn new(user_id: Uuid, email: impl Into<String>) -> Self {
    Self { user_id, email: email.into() }
  }
}
