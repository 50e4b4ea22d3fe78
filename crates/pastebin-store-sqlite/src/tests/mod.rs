//! Integration tests for `SqliteStore` against an in-memory database.

mod store;

use std::sync::Arc;

use pastebin_core::{
  credential::{Argon2Codec, CredentialCodec},
  identity::CallerIdentity,
};
use uuid::Uuid;

use crate::SqliteStore;

const BASE_URL: &str = "http://paste.test";

/// argon2id with the smallest accepted cost, so tests stay fast.
fn codec() -> Arc<dyn CredentialCodec> {
  Arc::new(Argon2Codec::with_params(8, 1, 1).expect("argon2 params"))
}

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory(BASE_URL, codec())
    .await
    .expect("in-memory store")
}

fn user(email: &str) -> CallerIdentity {
  CallerIdentity::new(Uuid::new_v4(), email)
}
