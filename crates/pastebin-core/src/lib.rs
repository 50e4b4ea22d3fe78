//! Core types, trait definitions, and the access engine for the paste service.
//!
//! This crate is deliberately free of HTTP and database dependencies. Storage
//! backends implement [`store::PasteStore`] and [`store::ViewLedger`]; the
//! server drives everything through [`access::PasteAccess`].

// We intentionally use native `async fn` in traits (stabilised in Rust 1.75).
// Suppress the advisory lint about `Send` bounds on the returned futures.
#![allow(async_fn_in_trait)]

pub mod access;
pub mod credential;
pub mod error;
pub mod expiry;
pub mod identity;
pub mod ledger;
pub mod paste;
pub mod query;
pub mod slug;
pub mod store;

pub use access::{PasteAccess, ViewDispatch};
pub use error::{Error, Result};
