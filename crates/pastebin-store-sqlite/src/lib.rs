//! SQLite backend for the paste service.
//!
//! Wraps [`tokio_rusqlite`] so all database access runs on a dedicated thread
//! without blocking the async runtime. [`SqliteStore`] implements both
//! [`pastebin_core::store::PasteStore`] and
//! [`pastebin_core::store::ViewLedger`].

mod encode;
mod ledger;
mod query;
mod schema;
mod store;

pub mod error;

pub use error::{Error, Result};
pub use store::SqliteStore;

#[cfg(test)]
mod tests;
