//! The SQLite implementation of [`ViewLedger`].
//!
//! Counting is a single upsert statement, so concurrent readers never lose an
//! increment regardless of how their futures interleave.

use chrono::Utc;
use rusqlite::OptionalExtension as _;
use uuid::Uuid;

use pastebin_core::{
  ledger::ViewRecord,
  query::{LedgerOrder, PageRequest},
  store::ViewLedger,
};

use crate::{
  Error, Result, SqliteStore,
  encode::{RawViewRecord, VIEW_RECORD_SELECT, encode_dt, encode_uuid},
  error::OpContext as _,
  query::owner_view_records,
};

impl ViewLedger for SqliteStore {
  type Error = Error;

  async fn record_view(&self, paste_id: Uuid, url: String) -> Result<()> {
    let id_str  = encode_uuid(paste_id);
    let now_str = encode_dt(Utc::now())?;

    self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        tx.execute(
          "INSERT INTO paste_view_records (paste_id, views, first_url, created_at, updated_at)
           VALUES (?1, 1, ?2, ?3, ?3)
           ON CONFLICT(paste_id) DO UPDATE SET
             views      = views + 1,
             updated_at = excluded.updated_at",
          rusqlite::params![id_str, url, now_str],
        )?;
        tx.commit()?;
        Ok(())
      })
      .await
      .op("record view")
  }

  async fn get_by_paste_id(&self, paste_id: Uuid) -> Result<Option<ViewRecord>> {
    let id_str = encode_uuid(paste_id);

    let raw: Option<RawViewRecord> = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            &format!("{VIEW_RECORD_SELECT} WHERE v.paste_id = ?1"),
            rusqlite::params![id_str],
            RawViewRecord::from_row,
          )
          .optional()?)
      })
      .await
      .op("get view record")?;

    raw.map(RawViewRecord::into_record).transpose()
  }

  async fn list_for_owner(
    &self,
    owner_id: Uuid,
    order: LedgerOrder,
    page: PageRequest,
  ) -> Result<Vec<ViewRecord>> {
    let page = page.normalized();
    let stmt = owner_view_records(owner_id, order, page.limit, page.offset);

    let raws: Vec<RawViewRecord> = self
      .conn
      .call(move |conn| {
        let mut prepared = conn.prepare(&stmt.sql)?;
        let rows = prepared
          .query_map(rusqlite::params_from_iter(stmt.params), RawViewRecord::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await
      .op("list view records")?;

    raws.into_iter().map(RawViewRecord::into_record).collect()
  }
}
