//! [`SqliteStore`]: the SQLite implementation of [`PasteStore`].

use std::{path::Path, sync::Arc};

use chrono::Utc;
use rusqlite::OptionalExtension as _;
use tracing::debug;
use uuid::Uuid;

use pastebin_core::{
  credential::CredentialCodec,
  paste::{NewPaste, Paste, PatchPaste},
  query::{PageRequest, PasteFilter},
  slug::{self, share_url},
  store::PasteStore,
};

use crate::{
  Error, Result,
  encode::{PASTE_SELECT, RawPaste, encode_dt, encode_uuid},
  error::OpContext as _,
  query::{filter_pastes, update_paste},
  schema::SCHEMA,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A paste store backed by a single SQLite file.
///
/// All statements run on one dedicated connection thread; each operation is a
/// single closure and, where it writes, a single transaction. Cloning is cheap.
#[derive(Clone)]
pub struct SqliteStore {
  pub(crate) conn: tokio_rusqlite::Connection,
  base_url:        Arc<str>,
  codec:           Arc<dyn CredentialCodec>,
  slugs:           fn() -> String,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  ///
  /// `base_url` prefixes the share URL recorded for each new paste.
  pub async fn open(
    path: impl AsRef<Path>,
    base_url: &str,
    codec: Arc<dyn CredentialCodec>,
  ) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path)
      .await
      .op("open database")?;
    Self::init(conn, base_url, codec).await
  }

  /// Open an in-memory store, useful for testing.
  pub async fn open_in_memory(
    base_url: &str,
    codec: Arc<dyn CredentialCodec>,
  ) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory()
      .await
      .op("open database")?;
    Self::init(conn, base_url, codec).await
  }

  /// Replace the slug generator.
  pub fn with_slug_source(mut self, source: fn() -> String) -> Self {
    self.slugs = source;
    self
  }

  async fn init(
    conn: tokio_rusqlite::Connection,
    base_url: &str,
    codec: Arc<dyn CredentialCodec>,
  ) -> Result<Self> {
    let store = Self {
      conn,
      base_url: Arc::from(base_url),
      codec,
      slugs: slug::generate,
    };
    store
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await
      .op("initialise schema")?;
    Ok(store)
  }

  async fn fetch_paste(
    &self,
    predicate: &'static str,
    key: String,
    op: &'static str,
  ) -> Result<Option<Paste>> {
    let raw: Option<RawPaste> = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            &format!("{PASTE_SELECT} WHERE {predicate} = ?1"),
            rusqlite::params![key],
            RawPaste::from_row,
          )
          .optional()?)
      })
      .await
      .op(op)?;

    raw.map(RawPaste::into_paste).transpose()
  }
}

// ─── PasteStore impl ─────────────────────────────────────────────────────────

impl PasteStore for SqliteStore {
  type Error = Error;

  async fn create(&self, owner_id: Uuid, input: NewPaste) -> Result<Paste> {
    let (is_private, password_hash) = input.protection(self.codec.as_ref())?;

    let id        = Uuid::new_v4();
    let slug      = (self.slugs)();
    let url       = share_url(&self.base_url, &slug);
    let title     = input.resolved_title().to_owned();
    let NewPaste { content, language, expires_at, .. } = input;

    let id_str     = encode_uuid(id);
    let owner_str  = encode_uuid(owner_id);
    let now_str    = encode_dt(Utc::now())?;
    let expires_at = expires_at.map(encode_dt).transpose()?;
    let slug_str   = slug.clone();

    let claimed = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        let claimed = tx.execute(
          "INSERT INTO paste_slugs (slug, issued_at) VALUES (?1, ?2)
           ON CONFLICT(slug) DO NOTHING",
          rusqlite::params![slug_str, now_str],
        )?;
        if claimed == 0 {
          return Ok(false);
        }
        tx.execute(
          "INSERT INTO pastes (
             id, owner_id, title, content, language, slug, url,
             is_private, password_hash, expires_at, created_at, updated_at
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?11)",
          rusqlite::params![
            id_str,
            owner_str,
            title,
            content,
            language,
            slug_str,
            url,
            is_private,
            password_hash,
            expires_at,
            now_str,
          ],
        )?;
        tx.commit()?;
        Ok(true)
      })
      .await
      .op("create paste")?;

    if !claimed {
      debug!(%slug, "slug already issued");
      return Err(Error::SlugTaken(slug));
    }

    self.get_by_id(id).await
  }

  async fn patch(&self, id: Uuid, patch: PatchPaste) -> Result<()> {
    let assignments = patch.assignments(self.codec.as_ref(), Utc::now())?;
    let Some(stmt) = update_paste(id, assignments)? else {
      return Ok(());
    };

    let updated = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        let n = tx.execute(&stmt.sql, rusqlite::params_from_iter(stmt.params))?;
        tx.commit()?;
        Ok(n)
      })
      .await
      .op("patch paste")?;

    if updated == 0 {
      return Err(Error::PasteNotFound(id));
    }
    Ok(())
  }

  async fn delete(&self, id: Uuid) -> Result<()> {
    let id_str = encode_uuid(id);

    let deleted = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        let n = tx.execute("DELETE FROM pastes WHERE id = ?1", rusqlite::params![id_str])?;
        tx.commit()?;
        Ok(n)
      })
      .await
      .op("delete paste")?;

    if deleted == 0 {
      return Err(Error::PasteNotFound(id));
    }
    Ok(())
  }

  async fn get_by_id(&self, id: Uuid) -> Result<Paste> {
    self
      .fetch_paste("p.id", encode_uuid(id), "get paste by id")
      .await?
      .ok_or(Error::PasteNotFound(id))
  }

  async fn get_by_slug<'a>(&'a self, slug: &'a str) -> Result<Paste> {
    self
      .fetch_paste("p.slug", slug.to_owned(), "get paste by slug")
      .await?
      .ok_or_else(|| Error::SlugNotFound(slug.to_owned()))
  }

  async fn list_by_owner(
    &self,
    owner_id: Uuid,
    page: PageRequest,
  ) -> Result<(Vec<Paste>, u64)> {
    let page      = page.normalized();
    let owner_str = encode_uuid(owner_id);
    let now_str   = encode_dt(Utc::now())?;

    let (raws, total): (Vec<RawPaste>, i64) = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        let total: i64 = tx.query_row(
          "SELECT COUNT(*) FROM pastes
           WHERE owner_id = ?1 AND (expires_at IS NULL OR expires_at >= ?2)",
          rusqlite::params![owner_str, now_str],
          |row| row.get(0),
        )?;
        let raws = {
          let mut stmt = tx.prepare(&format!(
            "{PASTE_SELECT}
             WHERE p.owner_id = ?1 AND (p.expires_at IS NULL OR p.expires_at >= ?2)
             ORDER BY p.created_at DESC, p.rowid DESC
             LIMIT ?3 OFFSET ?4"
          ))?;
          stmt
            .query_map(
              rusqlite::params![owner_str, now_str, page.limit, page.offset],
              RawPaste::from_row,
            )?
            .collect::<rusqlite::Result<Vec<_>>>()?
        };
        tx.commit()?;
        Ok((raws, total))
      })
      .await
      .op("list pastes")?;

    let pastes = raws
      .into_iter()
      .map(RawPaste::into_paste)
      .collect::<Result<Vec<_>>>()?;
    Ok((pastes, u64::try_from(total).unwrap_or_default()))
  }

  async fn filter<'a>(
    &'a self,
    owner_id: Uuid,
    filter: &'a PasteFilter,
  ) -> Result<Vec<Paste>> {
    let stmt = filter_pastes(owner_id, filter, Utc::now())?;

    let raws: Vec<RawPaste> = self
      .conn
      .call(move |conn| {
        let mut prepared = conn.prepare(&stmt.sql)?;
        let rows = prepared
          .query_map(rusqlite::params_from_iter(stmt.params), RawPaste::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await
      .op("filter pastes")?;

    raws.into_iter().map(RawPaste::into_paste).collect()
  }
}
