//! Dynamic SQL for filtered listings and sparse updates.
//!
//! Only values are ever bound as parameters. Everything that shapes the
//! statement (column names, sort keys, directions) comes from an exhaustive
//! `match` over a closed enum.

use chrono::{DateTime, Utc};
use pastebin_core::{
  paste::Assignment,
  query::{LedgerOrder, PasteFilter, SortColumn, SortOrder},
};
use rusqlite::types::Value;
use uuid::Uuid;

use crate::{
  Result,
  encode::{
    PASTE_SELECT, VIEW_RECORD_SELECT, encode_column_value, encode_dt, encode_uuid,
  },
};

/// A statement together with its positional parameters.
#[derive(Debug)]
pub struct Statement {
  pub sql:    String,
  pub params: Vec<Value>,
}

impl Statement {
  fn new(sql: impl Into<String>) -> Self {
    Self { sql: sql.into(), params: Vec::new() }
  }

  /// Bind `value` and return its `?N` placeholder.
  fn bind(&mut self, value: Value) -> String {
    self.params.push(value);
    format!("?{}", self.params.len())
  }
}

fn sort_column_sql(column: SortColumn) -> &'static str {
  match column {
    SortColumn::CreatedAt => "p.created_at",
    SortColumn::UpdatedAt => "p.updated_at",
    SortColumn::Views => "views",
    SortColumn::Title => "p.title",
  }
}

fn sort_order_sql(order: SortOrder) -> &'static str {
  match order {
    SortOrder::Asc => "ASC",
    SortOrder::Desc => "DESC",
  }
}

fn ledger_order_sql(order: LedgerOrder) -> &'static str {
  match order {
    LedgerOrder::CreatedAt => "v.created_at",
    LedgerOrder::UpdatedAt => "v.updated_at",
    LedgerOrder::Views => "v.views",
  }
}

/// Non-expired pastes of `owner_id` matching `filter`.
///
/// Ties on the sort key are broken by insertion order in the same direction.
pub fn filter_pastes(
  owner_id: Uuid,
  filter: &PasteFilter,
  now: DateTime<Utc>,
) -> Result<Statement> {
  let mut stmt = Statement::new(PASTE_SELECT);

  let owner = stmt.bind(Value::Text(encode_uuid(owner_id)));
  let now = stmt.bind(Value::Text(encode_dt(now)?));
  let mut clauses = vec![
    format!("p.owner_id = {owner}"),
    format!("(p.expires_at IS NULL OR p.expires_at >= {now})"),
  ];

  if !filter.languages.is_empty() {
    let placeholders = filter
      .languages
      .iter()
      .map(|lang| stmt.bind(Value::Text(lang.clone())))
      .collect::<Vec<_>>()
      .join(", ");
    clauses.push(format!("p.language IN ({placeholders})"));
  }
  if let Some(from) = filter.date_from {
    let from = stmt.bind(Value::Text(encode_dt(from)?));
    clauses.push(format!("p.created_at >= {from}"));
  }
  if let Some(to) = filter.date_to {
    let to = stmt.bind(Value::Text(encode_dt(to)?));
    clauses.push(format!("p.created_at <= {to}"));
  }

  let direction = sort_order_sql(filter.sort_order);
  stmt.sql = format!(
    "{} WHERE {} ORDER BY {} {direction}, p.rowid {direction}",
    stmt.sql,
    clauses.join(" AND "),
    sort_column_sql(filter.sort_by),
  );
  Ok(stmt)
}

/// View records of pastes that currently exist and belong to `owner_id`.
pub fn owner_view_records(
  owner_id: Uuid,
  order: LedgerOrder,
  limit: i64,
  offset: i64,
) -> Statement {
  let mut stmt = Statement::new(VIEW_RECORD_SELECT);
  let owner = stmt.bind(Value::Text(encode_uuid(owner_id)));
  let limit = stmt.bind(Value::Integer(limit));
  let offset = stmt.bind(Value::Integer(offset));
  stmt.sql = format!(
    "{} JOIN pastes p ON p.id = v.paste_id
     WHERE p.owner_id = {owner}
     ORDER BY {} DESC, v.rowid DESC
     LIMIT {limit} OFFSET {offset}",
    stmt.sql,
    ledger_order_sql(order),
  );
  stmt
}

/// `UPDATE pastes SET … WHERE id = ?`, or `None` for an empty assignment
/// list.
pub fn update_paste(
  id: Uuid,
  assignments: Vec<Assignment>,
) -> Result<Option<Statement>> {
  if assignments.is_empty() {
    return Ok(None);
  }

  let mut stmt = Statement::new("");
  let mut sets = Vec::with_capacity(assignments.len());
  for a in assignments {
    let placeholder = stmt.bind(encode_column_value(a.value)?);
    sets.push(format!("{} = {placeholder}", a.column.name()));
  }
  let id = stmt.bind(Value::Text(encode_uuid(id)));
  stmt.sql = format!("UPDATE pastes SET {} WHERE id = {id}", sets.join(", "));
  Ok(Some(stmt))
}
