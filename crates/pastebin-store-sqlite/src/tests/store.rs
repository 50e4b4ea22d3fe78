use std::time::Duration as StdDuration;

use chrono::{Duration, Utc};
use pastebin_core::{
  paste::{DEFAULT_TITLE, NewPaste, PatchPaste},
  query::{PageRequest, PasteFilter, SortColumn, SortOrder},
  slug::SLUG_LEN,
  store::{PasteStore, ViewLedger},
};
use uuid::Uuid;

use super::{BASE_URL, store};
use crate::Error;

fn titled(title: &str, language: &str) -> NewPaste {
  NewPaste {
    title: title.into(),
    content: format!("content of {title}"),
    language: language.into(),
    ..NewPaste::default()
  }
}

/// Keeps `created_at` strictly increasing between consecutive creates.
async fn tick() { tokio::time::sleep(StdDuration::from_millis(2)).await; }

// ─── Create / read ───────────────────────────────────────────────────────────

#[tokio::test]
async fn create_assigns_slug_url_and_defaults() {
  let s = store().await;
  let owner = Uuid::new_v4();

  let paste = s.create(owner, NewPaste::new("hello")).await.unwrap();

  assert_eq!(paste.owner_id, owner);
  assert_eq!(paste.title, DEFAULT_TITLE);
  assert_eq!(paste.content, "hello");
  assert_eq!(paste.slug.len(), SLUG_LEN);
  assert_eq!(paste.url, format!("{BASE_URL}/p/{}", paste.slug));
  assert!(!paste.is_private);
  assert!(paste.password_hash.is_none());
  assert_eq!(paste.views, 0);
  assert!(paste.expires_at.is_none());
  assert_eq!(paste.created_at, paste.updated_at);
}

#[tokio::test]
async fn create_with_password_stores_only_a_hash() {
  let s = store().await;
  let input = NewPaste { password: Some("hunter2".into()), ..NewPaste::new("x") };

  let paste = s.create(Uuid::new_v4(), input).await.unwrap();

  assert!(paste.is_private);
  let hash = paste.password_hash.expect("hash stored");
  assert!(hash.starts_with("$argon2id$"));
  assert!(!hash.contains("hunter2"));
}

#[tokio::test]
async fn create_with_empty_password_is_public() {
  let s = store().await;
  let input = NewPaste { password: Some(String::new()), ..NewPaste::new("x") };

  let paste = s.create(Uuid::new_v4(), input).await.unwrap();
  assert!(!paste.is_private);
  assert!(paste.password_hash.is_none());
}

#[tokio::test]
async fn get_by_id_and_slug_return_the_same_paste() {
  let s = store().await;
  let created = s.create(Uuid::new_v4(), titled("a", "rust")).await.unwrap();

  let by_id = s.get_by_id(created.id).await.unwrap();
  let by_slug = s.get_by_slug(&created.slug).await.unwrap();

  assert_eq!(by_id.id, created.id);
  assert_eq!(by_slug.id, created.id);
  assert_eq!(by_slug.language, "rust");
  assert_eq!(by_id.created_at, created.created_at);
}

#[tokio::test]
async fn missing_pastes_are_not_found() {
  let s = store().await;
  let id = Uuid::new_v4();

  assert!(matches!(s.get_by_id(id).await, Err(Error::PasteNotFound(x)) if x == id));
  assert!(matches!(
    s.get_by_slug("nope1234").await,
    Err(Error::SlugNotFound(_))
  ));
}

#[tokio::test]
async fn point_reads_do_not_filter_expired_pastes() {
  let s = store().await;
  let input = NewPaste {
    expires_at: Some(Utc::now() - Duration::seconds(1)),
    ..NewPaste::new("old")
  };
  let paste = s.create(Uuid::new_v4(), input).await.unwrap();

  let fetched = s.get_by_id(paste.id).await.unwrap();
  assert!(fetched.is_expired_at(Utc::now()));
}

// ─── Slugs ───────────────────────────────────────────────────────────────────

fn fixed_slug() -> String { "Fixed123".to_owned() }

#[tokio::test]
async fn duplicate_slug_is_rejected_and_nothing_is_written() {
  let s = store().await.with_slug_source(fixed_slug);
  let owner = Uuid::new_v4();
  s.create(owner, NewPaste::new("first")).await.unwrap();

  let second = s.create(owner, NewPaste::new("second")).await;
  assert!(matches!(second, Err(Error::SlugTaken(ref slug)) if slug == "Fixed123"));

  let (pastes, total) = s.list_by_owner(owner, PageRequest::default()).await.unwrap();
  assert_eq!(total, 1);
  assert_eq!(pastes[0].content, "first");
}

#[tokio::test]
async fn unstorable_expiry_claims_no_slug() {
  let s = store().await.with_slug_source(fixed_slug);
  let owner = Uuid::new_v4();
  let input = NewPaste {
    expires_at: Some(Utc::now() + Duration::weeks(500_000)),
    ..NewPaste::new("forever")
  };
  assert!(matches!(
    s.create(owner, input).await,
    Err(Error::TimestampRange(_))
  ));

  let paste = s.create(owner, NewPaste::new("second try")).await.unwrap();
  assert_eq!(paste.slug, "Fixed123");
}

#[tokio::test]
async fn slug_of_deleted_paste_is_never_reissued() {
  let s = store().await.with_slug_source(fixed_slug);
  let paste = s.create(Uuid::new_v4(), NewPaste::new("x")).await.unwrap();
  s.delete(paste.id).await.unwrap();

  let again = s.create(Uuid::new_v4(), NewPaste::new("y")).await;
  assert!(matches!(again, Err(Error::SlugTaken(_))));
}

#[tokio::test]
async fn slug_conflict_maps_to_core_conflict() {
  let core: pastebin_core::Error = Error::SlugTaken("abc".into()).into();
  assert!(matches!(core, pastebin_core::Error::Conflict(_)));

  let core: pastebin_core::Error = Error::PasteNotFound(Uuid::new_v4()).into();
  assert!(matches!(core, pastebin_core::Error::NotFound));
}

// ─── Patch ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn patch_updates_present_fields_and_bumps_updated_at() {
  let s = store().await;
  let paste = s.create(Uuid::new_v4(), titled("before", "go")).await.unwrap();
  tick().await;

  let patch = PatchPaste { title: Some("after".into()), ..PatchPaste::default() };
  s.patch(paste.id, patch).await.unwrap();

  let fetched = s.get_by_id(paste.id).await.unwrap();
  assert_eq!(fetched.title, "after");
  assert_eq!(fetched.content, paste.content);
  assert_eq!(fetched.language, "go");
  assert_eq!(fetched.created_at, paste.created_at);
  assert!(fetched.updated_at > paste.updated_at);
}

#[tokio::test]
async fn patch_with_empty_title_restores_default() {
  let s = store().await;
  let paste = s.create(Uuid::new_v4(), titled("named", "")).await.unwrap();

  let patch = PatchPaste { title: Some(String::new()), ..PatchPaste::default() };
  s.patch(paste.id, patch).await.unwrap();

  assert_eq!(s.get_by_id(paste.id).await.unwrap().title, DEFAULT_TITLE);
}

#[tokio::test]
async fn patch_password_sets_and_clears_protection() {
  let s = store().await;
  let paste = s.create(Uuid::new_v4(), NewPaste::new("x")).await.unwrap();

  let set = PatchPaste { password: Some("pw".into()), ..PatchPaste::default() };
  s.patch(paste.id, set).await.unwrap();
  let locked = s.get_by_id(paste.id).await.unwrap();
  assert!(locked.is_private);
  assert!(locked.password_hash.is_some());

  let clear = PatchPaste { password: Some(String::new()), ..PatchPaste::default() };
  s.patch(paste.id, clear).await.unwrap();
  let open = s.get_by_id(paste.id).await.unwrap();
  assert!(!open.is_private);
  assert!(open.password_hash.is_none());
}

#[tokio::test]
async fn patch_is_private_override_wins_over_password() {
  let s = store().await;
  let paste = s.create(Uuid::new_v4(), NewPaste::new("x")).await.unwrap();

  let patch = PatchPaste {
    password: Some("pw".into()),
    is_private: Some(false),
    ..PatchPaste::default()
  };
  s.patch(paste.id, patch).await.unwrap();

  let fetched = s.get_by_id(paste.id).await.unwrap();
  assert!(!fetched.is_private);
  assert!(fetched.password_hash.is_some());
}

#[tokio::test]
async fn patch_missing_paste_is_not_found() {
  let s = store().await;
  let patch = PatchPaste { content: Some("x".into()), ..PatchPaste::default() };
  assert!(matches!(
    s.patch(Uuid::new_v4(), patch).await,
    Err(Error::PasteNotFound(_))
  ));
}

// ─── Delete ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn delete_removes_the_paste_once() {
  let s = store().await;
  let paste = s.create(Uuid::new_v4(), NewPaste::new("x")).await.unwrap();

  s.delete(paste.id).await.unwrap();

  assert!(matches!(s.get_by_id(paste.id).await, Err(Error::PasteNotFound(_))));
  assert!(matches!(s.delete(paste.id).await, Err(Error::PasteNotFound(_))));
}

// ─── Listing ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn list_by_owner_is_scoped_newest_first_and_skips_expired() {
  let s = store().await;
  let owner = Uuid::new_v4();

  let first = s.create(owner, titled("first", "")).await.unwrap();
  tick().await;
  let second = s.create(owner, titled("second", "")).await.unwrap();
  s.create(Uuid::new_v4(), titled("someone else", "")).await.unwrap();
  let expired = NewPaste {
    expires_at: Some(Utc::now() - Duration::seconds(1)),
    ..titled("expired", "")
  };
  s.create(owner, expired).await.unwrap();

  let (pastes, total) = s.list_by_owner(owner, PageRequest::default()).await.unwrap();

  assert_eq!(total, 2);
  let ids: Vec<_> = pastes.iter().map(|p| p.id).collect();
  assert_eq!(ids, vec![second.id, first.id]);
}

#[tokio::test]
async fn list_by_owner_pages_with_normalised_limits() {
  let s = store().await;
  let owner = Uuid::new_v4();
  for i in 0..12 {
    s.create(owner, titled(&format!("p{i}"), "")).await.unwrap();
  }

  let (first_page, total) = s.list_by_owner(owner, PageRequest::new(0, -3)).await.unwrap();
  assert_eq!(total, 12);
  assert_eq!(first_page.len(), 10);

  let (rest, _) = s.list_by_owner(owner, PageRequest::new(10, 10)).await.unwrap();
  assert_eq!(rest.len(), 2);
}

#[tokio::test]
async fn listings_carry_view_counts() {
  let s = store().await;
  let owner = Uuid::new_v4();
  let paste = s.create(owner, NewPaste::new("x")).await.unwrap();
  s.record_view(paste.id, paste.url.clone()).await.unwrap();
  s.record_view(paste.id, paste.url.clone()).await.unwrap();

  let (pastes, _) = s.list_by_owner(owner, PageRequest::default()).await.unwrap();
  assert_eq!(pastes[0].views, 2);
  assert_eq!(s.get_by_slug(&paste.slug).await.unwrap().views, 2);
}

// ─── Filter ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn filter_never_returns_other_owners_pastes() {
  let s = store().await;
  let a = Uuid::new_v4();
  let b = Uuid::new_v4();
  s.create(a, titled("mine", "rust")).await.unwrap();
  s.create(b, titled("theirs", "rust")).await.unwrap();

  let filter = PasteFilter { languages: vec!["rust".into()], ..PasteFilter::default() };
  let found = s.filter(a, &filter).await.unwrap();

  assert_eq!(found.len(), 1);
  assert!(found.iter().all(|p| p.owner_id == a));
}

#[tokio::test]
async fn filter_by_language_set() {
  let s = store().await;
  let owner = Uuid::new_v4();
  s.create(owner, titled("r", "rust")).await.unwrap();
  s.create(owner, titled("g", "go")).await.unwrap();
  s.create(owner, titled("p", "python")).await.unwrap();

  let filter = PasteFilter {
    languages: vec!["rust".into(), "go".into()],
    sort_by: SortColumn::Title,
    sort_order: SortOrder::Asc,
    ..PasteFilter::default()
  };
  let titles: Vec<_> = s
    .filter(owner, &filter)
    .await
    .unwrap()
    .into_iter()
    .map(|p| p.title)
    .collect();

  assert_eq!(titles, vec!["g", "r"]);
}

#[tokio::test]
async fn filter_date_range_is_inclusive() {
  let s = store().await;
  let owner = Uuid::new_v4();
  let p1 = s.create(owner, titled("1", "")).await.unwrap();
  tick().await;
  let p2 = s.create(owner, titled("2", "")).await.unwrap();
  tick().await;
  let p3 = s.create(owner, titled("3", "")).await.unwrap();

  let filter = PasteFilter {
    date_from: Some(p2.created_at),
    date_to: Some(p3.created_at),
    ..PasteFilter::default()
  };
  let ids: Vec<_> = s
    .filter(owner, &filter)
    .await
    .unwrap()
    .into_iter()
    .map(|p| p.id)
    .collect();

  assert_eq!(ids, vec![p3.id, p2.id]);
  assert!(!ids.contains(&p1.id));
}

#[tokio::test]
async fn filter_unknown_sort_key_falls_back_to_newest_first() {
  let s = store().await;
  let owner = Uuid::new_v4();
  let older = s.create(owner, titled("b", "")).await.unwrap();
  tick().await;
  let newer = s.create(owner, titled("a", "")).await.unwrap();

  let filter = PasteFilter {
    sort_by: SortColumn::parse_lossy("no_such_column"),
    sort_order: SortOrder::parse_lossy("whatever"),
    ..PasteFilter::default()
  };
  let ids: Vec<_> = s
    .filter(owner, &filter)
    .await
    .unwrap()
    .into_iter()
    .map(|p| p.id)
    .collect();

  assert_eq!(ids, vec![newer.id, older.id]);
}

#[tokio::test]
async fn filter_sorts_by_views_and_skips_expired() {
  let s = store().await;
  let owner = Uuid::new_v4();
  let quiet = s.create(owner, titled("quiet", "")).await.unwrap();
  let busy = s.create(owner, titled("busy", "")).await.unwrap();
  let gone = NewPaste {
    expires_at: Some(Utc::now() - Duration::seconds(1)),
    ..titled("gone", "")
  };
  s.create(owner, gone).await.unwrap();

  for _ in 0..3 {
    s.record_view(busy.id, busy.url.clone()).await.unwrap();
  }
  s.record_view(quiet.id, quiet.url.clone()).await.unwrap();

  let filter = PasteFilter { sort_by: SortColumn::Views, ..PasteFilter::default() };
  let found = s.filter(owner, &filter).await.unwrap();

  let summary: Vec<_> = found.iter().map(|p| (p.title.as_str(), p.views)).collect();
  assert_eq!(summary, vec![("busy", 3), ("quiet", 1)]);
}
