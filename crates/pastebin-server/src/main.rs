//! Paste service binary.
//!
//! Reads `config.toml` (or the path specified with `--config`) layered under
//! `PASTEBIN_*` environment variables, opens the SQLite store, and serves the
//! JSON API over HTTP.
//!
//! # Issuing a bearer token
//!
//! ```sh
//! cargo run -p pastebin-server --bin server -- \
//!   --issue-token 7f1c0a52-3b8e-4c1e-9d57-0e0b5a1e2f44 --email me@example.com
//! ```

use std::{
  path::{Path, PathBuf},
  sync::Arc,
};

use anyhow::Context as _;
use clap::Parser;
use pastebin_core::{
  PasteAccess, ViewDispatch, credential::Argon2Codec, identity::CallerIdentity,
};
use pastebin_server::{AppState, ServerConfig, auth::JwtIdentity};
use pastebin_store_sqlite::SqliteStore;
use tokio::net::TcpListener;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

/// Lifetime of tokens minted by `--issue-token`.
const ISSUED_TOKEN_TTL_HOURS: i64 = 24;

#[derive(Parser)]
#[command(author, version, about = "Paste sharing server")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "config.toml")]
  config: PathBuf,

  /// Print a bearer token for this user id and exit.
  #[arg(long, value_name = "USER_ID", requires = "email")]
  issue_token: Option<Uuid>,

  /// Email claim for `--issue-token`.
  #[arg(long)]
  email: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  // Initialise tracing.
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();

  // Load configuration.
  let settings = config::Config::builder()
    .add_source(config::File::from(cli.config).required(false))
    .add_source(config::Environment::with_prefix("PASTEBIN"))
    .build()
    .context("failed to read config file")?;

  let server_cfg: ServerConfig = settings
    .try_deserialize()
    .context("failed to deserialise ServerConfig")?;

  let identity = Arc::new(JwtIdentity::new(&server_cfg.jwt_secret));

  // Helper mode: mint a token and exit.
  if let Some(user_id) = cli.issue_token {
    let email = cli.email.unwrap_or_default();
    let token = identity
      .issue(
        &CallerIdentity::new(user_id, email),
        chrono::Duration::hours(ISSUED_TOKEN_TTL_HOURS),
      )
      .context("failed to sign token")?;
    println!("{token}");
    return Ok(());
  }

  // Expand `~` in store path.
  let store_path = expand_tilde(&server_cfg.store_path);

  // Open SQLite store.
  let codec = Arc::new(Argon2Codec::new());
  let store = SqliteStore::open(&store_path, &server_cfg.base_url, codec.clone())
    .await
    .with_context(|| format!("failed to open store at {store_path:?}"))?;

  let dispatch = if server_cfg.detach_view_recording {
    ViewDispatch::Detached
  } else {
    ViewDispatch::Inline
  };

  // Build application state.
  let state = AppState {
    access: PasteAccess::new(Arc::new(store), codec).with_view_dispatch(dispatch),
    identity,
    config: Arc::new(server_cfg.clone()),
  };

  let app = pastebin_server::router(state);
  let address = format!("{}:{}", server_cfg.host, server_cfg.port);

  tracing::info!("Listening on http://{address}");
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;

  axum::serve(listener, app).await.context("server error")?;

  Ok(())
}

/// Expand a leading `~` to the user's home directory.
fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}
