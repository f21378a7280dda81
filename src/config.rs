//! # Configuration Management
//!
//! Configuration comes from the environment (with an optional `.env` file for
//! local development).
//!
//! ## Environment Variables
//! - `HOST`: Server bind address (default: 127.0.0.1)
//! - `PORT`: Server port (default: 4000)
//! - `DATABASE_URL`: SQLite connection string for snippets, users and sessions
//! - `UI_DIR`: Directory holding `html/` templates and `static/` assets (default: ./ui)
//! - `SESSION_LIFETIME_HOURS`: Idle lifetime of a session (default: 12)
//! - `COOKIE_SECURE`: Mark the session cookie `Secure` (default: false)

use anyhow::{Context, Result};
use std::env;
use std::path::PathBuf;

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Server host/IP address to bind to
    pub host: String,

    /// Server port number
    pub port: u16,

    /// SQLite database connection URL
    /// Format: "sqlite:filename.db?mode=rwc" (read, write, create if missing)
    pub database_url: String,

    /// Root of the UI assets: `html/base.html`, `html/partials/`, `html/pages/`
    /// and `static/`
    pub ui_dir: PathBuf,

    /// How long a session survives without activity
    pub session_lifetime_hours: i64,

    /// Whether the session cookie carries the `Secure` attribute.
    /// Leave off for plain-HTTP local development.
    pub cookie_secure: bool,
}

impl Config {
    /// Load configuration from environment variables
    ///
    /// Missing variables fall back to defaults; variables that are present
    /// but unparseable are an error, so a typo never silently becomes a default.
    ///
    /// ## Example .env file
    /// ```text
    /// HOST=127.0.0.1
    /// PORT=4000
    /// DATABASE_URL=sqlite:snippetbox.db?mode=rwc
    /// UI_DIR=./ui
    /// SESSION_LIFETIME_HOURS=12
    /// COOKIE_SECURE=false
    /// ```
    pub fn from_env() -> Result<Self> {
        // dotenvy doesn't error if the file is missing
        dotenvy::dotenv().ok();

        Ok(Config {
            host: env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: parse_var("PORT", "4000")?,
            database_url: env::var("DATABASE_URL")
                .unwrap_or_else(|_| "sqlite:snippetbox.db?mode=rwc".to_string()),
            ui_dir: env::var("UI_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("./ui")),
            session_lifetime_hours: parse_var("SESSION_LIFETIME_HOURS", "12")?,
            cookie_secure: parse_var("COOKIE_SECURE", "false")?,
        })
    }

    /// Socket address to bind to, e.g. "127.0.0.1:4000"
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Directory holding `base.html`, `partials/` and `pages/`
    pub fn templates_dir(&self) -> PathBuf {
        self.ui_dir.join("html")
    }

    /// Directory served under `/static/`
    pub fn static_dir(&self) -> PathBuf {
        self.ui_dir.join("static")
    }
}

fn parse_var<T>(name: &str, default: &str) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    let raw = env::var(name).unwrap_or_else(|_| default.to_string());
    raw.trim()
        .parse()
        .with_context(|| format!("invalid value for {name}: {raw:?}"))
}
