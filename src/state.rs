//! # Application State
//!
//! Resources shared by every handler: the SQLite pool and the compiled
//! templates. Cloning is cheap (`SqlitePool` is a handle, the cache sits
//! behind an `Arc`), which is what axum does for each request.

use crate::config::Config;
use crate::db;
use crate::templates::TemplateCache;
use anyhow::{Context, Result};
use sqlx::sqlite::SqlitePool;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    /// Snippets, users and (through the session store) sessions
    pub db: SqlitePool,

    /// Read-only after startup
    pub templates: Arc<TemplateCache>,
}

impl AppState {
    /// Connects and migrates the database and compiles every template.
    ///
    /// A template that fails to read or parse stops startup here.
    pub async fn new(config: &Config) -> Result<Self> {
        let db = db::connect(&config.database_url)
            .await
            .with_context(|| format!("opening database {}", config.database_url))?;

        let templates = TemplateCache::from_dir(config.templates_dir())
            .context("building template cache")?;

        Ok(Self::from_parts(db, templates))
    }

    pub fn from_parts(db: SqlitePool, templates: TemplateCache) -> Self {
        AppState {
            db,
            templates: Arc::new(templates),
        }
    }
}
