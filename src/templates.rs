//! # Template Cache
//!
//! Every page under `html/pages/` is compiled once at startup into its own
//! [`Environment`] together with `html/base.html` and all of
//! `html/partials/`. The resulting set is immutable and shared by all
//! requests.
//!
//! Rendering happens into a `String` first; only a fully rendered page is
//! turned into a response, so a failure halfway through a template becomes a
//! clean 500 instead of a truncated page.

use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use chrono::{DateTime, Datelike, Utc};
use minijinja::{Environment, ErrorKind, UndefinedBehavior, Value};
use serde::Serialize;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::db::models::{Snippet, UserProfile};
use crate::forms::{LoginForm, PasswordUpdateForm, SignupForm, SnippetCreateForm};

pub const BASE_TEMPLATE: &str = "base.html";
const HUMAN_DATE_FORMAT: &str = "%d %b %Y at %H:%M";

#[derive(Debug, Error)]
pub enum TemplateError {
    #[error("failed to read template {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse template {name}: {source}")]
    Parse {
        name: String,
        #[source]
        source: minijinja::Error,
    },

    #[error("template {0} does not exist in the cache")]
    NotFound(String),

    #[error("failed to render template {name}: {source}")]
    Render {
        name: String,
        #[source]
        source: minijinja::Error,
    },
}

/// Compiled page sets, keyed by page file name (`home.html`, `view.html`, ...).
#[derive(Debug, Default)]
pub struct TemplateCache {
    sets: HashMap<String, Environment<'static>>,
}

impl TemplateCache {
    /// Loads `dir/base.html`, `dir/partials/*.html` and `dir/pages/*.html`.
    pub fn from_dir(dir: impl AsRef<Path>) -> Result<Self, TemplateError> {
        let dir = dir.as_ref();
        let base = read_file(&dir.join(BASE_TEMPLATE))?;
        let partials = read_html_files(&dir.join("partials"))?
            .into_iter()
            .map(|(name, source)| (format!("partials/{name}"), source))
            .collect::<Vec<_>>();
        let pages = read_html_files(&dir.join("pages"))?;

        Self::from_sources(base, &partials, &pages)
    }

    /// Builds the cache from in-memory sources. Partials are registered under
    /// the name given; pages under their own name.
    pub fn from_sources(
        base: String,
        partials: &[(String, String)],
        pages: &[(String, String)],
    ) -> Result<Self, TemplateError> {
        let mut sets = HashMap::with_capacity(pages.len());

        for (page, page_source) in pages {
            let mut env = new_environment();
            add_template(&mut env, BASE_TEMPLATE, &base)?;
            for (name, source) in partials {
                add_template(&mut env, name, source)?;
            }
            add_template(&mut env, page, page_source)?;

            sets.insert(page.clone(), env);
        }

        tracing::debug!(pages = sets.len(), "template cache built");
        Ok(TemplateCache { sets })
    }

    pub fn contains(&self, page: &str) -> bool {
        self.sets.contains_key(page)
    }

    /// Executes `page` against `data` into a buffer.
    pub fn render_to_string<D: Serialize>(&self, page: &str, data: &D) -> Result<String, TemplateError> {
        let env = self
            .sets
            .get(page)
            .ok_or_else(|| TemplateError::NotFound(page.to_string()))?;

        let render_error = |source: minijinja::Error| TemplateError::Render {
            name: page.to_string(),
            source,
        };

        env.get_template(page)
            .map_err(render_error)?
            .render(data)
            .map_err(render_error)
    }

    /// Renders `page` and, only if that succeeded, wraps it with `status`.
    pub fn render<D: Serialize>(
        &self,
        status: StatusCode,
        page: &str,
        data: &D,
    ) -> Result<Response, TemplateError> {
        let body = self.render_to_string(page, data)?;
        Ok((status, Html(body)).into_response())
    }
}

fn new_environment() -> Environment<'static> {
    let mut env = Environment::new();
    env.set_undefined_behavior(UndefinedBehavior::Chainable);
    env.add_filter("human_date", human_date);
    env
}

fn add_template(env: &mut Environment<'static>, name: &str, source: &str) -> Result<(), TemplateError> {
    env.add_template_owned(name.to_string(), source.to_string())
        .map_err(|source| TemplateError::Parse {
            name: name.to_string(),
            source,
        })
}

fn read_file(path: &Path) -> Result<String, TemplateError> {
    fs::read_to_string(path).map_err(|source| TemplateError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// `(file name, contents)` of every `.html` file directly inside `dir`,
/// sorted by name.
fn read_html_files(dir: &Path) -> Result<Vec<(String, String)>, TemplateError> {
    let io_error = |source: std::io::Error| TemplateError::Io {
        path: dir.to_path_buf(),
        source,
    };

    let mut files = Vec::new();
    for entry in fs::read_dir(dir).map_err(io_error)? {
        let path = entry.map_err(io_error)?.path();
        if path.extension().and_then(|ext| ext.to_str()) != Some("html") {
            continue;
        }
        let Some(name) = path.file_name().and_then(|name| name.to_str()) else {
            continue;
        };
        files.push((name.to_string(), read_file(&path)?));
    }

    files.sort_by(|a, b| a.0.cmp(&b.0));
    Ok(files)
}

/// Formats an RFC 3339 timestamp as `02 Jan 2006 at 15:04` in UTC.
fn human_date(value: Value) -> Result<String, minijinja::Error> {
    if value.is_undefined() || value.is_none() {
        return Ok(String::new());
    }

    let text = value.as_str().ok_or_else(|| {
        minijinja::Error::new(ErrorKind::InvalidOperation, "human_date expects a timestamp string")
    })?;
    if text.is_empty() {
        return Ok(String::new());
    }

    let parsed = DateTime::parse_from_rfc3339(text).map_err(|e| {
        minijinja::Error::new(ErrorKind::InvalidOperation, format!("bad timestamp {text:?}: {e}"))
    })?;

    Ok(parsed.with_timezone(&Utc).format(HUMAN_DATE_FORMAT).to_string())
}

/// The form a page is bound to.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum PageForm {
    SnippetCreate(SnippetCreateForm),
    Signup(SignupForm),
    Login(LoginForm),
    PasswordUpdate(PasswordUpdateForm),
}

impl From<SnippetCreateForm> for PageForm {
    fn from(form: SnippetCreateForm) -> Self {
        PageForm::SnippetCreate(form)
    }
}

impl From<SignupForm> for PageForm {
    fn from(form: SignupForm) -> Self {
        PageForm::Signup(form)
    }
}

impl From<LoginForm> for PageForm {
    fn from(form: LoginForm) -> Self {
        PageForm::Login(form)
    }
}

impl From<PasswordUpdateForm> for PageForm {
    fn from(form: PasswordUpdateForm) -> Self {
        PageForm::PasswordUpdate(form)
    }
}

/// Everything a page template can see.
#[derive(Debug, Clone, Default, Serialize)]
pub struct TemplateData {
    pub current_year: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub snippet: Option<Snippet>,
    pub snippets: Vec<Snippet>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub form: Option<PageForm>,
    pub flash: String,
    pub is_authenticated: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<UserProfile>,
}

impl TemplateData {
    pub fn new(flash: String, is_authenticated: bool) -> Self {
        TemplateData {
            current_year: Utc::now().year(),
            flash,
            is_authenticated,
            ..Default::default()
        }
    }

    pub fn with_form(mut self, form: impl Into<PageForm>) -> Self {
        self.form = Some(form.into());
        self
    }
}
