//! # Sessions
//!
//! The cookie only carries an opaque id; values live server-side in the
//! `tower-sessions` store. [`AppSession`] narrows the raw [`Session`] down to
//! the handful of typed operations the handlers use.
//!
//! Keys in use:
//! - [`FLASH_KEY`]: one-shot message shown on the next rendered page
//! - [`AUTHENTICATED_USER_ID_KEY`]: id of the logged-in user
//! - [`REDIRECT_PATH_KEY`]: where to send the user after they log in
//! - [`EXPIRES_AT_KEY`]: the session's deadline, in unix seconds
//!
//! ## Expiry
//!
//! A session lives for a fixed [`SessionLifetime`] counted from its creation
//! or its last [`AppSession::renew_token`]. Activity does not extend it.
//! The store does not hand the expiry back on load, so the deadline is kept
//! in the session data and re-applied before every write.

use axum::{extract::FromRequestParts, http::request::Parts, http::StatusCode};
use serde::{de::DeserializeOwned, Serialize};
use time::OffsetDateTime;
use tower_sessions::{
    cookie::SameSite, session::Error, session_store, Expiry, Session, SessionManagerLayer,
    SessionStore,
};

pub const SESSION_COOKIE: &str = "session";
pub const FLASH_KEY: &str = "flash";
pub const AUTHENTICATED_USER_ID_KEY: &str = "authenticatedUserID";
pub const REDIRECT_PATH_KEY: &str = "redirectPathAfterLogin";
pub const EXPIRES_AT_KEY: &str = "sessionExpiresAt";

/// How long a session lives after it is created or renewed.
///
/// Handed to [`AppSession`] as a request extension; 12 hours when absent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionLifetime(pub time::Duration);

impl Default for SessionLifetime {
    fn default() -> Self {
        SessionLifetime(time::Duration::hours(12))
    }
}

/// Builds the session layer: `HttpOnly`, `SameSite=Lax` cookie named
/// `session`. The expiry is set per session by [`AppSession`].
pub fn manager_layer<Store>(store: Store, secure: bool) -> SessionManagerLayer<Store>
where
    Store: SessionStore + Clone,
{
    SessionManagerLayer::new(store)
        .with_name(SESSION_COOKIE)
        .with_http_only(true)
        .with_same_site(SameSite::Lax)
        .with_secure(secure)
}

/// Typed view over the request's session.
#[derive(Debug, Clone)]
pub struct AppSession {
    session: Session,
    lifetime: SessionLifetime,
}

impl AppSession {
    pub fn new(session: Session, lifetime: SessionLifetime) -> Self {
        AppSession { session, lifetime }
    }

    pub async fn put<T: Serialize>(&self, key: &str, value: T) -> Result<(), Error> {
        self.session.insert(key, value).await?;
        self.pin_expiry().await
    }

    pub async fn get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, Error> {
        self.session.get(key).await
    }

    /// The string under `key`, or `""` when absent.
    pub async fn get_string(&self, key: &str) -> Result<String, Error> {
        Ok(self.get::<String>(key).await?.unwrap_or_default())
    }

    /// The integer under `key`, or `0` when absent.
    pub async fn get_int(&self, key: &str) -> Result<i64, Error> {
        Ok(self.get::<i64>(key).await?.unwrap_or_default())
    }

    /// Reads and removes the string under `key` in one step, `""` when absent.
    pub async fn pop_string(&self, key: &str) -> Result<String, Error> {
        let value = self.session.remove::<String>(key).await?;
        self.pin_expiry_if_kept().await?;
        Ok(value.unwrap_or_default())
    }

    /// Moves the session's data to a fresh id and restarts its lifetime.
    /// Called on every change of authentication state so a pre-login id is
    /// worthless afterwards.
    pub async fn renew_token(&self) -> Result<(), Error> {
        self.session.cycle_id().await?;
        let deadline = OffsetDateTime::now_utc().saturating_add(self.lifetime.0);
        self.session
            .insert(EXPIRES_AT_KEY, deadline.unix_timestamp())
            .await?;
        self.pin_expiry().await
    }

    pub async fn remove(&self, key: &str) -> Result<(), Error> {
        self.session.remove_value(key).await?;
        self.pin_expiry_if_kept().await
    }

    /// Applies the stored deadline to the session, first recording one when
    /// the session has none yet.
    async fn pin_expiry(&self) -> Result<(), Error> {
        let timestamp = match self.session.get::<i64>(EXPIRES_AT_KEY).await? {
            Some(timestamp) => timestamp,
            None => {
                let deadline = OffsetDateTime::now_utc().saturating_add(self.lifetime.0);
                let timestamp = deadline.unix_timestamp();
                self.session.insert(EXPIRES_AT_KEY, timestamp).await?;
                timestamp
            }
        };

        let deadline = OffsetDateTime::from_unix_timestamp(timestamp)
            .map_err(|err| Error::Store(session_store::Error::Decode(err.to_string())))?;
        self.session.set_expiry(Some(Expiry::AtDateTime(deadline)));
        Ok(())
    }

    // Any removal marks the session modified. An empty session is never
    // saved, so only a non-empty one needs its deadline.
    async fn pin_expiry_if_kept(&self) -> Result<(), Error> {
        if self.session.is_empty().await {
            return Ok(());
        }
        self.pin_expiry().await
    }
}

impl<S> FromRequestParts<S> for AppSession
where
    S: Send + Sync,
{
    type Rejection = (StatusCode, &'static str);

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let lifetime = parts
            .extensions
            .get::<SessionLifetime>()
            .copied()
            .unwrap_or_default();
        let session = Session::from_request_parts(parts, state).await?;
        Ok(AppSession::new(session, lifetime))
    }
}
