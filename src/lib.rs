//! Snippetbox: a server-rendered pastebin for short-lived text snippets,
//! with signup/login and session-gated writes.

pub mod config;
pub mod db;
pub mod error;
pub mod forms;
pub mod handlers;
pub mod middleware;
pub mod password;
pub mod routes;
pub mod session;
pub mod state;
pub mod templates;
pub mod validator;
