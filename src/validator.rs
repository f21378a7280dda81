//! # Form Validation
//!
//! A [`Validator`] collects the messages produced while checking one submitted
//! form. Every form type owns one and exposes it through [`Validated`], so
//! handlers call `form.add_field_error(..)` / `form.is_valid()` directly.
//!
//! The first message recorded for a field wins. Rule order therefore decides
//! which message the user sees: blank checks run before length, membership
//! and pattern checks.

use regex::Regex;
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::LazyLock;

/// Shape check for email addresses (the WHATWG `input type=email` pattern).
pub static EMAIL_RX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^[a-zA-Z0-9.!#$%&'*+/=?^_`{|}~-]+@[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?(?:\.[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?)*$",
    )
    .expect("email pattern is a valid regex")
});

/// Field-keyed and non-field error messages for one form submission.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Validator {
    pub field_errors: BTreeMap<String, String>,
    pub generic_error: String,
}

impl Validator {
    /// True when no field error and no generic error has been recorded.
    pub fn is_valid(&self) -> bool {
        self.field_errors.is_empty() && self.generic_error.is_empty()
    }

    /// Records `message` for `key` unless the key already has one.
    pub fn add_field_error(&mut self, key: &str, message: &str) {
        self.field_errors
            .entry(key.to_string())
            .or_insert_with(|| message.to_string());
    }

    /// Replaces the generic (non-field) message.
    pub fn add_generic_error(&mut self, message: &str) {
        self.generic_error = message.to_string();
    }

    /// Records `message` for `key` when `ok` is false.
    pub fn check_field(&mut self, ok: bool, key: &str, message: &str) {
        if !ok {
            self.add_field_error(key, message);
        }
    }

    pub fn field_error(&self, key: &str) -> Option<&str> {
        self.field_errors.get(key).map(String::as_str)
    }
}

/// Implemented by every form type that owns a [`Validator`].
pub trait Validated {
    fn validator(&self) -> &Validator;
    fn validator_mut(&mut self) -> &mut Validator;

    fn is_valid(&self) -> bool {
        self.validator().is_valid()
    }

    fn add_field_error(&mut self, key: &str, message: &str) {
        self.validator_mut().add_field_error(key, message);
    }

    fn add_generic_error(&mut self, message: &str) {
        self.validator_mut().add_generic_error(message);
    }

    fn check_field(&mut self, ok: bool, key: &str, message: &str) {
        self.validator_mut().check_field(ok, key, message);
    }
}

/// Non-empty after trimming surrounding whitespace.
pub fn not_blank(value: &str) -> bool {
    !value.trim().is_empty()
}

/// At most `n` characters (code points, not bytes).
pub fn max_chars(value: &str, n: usize) -> bool {
    value.chars().count() <= n
}

/// At least `n` characters (code points, not bytes).
pub fn min_chars(value: &str, n: usize) -> bool {
    value.chars().count() >= n
}

pub fn permitted_value<T: PartialEq>(value: &T, permitted: &[T]) -> bool {
    permitted.contains(value)
}

pub fn matches(value: &str, rx: &Regex) -> bool {
    rx.is_match(value)
}
