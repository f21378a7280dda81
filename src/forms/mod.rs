//! # Forms
//!
//! Typed HTML forms and the codec that fills them from a posted body.
//!
//! Each form owns a [`Validator`](crate::validator::Validator) (never decoded
//! from the request) and knows its own rules. Handlers decode, call
//! `validate()`, and either re-render the page with a 422 or carry on.

pub mod codec;
pub mod snippet;
pub mod user;

pub use codec::{decode_form, decode_post_form, FormError, PostForm};
pub use snippet::SnippetCreateForm;
pub use user::{LoginForm, PasswordUpdateForm, SignupForm};

pub(crate) const BLANK: &str = "This field cannot be blank";
