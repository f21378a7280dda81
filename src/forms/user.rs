//! Account forms: signup, login and password change.
//!
//! Passwords are never serialized, so a re-rendered form does not echo them
//! back into the page.

use serde::{Deserialize, Serialize};

use super::BLANK;
use crate::validator::{matches, min_chars, not_blank, Validated, Validator, EMAIL_RX};

const INVALID_EMAIL: &str = "This field must be a valid email address";
const TOO_SHORT: &str = "This field must be at least 8 characters long";
pub const MIN_PASSWORD_CHARS: usize = 8;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SignupForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default, skip_serializing)]
    pub password: String,
    #[serde(skip_deserializing)]
    pub validator: Validator,
}

impl SignupForm {
    pub fn validate(&mut self) {
        let name_ok = not_blank(&self.name);
        let email_present = not_blank(&self.email);
        let email_shaped = matches(&self.email, &EMAIL_RX);
        let password_present = not_blank(&self.password);
        let password_long = min_chars(&self.password, MIN_PASSWORD_CHARS);

        self.check_field(name_ok, "name", BLANK);
        self.check_field(email_present, "email", BLANK);
        self.check_field(email_shaped, "email", INVALID_EMAIL);
        self.check_field(password_present, "password", BLANK);
        self.check_field(password_long, "password", TOO_SHORT);
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub email: String,
    #[serde(default, skip_serializing)]
    pub password: String,
    #[serde(skip_deserializing)]
    pub validator: Validator,
}

impl LoginForm {
    pub const INCORRECT: &'static str = "Email or password is incorrect";

    pub fn validate(&mut self) {
        let email_present = not_blank(&self.email);
        let email_shaped = matches(&self.email, &EMAIL_RX);
        let password_present = not_blank(&self.password);

        self.check_field(email_present, "email", BLANK);
        self.check_field(email_shaped, "email", INVALID_EMAIL);
        self.check_field(password_present, "password", BLANK);
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PasswordUpdateForm {
    #[serde(default, skip_serializing)]
    pub current_password: String,
    #[serde(default, skip_serializing)]
    pub new_password: String,
    #[serde(default, skip_serializing)]
    pub new_password_confirmation: String,
    #[serde(skip_deserializing)]
    pub validator: Validator,
}

impl PasswordUpdateForm {
    pub const WRONG_CURRENT: &'static str = "Current password is incorrect";

    pub fn validate(&mut self) {
        let current_present = not_blank(&self.current_password);
        let new_present = not_blank(&self.new_password);
        let new_long = min_chars(&self.new_password, MIN_PASSWORD_CHARS);
        let confirmation_present = not_blank(&self.new_password_confirmation);
        let confirmation_equal = self.new_password == self.new_password_confirmation;

        self.check_field(current_present, "currentPassword", BLANK);
        self.check_field(new_present, "newPassword", BLANK);
        self.check_field(new_long, "newPassword", TOO_SHORT);
        self.check_field(confirmation_present, "newPasswordConfirmation", BLANK);
        self.check_field(
            confirmation_equal,
            "newPasswordConfirmation",
            "Passwords do not match",
        );
    }
}

macro_rules! impl_validated {
    ($($form:ty),* $(,)?) => {
        $(
            impl Validated for $form {
                fn validator(&self) -> &Validator {
                    &self.validator
                }

                fn validator_mut(&mut self) -> &mut Validator {
                    &mut self.validator
                }
            }
        )*
    };
}

impl_validated!(SignupForm, LoginForm, PasswordUpdateForm);
