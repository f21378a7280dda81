use serde::{Deserialize, Serialize};

use super::BLANK;
use crate::validator::{max_chars, not_blank, permitted_value, Validated, Validator};

/// Lifetimes a snippet may be created with, in days.
pub const PERMITTED_EXPIRES: [i64; 3] = [1, 7, 365];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnippetCreateForm {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: String,
    pub expires: i64,
    #[serde(skip_deserializing)]
    pub validator: Validator,
}

impl Default for SnippetCreateForm {
    // "One year" is preselected on a blank form.
    fn default() -> Self {
        Self {
            title: String::new(),
            content: String::new(),
            expires: 365,
            validator: Validator::default(),
        }
    }
}

impl SnippetCreateForm {
    pub fn validate(&mut self) {
        let title_ok = not_blank(&self.title);
        let title_short = max_chars(&self.title, 100);
        let content_ok = not_blank(&self.content);
        let expires_ok = permitted_value(&self.expires, &PERMITTED_EXPIRES);

        self.check_field(title_ok, "title", BLANK);
        self.check_field(
            title_short,
            "title",
            "This field cannot be more than 100 characters",
        );
        self.check_field(content_ok, "content", BLANK);
        self.check_field(expires_ok, "expires", "This field must equal 1, 7 or 365");
    }
}

impl Validated for SnippetCreateForm {
    fn validator(&self) -> &Validator {
        &self.validator
    }

    fn validator_mut(&mut self) -> &mut Validator {
        &mut self.validator
    }
}
