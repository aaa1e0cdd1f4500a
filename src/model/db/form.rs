use std::ops::{Deref, DerefMut};

use chrono::{DateTime, Utc};
use mongodb::bson::serde_helpers::chrono_datetime_as_bson_datetime;
use serde::{Deserialize, Serialize};

use crate::model::{common::QuestionType, mongodb::Id};

/// A single question, embedded in its form.
///
/// Questions are immutable once the form is saved; there is no edit endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    /// Question text.
    pub text: String,
    /// Question kind.
    #[serde(rename = "type")]
    pub question_type: QuestionType,
    /// Possible answers; non-empty iff `question_type` is multiple-choice.
    #[serde(default)]
    pub options: Vec<String>,
}

/// Core form data, as stored in the database.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormCore {
    /// Form title.
    pub title: String,
    /// Ordered questions; always between 3 and 5 of them.
    pub questions: Vec<Question>,
    /// The admin that created this form. Ownership never changes.
    pub owner: Id,
    /// Creation time.
    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,
}

/// A form without an ID.
pub type NewForm = FormCore;

/// A form from the database, with its unique ID.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Form {
    #[serde(rename = "_id")]
    pub id: Id,
    #[serde(flatten)]
    pub form: FormCore,
}

impl Deref for Form {
    type Target = FormCore;

    fn deref(&self) -> &Self::Target {
        &self.form
    }
}

impl DerefMut for Form {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.form
    }
}

/// Example data for tests.
#[cfg(test)]
mod examples {
    use super::*;

    use crate::model::api::form::FormSpec;

    impl Form {
        /// A form with one multiple-choice question followed by two text questions.
        pub fn example() -> Self {
            Self {
                id: Id::new(),
                form: FormSpec::example().into_form(Id::new()),
            }
        }
    }
}
