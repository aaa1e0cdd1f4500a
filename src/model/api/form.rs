use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Error, FieldError};
use crate::model::{
    api::id::ApiId,
    common::QuestionType,
    db::form::{Form, NewForm, Question},
    mongodb::Id,
};

/// Bounds on the form schema. A form outside these is rejected outright.
pub const MIN_QUESTIONS: usize = 3;
pub const MAX_QUESTIONS: usize = 5;
pub const MIN_OPTIONS: usize = 2;

/// A form specification, received from an admin.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FormSpec {
    /// Form title.
    pub title: String,
    /// Ordered question specifications.
    pub questions: Vec<QuestionSpec>,
}

/// A question specification.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct QuestionSpec {
    /// Question text.
    pub text: String,
    /// Question kind.
    #[serde(rename = "type")]
    pub question_type: QuestionType,
    /// Possible answers; required for multiple-choice, forbidden for text.
    #[serde(default)]
    pub options: Vec<String>,
}

impl FormSpec {
    /// Validate the whole spec, reporting every field-level problem at once.
    ///
    /// Accepts only if the title is non-empty, there are between
    /// [`MIN_QUESTIONS`] and [`MAX_QUESTIONS`] questions, every question has
    /// non-empty text, and every multiple-choice question has at least
    /// [`MIN_OPTIONS`] non-empty options. Duplicate options are permitted.
    pub fn validate(&self) -> Result<(), Error> {
        let mut errors = Vec::new();

        if self.title.trim().is_empty() {
            errors.push(FieldError::new("title", "title must not be empty"));
        }
        if self.questions.len() < MIN_QUESTIONS || self.questions.len() > MAX_QUESTIONS {
            errors.push(FieldError::new(
                "questions",
                format!("a form must have between {MIN_QUESTIONS} and {MAX_QUESTIONS} questions"),
            ));
        }

        for (idx, question) in self.questions.iter().enumerate() {
            if question.text.trim().is_empty() {
                errors.push(FieldError::new(
                    format!("questions[{idx}].text"),
                    "question text must not be empty",
                ));
            }
            match question.question_type {
                QuestionType::Text => {
                    if !question.options.is_empty() {
                        errors.push(FieldError::new(
                            format!("questions[{idx}].options"),
                            "text questions must not have options",
                        ));
                    }
                }
                QuestionType::MultipleChoice => {
                    if question.options.len() < MIN_OPTIONS {
                        errors.push(FieldError::new(
                            format!("questions[{idx}].options"),
                            format!(
                                "multiple-choice questions must have at least {MIN_OPTIONS} options"
                            ),
                        ));
                    }
                    for (opt_idx, option) in question.options.iter().enumerate() {
                        if option.trim().is_empty() {
                            errors.push(FieldError::new(
                                format!("questions[{idx}].options[{opt_idx}]"),
                                "option text must not be empty",
                            ));
                        }
                    }
                }
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(Error::Validation(errors))
        }
    }

    /// Convert this spec into a form owned by the given admin.
    /// The spec must already have been validated.
    pub fn into_form(self, owner: Id) -> NewForm {
        NewForm {
            title: self.title,
            questions: self.questions.into_iter().map(QuestionSpec::into_question).collect(),
            owner,
            created_at: Utc::now(),
        }
    }
}

impl QuestionSpec {
    fn into_question(self) -> Question {
        Question {
            text: self.text,
            question_type: self.question_type,
            options: self.options,
        }
    }
}

/// An API-friendly form description. It never contains the owner, so the
/// same type serves both the owner's dashboard and the public form view.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FormDescription {
    /// Form unique ID.
    pub id: ApiId,
    /// Form title.
    pub title: String,
    /// Ordered questions.
    pub questions: Vec<Question>,
    /// Creation time.
    pub created_at: DateTime<Utc>,
}

impl From<Form> for FormDescription {
    fn from(form: Form) -> Self {
        Self {
            id: form.id.into(),
            title: form.form.title,
            questions: form.form.questions,
            created_at: form.form.created_at,
        }
    }
}
