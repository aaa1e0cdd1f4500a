use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::model::{
    api::id::ApiId,
    common::QuestionType,
    db::{
        form::Form,
        response::{FormResponse, NewFormResponse},
    },
    mongodb::Id,
};

/// A response submission, received from an anonymous respondent.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ResponseSpec {
    /// One answer per question, in question order.
    pub answers: Vec<String>,
}

impl ResponseSpec {
    /// Validate the answers against the form's schema.
    ///
    /// Unlike form validation, this fails fast: the error identifies the
    /// first offending question only. Text answers must be non-empty once
    /// trimmed; multiple-choice answers must exactly match one of the
    /// question's options (case-sensitive).
    pub fn validate_against(&self, form: &Form) -> Result<(), Error> {
        if self.answers.len() != form.questions.len() {
            return Err(Error::bad_request(format!(
                "Expected {} answers, got {}",
                form.questions.len(),
                self.answers.len()
            )));
        }

        for (idx, (question, answer)) in form.questions.iter().zip(&self.answers).enumerate() {
            match question.question_type {
                QuestionType::Text => {
                    if answer.trim().is_empty() {
                        return Err(Error::bad_request(format!(
                            "Question {}: answer must not be empty",
                            idx + 1
                        )));
                    }
                }
                QuestionType::MultipleChoice => {
                    if !question.options.iter().any(|option| option == answer) {
                        return Err(Error::bad_request(format!(
                            "Question {}: answer must be one of the listed options",
                            idx + 1
                        )));
                    }
                }
            }
        }

        Ok(())
    }

    /// Convert this spec into a response to the given form, storing the
    /// answers verbatim. The spec must already have been validated.
    pub fn into_response(self, form: Id) -> NewFormResponse {
        NewFormResponse {
            form,
            answers: self.answers,
            submitted_at: Utc::now(),
        }
    }
}

/// An API-friendly response description.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResponseDescription {
    /// Response unique ID.
    pub id: ApiId,
    /// One answer per question, in question order.
    pub answers: Vec<String>,
    /// Submission time.
    pub submitted_at: DateTime<Utc>,
}

impl From<FormResponse> for ResponseDescription {
    fn from(response: FormResponse) -> Self {
        Self {
            id: response.id.into(),
            answers: response.response.answers,
            submitted_at: response.response.submitted_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spec(answers: Vec<&str>) -> ResponseSpec {
        ResponseSpec {
            answers: answers.into_iter().map(String::from).collect(),
        }
    }

    // `Form::example()` has a multiple-choice question (Daily/Weekly/Rarely)
    // followed by two text questions.

    #[test]
    fn valid_submission_accepted() {
        let form = Form::example();
        assert!(spec(vec!["Daily", "More soup", "None"])
            .validate_against(&form)
            .is_ok());
    }

    #[test]
    fn wrong_answer_count_rejected() {
        let form = Form::example();
        for answers in [vec![], vec!["Daily", "More soup"]] {
            let err = spec(answers).validate_against(&form).unwrap_err();
            assert!(err.to_string().contains("Expected 3 answers"));
        }
    }

    #[test]
    fn unlisted_choice_identifies_question() {
        let form = Form::example();
        let err = spec(vec!["Sometimes", "More soup", "None"])
            .validate_against(&form)
            .unwrap_err();
        assert!(err.to_string().starts_with("Question 1:"));
    }

    #[test]
    fn choice_match_is_case_sensitive() {
        let form = Form::example();
        assert!(spec(vec!["daily", "More soup", "None"])
            .validate_against(&form)
            .is_err());
    }

    #[test]
    fn blank_text_answer_identifies_question() {
        let form = Form::example();
        let err = spec(vec!["Daily", "   ", "None"])
            .validate_against(&form)
            .unwrap_err();
        assert!(err.to_string().starts_with("Question 2:"));
    }

    #[test]
    fn fail_fast_reports_first_failure_only() {
        let form = Form::example();
        let err = spec(vec!["Daily", "", ""]).validate_against(&form).unwrap_err();
        assert!(err.to_string().starts_with("Question 2:"));
    }

    #[test]
    fn answers_stored_verbatim() {
        let form = Form::example();
        let submission = spec(vec!["Daily", "  padded  ", "None"]);
        submission.validate_against(&form).unwrap();
        let response = submission.into_response(form.id);
        assert_eq!(response.form, form.id);
        assert_eq!(response.answers[1], "  padded  ");
    }
}
