use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

/// The kind of a form question.
///
/// Unknown kinds are rejected at deserialisation time, so a question that
/// reaches validation always has a recognised type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum QuestionType {
    /// Free-text answer.
    Text,
    /// Answer must be one of the question's declared options.
    MultipleChoice,
}

impl Display for QuestionType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Text => write!(f, "text"),
            Self::MultipleChoice => write!(f, "multiple-choice"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use rocket::serde::json;

    #[test]
    fn wire_names() {
        assert_eq!(json::to_string(&QuestionType::Text).unwrap(), "\"text\"");
        assert_eq!(
            json::to_string(&QuestionType::MultipleChoice).unwrap(),
            "\"multiple-choice\""
        );
        assert_eq!(
            json::from_str::<QuestionType>("\"multiple-choice\"").unwrap(),
            QuestionType::MultipleChoice
        );
    }

    #[test]
    fn unknown_type_rejected() {
        assert!(json::from_str::<QuestionType>("\"checkbox\"").is_err());
    }
}
