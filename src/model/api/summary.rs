use serde::{Serialize, Serializer};

use crate::model::{
    common::QuestionType,
    db::{form::Form, response::FormResponse},
};

/// Per-question aggregation over all responses to a form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type")]
pub enum QuestionSummary {
    /// Every answer given to a text question, in submission order. The API
    /// returns the full list; truncating for display is a frontend concern.
    #[serde(rename = "text")]
    Text {
        question: String,
        responses: Vec<String>,
    },
    /// Tally of a multiple-choice question: every declared option paired
    /// with its count, in option declaration order, with zero-count options
    /// present. Serialized as a JSON object whose keys keep that order.
    #[serde(rename = "multiple-choice")]
    MultipleChoice {
        question: String,
        #[serde(serialize_with = "counts_as_map")]
        counts: Vec<(String, u64)>,
    },
}

fn counts_as_map<S>(counts: &[(String, u64)], serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.collect_map(counts.iter().map(|(option, count)| (option, count)))
}

/// Produce one summary per question, in question order.
///
/// This is a full O(responses x questions) rescan on every call; the domain
/// has no throughput requirement that would justify caching. An answer that
/// matches no declared option is silently excluded from all counts; response
/// validation makes that unreachable, so this is purely defensive.
pub fn summarize(form: &Form, responses: &[FormResponse]) -> Vec<QuestionSummary> {
    form.questions
        .iter()
        .enumerate()
        .map(|(idx, question)| match question.question_type {
            QuestionType::Text => QuestionSummary::Text {
                question: question.text.clone(),
                responses: responses
                    .iter()
                    .filter_map(|response| response.answers.get(idx).cloned())
                    .collect(),
            },
            QuestionType::MultipleChoice => {
                let mut counts: Vec<(String, u64)> = question
                    .options
                    .iter()
                    .map(|option| (option.clone(), 0))
                    .collect();
                for response in responses {
                    if let Some(answer) = response.answers.get(idx) {
                        if let Some(entry) =
                            counts.iter_mut().find(|(option, _)| option == answer)
                        {
                            entry.1 += 1;
                        }
                    }
                }
                QuestionSummary::MultipleChoice {
                    question: question.text.clone(),
                    counts,
                }
            }
        })
        .collect()
}
