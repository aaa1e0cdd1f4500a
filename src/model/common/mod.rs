//! Types shared between the API layer and the database layer.

mod question;

pub use question::QuestionType;
