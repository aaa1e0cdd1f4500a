//! DB-compatible (e.g. de/serialisable) types.
//!
//! The types in this module are serialised in a DB-friendly way, e.g.:
//!
//! - IDs and datetimes are serialised in MongoDB's own format.

pub mod admin;
pub mod form;
pub mod response;

pub use admin::{Admin, NewAdmin};
pub use form::{Form, NewForm, Question};
pub use response::{FormResponse, NewFormResponse};
