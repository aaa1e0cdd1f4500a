//! API-compatible types.
//!
//! The types in this module are serialised in an API-friendly way, e.g.:
//!
//! - IDs are serialised as hex strings.
//! - Datetimes are serialised as RFC 3339 strings.
//!
//! Request payloads deny unknown fields, so misshapen input is rejected
//! deterministically at deserialisation time.

pub mod admin;
pub mod auth;
pub mod export;
pub mod form;
pub mod id;
pub mod pagination;
pub mod response;
pub mod summary;
