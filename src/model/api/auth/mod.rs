mod token;

pub use token::{AuthToken, AUTHORIZATION_HEADER};
