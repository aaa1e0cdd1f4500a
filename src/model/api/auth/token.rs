use chrono::{serde::ts_seconds, DateTime, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, TokenData, Validation};
use rocket::{
    http::Status,
    request::{FromRequest, Outcome},
    Request, State,
};
use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::error::Error;
use crate::model::{api::id::ApiId, db::admin::Admin};

/// The HTTP header carrying the bearer token on protected routes.
pub const AUTHORIZATION_HEADER: &str = "Authorization";

const BEARER_PREFIX: &str = "Bearer ";

/// An authentication token representing a specific admin.
///
/// Tokens are stateless: expiry is the only termination mechanism, and the
/// guard never consults the database.
#[derive(Debug, Serialize, Deserialize)]
pub struct AuthToken {
    /// The admin's ID.
    #[serde(rename = "sub")]
    pub id: ApiId,
    /// The admin's email.
    pub email: String,
}

impl AuthToken {
    /// Create a new [`AuthToken`] for the given admin.
    pub fn new(admin: &Admin) -> Self {
        Self {
            id: admin.id.into(),
            email: admin.email.clone(),
        }
    }

    /// Sign this token into a bearer string, valid for `auth_ttl` from now.
    pub fn into_bearer(self, config: &Config) -> String {
        let claims = Claims {
            token: self,
            expire_at: Utc::now() + config.auth_ttl(),
        };

        jsonwebtoken::encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(config.jwt_secret()),
        )
        .expect("JWT encoding is infallible with default settings")
    }

    /// Verify and deserialize a bearer string. Fails on bad signatures and
    /// expired tokens.
    pub fn from_bearer(bearer: &str, config: &Config) -> Result<Self, Error> {
        let token = jsonwebtoken::decode(
            bearer,
            &DecodingKey::from_secret(config.jwt_secret()),
            &Validation::default(),
        )
        .map(|claims: TokenData<Claims>| claims.claims.token)?;
        Ok(token)
    }
}

/// Token claims: the token itself plus an expiry datetime.
#[derive(Serialize, Deserialize)]
struct Claims {
    #[serde(flatten)]
    token: AuthToken,
    #[serde(rename = "exp", with = "ts_seconds")]
    expire_at: DateTime<Utc>,
}

#[rocket::async_trait]
impl<'r> FromRequest<'r> for AuthToken {
    type Error = Error;

    /// Get an [`AuthToken`] from the `Authorization: Bearer` header.
    /// Missing, malformed, or expired tokens all fail with 401.
    async fn from_request(req: &'r Request<'_>) -> Outcome<Self, Self::Error> {
        // Unwrap is safe as `Config` is always managed.
        let config = req.guard::<&State<Config>>().await.unwrap();

        let header = match req.headers().get_one(AUTHORIZATION_HEADER) {
            Some(header) => header,
            None => {
                return Outcome::Failure((
                    Status::Unauthorized,
                    Error::unauthorized("Missing bearer token"),
                ));
            }
        };
        let bearer = match header.strip_prefix(BEARER_PREFIX) {
            Some(bearer) => bearer,
            None => {
                return Outcome::Failure((
                    Status::Unauthorized,
                    Error::unauthorized("Malformed Authorization header"),
                ));
            }
        };

        match Self::from_bearer(bearer, config) {
            Ok(token) => Outcome::Success(token),
            Err(err) => Outcome::Failure((Status::Unauthorized, err)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use chrono::Duration;
    use jsonwebtoken::errors::ErrorKind;

    #[test]
    fn round_trip() {
        let config = Config::example();
        let admin = Admin::example();

        let bearer = AuthToken::new(&admin).into_bearer(&config);
        let token = AuthToken::from_bearer(&bearer, &config).unwrap();
        assert_eq!(*token.id, admin.id);
        assert_eq!(token.email, admin.email);
    }

    #[test]
    fn expired_token_rejected() {
        let config = Config::example();
        let admin = Admin::example();

        let claims = Claims {
            token: AuthToken::new(&admin),
            expire_at: Utc::now() - Duration::hours(1),
        };
        let bearer = jsonwebtoken::encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(config.jwt_secret()),
        )
        .unwrap();

        let err = AuthToken::from_bearer(&bearer, &config).unwrap_err();
        match err {
            Error::Jwt(err) => assert_eq!(*err.kind(), ErrorKind::ExpiredSignature),
            other => panic!("expected JWT error, got {other:?}"),
        }
    }

    #[test]
    fn wrong_secret_rejected() {
        let config = Config::example();
        let bearer = AuthToken::new(&Admin::example()).into_bearer(&config);
        assert!(AuthToken::from_bearer(&bearer, &Config::example_other_secret()).is_err());
    }
}
