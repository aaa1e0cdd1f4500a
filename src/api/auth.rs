use mongodb::bson::doc;
use rocket::{
    http::Status,
    serde::json::{json, Json, Value},
    Route, State,
};
use serde::Serialize;

use crate::{
    config::Config,
    error::{Error, Result},
    model::{
        api::{admin::AdminCredentials, auth::AuthToken},
        db::admin::{Admin, NewAdmin},
        mongodb::Coll,
    },
};

pub fn routes() -> Vec<Route> {
    routes![register, login]
}

/// Register a new admin account.
#[post("/register", data = "<credentials>", format = "json")]
async fn register(
    credentials: Json<AdminCredentials>,
    admins: Coll<Admin>,
    new_admins: Coll<NewAdmin>,
) -> Result<(Status, Json<Value>)> {
    // Hash the password; this also validates the credentials.
    let admin: NewAdmin = credentials.0.try_into().map_err(Error::Validation)?;

    // Check email uniqueness.
    let with_email = doc! {
        "email": &admin.email,
    };
    if admins.find_one(with_email, None).await?.is_some() {
        return Err(Error::conflict(format!(
            "Email already registered: {}",
            admin.email
        )));
    }

    new_admins.insert_one(&admin, None).await?;
    info!("Registered admin {}", admin.email);
    Ok((
        Status::Created,
        Json(json!({"message": "Admin registered successfully"})),
    ))
}

#[derive(Debug, Serialize)]
struct LoginResponse {
    token: String,
}

/// Exchange valid credentials for a signed bearer token.
///
/// The same message is returned for an unknown email and a wrong password,
/// so the endpoint cannot be used to probe for registered addresses.
#[post("/login", data = "<credentials>", format = "json")]
async fn login(
    credentials: Json<AdminCredentials>,
    admins: Coll<Admin>,
    config: &State<Config>,
) -> Result<Json<LoginResponse>> {
    let with_email = doc! {
        "email": &credentials.email,
    };

    let admin = admins
        .find_one(with_email, None)
        .await?
        .filter(|admin| admin.verify_password(&credentials.password))
        .ok_or_else(|| Error::unauthorized("Invalid credentials"))?;

    let token = AuthToken::new(&admin).into_bearer(config);
    Ok(Json(LoginResponse { token }))
}

#[cfg(test)]
mod tests {
    use rocket::{
        http::{ContentType, Status},
        local::asynchronous::Client,
        serde::json,
    };

    use super::*;

    // These tests drive the full routes and need a reachable MongoDB; each
    // one gets a fresh randomly-named database.

    async fn client() -> Client {
        Client::tracked(crate::build())
            .await
            .expect("failed to build test server")
    }

    async fn register_ok(client: &Client, body: &str) {
        let response = client
            .post("/api/auth/register")
            .header(ContentType::JSON)
            .body(body)
            .dispatch()
            .await;
        assert_eq!(response.status(), Status::Created);
    }

    #[rocket::async_test]
    #[ignore = "requires a running MongoDB"]
    async fn duplicate_registration_conflicts() {
        let client = client().await;
        let body = json::to_string(&AdminCredentials::example()).unwrap();
        register_ok(&client, &body).await;

        let response = client
            .post("/api/auth/register")
            .header(ContentType::JSON)
            .body(&body)
            .dispatch()
            .await;
        assert_eq!(response.status(), Status::Conflict);
    }

    #[rocket::async_test]
    #[ignore = "requires a running MongoDB"]
    async fn wrong_password_unauthorized() {
        let client = client().await;
        register_ok(&client, &json::to_string(&AdminCredentials::example()).unwrap()).await;

        let mut credentials = AdminCredentials::example();
        credentials.password = "not the password".into();
        let response = client
            .post("/api/auth/login")
            .header(ContentType::JSON)
            .body(json::to_string(&credentials).unwrap())
            .dispatch()
            .await;
        assert_eq!(response.status(), Status::Unauthorized);
    }
}
