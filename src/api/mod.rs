use rocket::{
    http::Status,
    serde::json::{json, Json, Value},
    Catcher, Request, Route,
};

pub mod auth;
pub mod forms;

/// Root-level routes: health check and CORS preflight.
pub fn routes() -> Vec<Route> {
    routes![health, preflight]
}

pub fn catchers() -> Vec<Catcher> {
    catchers![fallback]
}

#[get("/")]
fn health() -> &'static str {
    "Feedback Collection Platform API is running"
}

/// Answer CORS preflights for any path; the headers themselves come from
/// [`crate::cors::CorsFairing`].
#[options("/<_..>")]
fn preflight() {}

/// Uniform JSON bodies for errors that never reach a route, e.g. failed
/// request guards and unmatched paths.
#[catch(default)]
fn fallback(status: Status, _req: &Request) -> Json<Value> {
    Json(json!({"message": status.reason_lossy()}))
}
