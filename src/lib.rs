#[macro_use]
extern crate rocket;

#[macro_use]
extern crate log;

use rocket::{Build, Rocket};

pub mod api;
pub mod config;
pub mod cors;
pub mod error;
pub mod logging;
pub mod model;

use config::{ConfigFairing, DatabaseFairing};
use cors::CorsFairing;
use logging::LoggerFairing;

/// Assemble the server: all routes plus the startup fairings. Config
/// loading and the database connection happen at ignition.
pub fn build() -> Rocket<Build> {
    rocket::build()
        .mount("/", api::routes())
        .mount("/api/auth", api::auth::routes())
        .mount("/api/forms", api::forms::routes())
        .register("/", api::catchers())
        .attach(ConfigFairing)
        .attach(DatabaseFairing)
        .attach(CorsFairing)
        .attach(LoggerFairing)
}
