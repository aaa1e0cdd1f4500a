use rocket::{
    fairing::{Fairing, Info, Kind},
    http::Header,
    Request, Response,
};

use crate::config::Config;

/// A fairing that attaches CORS headers for the configured frontend origin.
/// Preflight `OPTIONS` requests are answered by the catch-all route in
/// [`crate::api`]; this fairing supplies the headers on every response.
pub struct CorsFairing;

#[rocket::async_trait]
impl Fairing for CorsFairing {
    fn info(&self) -> Info {
        Info {
            name: "CORS",
            kind: Kind::Response,
        }
    }

    async fn on_response<'r>(&self, req: &'r Request<'_>, res: &mut Response<'r>) {
        // `Config` is managed unless ignition failed, in which case there are
        // no responses to decorate anyway.
        if let Some(config) = req.rocket().state::<Config>() {
            res.set_header(Header::new(
                "Access-Control-Allow-Origin",
                config.frontend_origin().to_string(),
            ));
            res.set_header(Header::new(
                "Access-Control-Allow-Methods",
                "GET, POST, OPTIONS",
            ));
            res.set_header(Header::new(
                "Access-Control-Allow-Headers",
                "Authorization, Content-Type",
            ));
        }
    }
}
