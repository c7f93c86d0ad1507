use crate::models::ErrorResponse;
use rocket::http::Status;
use rocket::serde::json::Json;
use rocket::{catch, Request};

/// JSON body for every error Rocket answers on its own (bad bodies, unknown routes).
#[catch(default)]
pub fn json_error(status: Status, _request: &Request<'_>) -> (Status, Json<ErrorResponse>) {
    let body = ErrorResponse {
        error: status.reason().unwrap_or("Unknown error").to_string(),
        details: None,
    };
    (status, Json(body))
}
