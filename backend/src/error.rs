use crate::models::ErrorResponse;
use rocket::http::Status;
use rocket::request::Request;
use rocket::response::{self, Responder};
use rocket::serde::json::Json;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    Unauthorized(String),
    #[error("upstream request failed: {0:#}")]
    Upstream(anyhow::Error),
    #[error("database error: {0:#}")]
    Database(anyhow::Error),
}

impl ApiError {
    pub fn status(&self) -> Status {
        match self {
            ApiError::BadRequest(_) => Status::BadRequest,
            ApiError::Unauthorized(_) => Status::Unauthorized,
            ApiError::Upstream(_) | ApiError::Database(_) => Status::InternalServerError,
        }
    }

    fn body(&self) -> ErrorResponse {
        match self {
            ApiError::BadRequest(msg) | ApiError::Unauthorized(msg) => ErrorResponse {
                error: msg.clone(),
                details: None,
            },
            ApiError::Upstream(e) => ErrorResponse {
                error: "Search failed".to_string(),
                details: Some(format!("{e:#}")),
            },
            // Storage internals stay in the log.
            ApiError::Database(_) => ErrorResponse {
                error: "Internal server error".to_string(),
                details: None,
            },
        }
    }
}

impl<'r> Responder<'r, 'static> for ApiError {
    fn respond_to(self, request: &'r Request<'_>) -> response::Result<'static> {
        if self.status() == Status::InternalServerError {
            log::error!("{} {} failed: {self}", request.method(), request.uri().path());
        }
        (self.status(), Json(self.body())).respond_to(request)
    }
}
