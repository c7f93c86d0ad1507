use crate::error::ApiError;
use crate::models::{Credentials, MessageResponse};
use crate::services::user_service;
use crate::AppState;
use log::{info, warn};
use rocket::http::Status;
use rocket::serde::json::Json;
use rocket::{post, State};

#[post("/register", data = "<credentials>")]
pub async fn register(
    credentials: Json<Credentials>,
    state: &State<AppState>,
) -> Result<(Status, Json<MessageResponse>), ApiError> {
    let Some((username, password)) = credentials.pair() else {
        warn!("Rejected registration with missing fields");
        return Err(ApiError::BadRequest("Invalid data".to_string()));
    };

    user_service::create_user(&state.config.database_url, username, password)
        .await
        .map_err(ApiError::Database)?;

    info!("Registered user {username}");
    Ok((
        Status::Created,
        Json(MessageResponse::new("User registered successfully")),
    ))
}

#[post("/login", data = "<credentials>")]
pub async fn login(
    credentials: Json<Credentials>,
    state: &State<AppState>,
) -> Result<Json<MessageResponse>, ApiError> {
    let invalid = || ApiError::Unauthorized("Invalid credentials".to_string());

    let (username, password) = credentials.pair().ok_or_else(invalid)?;

    let valid = user_service::verify_user(&state.config.database_url, username, password)
        .await
        .map_err(ApiError::Database)?;

    if valid {
        info!("User {username} logged in");
        Ok(Json(MessageResponse::new("Login successful")))
    } else {
        warn!("Failed login for {username}");
        Err(invalid())
    }
}
