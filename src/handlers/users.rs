//! User handlers: list, signup, login.

use super::json_object;
use crate::error::AppError;
use crate::model::{Credentials, NewUser};
use crate::response::{success_created, success_ok, MessageEnvelope, UserEnvelope, UsersEnvelope};
use crate::service::{text, RequestValidator, UserService, INVALID_CREDENTIALS, LOGIN_RULES, SIGNUP_RULES};
use crate::state::AppState;
use axum::{
    extract::{rejection::JsonRejection, State},
    response::IntoResponse,
    Json,
};
use serde_json::Value;

pub const INVALID_USER_INPUT: &str = "Invalid inputs passed, please check your data.";
pub const LOGGED_IN: &str = "Logged in!";

pub async fn get_users(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let users = UserService::list(&state).await?;
    Ok(success_ok(UsersEnvelope { users }))
}

pub async fn signup(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let body = json_object(payload, INVALID_USER_INPUT)?;
    RequestValidator::validate(&body, SIGNUP_RULES, INVALID_USER_INPUT)?;
    let input = NewUser {
        name: text(&body, "name"),
        email: text(&body, "email").to_lowercase(),
        // passwords are taken verbatim
        password: body.get("password").and_then(Value::as_str).unwrap_or_default().to_string(),
    };
    let user = UserService::signup(&state, input).await?;
    Ok(success_created(UserEnvelope { user }))
}

pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let body = json_object(payload, INVALID_USER_INPUT)?;
    // missing credentials are rejected like wrong ones
    RequestValidator::validate(&body, LOGIN_RULES, INVALID_USER_INPUT)
        .map_err(|_| AppError::Unauthorized(INVALID_CREDENTIALS))?;
    let credentials = Credentials {
        email: text(&body, "email").to_lowercase(),
        password: body.get("password").and_then(Value::as_str).unwrap_or_default().to_string(),
    };
    let user = UserService::login(&state, credentials).await?;
    Ok(success_ok(MessageEnvelope {
        message: LOGGED_IN,
        user: Some(user),
    }))
}
