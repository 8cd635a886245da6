//! Account listing, signup and login.

use crate::error::AppError;
use crate::model::{Credentials, NewUser, User, UserView};
use crate::security::{hash_password_blocking, verify_password_blocking};
use crate::state::AppState;
use crate::store::StoreError;
use chrono::Utc;
use uuid::Uuid;

pub const LIST_FAILED: &str = "Fetching users failed, please try again later.";
pub const SIGNUP_FAILED: &str = "Signing up failed, please try again later.";
pub const USER_EXISTS: &str = "User exists already, please login instead.";
pub const LOGIN_FAILED: &str = "Logging in failed, please try again later.";
pub const INVALID_CREDENTIALS: &str = "Invalid credentials, could not log you in.";

pub struct UserService;

impl UserService {
    pub async fn list(state: &AppState) -> Result<Vec<UserView>, AppError> {
        state
            .store
            .list_users()
            .await
            .map_err(|e| AppError::internal(LIST_FAILED, e))
    }

    /// `input.email` must already be lower-cased.
    pub async fn signup(state: &AppState, input: NewUser) -> Result<UserView, AppError> {
        let existing = state
            .store
            .find_user_by_email(&input.email)
            .await
            .map_err(|e| AppError::internal(SIGNUP_FAILED, e))?;
        if existing.is_some() {
            return Err(AppError::Unprocessable(USER_EXISTS));
        }

        let password_hash = hash_password_blocking(input.password)
            .await
            .map_err(|e| AppError::internal(SIGNUP_FAILED, e))?;
        let user = User {
            id: Uuid::new_v4(),
            name: input.name,
            email: input.email,
            password_hash,
            image: state.default_user_image.clone(),
            created_at: Utc::now(),
        };
        state.store.save_user(&user).await.map_err(|e| match e {
            StoreError::DuplicateEmail(_) => AppError::Unprocessable(USER_EXISTS),
            other => AppError::internal(SIGNUP_FAILED, other),
        })?;
        tracing::info!(user_id = %user.id, "user signed up");
        Ok(UserView::from_user(&user, 0))
    }

    pub async fn login(state: &AppState, credentials: Credentials) -> Result<UserView, AppError> {
        let user = state
            .store
            .find_user_by_email(&credentials.email)
            .await
            .map_err(|e| AppError::internal(LOGIN_FAILED, e))?
            .ok_or(AppError::Unauthorized(INVALID_CREDENTIALS))?;

        let valid = verify_password_blocking(credentials.password, user.password_hash.clone())
            .await
            .map_err(|e| AppError::internal(LOGIN_FAILED, e))?;
        if !valid {
            tracing::info!(user_id = %user.id, "login rejected");
            return Err(AppError::Unauthorized(INVALID_CREDENTIALS));
        }

        let places = state
            .store
            .count_places_by_creator(user.id)
            .await
            .map_err(|e| AppError::internal(LOGIN_FAILED, e))?;
        Ok(UserView::from_user(&user, places))
    }
}
