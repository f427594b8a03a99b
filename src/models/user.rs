// src/models/user.rs

use serde::{Deserialize, Serialize};
use validator::Validate;

/// A registered user as stored in `users.json`.
///
/// Never serialized into API responses directly (the hash would leak);
/// handlers return [`UserResponse`] instead.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// Unique username; doubles as the analytics user id.
    pub username: String,

    /// Argon2 password hash.
    pub password_hash: String,

    pub created_at: chrono::DateTime<chrono::Utc>,

    /// Ids of quizzes created by this user, in creation order.
    #[serde(default)]
    pub quizzes: Vec<String>,
}

/// Public view of a user, safe to return from handlers.
#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub username: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        Self {
            username: user.username.clone(),
            created_at: user.created_at,
        }
    }
}

/// DTO for creating a new user (Registration).
#[derive(Debug, Deserialize, Validate)]
pub struct CreateUserRequest {
    #[validate(length(
        min = 3,
        max = 50,
        message = "Username length must be between 3 and 50 characters."
    ))]
    pub username: String,
    #[validate(length(
        min = 4,
        max = 128,
        message = "Password length must be between 4 and 128 characters."
    ))]
    pub password: String,
}

/// DTO for user login.
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1, max = 50))]
    pub username: String,
    #[validate(length(min = 1, max = 128))]
    pub password: String,
}
