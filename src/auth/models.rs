// Authentication data models and DTOs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

/// User database model
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub password_hash: String,
    pub image_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Fields needed to insert a user row
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub password_hash: String,
    pub image_url: Option<String>,
}

/// Email and password after presence checks
#[derive(Debug, Clone, Validate)]
pub struct Credentials {
    #[validate(length(min = 1))]
    pub email: String,
    #[validate(length(min = 1))]
    pub password: String,
}

/// Multipart registration form, for the OpenAPI document only
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterForm {
    #[schema(example = "a@x.com")]
    pub email: String,
    #[schema(example = "secret1")]
    pub password: String,
    #[schema(value_type = Option<String>, format = Binary)]
    pub profile_image: Option<Vec<u8>>,
}

/// Login request body
///
/// Fields are optional so a missing field is reported as a 400 by the
/// service rather than rejected by the JSON extractor.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct LoginRequest {
    #[serde(default)]
    #[schema(example = "a@x.com")]
    pub email: Option<String>,
    #[serde(default)]
    #[schema(example = "secret1")]
    pub password: Option<String>,
}

/// Public view of a newly registered user
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisteredUser {
    pub id: Uuid,
    #[schema(example = "a@x.com")]
    pub email: String,
    #[schema(example = "https://res.cloudinary.com/demo/image/upload/profile_images/a.png")]
    pub image_url: Option<String>,
}

impl From<User> for RegisteredUser {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            image_url: user.image_url,
        }
    }
}

/// Registration response body
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct RegisterResponse {
    pub user: RegisteredUser,
    pub token: String,
}

/// Login response body
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct LoginResponse {
    pub token: String,
}

/// Profile view (excludes password_hash and image)
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ProfileUser {
    pub id: Uuid,
    #[schema(example = "a@x.com")]
    pub email: String,
}

impl From<User> for ProfileUser {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
        }
    }
}

/// Profile response body
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ProfileResponse {
    pub user: ProfileUser,
}

/// Error response body shared by every failure
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    #[schema(example = "Invalid email or password")]
    pub message: String,
}
