// HTTP handlers for authentication endpoints

use axum::{
    extract::{multipart::MultipartRejection, rejection::JsonRejection, Multipart, State},
    http::StatusCode,
    Json,
};
use tracing::debug;

use crate::auth::{
    error::AuthError,
    middleware::AuthenticatedUser,
    models::{LoginRequest, LoginResponse, ProfileResponse, RegisterResponse},
};
use crate::media::ImageUpload;
use crate::AppState;

/// Multipart field carrying the optional profile image
const PROFILE_IMAGE_FIELD: &str = "profileImage";

/// Handler for GET /
#[utoipa::path(
    get,
    path = "/",
    responses((status = 200, description = "Service greeting", body = String)),
    tag = "auth"
)]
pub async fn root_handler() -> &'static str {
    "Hello from Profile Auth API!"
}

/// Register a new user
/// POST /register (multipart: email, password, optional profileImage)
#[utoipa::path(
    post,
    path = "/register",
    request_body(content = RegisterForm, content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "User registered", body = RegisterResponse),
        (status = 400, description = "Missing email or password", body = MessageResponse),
        (status = 500, description = "Upload or database error", body = MessageResponse)
    ),
    tag = "auth"
)]
pub async fn register_handler(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<(StatusCode, Json<RegisterResponse>), AuthError> {
    let mut multipart = multipart.map_err(|e| {
        debug!("Rejected register body: {}", e);
        AuthError::ValidationError("Expected a multipart form body".to_string())
    })?;

    let mut email = None;
    let mut password = None;
    let mut image = None;

    while let Some(field) = multipart.next_field().await.map_err(|e| {
        debug!("Malformed multipart body: {}", e);
        AuthError::ValidationError("Malformed multipart body".to_string())
    })? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "email" => email = Some(read_text(field).await?),
            "password" => password = Some(read_text(field).await?),
            PROFILE_IMAGE_FIELD => {
                let file_name = field.file_name().map(str::to_string);
                let content_type = field.content_type().map(str::to_string);
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| AuthError::ValidationError(e.to_string()))?;
                image = Some(ImageUpload {
                    bytes: bytes.to_vec(),
                    file_name,
                    content_type,
                });
            }
            other => debug!("Ignoring unknown multipart field: {}", other),
        }
    }

    let response = state.accounts.register(email, password, image).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

async fn read_text(field: axum::extract::multipart::Field<'_>) -> Result<String, AuthError> {
    field
        .text()
        .await
        .map_err(|e| AuthError::ValidationError(e.to_string()))
}

/// Login a user
/// POST /login
#[utoipa::path(
    post,
    path = "/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Logged in", body = LoginResponse),
        (status = 400, description = "Missing email or password", body = MessageResponse),
        (status = 401, description = "Invalid email or password", body = MessageResponse)
    ),
    tag = "auth"
)]
pub async fn login_handler(
    State(state): State<AppState>,
    request: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<LoginResponse>, AuthError> {
    let Json(request) = request.map_err(|e| {
        debug!("Rejected login body: {}", e);
        AuthError::ValidationError("Email and password are required".to_string())
    })?;

    let response = state.accounts.login(request.email, request.password).await?;
    Ok(Json(response))
}

/// Get the authenticated user's profile (protected endpoint)
/// GET /profile
#[utoipa::path(
    get,
    path = "/profile",
    responses(
        (status = 200, description = "Current user", body = ProfileResponse),
        (status = 401, description = "No or invalid token", body = MessageResponse),
        (status = 404, description = "User not found", body = MessageResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "auth"
)]
pub async fn profile_handler(
    State(state): State<AppState>,
    user: AuthenticatedUser,
) -> Result<Json<ProfileResponse>, AuthError> {
    let response = state.accounts.get_profile(user.user_id).await?;
    Ok(Json(response))
}
