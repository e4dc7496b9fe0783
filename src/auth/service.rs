// Account service - registration, login and profile lookup

use std::sync::Arc;

use tracing::{debug, info};
use uuid::Uuid;
use validator::Validate;

use crate::auth::{
    error::AuthError,
    models::{
        Credentials, LoginResponse, NewUser, ProfileResponse, ProfileUser, RegisterResponse,
    },
    password::PasswordService,
    repository::UserStore,
    token::TokenService,
};
use crate::media::{ImageUpload, ImageUploader, PROFILE_IMAGE_FOLDER};

const MISSING_CREDENTIALS: &str = "Email and password are required";

/// Coordinates the hasher, token service and both collaborators
pub struct AccountService {
    users: Arc<dyn UserStore>,
    uploader: Arc<dyn ImageUploader>,
    tokens: Arc<TokenService>,
}

impl AccountService {
    /// Create a new AccountService
    pub fn new(
        users: Arc<dyn UserStore>,
        uploader: Arc<dyn ImageUploader>,
        tokens: Arc<TokenService>,
    ) -> Self {
        Self {
            users,
            uploader,
            tokens,
        }
    }

    /// Token service shared with the auth gate
    pub fn tokens(&self) -> Arc<TokenService> {
        Arc::clone(&self.tokens)
    }

    /// Register a new user
    ///
    /// The image is uploaded before anything is persisted so a failed upload
    /// never leaves a user row behind. Email uniqueness is left to the store.
    pub async fn register(
        &self,
        email: Option<String>,
        password: Option<String>,
        image: Option<ImageUpload>,
    ) -> Result<RegisterResponse, AuthError> {
        let credentials = require_credentials(email, password)?;

        let image_url = match image.filter(|image| !image.bytes.is_empty()) {
            Some(image) => Some(
                self.uploader
                    .upload(image, PROFILE_IMAGE_FOLDER)
                    .await
                    .map_err(|e| AuthError::UploadError(e.to_string()))?,
            ),
            None => None,
        };

        let password_hash = hash_off_thread(credentials.password).await?;

        let user = self
            .users
            .create_user(NewUser {
                email: credentials.email,
                password_hash,
                image_url,
            })
            .await?;

        let token = self.tokens.issue(user.id, &user.email)?;

        info!("Registered user {}", user.id);
        Ok(RegisterResponse {
            user: user.into(),
            token,
        })
    }

    /// Login a user
    ///
    /// Unknown email and wrong password produce the same error.
    pub async fn login(
        &self,
        email: Option<String>,
        password: Option<String>,
    ) -> Result<LoginResponse, AuthError> {
        let credentials = require_credentials(email, password)?;

        let user = match self.users.find_by_email(&credentials.email).await? {
            Some(user) => user,
            None => {
                debug!("Login for unknown email");
                return Err(AuthError::InvalidCredentials);
            }
        };

        if !verify_off_thread(credentials.password, user.password_hash.clone()).await? {
            debug!("Password mismatch for user {}", user.id);
            return Err(AuthError::InvalidCredentials);
        }

        let token = self.tokens.issue(user.id, &user.email)?;

        info!("User {} logged in", user.id);
        Ok(LoginResponse { token })
    }

    /// Fetch the profile of an authenticated user
    ///
    /// Always re-reads the store; the token's claims only supply the id.
    pub async fn get_profile(&self, user_id: Uuid) -> Result<ProfileResponse, AuthError> {
        let user = self
            .users
            .find_by_id(user_id)
            .await?
            .ok_or(AuthError::NotFound)?;

        Ok(ProfileResponse {
            user: ProfileUser::from(user),
        })
    }
}

fn require_credentials(
    email: Option<String>,
    password: Option<String>,
) -> Result<Credentials, AuthError> {
    let credentials = Credentials {
        email: email.unwrap_or_default(),
        password: password.unwrap_or_default(),
    };

    credentials
        .validate()
        .map_err(|_| AuthError::ValidationError(MISSING_CREDENTIALS.to_string()))?;

    Ok(credentials)
}

async fn hash_off_thread(password: String) -> Result<String, AuthError> {
    tokio::task::spawn_blocking(move || PasswordService::hash_password(&password))
        .await
        .map_err(|e| AuthError::HashingError(e.to_string()))?
}

async fn verify_off_thread(password: String, hash: String) -> Result<bool, AuthError> {
    tokio::task::spawn_blocking(move || PasswordService::verify_password(&password, &hash))
        .await
        .map_err(|e| AuthError::HashingError(e.to_string()))
}
