pub mod auth;
pub mod config;
pub mod db;
pub mod media;

use std::sync::Arc;

use axum::{
    extract::{DefaultBodyLimit, FromRef},
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};
use utoipa_swagger_ui::SwaggerUi;

use auth::{
    handlers, AccountService, LoginRequest, LoginResponse, MessageResponse, ProfileResponse,
    ProfileUser, RegisterForm, RegisterResponse, RegisteredUser, TokenService,
};

/// Largest accepted request body, sized for a profile image upload
pub const MAX_BODY_BYTES: usize = 10 * 1024 * 1024;

/// OpenAPI documentation structure
#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::root_handler,
        handlers::register_handler,
        handlers::login_handler,
        handlers::profile_handler,
    ),
    components(
        schemas(
            RegisterForm,
            LoginRequest,
            LoginResponse,
            RegisterResponse,
            RegisteredUser,
            ProfileResponse,
            ProfileUser,
            MessageResponse
        )
    ),
    modifiers(&BearerAuth),
    tags(
        (name = "auth", description = "Registration, login and profile endpoints")
    ),
    info(
        title = "Profile Auth API",
        version = "1.0.0",
        description = "User registration with profile images, login and bearer token profile access"
    )
)]
pub struct ApiDoc;

struct BearerAuth;

impl Modify for BearerAuth {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub accounts: Arc<AccountService>,
    pub tokens: Arc<TokenService>,
}

impl AppState {
    pub fn new(accounts: AccountService) -> Self {
        let tokens = accounts.tokens();
        Self {
            accounts: Arc::new(accounts),
            tokens,
        }
    }
}

impl FromRef<AppState> for Arc<TokenService> {
    fn from_ref(state: &AppState) -> Self {
        Arc::clone(&state.tokens)
    }
}

/// Creates and configures the application router
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .route("/", get(handlers::root_handler))
        .route("/register", post(handlers::register_handler))
        .route("/login", post(handlers::login_handler))
        .route("/profile", get(handlers::profile_handler))
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

#[cfg(test)]
mod tests;
