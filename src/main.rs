use std::sync::Arc;

use profile_auth_api::{
    auth::{AccountService, TokenService, UserRepository},
    config::AppConfig,
    create_router, db,
    media::{CloudinaryUploader, DisabledUploader, ImageUploader},
    AppState,
};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .with_level(true)
        .init();

    tracing::info!("Profile Auth API - Starting...");

    let config = AppConfig::from_env().expect("Invalid configuration");

    tracing::info!("Connecting to database...");
    let db_pool = db::create_pool(&config.database_url, config.database_max_connections)
        .await
        .expect("Failed to create database pool");

    db::run_migrations(&db_pool)
        .await
        .expect("Failed to run database migrations");

    let uploader: Arc<dyn ImageUploader> = match config.cloudinary.clone() {
        Some(cloudinary) => Arc::new(
            CloudinaryUploader::new(cloudinary, config.upload_timeout)
                .expect("Failed to build image upload client"),
        ),
        None => {
            tracing::warn!("Cloudinary is not configured; profile image uploads will fail");
            Arc::new(DisabledUploader)
        }
    };

    let accounts = AccountService::new(
        Arc::new(UserRepository::new(db_pool)),
        uploader,
        Arc::new(TokenService::new(&config.jwt_secret)),
    );
    let app = create_router(AppState::new(accounts));

    let addr = config.bind_addr();
    tracing::info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("Failed to bind to address");

    tracing::info!("Profile Auth API is running on http://{}", addr);
    tracing::info!("Swagger UI available at http://{}/swagger-ui", addr);

    axum::serve(listener, app).await.expect("Server error");
}
