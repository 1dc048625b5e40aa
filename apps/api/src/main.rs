//! Factacl API composition root.

#![forbid(unsafe_code)]

mod api_config;
mod api_router;
mod dto;
mod error;
mod handlers;
mod middleware;
mod state;

use std::sync::Arc;

use factacl_application::{AccessGrantService, AuthorizationService};
use factacl_core::AppError;
use factacl_infrastructure::{
    PostgresAclStore, PostgresAuthorizationRepository, PostgresFactRepository,
};
use sqlx::postgres::PgPoolOptions;
use tracing::info;

use crate::api_config::{ApiConfig, init_tracing};
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<(), AppError> {
    dotenvy::dotenv().ok();
    init_tracing();

    let config = ApiConfig::load()?;

    let pool = PgPoolOptions::new()
        .max_connections(config.database_max_connections)
        .connect(&config.database_url)
        .await
        .map_err(|error| AppError::Internal(format!("failed to connect to database: {error}")))?;

    sqlx::migrate!("../../crates/infrastructure/migrations")
        .run(&pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to run migrations: {error}")))?;

    if config.migrate_only {
        info!("database migrations applied successfully");
        return Ok(());
    }

    let acl_store = Arc::new(PostgresAclStore::new(pool.clone()));
    let authorization_service = AuthorizationService::new(
        Arc::new(PostgresAuthorizationRepository::new(pool.clone())),
        acl_store.clone(),
    );
    let access_grant_service = AccessGrantService::new(
        Arc::new(PostgresFactRepository::new(pool)),
        Arc::new(authorization_service),
        acl_store,
    );

    let app = api_router::build_router(AppState {
        access_grant_service,
    });

    let address = config.socket_address()?;
    let listener = tokio::net::TcpListener::bind(address)
        .await
        .map_err(|error| AppError::Internal(format!("failed to bind listener: {error}")))?;

    info!(%address, "factacl-api listening");

    axum::serve(listener, app)
        .await
        .map_err(|error| AppError::Internal(format!("api server error: {error}")))
}
