//! MediaVault - Media catalog backend
//! Mission: Authenticate users and keep every profile private to its owner

use anyhow::{Context, Result};
use chrono::Duration;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use mediavault_backend::{
    api::create_router,
    auth::{AccountService, AuthState, Authenticator, JwtHandler, PasswordHasher, UserStore},
    config::{load_env, Config},
};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize environment and logging
    load_env();
    init_tracing();

    info!("🚀 MediaVault backend starting");

    let config = Config::from_env().context("Invalid configuration")?;

    // Authentication system: one store, hasher and signing key for the whole process
    let user_store = Arc::new(
        UserStore::new(&config.auth_db_path).context("Failed to open credential store")?,
    );
    let hasher = PasswordHasher::new(config.bcrypt_cost)?;
    let jwt_handler = Arc::new(JwtHandler::new(config.jwt_secret.clone()));
    let authenticator = Arc::new(Authenticator::new(
        user_store.clone(),
        hasher.clone(),
        jwt_handler,
        Duration::hours(config.jwt_ttl_hours),
    )?);
    let accounts = Arc::new(AccountService::new(user_store.clone(), hasher));
    let auth_state = AuthState::new(authenticator, accounts);

    info!("🔐 Authentication initialized at: {}", config.auth_db_path);
    info!(
        "👥 Registered users: {}",
        user_store.count().context("Failed to count users")?
    );

    let app = create_router(auth_state);

    // Start server
    let addr = config.listen_addr();
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!("🎯 API server listening on {}", addr);

    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}

/// Initialize tracing with env-driven filtering
fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "mediavault_backend=debug,mediavault=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}
