use std::net::SocketAddr;
use std::sync::Arc;

use senso_api::config::{LogFormat, ServerConfig};
use senso_api::router::build_app_router;
use senso_api::state::AppState;
use senso_media::cloudinary::{CloudinaryConfig, CloudinaryHost};
use senso_media::ImageHost;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Configuration ---
    let config = match ServerConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Invalid configuration: {e}");
            std::process::exit(1);
        }
    };

    // --- Tracing ---
    init_tracing(config.log_format);
    tracing::info!(host = %config.host, port = %config.port, "Loaded server configuration");

    if config.admin_password_hash.is_none() {
        tracing::warn!(
            "Neither ADMIN_PASSWORD nor ADMIN_PASSWORD_HASH is set; admin login is disabled"
        );
    }
    if config.jwt.ephemeral_secret {
        tracing::warn!("JWT_SECRET is not set; admin tokens will not survive a restart");
    }

    // --- Database ---
    let pool = senso_db::create_pool(&config.database_url, config.db_max_connections)
        .await
        .expect("Failed to connect to database");
    tracing::info!("Database connection pool created");

    senso_db::health_check(&pool)
        .await
        .expect("Database health check failed");
    tracing::info!("Database health check passed");

    senso_db::run_migrations(&pool)
        .await
        .expect("Failed to run database migrations");
    tracing::info!("Database migrations applied");

    // --- Image host ---
    let image_host: Option<Arc<dyn ImageHost>> = match CloudinaryConfig::from_env() {
        Some(cloudinary) => {
            let folder = cloudinary.folder.clone();
            let algorithm = cloudinary.signature_algorithm.as_str();
            let host = CloudinaryHost::new(cloudinary).expect("Failed to build Cloudinary client");
            tracing::info!(folder = %folder, algorithm, "Cloudinary uploads enabled");
            Some(Arc::new(host) as Arc<dyn ImageHost>)
        }
        None => {
            tracing::warn!("Cloudinary credentials not set; image uploads are disabled");
            None
        }
    };

    // --- App state ---
    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        image_host,
    };

    let app = build_app_router(state, &config);

    // --- Start server ---
    let addr = SocketAddr::new(
        config.host.parse().expect("Invalid HOST address"),
        config.port,
    );
    tracing::info!(%addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");

    tracing::info!("Graceful shutdown complete");
}

/// Install the global subscriber. `RUST_LOG` overrides the default filter.
fn init_tracing(format: LogFormat) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "senso_api=debug,senso_media=debug,tower_http=debug".into());

    let registry = tracing_subscriber::registry().with(filter);
    match format {
        LogFormat::Json => registry.with(tracing_subscriber::fmt::layer().json()).init(),
        LogFormat::Pretty => registry.with(tracing_subscriber::fmt::layer()).init(),
    }
}

/// Wait for SIGINT (Ctrl-C) or, on Unix, SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl-C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received, starting graceful shutdown");
}
