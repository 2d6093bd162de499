//! Serve command implementation

use crate::api::{create_router, AppState};
use crate::cli::ServeArgs;
use crate::config::{LogFormat, SymcheckConfig};
use std::path::Path;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Load a config file if it exists (defaults otherwise) and apply
/// `SYMCHECK_*` environment overrides.
pub fn load_config_file(path: &Path) -> Result<SymcheckConfig, Box<dyn std::error::Error>> {
    let config = if path.exists() {
        SymcheckConfig::load(Some(path))?
    } else {
        tracing::debug!("Config file not found, using defaults");
        SymcheckConfig::default()
    };

    Ok(config.with_env_overrides())
}

/// Load configuration with CLI overrides
pub fn load_config_with_overrides(
    args: &ServeArgs,
) -> Result<SymcheckConfig, Box<dyn std::error::Error>> {
    let mut config = load_config_file(&args.config)?;

    // CLI overrides (highest priority)
    if let Some(port) = args.port {
        config.server.port = port;
    }
    if let Some(ref host) = args.host {
        config.server.host = host.clone();
    }
    if let Some(ref log_level) = args.log_level {
        config.logging.level = log_level.clone();
    }

    Ok(config)
}

/// Initialize tracing based on configuration
pub fn init_tracing(
    config: &crate::config::LoggingConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    let filter_str = crate::logging::build_filter_directives(config);

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&filter_str));

    match config.format {
        LogFormat::Pretty => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().pretty())
                .try_init()?;
        }
        LogFormat::Json => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().json())
                .try_init()?;
        }
    }

    Ok(())
}

/// Wait for shutdown signal (SIGINT or SIGTERM)
async fn shutdown_signal(cancel_token: CancellationToken) {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install CTRL+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received SIGINT, shutting down...");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, shutting down...");
        }
    }

    cancel_token.cancel();
}

/// Main serve command handler
pub async fn run_serve(args: ServeArgs) -> Result<(), Box<dyn std::error::Error>> {
    // 1. Load and merge configuration
    let config = load_config_with_overrides(&args)?;
    config.validate()?;

    // 2. Initialize tracing
    init_tracing(&config.logging)?;

    tracing::info!("Starting symptom checker");
    tracing::debug!(?config, "Loaded configuration");

    if std::env::var(&config.model.api_key_env).map_or(true, |k| k.trim().is_empty()) {
        tracing::warn!(
            var = %config.model.api_key_env,
            "Model provider API key is not set; /api/analyze will return 500 until it is"
        );
    }

    // 3. Build application state and router
    let app_state = Arc::new(AppState::from_config(Arc::new(config.clone()))?);
    let app = create_router(Arc::clone(&app_state));
    tracing::info!(model = app_state.analyzer.agent_name(), "Model provider configured");

    // 4. Start the rate window sweeper
    let cancel_token = CancellationToken::new();
    let sweeper_handle = config
        .rate_limit
        .enabled
        .then(|| app_state.analyzer.rate_limiter().spawn_sweeper(cancel_token.clone()));

    // 5. Bind and serve
    let addr = config.server.bind_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(addr = %addr, "Symptom checker listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(cancel_token.clone()))
        .await?;

    // 6. Cleanup
    if let Some(handle) = sweeper_handle {
        cancel_token.cancel();
        handle.await?;
    }

    tracing::info!("Symptom checker stopped");
    Ok(())
}
