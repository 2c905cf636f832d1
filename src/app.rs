use std::{fs, panic, process, sync::Arc};

use anyhow::Result;
use axum::{Router, routing::get};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::api;
use crate::api::v1::handlers::health::health;
use crate::config::{Config, ConfigError, TokenSource};
use crate::directive;
use crate::middleware;
use crate::middleware::bearer_auth::BearerAuth;
use crate::replacer::Replacer;
use crate::state::AppState;

fn init_tracing() {
    // Prefer RUST_LOG if set; otherwise use a sensible default.
    // Ex:
    // RUST_LOG=info,apipass=debug,tower_http=debug cargo run
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info,tower_http=info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

fn init_panic_hook(abort_on_panic: bool) {
    // Keep the default hook as a fallback (prints to stderr with location/payload).
    let default_hook = panic::take_hook();

    panic::set_hook(Box::new(move |info| {
        // Always surface panics via tracing so they don't get "lost"
        // (stderr can be hidden depending on how the process is launched.)
        tracing::error!(?info, "panic");

        // In development, fail fast: crash the whole process so we notice immediately.
        // In production, prefer the default behavior (stderr) and let the server keep running.
        if abort_on_panic {
            process::abort();
        } else {
            default_hook(info);
        }
    }))
}

pub async fn run() -> Result<()> {
    init_tracing();
    let config = Config::from_env()?;

    let abort_on_panic = !config.app_env.is_production();
    init_panic_hook(abort_on_panic);

    let gate = build_gate(&config)?;
    let state = AppState::new(Arc::new(gate));

    tracing::info!(
        "starting gate in {:?} mode on {}",
        config.app_env,
        config.addr
    );

    let app = router(state);
    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Assemble the gate from whichever source the config names, resolve its
/// placeholders once, and refuse to continue with an unusable token.
pub fn build_gate(config: &Config) -> Result<BearerAuth, ConfigError> {
    let mut gate = match &config.token_source {
        TokenSource::DirectiveFile(path) => {
            let input = fs::read_to_string(path).map_err(|source| ConfigError::Io {
                path: path.clone(),
                source,
            })?;
            directive::parse(&input)?
        }
        TokenSource::Value(token) => BearerAuth::new(token.clone()),
    };

    gate.provision(&Replacer::new());
    gate.validate()?;
    Ok(gate)
}

/// The full application router: public routes first, then the gated v1 API,
/// then transport-level middleware around everything.
pub fn router(state: AppState) -> Router {
    let router = Router::new()
        .route("/health", get(health))
        .nest("/api/v1", api::v1::routes(state.clone()))
        .with_state(state);

    middleware::http::apply(router)
}
