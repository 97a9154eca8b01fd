//! SafeBet IQ binary entrypoint wiring the REST API to Supabase or the in-memory store.

use std::{net::SocketAddr, sync::Arc};

use anyhow::Context;
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use safebet_iq::{
    config::{AppConfig, StoreKind},
    dao::{
        auth::AuthProvider,
        database::Database,
        memory::{MemoryAuth, MemoryDatabase},
        supabase::{SupabaseAuth, SupabaseDatabase},
    },
    messaging::TwilioClient,
    routes,
    state::AppState,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let config = AppConfig::from_env().context("loading configuration")?;
    let (db, auth) = connect_store(&config)?;
    let whatsapp = TwilioClient::new(&config.twilio_api_base).context("building Twilio client")?;

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let app_state = AppState::new(db, auth, Arc::new(whatsapp), config);
    let app = routes::app(app_state);

    info!(%addr, "starting server");

    let listener = TcpListener::bind(addr).await.context("binding server")?;
    let service = app.into_make_service();
    axum::serve(listener, service)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("serving axum")?;

    Ok(())
}

/// Database and auth backends for the configured store.
fn connect_store(
    config: &AppConfig,
) -> anyhow::Result<(Arc<dyn Database>, Arc<dyn AuthProvider>)> {
    match (config.store, &config.supabase) {
        (StoreKind::Supabase, Some(supabase)) => {
            let db = SupabaseDatabase::connect(supabase).context("connecting to Supabase REST")?;
            let auth = SupabaseAuth::connect(supabase).context("connecting to Supabase auth")?;
            info!(url = %supabase.url, "using Supabase store");
            Ok((Arc::new(db), Arc::new(auth)))
        }
        _ => {
            warn!("using the in-memory store; data is lost on restart");
            Ok((Arc::new(MemoryDatabase::new()), Arc::new(MemoryAuth::new())))
        }
    }
}

/// Configure tracing subscribers so logs include spans by default.
fn init_tracing() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "info,tower_http=debug".into());
    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Wait for Ctrl+C or SIGTERM and shut the server down gracefully.
async fn shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{SignalKind, signal};

        match signal(SignalKind::terminate()) {
            Ok(mut term) => {
                tokio::select! {
                    _ = tokio::signal::ctrl_c() => {},
                    _ = term.recv() => {},
                }
            }
            Err(err) => {
                warn!(error = %err, "SIGTERM handler unavailable; waiting for Ctrl+C only");
                let _ = tokio::signal::ctrl_c().await;
            }
        }
    }

    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }
}
