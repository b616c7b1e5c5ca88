use anyhow::Context;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

// ri-utilizziamo le funzioni e strutture definite in lib.rs
use bacheca_server::{routes, AppState, Config, Database};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env().context("load configuration")?;

    tracing_subscriber::registry()
        .with(EnvFilter::new(&config.log_filter))
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        bind = %config.bind_addr,
        db = %config.db_name,
        upload_dir = %config.upload_dir.display(),
        "starting message board"
    );

    // Crea lo stato condiviso: il database parte Disconnected
    let db = Arc::new(Database::new());
    let state = Arc::new(AppState::new(db.clone(), &config));
    state
        .uploads
        .ensure_exists()
        .await
        .context("prepare upload directory")?;

    // Connessione in background: un fallimento viene loggato e il server resta su,
    // le richieste rispondono 500 finché lo stato non è Connected
    let uri = config.mongodb_uri.clone();
    let db_name = config.db_name.clone();
    tokio::spawn(async move {
        db.connect(&uri, &db_name).await;
    });

    let app = routes::router(state);

    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .context("bind tcp listener")?;
    tracing::info!("Listening on http://{}", config.bind_addr);

    axum::serve(listener, app.into_make_service())
        .await
        .context("server shutdown")?;

    Ok(())
}
