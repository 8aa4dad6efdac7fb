mod config;
mod db;
mod error;
mod rate_limit;
mod routes;
mod services;
mod state;

use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use crate::services::mail::{Mailer, ResendMailer};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = config::AppConfig::from_env().expect("invalid configuration");

    let pool = db::init_pool(&config.database_url, config.db_max_connections)
        .await
        .expect("database init failed");

    services::admin::ensure_master_admin(&pool, &config)
        .await
        .expect("master admin bootstrap failed");

    if config.seed_data {
        services::seed::seed_if_empty(&pool).await.expect("seeding failed");
    }

    let mailer: Option<Arc<dyn Mailer>> = match &config.mail {
        Some(mail) => Some(Arc::new(ResendMailer::new(mail))),
        None => {
            tracing::warn!("RESEND_API_KEY/RESEND_FROM not set; outgoing mail disabled");
            None
        }
    };

    let oehli = oehli::Matcher::embedded().expect("embedded knowledge base is invalid");

    let port = config.port;
    let state = state::AppState::new(pool, config, mailer, oehli);
    let app = routes::app(state);
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{port}"))
        .await
        .expect("failed to bind");

    tracing::info!(%port, "oeh-wirtschaft listening");
    axum::serve(listener, app).await.expect("server failed");
}
