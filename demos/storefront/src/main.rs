// demos/storefront/src/main.rs

mod catalog;
mod config;
mod errors;
mod sessions;
mod state;
mod store;
mod web;

use crate::config::AppConfig;
use crate::sessions::SessionRegistry;
use crate::state::AppState;
use crate::store::pg::redacted_database_url;
use crate::store::PgCartStore;

use actix_web::{web as actix_data, App, HttpServer};
use anyhow::Context;
use cartflow::{CartStore, InMemoryCartStore};
use std::sync::Arc;
use tracing::Level;
use tracing_subscriber::fmt::format::FmtSpan;

async fn build_store(app_config: &AppConfig) -> anyhow::Result<Arc<dyn CartStore>> {
  let Some(database_url) = &app_config.database_url else {
    tracing::warn!("DATABASE_URL not set; carts are kept in memory and lost on restart.");
    return Ok(Arc::new(InMemoryCartStore::with_catalog(catalog::demo_products())));
  };

  tracing::info!(database = %redacted_database_url(database_url)?, "Using Postgres cart store.");
  let store = PgCartStore::connect(database_url)
    .await
    .context("connecting to the database")?;
  if app_config.seed_db {
    store.ensure_schema().await.context("creating schema")?;
    store
      .seed_catalog(&catalog::demo_products())
      .await
      .context("seeding catalog")?;
  }
  Ok(Arc::new(store))
}

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
  tracing_subscriber::fmt()
    .with_max_level(Level::INFO)
    .with_env_filter(tracing_subscriber::EnvFilter::from_default_env()) // Allow RUST_LOG override
    .with_span_events(FmtSpan::CLOSE)
    .init();

  tracing::info!("Starting storefront server...");

  let app_config = Arc::new(AppConfig::from_env().context("loading configuration")?);
  let store = build_store(&app_config).await?;

  let sessions = SessionRegistry::new(store, app_config.cart.clone(), app_config.sessions)
    .context("building the anonymous cart session")?;
  let app_state = AppState {
    sessions: Arc::new(sessions),
    config: app_config.clone(),
  };

  let server_address = app_config.bind_address();
  tracing::info!("Binding server to {}...", server_address);

  HttpServer::new(move || {
    App::new()
      .app_data(actix_data::Data::new(app_state.clone()))
      .wrap(tracing_actix_web::TracingLogger::default())
      .configure(web::configure_app_routes)
  })
  .bind(&server_address)?
  .run()
  .await?;

  Ok(())
}
