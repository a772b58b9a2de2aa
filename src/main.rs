//! OpenSASE Cart - prepares the cart/order store and reports what it serves

use anyhow::Result;
use opensase_cart::{CatalogService, PgStore, Settings};
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::registry().with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into())).with(tracing_subscriber::fmt::layer()).init();

    let settings = Settings::from_env()?;
    let pool = PgPoolOptions::new().max_connections(settings.max_connections).connect(&settings.database_url).await?;
    sqlx::migrate!("./migrations").run(&pool).await?;
    tracing::info!("schema up to date");

    let catalog = CatalogService::new(PgStore::new(pool));
    let products = catalog.find_products().await?;
    tracing::info!(products = products.len(), delivery_fee = %settings.delivery_fee, "opensase-cart store ready");
    Ok(())
}
