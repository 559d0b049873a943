//! Entry point for the Quote Engine binary.
//!
//! Running this binary starts an HTTP server exposing the pricing
//! engine.  Settings come from the environment (optionally seeded from
//! a `.env` file): `QUOTE_BIND_ADDR` for the listen address and
//! `QUOTE_RATE_TABLE_DIR` for the per-tenant rate table directory.

use quote_engine::{api, config::Settings, logging};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A missing .env file is fine
    dotenvy::dotenv().ok();
    let settings = Settings::from_env()?;
    logging::init_logging(settings.env);
    if let Err(err) = api::serve(settings.bind_addr, &settings.rate_table_dir).await {
        tracing::error!(error = ?err, "Error running server");
        return Err(err);
    }
    Ok(())
}
