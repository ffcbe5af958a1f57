//! Myelin demo client.
//!
//! Environment (also read from `.env`):
//!
//! - `MYELIN_DATA_DIR`: content directory (default `data`)
//! - `MYELIN_SAVE_DIR`: actor saves (default: platform data dir)
//! - `MYELIN_TICK_MILLIS`: wall-clock length of one tick
//! - `MYELIN_TICKS`: stop after this many ticks
//! - `RUST_LOG`: tracing filter

use anyhow::Result;
use myelin_client::{Client, logging};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let _guard = logging::setup_logging()?;

    tracing::info!("Starting myelin client");
    let client = Client::builder().build()?;
    client.run().await?;

    tracing::info!("Client shutdown complete");
    Ok(())
}
