//! # PriceRight Entry Point
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        PriceRight                                       │
//! │                                                                         │
//! │  stdin ──► "set baseCost 80" ──┐                                        │
//! │                                ▼                                        │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │  main.rs ────► logging, then priceright::run                     │  │
//! │  │  lib.rs  ────► config, state store, command loop                 │  │
//! │  └──────────────────────────────────────────────────────────────────┘  │
//! │                                │                                        │
//! │  stdout ◄── {"ok":true,...} ◄──┘         stderr ◄── tracing logs        │
//! │                                                                         │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │  priceright.db (local SQLite file, WAL mode)                     │  │
//! │  └──────────────────────────────────────────────────────────────────┘  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```text
//! priceright [CONFIG_PATH]
//! ```

use std::path::PathBuf;
use std::process::ExitCode;

use tracing::error;

#[tokio::main]
async fn main() -> ExitCode {
    priceright::init_tracing();

    let config_path = std::env::args().nth(1).map(PathBuf::from);

    match priceright::run(config_path).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "PriceRight failed");
            ExitCode::FAILURE
        }
    }
}
