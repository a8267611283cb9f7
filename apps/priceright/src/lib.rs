//! # PriceRight Library
//!
//! Core library for the PriceRight calculator.
//! This is the main entry point that configures and runs the command loop.
//!
//! ## Module Organization
//! ```text
//! priceright/
//! ├── lib.rs            ◄─── You are here (startup & command loop)
//! ├── state/
//! │   ├── mod.rs        ◄─── State type exports
//! │   ├── session.rs    ◄─── Calculator session (Clean / Dirty)
//! │   ├── ledger.rs     ◄─── Inventory ledger
//! │   ├── persister.rs  ◄─── Background state writes
//! │   └── config.rs     ◄─── AppConfig (toml + env)
//! ├── commands/
//! │   ├── mod.rs        ◄─── Parsing + Dispatcher
//! │   ├── calculator.rs ◄─── Calculator commands
//! │   ├── inventory.rs  ◄─── Inventory + checkout commands
//! │   └── config.rs     ◄─── Currencies, config, help
//! ├── collaborators.rs  ◄─── Margin advisor + checkout gateway
//! └── error.rs          ◄─── AppError / ApiError
//! ```
//!
//! ## Protocol
//! One command per stdin line, one JSON reply per stdout line. Logs go to
//! stderr so stdout stays machine-readable.

pub mod collaborators;
pub mod commands;
pub mod error;
pub mod state;

use std::path::PathBuf;
use std::sync::Arc;

use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

use priceright_store::{Database, DbConfig, StateStore};

use collaborators::Collaborators;
use commands::{envelope, Command, Dispatcher};
use error::{ApiError, AppResult};
use state::AppConfig;

/// Runs the application until stdin closes or `quit` is read.
///
/// ## Startup Sequence
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │                       Application Startup                               │
/// │                                                                         │
/// │  1. Load Configuration ───────────────────────────────────────────────► │
/// │     • priceright.toml, then PRICERIGHT_* env overrides                  │
/// │                                                                         │
/// │  2. Open State Store ─────────────────────────────────────────────────► │
/// │     • SQLite with WAL mode at the configured / platform path            │
/// │     • Run pending migrations                                            │
/// │                                                                         │
/// │  3. Restore State ────────────────────────────────────────────────────► │
/// │     • Calculator session and inventory ledger                           │
/// │     • Corrupt slots are quarantined, defaults used                      │
/// │                                                                         │
/// │  4. Command Loop (`serve`) ───────────────────────────────────────────► │
/// │     • Read line, dispatch, write JSON reply                             │
/// │     • Bad input gets an error reply; I/O failure ends the loop          │
/// │                                                                         │
/// │  5. Shutdown ─────────────────────────────────────────────────────────► │
/// │     • Flush queued writes, close the pool                               │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
pub async fn run(config_path: Option<PathBuf>) -> AppResult<()> {
    info!("Starting PriceRight");

    let config = AppConfig::load(config_path)?;
    let db_path = config.database_path()?;
    info!(?db_path, "Database path determined");

    let collaborators = Collaborators::from_settings(&config.collaborators)?;
    let db = Database::new(DbConfig::new(db_path)).await?;
    info!("Database connected and migrations applied");

    let store: Arc<dyn StateStore> = Arc::new(db.state_store());
    let mut dispatcher = Dispatcher::load(store, collaborators, config).await;
    info!(
        items = dispatcher.ledger().len(),
        "State restored, ready for commands"
    );

    serve(
        &mut dispatcher,
        BufReader::new(tokio::io::stdin()),
        tokio::io::stdout(),
    )
    .await;

    debug!("Command loop finished, flushing state");
    dispatcher.flush().await;
    db.close().await;

    info!("PriceRight stopped");
    Ok(())
}

/// Serves commands from `input` until EOF, `quit`, or an I/O failure.
///
/// Each line gets exactly one JSON envelope on `output`. A line that is not
/// valid UTF-8 is answered with a validation error and the loop carries on.
/// I/O failures are logged and end the loop; they are never returned, so the
/// caller's shutdown always runs.
pub async fn serve<R, W>(dispatcher: &mut Dispatcher, mut input: R, mut output: W)
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut buf = Vec::new();

    loop {
        buf.clear();
        match input.read_until(b'\n', &mut buf).await {
            Ok(0) => break,
            Ok(_) => {}
            Err(e) => {
                warn!(error = %e, "Failed to read command input");
                break;
            }
        }

        let result = match std::str::from_utf8(&buf) {
            Ok(line) => match Command::parse(line.trim_end_matches(['\r', '\n'])) {
                Ok(Some(Command::Quit)) => break,
                Ok(Some(command)) => dispatcher.execute(command).await,
                Ok(None) => continue,
                Err(e) => Err(e),
            },
            Err(_) => {
                let lossy = String::from_utf8_lossy(&buf);
                warn!(line = %lossy.trim_end(), "Command line is not valid UTF-8");
                Err(ApiError::validation("Command line is not valid UTF-8"))
            }
        };

        if let Err(e) = write_reply(&mut output, envelope(result)).await {
            warn!(error = %e, "Failed to write reply, stopping");
            break;
        }
    }
}

async fn write_reply<W>(output: &mut W, reply: serde_json::Value) -> AppResult<()>
where
    W: AsyncWrite + Unpin,
{
    let mut line = reply.to_string();
    line.push('\n');

    output.write_all(line.as_bytes()).await?;
    output.flush().await?;
    Ok(())
}

/// Initializes the tracing subscriber for structured logging.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=priceright=trace` - Show trace for priceright crates only
/// - Default: INFO, DEBUG for priceright
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,priceright=debug,sqlx=warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
