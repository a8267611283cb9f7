//! # Commands Module
//!
//! Every command a client can send, and the dispatcher that runs them.
//!
//! ## Command Organization
//! ```text
//! commands/
//! ├── mod.rs         ◄─── You are here (parsing + Dispatcher)
//! ├── calculator.rs  ◄─── show, set, currency, margin, suggest, apply, reset, save
//! ├── inventory.rs   ◄─── inventory, remove, clear, checkout
//! └── config.rs      ◄─── currencies, config, help
//! ```
//!
//! ## How Commands Work
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Command Flow                                         │
//! │                                                                         │
//! │  stdin: "set baseCost 80"                                               │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  Command::parse ──► Command::Set { field: BaseCost, value: "80" }       │
//! │         │                   (unknown word → UNKNOWN_COMMAND)            │
//! │         ▼                                                               │
//! │  Dispatcher::execute                                                    │
//! │    • hands each handler only the state it needs                        │
//! │    • handler returns Result<SomeResponse, ApiError>                     │
//! │         │                                                               │
//! │         │ (JSON serialization)                                          │
//! │         ▼                                                               │
//! │  stdout: {"ok":true,"data":{"values":{...},"base":{...},...}}           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Commands run one at a time; the dispatcher holds `&mut` to all state for
//! the duration of a command.

pub mod calculator;
pub mod config;
pub mod inventory;

use std::sync::Arc;

use serde::Serialize;
use serde_json::{json, Value};
use tracing::debug;

use priceright_core::{CalculatorField, CurrencyCode, MarginSuggestion};
use priceright_store::StateStore;

use crate::collaborators::Collaborators;
use crate::error::ApiError;
use crate::state::{AppConfig, CalculatorSession, InventoryLedger, Persister};

// =============================================================================
// Command
// =============================================================================

/// A parsed command line.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Show,
    Set { field: CalculatorField, value: String },
    Currency(CurrencyCode),
    Margin(String),
    Suggest(String),
    Apply,
    Reset,
    Save,
    Inventory,
    Remove(String),
    Clear,
    Checkout,
    Currencies,
    Config,
    Help,
    Quit,
}

impl Command {
    /// Parses one input line. Blank lines give `Ok(None)`.
    ///
    /// The command word is case-insensitive. For `set`, everything after the
    /// field name is the value, so item names may contain spaces.
    pub fn parse(line: &str) -> Result<Option<Command>, ApiError> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(None);
        }

        let (word, rest) = split_word(line);
        let command = match word.to_ascii_lowercase().as_str() {
            "show" => Command::Show,
            "set" => {
                let (field, value) = split_word(rest);
                if field.is_empty() {
                    return Err(ApiError::validation("Usage: set <field> <value>"));
                }
                Command::Set {
                    field: field.parse()?,
                    value: value.to_string(),
                }
            }
            "currency" => Command::Currency(rest.parse()?),
            "margin" => Command::Margin(rest.to_string()),
            "suggest" => Command::Suggest(rest.to_string()),
            "apply" => Command::Apply,
            "reset" => Command::Reset,
            "save" => Command::Save,
            "inventory" | "list" => Command::Inventory,
            "remove" => Command::Remove(rest.to_string()),
            "clear" => Command::Clear,
            "checkout" => Command::Checkout,
            "currencies" => Command::Currencies,
            "config" => Command::Config,
            "help" => Command::Help,
            "quit" | "exit" => Command::Quit,
            _ => return Err(ApiError::unknown_command(word)),
        };

        Ok(Some(command))
    }
}

/// Splits off the first whitespace-delimited word.
fn split_word(s: &str) -> (&str, &str) {
    match s.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (s, ""),
    }
}

// =============================================================================
// Dispatcher
// =============================================================================

/// Owns the session, the ledger and the collaborators; runs commands.
pub struct Dispatcher {
    session: CalculatorSession,
    ledger: InventoryLedger,
    persister: Persister,
    collaborators: Collaborators,
    config: AppConfig,
    last_suggestion: Option<MarginSuggestion>,
}

impl Dispatcher {
    /// Restores session and ledger from `store` and starts the persister.
    ///
    /// Never fails: unreadable or corrupt state falls back to defaults.
    pub async fn load(store: Arc<dyn StateStore>, collaborators: Collaborators, config: AppConfig) -> Self {
        let persister = Persister::spawn(store.clone());
        let session = CalculatorSession::initialize(store.as_ref(), persister.clone()).await;
        let ledger = InventoryLedger::initialize(store.as_ref(), persister.clone()).await;

        Dispatcher {
            session,
            ledger,
            persister,
            collaborators,
            config,
            last_suggestion: None,
        }
    }

    /// Parses and runs one line. Blank lines answer `null`.
    pub async fn execute_line(&mut self, line: &str) -> Result<Value, ApiError> {
        match Command::parse(line)? {
            Some(command) => self.execute(command).await,
            None => Ok(Value::Null),
        }
    }

    /// Runs one command.
    pub async fn execute(&mut self, command: Command) -> Result<Value, ApiError> {
        debug!(?command, "Executing command");

        match command {
            Command::Show => respond(calculator::show(&self.session)),
            Command::Set { field, value } => {
                respond(calculator::set_field(&mut self.session, field, &value))
            }
            Command::Currency(code) => respond(calculator::set_currency(&mut self.session, code)),
            Command::Margin(raw) => respond(calculator::set_margin(&mut self.session, &raw)?),
            Command::Suggest(category) => {
                let reply =
                    calculator::suggest(self.collaborators.advisor.as_deref(), &category).await?;
                self.last_suggestion = Some(reply.suggestion.clone());
                respond(reply)
            }
            Command::Apply => {
                let view =
                    calculator::apply_suggestion(&mut self.session, self.last_suggestion.as_ref())?;
                self.last_suggestion = None;
                respond(view)
            }
            Command::Reset => respond(calculator::reset(&mut self.session)),
            Command::Save => respond(calculator::save(&mut self.session, &mut self.ledger)?),
            Command::Inventory => respond(inventory::list(&self.ledger)),
            Command::Remove(raw_id) => respond(inventory::remove(&mut self.ledger, &raw_id)?),
            Command::Clear => respond(inventory::clear(&mut self.ledger)),
            Command::Checkout => respond(
                inventory::checkout(
                    self.collaborators.checkout.as_deref(),
                    &self.ledger,
                    &self.config.app.url,
                )
                .await?,
            ),
            Command::Currencies => respond(config::currencies()),
            Command::Config => respond(config::get_config(&self.config)),
            Command::Help => respond(config::help()),
            Command::Quit => Ok(Value::Null),
        }
    }

    /// Waits for every queued state write to land.
    pub async fn flush(&self) {
        self.persister.flush().await;
    }

    pub fn session(&self) -> &CalculatorSession {
        &self.session
    }

    pub fn ledger(&self) -> &InventoryLedger {
        &self.ledger
    }
}

fn respond<T: Serialize>(value: T) -> Result<Value, ApiError> {
    serde_json::to_value(value).map_err(|e| ApiError::internal(e.to_string()))
}

/// Wraps a command result in the reply envelope written to stdout.
///
/// ```json
/// {"ok": true, "data": {...}}
/// {"ok": false, "error": {"code": "VALIDATION_ERROR", "message": "..."}}
/// ```
pub fn envelope(result: Result<Value, ApiError>) -> Value {
    match result {
        Ok(data) => json!({ "ok": true, "data": data }),
        Err(error) => json!({ "ok": false, "error": error }),
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;

    #[test]
    fn test_parse_set_keeps_spaces_in_value() {
        let cmd = Command::parse("set itemName  Blue ceramic vase ").unwrap().unwrap();
        assert_eq!(
            cmd,
            Command::Set {
                field: CalculatorField::ItemName,
                value: "Blue ceramic vase".to_string(),
            }
        );
    }

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!(Command::parse("SHOW").unwrap(), Some(Command::Show));
        assert_eq!(
            Command::parse("currency eur").unwrap(),
            Some(Command::Currency(CurrencyCode::Eur))
        );
        assert_eq!(
            Command::parse("set BASECOST 3").unwrap(),
            Some(Command::Set {
                field: CalculatorField::BaseCost,
                value: "3".to_string(),
            })
        );
    }

    #[test]
    fn test_parse_blank_line() {
        assert_eq!(Command::parse("   ").unwrap(), None);
    }

    #[test]
    fn test_parse_errors() {
        let err = Command::parse("frobnicate now").unwrap_err();
        assert_eq!(err.code, ErrorCode::UnknownCommand);
        assert!(err.message.contains("frobnicate"));

        let err = Command::parse("set").unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);

        let err = Command::parse("set color red").unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);

        let err = Command::parse("currency XYZ").unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);
    }

    #[test]
    fn test_envelope() {
        let ok = envelope(Ok(json!(1)));
        assert_eq!(ok, json!({ "ok": true, "data": 1 }));

        let err = envelope(Err(ApiError::unknown_command("x")));
        assert_eq!(err["ok"], json!(false));
        assert_eq!(err["error"]["code"], json!("UNKNOWN_COMMAND"));
    }
}
