//! # Config Commands
//!
//! Read-only commands: the currency table, the loaded configuration and help.

use serde::Serialize;
use tracing::debug;

use priceright_core::CurrencyCode;

use crate::state::AppConfig;

/// One row of the currency table.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrencyEntry {
    pub code: CurrencyCode,
    pub symbol: &'static str,
    /// Units per 1 USD.
    pub rate: f64,
    pub is_base: bool,
}

/// What a client may want to know about the running configuration.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigResponse {
    pub app_url: String,
    pub advisor_configured: bool,
    pub checkout_configured: bool,
}

/// One line of `help`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CommandHelp {
    pub usage: &'static str,
    pub description: &'static str,
}

const COMMANDS: &[(&str, &str)] = &[
    ("show", "Show calculator values and pricing"),
    ("set <field> <value>", "Set itemName, baseCost, packaging, localShipping, overseasShipment, customs or profitMargin"),
    ("currency <CODE>", "Change the display currency"),
    ("margin <percent>", "Set the profit margin in percent"),
    ("suggest <category>", "Ask the margin advisor for a suggestion"),
    ("apply", "Apply the last suggestion"),
    ("reset", "Reset the calculator"),
    ("save", "Save the current item to the inventory"),
    ("inventory", "List saved items and totals"),
    ("remove <id>", "Remove a saved item"),
    ("clear", "Remove every saved item"),
    ("checkout", "Start checkout for the inventory"),
    ("currencies", "List supported currencies"),
    ("config", "Show the loaded configuration"),
    ("help", "Show this list"),
    ("quit", "Exit"),
];

/// `currencies`
pub fn currencies() -> Vec<CurrencyEntry> {
    debug!("currencies command");
    CurrencyCode::ALL
        .into_iter()
        .map(|code| CurrencyEntry {
            code,
            symbol: code.symbol(),
            rate: code.rate(),
            is_base: code.is_base(),
        })
        .collect()
}

/// `config`
pub fn get_config(config: &AppConfig) -> ConfigResponse {
    debug!("config command");
    ConfigResponse {
        app_url: config.app.url.clone(),
        advisor_configured: config.collaborators.advisor_url.is_some(),
        checkout_configured: config.collaborators.checkout_url.is_some(),
    }
}

/// `help`
pub fn help() -> Vec<CommandHelp> {
    COMMANDS
        .iter()
        .map(|&(usage, description)| CommandHelp { usage, description })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_currencies_cover_table() {
        let list = currencies();
        assert_eq!(list.len(), CurrencyCode::ALL.len());
        assert_eq!(list.iter().filter(|c| c.is_base).count(), 1);
        assert!(list.iter().all(|c| c.rate > 0.0));
    }

    #[test]
    fn test_config_hides_urls() {
        let mut config = AppConfig::default();
        config.collaborators.advisor_url = Some("http://localhost:3400/estimate".into());

        let reply = get_config(&config);
        assert!(reply.advisor_configured);
        assert!(!reply.checkout_configured);
        assert_eq!(reply.app_url, "http://localhost:9002");
    }
}
