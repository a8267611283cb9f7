//! # Currency Table
//!
//! Static mapping of currency code → (display symbol, USD exchange rate).
//!
//! ## Base vs Display Currency
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Every cost field and every saved inventory amount is in USD (base).   │
//! │                                                                         │
//! │   CostLineItems (USD) ──► aggregate() ──► PricingResult (USD)          │
//! │                                               │                         │
//! │                                               ├──► persisted / ledger   │
//! │                                               │                         │
//! │                                               └──► × rate_of(code)      │
//! │                                                     display only        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Rates are a fixed lookup table. Nothing here fetches live rates.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use ts_rs::TS;

use crate::error::ValidationError;

/// A supported display currency.
///
/// Serialized as the upper-case ISO 4217 code (`"USD"`, `"EUR"`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, TS)]
#[serde(rename_all = "UPPERCASE")]
#[ts(export)]
pub enum CurrencyCode {
    /// US dollar, the base currency.
    #[default]
    Usd,
    Eur,
    Gbp,
    Jpy,
    Cad,
    Aud,
    Inr,
    Pkr,
}

/// One row of the currency table.
struct CurrencyInfo {
    code: &'static str,
    symbol: &'static str,
    /// Units of this currency per 1 USD.
    rate: f64,
}

// Indexed by `CurrencyCode as usize`; order must match the enum.
const TABLE: [CurrencyInfo; 8] = [
    CurrencyInfo { code: "USD", symbol: "$", rate: 1.0 },
    CurrencyInfo { code: "EUR", symbol: "€", rate: 0.92 },
    CurrencyInfo { code: "GBP", symbol: "£", rate: 0.79 },
    CurrencyInfo { code: "JPY", symbol: "¥", rate: 157.0 },
    CurrencyInfo { code: "CAD", symbol: "C$", rate: 1.37 },
    CurrencyInfo { code: "AUD", symbol: "A$", rate: 1.51 },
    CurrencyInfo { code: "INR", symbol: "₹", rate: 83.5 },
    CurrencyInfo { code: "PKR", symbol: "₨", rate: 278.0 },
];

impl CurrencyCode {
    /// The fixed base currency all amounts are denominated in.
    pub const BASE: CurrencyCode = CurrencyCode::Usd;

    /// Every supported code, in table order.
    pub const ALL: [CurrencyCode; 8] = [
        CurrencyCode::Usd,
        CurrencyCode::Eur,
        CurrencyCode::Gbp,
        CurrencyCode::Jpy,
        CurrencyCode::Cad,
        CurrencyCode::Aud,
        CurrencyCode::Inr,
        CurrencyCode::Pkr,
    ];

    fn info(&self) -> &'static CurrencyInfo {
        &TABLE[*self as usize]
    }

    /// ISO code, e.g. `"EUR"`.
    #[inline]
    pub fn code(&self) -> &'static str {
        self.info().code
    }

    /// Display symbol, e.g. `"€"`.
    #[inline]
    pub fn symbol(&self) -> &'static str {
        self.info().symbol
    }

    /// Units of this currency per 1 unit of the base currency.
    #[inline]
    pub fn rate(&self) -> f64 {
        self.info().rate
    }

    /// Whether this is the base currency.
    #[inline]
    pub fn is_base(&self) -> bool {
        *self == CurrencyCode::BASE
    }
}

/// Exchange rate for a supported code. Always positive.
#[inline]
pub fn rate_of(code: CurrencyCode) -> f64 {
    code.rate()
}

/// Display symbol for a supported code.
#[inline]
pub fn symbol_of(code: CurrencyCode) -> &'static str {
    code.symbol()
}

/// Exchange rate for a raw code string.
///
/// Unknown codes degrade to identity conversion (rate 1) instead of failing.
///
/// ## Example
/// ```rust
/// use priceright_core::currency::rate_of_code;
///
/// assert_eq!(rate_of_code("EUR"), 0.92);
/// assert_eq!(rate_of_code("XYZ"), 1.0);
/// ```
pub fn rate_of_code(code: &str) -> f64 {
    code.parse::<CurrencyCode>().map(rate_of).unwrap_or(1.0)
}

/// Display symbol for a raw code string; unknown codes render as themselves.
pub fn symbol_of_code(code: &str) -> String {
    code.parse::<CurrencyCode>()
        .map(|c| c.symbol().to_string())
        .unwrap_or_else(|_| code.trim().to_string())
}

impl fmt::Display for CurrencyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for CurrencyCode {
    type Err = ValidationError;

    /// Parses an ISO code, case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        CurrencyCode::ALL
            .into_iter()
            .find(|c| c.code().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| ValidationError::NotAllowed {
                field: "currency".to_string(),
                allowed: CurrencyCode::ALL.iter().map(|c| c.code().to_string()).collect(),
            })
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_order_matches_enum() {
        for code in CurrencyCode::ALL {
            assert_eq!(code.code().parse::<CurrencyCode>().unwrap(), code);
        }
    }

    #[test]
    fn test_every_rate_is_positive() {
        for code in CurrencyCode::ALL {
            assert!(rate_of(code) > 0.0, "{code} has non-positive rate");
        }
    }

    #[test]
    fn test_base_currency() {
        assert_eq!(CurrencyCode::default(), CurrencyCode::BASE);
        assert_eq!(rate_of(CurrencyCode::BASE), 1.0);
        assert_eq!(symbol_of(CurrencyCode::BASE), "$");
        assert!(CurrencyCode::Usd.is_base());
        assert!(!CurrencyCode::Eur.is_base());
    }

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!("eur".parse::<CurrencyCode>().unwrap(), CurrencyCode::Eur);
        assert_eq!(" Gbp ".parse::<CurrencyCode>().unwrap(), CurrencyCode::Gbp);
        assert!("DOGE".parse::<CurrencyCode>().is_err());
    }

    #[test]
    fn test_unknown_code_is_identity() {
        assert_eq!(rate_of_code("DOGE"), 1.0);
        assert_eq!(rate_of_code(""), 1.0);
        assert_eq!(symbol_of_code("DOGE"), "DOGE");
        assert_eq!(symbol_of_code("jpy"), "¥");
    }

    #[test]
    fn test_serde_uses_iso_code() {
        let json = serde_json::to_string(&CurrencyCode::Pkr).unwrap();
        assert_eq!(json, "\"PKR\"");
        let back: CurrencyCode = serde_json::from_str("\"CAD\"").unwrap();
        assert_eq!(back, CurrencyCode::Cad);
        assert!(serde_json::from_str::<CurrencyCode>("\"XYZ\"").is_err());
    }
}
