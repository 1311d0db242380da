//! Institution-level currency codes.
//!
//! Each institution configures a single currency; all of its budget figures
//! and transaction amounts are denominated in it. There is no conversion.

use serde::{Deserialize, Serialize};

/// ISO 4217 currency codes supported by the system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    /// US Dollar
    Usd,
    /// Euro
    Eur,
    /// British Pound
    Gbp,
    /// Indonesian Rupiah
    Idr,
    /// Japanese Yen
    Jpy,
}

impl Default for Currency {
    fn default() -> Self {
        Self::Usd
    }
}

impl std::fmt::Display for Currency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Usd => write!(f, "USD"),
            Self::Eur => write!(f, "EUR"),
            Self::Gbp => write!(f, "GBP"),
            Self::Idr => write!(f, "IDR"),
            Self::Jpy => write!(f, "JPY"),
        }
    }
}

impl std::str::FromStr for Currency {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "USD" => Ok(Self::Usd),
            "EUR" => Ok(Self::Eur),
            "GBP" => Ok(Self::Gbp),
            "IDR" => Ok(Self::Idr),
            "JPY" => Ok(Self::Jpy),
            _ => Err(format!("Unknown currency: {s}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_currency_roundtrip() {
        for code in ["USD", "EUR", "GBP", "IDR", "JPY"] {
            let currency = Currency::from_str(code).unwrap();
            assert_eq!(currency.to_string(), code);
        }
    }

    #[test]
    fn test_currency_case_insensitive() {
        assert_eq!(Currency::from_str("usd").unwrap(), Currency::Usd);
    }

    #[test]
    fn test_unknown_currency_rejected() {
        assert!(Currency::from_str("XXX").is_err());
        assert!(Currency::from_str("").is_err());
    }

    #[test]
    fn test_default_is_usd() {
        assert_eq!(Currency::default(), Currency::Usd);
    }
}
