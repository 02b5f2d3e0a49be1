use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::TradehookError;

/// Trading action carried by a webhook signal.
///
/// Only BUY and SELL are accepted; matching is case-insensitive and ignores
/// surrounding whitespace. Anything else is rejected before the order
/// pipeline starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TradeAction {
    Buy,
    Sell,
}

impl TradeAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            TradeAction::Buy => "BUY",
            TradeAction::Sell => "SELL",
        }
    }
}

impl fmt::Display for TradeAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for TradeAction {
    type Err = TradehookError;

    fn from_str(raw: &str) -> std::result::Result<Self, Self::Err> {
        match raw.trim().to_ascii_uppercase().as_str() {
            "BUY" => Ok(TradeAction::Buy),
            "SELL" => Ok(TradeAction::Sell),
            _ => Err(TradehookError::InvalidSignal(format!(
                "expected BUY or SELL, got '{}'",
                raw.trim()
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_accepts_case_and_whitespace_variants() {
        assert_eq!("buy".parse::<TradeAction>().unwrap(), TradeAction::Buy);
        assert_eq!("BUY".parse::<TradeAction>().unwrap(), TradeAction::Buy);
        assert_eq!(" Sell ".parse::<TradeAction>().unwrap(), TradeAction::Sell);
        assert_eq!("\tsell\n".parse::<TradeAction>().unwrap(), TradeAction::Sell);
    }

    #[test]
    fn test_parse_rejects_everything_else() {
        for raw in ["hold", "", "  ", "BUYY", "close"] {
            assert!(matches!(
                raw.parse::<TradeAction>(),
                Err(TradehookError::InvalidSignal(_))
            ));
        }
    }

    #[test]
    fn test_parse_error_names_the_offending_action() {
        let err = " hold ".parse::<TradeAction>().unwrap_err().to_string();
        assert_eq!(err, "Invalid signal: expected BUY or SELL, got 'hold'");
    }

    #[test]
    fn test_display_matches_wire_form() {
        assert_eq!(TradeAction::Buy.to_string(), "BUY");
        assert_eq!(TradeAction::Sell.to_string(), "SELL");
    }

    #[test]
    fn test_serializes_uppercase() {
        assert_eq!(
            serde_json::to_string(&TradeAction::Sell).unwrap(),
            "\"SELL\""
        );
    }
}
