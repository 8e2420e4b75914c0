use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Currency {
    #[serde(rename = "USD")]
    Usd,
    #[serde(rename = "EUR")]
    Eur,
    #[serde(rename = "GBP")]
    Gbp,
    #[serde(rename = "INR")]
    Inr,
    Unknown,
}

impl Currency {
    pub fn code(self) -> &'static str {
        match self {
            Currency::Usd => "USD",
            Currency::Eur => "EUR",
            Currency::Gbp => "GBP",
            Currency::Inr => "INR",
            Currency::Unknown => "Unknown",
        }
    }

    /// Resolve a single currency label for a line of statement text.
    ///
    /// Checked in a fixed order (INR, USD, EUR, GBP): the first hit wins even
    /// when several symbols appear on the same line.
    pub fn detect(text: &str) -> Currency {
        let lower = text.to_lowercase();
        let has = |needles: &[&str]| needles.iter().any(|n| lower.contains(n));

        if has(&["inr", "rs.", "rs ", "rupee", "₹"]) {
            Currency::Inr
        } else if has(&["usd", "$"]) {
            Currency::Usd
        } else if has(&["eur", "€"]) {
            Currency::Eur
        } else if has(&["gbp", "£"]) {
            Currency::Gbp
        } else {
            Currency::Unknown
        }
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl std::str::FromStr for Currency {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "USD" => Ok(Currency::Usd),
            "EUR" => Ok(Currency::Eur),
            "GBP" => Ok(Currency::Gbp),
            "INR" => Ok(Currency::Inr),
            "UNKNOWN" => Ok(Currency::Unknown),
            other => Err(format!("Unknown currency: '{other}'")),
        }
    }
}
