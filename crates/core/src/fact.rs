use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::currency::Currency;
use super::period::FiscalYear;

/// Canonical financial-statement metrics, in extraction order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Metric {
    Revenue,
    #[serde(rename = "Gross Profit")]
    GrossProfit,
    #[serde(rename = "Operating Income")]
    OperatingIncome,
    #[serde(rename = "EBITDA")]
    Ebitda,
    #[serde(rename = "Net Income")]
    NetIncome,
    #[serde(rename = "Total Assets")]
    TotalAssets,
    #[serde(rename = "Total Liabilities")]
    TotalLiabilities,
    #[serde(rename = "Cash Flow")]
    CashFlow,
    #[serde(rename = "EPS")]
    Eps,
}

impl Metric {
    pub const ALL: [Metric; 9] = [
        Metric::Revenue,
        Metric::GrossProfit,
        Metric::OperatingIncome,
        Metric::Ebitda,
        Metric::NetIncome,
        Metric::TotalAssets,
        Metric::TotalLiabilities,
        Metric::CashFlow,
        Metric::Eps,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Metric::Revenue => "Revenue",
            Metric::GrossProfit => "Gross Profit",
            Metric::OperatingIncome => "Operating Income",
            Metric::Ebitda => "EBITDA",
            Metric::NetIncome => "Net Income",
            Metric::TotalAssets => "Total Assets",
            Metric::TotalLiabilities => "Total Liabilities",
            Metric::CashFlow => "Cash Flow",
            Metric::Eps => "EPS",
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl std::str::FromStr for Metric {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Metric::ALL
            .into_iter()
            .find(|m| m.name().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| format!("Unknown metric: '{wanted}'"))
    }
}

/// One structured figure pulled out of a line of statement text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FinancialFact {
    pub metric: Metric,
    pub value: Decimal,
    pub currency: Currency,
    pub year: Option<FiscalYear>,
    /// The verbatim source line the value was read from.
    pub context: String,
    pub source_id: String,
    /// 1-based.
    pub page: u32,
}
