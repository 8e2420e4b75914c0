use serde::{Deserialize, Serialize};
use std::fmt;

/// A four-digit reporting year as printed in financial statements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u16", into = "u16")]
pub struct FiscalYear(u16);

impl fmt::Display for FiscalYear {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FY{}", self.0)
    }
}

impl FiscalYear {
    pub const MIN: u16 = 1900;
    pub const MAX: u16 = 2099;

    /// Returns `None` outside 1900..=2099.
    pub fn new(year: u16) -> Option<Self> {
        (Self::MIN..=Self::MAX).contains(&year).then_some(FiscalYear(year))
    }

    pub fn year(self) -> u16 {
        self.0
    }
}

impl TryFrom<u16> for FiscalYear {
    type Error = String;

    fn try_from(year: u16) -> Result<Self, Self::Error> {
        FiscalYear::new(year).ok_or_else(|| format!("Year out of range: {year}"))
    }
}

impl From<FiscalYear> for u16 {
    fn from(fy: FiscalYear) -> u16 {
        fy.0
    }
}
