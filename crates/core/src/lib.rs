pub mod amount;
pub mod currency;
pub mod fact;
pub mod pattern;
pub mod period;
pub mod transaction;

pub use amount::{parse_amount, AmountError};
pub use currency::Currency;
pub use fact::{FinancialFact, Metric};
pub use pattern::{PatternError, PatternSet};
pub use period::FiscalYear;
pub use transaction::{CategorizedTransaction, Necessity, NormalizedTransaction};
