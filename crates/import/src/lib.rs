pub mod analysis;
pub mod csv;
pub mod reconcile;
pub mod rules;

pub use analysis::{analyze_statement, CategorySpend, NecessitySpend, StatementAnalysis};
pub use csv::{CsvError, Table};
pub use reconcile::{normalize_table, AmountColumn, ColumnAliases, ColumnMapping, ReconcileError};
pub use rules::{default_rules, CategoryRule, CategoryRuleEngine, RuleError, OTHER_CATEGORY};

#[derive(Debug, thiserror::Error)]
pub enum ImportError {
    #[error(transparent)]
    Read(#[from] CsvError),
    #[error(transparent)]
    Columns(#[from] ReconcileError),
}

pub mod import {
    use crate::*;
    use finlens_core::NormalizedTransaction;

    /// Read a delimited bank statement and normalize its rows.
    pub fn import_statement<R: std::io::Read>(
        data: R,
        delimiter: u8,
        aliases: &ColumnAliases,
    ) -> Result<Vec<NormalizedTransaction>, ImportError> {
        let table = crate::csv::import_csv(data, delimiter)?;
        Ok(normalize_table(&table, aliases)?)
    }
}
