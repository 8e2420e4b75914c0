use std::sync::OnceLock;

use finlens_core::{Metric, PatternError, PatternSet};

/// Built-in alias patterns per canonical metric.
pub fn default_aliases(metric: Metric) -> &'static [&'static str] {
    match metric {
        Metric::Revenue => &[
            r"revenue",
            r"total\s+income",
            r"turnover",
            r"sales",
            r"income\s+from\s+operations",
        ],
        Metric::GrossProfit => &[r"gross\s+profit"],
        Metric::OperatingIncome => &[r"operating\s+income", r"operating\s+profit", r"ebit"],
        Metric::Ebitda => &[r"ebitda"],
        Metric::NetIncome => &[
            r"net\s+income",
            r"net\s+profit",
            r"profit\s+after\s+tax",
            r"pat",
        ],
        Metric::TotalAssets => &[r"total\s+assets"],
        Metric::TotalLiabilities => &[r"total\s+liabilities"],
        Metric::CashFlow => &[r"cash\s+flow", r"net\s+cash\s+from\s+operating\s+activities"],
        Metric::Eps => &[r"earnings\s+per\s+share", r"\beps\b"],
    }
}

/// Ordered `(metric, aliases)` entries. A line is tested against every entry
/// in order and each hit yields its own facts.
#[derive(Debug, Clone, Default)]
pub struct MetricTable {
    entries: Vec<(Metric, PatternSet)>,
}

impl MetricTable {
    pub fn empty() -> Self {
        Self::default()
    }

    /// All nine canonical metrics with their default aliases.
    pub fn standard() -> Result<Self, PatternError> {
        Metric::ALL
            .into_iter()
            .try_fold(Self::empty(), |table, metric| {
                table.with_aliases(metric, default_aliases(metric))
            })
    }

    /// Shared standard table, built on first use.
    pub fn builtin() -> &'static MetricTable {
        static TABLE: OnceLock<MetricTable> = OnceLock::new();
        TABLE.get_or_init(|| MetricTable::standard().expect("invalid built-in metric alias"))
    }

    /// Append aliases to `metric`'s entry, adding the entry at the end if the
    /// metric is not in the table yet.
    pub fn with_aliases<I, S>(mut self, metric: Metric, aliases: I) -> Result<Self, PatternError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        match self.entries.iter_mut().find(|(m, _)| *m == metric) {
            Some((_, patterns)) => patterns.extend(aliases)?,
            None => self.entries.push((metric, PatternSet::new(aliases)?)),
        }
        Ok(self)
    }

    /// Metrics whose alias set hits `line`, in table order.
    pub fn matching<'a>(&'a self, line: &'a str) -> impl Iterator<Item = Metric> + 'a {
        self.entries
            .iter()
            .filter(move |(_, patterns)| patterns.is_match(line))
            .map(|(metric, _)| *metric)
    }

    pub fn metrics(&self) -> impl Iterator<Item = Metric> + '_ {
        self.entries.iter().map(|(metric, _)| *metric)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hits(line: &str) -> Vec<Metric> {
        MetricTable::builtin().matching(&line.to_lowercase()).collect()
    }

    #[test]
    fn builtin_covers_all_metrics_in_order() {
        let metrics: Vec<_> = MetricTable::builtin().metrics().collect();
        assert_eq!(metrics, Metric::ALL.to_vec());
    }

    #[test]
    fn recognises_aliases() {
        assert_eq!(hits("Total Income 1,000"), vec![Metric::Revenue]);
        assert_eq!(hits("Gross   profit 200"), vec![Metric::GrossProfit]);
        assert_eq!(hits("Total Assets 5,000"), vec![Metric::TotalAssets]);
        assert_eq!(hits("Total Liabilities 3,000"), vec![Metric::TotalLiabilities]);
        assert_eq!(hits("Basic EPS 4.20"), vec![Metric::Eps]);
    }

    #[test]
    fn a_line_can_hit_several_metrics() {
        // "ebitda" contains "ebit", so Operating Income also matches.
        assert_eq!(hits("EBITDA 900"), vec![Metric::OperatingIncome, Metric::Ebitda]);
        assert_eq!(
            hits("Net cash from operating activities 700"),
            vec![Metric::CashFlow]
        );
    }

    #[test]
    fn eps_needs_word_boundary() {
        assert!(hits("steps taken 12").is_empty());
    }

    #[test]
    fn extra_aliases_extend_existing_entry() {
        let table = MetricTable::standard()
            .unwrap()
            .with_aliases(Metric::Revenue, [r"net\s+receipts"])
            .unwrap();
        assert_eq!(table.metrics().count(), 9);
        assert_eq!(table.matching("net receipts 10").collect::<Vec<_>>(), vec![Metric::Revenue]);
    }

    #[test]
    fn custom_table_starts_empty() {
        let table = MetricTable::empty().with_aliases(Metric::Eps, [r"\beps\b"]).unwrap();
        assert_eq!(table.metrics().collect::<Vec<_>>(), vec![Metric::Eps]);
        assert_eq!(table.matching("revenue 10").count(), 0);
    }

    #[test]
    fn invalid_alias_is_an_error() {
        assert!(MetricTable::empty().with_aliases(Metric::Revenue, ["(oops"]).is_err());
    }
}
