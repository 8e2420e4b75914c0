use std::collections::HashSet;
use std::sync::OnceLock;

use finlens_core::{parse_amount, Currency, FinancialFact, FiscalYear};
use regex::Regex;

use crate::align::assign_years_to_amounts;
use crate::metrics::MetricTable;

// ── Compiled regex cache ─────────────────────────────────────────────────────

macro_rules! re {
    ($name:ident, $pat:expr) => {
        fn $name() -> &'static Regex {
            static R: OnceLock<Regex> = OnceLock::new();
            R.get_or_init(|| Regex::new($pat).expect("invalid regex"))
        }
    };
}

re!(re_amount,
    r"\(?[-+]?[$€£₹]?\s?\d[\d,]*(?:\.\d+)?\)?");
re!(re_year,
    r"\b(?:19|20)\d{2}\b");

// ── Public extraction API ─────────────────────────────────────────────────────

/// Turns lines of statement text into [`FinancialFact`]s.
#[derive(Debug, Clone)]
pub struct MetricExtractor {
    table: MetricTable,
}

impl Default for MetricExtractor {
    fn default() -> Self {
        Self::new(MetricTable::builtin().clone())
    }
}

impl MetricExtractor {
    pub fn new(table: MetricTable) -> Self {
        Self { table }
    }

    /// Extract every page of a document; pages are numbered from 1.
    pub fn extract_document<S: AsRef<str>>(&self, source_id: &str, pages: &[S]) -> Vec<FinancialFact> {
        pages
            .iter()
            .zip(1u32..)
            .flat_map(|(text, page)| self.extract_page(source_id, page, text.as_ref()))
            .collect()
    }

    /// Facts come out in line order, then metric order, then left to right.
    pub fn extract_page(&self, source_id: &str, page: u32, text: &str) -> Vec<FinancialFact> {
        text.split(is_line_break)
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .flat_map(|line| self.extract_line(source_id, page, line))
            .collect()
    }

    pub fn extract_line(&self, source_id: &str, page: u32, line: &str) -> Vec<FinancialFact> {
        let lowered = line.to_lowercase();
        let mut facts = Vec::new();

        for metric in self.table.matching(&lowered) {
            let amounts = amount_tokens(line);
            if amounts.is_empty() {
                continue;
            }
            let years = assign_years_to_amounts(&extract_years(line), amounts.len());
            let currency = Currency::detect(line);

            for (token, year) in amounts.iter().zip(years) {
                // Unparseable tokens are dropped without shifting the year pairing.
                let Ok(value) = parse_amount(token) else {
                    continue;
                };
                facts.push(FinancialFact {
                    metric,
                    value,
                    currency,
                    year,
                    context: line.to_string(),
                    source_id: source_id.to_string(),
                    page,
                });
            }
        }

        facts
    }
}

/// Line terminators in extracted text, including bare `\r` and the Unicode
/// line and paragraph separators.
fn is_line_break(c: char) -> bool {
    matches!(
        c,
        '\n' | '\r' | '\x0b' | '\x0c' | '\x1c'..='\x1e' | '\u{85}' | '\u{2028}' | '\u{2029}'
    )
}

// ── Tokens ────────────────────────────────────────────────────────────────────

/// Four-digit years in 1900..=2099, left to right.
pub fn extract_years(line: &str) -> Vec<FiscalYear> {
    re_year()
        .find_iter(line)
        .filter_map(|m| m.as_str().parse().ok().and_then(FiscalYear::new))
        .collect()
}

/// Amount-looking substrings of `line`, left to right.
///
/// A token that is exactly one of the line's year tokens is a column
/// heading, not a figure, and is left out.
pub fn amount_tokens(line: &str) -> Vec<&str> {
    let year_spans: HashSet<(usize, usize)> = re_year()
        .find_iter(line)
        .map(|m| (m.start(), m.end()))
        .collect();

    re_amount()
        .find_iter(line)
        .filter(|m| m.as_str().chars().any(|c| c.is_ascii_digit()))
        .filter(|m| {
            let raw = m.as_str();
            let trimmed = raw.trim_start();
            let start = m.start() + (raw.len() - trimmed.len());
            let core = trimmed.trim_end_matches(',');
            !year_spans.contains(&(start, start + core.len()))
        })
        .map(|m| m.as_str())
        .collect()
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use finlens_core::Metric;
    use rust_decimal::Decimal;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn fy(y: u16) -> Option<FiscalYear> {
        FiscalYear::new(y)
    }

    fn extract(text: &str) -> Vec<FinancialFact> {
        MetricExtractor::default().extract_page("annual.pdf", 1, text)
    }

    // ── Tokens ────────────────────────────────────────────────────────────────

    #[test]
    fn amount_tokens_keep_parens_and_symbols() {
        let trimmed: Vec<_> = amount_tokens("Revenue $1,000.50 (200) -3 ₹ 3,450")
            .into_iter()
            .map(str::trim)
            .collect();
        assert_eq!(trimmed, vec!["$1,000.50", "(200)", "-3", "₹ 3,450"]);
    }

    #[test]
    fn year_tokens_are_not_amounts() {
        let tokens: Vec<_> = amount_tokens("Net Income 2021 2022 1,000 (200)")
            .into_iter()
            .map(str::trim)
            .collect();
        assert_eq!(tokens, vec!["1,000", "(200)"]);
    }

    #[test]
    fn year_followed_by_comma_is_still_a_year() {
        let tokens: Vec<_> = amount_tokens("Sales 2021, 2022 10 20")
            .into_iter()
            .map(str::trim)
            .collect();
        assert_eq!(tokens, vec!["10", "20"]);
    }

    #[test]
    fn extract_years_range() {
        let years = extract_years("FY 1899 1900 2023 2099 2100 20210");
        assert_eq!(years, vec![fy(1900).unwrap(), fy(2023).unwrap(), fy(2099).unwrap()]);
    }

    // ── Lines ─────────────────────────────────────────────────────────────────

    #[test]
    fn end_to_end_net_income_two_years() {
        let facts = extract("Net Income 2021 2022 1,000 (200)");
        assert_eq!(facts.len(), 2);
        assert_eq!(facts[0].metric, Metric::NetIncome);
        assert_eq!(facts[0].year, fy(2021));
        assert_eq!(facts[0].value, dec("1000"));
        assert_eq!(facts[1].metric, Metric::NetIncome);
        assert_eq!(facts[1].year, fy(2022));
        assert_eq!(facts[1].value, dec("-200"));
        assert_eq!(facts[1].context, "Net Income 2021 2022 1,000 (200)");
        assert_eq!(facts[1].currency, Currency::Unknown);
    }

    #[test]
    fn lines_without_digits_give_nothing() {
        assert!(extract("Revenue\nNet profit after tax\nTotal Assets").is_empty());
    }

    #[test]
    fn lines_without_alias_give_nothing() {
        assert!(extract("Employees 2021 1,200").is_empty());
    }

    #[test]
    fn rupee_amount_is_inr() {
        let facts = extract("Revenue ₹ 3,450");
        assert_eq!(facts.len(), 1);
        assert_eq!(facts[0].value, dec("3450"));
        assert_eq!(facts[0].currency, Currency::Inr);
        assert_eq!(facts[0].year, None);
    }

    #[test]
    fn parenthesized_value_is_negative() {
        let facts = extract("Net loss / Net profit (1,200.00)");
        assert_eq!(facts.len(), 1);
        assert_eq!(facts[0].value, dec("-1200"));
    }

    #[test]
    fn single_year_broadcasts_to_all_amounts() {
        let facts = extract("Total Assets as at 2020: 5,000 6,000 7,000");
        let years: Vec<_> = facts.iter().map(|f| f.year).collect();
        assert_eq!(years, vec![fy(2020), fy(2020), fy(2020)]);
    }

    #[test]
    fn extra_years_keep_rightmost_columns() {
        let facts = extract("Gross Profit 2019 2020 2021 300 400");
        let pairs: Vec<_> = facts.iter().map(|f| (f.year, f.value)).collect();
        assert_eq!(pairs, vec![(fy(2020), dec("300")), (fy(2021), dec("400"))]);
    }

    #[test]
    fn multi_metric_line_is_not_deduplicated() {
        let facts = extract("EBITDA 900");
        let metrics: Vec<_> = facts.iter().map(|f| f.metric).collect();
        assert_eq!(metrics, vec![Metric::OperatingIncome, Metric::Ebitda]);
        assert!(facts.iter().all(|f| f.value == dec("900")));
    }

    #[test]
    fn dollar_values_and_usd() {
        let facts = extract("Total revenue $12,500.75 2023");
        assert_eq!(facts.len(), 1);
        assert_eq!(facts[0].currency, Currency::Usd);
        assert_eq!(facts[0].value, dec("12500.75"));
        assert_eq!(facts[0].year, fy(2023));
    }

    #[test]
    fn facts_follow_line_order_and_provenance() {
        let facts = MetricExtractor::default().extract_page(
            "report.pdf",
            3,
            "  Revenue 100  \n\nrandom text 5\nTotal Liabilities 40\n",
        );
        let metrics: Vec<_> = facts.iter().map(|f| f.metric).collect();
        assert_eq!(metrics, vec![Metric::Revenue, Metric::TotalLiabilities]);
        assert_eq!(facts[0].context, "Revenue 100");
        assert!(facts.iter().all(|f| f.page == 3 && f.source_id == "report.pdf"));
    }

    #[test]
    fn bare_carriage_returns_split_lines() {
        let facts = extract("Revenue 100\rNet Income 50");
        let pairs: Vec<_> = facts.iter().map(|f| (f.metric, f.value)).collect();
        assert_eq!(pairs, vec![(Metric::Revenue, dec("100")), (Metric::NetIncome, dec("50"))]);
    }

    #[test]
    fn unicode_separators_split_lines() {
        let facts = extract("EPS 1.5\u{2028}Total Assets 900\u{85}Revenue 7");
        let metrics: Vec<_> = facts.iter().map(|f| f.metric).collect();
        assert_eq!(metrics, vec![Metric::Eps, Metric::TotalAssets, Metric::Revenue]);
    }

    #[test]
    fn extraction_is_idempotent() {
        let text = "Revenue 2022 2023 1,000 1,100\nNet profit 2023 (50)\nEPS 2023 1.25";
        let first = extract(text);
        let second = extract(text);
        assert_eq!(first, second);
        assert!(!first.is_empty());
    }

    #[test]
    fn document_pages_numbered_from_one() {
        let pages = ["Cover page", "Revenue 10", "", "EPS 0.5"];
        let facts = MetricExtractor::default().extract_document("doc", &pages);
        let pages: Vec<_> = facts.iter().map(|f| f.page).collect();
        assert_eq!(pages, vec![2, 4]);
    }

    #[test]
    fn empty_page_gives_nothing() {
        assert!(extract("").is_empty());
        assert!(extract("   \n \n").is_empty());
    }

    #[test]
    fn no_panic_on_garbage_input() {
        let _ = extract("revenue !@#$%^&*()\n\0\x01\x02 (,) $ ₹");
    }
}
