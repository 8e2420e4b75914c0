use std::sync::OnceLock;

use finlens_core::{Necessity, PatternError, PatternSet};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Category returned when no rule matches.
pub const OTHER_CATEGORY: &str = "Other";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CategoryRule {
    pub category: String,
    pub necessity: Necessity,
    /// Case-insensitive regular expressions, searched anywhere in the description.
    pub patterns: Vec<String>,
}

impl CategoryRule {
    pub fn new(category: &str, necessity: Necessity, patterns: &[&str]) -> Self {
        CategoryRule {
            category: category.to_string(),
            necessity,
            patterns: patterns.iter().map(|p| p.to_string()).collect(),
        }
    }
}

/// The built-in rule table. Order is priority: essentials first.
pub fn default_rules() -> Vec<CategoryRule> {
    use Necessity::{Necessity as Need, NonNecessity as Want};

    vec![
        CategoryRule::new("Rent / Housing", Need, &["rent", "landlord", "mortgage"]),
        CategoryRule::new(
            "Groceries",
            Need,
            &["grocery", "supermarket", "mart", "whole ?foods", "aldi", "walmart"],
        ),
        CategoryRule::new(
            "Utilities",
            Need,
            &["electric", "water", "gas bill", "internet", "broadband", "utility"],
        ),
        CategoryRule::new(
            "Transport",
            Need,
            &["fuel", "petrol", "diesel", "uber", "lyft", "metro", "bus", "train"],
        ),
        CategoryRule::new("Healthcare", Need, &["hospital", "pharmacy", "doctor", "clinic"]),
        CategoryRule::new(
            "Education",
            Need,
            &["tuition", "school", "course", "udemy", "coursera"],
        ),
        CategoryRule::new(
            "Dining / Food Delivery",
            Want,
            &["restaurant", "cafe", "zomato", "swiggy", "doordash", "ubereats"],
        ),
        CategoryRule::new("Shopping", Want, &["amazon", "flipkart", "shopping", "store"]),
        CategoryRule::new(
            "Entertainment",
            Want,
            &["netflix", "spotify", "prime", "movie", "cinema", "game"],
        ),
        CategoryRule::new(
            "Travel",
            Want,
            &["airlines", "hotel", "booking", "trip", "vacation"],
        ),
    ]
}

#[derive(Debug, Error)]
pub enum RuleError {
    #[error("Rule '{category}': {source}")]
    Pattern {
        category: String,
        #[source]
        source: PatternError,
    },
    #[error("Failed to parse rule file: {0}")]
    Toml(#[from] toml::de::Error),
}

#[derive(Deserialize)]
struct RuleFile {
    #[serde(default)]
    category_rules: Vec<CategoryRule>,
}

/// Internal pairing of a rule with its compiled patterns.
struct CompiledRule {
    rule: CategoryRule,
    patterns: PatternSet,
}

/// Ordered first-match categorizer.
pub struct CategoryRuleEngine {
    rules: Vec<CompiledRule>,
}

impl CategoryRuleEngine {
    /// Rules keep the order given; the first match wins.
    pub fn new(rules: Vec<CategoryRule>) -> Result<Self, RuleError> {
        let rules = rules
            .into_iter()
            .map(|rule| {
                let patterns = PatternSet::new(&rule.patterns).map_err(|source| {
                    RuleError::Pattern { category: rule.category.clone(), source }
                })?;
                Ok(CompiledRule { rule, patterns })
            })
            .collect::<Result<Vec<_>, RuleError>>()?;
        Ok(Self { rules })
    }

    /// Load a replacement table from `[[category_rules]]` entries, in file order.
    pub fn from_toml(toml_content: &str) -> Result<Self, RuleError> {
        let file: RuleFile = toml::from_str(toml_content)?;
        Self::new(file.category_rules)
    }

    /// Shared engine over [`default_rules`], built on first use.
    pub fn builtin() -> &'static CategoryRuleEngine {
        static ENGINE: OnceLock<CategoryRuleEngine> = OnceLock::new();
        ENGINE.get_or_init(|| {
            CategoryRuleEngine::new(default_rules()).expect("invalid built-in category rule")
        })
    }

    pub fn rules(&self) -> impl Iterator<Item = &CategoryRule> {
        self.rules.iter().map(|cr| &cr.rule)
    }

    pub fn find_matching_rule(&self, description: &str) -> Option<&CategoryRule> {
        self.rules
            .iter()
            .find(|cr| cr.patterns.is_match(description))
            .map(|cr| &cr.rule)
    }

    /// Total: unmatched descriptions fall back to `("Other", Non-necessity)`.
    pub fn categorize(&self, description: &str) -> (&str, Necessity) {
        match self.find_matching_rule(description) {
            Some(rule) => (rule.category.as_str(), rule.necessity),
            None => (OTHER_CATEGORY, Necessity::NonNecessity),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine() -> &'static CategoryRuleEngine {
        CategoryRuleEngine::builtin()
    }

    #[test]
    fn builtin_table_has_ten_rules_in_priority_order() {
        let names: Vec<_> = engine().rules().map(|r| r.category.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "Rent / Housing",
                "Groceries",
                "Utilities",
                "Transport",
                "Healthcare",
                "Education",
                "Dining / Food Delivery",
                "Shopping",
                "Entertainment",
                "Travel",
            ]
        );
    }

    #[test]
    fn categorizes_common_descriptions() {
        assert_eq!(engine().categorize("WHOLE FOODS MARKET"), ("Groceries", Necessity::Necessity));
        assert_eq!(engine().categorize("Monthly RENT - Apt 4B"), ("Rent / Housing", Necessity::Necessity));
        assert_eq!(engine().categorize("Apollo Pharmacy"), ("Healthcare", Necessity::Necessity));
        assert_eq!(engine().categorize("NETFLIX.COM"), ("Entertainment", Necessity::NonNecessity));
        assert_eq!(engine().categorize("Swiggy order 8812"), ("Dining / Food Delivery", Necessity::NonNecessity));
        assert_eq!(engine().categorize("Emirates Airlines"), ("Travel", Necessity::NonNecessity));
    }

    #[test]
    fn unmatched_is_other_non_necessity() {
        assert_eq!(engine().categorize("ZELLE TO J DOE"), (OTHER_CATEGORY, Necessity::NonNecessity));
        assert_eq!(engine().categorize(""), (OTHER_CATEGORY, Necessity::NonNecessity));
    }

    #[test]
    fn deterministic() {
        let first = engine().categorize("Spotify Premium");
        for _ in 0..5 {
            assert_eq!(engine().categorize("Spotify Premium"), first);
        }
    }

    #[test]
    fn earlier_rule_wins_on_overlap() {
        // "ubereats" also contains "uber" (Transport, listed before Dining).
        assert_eq!(engine().categorize("UBEREATS*ORDER"), ("Transport", Necessity::Necessity));
        // Transport before Entertainment.
        assert_eq!(engine().categorize("Metro cinema pass"), ("Transport", Necessity::Necessity));
    }

    #[test]
    fn custom_table_order_is_priority() {
        let engine = CategoryRuleEngine::new(vec![
            CategoryRule::new("Subscriptions", Necessity::NonNecessity, &["netflix"]),
            CategoryRule::new("Streaming", Necessity::Necessity, &["netflix", "hulu"]),
        ])
        .unwrap();
        assert_eq!(engine.categorize("NETFLIX"), ("Subscriptions", Necessity::NonNecessity));
        assert_eq!(engine.categorize("Hulu"), ("Streaming", Necessity::Necessity));
    }

    #[test]
    fn empty_table_categorizes_everything_as_other() {
        let engine = CategoryRuleEngine::new(vec![]).unwrap();
        assert_eq!(engine.categorize("rent"), (OTHER_CATEGORY, Necessity::NonNecessity));
    }

    #[test]
    fn from_toml_keeps_file_order() {
        let toml = r#"
            [[category_rules]]
            category = "Coffee"
            necessity = "Non-necessity"
            patterns = ["starbucks", "cafe"]

            [[category_rules]]
            category = "Groceries"
            necessity = "Necessity"
            patterns = ["mart"]
        "#;
        let engine = CategoryRuleEngine::from_toml(toml).unwrap();
        assert_eq!(engine.rules().count(), 2);
        assert_eq!(engine.categorize("STARBUCKS #12"), ("Coffee", Necessity::NonNecessity));
        assert_eq!(engine.categorize("Walmart"), ("Groceries", Necessity::Necessity));
    }

    #[test]
    fn invalid_pattern_names_rule() {
        let err = CategoryRuleEngine::new(vec![CategoryRule::new(
            "Broken",
            Necessity::Necessity,
            &["[unterminated"],
        )])
        .err()
        .unwrap();
        assert!(err.to_string().contains("Broken"));
    }

    #[test]
    fn invalid_toml_errors() {
        assert!(matches!(
            CategoryRuleEngine::from_toml("[[category_rules]]\ncategory = 3"),
            Err(RuleError::Toml(_))
        ));
    }
}
