use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{Context, Result};
use finlens_core::Metric;
use finlens_extract::MetricTable;
use finlens_import::{CategoryRule, CategoryRuleEngine, ColumnAliases};
use serde::Deserialize;

/// Optional `finlens.toml`. Every section falls back to the built-in tables.
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Replaces the built-in category rules when present. File order is priority.
    pub category_rules: Option<Vec<CategoryRule>>,
    /// Extra alias patterns appended per metric name.
    pub metric_aliases: BTreeMap<String, Vec<String>>,
    pub columns: ColumnAliases,
}

impl Config {
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        Self::from_toml(&content).with_context(|| format!("Invalid config {}", path.display()))
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    pub fn category_engine(&self) -> Result<CategoryRuleEngine> {
        let rules = match &self.category_rules {
            Some(rules) => rules.clone(),
            None => finlens_import::default_rules(),
        };
        Ok(CategoryRuleEngine::new(rules)?)
    }

    pub fn metric_table(&self) -> Result<MetricTable> {
        let mut table = MetricTable::builtin().clone();
        for (name, aliases) in &self.metric_aliases {
            let metric: Metric = name.parse().map_err(anyhow::Error::msg)?;
            table = table
                .with_aliases(metric, aliases)
                .with_context(|| format!("Invalid alias for {metric}"))?;
        }
        Ok(table)
    }
}
