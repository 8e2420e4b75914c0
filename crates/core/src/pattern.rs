use regex::{Regex, RegexBuilder};
use thiserror::Error;

#[derive(Debug, Error)]
#[error("Invalid pattern '{pattern}': {source}")]
pub struct PatternError {
    pub pattern: String,
    #[source]
    pub source: regex::Error,
}

/// An ordered set of case-insensitive regular expressions.
///
/// Both lookup tables (metric aliases and category rules) are lists of
/// `(label, PatternSet)` entries evaluated in order.
#[derive(Debug, Clone, Default)]
pub struct PatternSet {
    patterns: Vec<Regex>,
}

impl PatternSet {
    pub fn new<I, S>(patterns: I) -> Result<Self, PatternError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut set = PatternSet::default();
        set.extend(patterns)?;
        Ok(set)
    }

    /// Append patterns after the existing ones.
    pub fn extend<I, S>(&mut self, patterns: I) -> Result<(), PatternError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for pattern in patterns {
            let pattern = pattern.as_ref();
            let compiled = RegexBuilder::new(pattern)
                .case_insensitive(true)
                .build()
                .map_err(|source| PatternError { pattern: pattern.to_string(), source })?;
            self.patterns.push(compiled);
        }
        Ok(())
    }

    /// True if any pattern finds a match anywhere in `text`.
    pub fn is_match(&self, text: &str) -> bool {
        self.patterns.iter().any(|re| re.is_match(text))
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    pub fn sources(&self) -> impl Iterator<Item = &str> {
        self.patterns.iter().map(Regex::as_str)
    }
}
