//! Match conditions for classification rules.
//!
//! A [`Predicate`] tests a [`TransactionRecord`] by narration text, by
//! amount, or by both. Predicates are immutable once built; regex patterns
//! are compiled at construction so evaluation can never fail.
//!
//! Amount comparisons use the absolute value of the record amount, so a
//! refund of -30.00 and a purchase of 30.00 both satisfy `less_than(50)`.

use crate::error::{ClassifierError, Result};
use crate::transaction::TransactionRecord;
use regex::{Regex, RegexBuilder};
use rust_decimal::Decimal;

/// How a text pattern is applied to the narration.
#[derive(Debug, Clone)]
enum Matcher {
    /// Contiguous substring. Holds the pattern already case-folded when the
    /// match is case-insensitive.
    Substring(String),
    Regex(Regex),
}

/// Narration matcher.
#[derive(Debug, Clone)]
pub struct TextMatch {
    pattern: String,
    case_insensitive: bool,
    matcher: Matcher,
}

impl TextMatch {
    /// Substring match.
    pub fn substring(pattern: impl Into<String>, case_insensitive: bool) -> Self {
        let pattern = pattern.into();
        let needle = if case_insensitive {
            pattern.to_lowercase()
        } else {
            pattern.clone()
        };
        TextMatch {
            pattern,
            case_insensitive,
            matcher: Matcher::Substring(needle),
        }
    }

    /// Regex match anywhere in the narration.
    ///
    /// Fails with [`ClassifierError::InvalidRegex`] if the pattern does not compile.
    pub fn regex(pattern: impl Into<String>, case_insensitive: bool) -> Result<Self> {
        let pattern = pattern.into();
        let compiled = RegexBuilder::new(&pattern)
            .case_insensitive(case_insensitive)
            .build()
            .map_err(|source| ClassifierError::InvalidRegex {
                pattern: pattern.clone(),
                source,
            })?;
        Ok(TextMatch {
            pattern,
            case_insensitive,
            matcher: Matcher::Regex(compiled),
        })
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    pub fn is_regex(&self) -> bool {
        matches!(self.matcher, Matcher::Regex(_))
    }

    pub fn is_case_insensitive(&self) -> bool {
        self.case_insensitive
    }

    /// Tests the narration.
    pub fn matches(&self, narration: &str) -> bool {
        match &self.matcher {
            Matcher::Substring(needle) if self.case_insensitive => {
                narration.to_lowercase().contains(needle.as_str())
            }
            Matcher::Substring(needle) => narration.contains(needle.as_str()),
            Matcher::Regex(re) => re.is_match(narration),
        }
    }
}

/// Amount condition, always evaluated against `|amount|`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AmountCompare {
    LessThan(Decimal),
    GreaterThan(Decimal),
    /// Inclusive on both ends
    Between(Decimal, Decimal),
}

impl AmountCompare {
    pub fn less_than(bound: Decimal) -> Self {
        AmountCompare::LessThan(bound)
    }

    pub fn greater_than(bound: Decimal) -> Self {
        AmountCompare::GreaterThan(bound)
    }

    /// Builds an inclusive range. Bounds are kept as given, so `lo > hi`
    /// matches nothing.
    pub fn between(lo: Decimal, hi: Decimal) -> Self {
        AmountCompare::Between(lo, hi)
    }

    pub fn matches(&self, amount: Decimal) -> bool {
        let magnitude = amount.abs();
        match *self {
            AmountCompare::LessThan(bound) => magnitude < bound,
            AmountCompare::GreaterThan(bound) => magnitude > bound,
            AmountCompare::Between(lo, hi) => lo <= magnitude && magnitude <= hi,
        }
    }
}

/// A rule's match condition.
#[derive(Debug, Clone)]
pub enum Predicate {
    Text(TextMatch),
    Amount(AmountCompare),
    /// Both must hold; the text check runs first.
    Combined(TextMatch, AmountCompare),
}

impl Predicate {
    /// Case-insensitive substring match, the common case.
    pub fn text(pattern: impl Into<String>) -> Self {
        Predicate::Text(TextMatch::substring(pattern, true))
    }

    /// Case-insensitive regex match.
    pub fn regex(pattern: impl Into<String>) -> Result<Self> {
        Ok(Predicate::Text(TextMatch::regex(pattern, true)?))
    }

    pub fn amount(compare: AmountCompare) -> Self {
        Predicate::Amount(compare)
    }

    pub fn combined(text: TextMatch, amount: AmountCompare) -> Self {
        Predicate::Combined(text, amount)
    }

    /// Restricts this predicate to records whose amount also satisfies `compare`.
    ///
    /// An existing amount condition is replaced.
    pub fn with_amount(self, compare: AmountCompare) -> Self {
        match self {
            Predicate::Text(text) | Predicate::Combined(text, _) => {
                Predicate::Combined(text, compare)
            }
            Predicate::Amount(_) => Predicate::Amount(compare),
        }
    }

    /// Evaluates this predicate. Pure; safe to call from several threads.
    pub fn evaluate(&self, record: &TransactionRecord) -> bool {
        match self {
            Predicate::Text(text) => text.matches(&record.narration),
            Predicate::Amount(compare) => compare.matches(record.amount),
            Predicate::Combined(text, compare) => {
                text.matches(&record.narration) && compare.matches(record.amount)
            }
        }
    }
}
