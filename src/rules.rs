//! Ordered, first-match-wins rule table.

use crate::action::Action;
use crate::predicate::Predicate;
use crate::transaction::TransactionRecord;

/// A match condition and what to do on a match.
#[derive(Debug, Clone)]
pub struct Rule {
    pub predicate: Predicate,
    pub action: Action,
}

impl Rule {
    pub fn new(predicate: Predicate, action: Action) -> Self {
        Rule { predicate, action }
    }
}

/// Rules in declaration order plus the fallback action for unmatched records.
///
/// Read-only after construction; share it freely between threads.
#[derive(Debug, Clone)]
pub struct RuleTable {
    rules: Vec<Rule>,
    default: Action,
}

impl RuleTable {
    pub fn new(rules: Vec<Rule>, default: Action) -> Self {
        RuleTable { rules, default }
    }

    /// Returns the action of the first matching rule, or the default.
    pub fn classify(&self, record: &TransactionRecord) -> &Action {
        self.find(record)
            .map(|(_, rule)| &rule.action)
            .unwrap_or(&self.default)
    }

    /// Index and rule of the first match, if any. Later rules are not evaluated.
    pub fn find(&self, record: &TransactionRecord) -> Option<(usize, &Rule)> {
        self.rules
            .iter()
            .enumerate()
            .find(|(_, rule)| rule.predicate.evaluate(record))
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn default_action(&self) -> &Action {
        &self.default
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}
