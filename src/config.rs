//! Run configuration.
//!
//! [`Config`] is the compiled, read-only form used by the pipeline.
//! [`ConfigFile`] is its JSON representation:
//!
//! ```json
//! {
//!   "account_name": "Liabilities:CreditCard:DNB",
//!   "currency": "NOK",
//!   "default_account": "Expenses:Uncategorized",
//!   "default_split_percentage": 50,
//!   "default_shared_account": "Assets:Receivables:Alex",
//!   "skip_balance_forward": true,
//!   "skip_payments": false,
//!   "transaction_patterns": [
//!     { "narration": "REMA", "account": "Expenses:Groceries" },
//!     { "narration": "REMA\\s*1000", "regex": true, "amount": { "gt": 500 },
//!       "split": [ { "account": "Expenses:Groceries", "percentage": 80 },
//!                  { "account": "Expenses:Household", "percentage": 20 } ],
//!       "shared": { "account": "Assets:Receivables:Alex", "percentage": 50 } }
//!   ]
//! }
//! ```

use crate::action::{Action, Allocation, Split, Target};
use crate::error::{ClassifierError, Result};
use crate::predicate::{AmountCompare, Predicate, TextMatch};
use crate::rules::{Rule, RuleTable};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

/// Default currency when the file doesn't name one.
pub const DEFAULT_CURRENCY: &str = "NOK";

/// Default fallback account.
pub const DEFAULT_ACCOUNT: &str = "Expenses:Uncategorized";

/// Everything a classification run needs. Constructed once, never mutated.
#[derive(Debug, Clone)]
pub struct Config {
    /// Ledger account of the statement itself, e.g. the credit card liability
    pub account_name: String,
    pub currency: String,
    pub rule_table: RuleTable,
    pub skip_balance_forward: bool,
    pub skip_payments: bool,
}

impl Config {
    /// Config with the default skip policy (skip balance forward, keep payments).
    pub fn new(account_name: impl Into<String>, currency: impl Into<String>, rule_table: RuleTable) -> Self {
        Config {
            account_name: account_name.into(),
            currency: currency.into(),
            rule_table,
            skip_balance_forward: true,
            skip_payments: false,
        }
    }

    /// Loads and compiles a JSON configuration file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path)?;
        ConfigFile::from_reader(BufReader::new(file))?.build()
    }
}

fn default_currency() -> String {
    DEFAULT_CURRENCY.to_string()
}

fn default_account() -> String {
    DEFAULT_ACCOUNT.to_string()
}

fn default_true() -> bool {
    true
}

/// On-disk configuration.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    pub account_name: String,
    #[serde(default = "default_currency")]
    pub currency: String,
    #[serde(default = "default_account")]
    pub default_account: String,
    /// Share of every unmatched transaction owed back by someone else
    #[serde(default)]
    pub default_split_percentage: Option<Decimal>,
    /// Receivable account for `default_split_percentage`
    #[serde(default)]
    pub default_shared_account: Option<String>,
    #[serde(default = "default_true")]
    pub skip_balance_forward: bool,
    #[serde(default)]
    pub skip_payments: bool,
    #[serde(default)]
    pub transaction_patterns: Vec<PatternSpec>,
}

/// One configured rule.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PatternSpec {
    #[serde(default)]
    pub narration: Option<String>,
    #[serde(default)]
    pub regex: bool,
    #[serde(default = "default_true")]
    pub case_insensitive: bool,
    #[serde(default)]
    pub amount: Option<AmountSpec>,
    #[serde(default)]
    pub account: Option<String>,
    #[serde(default)]
    pub split: Option<Vec<AllocationSpec>>,
    #[serde(default)]
    pub shared: Option<AllocationSpec>,
}

/// `{"lt": x}`, `{"gt": x}` or `{"between": [lo, hi]}`.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AmountSpec {
    Lt(Decimal),
    Gt(Decimal),
    Between(Decimal, Decimal),
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AllocationSpec {
    pub account: String,
    pub percentage: Decimal,
}

impl From<AmountSpec> for AmountCompare {
    fn from(spec: AmountSpec) -> Self {
        match spec {
            AmountSpec::Lt(bound) => AmountCompare::less_than(bound),
            AmountSpec::Gt(bound) => AmountCompare::greater_than(bound),
            AmountSpec::Between(lo, hi) => AmountCompare::between(lo, hi),
        }
    }
}

impl ConfigFile {
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        Ok(serde_json::from_reader(reader)?)
    }

    /// Compiles patterns into a rule table.
    ///
    /// Any invalid pattern fails the whole build with its index.
    pub fn build(self) -> Result<Config> {
        let rules = self
            .transaction_patterns
            .iter()
            .enumerate()
            .map(|(index, spec)| spec.to_rule(index))
            .collect::<Result<Vec<_>>>()?;
        let default = self.default_action()?;

        Ok(Config {
            account_name: self.account_name,
            currency: self.currency,
            rule_table: RuleTable::new(rules, default),
            skip_balance_forward: self.skip_balance_forward,
            skip_payments: self.skip_payments,
        })
    }

    /// The fallback action: `default_account`, with a receivable overlay when
    /// `default_split_percentage` is set.
    fn default_action(&self) -> Result<Action> {
        let base = Target::single(&self.default_account);
        match (self.default_split_percentage, &self.default_shared_account) {
            (Some(percentage), Some(account)) => Action::shared(base, account, percentage)
                .map_err(|e| ClassifierError::InvalidDefault(e.to_string())),
            (Some(_), None) => Err(ClassifierError::InvalidDefault(
                "default_split_percentage needs a default_shared_account".to_string(),
            )),
            (None, Some(_)) => Err(ClassifierError::InvalidDefault(
                "default_shared_account needs a default_split_percentage".to_string(),
            )),
            (None, None) => Ok(Action::from(base)),
        }
    }
}

impl PatternSpec {
    /// Compiles this pattern; `index` is its position in the file, used for errors.
    pub fn to_rule(&self, index: usize) -> Result<Rule> {
        let rule = self
            .predicate()
            .and_then(|predicate| Ok(Rule::new(predicate, self.action()?)));
        rule.map_err(|message| ClassifierError::InvalidRule { index, message })
    }

    fn predicate(&self) -> std::result::Result<Predicate, String> {
        let text = match &self.narration {
            Some(pattern) if self.regex => Some(
                TextMatch::regex(pattern, self.case_insensitive).map_err(|e| e.to_string())?,
            ),
            Some(pattern) => Some(TextMatch::substring(pattern, self.case_insensitive)),
            None => None,
        };
        if let Some(AmountSpec::Between(lo, hi)) = self.amount {
            if lo > hi {
                return Err(format!("amount range [{}, {}] is reversed", lo, hi));
            }
        }
        let amount = self.amount.map(AmountCompare::from);

        match (text, amount) {
            (Some(text), Some(amount)) => Ok(Predicate::combined(text, amount)),
            (Some(text), None) => Ok(Predicate::Text(text)),
            (None, Some(amount)) => Ok(Predicate::amount(amount)),
            (None, None) => Err("pattern needs a narration or an amount condition".to_string()),
        }
    }

    fn action(&self) -> std::result::Result<Action, String> {
        let target = match (&self.account, &self.split) {
            (Some(account), None) => Target::single(account),
            (None, Some(split)) => split
                .iter()
                .map(|a| Allocation::new(&a.account, a.percentage))
                .collect::<Result<Vec<_>>>()
                .and_then(Split::new)
                .map(Target::Split)
                .map_err(|e| e.to_string())?,
            (Some(_), Some(_)) => return Err("pattern has both an account and a split".to_string()),
            (None, None) => return Err("pattern needs an account or a split".to_string()),
        };

        match &self.shared {
            Some(shared) => {
                Action::shared(target, &shared.account, shared.percentage).map_err(|e| e.to_string())
            }
            None => Ok(Action::from(target)),
        }
    }
}
