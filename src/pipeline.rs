//! Classification pipeline: skip filter, rule lookup, posting generation.

use crate::config::Config;
use crate::error::Result;
use crate::posting::{generate, ClassifiedEntry};
use crate::rules::RuleTable;
use crate::transaction::TransactionRecord;
use log::debug;
use std::fmt;

/// Narration of the carried-over balance line on a statement.
pub const BALANCE_FORWARD_MARKER: &str = "Skyldig beløp fra forrige faktura";

/// Narration of a card payment line.
pub const PAYMENT_MARKER: &str = "Innbetaling";

/// Why a record was dropped before classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    BalanceForward,
    Payment,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::BalanceForward => write!(f, "balance forward entry"),
            SkipReason::Payment => write!(f, "payment entry"),
        }
    }
}

/// Applies the configured skip policy to one record.
pub fn skip_reason(config: &Config, record: &TransactionRecord) -> Option<SkipReason> {
    let narration = record.narration.trim();
    if config.skip_balance_forward && narration == BALANCE_FORWARD_MARKER {
        Some(SkipReason::BalanceForward)
    } else if config.skip_payments && narration == PAYMENT_MARKER {
        Some(SkipReason::Payment)
    } else {
        None
    }
}

/// Classifies a single record against `table`.
pub fn classify_record(table: &RuleTable, record: TransactionRecord) -> Result<ClassifiedEntry> {
    let action = match table.find(&record) {
        Some((index, rule)) => {
            debug!("{}: matched rule {}", describe(&record), index);
            &rule.action
        }
        None => {
            debug!("{}: no rule matched, using default", describe(&record));
            table.default_action()
        }
    };
    let postings = generate(action, &record)?;
    Ok(ClassifiedEntry {
        source: record,
        postings,
    })
}

/// Lazily classifies `records` in input order, dropping skipped ones.
///
/// Each item is either an entry or the error for that record; an error does
/// not end the sequence.
pub fn run<'a, I>(config: &'a Config, records: I) -> impl Iterator<Item = Result<ClassifiedEntry>> + 'a
where
    I: IntoIterator<Item = TransactionRecord>,
    I::IntoIter: 'a,
{
    records.into_iter().filter_map(move |record| {
        if let Some(reason) = skip_reason(config, &record) {
            debug!("{}: skipping {}", describe(&record), reason);
            return None;
        }
        Some(classify_record(&config.rule_table, record))
    })
}

fn describe(record: &TransactionRecord) -> String {
    match record.row {
        Some(row) => format!("Row {}", row),
        None => format!("{} '{}'", record.date, record.narration),
    }
}
