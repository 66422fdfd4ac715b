//! Posting generation.
//!
//! Turns an [`Action`] into postings that sum exactly to the record amount.
//! Split allocations are rounded to two decimals in declaration order and
//! the last allocation takes whatever remains, so rounding error never
//! leaks into the total.

use crate::action::{Action, Split, Target};
use crate::error::{ClassifierError, Result};
use crate::money::Money;
use crate::transaction::TransactionRecord;

/// A single `(account, amount)` leg of an entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Posting {
    pub account: String,
    pub amount: Money,
}

impl Posting {
    pub fn new(account: impl Into<String>, amount: Money) -> Self {
        Posting {
            account: account.into(),
            amount,
        }
    }
}

/// A classified transaction.
///
/// # Invariants
///
/// - `postings` sum exactly to `source.amount`
/// - every posting amount has two decimal places
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassifiedEntry {
    pub source: TransactionRecord,
    pub postings: Vec<Posting>,
}

impl ClassifiedEntry {
    /// Sum of all posting amounts.
    pub fn total(&self) -> Money {
        self.postings.iter().map(|p| p.amount).sum()
    }
}

/// Generates the postings for `action` applied to `record`.
///
/// Fails with [`ClassifierError::InvalidAmount`] if the record amount has
/// more than two decimal places or a share cannot be computed.
pub fn generate(action: &Action, record: &TransactionRecord) -> Result<Vec<Posting>> {
    let total = Money::exact(record.amount).ok_or_else(|| ClassifierError::InvalidAmount {
        amount: record.amount,
        reason: "more than two decimal places".to_string(),
    })?;

    let mut postings = Vec::new();
    match action {
        Action::Single(account) => postings.push(Posting::new(account, total)),
        Action::Split(split) => allocate_split(split, total, &mut postings)?,
        Action::Shared(overlay) => {
            let receivable = overlay.receivable();
            let shared = share(total, receivable.percentage())?;
            postings.push(Posting::new(receivable.account(), shared));

            let remainder = total - shared;
            match overlay.base() {
                Target::Single(account) => postings.push(Posting::new(account, remainder)),
                Target::Split(split) => allocate_split(split, remainder, &mut postings)?,
            }
        }
    }

    Ok(postings)
}

fn allocate_split(split: &Split, total: Money, postings: &mut Vec<Posting>) -> Result<()> {
    let allocations = split.allocations();
    let Some((last, leading)) = allocations.split_last() else {
        return Err(ClassifierError::EmptyAllocations);
    };

    let mut allocated = Money::ZERO;
    for allocation in leading {
        let amount = share(total, allocation.percentage())?;
        allocated += amount;
        postings.push(Posting::new(allocation.account(), amount));
    }
    postings.push(Posting::new(last.account(), total - allocated));

    Ok(())
}

fn share(total: Money, percentage: rust_decimal::Decimal) -> Result<Money> {
    total
        .percent(percentage)
        .ok_or_else(|| ClassifierError::InvalidAmount {
            amount: total.value(),
            reason: format!("cannot take {}% without overflow", percentage),
        })
}
