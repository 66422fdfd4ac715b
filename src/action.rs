//! Classification outcomes: where a matched transaction's money goes.
//!
//! All percentage invariants are checked by the constructors, so an
//! [`Action`] that exists is always valid to post.

use crate::error::{ClassifierError, Result};
use rust_decimal::Decimal;

/// Allowed deviation of a split's percentage sum from 100.
pub const SPLIT_TOLERANCE: Decimal = Decimal::from_parts(1, 0, 0, false, 2);

/// One destination of a split or overlay.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Allocation {
    account: String,
    percentage: Decimal,
}

impl Allocation {
    /// Creates an allocation with a percentage in (0, 100].
    pub fn new(account: impl Into<String>, percentage: Decimal) -> Result<Self> {
        let allocation = Allocation {
            account: account.into(),
            percentage,
        };
        allocation.validate()?;
        Ok(allocation)
    }

    pub fn account(&self) -> &str {
        &self.account
    }

    pub fn percentage(&self) -> Decimal {
        self.percentage
    }

    fn validate(&self) -> Result<()> {
        if self.percentage <= Decimal::ZERO || self.percentage > Decimal::ONE_HUNDRED {
            return Err(ClassifierError::InvalidPercentage {
                account: self.account.clone(),
                percentage: self.percentage,
            });
        }
        Ok(())
    }
}

/// An ordered percentage split summing to 100.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Split {
    allocations: Vec<Allocation>,
}

impl Split {
    pub fn new(allocations: Vec<Allocation>) -> Result<Self> {
        if allocations.is_empty() {
            return Err(ClassifierError::EmptyAllocations);
        }
        for allocation in &allocations {
            allocation.validate()?;
        }
        let total: Decimal = allocations.iter().map(|a| a.percentage).sum();
        if (total - Decimal::ONE_HUNDRED).abs() > SPLIT_TOLERANCE {
            return Err(ClassifierError::SplitSum { total });
        }
        Ok(Split { allocations })
    }

    /// Convenience constructor from `(account, percentage)` pairs.
    pub fn from_pairs<S: Into<String>>(pairs: impl IntoIterator<Item = (S, Decimal)>) -> Result<Self> {
        let allocations = pairs
            .into_iter()
            .map(|(account, percentage)| Allocation::new(account, percentage))
            .collect::<Result<Vec<_>>>()?;
        Split::new(allocations)
    }

    pub fn allocations(&self) -> &[Allocation] {
        &self.allocations
    }
}

/// The part of an action that can sit underneath a shared overlay.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    Single(String),
    Split(Split),
}

impl Target {
    pub fn single(account: impl Into<String>) -> Self {
        Target::Single(account.into())
    }
}

/// A receivable carved out of the amount before the base target is posted.
///
/// Built through [`Action::shared`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SharedOverlay {
    base: Target,
    receivable: Allocation,
}

impl SharedOverlay {
    pub fn base(&self) -> &Target {
        &self.base
    }

    pub fn receivable(&self) -> &Allocation {
        &self.receivable
    }
}

/// What to do with a matched transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Whole amount to one account
    Single(String),
    /// Amount divided by percentage
    Split(Split),
    /// Receivable share first, remainder through the base target
    Shared(SharedOverlay),
}

impl Action {
    pub fn single(account: impl Into<String>) -> Self {
        Action::Single(account.into())
    }

    pub fn split<S: Into<String>>(pairs: impl IntoIterator<Item = (S, Decimal)>) -> Result<Self> {
        Ok(Action::Split(Split::from_pairs(pairs)?))
    }

    /// Layers a receivable of `percentage` percent to `account` over `base`.
    pub fn shared(base: Target, account: impl Into<String>, percentage: Decimal) -> Result<Self> {
        Ok(Action::Shared(SharedOverlay {
            base,
            receivable: Allocation::new(account, percentage)?,
        }))
    }
}

impl From<Target> for Action {
    fn from(target: Target) -> Self {
        match target {
            Target::Single(account) => Action::Single(account),
            Target::Split(split) => Action::Split(split),
        }
    }
}
