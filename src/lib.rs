//! # Ledger Classifier
//!
//! Classifies card statement transactions into destination accounts with an
//! ordered table of declarative rules, then generates balanced postings,
//! including percentage splits and shared-expense receivables.
//!
//! ## Design Principles
//!
//! - **Fixed-point arithmetic**: 2 decimal places via `rust_decimal`, no floats
//! - **First match wins**: rules are evaluated in declaration order with a
//!   mandatory fallback action
//! - **Strict invariants**: an entry's postings sum exactly to its amount;
//!   the last split allocation absorbs rounding
//! - **Fail early**: bad regexes and percentage sums are rejected when the
//!   rule table is built, never while classifying
//!
//! ## Example
//!
//! ```
//! use chrono::NaiveDate;
//! use ledger_classifier::{run, Action, Config, Predicate, Rule, RuleTable, TransactionRecord};
//! use rust_decimal::Decimal;
//!
//! let table = RuleTable::new(
//!     vec![Rule::new(Predicate::regex(r"REMA\s*1000").unwrap(), Action::single("Expenses:Groceries"))],
//!     Action::single("Expenses:Uncategorized"),
//! );
//! let config = Config::new("Liabilities:CreditCard:DNB", "NOK", table);
//! let record = TransactionRecord::new(
//!     NaiveDate::from_ymd_opt(2025, 10, 24).unwrap(),
//!     "REMA 1000 OSLO",
//!     Decimal::new(15050, 2),
//!     "NOK",
//! );
//!
//! let entry = run(&config, vec![record]).next().unwrap().unwrap();
//! assert_eq!(entry.postings[0].account, "Expenses:Groceries");
//! assert_eq!(entry.postings[0].amount.to_string(), "150.50");
//! ```

pub mod action;
pub mod config;
pub mod error;
pub mod importer;
pub mod ledger;
pub mod money;
pub mod pipeline;
pub mod posting;
pub mod predicate;
pub mod rules;
pub mod statement;
pub mod transaction;

pub use action::{Action, Allocation, SharedOverlay, Split, Target};
pub use config::{Config, ConfigFile};
pub use error::{ClassifierError, Result};
pub use importer::{Extraction, Importer};
pub use money::Money;
pub use pipeline::{classify_record, run, skip_reason, SkipReason};
pub use posting::{generate, ClassifiedEntry, Posting};
pub use predicate::{AmountCompare, Predicate, TextMatch};
pub use rules::{Rule, RuleTable};
pub use transaction::{Flow, TransactionRecord};
