//! Error types for the classifier.

use rust_decimal::Decimal;
use thiserror::Error;

/// Result type alias for classifier operations
pub type Result<T> = std::result::Result<T, ClassifierError>;

/// Errors that can occur while building or running a classifier.
#[derive(Error, Debug)]
pub enum ClassifierError {
    /// Failed to open or read an input file
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV parsing error
    #[error("CSV parsing error: {0}")]
    Csv(#[from] csv::Error),

    /// Configuration file is not valid JSON for the expected shape
    #[error("Configuration error: {0}")]
    Json(#[from] serde_json::Error),

    /// A regex pattern failed to compile
    #[error("Invalid regex pattern '{pattern}': {source}")]
    InvalidRegex {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    /// An allocation percentage outside (0, 100]
    #[error("Invalid percentage {percentage} for account {account}")]
    InvalidPercentage { account: String, percentage: Decimal },

    /// Split percentages do not add up to 100
    #[error("Split percentages sum to {total}, expected 100")]
    SplitSum { total: Decimal },

    /// A split was declared without any allocations
    #[error("Split has no allocations")]
    EmptyAllocations,

    /// A configured pattern could not be turned into a rule
    #[error("Invalid rule at index {index}: {message}")]
    InvalidRule { index: usize, message: String },

    /// The fallback action for unmatched transactions is misconfigured
    #[error("Invalid default action: {0}")]
    InvalidDefault(String),

    /// An amount that cannot be posted as a two-decimal monetary value
    #[error("Invalid amount {amount}: {reason}")]
    InvalidAmount { amount: Decimal, reason: String },

    /// A statement row that could not be turned into a transaction
    #[error("Invalid record at row {row}: {message}")]
    InvalidRecord { row: usize, message: String },

    /// The statement header does not look like a card statement export
    #[error("Unrecognized statement header: {found}")]
    InvalidHeader { found: String },

    /// Missing command line arguments
    #[error("Missing arguments. Usage: ledger-classifier <config.json> <statement.csv>")]
    MissingArgument,
}
