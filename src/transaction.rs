//! Transaction models: the statement row as read from CSV and the
//! immutable record handed to the classifier.

use crate::error::{ClassifierError, Result};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;
use std::fmt;
use std::str::FromStr;

/// Date formats seen in statement exports.
const DATE_FORMATS: [&str; 2] = ["%Y-%m-%d", "%d.%m.%Y"];

/// A single transaction ready for classification.
///
/// Amount sign convention: positive is an outflow (a purchase charged to the
/// card), negative is an inflow (payment or refund).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionRecord {
    /// Booking date
    pub date: NaiveDate,

    /// Free-text description from the statement
    pub narration: String,

    /// Signed amount, see the sign convention above
    pub amount: Decimal,

    /// Currency code of `amount`
    pub currency: String,

    /// 1-based row in the source statement, if read from one
    pub row: Option<usize>,

    /// Statement column the amount came from
    pub flow: Flow,
}

impl TransactionRecord {
    /// Creates a record whose flow follows the sign of `amount`: negative is
    /// a credit, zero or positive a debit.
    pub fn new(
        date: NaiveDate,
        narration: impl Into<String>,
        amount: Decimal,
        currency: impl Into<String>,
    ) -> Self {
        TransactionRecord {
            date,
            narration: narration.into(),
            amount,
            currency: currency.into(),
            row: None,
            flow: if amount.is_sign_negative() && !amount.is_zero() {
                Flow::Credit
            } else {
                Flow::Debit
            },
        }
    }

    /// Attaches the source row number.
    pub fn with_row(mut self, row: usize) -> Self {
        self.row = Some(row);
        self
    }

    /// Overrides the flow, for records whose source column is known.
    pub fn with_flow(mut self, flow: Flow) -> Self {
        self.flow = flow;
        self
    }
}

/// Whether a record moved money onto the card (credit) or off it (debit).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Credit,
    Debit,
}

impl fmt::Display for Flow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Flow::Credit => write!(f, "CREDIT"),
            Flow::Debit => write!(f, "DEBIT"),
        }
    }
}

/// Raw statement row as read from CSV.
///
/// Every column is optional; exports routinely leave cells blank.
#[derive(Debug, Default, Deserialize)]
pub struct StatementRow {
    #[serde(rename = "Dato")]
    pub date: Option<String>,

    #[serde(rename = "Beløpet gjelder")]
    pub narration: Option<String>,

    /// Foreign currency column, ignored
    #[serde(rename = "Valuta")]
    pub foreign_currency: Option<String>,

    /// Exchange rate column, ignored
    #[serde(rename = "Kurs")]
    pub exchange_rate: Option<String>,

    /// Inflow
    #[serde(rename = "Inn")]
    pub credit: Option<String>,

    /// Outflow
    #[serde(rename = "Ut")]
    pub debit: Option<String>,
}

/// What a statement row turned into.
#[derive(Debug, PartialEq, Eq)]
pub enum RowOutcome {
    Record(TransactionRecord),
    Blank,
    MissingDate,
    MissingAmount,
}

impl StatementRow {
    /// Parses the raw row into a record.
    ///
    /// Rows that are structurally incomplete come back as a non-`Record`
    /// outcome; cells that are present but malformed are an error.
    pub fn parse(&self, row: usize, currency: &str) -> Result<RowOutcome> {
        let date = non_empty(&self.date);
        let narration = non_empty(&self.narration);

        if date.is_none() && narration.is_none() {
            return Ok(RowOutcome::Blank);
        }

        let date = match date {
            Some(d) => parse_date(d).ok_or_else(|| ClassifierError::InvalidRecord {
                row,
                message: format!("unrecognized date '{}'", d),
            })?,
            None => return Ok(RowOutcome::MissingDate),
        };

        let credit = parse_cell(&self.credit, row)?;
        let debit = parse_cell(&self.debit, row)?;

        let (amount, flow) = match (credit, debit) {
            (Some(inflow), _) => (-inflow, Flow::Credit),
            (None, Some(outflow)) => (outflow, Flow::Debit),
            (None, None) => return Ok(RowOutcome::MissingAmount),
        };

        Ok(RowOutcome::Record(
            TransactionRecord::new(date, narration.unwrap_or_default(), amount, currency)
                .with_row(row)
                .with_flow(flow),
        ))
    }
}

fn non_empty(cell: &Option<String>) -> Option<&str> {
    cell.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

fn parse_date(value: &str) -> Option<NaiveDate> {
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(value, fmt).ok())
}

fn parse_cell(cell: &Option<String>, row: usize) -> Result<Option<Decimal>> {
    match non_empty(cell) {
        Some(raw) => parse_norwegian_number(raw)
            .map(Some)
            .ok_or_else(|| ClassifierError::InvalidRecord {
                row,
                message: format!("unparsable amount '{}'", raw),
            }),
        None => Ok(None),
    }
}

/// Parses a number that may use a decimal comma and space thousand separators.
pub fn parse_norwegian_number(value: &str) -> Option<Decimal> {
    let cleaned: String = value
        .trim()
        .chars()
        .filter(|c| !matches!(c, ' ' | '\u{a0}'))
        .map(|c| if c == ',' { '.' } else { c })
        .collect();
    if cleaned.is_empty() {
        return None;
    }
    Decimal::from_str(&cleaned).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(date: Option<&str>, narration: Option<&str>, inn: Option<&str>, ut: Option<&str>) -> StatementRow {
        StatementRow {
            date: date.map(String::from),
            narration: narration.map(String::from),
            credit: inn.map(String::from),
            debit: ut.map(String::from),
            ..Default::default()
        }
    }

    fn record(outcome: RowOutcome) -> TransactionRecord {
        match outcome {
            RowOutcome::Record(r) => r,
            other => panic!("Expected Record, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_debit_is_positive() {
        let raw = row(Some("2025-10-24"), Some("REMA 1000 OSLO, Oslo"), None, Some("150,50"));
        let rec = record(raw.parse(2, "NOK").unwrap());

        assert_eq!(rec.date, NaiveDate::from_ymd_opt(2025, 10, 24).unwrap());
        assert_eq!(rec.narration, "REMA 1000 OSLO, Oslo");
        assert_eq!(rec.amount, Decimal::from_str("150.50").unwrap());
        assert_eq!(rec.currency, "NOK");
        assert_eq!(rec.row, Some(2));
        assert_eq!(rec.flow, Flow::Debit);
    }

    #[test]
    fn test_parse_credit_is_negative() {
        let raw = row(Some("25.10.2025"), Some("Innbetaling"), Some("5000"), None);
        let rec = record(raw.parse(3, "NOK").unwrap());

        assert_eq!(rec.amount, Decimal::from_str("-5000").unwrap());
        assert_eq!(rec.flow, Flow::Credit);
    }

    #[test]
    fn test_zero_inflow_stays_credit() {
        let raw = row(Some("2025-10-25"), Some("Refusjon"), Some("0,00"), None);
        let rec = record(raw.parse(4, "NOK").unwrap());

        assert!(rec.amount.is_zero());
        assert_eq!(rec.flow, Flow::Credit);

        let raw = row(Some("2025-10-25"), Some("Gebyr"), None, Some("0"));
        assert_eq!(record(raw.parse(5, "NOK").unwrap()).flow, Flow::Debit);
    }

    #[test]
    fn test_new_derives_flow_from_sign() {
        let date = NaiveDate::from_ymd_opt(2025, 10, 24).unwrap();
        let flow = |amount: &str| TransactionRecord::new(date, "X", Decimal::from_str(amount).unwrap(), "NOK").flow;
        assert_eq!(flow("-1"), Flow::Credit);
        assert_eq!(flow("0"), Flow::Debit);
        assert_eq!(flow("1"), Flow::Debit);
    }

    #[test]
    fn test_parse_incomplete_rows() {
        assert_eq!(row(None, None, None, Some("1")).parse(2, "NOK").unwrap(), RowOutcome::Blank);
        assert_eq!(
            row(None, Some("NO DATE"), None, Some("50")).parse(2, "NOK").unwrap(),
            RowOutcome::MissingDate
        );
        assert_eq!(
            row(Some("2025-10-24"), Some("NO AMOUNT"), None, None).parse(2, "NOK").unwrap(),
            RowOutcome::MissingAmount
        );
    }

    #[test]
    fn test_parse_rejects_malformed_cells() {
        let bad_date = row(Some("yesterday"), Some("X"), None, Some("1"));
        assert!(matches!(
            bad_date.parse(4, "NOK"),
            Err(ClassifierError::InvalidRecord { row: 4, .. })
        ));

        let bad_amount = row(Some("2025-10-24"), Some("X"), None, Some("12x"));
        assert!(bad_amount.parse(5, "NOK").is_err());
    }

    #[test]
    fn test_norwegian_numbers() {
        assert_eq!(parse_norwegian_number("1 234,56"), Decimal::from_str("1234.56").ok());
        assert_eq!(parse_norwegian_number("99.9"), Decimal::from_str("99.9").ok());
        assert_eq!(parse_norwegian_number("  "), None);
        assert_eq!(parse_norwegian_number("abc"), None);
    }
}
