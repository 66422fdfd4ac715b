//! Card statement reader.
//!
//! Reads the CSV export of a card statement into [`TransactionRecord`]s.
//! Rows that can't become a transaction are logged and skipped; only an
//! unreadable file or a foreign header aborts the read.

use crate::error::{ClassifierError, Result};
use crate::transaction::{RowOutcome, StatementRow, TransactionRecord};
use chrono::NaiveDate;
use csv::{ReaderBuilder, Trim};
use log::{debug, warn};
use std::io::Read;

/// Header row of a statement export.
pub const EXPECTED_HEADERS: [&str; 6] = ["Dato", "Beløpet gjelder", "Valuta", "Kurs", "Inn", "Ut"];

/// Reads all transactions from a statement.
pub fn read_statement<R: Read>(reader: R, currency: &str) -> Result<Vec<TransactionRecord>> {
    let mut csv_reader = ReaderBuilder::new()
        .trim(Trim::All)
        .flexible(true)
        .from_reader(reader);

    let headers = csv_reader.headers()?.clone();
    if !headers.iter().eq(EXPECTED_HEADERS.iter().copied()) {
        return Err(ClassifierError::InvalidHeader {
            found: headers.iter().collect::<Vec<_>>().join(","),
        });
    }

    let mut records = Vec::new();
    for (row_idx, result) in csv_reader.deserialize::<StatementRow>().enumerate() {
        let row_num = row_idx + 2; // 1-indexed, accounting for header row

        let raw = match result {
            Ok(raw) => raw,
            Err(e) => {
                warn!("Row {}: CSV parse error: {}", row_num, e);
                continue;
            }
        };

        match raw.parse(row_num, currency) {
            Ok(RowOutcome::Record(record)) => records.push(record),
            Ok(RowOutcome::Blank) => {}
            Ok(RowOutcome::MissingDate) => debug!("Row {}: Skipping transaction, missing date", row_num),
            Ok(RowOutcome::MissingAmount) => {
                debug!("Row {}: Skipping transaction, no amount", row_num)
            }
            Err(e) => warn!("{}", e),
        }
    }

    debug!("Read {} transactions from statement", records.len());
    Ok(records)
}

/// Latest booking date among `records`, if any.
pub fn latest_date(records: &[TransactionRecord]) -> Option<NaiveDate> {
    records.iter().map(|r| r.date).max()
}
