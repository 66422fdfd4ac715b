//! Statement import: read, classify, write.
//!
//! Ties the statement reader, the classification pipeline and the ledger
//! writer together for one configured card account.

use crate::config::Config;
use crate::error::Result;
use crate::ledger::write_ledger;
use crate::pipeline::run;
use crate::posting::ClassifiedEntry;
use crate::statement::{latest_date, read_statement};
use chrono::NaiveDate;
use log::{info, warn};
use std::io::{Read, Write};

/// Result of classifying one statement.
#[derive(Debug, Default)]
pub struct Extraction {
    /// Classified entries in statement order
    pub entries: Vec<ClassifiedEntry>,

    /// Records that reached the classifier but could not be posted
    pub rejected: usize,

    /// Latest booking date on the statement, skipped records included
    pub latest_date: Option<NaiveDate>,
}

/// Importer for one card account.
pub struct Importer {
    config: Config,
}

impl Importer {
    pub fn new(config: Config) -> Self {
        Importer { config }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Reads a statement and classifies every transaction on it.
    ///
    /// Records the classifier rejects are logged at warn level and counted.
    pub fn extract<R: Read>(&self, reader: R) -> Result<Extraction> {
        let records = read_statement(reader, &self.config.currency)?;
        let latest_date = latest_date(&records);
        let total = records.len();

        let mut extraction = Extraction {
            latest_date,
            ..Default::default()
        };
        for result in run(&self.config, records) {
            match result {
                Ok(entry) => extraction.entries.push(entry),
                Err(e) => {
                    warn!("Rejected transaction: {}", e);
                    extraction.rejected += 1;
                }
            }
        }

        info!(
            "Classified {} of {} transactions ({} rejected)",
            extraction.entries.len(),
            total,
            extraction.rejected
        );
        Ok(extraction)
    }

    /// Writes the entries as Beancount text.
    pub fn write_output<W: Write>(&self, extraction: &Extraction, mut writer: W) -> Result<()> {
        if let Some(date) = extraction.latest_date {
            writeln!(writer, ";; {} statement through {}", self.config.account_name, date)?;
            writeln!(writer)?;
        }
        write_ledger(&mut writer, &self.config.account_name, &extraction.entries)?;
        writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigFile;
    use std::io::Cursor;

    const CONFIG: &str = r#"{
        "account_name": "Liabilities:CreditCard:DNB",
        "transaction_patterns": [
            {"narration": "REMA", "account": "Expenses:Groceries"},
            {"narration": "SPOTIFY", "account": "Expenses:Entertainment:Music"}
        ]
    }"#;

    const STATEMENT: &str = "Dato,Beløpet gjelder,Valuta,Kurs,Inn,Ut\n\
        2025-11-10,Skyldig beløp fra forrige faktura,,,,5000\n\
        2025-10-25,Innbetaling,,,5000,\n\
        2025-10-24,\"REMA 1000 OSLO, Oslo\",,,,\"150,50\"\n\
        2025-10-26,SPOTIFY,,,,\"119,005\"\n";

    fn importer() -> Importer {
        Importer::new(ConfigFile::from_reader(CONFIG.as_bytes()).unwrap().build().unwrap())
    }

    #[test]
    fn test_extract() {
        let extraction = importer().extract(Cursor::new(STATEMENT)).unwrap();

        assert_eq!(extraction.entries.len(), 2);
        assert_eq!(extraction.rejected, 1);
        assert_eq!(extraction.latest_date, NaiveDate::from_ymd_opt(2025, 11, 10));

        let payment = &extraction.entries[0];
        assert_eq!(payment.source.narration, "Innbetaling");
        assert_eq!(payment.postings[0].account, "Expenses:Uncategorized");
        assert_eq!(payment.postings[0].amount.to_string(), "-5000.00");

        let rema = &extraction.entries[1];
        assert_eq!(rema.postings[0].account, "Expenses:Groceries");
    }

    #[test]
    fn test_write_output() {
        let importer = importer();
        let extraction = importer.extract(Cursor::new(STATEMENT)).unwrap();
        let mut output = Vec::new();
        importer.write_output(&extraction, &mut output).unwrap();

        let output = String::from_utf8(output).unwrap();
        assert!(output.starts_with(";; Liabilities:CreditCard:DNB statement through 2025-11-10\n\n"));
        assert!(output.contains("2025-10-24 * \"REMA 1000 OSLO, Oslo\""));
        assert!(output.contains("  Expenses:Groceries  150.50 NOK"));
        assert!(!output.contains("forrige faktura"));
    }

    #[test]
    fn test_empty_statement_writes_nothing() {
        let importer = importer();
        let extraction = importer
            .extract(Cursor::new("Dato,Beløpet gjelder,Valuta,Kurs,Inn,Ut\n"))
            .unwrap();
        let mut output = Vec::new();
        importer.write_output(&extraction, &mut output).unwrap();
        assert!(output.is_empty());
    }
}
