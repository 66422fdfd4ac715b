//! Beancount text output.

use crate::posting::ClassifiedEntry;
use std::io::{self, Write};

/// Transaction flag written on every entry.
pub const DEFAULT_FLAG: char = '*';

/// Writes one entry, balancing the classified postings against `account_name`.
///
/// ```text
/// 2025-10-24 * "REMA 1000 OSLO, Oslo"
///   type: "DEBIT"
///   Liabilities:CreditCard:DNB  -150.50 NOK
///   Expenses:Groceries  150.50 NOK
/// ```
pub fn write_entry<W: Write>(writer: &mut W, account_name: &str, entry: &ClassifiedEntry) -> io::Result<()> {
    let source = &entry.source;
    let currency = &source.currency;

    writeln!(
        writer,
        "{} {} \"{}\"",
        source.date,
        DEFAULT_FLAG,
        escape(&source.narration)
    )?;
    writeln!(writer, "  type: \"{}\"", source.flow)?;
    writeln!(writer, "  {}  {} {}", account_name, -entry.total(), currency)?;
    for posting in &entry.postings {
        writeln!(writer, "  {}  {} {}", posting.account, posting.amount, currency)?;
    }
    Ok(())
}

/// Writes entries separated by blank lines.
pub fn write_ledger<'a, W, I>(writer: &mut W, account_name: &str, entries: I) -> io::Result<usize>
where
    W: Write,
    I: IntoIterator<Item = &'a ClassifiedEntry>,
{
    let mut written = 0;
    for entry in entries {
        if written > 0 {
            writeln!(writer)?;
        }
        write_entry(writer, account_name, entry)?;
        written += 1;
    }
    Ok(written)
}

fn escape(text: &str) -> String {
    text.replace('\\', "\\\\").replace('"', "\\\"")
}
