//! Ledger Classifier CLI
//!
//! Reads a card statement CSV, classifies each transaction with the rules
//! from a JSON config and prints Beancount entries.
//!
//! # Usage
//!
//! ```bash
//! cargo run -- config.json statement.csv > import.beancount
//! ```
//!
//! # Environment Variables
//!
//! - `RUST_LOG`: Set to `debug` or `warn` to control logging verbosity

use ledger_classifier::{ClassifierError, Config, Importer, Result};
use std::env;
use std::fs::File;
use std::io::{self, BufReader};
use std::process;

fn main() {
    env_logger::init();

    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn run() -> Result<()> {
    let args: Vec<String> = env::args().collect();
    if args.len() < 3 {
        return Err(ClassifierError::MissingArgument);
    }

    let config = Config::from_path(&args[1])?;
    let file = File::open(&args[2])?;
    let reader = BufReader::new(file);

    let importer = Importer::new(config);
    let extraction = importer.extract(reader)?;

    let stdout = io::stdout();
    let handle = stdout.lock();
    importer.write_output(&extraction, handle)?;

    Ok(())
}
