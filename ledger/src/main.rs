use std::io::{self, BufRead};

use log::{error, info};
use reputation_ledger::{
    blockchain::{CancelToken, Ledger, Submission},
    cli::Arguments,
    logger, LedgerError,
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let (args, config) = Arguments::from_with_config()?;
    let _logger = logger::init_logger(&config.log_level, &config.log_dir, "reputation-ledger")?;

    info!(
        "Ledger started (difficulty {}, ban threshold {})",
        config.difficulty, config.ban_threshold
    );

    let mut ledger = Ledger::from_config(&config);

    for (line_no, line) in io::stdin().lock().lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }

        let cancel = match config.mining_timeout() {
            Some(timeout) => CancelToken::with_deadline(timeout),
            None => CancelToken::never(),
        };

        let result = Submission::from_json(&line)
            .and_then(|submission| ledger.submit(&submission, &cancel).map(|b| b.index()));

        match result {
            Ok(index) => info!("[💰] Added transaction in block {}", index),
            Err(e @ LedgerError::PolicyViolation { .. }) => {
                error!("line {}: {}", line_no + 1, e);
                eprintln!("line {}: access denied: {}", line_no + 1, e);
            }
            Err(e) => {
                error!("line {}: {}", line_no + 1, e);
                eprintln!("line {}: {}", line_no + 1, e);
            }
        }
    }

    ledger.validate()?;

    let snapshot = ledger.snapshot();
    let output = if args.pretty {
        snapshot.to_json_pretty()?
    } else {
        snapshot.to_json()?
    };
    println!("{}", output);

    Ok(())
}
