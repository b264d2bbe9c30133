//! Batch driver
//!
//! Reads commands line-by-line from stdin, applies them in order, and
//! prints all trade lines followed by the outstanding report. The batch
//! aborts on the first invalid command.

use std::io::{self, BufRead, Write};

use matching_engine::{report, MatchingEngine};

fn main() -> Result<(), anyhow::Error> {
    tracing_subscriber::fmt::init();

    let mut engine = MatchingEngine::new();
    for line in io::stdin().lock().lines() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        engine.apply_text(line)?;
    }

    let stdout = io::stdout();
    let mut out = stdout.lock();
    for line in report::trade_lines(&engine) {
        writeln!(out, "{line}")?;
    }
    for line in report::render_outstanding(&engine) {
        writeln!(out, "{line}")?;
    }

    Ok(())
}
