//! # vending-machine
//!
//! Runs one interactive vending machine session on the terminal.
//!
//! ```bash
//! cargo run -p vending-cli -- --seed 42
//! cargo run -p vending-cli -- --output json --log-level debug
//! ```

use std::process::ExitCode;

use vending_cli::error::codes;

fn main() -> ExitCode {
    match vending_cli::run() {
        Ok(()) => ExitCode::from(codes::SUCCESS),
        Err(err) => {
            tracing::error!(error = %err, "vending machine stopped");
            eprintln!("[ERROR] {err}");
            ExitCode::from(err.exit_code())
        }
    }
}
