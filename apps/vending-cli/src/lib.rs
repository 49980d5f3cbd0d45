//! # Vending Machine Console
//!
//! Library half of the `vending-machine` binary.
//!
//! ## Module Organization
//! ```text
//! vending_cli/
//! ├── lib.rs          ◄─── You are here (startup & run)
//! ├── config.rs       ◄─── Args (clap) + env configuration
//! ├── console.rs      ◄─── stdin/stdout Prompter and Reporter
//! └── error.rs        ◄─── CliError and exit codes
//! ```
//!
//! ## Startup Sequence
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  1. Parse Args ──────────► clap                                         │
//! │  2. Load Config ─────────► VENDING_* env, then flags                    │
//! │  3. Initialize Logging ──► tracing-subscriber, EnvFilter, stderr        │
//! │  4. Build Coin Picker ───► StdRng from --seed or OS entropy             │
//! │  5. Run Session ─────────► vending_core::run_session(console, console)  │
//! │  6. Print JSON receipt ──► only with --output json                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod config;
pub mod console;
pub mod error;

use std::io::{self, BufRead, Write};

use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;
use vending_core::{run_session, RandomPicker, SessionReceipt};

use config::{Args, CliConfig, OutputFormat};
use console::{ConsolePrompter, ConsoleReporter};
use error::CliError;

/// Runs the binary: args, config, logging, one session on stdin/stdout.
pub fn run() -> Result<(), CliError> {
    let args = Args::parse();
    let config = CliConfig::load()?.with_args(&args);

    init_tracing(&config.log_filter);
    info!(?config, "configuration loaded");

    let stdin = io::stdin();
    run_with(&config, stdin.lock(), io::stdout(), io::stdout())?;
    Ok(())
}

/// Runs one session with explicit streams.
///
/// Prompts go to `prompt_out`, session output (and the JSON receipt) to
/// `report_out`.
pub fn run_with<R, P, W>(
    config: &CliConfig,
    input: R,
    prompt_out: P,
    report_out: W,
) -> Result<SessionReceipt, CliError>
where
    R: BufRead,
    P: Write,
    W: Write,
{
    let mut picker = match config.rng_seed {
        Some(seed) => RandomPicker::from_seed(seed),
        None => RandomPicker::from_entropy(),
    };
    let mut prompter = ConsolePrompter::new(input, prompt_out);
    let mut reporter = ConsoleReporter::new(report_out);

    let receipt = run_session(&mut prompter, &mut reporter, &mut picker)?;
    let mut out = reporter.finish()?;

    if config.output == OutputFormat::Json {
        serde_json::to_writer_pretty(&mut out, &receipt)?;
        writeln!(out)?;
        out.flush()?;
    }

    info!(session = %receipt.session_id, purchases = receipt.purchases.len(), "session finished");
    Ok(receipt)
}

/// Initializes the tracing subscriber for structured logging.
///
/// ## Log Levels
/// - `--log-level debug` or `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=vending_core=trace` - Trace the core crate only
/// - Default: errors only (stderr shares the terminal with the console)
fn init_tracing(filter: &str) {
    let filter = EnvFilter::try_new(filter)
        .unwrap_or_else(|_| EnvFilter::new(config::DEFAULT_LOG_FILTER));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(true)
        .init();
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;
    use vending_core::{CoreError, Money, Phase};

    const SCRIPT: &str = "\
10000
[cola,1100,5];[water,850,2]
2000
cola
cola
water
";

    fn seeded(seed: u64, output: OutputFormat) -> CliConfig {
        CliConfig {
            rng_seed: Some(seed),
            output,
            ..CliConfig::default()
        }
    }

    fn run_script(config: &CliConfig, script: &str) -> (Result<SessionReceipt, CliError>, String) {
        let mut prompts = Vec::new();
        let mut report = Vec::new();
        let result = run_with(config, Cursor::new(script.to_string()), &mut prompts, &mut report);
        (result, String::from_utf8(report).unwrap())
    }

    #[test]
    fn test_scripted_session() {
        let (result, report) = run_script(&seeded(42, OutputFormat::Text), SCRIPT);
        let receipt = result.unwrap();

        assert_eq!(receipt.phase, Phase::Settled);
        assert_eq!(receipt.balance, Money::from_won(50));
        assert_eq!(receipt.purchases.len(), 2);

        assert!(report.contains("자판기가 보유한 동전"));
        assert!(report.contains("투입 금액: 2000원"));
        assert!(report.contains("[ERROR] Insufficient funds for cola"));
        assert!(report.contains("water 구매 완료 (850원)"));
        assert!(report.trim_end().contains("투입 금액: 50원\n잔돈"));
    }

    #[test]
    fn test_same_seed_same_output() {
        let (_, first) = run_script(&seeded(7, OutputFormat::Text), SCRIPT);
        let (_, second) = run_script(&seeded(7, OutputFormat::Text), SCRIPT);
        assert_eq!(first, second);
    }

    #[test]
    fn test_json_receipt_is_appended() {
        let (result, report) = run_script(&seeded(1, OutputFormat::Json), SCRIPT);
        let receipt = result.unwrap();

        let json_start = report.find('{').unwrap();
        let json: serde_json::Value = serde_json::from_str(&report[json_start..]).unwrap();
        assert_eq!(json["session_id"], receipt.session_id.to_string());
        assert_eq!(json["balance"], 50);
        assert_eq!(json["phase"], "settled");
    }

    #[test]
    fn test_truncated_input() {
        let (result, _) = run_script(&seeded(1, OutputFormat::Text), "10000\n");
        let err = result.unwrap_err();
        assert!(matches!(err, CliError::Session(CoreError::InputClosed(_))));
        assert_eq!(err.exit_code(), error::codes::INPUT_CLOSED);
    }
}
