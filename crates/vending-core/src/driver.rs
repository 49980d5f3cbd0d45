//! # Interactive Driver
//!
//! Runs a whole session against a [`Prompter`] (raw text in) and a
//! [`Reporter`] (results out). The core never touches a terminal itself;
//! the console binary supplies both ends.
//!
//! ## Session Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    run_session                                          │
//! │                                                                         │
//! │  ask CashFloat ──► parse_amount ──► load_cash_float ──► report coins   │
//! │       ▲  │ error                                                        │
//! │       └──┘ report + ask again                                           │
//! │                                                                         │
//! │  ask Catalog ────► parse_catalog ─► load_catalog       (same retry)    │
//! │                                                                         │
//! │  ask InsertedMoney ► parse_amount ► insert_money       (same retry)    │
//! │                                                                         │
//! │  while Selling:                                                         │
//! │      report balance                                                     │
//! │      ask Selection ► select ──► report purchase / report error         │
//! │                                                                         │
//! │  report settlement                                                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Only unrecoverable errors (closed input, state-machine misuse) end the
//! run early; everything else is reported and asked again.

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::coin::{CoinCounts, CoinPicker};
use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::session::{Phase, Purchase, PurchaseSession, SessionReceipt, Settlement};
use crate::validation::{parse_amount, parse_catalog, parse_selection};

// =============================================================================
// Collaborator Traits
// =============================================================================

/// What the driver is asking for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PromptKind {
    CashFloat,
    Catalog,
    InsertedMoney,
    Selection,
}

impl fmt::Display for PromptKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            PromptKind::CashFloat => "cash float",
            PromptKind::Catalog => "product catalog",
            PromptKind::InsertedMoney => "inserted money",
            PromptKind::Selection => "product selection",
        };
        f.write_str(label)
    }
}

/// Supplies raw text for each prompt.
pub trait Prompter {
    /// `None` means no more input will ever arrive.
    fn ask(&mut self, kind: PromptKind) -> Option<String>;
}

/// Receives everything the session has to say.
///
/// All arguments are shared references or copies; a reporter can never
/// mutate live session state.
pub trait Reporter {
    /// Coin box right after seeding.
    fn coin_box(&mut self, coins: &CoinCounts);

    /// Remaining balance, before each selection prompt.
    fn balance(&mut self, balance: Money);

    /// A completed sale.
    fn purchased(&mut self, purchase: &Purchase);

    /// Input that was rejected; the driver will ask again.
    fn rejected(&mut self, kind: PromptKind, error: &CoreError);

    /// Final balance and change.
    fn settled(&mut self, balance: Money, settlement: &Settlement);
}

// =============================================================================
// Driver
// =============================================================================

/// Runs one complete session and returns its receipt.
///
/// ## Errors
/// - `InputClosed` when the prompter runs dry
/// - any non-recoverable [`CoreError`]
pub fn run_session<P, R, K>(
    prompter: &mut P,
    reporter: &mut R,
    picker: &mut K,
) -> CoreResult<SessionReceipt>
where
    P: Prompter,
    R: Reporter,
    K: CoinPicker,
{
    let mut session = PurchaseSession::new();

    ask_until_accepted(prompter, reporter, PromptKind::CashFloat, |raw| {
        let amount = parse_amount(raw, "cash float")?;
        session.load_cash_float(amount, &mut *picker).map(|_| ())
    })?;
    reporter.coin_box(session.coins().counts());

    ask_until_accepted(prompter, reporter, PromptKind::Catalog, |raw| {
        session.load_catalog(parse_catalog(raw)?)
    })?;

    ask_until_accepted(prompter, reporter, PromptKind::InsertedMoney, |raw| {
        let amount = parse_amount(raw, "inserted money")?;
        session.insert_money(amount).map(|_| ())
    })?;

    while session.phase() == Phase::Selling {
        reporter.balance(session.balance());
        let purchase = ask_until_accepted(prompter, reporter, PromptKind::Selection, |raw| {
            let name = parse_selection(raw)?;
            session.select(&name)
        })?;
        reporter.purchased(&purchase);
    }

    match session.settlement() {
        Some(settlement) => reporter.settled(session.balance(), settlement),
        None => {
            return Err(CoreError::InvalidPhase {
                operation: "report settlement",
                phase: session.phase(),
            })
        }
    }

    Ok(session.receipt())
}

/// Asks `kind` until `accept` succeeds or fails unrecoverably.
fn ask_until_accepted<P, R, T, F>(
    prompter: &mut P,
    reporter: &mut R,
    kind: PromptKind,
    mut accept: F,
) -> CoreResult<T>
where
    P: Prompter,
    R: Reporter,
    F: FnMut(&str) -> CoreResult<T>,
{
    loop {
        let raw = prompter.ask(kind).ok_or(CoreError::InputClosed(kind))?;
        match accept(&raw) {
            Ok(value) => return Ok(value),
            Err(err) if err.is_recoverable() => {
                warn!(prompt = %kind, error = %err, "input rejected");
                reporter.rejected(kind, &err);
            }
            Err(err) => return Err(err),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
