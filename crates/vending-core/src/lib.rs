//! # vending-core: Pure Business Logic for the Vending Machine
//!
//! This crate is the **heart** of the vending machine. It contains the coin
//! box, the product catalog and the purchase session state machine, with
//! zero terminal or file I/O.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Vending Machine Architecture                        │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                vending-machine binary (apps/vending-cli)        │   │
//! │  │    clap args ──► config ──► tracing ──► console prompter/reporter│  │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ Prompter / Reporter traits             │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ vending-core (THIS CRATE) ★                     │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   coin    │  │  catalog  │  │  session  │  │ validation│  │   │
//! │  │   │ Inventory │  │  Product  │  │  Phase    │  │  parsers  │  │   │
//! │  │   │ CoinPicker│  │  Catalog  │  │ Settlement│  │           │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                        driver: run_session                      │   │
//! │  │                                                                 │   │
//! │  │   NO STDIN • NO STDOUT • NO GLOBAL RNG                          │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`money`] - Integer won amounts
//! - [`coin`] - Denominations, coin box, seeding and change making
//! - [`catalog`] - Products and stock rules
//! - [`session`] - The Setup → Selling → Settled state machine
//! - [`validation`] - Raw text → typed values
//! - [`driver`] - Prompter/Reporter traits and the interactive flow
//! - [`error`] - Domain error types
//!
//! ## Example Usage
//!
//! ```rust
//! use vending_core::{Coin, Money, Phase, ProductCatalog, PurchaseSession};
//!
//! let mut session = PurchaseSession::new();
//!
//! // Deterministic seeding: always take the smallest eligible coin
//! let mut picker = |eligible: &[Coin]| eligible[eligible.len() - 1];
//! session.load_cash_float(Money::from_won(10_000), &mut picker).unwrap();
//!
//! let mut catalog = ProductCatalog::new();
//! catalog.add("cola", Money::from_won(1100), 5).unwrap();
//! catalog.add("water", Money::from_won(850), 2).unwrap();
//! session.load_catalog(catalog).unwrap();
//!
//! session.insert_money(Money::from_won(2000)).unwrap();
//! session.select("cola").unwrap();
//! session.select("water").unwrap();
//!
//! assert_eq!(session.phase(), Phase::Settled);
//! assert_eq!(session.settlement().unwrap().dispensed, Money::from_won(50));
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod catalog;
pub mod coin;
pub mod driver;
pub mod error;
pub mod money;
pub mod session;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use catalog::{Product, ProductCatalog};
pub use coin::{Coin, CoinCounts, CoinInventory, CoinPicker, RandomPicker};
pub use driver::{run_session, PromptKind, Prompter, Reporter};
pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use session::{Phase, Purchase, PurchaseSession, SessionReceipt, Settlement};

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Largest cash float or inserted amount the parsers accept.
///
/// Seeding picks one coin per loop iteration, so the bound also keeps
/// seeding time reasonable.
pub const MAX_AMOUNT_WON: i64 = 100_000_000;
