//! # Error Types
//!
//! Domain-specific error types for vending-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  vending-core errors (this file)                                       │
//! │  ├── CoreError        - Domain and state-machine errors                │
//! │  └── ValidationError  - Raw text that failed to parse                  │
//! │                                                                         │
//! │  vending-cli errors (separate crate)                                   │
//! │  └── CliError         - Config, I/O, and wrapped CoreError            │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → CliError → exit status            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Recoverable vs. Fatal
//! Almost every error is the customer's or operator's input being rejected.
//! Those are recoverable: the interactive driver prints them and asks again.
//! Only misuse of the session state machine and closed input end the run.
//! See [`CoreError::is_recoverable`].

use thiserror::Error;

use crate::driver::PromptKind;
use crate::money::Money;
use crate::session::Phase;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A product with the same name is already in the catalog.
    #[error("Product already exists: {0}")]
    DuplicateProduct(String),

    /// The named product is not in the catalog.
    #[error("Product not found: {0}")]
    UnknownProduct(String),

    /// The product exists but its stock is zero.
    ///
    /// ## When This Occurs
    /// The selling loop guard only looks at the cheapest *available* price,
    /// so a customer can still type the name of a sold-out product.
    #[error("Product is sold out: {0}")]
    OutOfStock(String),

    /// The chosen product costs more than the remaining balance.
    ///
    /// ## User Workflow
    /// ```text
    /// Balance: 900원, cheapest available: 850원 (loop continues)
    ///      │
    ///      ▼
    /// Customer picks "cola" (1100원)
    ///      │
    ///      ▼
    /// InsufficientFunds { product: "cola", price: 1100원, balance: 900원 }
    ///      │
    ///      ▼
    /// "[ERROR] ..." and ask again
    /// ```
    #[error("Insufficient funds for {product}: price {price}, balance {balance}")]
    InsufficientFunds {
        product: String,
        price: Money,
        balance: Money,
    },

    /// A coin value outside the machine's fixed denomination set.
    #[error("Unknown coin denomination: {0}")]
    UnknownDenomination(i64),

    /// Cash float or inserted money below zero.
    #[error("Amount must not be negative: {0}")]
    NegativeAmount(Money),

    /// Operation not allowed in the current session phase.
    #[error("Cannot {operation} while session is {phase:?}")]
    InvalidPhase {
        operation: &'static str,
        phase: Phase,
    },

    /// A one-time setup step was attempted twice.
    #[error("{0} has already been loaded")]
    AlreadyLoaded(&'static str),

    /// Money was inserted before the machine was fully set up.
    #[error("Session setup incomplete: {0} missing")]
    SetupIncomplete(&'static str),

    /// The prompter ran out of input.
    #[error("Input closed while waiting for {0}")]
    InputClosed(PromptKind),

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

impl CoreError {
    /// Whether the interactive driver should report this error and ask again.
    pub fn is_recoverable(&self) -> bool {
        !matches!(
            self,
            CoreError::InvalidPhase { .. }
                | CoreError::AlreadyLoaded(_)
                | CoreError::SetupIncomplete(_)
                | CoreError::InputClosed(_)
        )
    }
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These errors occur when raw operator/customer text doesn't meet the
/// format rules. Produced by the [`crate::validation`] parsers.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Amount cannot be paid in whole coins.
    #[error("{field} must be a multiple of {unit}")]
    NotMultipleOf { field: String, unit: i64 },

    /// Invalid format (e.g., letters in an amount, missing brackets).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
