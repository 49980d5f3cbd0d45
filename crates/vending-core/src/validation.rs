//! # Validation Module
//!
//! Turns raw operator/customer text into typed values before the session
//! ever sees it.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Prompter (console)                                           │
//! │  └── Reads one raw line                                                │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE                                                  │
//! │  ├── Format: digits only, [name,price,stock] entries                   │
//! │  └── Ranges: multiples of 10, positive prices                          │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Core types                                                   │
//! │  ├── ProductCatalog: unique names                                      │
//! │  └── PurchaseSession: phase rules, affordability, stock                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use vending_core::validation::{parse_amount, parse_catalog};
//!
//! let float = parse_amount("10000", "cash float").unwrap();
//! assert_eq!(float.won(), 10_000);
//!
//! let catalog = parse_catalog("[cola,1100,5];[water,850,2]").unwrap();
//! assert_eq!(catalog.len(), 2);
//! ```

use crate::catalog::{Product, ProductCatalog};
use crate::coin::Coin;
use crate::error::{CoreResult, ValidationError};
use crate::money::Money;
use crate::MAX_AMOUNT_WON;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Longest accepted product name, in characters.
pub const MAX_PRODUCT_NAME_CHARS: usize = 50;

// =============================================================================
// Amounts
// =============================================================================

/// Parses a cash amount (cash float or inserted money).
///
/// ## Rules
/// - Surrounding whitespace is ignored
/// - Digits only (no sign, no separators)
/// - At most `MAX_AMOUNT_WON`
/// - Multiple of the smallest coin (10)
///
/// ## Example
/// ```rust
/// use vending_core::validation::parse_amount;
///
/// assert_eq!(parse_amount(" 2000 ", "money").unwrap().won(), 2000);
/// assert!(parse_amount("2005", "money").is_err());
/// assert!(parse_amount("-100", "money").is_err());
/// assert!(parse_amount("abc", "money").is_err());
/// ```
pub fn parse_amount(raw: &str, field: &str) -> ValidationResult<Money> {
    let amount = parse_whole_number(raw, field, MAX_AMOUNT_WON)?;
    let amount = Money::from_won(amount);
    require_coin_multiple(amount, field)?;
    Ok(amount)
}

/// Parses a product price: like [`parse_amount`] but must be above zero.
pub fn parse_price(raw: &str) -> ValidationResult<Money> {
    let price = parse_amount(raw, "price")?;
    if !price.is_positive() {
        return Err(ValidationError::MustBePositive {
            field: "price".to_string(),
        });
    }
    Ok(price)
}

/// Parses a stock count (zero allowed).
pub fn parse_stock(raw: &str) -> ValidationResult<u32> {
    let stock = parse_whole_number(raw, "stock", i64::from(u32::MAX))?;
    u32::try_from(stock).map_err(|_| ValidationError::OutOfRange {
        field: "stock".to_string(),
        min: 0,
        max: i64::from(u32::MAX),
    })
}

fn parse_whole_number(raw: &str, field: &str, max: i64) -> ValidationResult<i64> {
    let raw = raw.trim();

    if raw.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    if !raw.chars().all(|c| c.is_ascii_digit()) {
        return Err(ValidationError::InvalidFormat {
            field: field.to_string(),
            reason: "must contain only digits".to_string(),
        });
    }

    let out_of_range = || ValidationError::OutOfRange {
        field: field.to_string(),
        min: 0,
        max,
    };
    let value: i64 = raw.parse().map_err(|_| out_of_range())?;
    if value > max {
        return Err(out_of_range());
    }

    Ok(value)
}

fn require_coin_multiple(amount: Money, field: &str) -> ValidationResult<()> {
    let unit = Coin::SMALLEST.value().won();
    if !amount.is_multiple_of(unit) {
        return Err(ValidationError::NotMultipleOf {
            field: field.to_string(),
            unit,
        });
    }
    Ok(())
}

// =============================================================================
// Names
// =============================================================================

/// Validates a product name and returns it trimmed.
///
/// ## Rules
/// - Not empty after trimming
/// - At most `MAX_PRODUCT_NAME_CHARS` characters
pub fn validate_product_name(name: &str) -> ValidationResult<String> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::Required {
            field: "name".to_string(),
        });
    }

    if name.chars().count() > MAX_PRODUCT_NAME_CHARS {
        return Err(ValidationError::TooLong {
            field: "name".to_string(),
            max: MAX_PRODUCT_NAME_CHARS,
        });
    }

    Ok(name.to_string())
}

/// Parses the customer's product selection (a product name).
pub fn parse_selection(raw: &str) -> ValidationResult<String> {
    validate_product_name(raw)
}

// =============================================================================
// Catalog
// =============================================================================

/// Parses a catalog line.
///
/// ## Format
/// ```text
/// [cola,1100,5];[water,850,2];[cider,1000,0]
///  ───┬──────── ─────┬──────
///     │              └── entries separated by ';'
///     └── [name,price,stock], brackets required
/// ```
///
/// ## Errors
/// - `Validation(..)` for any malformed entry
/// - `DuplicateProduct` when a name appears twice
pub fn parse_catalog(raw: &str) -> CoreResult<ProductCatalog> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(ValidationError::Required {
            field: "catalog".to_string(),
        }
        .into());
    }

    let mut catalog = ProductCatalog::new();
    for entry in raw.split(';') {
        catalog.add_product(parse_catalog_entry(entry)?)?;
    }
    Ok(catalog)
}

/// Parses one `[name,price,stock]` entry.
pub fn parse_catalog_entry(raw: &str) -> ValidationResult<Product> {
    let raw = raw.trim();
    let inner = raw
        .strip_prefix('[')
        .and_then(|rest| rest.strip_suffix(']'))
        .ok_or_else(|| ValidationError::InvalidFormat {
            field: "product".to_string(),
            reason: format!("'{raw}' must be wrapped in [ ]"),
        })?;

    let fields: Vec<&str> = inner.split(',').collect();
    let [name, price, stock] = fields.as_slice() else {
        return Err(ValidationError::InvalidFormat {
            field: "product".to_string(),
            reason: format!("'{raw}' must be [name,price,stock]"),
        });
    };

    Ok(Product::new(
        validate_product_name(name)?,
        parse_price(price)?,
        parse_stock(stock)?,
    ))
}

// =============================================================================
// Unit Tests
// =============================================================================
