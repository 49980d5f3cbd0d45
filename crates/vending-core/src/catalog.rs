//! # Product Catalog
//!
//! The products loaded into the machine, keyed by name.
//!
//! ## Operations
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Catalog Operations                                   │
//! │                                                                         │
//! │  Setup (operator)              Selling (customer)                      │
//! │  ────────────────              ──────────────────                      │
//! │  add(name, price, stock)       price_of(name)                          │
//! │  remove(name)                  sell(name)  → stock - 1, price          │
//! │                                                                         │
//! │  Loop guard (session)                                                  │
//! │  ────────────────────                                                  │
//! │  has_available_product()                                               │
//! │  cheapest_available_price()                                            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every failing operation leaves the catalog untouched.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::money::Money;

// =============================================================================
// Product
// =============================================================================

/// A product slot in the machine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    /// Display name, also the selection key.
    pub name: String,

    /// Price per unit.
    pub price: Money,

    /// Units left in the slot.
    pub stock: u32,
}

impl Product {
    pub fn new(name: impl Into<String>, price: Money, stock: u32) -> Self {
        Product {
            name: name.into(),
            price,
            stock,
        }
    }

    /// A product is available while at least one unit is left.
    #[inline]
    pub fn is_available(&self) -> bool {
        self.stock > 0
    }
}

// =============================================================================
// Product Catalog
// =============================================================================

/// Name → product mapping.
///
/// ## Invariants
/// - Names are unique (enforced by [`add`](Self::add))
/// - Stock never goes below zero (enforced by [`sell`](Self::sell))
///
/// Backed by a `BTreeMap` so listings come out sorted by name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductCatalog {
    products: BTreeMap<String, Product>,
}

impl ProductCatalog {
    pub fn new() -> Self {
        ProductCatalog::default()
    }

    /// Adds a product.
    ///
    /// ## Errors
    /// - `Validation(Required)` if the name is empty
    /// - `DuplicateProduct` if the name is already present
    ///
    /// ## Example
    /// ```rust
    /// use vending_core::catalog::ProductCatalog;
    /// use vending_core::money::Money;
    /// use vending_core::CoreError;
    ///
    /// let mut catalog = ProductCatalog::new();
    /// catalog.add("cola", Money::from_won(1100), 5).unwrap();
    ///
    /// let err = catalog.add("cola", Money::from_won(1100), 5).unwrap_err();
    /// assert!(matches!(err, CoreError::DuplicateProduct(_)));
    /// assert_eq!(catalog.len(), 1);
    /// ```
    pub fn add(&mut self, name: impl Into<String>, price: Money, stock: u32) -> CoreResult<()> {
        self.add_product(Product::new(name, price, stock))
    }

    /// Adds an already built product. Same rules as [`add`](Self::add).
    pub fn add_product(&mut self, product: Product) -> CoreResult<()> {
        if product.name.is_empty() {
            return Err(ValidationError::Required {
                field: "name".to_string(),
            }
            .into());
        }
        if self.products.contains_key(&product.name) {
            return Err(CoreError::DuplicateProduct(product.name));
        }

        debug!(product = %product.name, price = %product.price, stock = product.stock, "product added");
        self.products.insert(product.name.clone(), product);
        Ok(())
    }

    /// Removes a product and returns it.
    pub fn remove(&mut self, name: &str) -> CoreResult<Product> {
        self.products
            .remove(name)
            .ok_or_else(|| CoreError::UnknownProduct(name.to_string()))
    }

    /// Sells one unit and returns its price.
    ///
    /// ## Flow
    /// ```text
    /// sell("cola")
    ///      │
    ///      ├── not in catalog? → UnknownProduct (no change)
    ///      │
    ///      ├── stock == 0?     → OutOfStock (no change)
    ///      │
    ///      └── stock -= 1      → Ok(price)
    /// ```
    pub fn sell(&mut self, name: &str) -> CoreResult<Money> {
        let product = self
            .products
            .get_mut(name)
            .ok_or_else(|| CoreError::UnknownProduct(name.to_string()))?;

        if !product.is_available() {
            return Err(CoreError::OutOfStock(name.to_string()));
        }

        product.stock -= 1;
        Ok(product.price)
    }

    /// Price of a product.
    pub fn price_of(&self, name: &str) -> CoreResult<Money> {
        self.get(name)
            .map(|product| product.price)
            .ok_or_else(|| CoreError::UnknownProduct(name.to_string()))
    }

    /// Units left of a product.
    pub fn stock_of(&self, name: &str) -> CoreResult<u32> {
        self.get(name)
            .map(|product| product.stock)
            .ok_or_else(|| CoreError::UnknownProduct(name.to_string()))
    }

    /// Minimum price among products with stock left.
    ///
    /// `None` when the catalog is empty or everything is sold out.
    pub fn cheapest_available_price(&self) -> Option<Money> {
        self.products
            .values()
            .filter(|product| product.is_available())
            .map(|product| product.price)
            .min()
    }

    pub fn has_available_product(&self) -> bool {
        self.products.values().any(Product::is_available)
    }

    pub fn get(&self, name: &str) -> Option<&Product> {
        self.products.get(name)
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    /// Products sorted by name.
    pub fn iter(&self) -> impl Iterator<Item = &Product> {
        self.products.values()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
