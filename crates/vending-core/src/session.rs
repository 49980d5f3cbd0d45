//! # Purchase Session
//!
//! One customer transaction from cash float to change.
//!
//! ## State Machine
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Session Lifecycle                                    │
//! │                                                                         │
//! │  ┌──────────┐  insert_money   ┌──────────┐  guard fails   ┌──────────┐ │
//! │  │  Setup   │────────────────►│ Selling  │───────────────►│ Settled  │ │
//! │  └──────────┘                 └──────────┘                └──────────┘ │
//! │   load_cash_float               select(name)               change      │
//! │   load_catalog                   │    ▲                    dispensed   │
//! │                                  └────┘                                 │
//! │                           rejected selections                           │
//! │                           leave state untouched                         │
//! │                                                                         │
//! │  Guard: has_available_product() && balance >= cheapest available      │
//! │  Checked after insert_money and after every successful select.         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use crate::catalog::ProductCatalog;
use crate::coin::{CoinCounts, CoinInventory, CoinPicker};
use crate::error::{CoreError, CoreResult};
use crate::money::Money;

// =============================================================================
// Phase
// =============================================================================

/// Where the session is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// Cash float and catalog are being loaded.
    Setup,
    /// Customer money is in, products can be selected.
    Selling,
    /// Change has been dispensed. Terminal.
    Settled,
}

// =============================================================================
// Records
// =============================================================================

/// A completed sale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Purchase {
    pub product: String,
    pub price: Money,
    /// Customer balance right after this sale.
    pub balance_after: Money,
}

/// Outcome of settling the session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settlement {
    /// Balance owed back to the customer.
    pub requested: Money,

    /// Coins handed out, only denominations actually used.
    pub change: CoinCounts,

    /// Value of `change`.
    pub dispensed: Money,

    /// `requested - dispensed`; zero unless the coin box ran short.
    pub shortfall: Money,

    pub settled_at: DateTime<Utc>,
}

/// Serializable summary of a session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionReceipt {
    pub session_id: Uuid,
    pub started_at: DateTime<Utc>,
    pub phase: Phase,
    pub cash_float: Money,
    pub inserted: Money,
    pub purchases: Vec<Purchase>,
    pub balance: Money,
    pub settlement: Option<Settlement>,
    pub coin_box: CoinCounts,
}

// =============================================================================
// Purchase Session
// =============================================================================

/// The purchase loop state machine.
///
/// Exclusively owns the coin box and the catalog for its whole lifetime;
/// callers only get shared references or copies.
#[derive(Debug)]
pub struct PurchaseSession {
    id: Uuid,
    started_at: DateTime<Utc>,
    phase: Phase,
    cash_float: Option<Money>,
    catalog: Option<ProductCatalog>,
    coins: CoinInventory,
    inserted: Money,
    balance: Money,
    purchases: Vec<Purchase>,
    settlement: Option<Settlement>,
}

impl Default for PurchaseSession {
    fn default() -> Self {
        PurchaseSession::new()
    }
}

impl PurchaseSession {
    pub fn new() -> Self {
        PurchaseSession {
            id: Uuid::new_v4(),
            started_at: Utc::now(),
            phase: Phase::Setup,
            cash_float: None,
            catalog: None,
            coins: CoinInventory::new(),
            inserted: Money::zero(),
            balance: Money::zero(),
            purchases: Vec::new(),
            settlement: None,
        }
    }

    // -------------------------------------------------------------------------
    // Setup
    // -------------------------------------------------------------------------

    /// Seeds the coin box from the operator's cash float. Once per session.
    pub fn load_cash_float(
        &mut self,
        amount: Money,
        picker: &mut impl CoinPicker,
    ) -> CoreResult<&CoinCounts> {
        self.require_phase(Phase::Setup, "load cash float")?;
        if self.cash_float.is_some() {
            return Err(CoreError::AlreadyLoaded("cash float"));
        }

        self.coins.seed(amount, picker)?;
        self.cash_float = Some(amount);
        Ok(self.coins.counts())
    }

    /// Installs the product catalog. Once per session.
    pub fn load_catalog(&mut self, catalog: ProductCatalog) -> CoreResult<()> {
        self.require_phase(Phase::Setup, "load catalog")?;
        if self.catalog.is_some() {
            return Err(CoreError::AlreadyLoaded("catalog"));
        }

        info!(products = catalog.len(), "catalog loaded");
        self.catalog = Some(catalog);
        Ok(())
    }

    /// Accepts the customer's money and opens the selling loop.
    ///
    /// Returns the phase afterwards: `Settled` right away when nothing is
    /// affordable (e.g. zero money inserted).
    pub fn insert_money(&mut self, amount: Money) -> CoreResult<Phase> {
        self.require_phase(Phase::Setup, "insert money")?;
        if self.cash_float.is_none() {
            return Err(CoreError::SetupIncomplete("cash float"));
        }
        if self.catalog.is_none() {
            return Err(CoreError::SetupIncomplete("catalog"));
        }
        if amount.is_negative() {
            return Err(CoreError::NegativeAmount(amount));
        }

        self.inserted = amount;
        self.balance = amount;
        self.phase = Phase::Selling;
        info!(session = %self.id, inserted = %amount, "money inserted");

        self.settle_if_exhausted();
        Ok(self.phase)
    }

    // -------------------------------------------------------------------------
    // Selling
    // -------------------------------------------------------------------------

    /// Whether the selling loop should ask for another selection.
    pub fn can_continue(&self) -> bool {
        let Some(catalog) = &self.catalog else {
            return false;
        };
        match catalog.cheapest_available_price() {
            Some(cheapest) => catalog.has_available_product() && self.balance >= cheapest,
            None => false,
        }
    }

    /// Buys one unit of `name` with the remaining balance.
    ///
    /// ## Flow
    /// ```text
    /// select("cola")
    ///      │
    ///      ├── not Selling?           → InvalidPhase
    ///      ├── unknown name?          → UnknownProduct
    ///      ├── balance < price?       → InsufficientFunds
    ///      ├── stock == 0?            → OutOfStock
    ///      │
    ///      └── stock - 1, balance - price, maybe settle → Ok(Purchase)
    /// ```
    /// Nothing changes when an error is returned.
    pub fn select(&mut self, name: &str) -> CoreResult<Purchase> {
        self.require_phase(Phase::Selling, "select a product")?;
        let catalog = self
            .catalog
            .as_mut()
            .ok_or(CoreError::SetupIncomplete("catalog"))?;

        let price = catalog.price_of(name)?;
        let balance_after =
            self.balance
                .checked_debit(price)
                .ok_or_else(|| CoreError::InsufficientFunds {
                    product: name.to_string(),
                    price,
                    balance: self.balance,
                })?;
        catalog.sell(name)?;

        self.balance = balance_after;
        let purchase = Purchase {
            product: name.to_string(),
            price,
            balance_after,
        };
        info!(product = %name, price = %price, balance = %balance_after, "product sold");
        self.purchases.push(purchase.clone());

        self.settle_if_exhausted();
        Ok(purchase)
    }

    // -------------------------------------------------------------------------
    // Settlement
    // -------------------------------------------------------------------------

    fn settle_if_exhausted(&mut self) {
        if self.phase == Phase::Selling && !self.can_continue() {
            self.settle();
        }
    }

    fn settle(&mut self) {
        let requested = self.balance;
        let preview = self.coins.max_change_for(requested);
        let change = self.coins.dispense(requested);
        let dispensed = change.total_value();
        debug_assert_eq!(preview, dispensed);

        let shortfall = requested - dispensed;
        if shortfall.is_positive() {
            warn!(session = %self.id, shortfall = %shortfall, "settled with change shortfall");
        }

        self.settlement = Some(Settlement {
            requested,
            change,
            dispensed,
            shortfall,
            settled_at: Utc::now(),
        });
        self.phase = Phase::Settled;
        info!(
            session = %self.id,
            purchases = self.purchases.len(),
            change = %dispensed,
            "session settled"
        );
    }

    // -------------------------------------------------------------------------
    // Accessors
    // -------------------------------------------------------------------------

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Customer's remaining balance.
    pub fn balance(&self) -> Money {
        self.balance
    }

    pub fn cash_float(&self) -> Option<Money> {
        self.cash_float
    }

    pub fn catalog(&self) -> Option<&ProductCatalog> {
        self.catalog.as_ref()
    }

    pub fn coins(&self) -> &CoinInventory {
        &self.coins
    }

    pub fn purchases(&self) -> &[Purchase] {
        &self.purchases
    }

    pub fn settlement(&self) -> Option<&Settlement> {
        self.settlement.as_ref()
    }

    /// Snapshot of the whole session for reporting/serialization.
    pub fn receipt(&self) -> SessionReceipt {
        SessionReceipt {
            session_id: self.id,
            started_at: self.started_at,
            phase: self.phase,
            cash_float: self.cash_float.unwrap_or_default(),
            inserted: self.inserted,
            purchases: self.purchases.clone(),
            balance: self.balance,
            settlement: self.settlement.clone(),
            coin_box: self.coins.snapshot(),
        }
    }

    fn require_phase(&self, expected: Phase, operation: &'static str) -> CoreResult<()> {
        if self.phase != expected {
            return Err(CoreError::InvalidPhase {
                operation,
                phase: self.phase,
            });
        }
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
