//! # Coin Inventory
//!
//! The machine's coin box: how many coins of each denomination it holds,
//! how it is filled from a cash float, and how change is assembled.
//!
//! ## Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Coin Box Lifecycle                                   │
//! │                                                                         │
//! │  CoinInventory::new()        all denominations at 0                    │
//! │        │                                                                │
//! │        ▼                                                                │
//! │  seed(cash float, picker)    randomized greedy fill, exact total       │
//! │        │                                                                │
//! │        ▼                                                                │
//! │  max_change_for(balance)     read-only greedy plan (may fall short)    │
//! │        │                                                                │
//! │        ▼                                                                │
//! │  dispense(balance)           same plan, committed to the counts        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Randomness
//! Seeding picks coins through the [`CoinPicker`] trait. Production code uses
//! [`RandomPicker`]; tests pass a closure or a seeded `StdRng`.

use std::collections::BTreeMap;
use std::fmt;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::{CoreError, CoreResult};
use crate::money::Money;

// =============================================================================
// Coin
// =============================================================================

/// One of the fixed coin denominations the machine accepts.
///
/// Variants are declared largest first, so the derived `Ord` (and therefore
/// `BTreeMap<Coin, _>` iteration) walks denominations in descending value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(into = "i64", try_from = "i64")]
pub enum Coin {
    Won500,
    Won100,
    Won50,
    Won10,
}

impl Coin {
    /// Every denomination, largest first.
    pub const ALL: [Coin; 4] = [Coin::Won500, Coin::Won100, Coin::Won50, Coin::Won10];

    /// The smallest denomination. Prices and cash amounts are multiples of it.
    pub const SMALLEST: Coin = Coin::Won10;

    /// Face value of the coin.
    #[inline]
    pub const fn value(self) -> Money {
        Money::from_won(match self {
            Coin::Won500 => 500,
            Coin::Won100 => 100,
            Coin::Won50 => 50,
            Coin::Won10 => 10,
        })
    }

    /// Looks up a denomination by face value.
    pub fn from_value(won: i64) -> Option<Coin> {
        Coin::ALL.into_iter().find(|coin| coin.value().won() == won)
    }
}

impl fmt::Display for Coin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.value(), f)
    }
}

impl From<Coin> for i64 {
    fn from(coin: Coin) -> Self {
        coin.value().won()
    }
}

impl TryFrom<i64> for Coin {
    type Error = CoreError;

    fn try_from(won: i64) -> Result<Self, Self::Error> {
        Coin::from_value(won).ok_or(CoreError::UnknownDenomination(won))
    }
}

// =============================================================================
// Coin Counts
// =============================================================================

/// A per-denomination coin count.
///
/// Used both as the live storage of [`CoinInventory`] and as the read-only
/// copies handed out for reporting (inventory snapshot, dispensed change).
/// Serializes as `{"500": 3, "100": 2, ...}`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CoinCounts(BTreeMap<Coin, u64>);

impl CoinCounts {
    /// Counts with an explicit zero entry for every denomination.
    pub fn zeroed() -> Self {
        CoinCounts(Coin::ALL.into_iter().map(|coin| (coin, 0)).collect())
    }

    /// Number of coins of `coin` (0 when there is no entry).
    #[inline]
    pub fn get(&self, coin: Coin) -> u64 {
        self.0.get(&coin).copied().unwrap_or(0)
    }

    /// Every denomination with its count, largest first.
    pub fn iter(&self) -> impl Iterator<Item = (Coin, u64)> + '_ {
        Coin::ALL.into_iter().map(move |coin| (coin, self.get(coin)))
    }

    /// Only denominations with at least one coin, largest first.
    pub fn iter_nonzero(&self) -> impl Iterator<Item = (Coin, u64)> + '_ {
        self.iter().filter(|(_, count)| *count > 0)
    }

    /// Total number of coins.
    pub fn coin_count(&self) -> u64 {
        self.0.values().sum()
    }

    /// Σ(count × denomination).
    pub fn total_value(&self) -> Money {
        self.iter().map(|(coin, count)| coin.value() * count).sum()
    }

    fn add(&mut self, coin: Coin, count: u64) {
        *self.0.entry(coin).or_insert(0) += count;
    }

    fn remove(&mut self, coin: Coin, count: u64) {
        let entry = self.0.entry(coin).or_insert(0);
        *entry = entry.saturating_sub(count);
    }
}

// =============================================================================
// Coin Picker
// =============================================================================

/// Source of the "which coin next" decision during seeding.
///
/// `eligible` is never empty and is ordered largest first. Returning a coin
/// that is not in `eligible` is tolerated: the largest eligible coin is used.
pub trait CoinPicker {
    fn pick(&mut self, eligible: &[Coin]) -> Coin;
}

impl<F> CoinPicker for F
where
    F: FnMut(&[Coin]) -> Coin,
{
    fn pick(&mut self, eligible: &[Coin]) -> Coin {
        self(eligible)
    }
}

/// Uniform random choice among the eligible coins.
#[derive(Debug, Clone)]
pub struct RandomPicker<R> {
    rng: R,
}

impl<R: Rng> RandomPicker<R> {
    pub fn new(rng: R) -> Self {
        RandomPicker { rng }
    }
}

impl RandomPicker<StdRng> {
    /// Reproducible picker: the same seed always yields the same coin box.
    pub fn from_seed(seed: u64) -> Self {
        RandomPicker::new(StdRng::seed_from_u64(seed))
    }

    /// Picker seeded from OS entropy.
    pub fn from_entropy() -> Self {
        RandomPicker::new(StdRng::from_entropy())
    }
}

impl<R: Rng> CoinPicker for RandomPicker<R> {
    fn pick(&mut self, eligible: &[Coin]) -> Coin {
        eligible
            .choose(&mut self.rng)
            .copied()
            .unwrap_or(Coin::SMALLEST)
    }
}

// =============================================================================
// Coin Inventory
// =============================================================================

/// The coin box.
///
/// ## Invariants
/// - Every denomination has an entry (possibly zero)
/// - Counts never go negative (unsigned, and dispensing never takes more
///   than is held)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoinInventory {
    counts: CoinCounts,
}

impl Default for CoinInventory {
    fn default() -> Self {
        CoinInventory::new()
    }
}

impl CoinInventory {
    /// Creates an empty coin box.
    pub fn new() -> Self {
        CoinInventory {
            counts: CoinCounts::zeroed(),
        }
    }

    /// Fills the coin box with coins worth `amount`.
    ///
    /// ## Algorithm
    /// ```text
    /// eligible = denominations <= remaining, largest first
    /// while eligible has more than one coin:
    ///     coin = picker.pick(eligible)        ← random, not necessarily largest
    ///     count[coin] += 1
    ///     remaining -= coin
    ///     drop coins > remaining from eligible
    /// last eligible coin (always the smallest) gets remaining / value
    /// ```
    ///
    /// For a multiple of the smallest denomination the new coins sum to
    /// exactly `amount`. Any remainder below the smallest coin is dropped.
    ///
    /// ## Example
    /// ```rust
    /// use vending_core::coin::{Coin, CoinInventory};
    /// use vending_core::money::Money;
    ///
    /// let mut coins = CoinInventory::new();
    /// // Always take the largest eligible coin
    /// coins.seed(Money::from_won(660), &mut |eligible: &[Coin]| eligible[0]).unwrap();
    ///
    /// assert_eq!(coins.count(Coin::Won500), 1);
    /// assert_eq!(coins.count(Coin::Won100), 1);
    /// assert_eq!(coins.count(Coin::Won50), 1);
    /// assert_eq!(coins.count(Coin::Won10), 1);
    /// assert_eq!(coins.total_value(), Money::from_won(660));
    /// ```
    pub fn seed(&mut self, amount: Money, picker: &mut impl CoinPicker) -> CoreResult<()> {
        if amount.is_negative() {
            return Err(CoreError::NegativeAmount(amount));
        }

        let mut remaining = amount;
        let mut eligible: Vec<Coin> = Coin::ALL
            .into_iter()
            .filter(|coin| coin.value() <= remaining)
            .collect();

        while eligible.len() > 1 {
            let picked = picker.pick(&eligible);
            let picked = if eligible.contains(&picked) {
                picked
            } else {
                eligible[0]
            };

            self.counts.add(picked, 1);
            remaining -= picked.value();
            eligible.retain(|coin| coin.value() <= remaining);
        }

        if let Some(&last) = eligible.first() {
            // The while loop only exits with the smallest coin left (or none)
            let count = remaining.won() / last.value().won();
            self.counts.add(last, count.unsigned_abs());
            debug!(coin = %last, count, "filled remainder with smallest coin");
        }

        info!(
            amount = %amount,
            total = %self.total_value(),
            coins = self.counts.coin_count(),
            "coin box seeded"
        );
        Ok(())
    }

    /// Number of coins held for a face value.
    ///
    /// Unknown values are an error rather than a zero count so that a typo
    /// (e.g. 25) can't be mistaken for an empty slot.
    pub fn count_of(&self, denomination: i64) -> CoreResult<u64> {
        let coin = Coin::try_from(denomination)?;
        Ok(self.counts.get(coin))
    }

    /// Number of coins held for a denomination.
    #[inline]
    pub fn count(&self, coin: Coin) -> u64 {
        self.counts.get(coin)
    }

    /// Σ(count × denomination).
    pub fn total_value(&self) -> Money {
        self.counts.total_value()
    }

    /// Read-only view of the live counts.
    pub fn counts(&self) -> &CoinCounts {
        &self.counts
    }

    /// Owned copy of the counts for reporting.
    pub fn snapshot(&self) -> CoinCounts {
        self.counts.clone()
    }

    /// The largest value `<= amount` that the held coins can assemble
    /// with a largest-first greedy walk.
    ///
    /// Returns less than `amount` when coins are short. This is not an
    /// error: the caller decides what a shortfall means.
    pub fn max_change_for(&self, amount: Money) -> Money {
        self.plan_change(amount).total_value()
    }

    /// Removes the coins for `amount` of change and returns them.
    ///
    /// Uses the same plan as [`max_change_for`](Self::max_change_for), so the
    /// returned total always equals what `max_change_for(amount)` reported
    /// right before this call.
    pub fn dispense(&mut self, amount: Money) -> CoinCounts {
        let plan = self.plan_change(amount);
        for (coin, count) in plan.iter_nonzero() {
            self.counts.remove(coin, count);
        }

        let dispensed = plan.total_value();
        if dispensed < amount {
            warn!(
                requested = %amount,
                dispensed = %dispensed,
                "coin box cannot cover the full change"
            );
        } else {
            info!(dispensed = %dispensed, coins = plan.coin_count(), "change dispensed");
        }
        plan
    }

    /// Greedy largest-first plan: for each denomination take
    /// `min(remaining / value, held)` coins.
    fn plan_change(&self, amount: Money) -> CoinCounts {
        let mut plan = CoinCounts::default();
        if !amount.is_positive() {
            return plan;
        }

        let mut remaining = amount;
        for coin in Coin::ALL {
            let wanted = (remaining.won() / coin.value().won()).unsigned_abs();
            let take = wanted.min(self.counts.get(coin));
            if take > 0 {
                plan.add(coin, take);
                remaining -= coin.value() * take;
            }
        }

        debug!(requested = %amount, planned = %plan.total_value(), "change planned");
        plan
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn largest(eligible: &[Coin]) -> Coin {
        eligible[0]
    }

    fn smallest(eligible: &[Coin]) -> Coin {
        eligible[eligible.len() - 1]
    }

    fn inventory_with(counts: &[(Coin, u64)]) -> CoinInventory {
        let mut inventory = CoinInventory::new();
        for &(coin, count) in counts {
            inventory.counts.add(coin, count);
        }
        inventory
    }

    #[test]
    fn test_denominations_are_descending() {
        let values: Vec<i64> = Coin::ALL.iter().map(|c| c.value().won()).collect();
        assert_eq!(values, vec![500, 100, 50, 10]);
        assert_eq!(Coin::SMALLEST.value().won(), 10);
    }

    #[test]
    fn test_from_value() {
        assert_eq!(Coin::from_value(50), Some(Coin::Won50));
        assert_eq!(Coin::from_value(25), None);
        assert!(matches!(
            Coin::try_from(1000),
            Err(CoreError::UnknownDenomination(1000))
        ));
    }

    #[test]
    fn test_new_inventory_has_every_denomination_at_zero() {
        let inventory = CoinInventory::new();
        for coin in Coin::ALL {
            assert_eq!(inventory.count_of(coin.value().won()).unwrap(), 0);
        }
        assert_eq!(inventory.total_value(), Money::zero());
    }

    #[test]
    fn test_count_of_unknown_denomination() {
        let inventory = inventory_with(&[(Coin::Won10, 3)]);
        assert!(matches!(
            inventory.count_of(25),
            Err(CoreError::UnknownDenomination(25))
        ));
        assert_eq!(inventory.count_of(10).unwrap(), 3);
    }

    #[test]
    fn test_seed_always_largest() {
        let mut inventory = CoinInventory::new();
        inventory
            .seed(Money::from_won(10_000), &mut largest)
            .unwrap();

        assert_eq!(inventory.count(Coin::Won500), 20);
        assert_eq!(inventory.count(Coin::Won10), 0);
        assert_eq!(inventory.total_value(), Money::from_won(10_000));
    }

    #[test]
    fn test_seed_always_smallest() {
        let mut inventory = CoinInventory::new();
        inventory.seed(Money::from_won(1_230), &mut smallest).unwrap();

        assert_eq!(inventory.count(Coin::Won10), 123);
        assert_eq!(inventory.count(Coin::Won500), 0);
        assert_eq!(inventory.total_value(), Money::from_won(1_230));
    }

    #[test]
    fn test_seed_small_amounts() {
        let mut inventory = CoinInventory::new();
        inventory.seed(Money::from_won(30), &mut largest).unwrap();
        assert_eq!(inventory.count(Coin::Won10), 3);

        let mut inventory = CoinInventory::new();
        inventory.seed(Money::zero(), &mut largest).unwrap();
        assert_eq!(inventory.total_value(), Money::zero());

        // Below the smallest coin: silently dropped
        let mut inventory = CoinInventory::new();
        inventory.seed(Money::from_won(7), &mut largest).unwrap();
        assert_eq!(inventory.total_value(), Money::zero());
    }

    #[test]
    fn test_seed_drops_sub_coin_remainder() {
        let mut inventory = CoinInventory::new();
        inventory.seed(Money::from_won(1_005), &mut largest).unwrap();
        assert_eq!(inventory.total_value(), Money::from_won(1_000));
    }

    #[test]
    fn test_seed_rejects_negative_amount() {
        let mut inventory = CoinInventory::new();
        let result = inventory.seed(Money::from_won(-100), &mut largest);
        assert!(matches!(result, Err(CoreError::NegativeAmount(_))));
        assert_eq!(inventory.total_value(), Money::zero());
    }

    #[test]
    fn test_seed_ignores_ineligible_pick() {
        // Picker insists on 500 even when only 50 and 10 fit
        let mut inventory = CoinInventory::new();
        inventory
            .seed(Money::from_won(80), &mut |_: &[Coin]| Coin::Won500)
            .unwrap();

        assert_eq!(inventory.count(Coin::Won500), 0);
        assert_eq!(inventory.count(Coin::Won50), 1);
        assert_eq!(inventory.count(Coin::Won10), 3);
    }

    #[test]
    fn test_seed_only_offers_eligible_coins() {
        let mut offered: Vec<Vec<Coin>> = Vec::new();
        let mut inventory = CoinInventory::new();
        inventory
            .seed(Money::from_won(160), &mut |eligible: &[Coin]| {
                offered.push(eligible.to_vec());
                eligible[0]
            })
            .unwrap();

        assert_eq!(
            offered,
            vec![
                vec![Coin::Won100, Coin::Won50, Coin::Won10],
                vec![Coin::Won50, Coin::Won10],
            ]
        );
        assert_eq!(inventory.total_value(), Money::from_won(160));
    }

    #[test]
    fn test_same_seed_same_coin_box() {
        let mut a = CoinInventory::new();
        let mut b = CoinInventory::new();
        a.seed(Money::from_won(45_670), &mut RandomPicker::from_seed(7))
            .unwrap();
        b.seed(Money::from_won(45_670), &mut RandomPicker::from_seed(7))
            .unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_max_change_for_exact() {
        let inventory = inventory_with(&[(Coin::Won500, 2), (Coin::Won100, 3), (Coin::Won10, 5)]);
        assert_eq!(
            inventory.max_change_for(Money::from_won(1_250)),
            Money::from_won(1_250)
        );
    }

    #[test]
    fn test_max_change_for_shortfall() {
        // Greedy skips 50 (none held) and runs out of 10s
        let inventory = inventory_with(&[(Coin::Won100, 1), (Coin::Won10, 2)]);
        assert_eq!(
            inventory.max_change_for(Money::from_won(170)),
            Money::from_won(120)
        );
    }

    #[test]
    fn test_max_change_for_non_positive() {
        let inventory = inventory_with(&[(Coin::Won10, 5)]);
        assert_eq!(inventory.max_change_for(Money::zero()), Money::zero());
        assert_eq!(inventory.max_change_for(Money::from_won(-10)), Money::zero());
    }

    #[test]
    fn test_max_change_for_is_idempotent() {
        let inventory = inventory_with(&[(Coin::Won500, 1), (Coin::Won50, 1)]);
        let first = inventory.max_change_for(Money::from_won(600));
        let second = inventory.max_change_for(Money::from_won(600));
        assert_eq!(first, second);
        assert_eq!(first, Money::from_won(550));
    }

    #[test]
    fn test_dispense_matches_preview_and_updates_counts() {
        let mut inventory =
            inventory_with(&[(Coin::Won500, 1), (Coin::Won100, 4), (Coin::Won50, 1), (Coin::Won10, 1)]);
        let before = inventory.total_value();
        let preview = inventory.max_change_for(Money::from_won(780));

        let change = inventory.dispense(Money::from_won(780));

        assert_eq!(change.total_value(), preview);
        assert_eq!(change.get(Coin::Won500), 1);
        assert_eq!(change.get(Coin::Won100), 2);
        assert_eq!(change.get(Coin::Won50), 1);
        assert_eq!(change.get(Coin::Won10), 1);
        assert_eq!(inventory.count(Coin::Won100), 2);
        assert_eq!(inventory.total_value(), before - preview);
    }

    #[test]
    fn test_dispense_only_lists_used_coins() {
        let mut inventory = inventory_with(&[(Coin::Won500, 3), (Coin::Won10, 9)]);
        let change = inventory.dispense(Money::from_won(50));

        let used: Vec<(Coin, u64)> = change.iter_nonzero().collect();
        assert_eq!(used, vec![(Coin::Won10, 5)]);
    }

    #[test]
    fn test_snapshot_is_a_copy() {
        let mut inventory = inventory_with(&[(Coin::Won100, 2)]);
        let snapshot = inventory.snapshot();
        inventory.dispense(Money::from_won(100));

        assert_eq!(snapshot.get(Coin::Won100), 2);
        assert_eq!(inventory.count(Coin::Won100), 1);
    }

    #[test]
    fn test_counts_serialize_by_face_value() {
        let inventory = inventory_with(&[(Coin::Won500, 1), (Coin::Won10, 2)]);
        let json = serde_json::to_value(inventory.snapshot()).unwrap();
        assert_eq!(json["500"], 1);
        assert_eq!(json["10"], 2);
        assert_eq!(json["100"], 0);
    }

    proptest! {
        #[test]
        fn prop_seed_total_equals_amount(tens in 0i64..50_000, seed in any::<u64>()) {
            let amount = Money::from_won(tens * 10);
            let mut inventory = CoinInventory::new();
            inventory.seed(amount, &mut RandomPicker::from_seed(seed)).unwrap();
            prop_assert_eq!(inventory.total_value(), amount);
        }

        #[test]
        fn prop_dispense_decreases_total_by_dispensed(
            float_tens in 0i64..5_000,
            requests in proptest::collection::vec(0i64..2_000, 1..8),
            seed in any::<u64>(),
        ) {
            let mut inventory = CoinInventory::new();
            inventory
                .seed(Money::from_won(float_tens * 10), &mut RandomPicker::from_seed(seed))
                .unwrap();

            for won in requests {
                let amount = Money::from_won(won);
                let before = inventory.total_value();
                let preview = inventory.max_change_for(amount);
                prop_assert!(preview <= amount);
                prop_assert_eq!(preview, inventory.max_change_for(amount));

                let change = inventory.dispense(amount);
                prop_assert_eq!(change.total_value(), preview);
                prop_assert_eq!(inventory.total_value(), before - preview);
            }
        }
    }
}
