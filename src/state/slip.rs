//! Prediction slip state.

use super::{Game, Outcome};
use crate::slip::pricing;
use rust_decimal::Decimal;
use std::collections::{BTreeSet, HashMap};

/// Per-match sets of chosen outcomes.
///
/// A match either has no entry at all or a set of 1-3 distinct outcomes;
/// toggling the last outcome off removes the entry, so an empty set is
/// never stored.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionSet {
    by_match: HashMap<String, BTreeSet<Outcome>>,
}

impl SelectionSet {
    /// Create an empty selection set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Toggle an outcome for a match. Returns `true` if the outcome is
    /// selected after the toggle.
    ///
    /// Toggling the same outcome twice restores the set exactly.
    pub fn toggle(&mut self, match_id: &str, outcome: Outcome) -> bool {
        let selections = self.by_match.entry(match_id.to_string()).or_default();
        if selections.remove(&outcome) {
            if selections.is_empty() {
                self.by_match.remove(match_id);
            }
            false
        } else {
            selections.insert(outcome);
            true
        }
    }

    /// Check whether an outcome is selected for a match.
    pub fn is_selected(&self, match_id: &str, outcome: Outcome) -> bool {
        self.by_match
            .get(match_id)
            .is_some_and(|s| s.contains(&outcome))
    }

    /// Number of outcomes selected for a match.
    pub fn count(&self, match_id: &str) -> usize {
        self.by_match.get(match_id).map_or(0, BTreeSet::len)
    }

    /// The outcomes selected for a match in coupon order (`1`, `X`, `2`).
    pub fn sorted_outcomes(&self, match_id: &str) -> Vec<Outcome> {
        self.by_match
            .get(match_id)
            .map(|s| s.iter().copied().collect())
            .unwrap_or_default()
    }

    /// Number of matches with at least one selection.
    pub fn selected_match_count(&self) -> usize {
        self.by_match.len()
    }

    /// Check whether no match has a selection.
    pub fn is_empty(&self) -> bool {
        self.by_match.is_empty()
    }

    /// Remove all selections.
    pub fn clear(&mut self) {
        self.by_match.clear();
    }
}

/// An in-progress prediction covering all matches of one game.
///
/// The price is derived state: it is recomputed synchronously on every
/// toggle so no mutation can be lost to a stale value.
#[derive(Debug, Clone)]
pub struct PredictionSlip {
    /// The target game.
    pub game: Game,
    /// Cost of a single-combination slip.
    pub base_cost: Decimal,
    selections: SelectionSet,
    price: Decimal,
}

impl PredictionSlip {
    /// Create a slip for a game. The initial price previews a fully single-
    /// row coupon, i.e. the base cost.
    pub fn new(game: Game, base_cost: Decimal) -> Self {
        let mut slip = Self {
            game,
            base_cost,
            selections: SelectionSet::new(),
            price: Decimal::ZERO,
        };
        slip.recompute_price();
        slip
    }

    /// Toggle an outcome for a match on this coupon.
    ///
    /// Returns `true` if the outcome is selected after the toggle. Unknown
    /// match ids are rejected rather than silently priced in.
    pub fn toggle(&mut self, match_id: &str, outcome: Outcome) -> crate::Result<bool> {
        if self.game.find_match(match_id).is_none() {
            return Err(crate::Error::invalid_input(format!(
                "match '{match_id}' is not on game '{}'",
                self.game.id
            )));
        }
        let selected = self.selections.toggle(match_id, outcome);
        self.recompute_price();
        Ok(selected)
    }

    /// The current selections.
    pub fn selections(&self) -> &SelectionSet {
        &self.selections
    }

    /// The current price.
    pub fn price(&self) -> Decimal {
        self.price
    }

    /// Number of outcome combinations the slip currently covers.
    pub fn combination_count(&self) -> u64 {
        pricing::combination_count(&self.game, &self.selections)
    }

    /// Check whether every match on the coupon carries a selection.
    pub fn is_complete(&self) -> bool {
        self.missing_selection_count() == 0
    }

    /// Number of matches still without any selected outcome.
    pub fn missing_selection_count(&self) -> usize {
        self.game
            .matches
            .iter()
            .filter(|m| self.selections.count(&m.id) == 0)
            .count()
    }

    /// Empty the slip: selections cleared, price forced to zero.
    pub fn clear(&mut self) {
        self.selections.clear();
        self.price = Decimal::ZERO;
    }

    fn recompute_price(&mut self) {
        self.price = pricing::slip_price(self.base_cost, &self.game, &self.selections);
    }
}
