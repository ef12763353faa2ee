//! Combinatorial slip pricing.
//!
//! A pool slip is priced as a system bet: selecting k outcomes for a match
//! multiplies the number of covered combinations by k, and the price is the
//! base cost times the combination count. The same figure is recomputed by
//! the settlement backend, so the arithmetic here must be exact - prices are
//! `Decimal`, never floats.

use crate::state::{Game, SelectionSet};
use rust_decimal::Decimal;

/// Compute the price of a slip.
///
/// `price = base_cost x product over the game's matches of max(1, k)` where
/// k is the number of outcomes selected for the match. A match with no
/// selection contributes a factor of 1 so a partially filled slip still
/// previews a meaningful price; completeness is enforced at submission, not
/// here.
pub fn slip_price(base_cost: Decimal, game: &Game, selections: &SelectionSet) -> Decimal {
    base_cost * Decimal::from(combination_count(game, selections))
}

/// Number of outcome combinations the selections cover across the coupon.
pub fn combination_count(game: &Game, selections: &SelectionSet) -> u64 {
    game.matches
        .iter()
        .map(|m| selections.count(&m.id).max(1) as u64)
        .product()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{Outcome, TeamMatch};
    use chrono::Utc;
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    fn test_game(match_count: usize) -> Game {
        Game {
            id: "g1".to_string(),
            name: "Round 1".to_string(),
            deadline: Utc::now() + chrono::Duration::hours(1),
            matches: (0..match_count)
                .map(|i| TeamMatch {
                    id: format!("m{i}"),
                    home_team: format!("Home {i}"),
                    away_team: format!("Away {i}"),
                    kickoff: Utc::now() + chrono::Duration::hours(2),
                    result: None,
                    cancelled: false,
                })
                .collect(),
        }
    }

    fn pick_all_single(game: &Game) -> SelectionSet {
        let mut selections = SelectionSet::new();
        for m in &game.matches {
            selections.toggle(&m.id, Outcome::Home);
        }
        selections
    }

    #[test]
    fn test_empty_slip_costs_base() {
        let game = test_game(15);
        let selections = SelectionSet::new();
        assert_eq!(slip_price(dec!(1), &game, &selections), dec!(1));
        assert_eq!(combination_count(&game, &selections), 1);
    }

    #[test]
    fn test_fifteen_singles_cost_base() {
        let game = test_game(15);
        let selections = pick_all_single(&game);
        assert_eq!(slip_price(dec!(1), &game, &selections), dec!(1));
    }

    #[test]
    fn test_one_double_doubles_price() {
        let game = test_game(15);
        let mut selections = pick_all_single(&game);
        selections.toggle("m3", Outcome::Draw);
        assert_eq!(slip_price(dec!(1), &game, &selections), dec!(2));
    }

    #[test]
    fn test_doubles_and_triples_multiply() {
        let game = test_game(15);
        let mut selections = pick_all_single(&game);
        // Two doubles and one triple: 2 * 2 * 3 = 12 combinations.
        selections.toggle("m0", Outcome::Draw);
        selections.toggle("m1", Outcome::Away);
        selections.toggle("m2", Outcome::Draw);
        selections.toggle("m2", Outcome::Away);
        assert_eq!(combination_count(&game, &selections), 12);
        assert_eq!(slip_price(dec!(0.25), &game, &selections), dec!(3.00));
    }

    #[test]
    fn test_full_system_slip() {
        let game = test_game(15);
        let mut selections = SelectionSet::new();
        for m in &game.matches {
            for outcome in Outcome::ALL {
                selections.toggle(&m.id, outcome);
            }
        }
        // 3^15 combinations.
        assert_eq!(combination_count(&game, &selections), 14_348_907);
    }

    #[test]
    fn test_adding_selection_never_decreases_price() {
        let game = test_game(15);
        let mut selections = pick_all_single(&game);
        for m in &game.matches {
            for outcome in [Outcome::Draw, Outcome::Away] {
                let before = slip_price(dec!(1), &game, &selections);
                selections.toggle(&m.id, outcome);
                let after = slip_price(dec!(1), &game, &selections);
                assert!(after >= before, "price dropped from {before} to {after}");
            }
        }
    }

    #[test]
    fn test_removing_selection_never_increases_price() {
        let game = test_game(15);
        let mut selections = SelectionSet::new();
        for m in &game.matches {
            for outcome in Outcome::ALL {
                selections.toggle(&m.id, outcome);
            }
        }
        for m in &game.matches {
            let before = slip_price(dec!(1), &game, &selections);
            selections.toggle(&m.id, Outcome::Draw);
            let after = slip_price(dec!(1), &game, &selections);
            assert!(after <= before, "price rose from {before} to {after}");
        }
    }

    #[test]
    fn test_price_scales_with_base_cost() {
        let game = test_game(15);
        let mut selections = pick_all_single(&game);
        selections.toggle("m7", Outcome::Away);
        assert_eq!(slip_price(dec!(0.10), &game, &selections), dec!(0.20));
        assert_eq!(slip_price(dec!(2.50), &game, &selections), dec!(5.00));
    }
}
