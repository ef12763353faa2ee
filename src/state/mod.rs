//! Domain state for Poolslip.
//!
//! Leaves first: games and matches, the prediction slip built on top of
//! them, and the crypto deposit types. The engines in [`crate::slip`] and
//! [`crate::deposit`] own all mutation with temporal logic; the types here
//! only hold data and derived accessors.

mod deposit;
mod game;
mod slip;

pub use deposit::{Currency, DepositDescriptor, DepositRequest, DepositState, Network};
pub use game::{Game, GameState, MATCHES_PER_GAME, Outcome, TeamMatch};
pub use slip::{PredictionSlip, SelectionSet};
