//! # Poolslip - Pool Prediction Client Engine
//!
//! The client-side core of a fixed-odds pool prediction game: fifteen
//! matches per coupon, three outcomes per match, priced as a system bet,
//! funded through crypto deposits watched to a terminal state.
//!
//! ## Architecture
//!
//! - **State**: games, slips and deposits as plain domain types
//! - **Slip**: combinatorial pricing and the submission state machine
//! - **Deposit**: request initiation and the lifecycle monitor (countdown +
//!   status polling over one compare-and-set state cell)
//! - **API**: external collaborator contracts and the HTTP implementation
//! - **Config**: injected configuration, never process-wide globals
//!
//! Rendering, navigation, authentication and the server side of every
//! contract live outside this crate.

pub mod api;
pub mod config;
pub mod deposit;
pub mod error;
pub mod slip;
pub mod state;

pub use config::Config;
pub use deposit::{DepositFlow, DepositMonitor, DepositRequestController};
pub use error::{Error, Result, ValidationError};
pub use slip::{SlipController, SlipPhase};
pub use state::{Game, Outcome, PredictionSlip};
