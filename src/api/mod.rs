//! External collaborator contracts.
//!
//! The engine consumes two remote collaborators: the game catalog /
//! prediction-submission service and the deposit service. Both are opaque
//! request/response contracts expressed as traits so the engines stay
//! testable without a network; [`HttpApiClient`] is the shipped JSON
//! implementation.

mod client;
mod convert;

pub use client::{HttpApiClient, HttpApiClientBuilder};
pub use convert::WireConverter;

use crate::error::Result;
use crate::state::{DepositDescriptor, DepositRequest, DepositState, Game, Outcome};
use async_trait::async_trait;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One line of a prediction submission: a match and its chosen outcomes in
/// coupon order (`1`, `X`, `2`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchPrediction {
    pub match_id: String,
    pub outcomes: Vec<Outcome>,
}

/// The full submission payload for a slip.
///
/// `price` is the locally computed figure, transmitted as the amount to
/// charge. The backend recomputes and enforces the authoritative price; the
/// client value exists for display and must agree bit-for-bit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PredictionSubmission {
    pub game_id: String,
    /// Client-generated reference for idempotent resubmission.
    pub client_ref: Uuid,
    /// Entries in coupon order, one per match with selections.
    pub entries: Vec<MatchPrediction>,
    pub price: Decimal,
}

/// Acknowledgment returned for an accepted slip.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionReceipt {
    /// Server-issued form identifier.
    pub form_id: String,
}

/// Game catalog and prediction submission collaborator.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PredictionApi: Send + Sync {
    /// Fetch the currently open games.
    async fn fetch_open_games(&self) -> Result<Vec<Game>>;

    /// Submit a finished slip. Structured rejections surface as
    /// [`crate::Error::Rejected`] with the server's reason verbatim.
    async fn submit_prediction(&self, submission: &PredictionSubmission)
    -> Result<SubmissionReceipt>;
}

/// Deposit collaborator.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DepositApi: Send + Sync {
    /// Request payment instructions for a deposit.
    async fn initiate_deposit(&self, request: &DepositRequest) -> Result<DepositDescriptor>;

    /// Read the current lifecycle state of a deposit.
    async fn deposit_status(&self, deposit_id: &str) -> Result<DepositState>;
}
