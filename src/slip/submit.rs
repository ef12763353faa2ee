//! Slip submission control.

use crate::api::{MatchPrediction, PredictionApi, PredictionSubmission, SubmissionReceipt};
use crate::error::{Error, Result, ValidationError};
use crate::state::{Outcome, PredictionSlip};
use std::sync::Arc;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Phase of the slip submission machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SlipPhase {
    /// Outcomes are being picked. The default phase; any toggle keeps or
    /// returns the controller here.
    #[default]
    Building,
    /// Local validation is running. No network traffic yet.
    Validating,
    /// Exactly one submission is in flight.
    Submitting,
    /// The collaborator accepted the slip; it has been cleared.
    Succeeded,
    /// The collaborator rejected the slip; selections are preserved for
    /// retry.
    Rejected,
}

impl std::fmt::Display for SlipPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Building => write!(f, "Building"),
            Self::Validating => write!(f, "Validating"),
            Self::Submitting => write!(f, "Submitting"),
            Self::Succeeded => write!(f, "Succeeded"),
            Self::Rejected => write!(f, "Rejected"),
        }
    }
}

/// Owns a [`PredictionSlip`] and drives it through validation and
/// submission.
///
/// One controller per slip; at most one submission is ever in flight and a
/// second submit intent while one is running is a logged no-op.
pub struct SlipController {
    api: Arc<dyn PredictionApi>,
    slip: PredictionSlip,
    phase: SlipPhase,
}

impl SlipController {
    /// Create a controller for a slip.
    pub fn new(api: Arc<dyn PredictionApi>, slip: PredictionSlip) -> Self {
        Self {
            api,
            slip,
            phase: SlipPhase::Building,
        }
    }

    /// The current phase.
    pub fn phase(&self) -> SlipPhase {
        self.phase
    }

    /// The owned slip.
    pub fn slip(&self) -> &PredictionSlip {
        &self.slip
    }

    /// Toggle an outcome on the slip. Returns whether the outcome is
    /// selected afterwards.
    ///
    /// Any toggle puts the controller back in `Building`; toggling is
    /// refused while a submission is in flight so the transmitted price
    /// cannot drift from the selections it was computed for.
    pub fn toggle(&mut self, match_id: &str, outcome: Outcome) -> Result<bool> {
        if self.phase == SlipPhase::Submitting {
            return Err(Error::invalid_input(
                "cannot change selections while a submission is in flight",
            ));
        }
        let selected = self.slip.toggle(match_id, outcome)?;
        self.phase = SlipPhase::Building;
        Ok(selected)
    }

    /// Validate the slip for submission: every match needs at least one
    /// selection, and the game deadline must not have passed. The displayed
    /// price is irrelevant here - a partially filled slip previews a price
    /// but never validates.
    pub fn validate(&self) -> std::result::Result<(), ValidationError> {
        let missing = self.slip.missing_selection_count();
        if missing > 0 {
            return Err(ValidationError::IncompleteSelections { missing });
        }
        if self.slip.game.deadline_passed() {
            return Err(ValidationError::DeadlinePassed {
                deadline: self.slip.game.deadline,
            });
        }
        Ok(())
    }

    /// Validate and submit the slip.
    ///
    /// Returns `Ok(None)` if a submission is already in flight (the intent
    /// is ignored, not queued). On acceptance the slip is cleared and the
    /// receipt returned; on rejection the selections survive untouched so
    /// the user can resubmit without re-entering them.
    pub async fn submit(&mut self) -> Result<Option<SubmissionReceipt>> {
        if self.phase == SlipPhase::Submitting {
            debug!(game_id = %self.slip.game.id, "submission already in flight, ignoring");
            return Ok(None);
        }

        self.phase = SlipPhase::Validating;
        if let Err(validation) = self.validate() {
            self.phase = SlipPhase::Building;
            warn!(game_id = %self.slip.game.id, error = %validation, "slip failed validation");
            return Err(validation.into());
        }

        self.phase = SlipPhase::Submitting;
        let submission = self.build_submission();
        info!(
            game_id = %submission.game_id,
            price = %submission.price,
            combinations = self.slip.combination_count(),
            "submitting prediction slip"
        );

        match self.api.submit_prediction(&submission).await {
            Ok(receipt) => {
                self.phase = SlipPhase::Succeeded;
                self.slip.clear();
                info!(form_id = %receipt.form_id, "slip accepted");
                Ok(Some(receipt))
            }
            Err(error) => {
                self.phase = SlipPhase::Rejected;
                warn!(game_id = %submission.game_id, error = %error, "slip submission failed");
                match error {
                    rejected @ Error::Rejected { .. } => Err(rejected),
                    Error::Http(_) | Error::Network(_) => Err(Error::network(
                        "the submission could not be delivered - please try again",
                    )),
                    other => Err(other),
                }
            }
        }
    }

    fn build_submission(&self) -> PredictionSubmission {
        let entries = self
            .slip
            .game
            .matches
            .iter()
            .filter_map(|m| {
                let outcomes = self.slip.selections().sorted_outcomes(&m.id);
                (!outcomes.is_empty()).then(|| MatchPrediction {
                    match_id: m.id.clone(),
                    outcomes,
                })
            })
            .collect();

        PredictionSubmission {
            game_id: self.slip.game.id.clone(),
            client_ref: Uuid::new_v4(),
            entries,
            price: self.slip.price(),
        }
    }
}
