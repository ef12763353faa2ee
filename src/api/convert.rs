//! Wire-to-domain conversion.

use crate::state::{Currency, DepositDescriptor, DepositState, Game, Network, Outcome, TeamMatch};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;

/// A game as returned by the catalog collaborator.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameDto {
    pub id: String,
    pub name: String,
    pub deadline: DateTime<Utc>,
    pub matches: Vec<MatchDto>,
}

/// A match as returned by the catalog collaborator.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchDto {
    pub id: String,
    pub home_team: String,
    pub away_team: String,
    pub kickoff: DateTime<Utc>,
    #[serde(default)]
    pub result: Option<Outcome>,
    #[serde(default)]
    pub cancelled: bool,
}

/// Payment instructions as returned by the deposit collaborator.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DepositDto {
    pub deposit_id: String,
    pub address: String,
    pub expected_amount: Decimal,
    pub currency: Currency,
    pub network: Network,
    pub payment_uri: String,
    #[serde(default)]
    pub expires_at: Option<DateTime<Utc>>,
}

/// Deposit status response.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DepositStatusDto {
    pub status: DepositState,
}

/// Structured error body returned on a rejected request.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorBodyDto {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub field_errors: Option<Vec<FieldErrorDto>>,
}

/// One field-level validation message.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldErrorDto {
    pub field: String,
    pub message: String,
}

/// Converts wire DTOs into domain types.
pub struct WireConverter;

impl WireConverter {
    /// Convert a wire game to a domain game.
    pub fn convert_game(dto: GameDto) -> Game {
        Game {
            id: dto.id,
            name: dto.name,
            deadline: dto.deadline,
            matches: dto.matches.into_iter().map(Self::convert_match).collect(),
        }
    }

    /// Convert a wire match to a domain match.
    pub fn convert_match(dto: MatchDto) -> TeamMatch {
        TeamMatch {
            id: dto.id,
            home_team: dto.home_team,
            away_team: dto.away_team,
            kickoff: dto.kickoff,
            result: dto.result,
            cancelled: dto.cancelled,
        }
    }

    /// Convert wire payment instructions to a domain descriptor, stamping
    /// the issuance time.
    pub fn convert_descriptor(dto: DepositDto) -> DepositDescriptor {
        DepositDescriptor {
            deposit_id: dto.deposit_id,
            address: dto.address,
            expected_amount: dto.expected_amount,
            currency: dto.currency,
            network: dto.network,
            payment_uri: dto.payment_uri,
            issued_at: Utc::now(),
            expires_at: dto.expires_at,
        }
    }

    /// Flatten a structured error body into one human-readable message.
    /// Field-level messages are joined; returns `None` when the body carries
    /// nothing usable.
    pub fn rejection_message(body: ErrorBodyDto) -> Option<String> {
        if let Some(errors) = body.field_errors
            && !errors.is_empty()
        {
            return Some(
                errors
                    .into_iter()
                    .map(|e| format!("{}: {}", e.field, e.message))
                    .collect::<Vec<_>>()
                    .join("; "),
            );
        }
        body.message.filter(|m| !m.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_game_parses_from_wire_json() {
        let json = r#"{
            "id": "g42",
            "name": "Round 42",
            "deadline": "2026-03-07T12:00:00Z",
            "matches": [
                {
                    "id": "m1",
                    "homeTeam": "Arsenal",
                    "awayTeam": "Chelsea",
                    "kickoff": "2026-03-07T15:00:00Z",
                    "result": "X"
                }
            ]
        }"#;
        let game = WireConverter::convert_game(serde_json::from_str(json).unwrap());
        assert_eq!(game.id, "g42");
        assert_eq!(game.matches.len(), 1);
        assert_eq!(game.matches[0].result, Some(Outcome::Draw));
        assert!(!game.matches[0].cancelled);
    }

    #[test]
    fn test_status_parses_lowercase() {
        let dto: DepositStatusDto = serde_json::from_str(r#"{"status":"confirmed"}"#).unwrap();
        assert_eq!(dto.status, DepositState::Confirmed);
    }

    #[test]
    fn test_rejection_message_prefers_field_errors() {
        let body: ErrorBodyDto = serde_json::from_str(
            r#"{"message":"invalid form","fieldErrors":[
                {"field":"price","message":"does not match computed price"},
                {"field":"entries","message":"match m9 missing"}
            ]}"#,
        )
        .unwrap();
        assert_eq!(
            WireConverter::rejection_message(body).unwrap(),
            "price: does not match computed price; entries: match m9 missing"
        );
    }

    #[test]
    fn test_rejection_message_falls_back_to_message() {
        let body: ErrorBodyDto = serde_json::from_str(r#"{"message":"deadline passed"}"#).unwrap();
        assert_eq!(
            WireConverter::rejection_message(body).as_deref(),
            Some("deadline passed")
        );
        assert_eq!(WireConverter::rejection_message(ErrorBodyDto::default()), None);
    }
}
