//! Deposit initiation.

use crate::api::DepositApi;
use crate::error::{Error, Result};
use crate::state::{Currency, DepositDescriptor, DepositRequest, Network};
use rust_decimal::Decimal;
use std::sync::Arc;
use tracing::info;

/// Initiates deposit requests against the deposit collaborator.
///
/// Input constraints are enforced locally before anything is sent: the
/// amount must be strictly positive and the currency/network pairing must be
/// a supported one. Exactly one external call is made per intent and a
/// failed call is never retried automatically - the caller stays in its
/// pre-initiation state.
pub struct DepositRequestController {
    api: Arc<dyn DepositApi>,
}

impl DepositRequestController {
    /// Create a controller backed by the given collaborator.
    pub fn new(api: Arc<dyn DepositApi>) -> Self {
        Self { api }
    }

    /// Request payment instructions for a deposit.
    pub async fn initiate(
        &self,
        amount: Decimal,
        currency: Currency,
        network: Network,
    ) -> Result<DepositDescriptor> {
        if amount <= Decimal::ZERO {
            return Err(Error::invalid_input("deposit amount must be positive"));
        }
        if !currency.supports_network(network) {
            return Err(Error::invalid_input(format!(
                "{currency} deposits are not supported on {network}"
            )));
        }

        let request = DepositRequest {
            amount,
            currency,
            network,
        };
        info!(%amount, %currency, %network, "initiating deposit");
        let descriptor = self.api.initiate_deposit(&request).await?;
        info!(
            deposit_id = %descriptor.deposit_id,
            pairing = %descriptor.pairing_label(),
            "deposit descriptor issued"
        );
        Ok(descriptor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::MockDepositApi;
    use chrono::Utc;
    use mockall::predicate::eq;
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    fn descriptor_for(request: &DepositRequest) -> DepositDescriptor {
        DepositDescriptor {
            deposit_id: "dep-1".to_string(),
            address: "bc1qexample".to_string(),
            expected_amount: request.amount,
            currency: request.currency,
            network: request.network,
            payment_uri: "bitcoin:bc1qexample?amount=0.5".to_string(),
            issued_at: Utc::now(),
            expires_at: None,
        }
    }

    #[tokio::test]
    async fn test_non_positive_amount_rejected_locally() {
        // No expectations: any network call would panic.
        let controller = DepositRequestController::new(Arc::new(MockDepositApi::new()));
        for amount in [dec!(0), dec!(-1)] {
            let error = controller
                .initiate(amount, Currency::Btc, Network::Bitcoin)
                .await
                .unwrap_err();
            assert!(matches!(error, Error::InvalidInput(_)));
        }
    }

    #[tokio::test]
    async fn test_unsupported_pairing_rejected_locally() {
        let controller = DepositRequestController::new(Arc::new(MockDepositApi::new()));
        let error = controller
            .initiate(dec!(100), Currency::Btc, Network::Tron)
            .await
            .unwrap_err();
        assert_eq!(
            error.to_string(),
            "Invalid input: BTC deposits are not supported on Tron"
        );
    }

    #[tokio::test]
    async fn test_valid_request_sent_exactly_once() {
        let expected = DepositRequest {
            amount: dec!(0.5),
            currency: Currency::Btc,
            network: Network::Bitcoin,
        };
        let mut api = MockDepositApi::new();
        api.expect_initiate_deposit()
            .with(eq(expected.clone()))
            .times(1)
            .returning(|request| Ok(descriptor_for(request)));

        let controller = DepositRequestController::new(Arc::new(api));
        let descriptor = controller
            .initiate(dec!(0.5), Currency::Btc, Network::Bitcoin)
            .await
            .unwrap();
        assert_eq!(descriptor.deposit_id, "dep-1");
        assert_eq!(descriptor.expected_amount, dec!(0.5));
    }

    #[tokio::test]
    async fn test_collaborator_error_passes_through() {
        let mut api = MockDepositApi::new();
        api.expect_initiate_deposit()
            .times(1)
            .returning(|_| Err(Error::network("gateway unavailable")));

        let controller = DepositRequestController::new(Arc::new(api));
        let error = controller
            .initiate(dec!(25), Currency::Usdt, Network::Tron)
            .await
            .unwrap_err();
        assert!(matches!(error, Error::Network(_)));
    }
}
