//! Deposit engines: request initiation and lifecycle monitoring.

mod monitor;
mod request;

pub use monitor::{DepositEvent, DepositMonitor};
pub use request::DepositRequestController;

use crate::api::DepositApi;
use crate::config::DepositConfig;
use crate::error::{Error, Result};
use crate::state::{Currency, DepositDescriptor, DepositState, Network};
use rust_decimal::Decimal;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::info;

/// Drives one deposit at a time from composition through its lifecycle.
///
/// Owns the request controller and, once a descriptor is issued, the
/// monitor. [`DepositFlow::reset`] discards the current deposit entirely -
/// identifier, timers and descriptor - and returns to composition; nothing
/// of the old deposit is ever polled again.
pub struct DepositFlow {
    api: Arc<dyn DepositApi>,
    config: DepositConfig,
    events: mpsc::UnboundedSender<DepositEvent>,
    controller: DepositRequestController,
    monitor: Option<DepositMonitor>,
}

impl DepositFlow {
    /// Create a flow backed by the given collaborator.
    pub fn new(
        api: Arc<dyn DepositApi>,
        config: DepositConfig,
        events: mpsc::UnboundedSender<DepositEvent>,
    ) -> Self {
        Self {
            controller: DepositRequestController::new(Arc::clone(&api)),
            api,
            config,
            events,
            monitor: None,
        }
    }

    /// Initiate a deposit and start watching it.
    ///
    /// On failure no monitor is started and the flow stays in composition,
    /// exactly as before the call.
    pub async fn initiate(
        &mut self,
        amount: Decimal,
        currency: Currency,
        network: Network,
    ) -> Result<DepositDescriptor> {
        if self.monitor.is_some() {
            return Err(Error::invalid_input(
                "a deposit is already being watched - reset it first",
            ));
        }

        let descriptor = self.controller.initiate(amount, currency, network).await?;
        self.monitor = Some(DepositMonitor::start(
            descriptor.clone(),
            Arc::clone(&self.api),
            &self.config,
            self.events.clone(),
        ));
        Ok(descriptor)
    }

    /// The active monitor, if a deposit is being watched.
    pub fn monitor(&self) -> Option<&DepositMonitor> {
        self.monitor.as_ref()
    }

    /// The current lifecycle state, if a deposit is being watched.
    pub fn state(&self) -> Option<DepositState> {
        self.monitor.as_ref().map(DepositMonitor::state)
    }

    /// Discard the current deposit and return to composition.
    ///
    /// Works from `Pending` and from any terminal state; both timers stop
    /// and the descriptor is dropped.
    pub fn reset(&mut self) {
        if let Some(monitor) = self.monitor.take() {
            info!(deposit_id = %monitor.deposit_id(), "deposit flow reset");
            monitor.cancel();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::MockDepositApi;
    use chrono::Utc;
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    fn pending_api() -> (MockDepositApi, Arc<AtomicUsize>) {
        let polls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&polls);
        let mut api = MockDepositApi::new();
        api.expect_initiate_deposit().returning(|request| {
            Ok(DepositDescriptor {
                deposit_id: "dep-1".to_string(),
                address: "bc1qexample".to_string(),
                expected_amount: request.amount,
                currency: request.currency,
                network: request.network,
                payment_uri: "bitcoin:bc1qexample".to_string(),
                issued_at: Utc::now(),
                expires_at: None,
            })
        });
        api.expect_deposit_status().returning(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(DepositState::Pending)
        });
        (api, polls)
    }

    fn flow_with(api: MockDepositApi) -> DepositFlow {
        let (events_tx, _events_rx) = mpsc::unbounded_channel();
        DepositFlow::new(
            Arc::new(api),
            DepositConfig {
                window_secs: 600,
                poll_interval_secs: 5,
            },
            events_tx,
        )
    }

    #[tokio::test(start_paused = true)]
    async fn test_initiate_starts_watching() {
        let (api, polls) = pending_api();
        let mut flow = flow_with(api);

        let descriptor = flow
            .initiate(dec!(0.5), Currency::Btc, Network::Bitcoin)
            .await
            .unwrap();
        assert_eq!(descriptor.deposit_id, "dep-1");
        assert_eq!(flow.state(), Some(DepositState::Pending));

        tokio::time::sleep(Duration::from_secs(11)).await;
        assert_eq!(polls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_second_initiate_requires_reset() {
        let (api, _polls) = pending_api();
        let mut flow = flow_with(api);

        flow.initiate(dec!(0.5), Currency::Btc, Network::Bitcoin)
            .await
            .unwrap();
        let error = flow
            .initiate(dec!(1), Currency::Btc, Network::Bitcoin)
            .await
            .unwrap_err();
        assert!(matches!(error, Error::InvalidInput(_)));

        flow.reset();
        assert!(flow.monitor().is_none());
        flow.initiate(dec!(1), Currency::Btc, Network::Bitcoin)
            .await
            .unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_reset_stops_polling_the_old_deposit() {
        let (api, polls) = pending_api();
        let mut flow = flow_with(api);

        flow.initiate(dec!(0.5), Currency::Btc, Network::Bitcoin)
            .await
            .unwrap();
        tokio::time::sleep(Duration::from_secs(6)).await;
        assert!(polls.load(Ordering::SeqCst) >= 1);

        flow.reset();
        assert!(flow.state().is_none());

        // A discarded identifier is never polled again.
        let polls_at_reset = polls.load(Ordering::SeqCst);
        tokio::time::sleep(Duration::from_secs(300)).await;
        assert_eq!(polls.load(Ordering::SeqCst), polls_at_reset);
    }

    #[tokio::test]
    async fn test_failed_initiation_leaves_composition_state() {
        let mut api = MockDepositApi::new();
        api.expect_initiate_deposit()
            .times(1)
            .returning(|_| Err(Error::network("gateway unavailable")));
        let mut flow = flow_with(api);

        let error = flow
            .initiate(dec!(0.5), Currency::Btc, Network::Bitcoin)
            .await
            .unwrap_err();
        assert!(matches!(error, Error::Network(_)));
        assert!(flow.monitor().is_none());
        assert!(flow.state().is_none());
    }
}
