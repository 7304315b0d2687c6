//! Backend poller - establishes connection status for both backends.
//!
//! Each tick queries the simulation and the assistant concurrently. The two
//! requests are separate failure domains: one failing never delays or blocks
//! the other, and a failure never changes session state. A backend that is
//! already connected is not queried again, and the loop ends once both are.

use std::sync::Arc;
use std::time::Duration;

use simdeck_domain::Backend;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

use crate::infrastructure::ports::{AssistantPort, ClockPort, SimulationPort};
use crate::session::{Session, SessionUpdate};

/// Result of polling one backend once.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollOutcome {
    /// Valid payload received; the backend is now connected
    Connected,
    /// Backend answered but has nothing to report yet
    NotReady,
    /// Network failure or malformed payload, retried next tick
    Failed,
    /// Backend was already connected and was not queried
    Skipped,
}

/// Outcomes of one tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickOutcome {
    pub simulation: PollOutcome,
    pub assistant: PollOutcome,
}

pub struct BackendPoller {
    session: Arc<Session>,
    simulation: Arc<dyn SimulationPort>,
    assistant: Arc<dyn AssistantPort>,
    clock: Arc<dyn ClockPort>,
}

impl BackendPoller {
    pub fn new(
        session: Arc<Session>,
        simulation: Arc<dyn SimulationPort>,
        assistant: Arc<dyn AssistantPort>,
        clock: Arc<dyn ClockPort>,
    ) -> Self {
        Self {
            session,
            simulation,
            assistant,
            clock,
        }
    }

    /// Query the simulation once and merge a non-empty report.
    pub async fn poll_simulation_status(&self) -> PollOutcome {
        match self.simulation.fetch_status().await {
            Ok(Some(report)) => {
                let at = self.clock.now().time();
                let outcome = self
                    .session
                    .apply(SessionUpdate::SimulationReported { report, at })
                    .await;
                if outcome.connected.is_some() {
                    tracing::info!(backend = %Backend::Simulation, "Backend connected");
                }
                PollOutcome::Connected
            }
            Ok(None) => {
                tracing::debug!(backend = %Backend::Simulation, "Backend has not reported yet");
                PollOutcome::NotReady
            }
            Err(e) => {
                tracing::warn!(
                    backend = %Backend::Simulation,
                    error = %e,
                    network = e.is_network_failure(),
                    "Status poll failed, retrying next tick"
                );
                PollOutcome::Failed
            }
        }
    }

    /// Query the assistant's readiness once.
    pub async fn poll_assistant_status(&self) -> PollOutcome {
        match self.assistant.llm_status().await {
            Ok(true) => {
                let outcome = self.session.apply(SessionUpdate::AssistantReady).await;
                if outcome.connected.is_some() {
                    tracing::info!(backend = %Backend::Assistant, "Backend connected");
                }
                PollOutcome::Connected
            }
            Ok(false) => {
                tracing::debug!(backend = %Backend::Assistant, "Backend not ready yet");
                PollOutcome::NotReady
            }
            Err(e) => {
                tracing::warn!(
                    backend = %Backend::Assistant,
                    error = %e,
                    network = e.is_network_failure(),
                    "Status poll failed, retrying next tick"
                );
                PollOutcome::Failed
            }
        }
    }

    /// Poll every backend that is not connected yet, concurrently.
    pub async fn tick(&self) -> TickOutcome {
        let (simulation_connected, assistant_connected) = self
            .session
            .read(|state| {
                (
                    state.simulation.is_connected(),
                    state.assistant.is_connected(),
                )
            })
            .await;

        let simulation = async {
            if simulation_connected {
                PollOutcome::Skipped
            } else {
                self.poll_simulation_status().await
            }
        };
        let assistant = async {
            if assistant_connected {
                PollOutcome::Skipped
            } else {
                self.poll_assistant_status().await
            }
        };

        let (simulation, assistant) = tokio::join!(simulation, assistant);
        tracing::debug!(?simulation, ?assistant, "Poll tick finished");
        TickOutcome {
            simulation,
            assistant,
        }
    }

    /// Start the recurring poll task. The first tick runs immediately.
    pub fn spawn(self: Arc<Self>, period: Duration, cancel: CancellationToken) -> PollLoop {
        let token = cancel.clone();
        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    _ = token.cancelled() => break,
                    _ = ticker.tick() => {}
                }
                // Cancelling mid-tick drops in-flight requests before they
                // reach the session
                tokio::select! {
                    _ = token.cancelled() => break,
                    _ = self.tick() => {}
                }
                if self.session.both_connected().await {
                    tracing::info!("Both backends connected, poll loop finished");
                    break;
                }
            }
        });

        PollLoop { handle, cancel }
    }
}

/// Handle to a running poll loop.
pub struct PollLoop {
    handle: JoinHandle<()>,
    cancel: CancellationToken,
}

impl PollLoop {
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Cancel the loop and wait until it has exited.
    pub async fn stop(self) {
        self.cancel.cancel();
        self.join().await;
    }

    /// Wait for the loop to exit on its own.
    pub async fn join(self) {
        if let Err(e) = self.handle.await {
            tracing::error!(error = %e, "Poll loop task failed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::clock::FixedClock;
    use crate::infrastructure::ports::{BackendError, MockAssistantPort, MockSimulationPort};
    use crate::session::SessionState;
    use simdeck_domain::EntryOrigin;
    use simdeck_shared::{ProtocolError, SimulationReport};
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn report() -> SimulationReport {
        SimulationReport {
            message: "Scene loaded successfully:Workshop".to_string(),
            available_prefabs: "wrench, spark_plug".to_string(),
            current_objects: "Engine Block, Main Camera".to_string(),
        }
    }

    fn poller(
        simulation: MockSimulationPort,
        assistant: MockAssistantPort,
    ) -> (Arc<BackendPoller>, Arc<Session>) {
        let session = Arc::new(Session::new());
        let poller = BackendPoller::new(
            session.clone(),
            Arc::new(simulation),
            Arc::new(assistant),
            Arc::new(FixedClock::at(9, 30, 0)),
        );
        (Arc::new(poller), session)
    }

    #[tokio::test]
    async fn simulation_report_connects_and_fills_inventories() {
        let mut simulation = MockSimulationPort::new();
        simulation
            .expect_fetch_status()
            .times(1)
            .returning(|| Ok(Some(report())));
        let (poller, session) = poller(simulation, MockAssistantPort::new());

        assert_eq!(poller.poll_simulation_status().await, PollOutcome::Connected);

        let state = session.snapshot().await.state;
        assert!(state.simulation.is_connected());
        assert!(!state.assistant.is_connected());
        assert_eq!(state.available.names(), &["wrench", "spark_plug"]);
        assert_eq!(state.scene.names(), &["Engine Block", "Main Camera"]);

        let entry = state.timeline.get(0).unwrap();
        assert_eq!(entry.origin(), EntryOrigin::FromSimulation);
        assert_eq!(entry.message(), "Scene loaded successfully:Workshop");
        assert_eq!(entry.timestamp(), "09:30:00");
    }

    #[tokio::test]
    async fn empty_report_is_not_ready() {
        let mut simulation = MockSimulationPort::new();
        simulation.expect_fetch_status().returning(|| Ok(None));
        let (poller, session) = poller(simulation, MockAssistantPort::new());

        assert_eq!(poller.poll_simulation_status().await, PollOutcome::NotReady);
        assert_eq!(session.snapshot().await.state, SessionState::default());
    }

    #[tokio::test]
    async fn assistant_flag_drives_connection() {
        let mut assistant = MockAssistantPort::new();
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        assistant
            .expect_llm_status()
            .returning(move || Ok(counter.fetch_add(1, Ordering::SeqCst) > 0));
        let (poller, session) = poller(MockSimulationPort::new(), assistant);

        assert_eq!(poller.poll_assistant_status().await, PollOutcome::NotReady);
        assert!(!session.is_connected(Backend::Assistant).await);

        assert_eq!(poller.poll_assistant_status().await, PollOutcome::Connected);
        assert!(session.is_connected(Backend::Assistant).await);
        assert!(session.snapshot().await.state.timeline.is_empty());
    }

    #[tokio::test]
    async fn failures_leave_state_untouched() {
        let mut simulation = MockSimulationPort::new();
        simulation
            .expect_fetch_status()
            .returning(|| Err(ProtocolError::malformed("response is a number").into()));
        let mut assistant = MockAssistantPort::new();
        assistant
            .expect_llm_status()
            .returning(|| Err(BackendError::Network("connection refused".into())));
        let (poller, session) = poller(simulation, assistant);

        let outcome = poller.tick().await;

        assert_eq!(outcome.simulation, PollOutcome::Failed);
        assert_eq!(outcome.assistant, PollOutcome::Failed);
        assert_eq!(session.snapshot().await.state, SessionState::default());
    }

    #[tokio::test]
    async fn one_failing_backend_does_not_block_the_other() {
        let mut simulation = MockSimulationPort::new();
        simulation
            .expect_fetch_status()
            .returning(|| Err(BackendError::Network("timed out".into())));
        let mut assistant = MockAssistantPort::new();
        assistant.expect_llm_status().returning(|| Ok(true));
        let (poller, session) = poller(simulation, assistant);

        let outcome = poller.tick().await;

        assert_eq!(
            outcome,
            TickOutcome {
                simulation: PollOutcome::Failed,
                assistant: PollOutcome::Connected,
            }
        );
        assert!(session.is_connected(Backend::Assistant).await);
        assert!(!session.is_connected(Backend::Simulation).await);
    }

    #[tokio::test]
    async fn connected_backend_is_not_polled_again() {
        let mut simulation = MockSimulationPort::new();
        simulation
            .expect_fetch_status()
            .times(1)
            .returning(|| Ok(Some(report())));
        let mut assistant = MockAssistantPort::new();
        assistant.expect_llm_status().times(2).returning(|| Ok(false));
        let (poller, session) = poller(simulation, assistant);

        poller.tick().await;
        let second = poller.tick().await;

        assert_eq!(second.simulation, PollOutcome::Skipped);
        assert_eq!(second.assistant, PollOutcome::NotReady);
        // Only the first report reached the timeline
        assert_eq!(session.snapshot().await.state.timeline.len(), 1);
    }

    #[tokio::test]
    async fn connection_is_sticky_across_failures() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        let mut assistant = MockAssistantPort::new();
        assistant.expect_llm_status().returning(move || {
            if counter.fetch_add(1, Ordering::SeqCst) == 0 {
                Ok(true)
            } else {
                Err(BackendError::Network("connection reset".into()))
            }
        });
        let (poller, session) = poller(MockSimulationPort::new(), assistant);

        poller.poll_assistant_status().await;
        assert_eq!(poller.poll_assistant_status().await, PollOutcome::Failed);

        assert!(session.is_connected(Backend::Assistant).await);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn loop_retries_until_both_connected_then_stops() {
        let sim_calls = Arc::new(AtomicUsize::new(0));
        let counter = sim_calls.clone();
        let mut simulation = MockSimulationPort::new();
        simulation.expect_fetch_status().returning(move || {
            match counter.fetch_add(1, Ordering::SeqCst) {
                0 => Err(BackendError::Network("connection refused".into())),
                1 => Ok(None),
                _ => Ok(Some(report())),
            }
        });
        let mut assistant = MockAssistantPort::new();
        assistant.expect_llm_status().times(1).returning(|| Ok(true));
        let (poller, session) = poller(simulation, assistant);

        let poll_loop = poller.spawn(Duration::from_secs(5), CancellationToken::new());
        poll_loop.join().await;

        assert!(session.both_connected().await);
        assert_eq!(sim_calls.load(Ordering::SeqCst), 3);
        assert_eq!(session.snapshot().await.state.timeline.len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn cancelled_loop_stops_polling() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        let mut simulation = MockSimulationPort::new();
        simulation.expect_fetch_status().returning(move || {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(None)
        });
        let mut assistant = MockAssistantPort::new();
        assistant.expect_llm_status().returning(|| Ok(false));
        let (poller, session) = poller(simulation, assistant);

        let poll_loop = poller.spawn(Duration::from_secs(5), CancellationToken::new());
        tokio::time::sleep(Duration::from_secs(12)).await;
        assert!(!poll_loop.is_finished());

        poll_loop.stop().await;
        let after_stop = calls.load(Ordering::SeqCst);
        tokio::time::sleep(Duration::from_secs(30)).await;

        assert!(after_stop >= 1);
        assert_eq!(calls.load(Ordering::SeqCst), after_stop);
        assert!(!session.both_connected().await);
    }
}
