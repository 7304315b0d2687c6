//! Application state and composition.

use std::sync::Arc;

use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;

use crate::infrastructure::{
    assistant_client::AssistantClient,
    clock::SystemClock,
    config::ConsoleConfig,
    ports::{AssistantPort, ClockPort, SimulationPort},
    simulation_client::SimulationClient,
};
use crate::session::Session;
use crate::use_cases::{
    BackendPoller, DispatchError, DispatchOutcome, InstructionDispatcher, PollLoop,
};

/// Main application state.
///
/// Owns the session and the two use cases writing to it, plus the handle of
/// the running poll loop.
pub struct App {
    pub config: ConsoleConfig,
    pub session: Arc<Session>,
    pub poller: Arc<BackendPoller>,
    pub dispatcher: Arc<InstructionDispatcher>,
    poll_loop: Mutex<Option<PollLoop>>,
    shutdown: CancellationToken,
}

impl App {
    pub fn new(
        config: ConsoleConfig,
        simulation: Arc<dyn SimulationPort>,
        assistant: Arc<dyn AssistantPort>,
        clock: Arc<dyn ClockPort>,
    ) -> Self {
        let session = Arc::new(Session::new());
        let poller = Arc::new(BackendPoller::new(
            session.clone(),
            simulation,
            assistant.clone(),
            clock.clone(),
        ));
        let dispatcher = Arc::new(
            InstructionDispatcher::new(session.clone(), assistant, clock)
                .with_surfaced_failures(config.surface_dispatch_failures),
        );

        Self {
            config,
            session,
            poller,
            dispatcher,
            poll_loop: Mutex::new(None),
            shutdown: CancellationToken::new(),
        }
    }

    /// Wire the HTTP clients and the system clock.
    pub fn from_config(config: ConsoleConfig) -> Self {
        let simulation = Arc::new(SimulationClient::new(
            &config.simulation_url,
            config.request_timeout,
        ));
        let assistant = Arc::new(AssistantClient::new(
            &config.assistant_status_url,
            &config.assistant_url,
            config.request_timeout,
        ));

        tracing::info!(
            simulation_url = %config.simulation_url,
            assistant_status_url = %config.assistant_status_url,
            assistant_url = %config.assistant_url,
            poll_interval_secs = config.poll_interval.as_secs(),
            "Backends configured"
        );

        Self::new(config, simulation, assistant, Arc::new(SystemClock::new()))
    }

    /// Token cancelled when the console shuts down.
    pub fn shutdown_token(&self) -> CancellationToken {
        self.shutdown.clone()
    }

    /// Start the poll loop unless one is already running.
    pub async fn start_polling(&self) {
        let mut slot = self.poll_loop.lock().await;
        if slot.as_ref().is_some_and(|running| !running.is_finished()) {
            return;
        }
        let poll_loop = self
            .poller
            .clone()
            .spawn(self.config.poll_interval, self.shutdown.child_token());
        *slot = Some(poll_loop);
        tracing::debug!("Poll loop started");
    }

    pub async fn stop_polling(&self) {
        if let Some(poll_loop) = self.poll_loop.lock().await.take() {
            poll_loop.stop().await;
        }
    }

    pub async fn submit(&self, text: &str) -> Result<DispatchOutcome, DispatchError> {
        self.dispatcher.submit(text).await
    }

    /// Clear the session and poll both backends again from scratch.
    ///
    /// Waits for an in-flight instruction so its reply cannot land in the
    /// fresh session.
    pub async fn reset(&self) {
        self.stop_polling().await;
        {
            let _idle = self.dispatcher.quiesce().await;
            self.session.reset().await;
        }
        self.start_polling().await;
    }

    pub async fn shutdown(&self) {
        self.shutdown.cancel();
        self.stop_polling().await;
        tracing::info!("Console shutdown complete");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::clock::FixedClock;
    use crate::infrastructure::ports::{MockAssistantPort, MockSimulationPort};
    use simdeck_shared::{PromptReply, SimulationReport};
    use std::time::Duration;

    fn app(simulation: MockSimulationPort, assistant: MockAssistantPort) -> App {
        App::new(
            ConsoleConfig {
                poll_interval: Duration::from_secs(1),
                ..ConsoleConfig::default()
            },
            Arc::new(simulation),
            Arc::new(assistant),
            Arc::new(FixedClock::at(11, 0, 0)),
        )
    }

    fn report() -> SimulationReport {
        SimulationReport {
            message: "Scene loaded successfully:Workshop".to_string(),
            available_prefabs: "wrench".to_string(),
            current_objects: "Engine Block".to_string(),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn reset_restarts_polling_from_scratch() {
        let mut simulation = MockSimulationPort::new();
        simulation
            .expect_fetch_status()
            .times(2)
            .returning(|| Ok(Some(report())));
        let mut assistant = MockAssistantPort::new();
        assistant.expect_llm_status().times(2).returning(|| Ok(true));
        assistant.expect_submit_prompt().returning(|_| {
            Ok(PromptReply::Advisory {
                message: "ok".to_string(),
            })
        });
        let app = app(simulation, assistant);

        app.start_polling().await;
        tokio::time::sleep(Duration::from_secs(3)).await;
        assert!(app.session.both_connected().await);
        app.submit("hello").await.unwrap();
        assert_eq!(app.session.snapshot().await.state.timeline.len(), 3);

        app.reset().await;
        tokio::time::sleep(Duration::from_secs(3)).await;

        let state = app.session.snapshot().await.state;
        assert!(state.both_connected());
        // Only the fresh simulation report
        assert_eq!(state.timeline.len(), 1);
        app.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn shutdown_stops_polling() {
        let mut simulation = MockSimulationPort::new();
        simulation.expect_fetch_status().returning(|| Ok(None));
        let mut assistant = MockAssistantPort::new();
        assistant.expect_llm_status().returning(|| Ok(false));
        let app = app(simulation, assistant);

        app.start_polling().await;
        // Starting twice keeps the one loop
        app.start_polling().await;
        tokio::time::sleep(Duration::from_secs(2)).await;

        app.shutdown().await;
        assert!(app.shutdown_token().is_cancelled());
        assert!(app.poll_loop.lock().await.is_none());
    }
}
