// Copyright 2026 Daniel Pelikan
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Session input processing.
//!
//! A session owns the step container and applies every input on a single
//! task, so platform callbacks and user actions never race on wizard state.

use std::sync::Arc;
use tokio::sync::{mpsc, watch};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::platform::{PlatformEvent, PlatformHub};
use crate::state::WizardState;
use crate::wizard::{ContinueSignal, NavigationPort, StepContainer, StepInput};

/// Inputs a host feeds into a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionInput {
    /// The user pressed Continue.
    Next,
    /// The user pressed Back.
    Back,
    /// The paging surface settled on an index.
    PageSelected(usize),
    /// Something changed on the platform.
    Platform(PlatformEvent),
    /// Input for the active step.
    Step(StepInput),
    /// The host is closing the wizard.
    Close,
}

/// How a session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionOutcome {
    /// Continue was accepted on the last step.
    Completed,
    /// Back was pressed on the first step.
    Cancelled,
    /// The host closed the session or dropped its sender.
    Closed,
}

impl SessionOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionOutcome::Completed => "completed",
            SessionOutcome::Cancelled => "cancelled",
            SessionOutcome::Closed => "closed",
        }
    }
}

/// Drives one wizard run.
pub struct PairingSession {
    id: Uuid,
    container: StepContainer,
    hub: PlatformHub,
    signal: Arc<ContinueSignal>,
}

impl PairingSession {
    pub fn new(container: StepContainer, hub: PlatformHub, signal: Arc<ContinueSignal>) -> Self {
        Self {
            id: Uuid::new_v4(),
            container,
            hub,
            signal,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Activate the first step.
    pub fn start(&mut self) {
        info!(session = %self.id, "Session started");
        self.container.start();
        self.sync_readiness();
    }

    /// Apply one input. Returns the outcome once the session is over.
    pub fn process_input(&mut self, input: SessionInput) -> Option<SessionOutcome> {
        let outcome = match input {
            SessionInput::Next => self.handle_next(),
            SessionInput::Back => {
                if self.container.retreat() {
                    None
                } else {
                    info!(session = %self.id, "Back on first step");
                    Some(SessionOutcome::Cancelled)
                }
            }
            SessionInput::PageSelected(index) => {
                self.handle_page_selected(index);
                None
            }
            SessionInput::Platform(event) => {
                let delivered = self.hub.publish(&event);
                debug!("Platform event {:?} reached {} listener(s)", event, delivered);
                None
            }
            SessionInput::Step(input) => {
                self.container.dispatch_input(&input);
                None
            }
            SessionInput::Close => Some(SessionOutcome::Closed),
        };

        if let Some(outcome) = outcome {
            self.finish(outcome);
        } else {
            self.sync_readiness();
        }
        outcome
    }

    /// Run until an outcome is reached or every sender is dropped.
    pub async fn run(mut self, mut rx: mpsc::Receiver<SessionInput>) -> SessionOutcome {
        self.start();
        while let Some(input) = rx.recv().await {
            if let Some(outcome) = self.process_input(input) {
                return outcome;
            }
        }
        self.finish(SessionOutcome::Closed);
        SessionOutcome::Closed
    }

    fn handle_next(&mut self) -> Option<SessionOutcome> {
        if !self.signal.is_continue_enabled() {
            debug!("Continue pressed while disabled on step {}", self.container.current());
            return None;
        }
        if self.container.advance() {
            None
        } else {
            Some(SessionOutcome::Completed)
        }
    }

    fn handle_page_selected(&mut self, index: usize) {
        if index >= self.container.len() {
            warn!("Ignoring page {} of {}", index, self.container.len());
            return;
        }
        let current = self.container.current();
        if index > current + 1 {
            // Every step in between has to run its own readiness check.
            debug!("Blocked jump from {} to {}", current, index);
            return;
        }
        if index > current && !self.signal.is_continue_enabled() {
            debug!("Blocked paging forward to {}", index);
            return;
        }
        self.container.on_index_changed(index);
    }

    fn sync_readiness(&mut self) {
        self.container
            .record_readiness(self.signal.is_continue_enabled());
    }

    fn finish(&mut self, outcome: SessionOutcome) {
        self.sync_readiness();
        self.container.finish();
        self.signal.disable_continue();
        info!(
            session = %self.id,
            outcome = outcome.as_str(),
            ready = self.container.state().ready_count(),
            "Session finished"
        );
    }

    pub fn state(&self) -> &WizardState {
        self.container.state()
    }

    pub fn current(&self) -> usize {
        self.container.current()
    }

    pub fn is_continue_enabled(&self) -> bool {
        self.signal.is_continue_enabled()
    }

    pub fn continue_signal(&self) -> watch::Receiver<bool> {
        self.signal.subscribe()
    }

    pub fn titles(&self) -> watch::Receiver<Option<String>> {
        self.container.titles()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wizard::Step;

    struct Gate {
        id: String,
        ready: bool,
        signal: Arc<ContinueSignal>,
    }

    impl Step for Gate {
        fn id(&self) -> &str {
            &self.id
        }

        fn on_page_selected(&mut self) {
            if self.ready {
                self.signal.enable_continue();
            } else {
                self.signal.disable_continue();
            }
        }
    }

    fn session(ready: &[bool]) -> PairingSession {
        let signal = Arc::new(ContinueSignal::new());
        let steps = ready
            .iter()
            .enumerate()
            .map(|(i, ready)| {
                Box::new(Gate {
                    id: format!("gate-{}", i),
                    ready: *ready,
                    signal: signal.clone(),
                }) as Box<dyn Step>
            })
            .collect();
        let container = StepContainer::new(steps).unwrap();
        PairingSession::new(container, PlatformHub::new(), signal)
    }

    #[test]
    fn test_next_blocked_while_disabled() {
        let mut s = session(&[false, true]);
        s.start();
        assert_eq!(s.process_input(SessionInput::Next), None);
        assert_eq!(s.current(), 0);
    }

    #[test]
    fn test_next_through_to_completion() {
        let mut s = session(&[true, true]);
        s.start();
        assert_eq!(s.process_input(SessionInput::Next), None);
        assert_eq!(s.current(), 1);
        assert_eq!(
            s.process_input(SessionInput::Next),
            Some(SessionOutcome::Completed)
        );
        assert_eq!(s.state().ready_count(), 2);
        assert!(!s.is_continue_enabled());
    }

    #[test]
    fn test_back_on_first_step_cancels() {
        let mut s = session(&[true, true]);
        s.start();
        assert_eq!(
            s.process_input(SessionInput::Back),
            Some(SessionOutcome::Cancelled)
        );
    }

    #[test]
    fn test_page_selection_rules() {
        let mut s = session(&[false, true, true]);
        s.start();

        s.process_input(SessionInput::PageSelected(9));
        assert_eq!(s.current(), 0);

        s.process_input(SessionInput::PageSelected(2));
        assert_eq!(s.current(), 0);
    }

    #[test]
    fn test_page_jump_cannot_skip_blocked_steps() {
        let mut s = session(&[true, false, true, true]);
        s.start();
        assert!(s.is_continue_enabled());

        s.process_input(SessionInput::PageSelected(3));
        assert_eq!(s.current(), 0);
        assert!(!s.state().forward_enabled(1));

        s.process_input(SessionInput::PageSelected(1));
        assert_eq!(s.current(), 1);

        s.process_input(SessionInput::PageSelected(2));
        assert_eq!(s.current(), 1);

        // Paging back any distance is allowed
        s.process_input(SessionInput::PageSelected(0));
        assert_eq!(s.current(), 0);
    }

    #[tokio::test]
    async fn test_run_ends_when_sender_dropped() {
        let s = session(&[true]);
        let (tx, rx) = mpsc::channel(4);
        drop(tx);
        assert_eq!(s.run(rx).await, SessionOutcome::Closed);
    }

    #[tokio::test]
    async fn test_run_processes_queue_in_order() {
        let s = session(&[true, true]);
        let (tx, rx) = mpsc::channel(4);
        tx.send(SessionInput::Next).await.unwrap();
        tx.send(SessionInput::Back).await.unwrap();
        tx.send(SessionInput::Back).await.unwrap();
        assert_eq!(s.run(rx).await, SessionOutcome::Cancelled);
    }
}
