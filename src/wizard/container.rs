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

//! Ordered step container and activation dispatch.

use anyhow::{bail, Result};
use tokio::sync::watch;
use tracing::{debug, info};

use super::step::{Step, StepInput};
use crate::state::{StepPhase, WizardState};

/// Owns the steps of a wizard and drives their activation as the current
/// position changes.
///
/// Readiness is not checked here. Whoever calls [`advance`](Self::advance)
/// is expected to consult the navigation port first.
pub struct StepContainer {
    steps: Vec<Box<dyn Step>>,
    state: WizardState,
    active: Option<usize>,
    title_tx: watch::Sender<Option<String>>,
}

impl StepContainer {
    /// Create a container. Nothing is activated until [`start`](Self::start).
    pub fn new(steps: Vec<Box<dyn Step>>) -> Result<Self> {
        if steps.is_empty() {
            bail!("a wizard needs at least one step");
        }
        let ids = steps.iter().map(|s| s.id().to_string()).collect();
        let (title_tx, _rx) = watch::channel(None);

        Ok(Self {
            steps,
            state: WizardState::new(ids),
            active: None,
            title_tx,
        })
    }

    /// Activate the first step. Does nothing if a step is already active.
    pub fn start(&mut self) {
        if self.active.is_none() {
            info!("Starting wizard with {} steps", self.steps.len());
            self.on_index_changed(self.state.position());
        }
    }

    /// Move to the next step. Returns `false` on the last step.
    pub fn advance(&mut self) -> bool {
        let next = self.state.position() + 1;
        if next < self.steps.len() {
            self.on_index_changed(next);
            true
        } else {
            false
        }
    }

    /// Move to the previous step. Returns `false` on the first step so the
    /// host can decide what backing out means.
    pub fn retreat(&mut self) -> bool {
        let position = self.state.position();
        if position > 0 {
            self.on_index_changed(position - 1);
            true
        } else {
            false
        }
    }

    /// Called by the paging surface. Deactivates the old step before
    /// activating the new one. Selecting the already-active index again is
    /// a no-op and returns `false`.
    ///
    /// Panics if `new_index` is out of range.
    pub fn on_index_changed(&mut self, new_index: usize) -> bool {
        assert!(
            new_index < self.steps.len(),
            "step index {} out of range for {} steps",
            new_index,
            self.steps.len()
        );
        if self.active == Some(new_index) {
            return false;
        }

        if let Some(old) = self.active.take() {
            debug!("Deselecting step {} ({})", old, self.steps[old].id());
            self.steps[old].on_not_selected();
            self.state.set_phase(old, StepPhase::Inactive);
        }

        self.state.set_position(new_index);
        self.active = Some(new_index);

        let step = &mut self.steps[new_index];
        debug!("Selecting step {} ({})", new_index, step.id());
        step.on_page_selected();
        self.state.set_phase(new_index, StepPhase::Active);

        if let Some(title) = step.title() {
            let title = title.to_string();
            self.title_tx.send_replace(Some(title));
        }
        true
    }

    /// Deactivate the current step without selecting another one.
    pub fn finish(&mut self) {
        if let Some(old) = self.active.take() {
            debug!("Finishing on step {} ({})", old, self.steps[old].id());
            self.steps[old].on_not_selected();
            self.state.set_phase(old, StepPhase::Inactive);
        }
    }

    /// Route input to the active step.
    pub fn dispatch_input(&mut self, input: &StepInput) {
        match self.active {
            Some(index) => self.steps[index].on_input(input),
            None => debug!("Dropping input with no active step: {:?}", input),
        }
    }

    /// Record the current continue state against the active position.
    pub fn record_readiness(&mut self, forward_enabled: bool) {
        if forward_enabled {
            if let Some(index) = self.active {
                self.state.mark_forward_enabled(index);
            }
        }
    }

    /// Observe the title of the active step.
    pub fn titles(&self) -> watch::Receiver<Option<String>> {
        self.title_tx.subscribe()
    }

    pub fn current(&self) -> usize {
        self.state.position()
    }

    pub fn active(&self) -> Option<usize> {
        self.active
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn is_last(&self) -> bool {
        self.state.position() + 1 == self.steps.len()
    }

    pub fn step_ids(&self) -> &[String] {
        self.state.step_ids()
    }

    pub fn state(&self) -> &WizardState {
        &self.state
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;
    use std::sync::Arc;

    struct RecordingStep {
        id: String,
        title: Option<String>,
        log: Arc<Mutex<Vec<String>>>,
    }

    impl Step for RecordingStep {
        fn id(&self) -> &str {
            &self.id
        }

        fn title(&self) -> Option<&str> {
            self.title.as_deref()
        }

        fn on_page_selected(&mut self) {
            self.log.lock().push(format!("activate {}", self.id));
        }

        fn on_not_selected(&mut self) {
            self.log.lock().push(format!("deactivate {}", self.id));
        }

        fn on_input(&mut self, input: &StepInput) {
            self.log.lock().push(format!("input {} {:?}", self.id, input));
        }
    }

    fn container(n: usize) -> (StepContainer, Arc<Mutex<Vec<String>>>) {
        let log = Arc::new(Mutex::new(Vec::new()));
        let steps = (0..n)
            .map(|i| {
                Box::new(RecordingStep {
                    id: i.to_string(),
                    title: (i % 2 == 0).then(|| format!("Title {}", i)),
                    log: log.clone(),
                }) as Box<dyn Step>
            })
            .collect();
        (StepContainer::new(steps).unwrap(), log)
    }

    fn take(log: &Arc<Mutex<Vec<String>>>) -> Vec<String> {
        std::mem::take(&mut *log.lock())
    }

    #[test]
    fn test_empty_container_rejected() {
        assert!(StepContainer::new(Vec::new()).is_err());
    }

    #[test]
    fn test_start_activates_first_step_once() {
        let (mut c, log) = container(3);
        c.start();
        c.start();
        assert_eq!(take(&log), vec!["activate 0"]);
        assert_eq!(c.active(), Some(0));
        assert_eq!(c.state().phase(0), StepPhase::Active);
    }

    #[test]
    fn test_advance_deactivates_before_activating() {
        let n = 4;
        let (mut c, log) = container(n);
        c.start();
        take(&log);

        for i in 0..n - 1 {
            assert!(c.advance());
            assert_eq!(c.current(), i + 1);
            assert_eq!(
                take(&log),
                vec![format!("deactivate {}", i), format!("activate {}", i + 1)]
            );
        }
        assert!(!c.advance());
        assert_eq!(c.current(), n - 1);
        assert!(take(&log).is_empty());
    }

    #[test]
    fn test_retreat_at_zero_is_noop() {
        let (mut c, log) = container(2);
        c.start();
        take(&log);

        assert!(!c.retreat());
        assert_eq!(c.current(), 0);
        assert_eq!(c.active(), Some(0));
        assert!(take(&log).is_empty());
    }

    #[test]
    fn test_retreat_moves_back() {
        let (mut c, log) = container(3);
        c.start();
        c.advance();
        take(&log);

        assert!(c.retreat());
        assert_eq!(c.current(), 0);
        assert_eq!(take(&log), vec!["deactivate 1", "activate 0"]);
        assert_eq!(c.state().phase(1), StepPhase::Inactive);
    }

    #[test]
    fn test_same_index_twice_does_not_refire() {
        let (mut c, log) = container(3);
        c.start();
        assert!(c.on_index_changed(2));
        assert!(!c.on_index_changed(2));
        assert_eq!(take(&log), vec!["activate 0", "deactivate 0", "activate 2"]);
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn test_out_of_range_index_panics() {
        let (mut c, _log) = container(2);
        c.on_index_changed(5);
    }

    #[test]
    fn test_title_follows_active_step() {
        let (mut c, _log) = container(3);
        let titles = c.titles();
        c.start();
        assert_eq!(titles.borrow().as_deref(), Some("Title 0"));

        // Step 1 has no title, the previous one stays.
        c.advance();
        assert_eq!(titles.borrow().as_deref(), Some("Title 0"));

        c.advance();
        assert_eq!(titles.borrow().as_deref(), Some("Title 2"));
    }

    #[test]
    fn test_input_reaches_active_step_only() {
        let (mut c, log) = container(2);
        c.dispatch_input(&StepInput::RedirectLoaded("a".into()));
        assert!(take(&log).is_empty());

        c.start();
        take(&log);
        c.dispatch_input(&StepInput::RedirectLoaded("b".into()));
        let entries = take(&log);
        assert_eq!(entries.len(), 1);
        assert!(entries[0].starts_with("input 0"));
    }

    #[test]
    fn test_finish_deactivates() {
        let (mut c, log) = container(2);
        c.start();
        take(&log);
        c.finish();
        c.finish();
        assert_eq!(take(&log), vec!["deactivate 0"]);
        assert_eq!(c.active(), None);
    }

    #[test]
    fn test_readiness_recorded_for_active_position() {
        let (mut c, _log) = container(2);
        c.start();
        c.record_readiness(false);
        assert!(!c.state().forward_enabled(0));
        c.record_readiness(true);
        c.advance();
        c.record_readiness(false);
        assert!(c.state().forward_enabled(0));
        assert!(!c.state().forward_enabled(1));
    }
}
