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

//! Wizard state tracking.

use serde::Serialize;

/// Lifecycle phase of a single step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StepPhase {
    NotYetShown,
    Active,
    Inactive,
}

/// Ordered step ids, the current position, and what each position has
/// reached so far.
#[derive(Debug, Clone, Serialize)]
pub struct WizardState {
    step_ids: Vec<String>,
    position: usize,
    phases: Vec<StepPhase>,
    forward_enabled: Vec<bool>,
}

impl WizardState {
    /// Create state for a non-empty step sequence, positioned at 0.
    pub fn new(step_ids: Vec<String>) -> Self {
        assert!(!step_ids.is_empty(), "wizard needs at least one step");
        let len = step_ids.len();
        Self {
            step_ids,
            position: 0,
            phases: vec![StepPhase::NotYetShown; len],
            forward_enabled: vec![false; len],
        }
    }

    pub fn len(&self) -> usize {
        self.step_ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.step_ids.is_empty()
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn step_ids(&self) -> &[String] {
        &self.step_ids
    }

    pub fn current_id(&self) -> &str {
        &self.step_ids[self.position]
    }

    /// Move to `index`. Panics when out of range.
    pub fn set_position(&mut self, index: usize) {
        assert!(
            index < self.len(),
            "step index {} out of range for {} steps",
            index,
            self.len()
        );
        self.position = index;
    }

    pub fn phase(&self, index: usize) -> StepPhase {
        self.phases[index]
    }

    pub fn set_phase(&mut self, index: usize, phase: StepPhase) {
        self.phases[index] = phase;
    }

    /// Record that `index` has allowed forward navigation. Never cleared.
    pub fn mark_forward_enabled(&mut self, index: usize) {
        self.forward_enabled[index] = true;
    }

    pub fn forward_enabled(&self, index: usize) -> bool {
        self.forward_enabled[index]
    }

    /// Number of positions that have allowed forward navigation at least once.
    pub fn ready_count(&self) -> usize {
        self.forward_enabled.iter().filter(|ready| **ready).count()
    }
}
