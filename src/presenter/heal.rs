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

//! Z-Wave network heal progress.

use chrono::{DateTime, Duration, Utc};
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::{debug, info, warn};

use super::RemoteModelPort;
use crate::error::WizardError;

pub const ATTR_HEAL_STATUS: &str = "hubzwave:healStatus";
pub const ATTR_HEAL_PERCENT: &str = "hubzwave:healPercent";
const METHOD_HEAL: &str = "hubzwave:Heal";
const METHOD_CANCEL_HEAL: &str = "hubzwave:CancelHeal";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HealPhase {
    Idle,
    Healing,
    Completed,
    Cancelled,
    Failed,
}

impl HealPhase {
    /// Parse the hub's status string. Unknown values are `None`.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "IDLE" => Some(Self::Idle),
            "HEALING" => Some(Self::Healing),
            "COMPLETED" => Some(Self::Completed),
            "CANCELLED" => Some(Self::Cancelled),
            "FAILED" => Some(Self::Failed),
            _ => None,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Cancelled | Self::Failed)
    }
}

/// Snapshot handed to the view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HealProgress {
    pub phase: HealPhase,
    pub percent: u8,
    pub elapsed: Option<Duration>,
    pub estimated_remaining: Option<Duration>,
}

impl Default for HealProgress {
    fn default() -> Self {
        Self {
            phase: HealPhase::Idle,
            percent: 0,
            elapsed: None,
            estimated_remaining: None,
        }
    }
}

pub trait HealView: Send + Sync {
    fn show_progress(&self, progress: &HealProgress);
    fn show_finished(&self, phase: HealPhase);
    fn show_generic_error(&self);
}

/// Starts a heal on a hub and turns its property changes into progress.
pub struct HealPresenter {
    port: Arc<dyn RemoteModelPort>,
    view: Arc<dyn HealView>,
    hub_id: String,
    started_at: Option<DateTime<Utc>>,
    progress: HealProgress,
}

impl HealPresenter {
    pub fn new(
        port: Arc<dyn RemoteModelPort>,
        view: Arc<dyn HealView>,
        hub_id: impl Into<String>,
    ) -> Self {
        Self {
            port,
            view,
            hub_id: hub_id.into(),
            started_at: None,
            progress: HealProgress::default(),
        }
    }

    pub fn progress(&self) -> &HealProgress {
        &self.progress
    }

    pub async fn start(&mut self) {
        match self
            .port
            .invoke(&self.hub_id, METHOD_HEAL, json!({ "block": false }))
            .await
        {
            Ok(_) => {
                info!("Heal started on hub {}", self.hub_id);
                self.started_at = Some(Utc::now());
                self.progress = HealProgress {
                    phase: HealPhase::Healing,
                    elapsed: Some(Duration::zero()),
                    ..HealProgress::default()
                };
                self.view.show_progress(&self.progress);
            }
            Err(e) => self.fail(e),
        }
    }

    pub async fn cancel(&mut self) {
        if let Err(e) = self
            .port
            .invoke(&self.hub_id, METHOD_CANCEL_HEAL, Value::Null)
            .await
        {
            self.fail(e);
        }
    }

    /// Feed a property change from the hub model.
    pub fn on_property_change(&mut self, key: &str, value: &Value) {
        self.apply(key, value, Utc::now());
    }

    fn apply(&mut self, key: &str, value: &Value, now: DateTime<Utc>) {
        let was_terminal = self.progress.phase.is_terminal();
        match key {
            ATTR_HEAL_PERCENT => match value.as_f64() {
                Some(fraction) => {
                    self.progress.percent = (fraction.clamp(0.0, 1.0) * 100.0).round() as u8;
                }
                None => {
                    warn!("Ignoring non-numeric heal percent {}", value);
                    return;
                }
            },
            ATTR_HEAL_STATUS => match value.as_str().and_then(HealPhase::parse) {
                Some(phase) => {
                    if phase == HealPhase::Completed {
                        self.progress.percent = 100;
                    }
                    self.progress.phase = phase;
                }
                None => {
                    warn!("Ignoring unknown heal status {}", value);
                    return;
                }
            },
            _ => {
                debug!("Ignoring property {}", key);
                return;
            }
        }

        self.update_timing(now);
        self.view.show_progress(&self.progress);
        if self.progress.phase.is_terminal() && !was_terminal {
            info!("Heal finished: {:?}", self.progress.phase);
            self.view.show_finished(self.progress.phase);
        }
    }

    fn update_timing(&mut self, now: DateTime<Utc>) {
        let Some(started_at) = self.started_at else {
            return;
        };
        let elapsed = now - started_at;
        self.progress.elapsed = Some(elapsed);

        let percent = i32::from(self.progress.percent);
        self.progress.estimated_remaining =
            if self.progress.phase == HealPhase::Healing && percent > 0 && percent < 100 {
                Some(elapsed * (100 - percent) / percent)
            } else {
                None
            };
    }

    fn fail(&mut self, error: anyhow::Error) {
        warn!("{}", WizardError::RemoteCallFailure(error.to_string()));
        self.view.show_generic_error();
    }
}
