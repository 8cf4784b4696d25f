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

//! Non-blocking hints shown to the user when a step cannot proceed.

use parking_lot::Mutex;
use tracing::info;

use crate::platform::{Permission, Radio};

/// Remediation the view should offer next to a hint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HintAction {
    None,
    EnableRadio,
    RetryPrompt,
    OpenSettings,
}

/// A hint raised by a step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Hint {
    RadioOff(Radio),
    RadioUnavailable(Radio),
    PermissionDenied(Permission),
    PermissionDeniedPermanently(Permission),
    InvalidCredentials(String),
    SignInAborted,
    InsecureConnection,
}

impl Hint {
    pub fn message(&self) -> String {
        match self {
            Hint::RadioOff(radio) => format!("Turn on {} to continue", radio_label(*radio)),
            Hint::RadioUnavailable(radio) => {
                format!("{} is not available on this device", radio_label(*radio))
            }
            Hint::PermissionDenied(permission) => {
                format!("Allow {} access to continue", permission)
            }
            Hint::PermissionDeniedPermanently(permission) => {
                format!("Enable {} access in Settings to continue", permission)
            }
            Hint::InvalidCredentials(reason) => reason.clone(),
            Hint::SignInAborted => "Sign-in was cancelled".to_string(),
            Hint::InsecureConnection => "The connection is not secure".to_string(),
        }
    }

    pub fn action(&self) -> HintAction {
        match self {
            Hint::RadioOff(_) => HintAction::EnableRadio,
            Hint::PermissionDenied(_) => HintAction::RetryPrompt,
            Hint::PermissionDeniedPermanently(_) => HintAction::OpenSettings,
            Hint::RadioUnavailable(_)
            | Hint::InvalidCredentials(_)
            | Hint::SignInAborted
            | Hint::InsecureConnection => HintAction::None,
        }
    }
}

fn radio_label(radio: Radio) -> &'static str {
    match radio {
        Radio::Bluetooth => "Bluetooth",
        Radio::Wifi => "Wi-Fi",
    }
}

/// Where hints go.
pub trait HintPort: Send + Sync {
    fn show_hint(&self, hint: Hint);
}

/// Hint sink that logs each hint and keeps the history.
#[derive(Debug, Default)]
pub struct HintLog {
    hints: Mutex<Vec<Hint>>,
}

impl HintLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn hints(&self) -> Vec<Hint> {
        self.hints.lock().clone()
    }

    pub fn last(&self) -> Option<Hint> {
        self.hints.lock().last().cloned()
    }

    pub fn clear(&self) {
        self.hints.lock().clear();
    }
}

impl HintPort for HintLog {
    fn show_hint(&self, hint: Hint) {
        info!("Hint: {} ({:?})", hint.message(), hint.action());
        self.hints.lock().push(hint);
    }
}
