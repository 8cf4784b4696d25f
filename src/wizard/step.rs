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

//! The step contract.

use crate::oauth::TlsError;

/// User input routed to the active step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepInput {
    /// Wi-Fi network credentials typed by the user.
    Credentials { ssid: String, password: String },
    /// A page finished loading in the embedded browser.
    RedirectLoaded(String),
    /// The embedded browser hit a certificate error.
    TlsError(TlsError),
}

/// One unit of a wizard.
///
/// The container calls `on_page_selected` once per activation and
/// `on_not_selected` once per deactivation. A step must set the continue
/// signal in `on_page_selected` and drop every listener in
/// `on_not_selected`.
pub trait Step: Send {
    /// Stable identifier.
    fn id(&self) -> &str;

    /// Display title, if the step declares one.
    fn title(&self) -> Option<&str> {
        None
    }

    fn on_page_selected(&mut self);

    fn on_not_selected(&mut self) {}

    /// Handle input addressed to this step while it is active.
    fn on_input(&mut self, _input: &StepInput) {}
}
