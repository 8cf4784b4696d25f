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

//! Pairing Wizard
//!
//! Headless coordination for multi-step device pairing and account linking
//! flows: steps, their container, the continue signal, platform capability
//! listeners and presenters over the remote model service.

pub mod config;
pub mod console;
pub mod error;
pub mod oauth;
pub mod pairing;
pub mod platform;
pub mod presenter;
pub mod session;
pub mod state;
pub mod steps;
pub mod wizard;

pub use config::Config;
pub use error::WizardError;
pub use pairing::{PairingFlow, PairingWizard, PlatformServices};
pub use session::{PairingSession, SessionInput, SessionOutcome};
