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

//! Concrete wizard steps.

mod info;
mod oauth;
mod permission;
mod radio;
mod wifi;

pub use info::InfoStep;
pub use oauth::OAuthStep;
pub use permission::PermissionStep;
pub use radio::RadioStep;
pub use wifi::{validate_credentials, WifiCredentials, WifiStep};

use std::sync::Arc;
use tracing::warn;

use crate::error::WizardError;
use crate::platform::PlatformHub;
use crate::wizard::{Hint, HintPort, NavigationPort};

/// Collaborators every step receives at construction.
#[derive(Clone)]
pub struct StepPorts {
    pub navigation: Arc<dyn NavigationPort>,
    pub hints: Arc<dyn HintPort>,
    pub hub: PlatformHub,
}

impl StepPorts {
    pub fn new(
        navigation: Arc<dyn NavigationPort>,
        hints: Arc<dyn HintPort>,
        hub: PlatformHub,
    ) -> Self {
        Self {
            navigation,
            hints,
            hub,
        }
    }

    /// Turn a platform failure into a blocked step plus a hint.
    pub(crate) fn absorb(&self, error: WizardError, hint: Hint) {
        absorb(self.navigation.as_ref(), self.hints.as_ref(), error, hint);
    }
}

/// Same as [`StepPorts::absorb`], usable from listeners that only hold the
/// two ports.
pub(crate) fn absorb(
    navigation: &dyn NavigationPort,
    hints: &dyn HintPort,
    error: WizardError,
    hint: Hint,
) {
    warn!("{}", error);
    navigation.disable_continue();
    hints.show_hint(hint);
}
