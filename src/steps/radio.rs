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

//! Radio enablement step.

use std::sync::Arc;
use tracing::{debug, info};

use crate::error::WizardError;
use crate::platform::{EventKind, PlatformEvent, RadioService, Subscription};
use crate::wizard::{Hint, Step};

use super::StepPorts;

/// Blocks until a radio is on.
///
/// On selection the continue signal reflects the current radio state. While
/// selected, radio changes flip it without needing re-activation.
pub struct RadioStep {
    id: String,
    title: String,
    radio: Arc<dyn RadioService>,
    ports: StepPorts,
    subscription: Option<Subscription>,
}

impl RadioStep {
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        radio: Arc<dyn RadioService>,
        ports: StepPorts,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            radio,
            ports,
            subscription: None,
        }
    }

    pub fn is_listening(&self) -> bool {
        self.subscription.is_some()
    }
}

impl Step for RadioStep {
    fn id(&self) -> &str {
        &self.id
    }

    fn title(&self) -> Option<&str> {
        Some(&self.title)
    }

    fn on_page_selected(&mut self) {
        let radio = self.radio.radio();
        if !self.radio.is_available() {
            self.ports.absorb(
                WizardError::CapabilityUnavailable(radio.as_str()),
                Hint::RadioUnavailable(radio),
            );
            return;
        }

        let navigation = self.ports.navigation.clone();
        let hints = self.ports.hints.clone();
        self.subscription = Some(self.ports.hub.subscribe(
            EventKind::Radio(radio),
            move |event| {
                if let PlatformEvent::RadioChanged { enabled, .. } = event {
                    debug!("{} turned {}", radio, if *enabled { "on" } else { "off" });
                    if *enabled {
                        navigation.enable_continue();
                    } else {
                        navigation.disable_continue();
                        hints.show_hint(Hint::RadioOff(radio));
                    }
                }
            },
        ));

        if self.radio.is_enabled() {
            self.ports.navigation.enable_continue();
            return;
        }

        self.ports.navigation.disable_continue();
        self.ports.hints.show_hint(Hint::RadioOff(radio));
        if let Err(e) = self.radio.request_enable() {
            self.ports.absorb(
                WizardError::CapabilityUnavailable(radio.as_str()),
                Hint::RadioUnavailable(radio),
            );
            debug!("Enable request failed: {}", e);
        } else {
            info!("Asked platform to enable {}", radio);
        }
    }

    fn on_not_selected(&mut self) {
        if let Some(subscription) = self.subscription.take() {
            subscription.dispose();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::{PlatformHub, Radio, SimulatedRadio};
    use crate::wizard::{ContinueSignal, HintLog, NavigationPort};

    struct Fixture {
        signal: Arc<ContinueSignal>,
        hints: Arc<HintLog>,
        hub: PlatformHub,
        radio: Arc<SimulatedRadio>,
        step: RadioStep,
    }

    fn fixture(available: bool, enabled: bool) -> Fixture {
        let signal = Arc::new(ContinueSignal::new());
        let hints = Arc::new(HintLog::new());
        let hub = PlatformHub::new();
        let radio = Arc::new(SimulatedRadio::new(Radio::Bluetooth, available, enabled));
        let ports = StepPorts::new(signal.clone(), hints.clone(), hub.clone());
        let step = RadioStep::new("bluetooth", "Turn on Bluetooth", radio.clone(), ports);
        Fixture {
            signal,
            hints,
            hub,
            radio,
            step,
        }
    }

    #[test]
    fn test_radio_on_enables_continue() {
        let mut f = fixture(true, true);
        f.step.on_page_selected();
        assert!(f.signal.is_continue_enabled());
        assert!(f.hints.hints().is_empty());
        assert_eq!(f.radio.enable_requests(), 0);
    }

    #[test]
    fn test_radio_off_disables_and_requests() {
        let mut f = fixture(true, false);
        f.signal.enable_continue();
        f.step.on_page_selected();
        assert!(!f.signal.is_continue_enabled());
        assert_eq!(f.hints.last(), Some(Hint::RadioOff(Radio::Bluetooth)));
        assert_eq!(f.radio.enable_requests(), 1);
    }

    #[test]
    fn test_toggle_while_selected() {
        let mut f = fixture(true, false);
        f.step.on_page_selected();

        f.hub.publish(&f.radio.set_enabled(true));
        assert!(f.signal.is_continue_enabled());

        f.hub.publish(&f.radio.set_enabled(false));
        assert!(!f.signal.is_continue_enabled());
    }

    #[test]
    fn test_unavailable_radio_blocks_without_listening() {
        let mut f = fixture(false, false);
        f.step.on_page_selected();
        assert!(!f.signal.is_continue_enabled());
        assert_eq!(f.hints.last(), Some(Hint::RadioUnavailable(Radio::Bluetooth)));
        assert!(!f.step.is_listening());
        assert_eq!(f.hub.listener_count(), 0);
    }

    #[test]
    fn test_deselect_releases_listener() {
        let mut f = fixture(true, false);
        f.step.on_page_selected();
        assert_eq!(f.hub.listener_count(), 1);

        f.step.on_not_selected();
        assert_eq!(f.hub.listener_count(), 0);

        f.hub.publish(&f.radio.set_enabled(true));
        assert!(!f.signal.is_continue_enabled());
    }
}
