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

//! Wi-Fi enablement and credentials step.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{debug, info};

use crate::config::WifiConfig;
use crate::error::WizardError;
use crate::platform::{EventKind, PlatformEvent, Radio, RadioService, Subscription};
use crate::wizard::{Hint, HintPort, NavigationPort, Step, StepInput};

use super::StepPorts;

/// Network credentials accepted by the step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WifiCredentials {
    pub ssid: String,
    pub password: String,
}

impl WifiCredentials {
    pub fn is_open(&self) -> bool {
        self.password.is_empty()
    }
}

/// Check credentials against the configured rules. The error is a message
/// suitable for a hint.
pub fn validate_credentials(ssid: &str, password: &str, rules: &WifiConfig) -> Result<(), String> {
    if ssid.trim().is_empty() {
        return Err("Enter the network name".to_string());
    }
    if ssid.len() > rules.max_ssid_len {
        return Err(format!(
            "Network name must be at most {} bytes",
            rules.max_ssid_len
        ));
    }

    if password.is_empty() {
        return if rules.allow_open_networks {
            Ok(())
        } else {
            Err("Enter the network password".to_string())
        };
    }
    if !password.chars().all(|c| c.is_ascii() && !c.is_ascii_control()) {
        return Err("Password may only contain printable ASCII characters".to_string());
    }
    let len = password.len();
    if len < rules.min_passphrase_len || len > rules.max_passphrase_len {
        return Err(format!(
            "Password must be {} to {} characters",
            rules.min_passphrase_len, rules.max_passphrase_len
        ));
    }
    Ok(())
}

#[derive(Debug, Default)]
struct Readiness {
    radio_on: AtomicBool,
    credentials_ok: AtomicBool,
}

impl Readiness {
    fn apply(&self, navigation: &dyn NavigationPort) {
        if self.radio_on.load(Ordering::SeqCst) && self.credentials_ok.load(Ordering::SeqCst) {
            navigation.enable_continue();
        } else {
            navigation.disable_continue();
        }
    }
}

/// Requires Wi-Fi to be on and acceptable credentials to be entered.
pub struct WifiStep {
    id: String,
    title: String,
    radio: Arc<dyn RadioService>,
    rules: WifiConfig,
    ports: StepPorts,
    readiness: Arc<Readiness>,
    credentials: Option<WifiCredentials>,
    subscription: Option<Subscription>,
}

impl WifiStep {
    pub fn new(radio: Arc<dyn RadioService>, rules: WifiConfig, ports: StepPorts) -> Self {
        Self {
            id: "wifi".to_string(),
            title: "Connect to Wi-Fi".to_string(),
            radio,
            rules,
            ports,
            readiness: Arc::new(Readiness::default()),
            credentials: None,
            subscription: None,
        }
    }

    /// Last accepted credentials.
    pub fn credentials(&self) -> Option<&WifiCredentials> {
        self.credentials.as_ref()
    }

    fn set_credentials(&mut self, ssid: &str, password: &str) {
        match validate_credentials(ssid, password, &self.rules) {
            Ok(()) => {
                info!("Wi-Fi credentials accepted for {}", ssid);
                self.credentials = Some(WifiCredentials {
                    ssid: ssid.to_string(),
                    password: password.to_string(),
                });
                self.readiness.credentials_ok.store(true, Ordering::SeqCst);
            }
            Err(reason) => {
                debug!("Wi-Fi credentials rejected: {}", reason);
                self.credentials = None;
                self.readiness.credentials_ok.store(false, Ordering::SeqCst);
                self.ports.hints.show_hint(Hint::InvalidCredentials(reason));
            }
        }
        self.readiness.apply(self.ports.navigation.as_ref());
    }
}

impl Step for WifiStep {
    fn id(&self) -> &str {
        &self.id
    }

    fn title(&self) -> Option<&str> {
        Some(&self.title)
    }

    fn on_page_selected(&mut self) {
        if !self.radio.is_available() {
            self.ports.absorb(
                WizardError::CapabilityUnavailable(Radio::Wifi.as_str()),
                Hint::RadioUnavailable(Radio::Wifi),
            );
            return;
        }

        let readiness = self.readiness.clone();
        let navigation = self.ports.navigation.clone();
        let hints: Arc<dyn HintPort> = self.ports.hints.clone();
        self.subscription = Some(self.ports.hub.subscribe(
            EventKind::Radio(Radio::Wifi),
            move |event| {
                if let PlatformEvent::RadioChanged { enabled, .. } = event {
                    readiness.radio_on.store(*enabled, Ordering::SeqCst);
                    if !*enabled {
                        hints.show_hint(Hint::RadioOff(Radio::Wifi));
                    }
                    readiness.apply(navigation.as_ref());
                }
            },
        ));

        let on = self.radio.is_enabled();
        self.readiness.radio_on.store(on, Ordering::SeqCst);
        if !on {
            self.ports.hints.show_hint(Hint::RadioOff(Radio::Wifi));
            if let Err(e) = self.radio.request_enable() {
                debug!("Wi-Fi enable request failed: {}", e);
                self.ports.absorb(
                    WizardError::CapabilityUnavailable(Radio::Wifi.as_str()),
                    Hint::RadioUnavailable(Radio::Wifi),
                );
                return;
            }
        }
        self.readiness.apply(self.ports.navigation.as_ref());
    }

    fn on_not_selected(&mut self) {
        if let Some(subscription) = self.subscription.take() {
            subscription.dispose();
        }
    }

    fn on_input(&mut self, input: &StepInput) {
        if let StepInput::Credentials { ssid, password } = input {
            self.set_credentials(ssid, password);
        }
    }
}
