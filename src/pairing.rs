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

//! Pairing wizard assembly.
//!
//! Wires platform services, ports and steps into a ready-to-run session.

use anyhow::Result;
use std::sync::Arc;
use tokio::sync::{mpsc, watch};
use tracing::info;

use crate::config::Config;
use crate::oauth::RedirectClassifier;
use crate::platform::{PermissionBroker, PlatformHub, RadioService};
use crate::session::{PairingSession, SessionInput, SessionOutcome};
use crate::steps::{InfoStep, OAuthStep, PermissionStep, RadioStep, StepPorts, WifiStep};
use crate::wizard::{ContinueSignal, HintPort, Step, StepContainer};

/// Platform services a pairing flow depends on.
#[derive(Clone)]
pub struct PlatformServices {
    pub bluetooth: Arc<dyn RadioService>,
    pub wifi: Arc<dyn RadioService>,
    pub permissions: Arc<dyn PermissionBroker>,
}

/// Which wizard to build.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PairingFlow {
    /// Pair a Bluetooth device and hand it Wi-Fi credentials.
    BleDevice,
    /// Link a third-party account through its sign-in page.
    AccountLink,
}

impl PairingFlow {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "ble" | "device" => Some(Self::BleDevice),
            "oauth" | "account" => Some(Self::AccountLink),
            _ => None,
        }
    }
}

/// A wizard plus the channel that feeds it.
pub struct PairingWizard {
    session: PairingSession,
    input_tx: mpsc::Sender<SessionInput>,
    input_rx: mpsc::Receiver<SessionInput>,
}

impl PairingWizard {
    /// Build the steps for `flow` and wrap them in a session.
    pub fn new(
        flow: PairingFlow,
        config: &Config,
        services: PlatformServices,
        hints: Arc<dyn HintPort>,
    ) -> Result<Self> {
        let signal = Arc::new(ContinueSignal::new());
        let hub = PlatformHub::new();
        let ports = StepPorts::new(signal.clone(), hints, hub.clone());

        let steps = match flow {
            PairingFlow::BleDevice => ble_device_steps(config, &services, &ports),
            PairingFlow::AccountLink => account_link_steps(config, &ports),
        };
        info!("Building {:?} wizard with {} steps", flow, steps.len());

        let container = StepContainer::new(steps)?;
        let (input_tx, input_rx) = mpsc::channel(32);

        Ok(Self {
            session: PairingSession::new(container, hub, signal),
            input_tx,
            input_rx,
        })
    }

    /// Get a sender for session inputs.
    pub fn input_sender(&self) -> mpsc::Sender<SessionInput> {
        self.input_tx.clone()
    }

    pub fn continue_signal(&self) -> watch::Receiver<bool> {
        self.session.continue_signal()
    }

    pub fn titles(&self) -> watch::Receiver<Option<String>> {
        self.session.titles()
    }

    pub fn session(&self) -> &PairingSession {
        &self.session
    }

    /// Run the session to completion.
    pub async fn run(self) -> SessionOutcome {
        let Self {
            session,
            input_tx,
            input_rx,
        } = self;
        // Only external senders keep the session alive.
        drop(input_tx);
        session.run(input_rx).await
    }
}

/// Info, Bluetooth, location permission, Wi-Fi.
pub fn ble_device_steps(
    config: &Config,
    services: &PlatformServices,
    ports: &StepPorts,
) -> Vec<Box<dyn Step>> {
    vec![
        Box::new(InfoStep::new(
            "intro",
            "Get Ready",
            "Plug in the device and keep your phone nearby.",
            ports.clone(),
        )),
        Box::new(RadioStep::new(
            "bluetooth",
            "Turn on Bluetooth",
            services.bluetooth.clone(),
            ports.clone(),
        )),
        Box::new(PermissionStep::location(
            services.permissions.clone(),
            ports.clone(),
        )),
        Box::new(WifiStep::new(
            services.wifi.clone(),
            config.wifi.clone(),
            ports.clone(),
        )),
    ]
}

/// Info, then the provider's sign-in page.
pub fn account_link_steps(config: &Config, ports: &StepPorts) -> Vec<Box<dyn Step>> {
    let classifier = Arc::new(RedirectClassifier::new(config.oauth.clone()));
    vec![
        Box::new(InfoStep::new(
            "link-intro",
            "Link Your Account",
            "You will be sent to the provider to sign in.",
            ports.clone(),
        )),
        Box::new(OAuthStep::new(
            "link",
            "Sign In",
            classifier,
            ports.clone(),
        )),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::SimulatedPlatform;
    use crate::wizard::HintLog;

    fn services(platform: &SimulatedPlatform) -> PlatformServices {
        PlatformServices {
            bluetooth: platform.bluetooth.clone(),
            wifi: platform.wifi.clone(),
            permissions: platform.permissions.clone(),
        }
    }

    #[test]
    fn test_flow_parse() {
        assert_eq!(PairingFlow::parse("BLE"), Some(PairingFlow::BleDevice));
        assert_eq!(PairingFlow::parse("oauth"), Some(PairingFlow::AccountLink));
        assert_eq!(PairingFlow::parse("zigbee"), None);
    }

    #[test]
    fn test_ble_flow_step_order() {
        let platform = SimulatedPlatform::new(true, true);
        let wizard = PairingWizard::new(
            PairingFlow::BleDevice,
            &Config::default(),
            services(&platform),
            Arc::new(HintLog::new()),
        )
        .unwrap();
        assert_eq!(
            wizard.session().state().step_ids(),
            &["intro", "bluetooth", "location", "wifi"]
        );
    }

    #[tokio::test]
    async fn test_run_stops_when_host_drops_sender() {
        let platform = SimulatedPlatform::new(true, true);
        let wizard = PairingWizard::new(
            PairingFlow::AccountLink,
            &Config::default(),
            services(&platform),
            Arc::new(HintLog::new()),
        )
        .unwrap();
        let tx = wizard.input_sender();
        tx.send(SessionInput::Next).await.unwrap();
        drop(tx);
        assert_eq!(wizard.run().await, SessionOutcome::Closed);
    }
}
