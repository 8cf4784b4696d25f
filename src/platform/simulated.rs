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

//! In-process platform used by the console harness and tests.

use anyhow::{anyhow, Result};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::info;

use super::capability::{
    Permission, PermissionBroker, PermissionStatus, PlatformEvent, Radio, RadioService,
};

#[derive(Debug)]
struct RadioState {
    available: bool,
    enabled: bool,
    enable_requests: usize,
}

/// A radio whose state is flipped by hand.
#[derive(Debug)]
pub struct SimulatedRadio {
    radio: Radio,
    state: RwLock<RadioState>,
}

impl SimulatedRadio {
    pub fn new(radio: Radio, available: bool, enabled: bool) -> Self {
        Self {
            radio,
            state: RwLock::new(RadioState {
                available,
                enabled: available && enabled,
                enable_requests: 0,
            }),
        }
    }

    /// Change the radio state and return the event the platform would emit.
    pub fn set_enabled(&self, enabled: bool) -> PlatformEvent {
        let mut state = self.state.write();
        state.enabled = state.available && enabled;
        PlatformEvent::RadioChanged {
            radio: self.radio,
            enabled: state.enabled,
        }
    }

    /// How many times a step asked to turn this radio on.
    pub fn enable_requests(&self) -> usize {
        self.state.read().enable_requests
    }
}

impl RadioService for SimulatedRadio {
    fn radio(&self) -> Radio {
        self.radio
    }

    fn is_available(&self) -> bool {
        self.state.read().available
    }

    fn is_enabled(&self) -> bool {
        self.state.read().enabled
    }

    fn request_enable(&self) -> Result<()> {
        let mut state = self.state.write();
        if !state.available {
            return Err(anyhow!("{} hardware not present", self.radio));
        }
        state.enable_requests += 1;
        info!("Enable requested for {}", self.radio);
        Ok(())
    }
}

/// Permission broker with scripted answers.
#[derive(Debug, Default)]
pub struct SimulatedPermissions {
    statuses: RwLock<HashMap<Permission, PermissionStatus>>,
    prompts: RwLock<HashMap<Permission, usize>>,
}

impl SimulatedPermissions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the user's answer and return the event the platform would emit.
    pub fn answer(&self, permission: Permission, status: PermissionStatus) -> PlatformEvent {
        self.statuses.write().insert(permission, status);
        PlatformEvent::PermissionResult { permission, status }
    }

    /// How many times the system prompt was shown.
    pub fn prompt_count(&self, permission: Permission) -> usize {
        self.prompts.read().get(&permission).copied().unwrap_or(0)
    }
}

impl PermissionBroker for SimulatedPermissions {
    fn status(&self, permission: Permission) -> PermissionStatus {
        self.statuses
            .read()
            .get(&permission)
            .copied()
            .unwrap_or(PermissionStatus::NotRequested)
    }

    fn request(&self, permission: Permission) -> Result<()> {
        if self.status(permission) == PermissionStatus::DeniedPermanently {
            return Err(anyhow!("{} permission can no longer be requested", permission));
        }
        *self.prompts.write().entry(permission).or_insert(0) += 1;
        info!("Prompting for {} permission", permission);
        Ok(())
    }
}

/// Bundle of simulated services.
#[derive(Debug, Clone)]
pub struct SimulatedPlatform {
    pub bluetooth: Arc<SimulatedRadio>,
    pub wifi: Arc<SimulatedRadio>,
    pub permissions: Arc<SimulatedPermissions>,
}

impl SimulatedPlatform {
    pub fn new(bluetooth_on: bool, wifi_on: bool) -> Self {
        Self {
            bluetooth: Arc::new(SimulatedRadio::new(Radio::Bluetooth, true, bluetooth_on)),
            wifi: Arc::new(SimulatedRadio::new(Radio::Wifi, true, wifi_on)),
            permissions: Arc::new(SimulatedPermissions::new()),
        }
    }

    pub fn radio(&self, radio: Radio) -> &Arc<SimulatedRadio> {
        match radio {
            Radio::Bluetooth => &self.bluetooth,
            Radio::Wifi => &self.wifi,
        }
    }
}
