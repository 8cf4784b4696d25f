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

//! Platform capability contracts: radios and runtime permissions.

use anyhow::Result;
use std::fmt;

/// Radios a pairing flow may depend on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Radio {
    Bluetooth,
    Wifi,
}

impl Radio {
    pub fn as_str(&self) -> &'static str {
        match self {
            Radio::Bluetooth => "bluetooth",
            Radio::Wifi => "wifi",
        }
    }
}

impl fmt::Display for Radio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Runtime permissions requested during pairing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Permission {
    Location,
}

impl Permission {
    pub fn as_str(&self) -> &'static str {
        match self {
            Permission::Location => "location",
        }
    }
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Grant state of a permission.
///
/// `Denied` and `DeniedPermanently` need different remediation: the first
/// can be prompted again, the second only fixed from system settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PermissionStatus {
    NotRequested,
    Granted,
    Denied,
    DeniedPermanently,
}

impl PermissionStatus {
    pub fn is_granted(&self) -> bool {
        matches!(self, PermissionStatus::Granted)
    }
}

/// A radio that can be queried and asked to turn on.
pub trait RadioService: Send + Sync {
    /// Which radio this is.
    fn radio(&self) -> Radio;

    /// Whether the hardware exists at all.
    fn is_available(&self) -> bool;

    /// Whether the radio is currently on.
    fn is_enabled(&self) -> bool;

    /// Ask the platform to turn the radio on. The outcome arrives later as
    /// a [`PlatformEvent::RadioChanged`].
    fn request_enable(&self) -> Result<()>;
}

/// Runtime permission broker.
pub trait PermissionBroker: Send + Sync {
    /// Current status of a permission.
    fn status(&self, permission: Permission) -> PermissionStatus;

    /// Show the system prompt. The answer arrives later as a
    /// [`PlatformEvent::PermissionResult`].
    fn request(&self, permission: Permission) -> Result<()>;
}

/// Asynchronous notifications from the platform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlatformEvent {
    RadioChanged { radio: Radio, enabled: bool },
    PermissionResult {
        permission: Permission,
        status: PermissionStatus,
    },
}

/// What a listener subscribes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    Radio(Radio),
    Permission(Permission),
}

impl PlatformEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            PlatformEvent::RadioChanged { radio, .. } => EventKind::Radio(*radio),
            PlatformEvent::PermissionResult { permission, .. } => {
                EventKind::Permission(*permission)
            }
        }
    }
}
