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

//! Runtime permission step.

use std::sync::Arc;
use tracing::{debug, info};

use crate::error::WizardError;
use crate::platform::{
    EventKind, Permission, PermissionBroker, PermissionStatus, PlatformEvent, Subscription,
};
use crate::wizard::{Hint, Step};

use super::{absorb, StepPorts};

/// Blocks until a permission is granted.
///
/// A permanently denied permission is never prompted for again; the step
/// points the user at system settings instead.
pub struct PermissionStep {
    id: String,
    title: String,
    permission: Permission,
    broker: Arc<dyn PermissionBroker>,
    ports: StepPorts,
    subscription: Option<Subscription>,
}

impl PermissionStep {
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        permission: Permission,
        broker: Arc<dyn PermissionBroker>,
        ports: StepPorts,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            permission,
            broker,
            ports,
            subscription: None,
        }
    }

    /// Location permission, needed for BLE scanning.
    pub fn location(broker: Arc<dyn PermissionBroker>, ports: StepPorts) -> Self {
        Self::new(
            "location",
            "Allow Location Access",
            Permission::Location,
            broker,
            ports,
        )
    }

    pub fn permission(&self) -> Permission {
        self.permission
    }

    pub fn is_listening(&self) -> bool {
        self.subscription.is_some()
    }

    fn listen(&mut self) {
        let permission = self.permission;
        let navigation = self.ports.navigation.clone();
        let hints = self.ports.hints.clone();
        self.subscription = Some(self.ports.hub.subscribe(
            EventKind::Permission(permission),
            move |event| {
                let PlatformEvent::PermissionResult { status, .. } = event else {
                    return;
                };
                debug!("{} permission answered: {:?}", permission, status);
                match status {
                    PermissionStatus::Granted => navigation.enable_continue(),
                    PermissionStatus::Denied => absorb(
                        navigation.as_ref(),
                        hints.as_ref(),
                        WizardError::PermissionDenied(permission),
                        Hint::PermissionDenied(permission),
                    ),
                    PermissionStatus::DeniedPermanently => absorb(
                        navigation.as_ref(),
                        hints.as_ref(),
                        WizardError::PermissionDeniedPermanently(permission),
                        Hint::PermissionDeniedPermanently(permission),
                    ),
                    PermissionStatus::NotRequested => navigation.disable_continue(),
                }
            },
        ));
    }
}

impl Step for PermissionStep {
    fn id(&self) -> &str {
        &self.id
    }

    fn title(&self) -> Option<&str> {
        Some(&self.title)
    }

    fn on_page_selected(&mut self) {
        let permission = self.permission;
        match self.broker.status(permission) {
            PermissionStatus::Granted => {
                self.ports.navigation.enable_continue();
            }
            PermissionStatus::DeniedPermanently => {
                self.ports.absorb(
                    WizardError::PermissionDeniedPermanently(permission),
                    Hint::PermissionDeniedPermanently(permission),
                );
            }
            PermissionStatus::Denied | PermissionStatus::NotRequested => {
                self.ports.navigation.disable_continue();
                self.listen();
                if let Err(e) = self.broker.request(permission) {
                    debug!("Permission request failed: {}", e);
                    self.ports.absorb(
                        WizardError::PermissionDenied(permission),
                        Hint::PermissionDenied(permission),
                    );
                } else {
                    info!("Requested {} permission", permission);
                }
            }
        }
    }

    fn on_not_selected(&mut self) {
        if let Some(subscription) = self.subscription.take() {
            subscription.dispose();
        }
    }
}
