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

//! Device removal with a confirmation deadline.

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast::error::RecvError;
use tracing::{info, warn};

use super::RemoteModelPort;
use crate::config::RemovalConfig;
use crate::error::WizardError;

/// How a removal ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemovalResult {
    /// The service confirmed the deletion in time.
    Removed,
    /// No confirmation before the deadline.
    TimedOut,
    /// The request itself failed.
    Failed,
}

pub trait RemovalView: Send + Sync {
    fn show_removing(&self);
    fn show_removed(&self);
    fn show_removal_timed_out(&self);
    fn show_generic_error(&self);
}

/// Requests a deletion and races the confirmation against a timer.
/// Whichever arrives first decides the result.
pub struct RemovalPresenter {
    port: Arc<dyn RemoteModelPort>,
    view: Arc<dyn RemovalView>,
    timeout: Duration,
}

impl RemovalPresenter {
    pub fn new(
        port: Arc<dyn RemoteModelPort>,
        view: Arc<dyn RemovalView>,
        timeout: Duration,
    ) -> Self {
        Self {
            port,
            view,
            timeout,
        }
    }

    /// Build a presenter using the configured confirmation deadline.
    pub fn from_config(
        port: Arc<dyn RemoteModelPort>,
        view: Arc<dyn RemovalView>,
        config: &RemovalConfig,
    ) -> Self {
        Self::new(port, view, config.confirmation_timeout())
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// The deadline covers the request as well as the confirmation.
    pub async fn remove(&self, id: &str) -> RemovalResult {
        // Subscribe before asking so a fast confirmation is not missed.
        let mut deletions = self.port.deletions();
        self.view.show_removing();

        let removal = async {
            if let Err(e) = self.port.remove(id).await {
                warn!("{}", WizardError::RemoteCallFailure(e.to_string()));
                return RemovalResult::Failed;
            }
            loop {
                match deletions.recv().await {
                    Ok(deleted) if deleted == id => return RemovalResult::Removed,
                    Ok(_) => continue,
                    Err(RecvError::Lagged(skipped)) => {
                        warn!("Missed {} deletion notices", skipped);
                    }
                    Err(RecvError::Closed) => {
                        warn!("Deletion notices closed while removing {}", id);
                        return RemovalResult::Failed;
                    }
                }
            }
        };

        let result = tokio::select! {
            result = removal => result,
            _ = tokio::time::sleep(self.timeout) => {
                warn!("Removing {}: {}", id, WizardError::Timeout(self.timeout));
                RemovalResult::TimedOut
            }
        };

        match result {
            RemovalResult::Removed => {
                info!("Removal of {} confirmed", id);
                self.view.show_removed();
            }
            RemovalResult::TimedOut => self.view.show_removal_timed_out(),
            RemovalResult::Failed => self.view.show_generic_error(),
        }
        result
    }
}
