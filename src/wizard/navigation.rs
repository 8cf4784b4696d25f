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

//! Forward-navigation port.

use tokio::sync::watch;
use tracing::debug;

/// What a step uses to allow or block the "Continue" action.
///
/// Calls are idempotent and the latest one wins.
pub trait NavigationPort: Send + Sync {
    fn enable_continue(&self);
    fn disable_continue(&self);
    fn is_continue_enabled(&self) -> bool;
}

/// Continue flag backed by a watch channel so the view can observe it.
#[derive(Debug)]
pub struct ContinueSignal {
    tx: watch::Sender<bool>,
}

impl Default for ContinueSignal {
    fn default() -> Self {
        Self::new()
    }
}

impl ContinueSignal {
    /// Create a disabled signal.
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(false);
        Self { tx }
    }

    /// Observe changes. Only real transitions wake receivers.
    pub fn subscribe(&self) -> watch::Receiver<bool> {
        self.tx.subscribe()
    }

    fn set(&self, enabled: bool) {
        let changed = self.tx.send_if_modified(|current| {
            if *current == enabled {
                false
            } else {
                *current = enabled;
                true
            }
        });
        if changed {
            debug!("Continue {}", if enabled { "enabled" } else { "disabled" });
        }
    }
}

impl NavigationPort for ContinueSignal {
    fn enable_continue(&self) {
        self.set(true);
    }

    fn disable_continue(&self) {
        self.set(false);
    }

    fn is_continue_enabled(&self) -> bool {
        *self.tx.borrow()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_disabled() {
        let signal = ContinueSignal::new();
        assert!(!signal.is_continue_enabled());
    }

    #[test]
    fn test_latest_call_wins() {
        let signal = ContinueSignal::new();
        signal.enable_continue();
        signal.disable_continue();
        assert!(!signal.is_continue_enabled());

        signal.enable_continue();
        signal.enable_continue();
        signal.disable_continue();
        signal.disable_continue();
        assert!(!signal.is_continue_enabled());

        signal.disable_continue();
        signal.enable_continue();
        assert!(signal.is_continue_enabled());
    }

    #[test]
    fn test_repeated_calls_do_not_notify() {
        let signal = ContinueSignal::new();
        let mut rx = signal.subscribe();

        signal.disable_continue();
        assert!(!rx.has_changed().unwrap());

        signal.enable_continue();
        assert!(rx.has_changed().unwrap());
        assert!(*rx.borrow_and_update());

        signal.enable_continue();
        assert!(!rx.has_changed().unwrap());
    }
}
