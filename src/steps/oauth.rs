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

//! Account linking step hosted in an embedded browser.

use std::sync::Arc;
use tracing::{debug, info};

use crate::oauth::{decide_tls, Redirect, RedirectClassifier, TlsDecision};
use crate::wizard::{Hint, Step, StepInput};

use super::StepPorts;

/// Lets the user continue once the provider redirects back with success.
pub struct OAuthStep {
    id: String,
    title: String,
    classifier: Arc<RedirectClassifier>,
    ports: StepPorts,
    outcome: Option<Redirect>,
    show_cancel_button: bool,
    connection_cancelled: bool,
}

impl OAuthStep {
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        classifier: Arc<RedirectClassifier>,
        ports: StepPorts,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            classifier,
            ports,
            outcome: None,
            show_cancel_button: false,
            connection_cancelled: false,
        }
    }

    /// Classification of the last loaded URL.
    pub fn outcome(&self) -> Option<Redirect> {
        self.outcome
    }

    pub fn is_linked(&self) -> bool {
        self.outcome == Some(Redirect::Success)
    }

    pub fn is_aborted(&self) -> bool {
        self.outcome == Some(Redirect::Abort)
    }

    pub fn show_cancel_button(&self) -> bool {
        self.show_cancel_button
    }

    /// Whether a certificate error made the browser drop the connection.
    pub fn connection_cancelled(&self) -> bool {
        self.connection_cancelled
    }

    fn on_redirect(&mut self, url: &str) {
        let redirect = match self.classifier.classify_strict(url) {
            Ok(redirect) => redirect,
            Err(e) => {
                debug!("{}", e);
                Redirect::Continue {
                    show_cancel_button: self.classifier.markers().show_cancel_when_unmatched,
                }
            }
        };
        self.outcome = Some(redirect);

        match redirect {
            Redirect::Success => {
                info!("Account linked");
                self.show_cancel_button = false;
                self.ports.navigation.enable_continue();
            }
            Redirect::Abort => {
                info!("Account linking aborted");
                self.show_cancel_button = false;
                self.ports.navigation.disable_continue();
                self.ports.hints.show_hint(Hint::SignInAborted);
            }
            Redirect::Continue { show_cancel_button } => {
                self.show_cancel_button = show_cancel_button;
                self.ports.navigation.disable_continue();
            }
        }
    }
}

impl Step for OAuthStep {
    fn id(&self) -> &str {
        &self.id
    }

    fn title(&self) -> Option<&str> {
        Some(&self.title)
    }

    fn on_page_selected(&mut self) {
        if self.is_linked() {
            self.ports.navigation.enable_continue();
        } else {
            self.ports.navigation.disable_continue();
        }
    }

    fn on_input(&mut self, input: &StepInput) {
        match input {
            StepInput::RedirectLoaded(url) => self.on_redirect(url),
            StepInput::TlsError(error) => {
                if decide_tls(*error) == TlsDecision::Cancel {
                    self.connection_cancelled = true;
                    self.ports.navigation.disable_continue();
                    self.ports.hints.show_hint(Hint::InsecureConnection);
                }
            }
            StepInput::Credentials { .. } => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::oauth::{RedirectMarkers, TlsError};
    use crate::platform::PlatformHub;
    use crate::wizard::{ContinueSignal, HintLog, NavigationPort};

    fn setup() -> (Arc<ContinueSignal>, Arc<HintLog>, OAuthStep) {
        let signal = Arc::new(ContinueSignal::new());
        let hints = Arc::new(HintLog::new());
        let ports = StepPorts::new(signal.clone(), hints.clone(), PlatformHub::new());
        let classifier = Arc::new(RedirectClassifier::new(RedirectMarkers {
            success: vec!["/linked".into()],
            abort: vec!["/denied".into()],
            show_cancel: vec!["/signin".into()],
            show_cancel_when_unmatched: false,
        }));
        let step = OAuthStep::new("link", "Link Account", classifier, ports);
        (signal, hints, step)
    }

    fn load(step: &mut OAuthStep, url: &str) {
        step.on_input(&StepInput::RedirectLoaded(url.to_string()));
    }

    #[test]
    fn test_flow_to_success() {
        let (signal, _hints, mut step) = setup();
        step.on_page_selected();
        assert!(!signal.is_continue_enabled());

        load(&mut step, "https://provider.test/signin");
        assert!(step.show_cancel_button());
        assert!(!signal.is_continue_enabled());

        load(&mut step, "https://provider.test/consent");
        assert!(!step.show_cancel_button());

        load(&mut step, "https://hub.test/linked?code=x");
        assert!(step.is_linked());
        assert!(signal.is_continue_enabled());

        step.on_not_selected();
        signal.disable_continue();
        step.on_page_selected();
        assert!(signal.is_continue_enabled());
    }

    #[test]
    fn test_unmatched_url_uses_configured_cancel_button() {
        let signal = Arc::new(ContinueSignal::new());
        let ports = StepPorts::new(signal.clone(), Arc::new(HintLog::new()), PlatformHub::new());
        let classifier = Arc::new(RedirectClassifier::new(RedirectMarkers {
            success: vec!["/linked".into()],
            abort: vec![],
            show_cancel: vec![],
            show_cancel_when_unmatched: true,
        }));
        let mut step = OAuthStep::new("link", "Link Account", classifier, ports);
        step.on_page_selected();

        load(&mut step, "https://provider.test/mfa");
        assert_eq!(
            step.outcome(),
            Some(Redirect::Continue {
                show_cancel_button: true
            })
        );
        assert!(step.show_cancel_button());
        assert!(!signal.is_continue_enabled());
    }

    #[test]
    fn test_abort_blocks_and_hints() {
        let (signal, hints, mut step) = setup();
        step.on_page_selected();
        load(&mut step, "https://hub.test/denied");
        assert!(step.is_aborted());
        assert!(!signal.is_continue_enabled());
        assert_eq!(hints.last(), Some(Hint::SignInAborted));
    }

    #[test]
    fn test_tls_policy() {
        let (signal, hints, mut step) = setup();
        step.on_page_selected();

        step.on_input(&StepInput::TlsError(TlsError::Expired));
        assert!(!step.connection_cancelled());
        assert!(hints.hints().is_empty());

        step.on_input(&StepInput::TlsError(TlsError::Untrusted));
        assert!(step.connection_cancelled());
        assert!(!signal.is_continue_enabled());
        assert_eq!(hints.last(), Some(Hint::InsecureConnection));
    }
}
