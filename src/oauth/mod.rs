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

//! OAuth redirect classification.
//!
//! Third-party account linking runs in an embedded browser. Every loaded
//! URL is checked against three marker lists to tell whether the flow
//! finished, was aborted, or is still in progress.

mod tls;

pub use tls::{decide as decide_tls, TlsDecision, TlsError, CANCEL_ON};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::WizardError;

/// Marker substrings for each redirect category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RedirectMarkers {
    /// The provider redirected back after granting access.
    pub success: Vec<String>,

    /// The provider or user aborted the flow.
    pub abort: Vec<String>,

    /// Pages where a cancel button should be offered.
    pub show_cancel: Vec<String>,

    /// Offer the cancel button on pages that match nothing.
    pub show_cancel_when_unmatched: bool,
}

impl Default for RedirectMarkers {
    fn default() -> Self {
        Self {
            success: vec!["/oauth/complete".to_string()],
            abort: vec![
                "/oauth/abort".to_string(),
                "error=access_denied".to_string(),
            ],
            show_cancel: vec!["/authorize".to_string(), "/login".to_string()],
            show_cancel_when_unmatched: true,
        }
    }
}

/// Outcome of classifying a URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Redirect {
    Success,
    Abort,
    Continue { show_cancel_button: bool },
}

/// Marker list a URL matched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerCategory {
    Success,
    Abort,
    ShowCancel,
}

/// Classifies redirect URLs by substring containment.
#[derive(Debug, Clone)]
pub struct RedirectClassifier {
    markers: RedirectMarkers,
}

impl RedirectClassifier {
    /// Build a classifier. Empty markers are dropped since they would
    /// match every URL.
    pub fn new(mut markers: RedirectMarkers) -> Self {
        for list in [
            &mut markers.success,
            &mut markers.abort,
            &mut markers.show_cancel,
        ] {
            list.retain(|marker| !marker.is_empty());
        }
        Self { markers }
    }

    pub fn markers(&self) -> &RedirectMarkers {
        &self.markers
    }

    /// Every category whose markers occur in `url`, in check order.
    pub fn matching_categories(&self, url: &str) -> Vec<MarkerCategory> {
        let contains = |list: &Vec<String>| list.iter().any(|marker| url.contains(marker.as_str()));

        let mut categories = Vec::new();
        if contains(&self.markers.success) {
            categories.push(MarkerCategory::Success);
        }
        if contains(&self.markers.abort) {
            categories.push(MarkerCategory::Abort);
        }
        if contains(&self.markers.show_cancel) {
            categories.push(MarkerCategory::ShowCancel);
        }
        categories
    }

    /// Classify a URL. Success is checked first, then abort, then the
    /// cancel-button markers. Unmatched URLs keep the flow going.
    pub fn classify(&self, url: &str) -> Redirect {
        match self.classify_strict(url) {
            Ok(redirect) => redirect,
            Err(_) => Redirect::Continue {
                show_cancel_button: self.markers.show_cancel_when_unmatched,
            },
        }
    }

    /// Like [`classify`](Self::classify) but reports unmatched URLs.
    pub fn classify_strict(&self, url: &str) -> Result<Redirect, WizardError> {
        let categories = self.matching_categories(url);
        if categories.len() > 1 {
            // Precedence between overlapping marker sets is positional only.
            warn!("Redirect matched several categories {:?}: {}", categories, url);
        }

        let redirect = match categories.first() {
            Some(MarkerCategory::Success) => Redirect::Success,
            Some(MarkerCategory::Abort) => Redirect::Abort,
            Some(MarkerCategory::ShowCancel) => Redirect::Continue {
                show_cancel_button: true,
            },
            None => return Err(WizardError::ClassificationUnmatched(url.to_string())),
        };
        debug!("Redirect {} classified as {:?}", url, redirect);
        Ok(redirect)
    }
}

impl Default for RedirectClassifier {
    fn default() -> Self {
        Self::new(RedirectMarkers::default())
    }
}
