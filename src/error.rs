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

//! Error taxonomy for wizard steps and presenters.

use thiserror::Error;

use crate::platform::Permission;

/// Failures a step or presenter can run into.
///
/// None of these reach the view layer directly. Steps turn them into a
/// disabled continue signal plus a hint, presenters into a generic error.
#[derive(Debug, Error)]
pub enum WizardError {
    #[error("remote call failed: {0}")]
    RemoteCallFailure(String),

    #[error("{0} permission denied")]
    PermissionDenied(Permission),

    #[error("{0} permission permanently denied")]
    PermissionDeniedPermanently(Permission),

    #[error("{0} is unavailable")]
    CapabilityUnavailable(&'static str),

    #[error("no redirect marker matched {0}")]
    ClassificationUnmatched(String),

    #[error("timed out after {0:?}")]
    Timeout(std::time::Duration),
}
