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

//! Informational step.

use crate::wizard::Step;

use super::StepPorts;

/// A page of instructions. Always allows moving on.
pub struct InfoStep {
    id: String,
    title: String,
    body: String,
    ports: StepPorts,
}

impl InfoStep {
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        body: impl Into<String>,
        ports: StepPorts,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            body: body.into(),
            ports,
        }
    }

    pub fn body(&self) -> &str {
        &self.body
    }
}

impl Step for InfoStep {
    fn id(&self) -> &str {
        &self.id
    }

    fn title(&self) -> Option<&str> {
        Some(&self.title)
    }

    fn on_page_selected(&mut self) {
        self.ports.navigation.enable_continue();
    }
}
