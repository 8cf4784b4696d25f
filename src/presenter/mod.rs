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

//! Presenters over the remote model service.
//!
//! Every call to the service is made here and every failure is turned into
//! a view signal. Views only ever receive plain data.

mod heal;
mod removal;

pub use heal::{HealPhase, HealPresenter, HealProgress, HealView};
pub use removal::{RemovalPresenter, RemovalResult, RemovalView};

use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::sync::Arc;
use tokio::sync::broadcast;
use tracing::{debug, warn};

use crate::error::WizardError;

/// A model as held by the remote service: typed attributes keyed by
/// namespaced name (`dev:name`, `hubzwave:healPercent`, ...).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RemoteModel {
    pub id: String,
    #[serde(rename = "type")]
    pub model_type: String,
    #[serde(default)]
    pub attributes: Map<String, Value>,
    #[serde(skip)]
    changes: Map<String, Value>,
}

impl RemoteModel {
    pub fn new(id: impl Into<String>, model_type: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            model_type: model_type.into(),
            ..Self::default()
        }
    }

    pub fn with_attribute(mut self, key: impl Into<String>, value: Value) -> Self {
        self.attributes.insert(key.into(), value);
        self
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.attributes.get(key)
    }

    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(Value::as_str)
    }

    /// Set an attribute locally and remember it for the next commit.
    pub fn set(&mut self, key: impl Into<String>, value: Value) {
        let key = key.into();
        self.attributes.insert(key.clone(), value.clone());
        self.changes.insert(key, value);
    }

    /// Attributes changed since the last commit.
    pub fn changes(&self) -> &Map<String, Value> {
        &self.changes
    }

    pub fn is_dirty(&self) -> bool {
        !self.changes.is_empty()
    }

    pub fn clear_changes(&mut self) {
        self.changes.clear();
    }
}

/// The remote model service.
#[async_trait]
pub trait RemoteModelPort: Send + Sync {
    async fn load(&self, id: &str) -> Result<RemoteModel>;

    async fn commit(&self, id: &str, changes: &Map<String, Value>) -> Result<()>;

    /// Invoke a method on a model, e.g. `hubzwave:Heal`.
    async fn invoke(&self, id: &str, method: &str, args: Value) -> Result<Value>;

    /// Ask the service to delete a model. Completion is announced on
    /// [`deletions`](Self::deletions).
    async fn remove(&self, id: &str) -> Result<()>;

    /// Ids of models the service has deleted.
    fn deletions(&self) -> broadcast::Receiver<String>;
}

/// View fed by [`ModelPresenter`].
pub trait ModelView: Send + Sync {
    fn show_loading(&self) {}
    fn show_model(&self, model: &RemoteModel);
    fn show_saved(&self) {}
    fn show_generic_error(&self);
}

/// Loads one model and applies edits to it.
pub struct ModelPresenter {
    port: Arc<dyn RemoteModelPort>,
    view: Arc<dyn ModelView>,
    model: Option<RemoteModel>,
    last_error: Option<WizardError>,
}

impl ModelPresenter {
    pub fn new(port: Arc<dyn RemoteModelPort>, view: Arc<dyn ModelView>) -> Self {
        Self {
            port,
            view,
            model: None,
            last_error: None,
        }
    }

    pub fn model(&self) -> Option<&RemoteModel> {
        self.model.as_ref()
    }

    pub fn last_error(&self) -> Option<&WizardError> {
        self.last_error.as_ref()
    }

    pub async fn load(&mut self, id: &str) {
        self.view.show_loading();
        match self.port.load(id).await {
            Ok(model) => {
                debug!("Loaded model {}", model.id);
                self.last_error = None;
                self.view.show_model(&model);
                self.model = Some(model);
            }
            Err(e) => self.fail(e),
        }
    }

    /// Set an attribute and commit it. Without a loaded model this is a
    /// failure like any other.
    pub async fn update(&mut self, key: &str, value: Value) {
        let Some(model) = self.model.as_mut() else {
            self.fail(anyhow::anyhow!("no model loaded"));
            return;
        };
        model.set(key, value);

        let id = model.id.clone();
        let changes = model.changes().clone();
        match self.port.commit(&id, &changes).await {
            Ok(()) => {
                if let Some(model) = self.model.as_mut() {
                    model.clear_changes();
                }
                self.last_error = None;
                self.view.show_saved();
            }
            // Changes stay pending so a retry commits them again.
            Err(e) => self.fail(e),
        }
    }

    fn fail(&mut self, error: anyhow::Error) {
        let error = WizardError::RemoteCallFailure(error.to_string());
        warn!("{}", error);
        self.last_error = Some(error);
        self.view.show_generic_error();
    }
}

#[cfg(test)]
pub(crate) mod testing {
    //! In-memory service shared by presenter tests.

    use super::*;
    use anyhow::anyhow;
    use parking_lot::Mutex;
    use std::collections::HashMap;

    pub struct FakeService {
        pub models: Mutex<HashMap<String, RemoteModel>>,
        pub fail: Mutex<bool>,
        pub confirm_removal: Mutex<bool>,
        pub stall_removal: Mutex<bool>,
        pub commits: Mutex<Vec<(String, Map<String, Value>)>>,
        pub invocations: Mutex<Vec<(String, String)>>,
        deleted_tx: broadcast::Sender<String>,
    }

    impl FakeService {
        pub fn new() -> Self {
            let (deleted_tx, _) = broadcast::channel(8);
            Self {
                models: Mutex::new(HashMap::new()),
                fail: Mutex::new(false),
                confirm_removal: Mutex::new(true),
                stall_removal: Mutex::new(false),
                commits: Mutex::new(Vec::new()),
                invocations: Mutex::new(Vec::new()),
                deleted_tx,
            }
        }

        pub fn insert(&self, model: RemoteModel) {
            self.models.lock().insert(model.id.clone(), model);
        }

        pub fn announce_deleted(&self, id: &str) {
            let _ = self.deleted_tx.send(id.to_string());
        }

        fn check(&self) -> Result<()> {
            if *self.fail.lock() {
                Err(anyhow!("service unavailable"))
            } else {
                Ok(())
            }
        }
    }

    #[async_trait]
    impl RemoteModelPort for FakeService {
        async fn load(&self, id: &str) -> Result<RemoteModel> {
            self.check()?;
            self.models
                .lock()
                .get(id)
                .cloned()
                .ok_or_else(|| anyhow!("no model {}", id))
        }

        async fn commit(&self, id: &str, changes: &Map<String, Value>) -> Result<()> {
            self.check()?;
            self.commits.lock().push((id.to_string(), changes.clone()));
            Ok(())
        }

        async fn invoke(&self, id: &str, method: &str, _args: Value) -> Result<Value> {
            self.check()?;
            self.invocations
                .lock()
                .push((id.to_string(), method.to_string()));
            Ok(Value::Null)
        }

        async fn remove(&self, id: &str) -> Result<()> {
            self.check()?;
            let stalled = *self.stall_removal.lock();
            if stalled {
                std::future::pending::<()>().await;
            }
            if *self.confirm_removal.lock() {
                self.announce_deleted(id);
            }
            Ok(())
        }

        fn deletions(&self) -> broadcast::Receiver<String> {
            self.deleted_tx.subscribe()
        }
    }
}
