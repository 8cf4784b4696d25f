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

//! Pairing Wizard console harness
//!
//! Runs a wizard against the simulated platform. Commands on stdin stand in
//! for user actions and platform callbacks.

use anyhow::{anyhow, Result};
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use pairing_wizard::console::{self, HELP};
use pairing_wizard::platform::SimulatedPlatform;
use pairing_wizard::wizard::HintLog;
use pairing_wizard::{Config, PairingFlow, PairingWizard, PlatformServices, SessionInput};

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration
    let config = Config::load()?;

    // Initialize logging
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(&config.logging.filter)?,
    };
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(filter)
        .init();

    info!("Starting Pairing Wizard v{}...", env!("CARGO_PKG_VERSION"));

    let flow = match std::env::args().nth(1) {
        Some(arg) => PairingFlow::parse(&arg)
            .ok_or_else(|| anyhow!("unknown flow '{}', expected 'ble' or 'oauth'", arg))?,
        None => PairingFlow::BleDevice,
    };

    // Bluetooth starts off so the radio step has something to do
    let platform = SimulatedPlatform::new(false, true);
    let services = PlatformServices {
        bluetooth: platform.bluetooth.clone(),
        wifi: platform.wifi.clone(),
        permissions: platform.permissions.clone(),
    };
    let hints = Arc::new(HintLog::new());

    let wizard = PairingWizard::new(flow, &config, services, hints)?;
    info!(session = %wizard.session().id(), "Wizard ready");

    // Report navigation state changes
    let mut continue_rx = wizard.continue_signal();
    tokio::spawn(async move {
        while continue_rx.changed().await.is_ok() {
            let enabled = *continue_rx.borrow_and_update();
            info!("Continue {}", if enabled { "enabled" } else { "disabled" });
        }
    });

    let mut titles_rx = wizard.titles();
    tokio::spawn(async move {
        while titles_rx.changed().await.is_ok() {
            if let Some(title) = titles_rx.borrow_and_update().clone() {
                info!("Title: {}", title);
            }
        }
    });

    let input_tx = wizard.input_sender();
    tokio::spawn(read_commands(platform, input_tx.clone()));

    println!("{}", HELP);

    let run = wizard.run();
    tokio::pin!(run);

    let outcome = tokio::select! {
        outcome = &mut run => outcome,
        _ = tokio::signal::ctrl_c() => {
            info!("Ctrl-C received, closing wizard");
            if input_tx.send(SessionInput::Close).await.is_err() {
                warn!("Session already gone");
            }
            run.await
        }
    };

    info!("Wizard {}", outcome.as_str());
    Ok(())
}

/// Forward stdin commands to the session until EOF or `quit`.
async fn read_commands(platform: SimulatedPlatform, tx: mpsc::Sender<SessionInput>) {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        let line = match lines.next_line().await {
            Ok(Some(line)) => line,
            Ok(None) => {
                info!("Input closed");
                let _ = tx.send(SessionInput::Close).await;
                return;
            }
            Err(e) => {
                error!("Failed to read input: {}", e);
                let _ = tx.send(SessionInput::Close).await;
                return;
            }
        };

        match console::parse_command(&line, &platform) {
            Ok(Some(input)) => {
                let closing = input == SessionInput::Close;
                if tx.send(input).await.is_err() || closing {
                    return;
                }
            }
            Ok(None) => println!("{}", HELP),
            Err(e) => warn!("{}", e),
        }
    }
}
