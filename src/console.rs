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

//! Console commands for driving a session against the simulated platform.

use anyhow::{anyhow, bail, Result};

use crate::oauth::TlsError;
use crate::platform::{Permission, PermissionStatus, Radio, SimulatedPlatform};
use crate::session::SessionInput;
use crate::wizard::StepInput;

pub const HELP: &str = "\
Commands:
  next | n                   press Continue
  back | b                   press Back
  page <index>               swipe to a page
  bt on|off                  toggle Bluetooth
  wifi on|off                toggle Wi-Fi
  location grant|deny|never  answer the location prompt
  creds <ssid> [password]    enter Wi-Fi credentials
  url <url>                  sign-in page finished loading
  tls <code>                 certificate error in sign-in page
  quit | q                   close the wizard";

/// Parse one line. Blank lines and `help` yield `None`.
///
/// Platform commands change the simulated platform immediately and return
/// the event it would have emitted.
pub fn parse_command(line: &str, platform: &SimulatedPlatform) -> Result<Option<SessionInput>> {
    let line = line.trim();
    let (command, rest) = match line.split_once(char::is_whitespace) {
        Some((command, rest)) => (command, rest.trim()),
        None => (line, ""),
    };

    let input = match command.to_lowercase().as_str() {
        "" | "help" | "?" => return Ok(None),
        "next" | "n" => SessionInput::Next,
        "back" | "b" => SessionInput::Back,
        "quit" | "q" | "exit" => SessionInput::Close,
        "page" => {
            let index = rest
                .parse()
                .map_err(|_| anyhow!("page needs an index, got '{}'", rest))?;
            SessionInput::PageSelected(index)
        }
        "bt" | "bluetooth" => {
            SessionInput::Platform(platform.radio(Radio::Bluetooth).set_enabled(on_off(rest)?))
        }
        "wifi" => SessionInput::Platform(platform.radio(Radio::Wifi).set_enabled(on_off(rest)?)),
        "location" => {
            let status = match rest {
                "grant" => PermissionStatus::Granted,
                "deny" => PermissionStatus::Denied,
                "never" => PermissionStatus::DeniedPermanently,
                other => bail!("location expects grant, deny or never, got '{}'", other),
            };
            SessionInput::Platform(platform.permissions.answer(Permission::Location, status))
        }
        "creds" => {
            let (ssid, password) = match rest.split_once(char::is_whitespace) {
                Some((ssid, password)) => (ssid, password.trim()),
                None => (rest, ""),
            };
            SessionInput::Step(StepInput::Credentials {
                ssid: ssid.to_string(),
                password: password.to_string(),
            })
        }
        "url" => {
            if rest.is_empty() {
                bail!("url needs an address");
            }
            SessionInput::Step(StepInput::RedirectLoaded(rest.to_string()))
        }
        "tls" => {
            let code = rest
                .parse()
                .map_err(|_| anyhow!("tls needs a numeric code, got '{}'", rest))?;
            SessionInput::Step(StepInput::TlsError(TlsError::from_code(code)))
        }
        other => bail!("unknown command '{}'", other),
    };
    Ok(Some(input))
}

fn on_off(arg: &str) -> Result<bool> {
    match arg {
        "on" => Ok(true),
        "off" => Ok(false),
        other => bail!("expected on or off, got '{}'", other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::{PlatformEvent, RadioService};

    fn parse(line: &str, platform: &SimulatedPlatform) -> Option<SessionInput> {
        parse_command(line, platform).unwrap()
    }

    #[test]
    fn test_navigation_commands() {
        let p = SimulatedPlatform::new(false, false);
        assert_eq!(parse("n", &p), Some(SessionInput::Next));
        assert_eq!(parse(" back ", &p), Some(SessionInput::Back));
        assert_eq!(parse("page 2", &p), Some(SessionInput::PageSelected(2)));
        assert_eq!(parse("", &p), None);
        assert_eq!(parse("help", &p), None);
    }

    #[test]
    fn test_platform_commands_update_simulation() {
        let p = SimulatedPlatform::new(false, false);
        assert_eq!(
            parse("bt on", &p),
            Some(SessionInput::Platform(PlatformEvent::RadioChanged {
                radio: Radio::Bluetooth,
                enabled: true
            }))
        );
        assert!(p.bluetooth.is_enabled());

        parse("location never", &p);
        assert_eq!(
            crate::platform::PermissionBroker::status(p.permissions.as_ref(), Permission::Location),
            PermissionStatus::DeniedPermanently
        );
    }

    #[test]
    fn test_step_commands() {
        let p = SimulatedPlatform::new(false, false);
        assert_eq!(
            parse("creds home correct horse", &p),
            Some(SessionInput::Step(StepInput::Credentials {
                ssid: "home".into(),
                password: "correct horse".into()
            }))
        );
        assert_eq!(
            parse("tls 3", &p),
            Some(SessionInput::Step(StepInput::TlsError(TlsError::Untrusted)))
        );
    }

    #[test]
    fn test_bad_commands() {
        let p = SimulatedPlatform::new(false, false);
        assert!(parse_command("page x", &p).is_err());
        assert!(parse_command("bt maybe", &p).is_err());
        assert!(parse_command("url", &p).is_err());
        assert!(parse_command("dance", &p).is_err());
    }
}
