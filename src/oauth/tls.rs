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

//! Certificate error policy for the embedded sign-in browser.

use tracing::warn;

/// Certificate errors the embedded browser can report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TlsError {
    NotYetValid,
    Expired,
    IdMismatch,
    Untrusted,
    DateInvalid,
    Invalid,
    Other(i32),
}

impl TlsError {
    /// Map a platform error code.
    pub fn from_code(code: i32) -> Self {
        match code {
            0 => TlsError::NotYetValid,
            1 => TlsError::Expired,
            2 => TlsError::IdMismatch,
            3 => TlsError::Untrusted,
            4 => TlsError::DateInvalid,
            5 => TlsError::Invalid,
            other => TlsError::Other(other),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TlsError::NotYetValid => "not yet valid",
            TlsError::Expired => "expired",
            TlsError::IdMismatch => "id mismatch",
            TlsError::Untrusted => "untrusted",
            TlsError::DateInvalid => "date invalid",
            TlsError::Invalid => "invalid",
            TlsError::Other(_) => "other",
        }
    }
}

/// What to do with the connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TlsDecision {
    Cancel,
    Proceed,
}

/// Errors that always cancel the connection. Everything else proceeds.
pub const CANCEL_ON: [TlsError; 4] = [
    TlsError::DateInvalid,
    TlsError::IdMismatch,
    TlsError::Invalid,
    TlsError::Untrusted,
];

/// Decide whether to continue past a certificate error.
pub fn decide(error: TlsError) -> TlsDecision {
    if CANCEL_ON.contains(&error) {
        warn!("Cancelling connection on {} certificate", error.as_str());
        TlsDecision::Cancel
    } else {
        warn!("Proceeding past {} certificate error", error.as_str());
        TlsDecision::Proceed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deny_set_cancels() {
        for error in CANCEL_ON {
            assert_eq!(decide(error), TlsDecision::Cancel, "{:?}", error);
        }
    }

    #[test]
    fn test_everything_else_proceeds() {
        for code in -3..64 {
            let error = TlsError::from_code(code);
            let expected = if CANCEL_ON.contains(&error) {
                TlsDecision::Cancel
            } else {
                TlsDecision::Proceed
            };
            assert_eq!(decide(error), expected, "code {}", code);
        }
        assert_eq!(decide(TlsError::Expired), TlsDecision::Proceed);
        assert_eq!(decide(TlsError::NotYetValid), TlsDecision::Proceed);
    }

    #[test]
    fn test_code_mapping() {
        assert_eq!(TlsError::from_code(2), TlsError::IdMismatch);
        assert_eq!(TlsError::from_code(3), TlsError::Untrusted);
        assert_eq!(TlsError::from_code(4), TlsError::DateInvalid);
        assert_eq!(TlsError::from_code(5), TlsError::Invalid);
        assert_eq!(TlsError::from_code(42), TlsError::Other(42));
    }
}
