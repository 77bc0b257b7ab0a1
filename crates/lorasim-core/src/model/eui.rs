// ── Hex identifiers ──
//
// LoRaWAN identifiers and keys typed by an operator. Separators (`:`,
// `-`, whitespace) are dropped and the result is lowercased, matching the
// form the backend returns.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Strip separators and check for exactly `len` hex digits.
fn normalize_hex(raw: &str, len: usize) -> Option<String> {
    let cleaned: String = raw
        .chars()
        .filter(|c| !matches!(c, ':' | '-') && !c.is_whitespace())
        .collect();
    (cleaned.len() == len && cleaned.chars().all(|c| c.is_ascii_hexdigit()))
        .then(|| cleaned.to_ascii_lowercase())
}

/// Validate a hex field of a fixed width, reporting `field` on failure.
pub(crate) fn parse_hex_field(field: &str, raw: &str, len: usize) -> Result<String, CoreError> {
    if raw.trim().is_empty() {
        return Err(CoreError::validation(field, format!("{field} is required")));
    }
    normalize_hex(raw, len).ok_or_else(|| {
        CoreError::validation(field, format!("{field} must be {len} hex characters"))
    })
}

// ── Eui64 ───────────────────────────────────────────────────────────

/// 64-bit extended unique identifier (DevEUI, JoinEUI, gateway EUI).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Eui64(String);

impl Eui64 {
    pub const HEX_LEN: usize = 16;

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// An EUI of all zeros (unset JoinEUI on ABP devices).
    pub fn is_zero(&self) -> bool {
        self.0.chars().all(|c| c == '0')
    }
}

impl fmt::Display for Eui64 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for Eui64 {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_hex_field("EUI", s, Self::HEX_LEN).map(Self)
    }
}

impl TryFrom<String> for Eui64 {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Eui64> for String {
    fn from(value: Eui64) -> Self {
        value.0
    }
}

// ── AppKey ──────────────────────────────────────────────────────────

/// 128-bit AES key (AppKey, AppSKey, NwkSKey).
#[derive(Clone, PartialEq, Eq)]
pub struct AesKey(String);

impl AesKey {
    pub const HEX_LEN: usize = 32;

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

// Keys stay out of logs.
impl fmt::Debug for AesKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AesKey(**)")
    }
}

impl FromStr for AesKey {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_hex_field("key", s, Self::HEX_LEN).map(Self)
    }
}
