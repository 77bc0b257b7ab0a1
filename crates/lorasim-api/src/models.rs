// Wire types for the simulator backend.
//
// Field names follow the backend's JSON. Responses are parsed leniently:
// unknown fields are ignored and display-only fields default when absent.

use std::collections::BTreeMap;
use std::fmt;
use std::fmt::Write as _;

use secrecy::SecretString;
use serde::{Deserialize, Serialize};

// ── Network servers ──────────────────────────────────────────────────

/// A network-server connection as listed by `GET /network-servers`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkServer {
    pub name: String,
    #[serde(default)]
    pub config: Option<ServerConfig>,
    #[serde(default)]
    pub device_count: u32,
    #[serde(default)]
    pub gateway_count: u32,
}

impl NetworkServer {
    /// Backend type, `generic` when the server carries no config.
    pub fn kind(&self) -> ServerKind {
        self.config.as_ref().map_or(ServerKind::Generic, |c| c.kind)
    }

    /// Upstream URL, if the server is linked to a real network server.
    pub fn upstream_url(&self) -> Option<&str> {
        self.config
            .as_ref()
            .and_then(|c| c.url.as_deref())
            .filter(|u| !u.is_empty())
    }
}

/// Which upstream network server a connection mirrors.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ServerKind {
    #[default]
    Generic,
    Loriot,
    ChirpStack,
    Ttn,
    /// A type this client does not know about yet.
    #[serde(other)]
    Unknown,
}

impl ServerKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Generic => "generic",
            Self::Loriot => "loriot",
            Self::ChirpStack => "chirpstack",
            Self::Ttn => "ttn",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for ServerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Server `config` object, discriminated by `type`.
///
/// `loriot` uses `url` + `authHeader`; `chirpstack` and `ttn` use
/// `url` + `apiKey`. Secrets are redacted in `Debug` output.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerConfig {
    #[serde(rename = "type", default)]
    pub kind: ServerKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "secret_opt"
    )]
    pub auth_header: Option<SecretString>,
    #[serde(
        default,
        alias = "apiToken",
        skip_serializing_if = "Option::is_none",
        with = "secret_opt"
    )]
    pub api_key: Option<SecretString>,
}

impl ServerConfig {
    pub fn generic() -> Self {
        Self::default()
    }

    pub fn loriot(url: impl Into<String>, auth_header: SecretString) -> Self {
        Self {
            kind: ServerKind::Loriot,
            url: Some(url.into()),
            auth_header: Some(auth_header),
            api_key: None,
        }
    }

    pub fn chirpstack(url: impl Into<String>, api_key: SecretString) -> Self {
        Self {
            kind: ServerKind::ChirpStack,
            url: Some(url.into()),
            auth_header: None,
            api_key: Some(api_key),
        }
    }

    pub fn ttn(url: impl Into<String>, api_key: SecretString) -> Self {
        Self {
            kind: ServerKind::Ttn,
            url: Some(url.into()),
            auth_header: None,
            api_key: Some(api_key),
        }
    }
}

mod secret_opt {
    use secrecy::{ExposeSecret, SecretString};
    use serde::{Deserialize, Deserializer, Serializer};

    #[allow(clippy::ref_option)]
    pub fn serialize<S: Serializer>(
        value: &Option<SecretString>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match value {
            Some(secret) => serializer.serialize_some(secret.expose_secret()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<SecretString>, D::Error> {
        Ok(Option::<String>::deserialize(deserializer)?.map(SecretString::from))
    }
}

// ── Gateways ─────────────────────────────────────────────────────────

/// A simulated gateway registered under a network server.
///
/// Discovery and data connections are tracked independently; the
/// observed states include `"connected"` and `"disconnected"`, anything
/// else is a transition in progress.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Gateway {
    pub eui: String,
    #[serde(default)]
    pub discovery_uri: Option<String>,
    #[serde(default)]
    pub discovery_state: Option<String>,
    #[serde(default)]
    pub data_uri: Option<String>,
    #[serde(default)]
    pub data_state: Option<String>,
}

// ── Devices ──────────────────────────────────────────────────────────

/// A byte-valued device field (key, address, EUI) as the backend sent it.
///
/// Depending on the backend build these arrive as hex strings or as
/// arrays of byte values. Anything else is kept verbatim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum KeyMaterial {
    Bytes(Vec<u8>),
    Hex(String),
    Other(serde_json::Value),
}

impl KeyMaterial {
    /// Hex rendering for display. Byte arrays are rendered upper-case,
    /// strings are returned as sent.
    pub fn to_hex(&self) -> Option<String> {
        match self {
            Self::Bytes(bytes) => Some(bytes.iter().fold(
                String::with_capacity(bytes.len() * 2),
                |mut out, b| {
                    let _ = write!(out, "{b:02X}");
                    out
                },
            )),
            Self::Hex(s) => Some(s.clone()),
            Self::Other(_) => None,
        }
    }
}

impl From<&str> for KeyMaterial {
    fn from(value: &str) -> Self {
        Self::Hex(value.to_owned())
    }
}

impl From<Vec<u8>> for KeyMaterial {
    fn from(value: Vec<u8>) -> Self {
        Self::Bytes(value)
    }
}

/// A simulated end-device registered under a network server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Device {
    #[serde(alias = "DevEUI")]
    pub deveui: String,
    #[serde(default, alias = "JoinEUI")]
    pub joineui: Option<KeyMaterial>,
    #[serde(default, alias = "AppKey")]
    pub appkey: Option<KeyMaterial>,
    #[serde(default, alias = "DevAddr")]
    pub devaddr: Option<KeyMaterial>,
    #[serde(default, alias = "AppSKey")]
    pub appskey: Option<KeyMaterial>,
    #[serde(default, alias = "NwkSKey")]
    pub nwkskey: Option<KeyMaterial>,
    #[serde(default, alias = "FCntUp")]
    pub fcntup: u32,
    #[serde(default, alias = "FCntDn")]
    pub fcntdn: u32,
}

// ── Request bodies ───────────────────────────────────────────────────

/// `POST /network-servers`
#[derive(Debug, Clone, Serialize)]
pub struct CreateServerRequest {
    pub name: String,
    pub config: ServerConfig,
}

/// `POST /network-servers/{name}/gateways`
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateGatewayRequest {
    pub eui: String,
    pub discovery_uri: String,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub headers: BTreeMap<String, String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latitude: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub longitude: Option<f64>,
}

/// `POST /network-servers/{name}/devices`
///
/// The ABP fields (`devaddr`, session keys, frame counters) are optional
/// and only sent when set.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CreateDeviceRequest {
    pub deveui: String,
    pub joineui: String,
    pub appkey: String,
    pub devnonce: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latitude: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub longitude: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub devaddr: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub appskey: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nwkskey: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fcntup: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fcntdn: Option<u32>,
}
