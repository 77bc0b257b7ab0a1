// ── Operator input for create commands ──
//
// Raw form input goes in, a wire request comes out. Every check here
// runs before anything is sent, so a failure is always a
// `CoreError::Validation`.

use std::collections::BTreeMap;

use secrecy::SecretString;
use url::Url;

use crate::error::CoreError;
use crate::model::eui::parse_hex_field;
use crate::model::{AesKey, Eui64, ServerConfig, ServerKind};
use lorasim_api::{CreateDeviceRequest, CreateGatewayRequest, CreateServerRequest};

const DEVADDR_HEX_LEN: usize = 8;

/// Parse a DevNonce field. Anything that is not a `u16` becomes 0.
pub fn parse_devnonce(raw: &str) -> u16 {
    raw.trim().parse().unwrap_or(0)
}

fn required(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

fn check_url(field: &str, raw: &str) -> Result<String, CoreError> {
    Url::parse(raw)
        .map(|_| raw.to_owned())
        .map_err(|e| CoreError::validation(field, format!("{field} is not a valid URL: {e}")))
}

fn check_coordinates(latitude: Option<f64>, longitude: Option<f64>) -> Result<(), CoreError> {
    if latitude.is_some_and(|lat| !(-90.0..=90.0).contains(&lat)) {
        return Err(CoreError::validation(
            "latitude",
            "latitude must be between -90 and 90",
        ));
    }
    if longitude.is_some_and(|lon| !(-180.0..=180.0).contains(&lon)) {
        return Err(CoreError::validation(
            "longitude",
            "longitude must be between -180 and 180",
        ));
    }
    Ok(())
}

// ── Network server ─────────────────────────────────────────────────

#[derive(Debug, Clone, Default)]
pub struct NewServer {
    pub name: String,
    pub kind: ServerKind,
    pub url: Option<String>,
    /// LORIOT only.
    pub auth_header: Option<String>,
    /// ChirpStack and TTN.
    pub api_key: Option<String>,
}

impl NewServer {
    pub fn generic(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<CreateServerRequest, CoreError> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(CoreError::validation("name", "Please enter a server name"));
        }

        let url = required(self.url.as_deref());
        let config = match self.kind {
            ServerKind::Generic => ServerConfig::generic(),
            ServerKind::Loriot => {
                let (Some(url), Some(auth)) = (url, required(self.auth_header.as_deref())) else {
                    return Err(CoreError::validation(
                        "auth_header",
                        "Please fill in all LORIOT fields",
                    ));
                };
                ServerConfig::loriot(check_url("url", url)?, SecretString::from(auth.to_owned()))
            }
            ServerKind::ChirpStack => {
                let (Some(url), Some(key)) = (url, required(self.api_key.as_deref())) else {
                    return Err(CoreError::validation(
                        "api_key",
                        "Please fill in all ChirpStack fields",
                    ));
                };
                ServerConfig::chirpstack(check_url("url", url)?, SecretString::from(key.to_owned()))
            }
            ServerKind::Ttn => {
                let (Some(url), Some(key)) = (url, required(self.api_key.as_deref())) else {
                    return Err(CoreError::validation(
                        "api_key",
                        "Please fill in all TTN fields",
                    ));
                };
                ServerConfig::ttn(check_url("url", url)?, SecretString::from(key.to_owned()))
            }
            ServerKind::Unknown => {
                return Err(CoreError::validation("type", "Unsupported server type"));
            }
        };

        Ok(CreateServerRequest {
            name: name.to_owned(),
            config,
        })
    }
}

// ── Gateway ────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default)]
pub struct NewGateway {
    pub eui: String,
    pub discovery_uri: String,
    /// Extra headers sent on the discovery/data connections.
    pub headers: BTreeMap<String, String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

impl NewGateway {
    pub fn validate(&self) -> Result<CreateGatewayRequest, CoreError> {
        let (Some(eui), Some(uri)) = (
            required(Some(self.eui.as_str())),
            required(Some(self.discovery_uri.as_str())),
        ) else {
            return Err(CoreError::validation("eui", "Please fill in all fields"));
        };
        let eui: Eui64 = eui.parse()?;
        check_coordinates(self.latitude, self.longitude)?;

        Ok(CreateGatewayRequest {
            eui: eui.into(),
            discovery_uri: check_url("discovery_uri", uri)?,
            headers: self.headers.clone(),
            latitude: self.latitude,
            longitude: self.longitude,
        })
    }
}

// ── Device ─────────────────────────────────────────────────────────

/// A device to register. OTAA needs `deveui`, `joineui` and `appkey`;
/// the optional ABP fields pre-seed a session.
#[derive(Debug, Clone, Default)]
pub struct NewDevice {
    pub deveui: String,
    pub joineui: String,
    pub appkey: String,
    pub devnonce: u16,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub devaddr: Option<String>,
    pub appskey: Option<String>,
    pub nwkskey: Option<String>,
    pub fcntup: Option<u32>,
    pub fcntdn: Option<u32>,
}

impl NewDevice {
    pub fn validate(&self) -> Result<CreateDeviceRequest, CoreError> {
        let (Some(deveui), Some(joineui), Some(appkey)) = (
            required(Some(self.deveui.as_str())),
            required(Some(self.joineui.as_str())),
            required(Some(self.appkey.as_str())),
        ) else {
            return Err(CoreError::validation("deveui", "Please fill in all fields"));
        };

        let deveui = parse_hex_field("deveui", deveui, Eui64::HEX_LEN)?;
        let joineui = parse_hex_field("joineui", joineui, Eui64::HEX_LEN)?;
        let appkey = parse_hex_field("appkey", appkey, AesKey::HEX_LEN)?;
        check_coordinates(self.latitude, self.longitude)?;

        let optional = |field: &str, value: Option<&String>, len: usize| {
            required(value.map(String::as_str))
                .map(|v| parse_hex_field(field, v, len))
                .transpose()
        };

        Ok(CreateDeviceRequest {
            deveui,
            joineui,
            appkey,
            devnonce: self.devnonce,
            latitude: self.latitude,
            longitude: self.longitude,
            devaddr: optional("devaddr", self.devaddr.as_ref(), DEVADDR_HEX_LEN)?,
            appskey: optional("appskey", self.appskey.as_ref(), AesKey::HEX_LEN)?,
            nwkskey: optional("nwkskey", self.nwkskey.as_ref(), AesKey::HEX_LEN)?,
            fcntup: self.fcntup,
            fcntdn: self.fcntdn,
        })
    }
}
