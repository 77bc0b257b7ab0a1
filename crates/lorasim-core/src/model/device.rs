// ── Device eligibility rules ──
//
// Advisory gates for the Join and Uplink actions. The backend still has
// the final say; these only decide what the operator is offered.

use serde::Serialize;

use lorasim_api::Device;

use super::credential::is_absent;

/// Reason shown when Join is unavailable.
pub const JOIN_DISABLED_REASON: &str = "ABP device";
/// Reason shown when Uplink is unavailable.
pub const UPLINK_DISABLED_REASON: &str = "Device must join first";

/// OTAA material present: both the AppKey and the JoinEUI are non-zero.
pub fn can_join(device: &Device) -> bool {
    !is_absent(device.appkey.as_ref()) && !is_absent(device.joineui.as_ref())
}

/// Session established: DevAddr, AppSKey and NwkSKey are all non-zero.
pub fn has_session_keys(device: &Device) -> bool {
    !is_absent(device.devaddr.as_ref())
        && !is_absent(device.appskey.as_ref())
        && !is_absent(device.nwkskey.as_ref())
}

/// Whether an action can be offered, and why not.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "lowercase")]
pub enum Availability {
    Available,
    Disabled { reason: &'static str },
}

impl Availability {
    fn gate(allowed: bool, reason: &'static str) -> Self {
        if allowed {
            Self::Available
        } else {
            Self::Disabled { reason }
        }
    }

    pub fn is_available(self) -> bool {
        matches!(self, Self::Available)
    }

    pub fn reason(self) -> Option<&'static str> {
        match self {
            Self::Available => None,
            Self::Disabled { reason } => Some(reason),
        }
    }
}

pub fn join_availability(device: &Device) -> Availability {
    Availability::gate(can_join(device), JOIN_DISABLED_REASON)
}

pub fn uplink_availability(device: &Device) -> Availability {
    Availability::gate(has_session_keys(device), UPLINK_DISABLED_REASON)
}

#[cfg(test)]
mod tests {
    use lorasim_api::KeyMaterial;

    use super::*;

    fn device() -> Device {
        Device {
            deveui: "0102030405060708".into(),
            joineui: None,
            appkey: None,
            devaddr: None,
            appskey: None,
            nwkskey: None,
            fcntup: 0,
            fcntdn: 0,
        }
    }

    fn key(s: &str) -> Option<KeyMaterial> {
        Some(KeyMaterial::from(s))
    }

    #[test]
    fn otaa_device_can_join_but_not_uplink() {
        let dev = Device {
            joineui: key("0000000000000001"),
            appkey: key("000102030405060708090a0b0c0d0e0f"),
            ..device()
        };
        assert!(can_join(&dev));
        assert!(!has_session_keys(&dev));
        assert_eq!(
            uplink_availability(&dev).reason(),
            Some("Device must join first")
        );
    }

    #[test]
    fn zero_appkey_blocks_join() {
        let dev = Device {
            joineui: key("0000000000000001"),
            appkey: key("00000000000000000000000000000000"),
            ..device()
        };
        assert!(!can_join(&dev));
        assert_eq!(join_availability(&dev).reason(), Some("ABP device"));
    }

    #[test]
    fn zero_joineui_blocks_join() {
        let dev = Device {
            joineui: Some(KeyMaterial::Bytes(vec![0; 8])),
            appkey: key("000102030405060708090a0b0c0d0e0f"),
            ..device()
        };
        assert!(!can_join(&dev));
    }

    #[test]
    fn joined_device_has_session_keys() {
        let dev = Device {
            devaddr: key("26011bda"),
            appskey: Some(KeyMaterial::Bytes((1..=16).collect())),
            nwkskey: key("0f0e0d0c0b0a09080706050403020100"),
            ..device()
        };
        assert!(has_session_keys(&dev));
        assert!(uplink_availability(&dev).is_available());
    }

    #[test]
    fn one_zero_session_key_blocks_uplink() {
        let dev = Device {
            devaddr: key("26011bda"),
            appskey: key("0f0e0d0c0b0a09080706050403020100"),
            nwkskey: key("0000 0000 0000 0000 0000 0000 0000 0000"),
            ..device()
        };
        assert!(!has_session_keys(&dev));
    }

    #[test]
    fn counters_do_not_affect_eligibility() {
        let quiet = Device {
            joineui: key("0000000000000001"),
            appkey: key("000102030405060708090a0b0c0d0e0f"),
            ..device()
        };
        let busy = Device {
            fcntup: 9_000,
            fcntdn: 12,
            ..quiet.clone()
        };
        assert_eq!(can_join(&quiet), can_join(&busy));
        assert_eq!(has_session_keys(&quiet), has_session_keys(&busy));
    }
}
