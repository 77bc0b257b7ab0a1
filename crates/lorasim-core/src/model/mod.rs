// ── Domain model ──
//
// Wire entities come straight from `lorasim-api`; this module adds the
// rules derived from them.

pub mod credential;
pub mod device;
pub mod eui;
pub mod gateway;

pub use credential::{is_absent, is_present};
pub use device::{
    Availability, JOIN_DISABLED_REASON, UPLINK_DISABLED_REASON, can_join, has_session_keys,
    join_availability, uplink_availability,
};
pub use eui::{AesKey, Eui64};
pub use gateway::{GatewayAction, GatewayStatus};

pub use lorasim_api::{Device, Gateway, KeyMaterial, NetworkServer, ServerConfig, ServerKind};
