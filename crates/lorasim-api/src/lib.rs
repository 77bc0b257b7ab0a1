// lorasim-api: Async Rust client for the LoRaWAN simulator backend

pub mod client;
pub mod error;
pub mod models;
pub mod transport;

mod devices;
mod gateways;
mod servers;

pub use client::FleetClient;
pub use error::{Error, GENERIC_FAILURE};
pub use models::{
    CreateDeviceRequest, CreateGatewayRequest, CreateServerRequest, Device, Gateway, KeyMaterial,
    NetworkServer, ServerConfig, ServerKind,
};
pub use transport::TransportConfig;
