//! Fleet state and orchestration between `lorasim-api` and the front ends.
//!
//! This crate owns the domain rules and the reactive data layer for the
//! lorasim workspace:
//!
//! - **[`Controller`]**: facade over the backend. [`refresh()`](Controller::refresh)
//!   reloads the whole server/gateway/device tree; [`execute()`](Controller::execute)
//!   runs a [`Command`] and refreshes the tree after it, publishing
//!   [`CommandEvent`]s as it goes.
//!
//! - **[`EntityStore`]**: holds the current [`FleetSnapshot`] behind a
//!   `tokio::sync::watch` channel. Refresh results carry a generation
//!   number and stale ones are dropped.
//!
//! - **[`FleetStream`]**: subscription handle vended by the store, with
//!   `current()` / `latest()` / `changed()` for reactive rendering.
//!
//! - **Domain rules** ([`model`]): credential absence, join/uplink
//!   eligibility, gateway status classification.
//!
//! - **[`PresentationState`]** and [`render`]: expansion state per server
//!   and the pure function turning a snapshot into a [`FleetView`].

pub mod command;
pub mod config;
pub mod controller;
pub mod error;
pub mod model;
pub mod presentation;
pub mod store;
pub mod stream;
pub mod view;

// ── Primary re-exports ──────────────────────────────────────────────
pub use command::{
    Command, CommandEvent, CommandOutcome, CommandPhase, NewDevice, NewGateway, NewServer,
    parse_devnonce,
};
pub use config::{ControllerConfig, DEFAULT_BACKEND_URL};
pub use controller::Controller;
pub use error::CoreError;
pub use presentation::{ExpansionSet, PresentationState, TreeLevel};
pub use store::{EntityStore, FleetSnapshot, RefreshFailure, RefreshReport};
pub use stream::FleetStream;
pub use view::{DeviceView, FleetView, GatewayView, GroupView, Row, ServerView, render};

pub use model::{
    AesKey, Availability, Device, Eui64, Gateway, GatewayAction, GatewayStatus, KeyMaterial,
    NetworkServer, ServerConfig, ServerKind, can_join, has_session_keys, is_absent,
};
