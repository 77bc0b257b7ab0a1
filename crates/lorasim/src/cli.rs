//! Clap derive structures for the `lorasim` CLI.
//!
//! Defines the complete command tree, global flags, and shared types.
//! Depends only on clap so `build.rs` can render man pages from it.

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// lorasim -- drive a LoRaWAN test fleet from the command line
#[derive(Debug, Parser)]
#[command(
    name = "lorasim",
    version,
    about = "Manage simulated LoRaWAN gateways and devices",
    long_about = "Create network-server connections, gateways and devices on a\n\
        LoRaWAN simulator backend, connect gateways, and trigger joins and\n\
        uplinks. Run `lorasim-tui` for the interactive dashboard.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Backend profile to use
    #[arg(long, short = 'p', env = "LORASIM_PROFILE", global = true)]
    pub profile: Option<String>,

    /// Simulator backend URL (overrides profile)
    #[arg(long, short = 'b', env = "LORASIM_BACKEND", global = true)]
    pub backend: Option<String>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "LORASIM_OUTPUT",
        default_value = "table",
        global = true
    )]
    pub output: OutputFormat,

    /// When to use color output
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorMode,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Skip confirmation prompts
    #[arg(long, short = 'y', global = true)]
    pub yes: bool,

    /// Request timeout in seconds (default: wait indefinitely)
    #[arg(long, env = "LORASIM_TIMEOUT", global = true)]
    pub timeout: Option<u64>,
}

// ── Output & Color Enums ─────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// YAML
    Yaml,
    /// Plain text, one value per line (scripting)
    Plain,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ColorMode {
    /// Auto-detect (color if terminal is interactive)
    Auto,
    /// Always emit color codes
    Always,
    /// Never emit color codes
    Never,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Manage network-server connections
    #[command(alias = "srv", alias = "s")]
    Servers(ServersArgs),

    /// Manage simulated gateways
    #[command(alias = "gw", alias = "g")]
    Gateways(GatewaysArgs),

    /// Manage simulated end-devices
    #[command(alias = "dev", alias = "d")]
    Devices(DevicesArgs),

    /// Show the whole fleet as a tree
    Tree(TreeArgs),

    /// Reload the fleet and report what was found
    Refresh,

    /// Manage CLI configuration and profiles
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  NETWORK SERVERS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct ServersArgs {
    #[command(subcommand)]
    pub command: ServersCommand,
}

#[derive(Debug, Subcommand)]
pub enum ServersCommand {
    /// List network servers
    #[command(alias = "ls")]
    List,

    /// Create a network-server connection
    Create {
        /// Unique server name
        name: String,

        /// Upstream network-server type
        #[arg(long = "type", short = 't', default_value = "generic")]
        kind: ServerType,

        /// Upstream URL (loriot, chirpstack, ttn)
        #[arg(long)]
        url: Option<String>,

        /// LORIOT authorization header
        #[arg(long)]
        auth_header: Option<String>,

        /// ChirpStack / TTN API key
        #[arg(long, hide_env = true, env = "LORASIM_UPSTREAM_API_KEY")]
        api_key: Option<String>,
    },

    /// Delete a network server and everything under it
    #[command(alias = "rm")]
    Delete {
        /// Server name
        name: String,
    },

    /// Pull gateways and devices from the upstream network server
    Sync {
        /// Server name
        name: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ServerType {
    Generic,
    Loriot,
    #[value(name = "chirpstack")]
    ChirpStack,
    Ttn,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  GATEWAYS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct GatewaysArgs {
    #[command(subcommand)]
    pub command: GatewaysCommand,
}

#[derive(Debug, Subcommand)]
pub enum GatewaysCommand {
    /// List gateways under a server
    #[command(alias = "ls")]
    List {
        /// Server name
        server: String,
    },

    /// Create a gateway
    Create {
        /// Server name
        server: String,

        /// Gateway EUI (16 hex characters)
        eui: String,

        /// Discovery URI the gateway announces to
        #[arg(long)]
        discovery_uri: String,

        /// Extra HTTP header for the gateway link (KEY=VALUE, repeatable)
        #[arg(long = "header", value_name = "KEY=VALUE")]
        headers: Vec<String>,

        /// Latitude in degrees
        #[arg(long, allow_hyphen_values = true)]
        latitude: Option<f64>,

        /// Longitude in degrees
        #[arg(long, allow_hyphen_values = true)]
        longitude: Option<f64>,
    },

    /// Delete a gateway
    #[command(alias = "rm")]
    Delete(GatewayRef),

    /// Bring a gateway's links up
    Connect(GatewayRef),

    /// Take a gateway's links down
    Disconnect(GatewayRef),
}

#[derive(Debug, Args)]
pub struct GatewayRef {
    /// Server name
    pub server: String,

    /// Gateway EUI
    pub eui: String,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  DEVICES
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct DevicesArgs {
    #[command(subcommand)]
    pub command: DevicesCommand,
}

#[derive(Debug, Subcommand)]
pub enum DevicesCommand {
    /// List devices under a server
    #[command(alias = "ls")]
    List {
        /// Server name
        server: String,
    },

    /// Create a device
    Create(DeviceCreateArgs),

    /// Delete a device
    #[command(alias = "rm")]
    Delete(DeviceRef),

    /// Send a join request (OTAA devices only)
    Join(DeviceRef),

    /// Send an uplink (requires session keys)
    Uplink(DeviceRef),
}

#[derive(Debug, Args)]
pub struct DeviceRef {
    /// Server name
    pub server: String,

    /// Device EUI
    pub eui: String,
}

#[derive(Debug, Args)]
pub struct DeviceCreateArgs {
    /// Server name
    pub server: String,

    /// Device EUI (16 hex characters)
    pub deveui: String,

    /// Join EUI (16 hex characters)
    #[arg(long)]
    pub joineui: String,

    /// Application key (32 hex characters)
    #[arg(long)]
    pub appkey: String,

    /// Starting DevNonce; unparseable values become 0
    #[arg(long, default_value = "0")]
    pub devnonce: String,

    /// Latitude in degrees
    #[arg(long, allow_hyphen_values = true)]
    pub latitude: Option<f64>,

    /// Longitude in degrees
    #[arg(long, allow_hyphen_values = true)]
    pub longitude: Option<f64>,

    /// Device address for ABP (8 hex characters)
    #[arg(long, help_heading = "ABP session")]
    pub devaddr: Option<String>,

    /// Application session key (32 hex characters)
    #[arg(long, help_heading = "ABP session")]
    pub appskey: Option<String>,

    /// Network session key (32 hex characters)
    #[arg(long, help_heading = "ABP session")]
    pub nwkskey: Option<String>,

    /// Initial uplink frame counter
    #[arg(long, help_heading = "ABP session")]
    pub fcntup: Option<u32>,

    /// Initial downlink frame counter
    #[arg(long, help_heading = "ABP session")]
    pub fcntdn: Option<u32>,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  TREE
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct TreeArgs {
    /// Expand every server and group
    #[arg(long, short = 'e')]
    pub expand: bool,

    /// Only show these servers (repeatable)
    #[arg(long = "server", value_name = "NAME")]
    pub servers: Vec<String>,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  CONFIG
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Create or extend the config file with a backend profile
    Init {
        /// Profile name
        #[arg(long, default_value = "default")]
        name: String,

        /// Backend URL (prompted for when omitted on a terminal)
        #[arg(long)]
        backend: Option<String>,

        /// Request timeout in seconds
        #[arg(long)]
        timeout: Option<u64>,
    },

    /// Display current configuration
    Show,

    /// List configured profiles
    Profiles,

    /// Set the default profile
    SetDefault {
        /// Profile name to set as default
        name: String,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  COMPLETIONS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
