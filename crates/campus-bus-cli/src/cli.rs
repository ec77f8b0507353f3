//! CLI definition using clap

use campus_bus_types::{BusStatus, OutputFormat};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "campus-bus")]
#[command(version)]
#[command(about = "Live campus bus tracking: fleet service, driver broadcaster, and fleet views")]
#[command(long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Fleet service base URL. Uses config value if not specified.
    #[arg(long, short = 's', global = true)]
    pub server: Option<String>,

    /// Output format (json, table). Uses config value if not specified.
    #[arg(long, short = 'f', global = true)]
    pub format: Option<OutputFormat>,

    /// Verbose output
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the fleet service
    Serve {
        /// Address to listen on (e.g. 0.0.0.0:8000)
        #[arg(long, short = 'b')]
        bind: Option<String>,

        /// TOML file with routes and roster, replacing the built-in seed
        #[arg(long)]
        seed: Option<PathBuf>,
    },

    /// Send a single position report
    Report {
        /// Bus identifier
        bus_id: String,

        /// Route name (e.g. "Uttara - DSC")
        #[arg(long, short = 'r')]
        route: String,

        #[arg(long, allow_negative_numbers = true)]
        lat: f64,

        #[arg(long, allow_negative_numbers = true)]
        lng: f64,

        /// Passengers on board
        #[arg(long, short = 'o', default_value_t = 0, allow_negative_numbers = true)]
        occupancy: i64,

        #[arg(long, default_value_t = BusStatus::OnTime)]
        status: BusStatus,
    },

    /// Broadcast a bus position on a timer until stopped
    Broadcast {
        /// Bus identifier
        bus_id: String,

        /// Route name
        #[arg(long, short = 'r')]
        route: String,

        /// Fixed latitude (ignored with --samples)
        #[arg(long, allow_negative_numbers = true, required_unless_present = "samples")]
        lat: Option<f64>,

        /// Fixed longitude (ignored with --samples)
        #[arg(long, allow_negative_numbers = true, required_unless_present = "samples")]
        lng: Option<f64>,

        /// JSON-lines file of position samples ({"lat":..,"lng":..} per line)
        #[arg(long)]
        samples: Option<PathBuf>,

        /// Passengers on board
        #[arg(long, short = 'o', default_value_t = 0, allow_negative_numbers = true)]
        occupancy: i64,

        #[arg(long, default_value_t = BusStatus::OnTime)]
        status: BusStatus,

        /// Seconds between reports. Uses config value if not specified.
        #[arg(long, short = 'i')]
        interval: Option<u64>,

        /// Stop after this many reports
        #[arg(long, short = 'n')]
        count: Option<u64>,

        /// Log reports instead of sending them (overrides config)
        #[arg(long)]
        log_only: bool,
    },

    /// Show the current fleet
    Fleet {
        /// Only buses on this route (exact name)
        #[arg(long, short = 'r')]
        route: Option<String>,
    },

    /// Poll the fleet and print changes
    Watch {
        /// Only buses on this route (exact name)
        #[arg(long, short = 'r')]
        route: Option<String>,

        /// Seconds between polls. Uses config value if not specified.
        #[arg(long, short = 'i')]
        interval: Option<u64>,

        /// Stop after this many polls
        #[arg(long, short = 'n')]
        count: Option<u64>,
    },

    /// Show one bus
    Bus {
        /// Bus identifier
        bus_id: String,
    },

    /// List routes
    Routes,

    /// Show fleet statistics
    Stats,

    /// Ask the transport assistant a question
    Ask {
        /// Question text
        message: String,
    },

    /// Manage configuration
    Config {
        /// Show current configuration
        #[arg(long)]
        show: bool,

        /// Set listen address
        #[arg(long)]
        set_bind: Option<String>,

        /// Set fleet service base URL
        #[arg(long)]
        set_server: Option<String>,

        /// Set poll interval in seconds
        #[arg(long)]
        set_poll_interval: Option<u64>,

        /// Set broadcast interval in seconds
        #[arg(long)]
        set_broadcast_interval: Option<u64>,

        /// Set seconds after which a live position counts as stale
        #[arg(long)]
        set_stale_after: Option<u64>,

        /// Set capacity used for buses missing from the roster
        #[arg(long)]
        set_default_capacity: Option<u32>,

        /// Log broadcasts instead of sending them
        #[arg(long)]
        set_log_only: Option<bool>,

        /// Set seed file path
        #[arg(long)]
        set_seed: Option<PathBuf>,

        /// Set assistant model
        #[arg(long)]
        set_model: Option<String>,

        /// Set default output format
        #[arg(long)]
        set_output: Option<OutputFormat>,

        /// Reset to defaults
        #[arg(long)]
        reset: bool,
    },
}
