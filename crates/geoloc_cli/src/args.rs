use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// CLI arguments for geoloc
#[derive(Debug, Parser)]
#[command(
    name = "geoloc",
    version,
    about = "Curate, filter and summarize a personal collection of rated locations"
)]
pub struct CliArgs {
    /// JSON config file (dbPath, logLevel, logDir, ratingBands, recency)
    #[arg(short = 'c', long = "config", global = true)]
    pub config: Option<PathBuf>,

    /// SQLite database file; overrides the config value
    #[arg(long = "db", global = true)]
    pub db: Option<PathBuf>,

    /// Keep the store in memory for this run only
    #[arg(long = "memory", global = true, conflicts_with = "db")]
    pub memory: bool,

    /// Log level (trace|debug|info|warn|error)
    #[arg(long = "log-level", global = true)]
    pub log_level: Option<String>,

    /// Absolute directory for rolling log files
    #[arg(long = "log-dir", global = true)]
    pub log_dir: Option<PathBuf>,

    /// Case-insensitive name filter
    #[arg(long = "txt", global = true)]
    pub txt: Option<String>,

    /// Minimum rate filter (0 = no bound); unparseable values mean 0
    #[arg(long = "min-rate", global = true)]
    pub min_rate: Option<String>,

    /// Location to mark as selected in listings
    #[arg(long = "loc-id", global = true)]
    pub loc_id: Option<String>,

    /// Sort field (name|rate|createdAt|updatedAt)
    #[arg(long = "sort", global = true)]
    pub sort: Option<String>,

    /// Sort descending
    #[arg(long = "desc", global = true)]
    pub desc: bool,

    /// Print machine-readable JSON
    #[arg(long = "json", global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// List locations matching the current filter and sort
    List,

    /// Add a new location
    Add {
        #[arg(long)]
        name: String,
        #[arg(long)]
        rate: u8,
        #[command(flatten)]
        geo: GeoArgs,
    },

    /// Update fields of an existing location
    Update {
        id: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        rate: Option<u8>,
        #[arg(long, requires = "lng")]
        lat: Option<f64>,
        #[arg(long, requires = "lat")]
        lng: Option<f64>,
        #[arg(long)]
        address: Option<String>,
        #[arg(long)]
        zoom: Option<u32>,
    },

    /// Remove a location
    Remove { id: String },

    /// Show one location
    Show { id: String },

    /// Show rating and recency breakdowns
    Stats,

    /// Populate an empty store with demo locations
    Seed,
}

#[derive(Debug, Args)]
pub struct GeoArgs {
    #[arg(long, allow_hyphen_values = true)]
    pub lat: f64,
    #[arg(long, allow_hyphen_values = true)]
    pub lng: f64,
    #[arg(long, default_value = "")]
    pub address: String,
    #[arg(long, default_value_t = 15)]
    pub zoom: u32,
}
