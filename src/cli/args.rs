//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand, ValueHint};

/// Tree pruning recommendations around WO sites
#[derive(Parser, Debug)]
#[command(name = "woprune")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase log verbosity (-d info, -dd debug, -ddd trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub debug: u8,

    /// Directory with the CSV tables (overrides config)
    #[arg(short = 'D', long, global = true, value_hint = ValueHint::DirPath)]
    pub data_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List WO sites
    Sites,

    /// Evaluate trees around a site
    Evaluate {
        /// Site name (interactive selection if omitted)
        site: Option<String>,
        /// Evaluation year (default: current year)
        #[arg(short, long)]
        year: Option<i32>,
        /// Use this wind speed in km/h instead of querying Meteoblue
        #[arg(short, long)]
        wind: Option<f64>,
        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print the tree map layer as GeoJSON
    Map {
        /// Site name (interactive selection if omitted)
        site: Option<String>,
        /// Evaluation year (default: current year)
        #[arg(short, long)]
        year: Option<i32>,
        /// Use this wind speed in km/h instead of querying Meteoblue
        #[arg(short, long)]
        wind: Option<f64>,
    },

    /// Manage settings
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Generate shell completions
    Completion {
        /// Shell type
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show merged config
    Show,

    /// Create config template
    Init {
        /// Create global config
        #[arg(short, long)]
        global: bool,
    },

    /// Show config paths
    Path,
}
