// src/cli.rs

// Also compiled into build.rs for the man page; keep it free of crate imports.

use clap::{Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "wheres-my-ship")]
#[command(author, version, about = "Track shipment packages", long_about = None)]
pub struct Cli {
    /// Shipment store path (default: ~/.wheres-my-ship)
    #[arg(short, long, global = true, value_name = "PATH", env = "WHERES_MY_SHIP_STORE")]
    pub store: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Add a new tracking number
    Add {
        /// Carrier tracking number
        tracking_number: Option<String>,
        /// Free-text description
        description: Vec<String>,
    },
    /// Remove a tracking number
    Remove {
        /// Tracking number or item number from `list`
        #[arg(value_name = "TRACKING_NUMBER|ITEM")]
        identifier: Option<String>,
    },
    /// Update the status of all tracked numbers
    Update,
    /// List the status of one or all tracked numbers
    List {
        /// Tracking number or item number (shows all if omitted)
        #[arg(value_name = "TRACKING_NUMBER|ITEM")]
        identifier: Option<String>,
    },
    /// Print detailed tracking status of one or all tracked numbers
    Detail {
        /// Tracking number or item number (shows all if omitted)
        #[arg(value_name = "TRACKING_NUMBER|ITEM")]
        identifier: Option<String>,
    },
    /// Remove delivered packages
    Clean,
    /// Generate shell completion scripts
    Completions {
        /// Shell type
        #[arg(value_enum)]
        shell: Shell,
    },
}
