//! Command-line definitions for the `statrep` binary.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "statrep", version, about = "STATREP field status reporting")]
pub struct Cli {
    /// SQLite database file (overrides SR_DATABASE_PATH).
    #[arg(long, global = true, env = "SR_DATABASE_PATH")]
    pub database: Option<PathBuf>,

    /// Output machine-readable JSON for report queries.
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Enroll a new handle with an initial (usually temporary) PIN.
    Enroll {
        handle: String,
        #[arg(long)]
        pin: String,
    },
    /// List enrolled handles.
    Handles,
    /// Check a handle and PIN without submitting anything.
    Verify {
        handle: String,
        #[arg(long)]
        pin: String,
    },
    /// Replace a PIN, proving knowledge of the current one.
    ChangePin {
        handle: String,
        #[arg(long)]
        current: String,
        #[arg(long = "new")]
        new_pin: String,
        /// Defaults to the new PIN.
        #[arg(long)]
        confirm: Option<String>,
    },
    /// File a STATREP.
    Submit(SubmitArgs),
    /// Most recent report for a handle.
    Last { handle: String },
    /// Newest reports across all handles.
    Recent {
        #[arg(long)]
        limit: Option<usize>,
        #[arg(long, requires = "neighborhood")]
        state: Option<String>,
        #[arg(long, requires = "state")]
        neighborhood: Option<String>,
    },
    /// Every report filed by a handle.
    History { handle: String },
    /// Handles, states and neighborhoods.
    Directory {
        #[command(subcommand)]
        command: DirectoryCommands,
    },
    /// Print Prometheus metrics: stored-row gauges and this process's counters.
    Metrics,
}

#[derive(clap::Args, Debug, Default)]
pub struct SubmitArgs {
    #[arg(long)]
    pub handle: String,
    #[arg(long)]
    pub pin: String,
    /// Replacement PIN when `--pin` is a temporary one.
    #[arg(long)]
    pub new_pin: Option<String>,
    /// Date-time group; defaults to now in the configured civil zone.
    #[arg(long)]
    pub datetime_group: Option<String>,
    /// Defaults to the state of the handle's last report.
    #[arg(long)]
    pub state: Option<String>,
    /// Defaults to the neighborhood of the handle's last report.
    #[arg(long)]
    pub neighborhood: Option<String>,
    /// Defaults to the location of the handle's last report.
    #[arg(long)]
    pub location: Option<String>,
    /// A, B or C.
    #[arg(long, default_value = "A")]
    pub conditions: String,
    #[arg(long)]
    pub position: Option<String>,
    #[arg(long)]
    pub commercial_power: Option<String>,
    #[arg(long)]
    pub water: Option<String>,
    #[arg(long)]
    pub sanitation: Option<String>,
    #[arg(long)]
    pub grid_comms: Option<String>,
    #[arg(long)]
    pub transportation: Option<String>,
    #[arg(long)]
    pub comments: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum DirectoryCommands {
    /// Print one list, or all three.
    List {
        #[arg(value_enum)]
        list: Option<ListKind>,
    },
    /// Entries of a list containing a query.
    Suggest {
        #[arg(value_enum)]
        list: ListKind,
        query: String,
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Add a state name.
    AddState { name: String },
    /// Add a neighborhood name.
    AddNeighborhood { name: String },
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum ListKind {
    Handles,
    States,
    Neighborhoods,
}
