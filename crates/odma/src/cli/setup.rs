use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "odma",
    bin_name = "odma",
    version,
    disable_help_subcommand = true,
    about = "Inspect OpenDMA objects through their domain interfaces",
    long_about = None
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Registration table extensions (defaults to odma.toml in the config and current directories)
    #[arg(short, long, global = true, value_name = "FILE", help_heading = "Options")]
    pub config: Option<PathBuf>,

    /// Print results as JSON
    #[arg(long, global = true, help_heading = "Options")]
    pub json: bool,

    /// Verbose output
    #[arg(short, long, global = true, help_heading = "Options")]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List the accessors and interfaces of the registration table
    Table {
        /// Only show this interface
        interface: Option<String>,
    },

    /// List the repositories of a fixture, or the objects of one repository
    Ls {
        /// JSON fixture file
        fixture: PathBuf,
        /// Repository id
        repository: Option<String>,
    },

    /// Show the interfaces of an object and every accessor it answers
    Describe {
        /// JSON fixture file
        fixture: PathBuf,
        /// Repository id
        repository: String,
        /// Object id
        object: String,
    },

    /// Read one accessor of an object
    Get {
        /// JSON fixture file
        fixture: PathBuf,
        /// Repository id
        repository: String,
        /// Object id
        object: String,
        /// Accessor name, e.g. Title or QName
        accessor: String,
    },

    /// Find the objects that are instances of a class or aspect
    Search {
        /// JSON fixture file
        fixture: PathBuf,
        /// Repository id
        repository: String,
        /// Qualified class name, e.g. opendma:Document
        class: String,
    },
}

pub fn parse_cli() -> Cli {
    Cli::parse()
}
