//! # CLI Behavior
//!
//! This is **one possible UI client** for the projector. It loads a JSON
//! fixture into an in-memory session, projects objects with the configured
//! registration table and prints what the interfaces see.
//!
//! ## Commands
//!
//! - `odma table [INTERFACE]`: the accessors and interfaces of the table.
//! - `odma ls <FIXTURE> [REPO]`: repositories, or the objects of one.
//! - `odma describe <FIXTURE> <REPO> <OBJECT>`: interfaces and every readable accessor.
//! - `odma get <FIXTURE> <REPO> <OBJECT> <ACCESSOR>`: a single accessor.
//! - `odma search <FIXTURE> <REPO> <CLASS>`: objects that are instances of a class.
//!
//! Every command takes `--json` for machine-readable output, `--config` for
//! an explicit `odma.toml`, and `-v` for debug logging. `ODMA_LOG` sets the
//! log filter when `-v` is absent.
//!
//! ## Module Structure
//!
//! - `setup`: Argument parsing via clap
//! - `commands`: Table/fixture loading and dispatch
//! - `render`: Terminal and JSON output
//! - `styles`: Semantic terminal styles

mod commands;
mod render;
pub mod setup;
mod styles;

pub use commands::run;
