//! # odma CLI
//!
//! The binary is intentionally thin: the CLI lives in `src/cli/`, while this
//! file only invokes `cli::run()` and handles process termination.
//!
//! ## Layering
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  CLI Layer (crates/odma/src/cli/)                           │
//! │  - clap argument parsing (setup.rs)                         │
//! │  - fixture + table loading, dispatch (commands.rs)          │
//! │  - terminal and JSON rendering (render.rs)                  │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Library (crates/opendma)                                   │
//! │  - Projector, registration table, typed interfaces          │
//! │  - In-memory session loaded from a JSON fixture             │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! The library never writes to stdout or stderr; everything a user sees is
//! produced here.
//!
//! ## Testing Approach
//!
//! - Parsing and rendering are unit tested next to their code.
//! - `tests/cli_e2e.rs` runs the binary against `tests/fixtures/`.

mod cli;

fn main() {
    if let Err(e) = cli::run() {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}
