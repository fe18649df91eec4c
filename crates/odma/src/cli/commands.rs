//! # CLI Layer
//!
//! The **only** place in the workspace that:
//! - Knows about terminal I/O (stdout, stderr)
//! - Installs a tracing subscriber
//! - Turns library errors into user-facing messages
//!
//! ## Responsibilities
//!
//! 1. **Argument Parsing**: via `setup::parse_cli`
//! 2. **Context Setup**: load the configuration, build the registration table
//! 3. **Dispatch**: load the fixture and run the command against a projection
//! 4. **Output Formatting**: hand structured results to `render`

use super::render::{self, Reading};
use super::setup::{parse_cli, Cli, Commands};
use anyhow::{bail, Context, Result};
use directories::ProjectDirs;
use opendma::config::OdmaConfig;
use opendma::names::{LocalId, QualifiedName};
use opendma::prelude::*;
use opendma::store::session::{SearchResult, INSTANCE_OF_LANGUAGE};
use std::path::{Path, PathBuf};
use tracing::debug;
use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter.
const LOG_ENV: &str = "ODMA_LOG";

pub fn run() -> Result<()> {
    let cli = parse_cli();
    init_logging(cli.verbose);
    let projector = Projector::new(load_table(cli.config.as_deref())?);
    let output = execute(&cli, &projector)?;
    println!("{}", output);
    Ok(())
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("error"))
    };
    // A subscriber may already be installed when running under a test harness.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .without_time()
        .try_init();
}

fn config_dirs() -> Vec<PathBuf> {
    let mut dirs = Vec::new();
    if let Some(project) = ProjectDirs::from("org", "opendma", "odma") {
        dirs.push(project.config_dir().to_path_buf());
    }
    if let Ok(cwd) = std::env::current_dir() {
        dirs.push(cwd);
    }
    dirs
}

fn load_table(explicit: Option<&Path>) -> Result<RegistrationTable> {
    let config = match explicit {
        Some(path) => {
            if !path.is_file() {
                bail!("config file `{}` does not exist", path.display());
            }
            let file_name = path
                .file_name()
                .and_then(|name| name.to_str())
                .with_context(|| format!("`{}` is not a file name", path.display()))?;
            let dir = match path.parent() {
                Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
                _ => PathBuf::from("."),
            };
            OdmaConfig::load_file(file_name, &[dir])?
        }
        None => OdmaConfig::load(&config_dirs())?,
    };
    Ok(RegistrationTable::from_config(&config)?)
}

fn open_fixture(path: &Path) -> Result<MemorySession> {
    let fixture = Fixture::load(path)
        .with_context(|| format!("cannot load fixture `{}`", path.display()))?;
    Ok(fixture.into_session()?)
}

fn parse_id(raw: &str, what: &str) -> Result<LocalId> {
    raw.parse::<LocalId>()
        .with_context(|| format!("`{}` is not a valid {} id", raw, what))
}

/// Objects only resolve references while their session is alive.
fn project_object(
    projector: &Projector,
    session: &MemorySession,
    repository: &str,
    object: &str,
) -> Result<Projection> {
    let repository = parse_id(repository, "repository")?;
    let object = parse_id(object, "object")?;
    debug!(%repository, %object, "projecting object");
    let store = session.object(&repository, &object, None)?;
    store.prepare_attributes(None, false)?;
    Ok(projector.project(store))
}

fn execute(cli: &Cli, projector: &Projector) -> Result<String> {
    let json = cli.json;
    match &cli.command {
        Commands::Table { interface } => {
            let table = projector.table();
            if let Some(name) = interface {
                if table.interface(name).is_none() {
                    bail!("unknown interface `{}`", name);
                }
            }
            Ok(render::table(table, interface.as_deref(), json))
        }
        Commands::Ls {
            fixture,
            repository,
        } => {
            let session = open_fixture(fixture)?;
            match repository {
                None => {
                    let mut repositories = Vec::new();
                    for id in session.repository_ids()? {
                        let root = projector.project(session.repository(&id)?);
                        let name = Repository::name(&root).ok().flatten();
                        repositories.push((id, name));
                    }
                    Ok(render::repositories(&repositories, json))
                }
                Some(repository) => {
                    let repository = parse_id(repository, "repository")?;
                    let objects: Vec<Projection> = session
                        .memory_repository(&repository)?
                        .objects()
                        .into_iter()
                        .map(|object| projector.project(object))
                        .collect();
                    Ok(render::objects(&objects, json))
                }
            }
        }
        Commands::Describe {
            fixture,
            repository,
            object,
        } => {
            let session = open_fixture(fixture)?;
            let projection = project_object(projector, &session, repository, object)?;
            let readings: Vec<Reading> = projection
                .accessors()
                .into_iter()
                .map(|accessor| Reading::take(&projection, accessor))
                .collect();
            Ok(render::description(&projection, &readings, json))
        }
        Commands::Get {
            fixture,
            repository,
            object,
            accessor,
        } => {
            let session = open_fixture(fixture)?;
            let projection = project_object(projector, &session, repository, object)?;
            let outcome = projection.invoke(&format!("get_{}", accessor), None)?;
            Ok(render::outcome(accessor, &outcome, json))
        }
        Commands::Search {
            fixture,
            repository,
            class,
        } => {
            let session = open_fixture(fixture)?;
            let repository = parse_id(repository, "repository")?;
            let class: QualifiedName = class
                .parse()
                .with_context(|| format!("`{}` is not a qualified class name", class))?;
            let hits = session.search(&repository, &INSTANCE_OF_LANGUAGE, &class.to_string())?;
            let objects: Vec<Projection> = hits
                .objects()
                .into_iter()
                .map(|object| projector.project(object))
                .collect();
            Ok(render::objects(&objects, json))
        }
    }
}
