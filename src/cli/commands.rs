//! Command dispatch for the rwire binary

use std::io;
use std::path::{Path, PathBuf};

use clap::CommandFactory;
use clap_complete::{generate, Shell};
use tracing::{debug, instrument};

use crate::application::IoResultExt;
use crate::cli::args::{Cli, Commands, ConfigCommands};
use crate::cli::error::{CliError, CliResult};
use crate::cli::output;
use crate::config::{global_config_path, local_config_path, Settings};

pub fn execute_command(cli: &Cli) -> CliResult<()> {
    let dir = match &cli.dir {
        Some(dir) => dir.clone(),
        None => std::env::current_dir()
            .map_err(|e| CliError::Usage(format!("cannot determine current directory: {e}")))?,
    };

    match &cli.command {
        Some(Commands::Config { command }) => match command {
            ConfigCommands::Show => config_show(&dir),
            ConfigCommands::Init { global } => config_init(&dir, *global),
            ConfigCommands::Path => config_path(&dir),
        },
        Some(Commands::Completion { shell }) => completion(*shell),
        None => Err(CliError::Usage(
            "no command given, see `rwire --help`".into(),
        )),
    }
}

#[instrument(level = "debug")]
fn config_show(dir: &Path) -> CliResult<()> {
    let settings = Settings::load(Some(dir))?;
    output::info(&settings.to_toml()?);
    Ok(())
}

#[instrument(level = "debug")]
fn config_init(dir: &Path, global: bool) -> CliResult<()> {
    let path = if global {
        global_config_path()
            .ok_or_else(|| CliError::Usage("cannot determine global config directory".into()))?
    } else {
        local_config_path(dir)
    };

    if path.exists() {
        return Err(CliError::InvalidArgs(format!(
            "config already exists: {}",
            path.display()
        )));
    }

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).with_path_context("create config dir", parent)?;
    }
    std::fs::write(&path, Settings::template()).with_path_context("write config", &path)?;
    debug!("config_init: wrote {}", path.display());

    output::action("Created", &path.display());
    Ok(())
}

fn config_path(dir: &Path) -> CliResult<()> {
    let describe = |path: &PathBuf| {
        if path.exists() {
            format!("{} (exists)", path.display())
        } else {
            format!("{} (not found)", path.display())
        }
    };

    output::header("Config paths");
    match global_config_path() {
        Some(path) => output::detail(&format!("global: {}", describe(&path))),
        None => output::warning("cannot determine global config directory"),
    }
    output::detail(&format!("local:  {}", describe(&local_config_path(dir))));
    Ok(())
}

fn completion(shell: Shell) -> CliResult<()> {
    let mut cmd = Cli::command();
    let name = cmd.get_name().to_string();
    generate(shell, &mut cmd, name, &mut io::stdout());
    Ok(())
}
