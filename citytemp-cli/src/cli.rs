use anyhow::Context;
use chrono::Local;
use citytemp_core::{Config, survey};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(
    name = "citytemp",
    version,
    about = "Average current temperature across the 100 most populous US cities"
)]
pub struct Cli {
    /// Read configuration from this file instead of the platform config dir.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Log every request and reading.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Fetch the cities and print their average temperature (default).
    Average,

    /// Print the path the configuration is read from.
    ConfigPath,

    /// Write a configuration file with the default endpoints.
    InitConfig {
        /// Overwrite an existing file without asking.
        #[arg(long)]
        force: bool,
    },
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        let path = match self.config {
            Some(path) => path,
            None => Config::config_file_path()?,
        };

        match self.command.unwrap_or(Command::Average) {
            Command::Average => {
                let config = Config::load_from(&path)?;
                let today = Local::now().date_naive();

                let report = survey::run_with_config(&config, today)
                    .await
                    .context("Failed to compute the average temperature")?;

                if !report.skipped.is_empty() {
                    tracing::info!(skipped = report.skipped.len(), "Some cities had no temperature reading");
                }
                println!("{report}");
            }
            Command::ConfigPath => {
                println!("{}", path.display());
            }
            Command::InitConfig { force } => {
                init_config(&path, force, |path| {
                    inquire::Confirm::new(&format!(
                        "{} already exists. Overwrite it?",
                        path.display()
                    ))
                    .with_default(false)
                    .prompt()
                    .context("Failed to read confirmation")
                })?;
            }
        }

        Ok(())
    }
}

/// Write the default config to `path`, asking `confirm` before replacing an existing file.
///
/// Returns whether the file was written.
fn init_config(
    path: &Path,
    force: bool,
    confirm: impl FnOnce(&Path) -> anyhow::Result<bool>,
) -> anyhow::Result<bool> {
    if path.exists() && !force && !confirm(path)? {
        println!("Left existing config file untouched: {}", path.display());
        return Ok(false);
    }

    Config::default().save_to(path)?;
    println!("Wrote default configuration to {}", path.display());
    Ok(true)
}

/// Log to stdout; `RUST_LOG` wins over `--verbose`.
pub fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stdout)
        .with_target(false)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_subcommand_means_average() {
        let cli = Cli::try_parse_from(["citytemp"]).unwrap();
        assert!(cli.command.is_none());
        assert!(!cli.verbose);
    }

    #[test]
    fn global_flags_follow_subcommands() {
        let cli = Cli::try_parse_from(["citytemp", "init-config", "--force", "--config", "/tmp/c.toml"])
            .unwrap();

        assert_eq!(cli.config, Some(PathBuf::from("/tmp/c.toml")));
        assert!(matches!(cli.command, Some(Command::InitConfig { force: true })));
    }

    #[test]
    fn unknown_flags_are_rejected() {
        assert!(Cli::try_parse_from(["citytemp", "--cities", "50"]).is_err());
    }

    #[test]
    fn init_config_writes_missing_file_without_asking() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        let written = init_config(&path, false, |_| panic!("should not ask")).unwrap();

        assert!(written);
        assert_eq!(Config::load_from(&path).unwrap(), Config::default());
    }

    #[test]
    fn declining_overwrite_leaves_file_and_succeeds() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[report]\nunit = \"F\"\n").unwrap();

        let written = init_config(&path, false, |_| Ok(false)).unwrap();

        assert!(!written);
        assert_eq!(Config::load_from(&path).unwrap().report.unit, "F");
    }

    #[test]
    fn force_overwrites_without_asking() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[report]\nunit = \"F\"\n").unwrap();

        let written = init_config(&path, true, |_| panic!("should not ask")).unwrap();

        assert!(written);
        assert_eq!(Config::load_from(&path).unwrap().report.unit, "C");
    }

    #[test]
    fn cli_definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
