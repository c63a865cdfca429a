//! Configuration management CLI commands.

use crate::cli::common::{print_json, CatalogSource, CliError, CliResult};
use crate::config::Config;
use crate::track_sizes::BucketRule;
use clap::{Args, Subcommand};
use std::path::PathBuf;

/// Configuration management commands
#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    command: ConfigCommand,
}

#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Display current configuration
    Show(ConfigShowArgs),
    /// Set configuration values
    Set(ConfigSetArgs),
}

/// Display current configuration
#[derive(Args, Debug)]
pub struct ConfigShowArgs {
    /// Output as JSON
    #[arg(long)]
    json: bool,
}

/// Set configuration values
///
/// The data directory is taken from the global `--data-dir` option.
#[derive(Args, Debug)]
pub struct ConfigSetArgs {
    /// Width bucket rule (truncate or nearest)
    #[arg(long, value_name = "RULE")]
    bucket_rule: Option<String>,

    /// Web API port
    #[arg(long, value_name = "PORT")]
    port: Option<u16>,
}

impl ConfigArgs {
    /// Execute config subcommand
    pub fn execute(&self, source: &CatalogSource) -> CliResult<()> {
        match &self.command {
            ConfigCommand::Show(args) => args.execute(),
            ConfigCommand::Set(args) => args.execute(source.data_dir.as_ref()),
        }
    }
}

impl ConfigShowArgs {
    /// Execute show command
    pub fn execute(&self) -> CliResult<()> {
        let config = Config::load()
            .map_err(|e| CliError::validation(format!("Failed to load configuration: {e:#}")))?;

        if self.json {
            return print_json(&config);
        }

        output_human_readable(&config);
        Ok(())
    }
}

impl ConfigSetArgs {
    /// Execute set command
    pub fn execute(&self, data_dir: Option<&PathBuf>) -> CliResult<()> {
        if data_dir.is_none() && self.bucket_rule.is_none() && self.port.is_none() {
            return Err(CliError::validation(
                "At least one configuration option must be specified: --data-dir, --bucket-rule, or --port",
            ));
        }

        let mut config = Config::load()
            .map_err(|e| CliError::validation(format!("Failed to load configuration: {e:#}")))?;

        if let Some(path) = data_dir {
            if !path.is_dir() {
                return Err(CliError::validation(format!(
                    "Data directory does not exist: {}",
                    path.display()
                )));
            }
            config
                .set_data_dir(path.clone())
                .map_err(|e| CliError::validation(e.to_string()))?;
        }

        if let Some(rule) = &self.bucket_rule {
            config.catalog.bucket_rule = rule
                .parse::<BucketRule>()
                .map_err(|e| CliError::validation(e.to_string()))?;
        }

        if let Some(port) = self.port {
            config.server.port = port;
        }

        config
            .validate()
            .map_err(|e| CliError::validation(e.to_string()))?;
        config
            .save()
            .map_err(|e| CliError::io(format!("Failed to save configuration: {e:#}")))?;

        println!("Configuration updated successfully.");

        Ok(())
    }
}

/// Output configuration in human-readable format
fn output_human_readable(config: &Config) {
    println!("TrackFinder Configuration");
    println!("=========================");
    println!();

    if let Ok(path) = Config::config_file_path() {
        println!("File: {}", path.display());
        println!();
    }

    println!("Catalog:");
    println!("  Data Directory: {}", config.catalog.data_dir.display());
    println!("  Bucket Rule: {}", config.catalog.bucket_rule);
    println!();

    println!("Server:");
    println!("  Address: {}:{}", config.server.host, config.server.port);
    println!();

    println!("Admin:");
    let login = if config.admin_enabled() {
        "enabled"
    } else {
        "disabled (admin.password_sha256 not set)"
    };
    println!("  Login: {login}");
    println!("  Session TTL: {} minutes", config.admin.session_ttl_minutes);
    println!();

    println!("Search:");
    println!("  Max Results: {}", config.search.max_results);
}
