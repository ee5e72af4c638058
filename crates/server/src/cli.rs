//! Command-line interface and config loading.

use clap::{Parser, Subcommand};

use ink_domain::config::{Config, ConfigSeverity};

/// Inkpress — a scheduled-publishing blog backend.
#[derive(Debug, Parser)]
#[command(name = "inkpress", version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Start the server (default when no subcommand is given).
    Serve,
    /// Configuration utilities.
    #[command(subcommand)]
    Config(ConfigCommand),
    /// Print version information.
    Version,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Parse the config file and report any errors.
    Validate,
    /// Dump the resolved configuration (with defaults) as TOML.
    Show,
}

/// Load `config.toml` from `INK_CONFIG` or the working directory.
///
/// A missing file yields the default config (everything has a sensible
/// dev-mode default); a file that exists but fails to parse is an error.
pub fn load_config() -> anyhow::Result<(Config, String)> {
    let path = std::env::var("INK_CONFIG").unwrap_or_else(|_| "config.toml".to_string());
    match std::fs::read_to_string(&path) {
        Ok(raw) => {
            let config: Config = toml::from_str(&raw)
                .map_err(|e| anyhow::anyhow!("failed to parse {path}: {e}"))?;
            Ok((config, path))
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            Ok((Config::default(), format!("{path} (not found, using defaults)")))
        }
        Err(e) => Err(anyhow::anyhow!("failed to read {path}: {e}")),
    }
}

/// Parse and validate the config, printing any issues.
///
/// Returns `true` when no errors were found.
pub fn validate(config: &Config, config_path: &str) -> bool {
    let issues = config.validate();

    if issues.is_empty() {
        println!("Config OK ({config_path})");
        return true;
    }

    let error_count = issues
        .iter()
        .filter(|e| e.severity == ConfigSeverity::Error)
        .count();
    let warning_count = issues.len() - error_count;

    for issue in &issues {
        println!("{issue}");
    }

    println!(
        "\n{} error(s), {} warning(s) in {config_path}",
        error_count, warning_count,
    );

    error_count == 0
}

/// Dump the resolved config (with all defaults filled in) as TOML.
pub fn show(config: &Config) {
    match toml::to_string_pretty(config) {
        Ok(output) => print!("{output}"),
        Err(e) => {
            eprintln!("Failed to serialize config: {e}");
            std::process::exit(1);
        }
    }
}
