use anyhow::Result;
use clap::{CommandFactory, Parser};
use jiff::tz::TimeZone;
use owo_colors::OwoColorize;
use std::io::IsTerminal;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing_subscriber::EnvFilter;
use voicebus::catalog::{StaticCatalog, TransitCatalog, title_case};
use voicebus::cli::{Cli, Commands, ConfigAction};
use voicebus::config::Config;

fn main() -> Result<()> {
    let mut cli = Cli::parse();
    init_tracing(cli.verbose, cli.quiet);
    tracing::debug!(version = %voicebus::version_string(), "voicebus starting");

    match cli.command.take() {
        None | Some(Commands::Ride) => {
            let config = load_config(&cli)?;
            let color = std::io::stdout().is_terminal();
            voicebus::app::run_ride(&config, color, cli.quiet)?;
        }
        Some(Commands::Destinations) => {
            list_destinations(&StaticCatalog::derby());
        }
        Some(Commands::Logs { clear }) => {
            let config = load_config(&cli)?;
            handle_logs(&config, clear)?;
        }
        Some(Commands::Config { action }) => {
            handle_config_command(action, &cli)?;
        }
        Some(Commands::Completions { shell }) => {
            clap_complete::generate(shell, &mut Cli::command(), "voicebus", &mut std::io::stdout());
        }
    }

    Ok(())
}

/// Diagnostics go to stderr: warn by default, -v info, -vv debug.
///
/// `RUST_LOG` wins over `-v`; `--quiet` wins over both.
fn init_tracing(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("off")
    } else {
        let level = match verbose {
            0 => "warn",
            1 => "info",
            _ => "debug",
        };
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn config_path(custom_path: Option<&Path>) -> Result<PathBuf> {
    match custom_path {
        Some(path) => Ok(path.to_path_buf()),
        None => Ok(Config::default_path()?),
    }
}

/// Config file (or defaults), then environment, then command-line flags.
fn load_config(cli: &Cli) -> Result<Config> {
    let mut config = if let Some(path) = cli.config.as_deref() {
        // An explicit path must exist
        Config::load(path)?
    } else {
        Config::load_or_default(&config_path(None)?)?
    }
    .with_env_overrides();

    if let Some(cooldown) = cli.cooldown {
        config.feedback.error_cooldown_ms = duration_ms(cooldown);
    }
    if let Some(delay) = cli.retry_delay {
        config.feedback.retry_delay_ms = duration_ms(delay);
    }
    if let Some(history) = &cli.history {
        config.history.path = Some(history.clone());
    }
    Ok(config)
}

fn duration_ms(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

/// Print every destination with its services and their routes.
fn list_destinations(catalog: &dyn TransitCatalog) {
    for key in catalog.destination_keys() {
        println!("{}", title_case(key).bold());
        for service in catalog.services_for(key) {
            let stops: Vec<String> = catalog
                .stops_for(&service.service_id)
                .into_iter()
                .map(|s| s.name)
                .collect();
            println!(
                "  {} {} {}  {}",
                service.service_id.green(),
                service.departure_time,
                format!("({}, from {})", service.operator, service.origin_stop).dimmed(),
                stops.join(" → ")
            );
        }
    }
}

fn handle_logs(config: &Config, clear: bool) -> Result<()> {
    let mut log = voicebus::app::open_log(config)?;
    if clear {
        log.clear();
        println!("{}", "Logs cleared.".green());
        return Ok(());
    }
    println!("{}", log.read_aloud_text(&TimeZone::system()));
    Ok(())
}

fn handle_config_command(action: ConfigAction, cli: &Cli) -> Result<()> {
    match action {
        ConfigAction::Show => {
            let config = load_config(cli)?;
            print!("{}", toml::to_string_pretty(&config)?);
        }
        ConfigAction::Path => {
            println!("{}", config_path(cli.config.as_deref())?.display());
        }
    }
    Ok(())
}
