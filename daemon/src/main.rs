//! Preference upgrade daemon — command line entry point.

use anyhow::Context;
use clap::Parser;
use prefs_host::{init_logging, HostConfig, PreferenceHost};
use prefs_types::{LegacyVersionCode, PrefValue};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "prefs-daemon", about = "Versioned preference store upgrades")]
struct Cli {
    /// Path to a TOML configuration file. If provided, file settings
    /// are used as the base; CLI flags and env vars override them.
    #[arg(long, env = "PREFS_CONFIG")]
    config: Option<PathBuf>,

    /// Directory of the preference store.
    #[arg(long, env = "PREFS_DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// Log level: "trace", "debug", "info", "warn", "error".
    #[arg(long, env = "PREFS_LOG_LEVEL")]
    log_level: Option<String>,

    /// Log format: "human" or "json".
    #[arg(long, env = "PREFS_LOG_FORMAT")]
    log_format: Option<String>,

    /// Subcommand.
    #[command(subcommand)]
    command: Command,
}

#[derive(clap::Subcommand)]
enum Command {
    /// Apply every pending upgrade.
    Upgrade {
        /// Build number of the release that last used this store.
        #[arg(long, env = "PREFS_LEGACY_VERSION_CODE")]
        legacy_version_code: i64,
    },
    /// Record the store as fully upgraded without running any upgrade.
    MarkUpToDate,
    /// Show the stored, latest and pending upgrade versions.
    Status {
        /// Print as JSON.
        #[arg(long)]
        json: bool,
    },
    /// Print one preference.
    Get { key: String },
    /// Write one preference.
    Set {
        key: String,
        #[command(flatten)]
        value: ValueArgs,
    },
    /// Print every preference.
    List,
}

#[derive(clap::Args)]
#[group(required = true, multiple = false)]
struct ValueArgs {
    #[arg(long, allow_hyphen_values = true)]
    int: Option<i64>,
    #[arg(long = "bool")]
    boolean: Option<bool>,
    #[arg(long)]
    string: Option<String>,
}

impl ValueArgs {
    fn into_value(self) -> Option<PrefValue> {
        self.int
            .map(PrefValue::Int)
            .or(self.boolean.map(PrefValue::Bool))
            .or(self.string.map(PrefValue::Str))
    }
}

fn load_config(cli: &Cli) -> anyhow::Result<HostConfig> {
    let mut config = match cli.config {
        Some(ref path) => HostConfig::from_toml_file(path)?,
        None => HostConfig::default(),
    };
    if let Some(ref data_dir) = cli.data_dir {
        config.data_dir = data_dir.clone();
    }
    if let Some(ref level) = cli.log_level {
        config.log_level = level.clone();
    }
    if let Some(ref format) = cli.log_format {
        config.log_format = format.clone();
    }
    config.validate()?;
    Ok(config)
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = load_config(&cli)?;
    init_logging(config.log_format()?, &config.log_level);

    let host = PreferenceHost::open(&config)
        .with_context(|| format!("opening store at {}", config.data_dir.display()))?;

    match cli.command {
        Command::Upgrade {
            legacy_version_code,
        } => {
            let changed = host.upgrade_preferences(LegacyVersionCode::new(legacy_version_code))?;
            if changed {
                println!("upgraded to {}", host.status()?.current);
            } else {
                println!("already up to date");
            }
        }
        Command::MarkUpToDate => {
            host.mark_preferences_up_to_date()?;
            println!("marked up to date at {}", host.status()?.current);
        }
        Command::Status { json } => {
            let status = host.status()?;
            if json {
                println!("{}", serde_json::to_string_pretty(&status)?);
            } else {
                println!("current: {}", status.current);
                println!("latest:  {}", status.latest);
                let pending: Vec<String> = status.pending.iter().map(|v| v.to_string()).collect();
                if pending.is_empty() {
                    println!("pending: none");
                } else {
                    println!("pending: {}", pending.join(", "));
                }
            }
        }
        Command::Get { key } => match host.get(&key)? {
            Some(value) => println!("{value}"),
            None => anyhow::bail!("no preference named '{key}'"),
        },
        Command::Set { key, value } => {
            let value = value
                .into_value()
                .context("one of --int, --bool or --string is required")?;
            tracing::info!(%key, %value, "setting preference");
            host.set(&key, value)?;
        }
        Command::List => {
            for (key, value) in host.entries()? {
                println!("{key} = {value}");
            }
        }
    }

    Ok(())
}
