use std::path::{Path, PathBuf};

mod batch;
mod calculate;
mod estate;
mod heir;
mod status;
mod terminal;

use batch::Batch;
use calculate::Calculate;
use clap::ArgAction;
use estate::Estate;
use faraid::CaseDirectory;
use status::Status;
use tracing::instrument;

#[derive(Debug, clap::Parser)]
#[command(version, about)]
pub struct Cli {
    /// Verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// The directory holding the estate case
    #[arg(long, default_value = ".", global = true)]
    root: PathBuf,

    #[command(subcommand)]
    command: Option<Command>,
}

impl Cli {
    pub fn run(self) -> anyhow::Result<()> {
        Self::setup_logging(self.verbose);

        self.command
            .unwrap_or_else(|| Command::Status(Status::default()))
            .run(self.root)
    }

    fn setup_logging(verbosity: u8) {
        use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

        let level = match verbosity {
            0 => tracing::Level::WARN,
            1 => tracing::Level::INFO,
            2 => tracing::Level::DEBUG,
            _ => tracing::Level::TRACE,
        };

        let filter = tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into());

        let fmt_layer = tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(false)
            .with_thread_names(false)
            .with_line_number(false);

        tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer)
            .init();
    }
}

#[derive(Debug, clap::Parser)]
pub enum Command {
    /// Show the estate summary (default)
    Status(Status),

    /// Start a new estate case
    Init(Init),

    /// Edit the estate financials
    Estate(Estate),

    /// Add, remove or list heirs
    Heir(heir::Command),

    /// Compute each heir's share of the net estate
    Calculate(Calculate),

    /// Compute every case below a directory
    ///
    /// Cases are computed concurrently. A summary line is printed per case.
    Batch(Batch),

    /// Show or modify configuration settings
    Config(Config),
}

impl Command {
    fn run(self, root: PathBuf) -> anyhow::Result<()> {
        match self {
            Self::Status(command) => command.run(root)?,
            Self::Init(command) => command.run(root)?,
            Self::Estate(command) => command.run(root)?,
            Self::Heir(command) => command.run(root)?,
            Self::Calculate(command) => command.run(root)?,
            Self::Batch(command) => command.run(&root)?,
            Self::Config(command) => command.run(root)?,
        }
        Ok(())
    }
}

#[derive(Debug, clap::Parser)]
pub struct Init {
    /// Name of the deceased
    #[arg(long, short)]
    deceased: Option<String>,
}

impl Init {
    #[instrument]
    fn run(self, root: PathBuf) -> anyhow::Result<()> {
        let case = CaseDirectory::init(root, self.deceased)?;

        println!("Initialized estate case in {}", case.root().display());
        println!("  Created: {}", relative(case.case_path(), case.root()).display());
        println!("  Created: .faraid/config.toml");
        println!();
        println!("Next steps:");
        println!("  faraid estate --total 100000");
        println!("  faraid heir add \"Heir Name\" --relationship son");
        println!("  faraid calculate");

        Ok(())
    }
}

fn relative<'a>(path: &'a Path, root: &Path) -> &'a Path {
    path.strip_prefix(root).unwrap_or(path)
}

#[derive(Debug, clap::Parser)]
pub struct Config {
    #[command(subcommand)]
    command: ConfigCommand,
}

#[derive(Debug, clap::Parser)]
enum ConfigCommand {
    /// Show current configuration
    Show,

    /// Set a configuration value
    ///
    /// Keys: exclude_deceased_heirs, sons_take_residue,
    /// completeness_tolerance, currency
    Set {
        /// Configuration key to set
        key: String,

        /// Value to set
        value: String,
    },
}

fn parse_bool(value: &str) -> anyhow::Result<bool> {
    value
        .parse::<bool>()
        .map_err(|_| anyhow::anyhow!("Value must be 'true' or 'false'"))
}

impl Config {
    #[instrument]
    fn run(self, root: PathBuf) -> anyhow::Result<()> {
        use terminal::Colorize;

        let mut case = CaseDirectory::open(root)?;

        match self.command {
            ConfigCommand::Show => {
                let config = case.config();
                println!("Configuration:");
                println!(
                    "  exclude_deceased_heirs: {} ({})",
                    config.exclude_deceased_heirs,
                    if config.exclude_deceased_heirs {
                        "deceased heirs inherit nothing".dim()
                    } else {
                        "deceased heirs are counted".dim()
                    }
                );
                println!(
                    "  sons_take_residue: {} ({})",
                    config.sons_take_residue,
                    if config.sons_take_residue {
                        "sons without daughters take the residue".dim()
                    } else {
                        "sons only inherit alongside daughters".dim()
                    }
                );
                println!("  completeness_tolerance: {}", config.completeness_tolerance());
                println!("  currency: {}", config.currency());
            }
            ConfigCommand::Set { key, value } => {
                let config = case.config_mut();
                match key.as_str() {
                    "exclude_deceased_heirs" => config.exclude_deceased_heirs = parse_bool(&value)?,
                    "sons_take_residue" => config.sons_take_residue = parse_bool(&value)?,
                    "completeness_tolerance" => {
                        let tolerance = value
                            .parse::<f64>()
                            .map_err(|_| anyhow::anyhow!("Value must be a number"))?;
                        config
                            .set_completeness_tolerance(tolerance)
                            .map_err(|e| anyhow::anyhow!("{e}"))?;
                    }
                    "currency" => config.set_currency(value.clone()),
                    _ => {
                        anyhow::bail!(
                            "Unknown configuration key: {key}\nAvailable keys: \
                             exclude_deceased_heirs, sons_take_residue, \
                             completeness_tolerance, currency"
                        );
                    }
                }

                case.save_config().map_err(|e| anyhow::anyhow!("{e}"))?;
                println!("{}", format!("Set {key} = {value}").success());
            }
        }

        Ok(())
    }
}
