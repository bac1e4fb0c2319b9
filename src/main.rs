//! Overflow Lab - buffer overflows next to their mitigations
//!
//! Main CLI entry point for the interactive menu and one-shot demonstrations.

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use log::LevelFilter;
use overflow_lab::config::{LabConfig, CONFIG_FILE_NAME};
use overflow_lab::console::{LineWriter, StdinReader, StdoutWriter};
use overflow_lab::menu::Session;
use overflow_lab::ops::{Input, OpKind, Request, Variant};
use overflow_lab::report;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "olab")]
#[command(version)]
#[command(about = "Buffer overflow demonstrations next to their mitigations", long_about = None)]
struct Cli {
    /// Config file (default: nearest overflow-lab.toml at or above the current directory)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Skip the audit log for this run
    #[arg(long, global = true)]
    no_audit: bool,

    /// Debug logging on stderr (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Show or create the configuration
    Config {
        /// Print the effective configuration as TOML
        #[arg(long)]
        show: bool,

        /// Write a default overflow-lab.toml in the current directory
        #[arg(long)]
        init: bool,

        /// Print which config file is in use
        #[arg(long)]
        path: bool,
    },

    /// Interactive menu (default when no subcommand is given)
    Menu,

    /// Run one demonstration without the menu
    Run {
        /// Demonstration: int, string, array, read or alloc
        kind: OpKind,

        /// Variant: unsafe or safe
        variant: Variant,

        /// Input instead of the configured demonstration value
        #[arg(long, allow_hyphen_values = true)]
        value: Option<String>,
    },

    /// Print the demonstration summary table
    Summary {
        /// Emit JSON instead of a text table
        #[arg(long)]
        json: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command.unwrap_or(Commands::Menu) {
        Commands::Config { show, init, path } => cmd_config(cli.config.as_ref(), show, init, path),
        Commands::Menu => {
            let config = load_config(cli.config.as_ref())?;
            cmd_menu(&config, cli.no_audit)
        }
        Commands::Run {
            kind,
            variant,
            value,
        } => {
            let config = load_config(cli.config.as_ref())?;
            cmd_run(&config, kind, variant, value.as_deref(), cli.no_audit)
        }
        Commands::Summary { json } => {
            let config = load_config(cli.config.as_ref())?;
            cmd_summary(&config, json)
        }
    }
}

fn init_logging(verbose: bool) {
    let mut builder = pretty_env_logger::formatted_builder();
    match std::env::var("RUST_LOG") {
        Ok(filters) => {
            builder.parse_filters(&filters);
        }
        Err(_) => {
            builder.filter_level(if verbose {
                LevelFilter::Debug
            } else {
                LevelFilter::Error
            });
        }
    }
    builder.init();
}

fn load_config(path: Option<&PathBuf>) -> Result<LabConfig> {
    match path {
        Some(path) => LabConfig::load(path).context("Failed to load config"),
        None => LabConfig::load_from_cwd().context("Failed to load config"),
    }
}

fn open_session<'a, W: LineWriter>(
    config: &'a LabConfig,
    no_audit: bool,
    out: &mut W,
) -> Result<Session<'a>> {
    let mut session = Session::new(config);
    if !no_audit {
        session.attach_audit(out)?;
    }
    Ok(session)
}

fn cmd_menu(config: &LabConfig, no_audit: bool) -> Result<()> {
    let mut input = StdinReader::new();
    let mut out = StdoutWriter::new();
    let mut session = open_session(config, no_audit, &mut out)?;

    match session.run_menu(&mut input, &mut out) {
        Ok(status) => {
            log::debug!("menu finished: {:?}", status);
            Ok(())
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(e.exit_code());
        }
    }
}

fn cmd_run(
    config: &LabConfig,
    kind: OpKind,
    variant: Variant,
    value: Option<&str>,
    no_audit: bool,
) -> Result<()> {
    let request = match value {
        Some(raw) => Request::new(
            kind,
            variant,
            Input::parse(kind, raw).context("Invalid --value")?,
        ),
        None => Request::demo(kind, variant, config),
    };

    let mut out = StdoutWriter::new();
    let mut session = open_session(config, no_audit, &mut out)?;

    out.write_line(&format!(
        "Demonstrating {} Function for {}:",
        variant.title(),
        kind.title()
    ))?;
    if let Err(e) = session.run_request(&request, &mut out) {
        eprintln!("Error: {}", e);
        std::process::exit(e.exit_code());
    }
    Ok(())
}

fn cmd_summary(config: &LabConfig, json: bool) -> Result<()> {
    let rows = report::build_summary(config).context("Failed to run demonstrations")?;
    if json {
        println!("{}", report::render_json(&rows)?);
    } else {
        for line in report::render_table(&rows) {
            println!("{}", line);
        }
    }
    Ok(())
}

fn cmd_config(explicit: Option<&PathBuf>, show: bool, init: bool, path: bool) -> Result<()> {
    if init {
        let target = std::env::current_dir()?.join(CONFIG_FILE_NAME);
        if target.exists() {
            bail!("{} already exists", target.display());
        }
        LabConfig::default()
            .save(&target)
            .context("Failed to write config")?;
        println!("Wrote {}", target.display());
    }

    if path {
        let found = match explicit {
            Some(p) => Some(p.clone()),
            None => LabConfig::find(&std::env::current_dir()?),
        };
        match found {
            Some(p) => println!("{}", p.display()),
            None => println!("(none, using defaults)"),
        }
    }

    if show || !(init || path) {
        let config = load_config(explicit)?;
        print!("{}", config.to_toml()?);
    }
    Ok(())
}
