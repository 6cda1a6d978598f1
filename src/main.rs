//! vidqa - Video Q&A client
//!
//! Entry point: parses arguments, sets up logging and configuration, and
//! hands off to the command handlers.

mod commands;

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use vidqa::cli::{Cli, Commands, ConfigCommands};
use vidqa::theme::current_theme;
use vidqa::Config;

/// Environment variable holding a tracing filter directive.
const LOG_ENV: &str = "VIDQA_LOG";

fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "vidqa=warn",
        1 => "vidqa=info",
        _ => "vidqa=debug",
    };
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| default.into());

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr).with_target(false))
        .init();
}

/// Load the configuration and apply command-line overrides.
fn load_config(cli: &Cli) -> anyhow::Result<Config> {
    let mut config = Config::load()?;
    if let Some(url) = &cli.backend_url {
        config.backend.base_url = url.clone();
    }
    Ok(config)
}

fn run(cli: Cli) -> anyhow::Result<()> {
    // Config commands must work even when the file is broken
    if let Commands::Config(command) = &cli.command {
        return match command {
            ConfigCommands::Show => commands::config::handle_show(),
            ConfigCommands::Path => commands::config::handle_path(),
            ConfigCommands::Init { force } => commands::config::handle_init(*force),
            ConfigCommands::Edit => commands::config::handle_edit(),
        };
    }
    if let Commands::Completions { shell } = &cli.command {
        return commands::completions::handle(*shell);
    }

    let config = load_config(&cli)?;

    match cli.command {
        Commands::List => commands::list::handle(&config),
        Commands::Upload { file } => commands::upload::handle(&config, &file),
        Commands::Ask {
            video,
            question,
            total_frames,
        } => commands::ask::handle(&config, &video, &question, total_frames),
        Commands::Search { keyword } => commands::search::handle(&config, &keyword),
        Commands::Timecode(args) => commands::timecode::handle(&config, &args),
        Commands::Shell => commands::shell::handle(&config),
        Commands::Config(_) | Commands::Completions { .. } => Ok(()),
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            let theme = current_theme();
            eprintln!("{} {:#}", theme.error_text("error:"), e);
            ExitCode::FAILURE
        }
    }
}
