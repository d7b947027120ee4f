#[macro_use]
extern crate log;

mod cli;
mod settings;

use clap::{crate_name, crate_version};
use commons::converter::{BuildOptionsConverter, CommandLineConverter};
use failure::{Fallible, ResultExt};

/// Top-level log target for this application.
static APP_LOG_TARGET: &str = "build_launcher";
/// Log target of the shared command-line library.
static COMMONS_LOG_TARGET: &str = "commons";

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {}", error_message(&e));
        std::process::exit(1);
    }
}

/// Render an error and its causes on a single line.
fn error_message(e: &failure::Error) -> String {
    let causes: Vec<String> = e.iter_chain().map(ToString::to_string).collect();
    causes.join(": ")
}

fn run() -> Fallible<()> {
    let converter = BuildOptionsConverter::new();

    // Parse command-line options.
    let cli_opts = cli::CliOptions::parse(&converter)?;

    // Setup logging.
    env_logger::Builder::from_default_env()
        .format_timestamp_secs()
        .format_module_path(false)
        .filter(Some(APP_LOG_TARGET), cli_opts.loglevel())
        .filter(Some(COMMONS_LOG_TARGET), cli_opts.loglevel())
        .write_style(cli_opts.write_style())
        .try_init()
        .context("failed to initialize logging")?;

    debug!("command-line options:\n{:#?}", cli_opts);
    info!("starting {} {}", crate_name!(), crate_version!());

    // Environment defaults first, command line on top.
    let settings = settings::LauncherSettings::from_env()?;
    debug!("launcher settings: {:?}", settings);
    let build_config = converter.convert_with(&cli_opts.parsed, settings.seed_configuration())?;

    let json = serde_json::to_string_pretty(&build_config)?;
    println!("{}", json);
    Ok(())
}
