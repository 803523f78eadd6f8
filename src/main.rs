mod client;
mod commands;
mod config;
mod error;
mod model;
mod render;
mod request;
mod validate;

use anyhow::Result;
use clap::{CommandFactory, Parser};
use clap_complete::{generate, Generator, Shell};
use std::io::{self, Write};
use std::process;
use tracing_subscriber::EnvFilter;

use client::Client;
use commands::Commands;
use config::{ClientConfig, GlobalArgs};
use error::CliError;
use render::OutputFormat;

#[derive(Parser)]
#[command(author, version, about = "OpenSDS command line client", long_about = None)]
struct Cli {
    /// Generate shell completion script
    #[arg(long = "generate", value_enum)]
    generator: Option<Shell>,

    #[command(flatten)]
    global: GlobalArgs,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Some(generator) = cli.generator {
        generate_completion(generator, &mut io::stdout());
        return Ok(());
    }

    init_logging(cli.global.verbose);

    let command = cli.command.ok_or_else(|| {
        anyhow::anyhow!("A subcommand is required unless using --generate")
    })?;

    let client = Client::new(&ClientConfig::from_args(&cli.global))?;
    let format = if cli.global.json {
        OutputFormat::Json
    } else {
        OutputFormat::Table
    };

    let mut stdout = io::stdout().lock();
    let result = match command {
        Commands::Volume(volume) => {
            commands::volume::handle_volume_command(&client, volume, format, &mut stdout).await
        }
    };

    if let Err(err) = result {
        stdout.flush().ok();
        report_error(&err);
        process::exit(err.exit_code());
    }

    Ok(())
}

fn init_logging(verbose: u8) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config::default_log_level(verbose)));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn report_error(err: &CliError) {
    writeln!(io::stderr(), "{err}").ok();
}

fn generate_completion<G: Generator>(gen: G, buf: &mut dyn io::Write) {
    generate(gen, &mut Cli::command(), "osdsctl", buf);
}
