#![forbid(unsafe_code)]

mod commands;
mod render;

use std::process::ExitCode;

use clap::{ArgAction, Parser, Subcommand};
use spycat_core::{ClientConfig, CreateTarget, SpyCatClient};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "spycat")]
#[command(about = "Spy cat agency admin console")]
#[command(
    after_help = "Environment:\n  SPY_CAT_API_URL   Backend base URL (default http://localhost:8000)\n  RUST_LOG          Log filter override"
)]
struct Cli {
    /// Backend base URL; wins over SPY_CAT_API_URL.
    #[arg(long, global = true)]
    api_url: Option<String>,
    #[arg(long, global = true, default_value_t = false)]
    json: bool,
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Probe the backend once.
    Health,
    Cats {
        #[command(subcommand)]
        command: CatsCommand,
    },
    Missions {
        #[command(subcommand)]
        command: MissionsCommand,
    },
    Targets {
        #[command(subcommand)]
        command: TargetsCommand,
    },
}

#[derive(Subcommand)]
enum CatsCommand {
    List,
    Get {
        id: i64,
    },
    Create {
        #[arg(long)]
        name: String,
        #[arg(long)]
        years: u32,
        #[arg(long)]
        breed: String,
        #[arg(long, allow_negative_numbers = true)]
        salary: f64,
    },
    SetSalary {
        id: i64,
        #[arg(allow_negative_numbers = true)]
        salary: f64,
    },
    Delete {
        id: i64,
        /// Skip the confirmation prompt.
        #[arg(long, short = 'y')]
        yes: bool,
    },
}

#[derive(Subcommand)]
enum MissionsCommand {
    List,
    Get {
        id: i64,
    },
    /// Targets are given as NAME:COUNTRY[:NOTES]; rows missing a name or
    /// country are skipped.
    Create {
        #[arg(long = "target", value_parser = parse_target, required = true)]
        targets: Vec<CreateTarget>,
    },
    Assign {
        mission_id: i64,
        cat_id: i64,
    },
    Delete {
        id: i64,
        #[arg(long, short = 'y')]
        yes: bool,
    },
}

#[derive(Subcommand)]
enum TargetsCommand {
    /// Change notes and/or mark complete; omitted fields stay as they are.
    Update {
        id: i64,
        #[arg(long)]
        notes: Option<String>,
        #[arg(long)]
        complete: bool,
    },
}

fn parse_target(raw: &str) -> Result<CreateTarget, String> {
    let mut parts = raw.splitn(3, ':');
    let name = parts.next().unwrap_or_default();
    let country = parts
        .next()
        .ok_or_else(|| format!("expected NAME:COUNTRY[:NOTES], got `{raw}`"))?;
    let notes = parts.next().unwrap_or_default();
    Ok(CreateTarget::new(name, country).with_notes(notes))
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = match cli.api_url.as_deref() {
        Some(url) => ClientConfig::from_override(Some(url)),
        None => ClientConfig::from_env(),
    };
    let client = match SpyCatClient::new(config) {
        Ok(client) => client,
        Err(err) => {
            render::report(&commands::CliError::Api(err));
            return ExitCode::FAILURE;
        }
    };

    let out = render::Output { json: cli.json };
    let result = match cli.command {
        Commands::Health => commands::health(&client, &out).await,
        Commands::Cats { command } => commands::cats(&client, &out, command).await,
        Commands::Missions { command } => commands::missions(&client, &out, command).await,
        Commands::Targets { command } => commands::targets(&client, &out, command).await,
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            render::report(&err);
            ExitCode::FAILURE
        }
    }
}
