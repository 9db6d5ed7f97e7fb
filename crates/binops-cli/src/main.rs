mod moves;
mod roster;

use binops_client::BinopsClient;
use binops_core::MoveStatus;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use crate::moves::{AssignArgs, CancelArgs, EditArgs, ScheduleArgs};

#[derive(Debug, Parser)]
#[command(name = "binops")]
#[command(about = "Schedule, edit and assign bin moves")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// List shifts
    Shifts,
    /// Show a driver's remaining stops
    Stops {
        /// Driver id
        #[arg(long)]
        driver: String,
    },
    /// List users that can take one-off assignments
    Users,
    /// List move requests
    Requests {
        /// Only show requests in this status (pending, in_progress, ...)
        #[arg(long)]
        status: Option<MoveStatus>,
    },
    /// Schedule a move for one or more bins
    Schedule(ScheduleArgs),
    /// Change an existing move request
    Edit(EditArgs),
    /// Cancel a move request
    Cancel(CancelArgs),
    /// Assign existing move requests to a shift
    Assign(AssignArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = binops_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let client = BinopsClient::from_config(&config)?;
    tracing::debug!(env = %config.env, api = %config.api_base_url, "binops starting");

    match cli.command {
        Commands::Shifts => roster::run_shifts(&client).await,
        Commands::Stops { driver } => roster::run_stops(&client, &driver).await,
        Commands::Users => roster::run_users(&client).await,
        Commands::Requests { status } => moves::run_requests(&client, status).await,
        Commands::Schedule(args) => moves::run_schedule(&client, &args).await,
        Commands::Edit(args) => moves::run_edit(&client, &args).await,
        Commands::Cancel(args) => moves::run_cancel(&client, &args).await,
        Commands::Assign(args) => moves::run_assign(&client, &args).await,
    }
}
