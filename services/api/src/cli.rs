use crate::console::{run_diagnosis, run_jurisdictions, DiagnoseArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use jeonse_guard::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Jeonse Guard",
    about = "Diagnose jeonse deposit risk against assessed housing prices",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Run a single diagnosis and print the result
    Diagnose(DiagnoseArgs),
    /// List the districts this agent is authorized to diagnose
    Jurisdictions,
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Diagnose(args) => run_diagnosis(args).await,
        Command::Jurisdictions => run_jurisdictions(),
    }
}
