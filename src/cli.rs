use crate::commands::{run_inspect, run_submit, InspectArgs, SubmitArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use grader_core::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Answer Paper Grader",
    about = "Submit answer papers for grading and review the evaluation results",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the results gateway (default command)
    Serve(ServeArgs),
    /// Upload PDFs to the grading service and display the result
    Submit(SubmitArgs),
    /// Display a saved grading service response without contacting the service
    Inspect(InspectArgs),
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
        Command::Submit(args) => run_submit(args).await,
        Command::Inspect(args) => run_inspect(args).await,
    }
}
