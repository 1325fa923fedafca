use crate::demo::{run_demo, run_triage_batch, run_triage_decide, BatchArgs, DecideArgs, DemoArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use roofwork_ai::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Roof Work Triage",
    about = "Run the roof work triage service and tooling from the command line",
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
    /// Decide roof work for intake records
    Triage {
        #[command(subcommand)]
        command: TriageCommand,
    },
    /// Run a canned end-to-end triage demo on the command line
    Demo(DemoArgs),
}

#[derive(Subcommand, Debug)]
enum TriageCommand {
    /// Decide a single record supplied via flags
    Decide(DecideArgs),
    /// Decide every row of a CRM opportunity export
    Batch(BatchArgs),
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
        Command::Triage {
            command: TriageCommand::Decide(args),
        } => run_triage_decide(args),
        Command::Triage {
            command: TriageCommand::Batch(args),
        } => run_triage_batch(args),
        Command::Demo(args) => run_demo(args),
    }
}
