use crate::demo::{run_demo, run_roster_report, DemoArgs, RosterReportArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use placement_readiness::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Placement Readiness Service",
    about = "Run the placement readiness scoring service from the command line",
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
    /// Work with placement cell roster exports
    Roster {
        #[command(subcommand)]
        command: RosterCommand,
    },
    /// Run an end-to-end CLI demo covering scoring, matching, and analytics
    Demo(DemoArgs),
}

#[derive(Subcommand, Debug)]
enum RosterCommand {
    /// Import a roster CSV and print the resulting cohort report
    Report(RosterReportArgs),
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
        Command::Roster {
            command: RosterCommand::Report(args),
        } => run_roster_report(args).await,
        Command::Demo(args) => run_demo(args).await,
    }
}
