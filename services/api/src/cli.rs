use crate::demo::{run_demo, run_report, run_seed, DemoArgs, ReportArgs, SeedArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use mentor_map::error::AppError;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "Mentor Map",
    about = "Match scholars to mentors and surface coverage, fairness and continuity signals",
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
    /// Print matches and roster signals for a roster file or CSV exports
    Report(ReportArgs),
    /// Walk through matching, auto-assign and signals on the bundled sample roster
    Demo(DemoArgs),
    /// Write the bundled sample roster as JSON
    Seed(SeedArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
    /// Persist snapshots as JSON files under this directory
    #[arg(long)]
    pub(crate) snapshot_dir: Option<PathBuf>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Report(args) => run_report(args),
        Command::Demo(args) => run_demo(args),
        Command::Seed(args) => run_seed(args),
    }
}
