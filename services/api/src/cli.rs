use crate::demo::{run_demo, run_feed, run_rank, DemoArgs, FeedArgs, RankArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use jobmatch::error::AppError;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "Job Match Engine",
    about = "Score job seekers against vacancies and rank applicant pools",
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
    /// Rank the applicants of one vacancy from a seed file
    Rank(RankArgs),
    /// Build the discovery feed of one job seeker from a seed file
    Feed(FeedArgs),
    /// Walk through a built-in two-candidate example
    Demo(DemoArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
    /// JSON seed file with vacancies, candidates, and applications
    #[arg(long)]
    pub(crate) seed: Option<PathBuf>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Rank(args) => run_rank(args),
        Command::Feed(args) => run_feed(args),
        Command::Demo(args) => run_demo(args),
    }
}
