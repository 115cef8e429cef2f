use crate::commands::{run_catalog, run_recommend, RecommendArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use scheme_advisor::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Scheme Advisor",
    about = "Recommend government welfare schemes from the command line or over HTTP",
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
    /// Recommend schemes for a profile JSON document
    Recommend(RecommendArgs),
    /// Print the scheme catalog as JSON
    Catalog,
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
        Command::Recommend(args) => run_recommend(args).await,
        Command::Catalog => run_catalog(),
    }
}
