use crate::report::{run_fee_report, run_window_report, FeeReportArgs, WindowReportArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use prohibition_review::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Prohibition Review Service",
    about = "Serve and query driving prohibition review rules from the command line",
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
    /// Inspect review rules for a prohibition type
    Review {
        #[command(subcommand)]
        command: ReviewCommand,
    },
}

#[derive(Subcommand, Debug)]
enum ReviewCommand {
    /// Print the dates a review may be scheduled between
    Window(WindowReportArgs),
    /// Print the fee owed for a review
    Fee(FeeReportArgs),
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
        Command::Review {
            command: ReviewCommand::Window(args),
        } => run_window_report(args),
        Command::Review {
            command: ReviewCommand::Fee(args),
        } => run_fee_report(args),
    }
}
