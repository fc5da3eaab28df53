use crate::demo::{run_demo, run_simulation, DemoArgs, SimulateArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use simulafin::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "SimulaFin",
    about = "Simulate SAC property financing and run the proposal review service",
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
    /// Compute a SAC financing simulation and print the summary
    Simulate(SimulateArgs),
    /// Run an end-to-end demo: simulate, sign, submit and review a proposal
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
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Simulate(args) => run_simulation(args),
        Command::Demo(args) => run_demo(args),
    }
}
