use std::process::ExitCode;

use clap::Parser;
use deploy_scripts::{cli::Cli, output::report};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Logs go to stderr, stdout only carries the deployment result
    tracing_subscriber::fmt()
        .pretty()
        .with_max_level(cli.log_level())
        .with_writer(std::io::stderr)
        .init();

    ExitCode::from(report(cli.run().await))
}
