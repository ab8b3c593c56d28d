mod cli;

use anyhow::Result;
use clap::Parser;
use cli::app::{App, Cli};
use std::process::ExitCode;

fn main() -> Result<ExitCode> {
    let args = Cli::parse();
    cli::init_tracing(args.verbose);

    let app = App::new(args);
    if app.run()? {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::FAILURE)
    }
}
