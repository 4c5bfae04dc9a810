//! ToolVault CLI

use clap::Parser;
use std::process::ExitCode;
use toolvault::{App, Cli, load_config, logging};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match load_config(cli.config.as_deref(), cli.profile.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            return ExitCode::from(2);
        }
    };

    logging::init(logging::level_for(cli.verbose, &config.log_level));
    log::debug!("ToolVault v{} (profile: {})", env!("CARGO_PKG_VERSION"), config.profile);

    let app = match App::new(config, cli.output_format.as_deref()) {
        Ok(app) => app,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            return ExitCode::from(2);
        }
    };

    match app.run(cli.command).await {
        Ok(output) => {
            print!("{}", output);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}
