use std::process::ExitCode;

use clap::Parser;

use jb_api::cli::Cli;
use jb_api::commands;
use jb_api::serverless::is_lambda_environment;
use jb_shared::config::AppConfig;

#[actix_web::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let mut config = match AppConfig::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: failed to load configuration: {}", e);
            return ExitCode::FAILURE;
        }
    };
    cli.apply_overrides(&mut config);

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(cli.log_filter(&config)))
        .format_timestamp_millis()
        .init();

    let result = if cli.command.is_none() && is_lambda_environment() {
        log::info!("Lambda environment detected");
        commands::serve_lambda(&config).await
    } else {
        commands::execute(&cli, config).await
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}
