//! Execution of CLI commands and rendering of their results.

use std::sync::Arc;

use serde::Serialize;

use jb_core::domain::value_objects::{BlockResult, CheckResult, FlushResult, ListResult, StatusResult, UnblockResult};
use jb_core::repositories::BlocklistStore;
use jb_core::services::BlocklistService;
use jb_shared::config::AppConfig;

use crate::app::run_server;
use crate::bootstrap::build_blocklist;
use crate::cli::{Cli, Command, Lookup};
use crate::middleware::cors::CorsPolicy;
use crate::routes::AppState;
use crate::serverless::{LambdaRuntime, ServerlessHandler};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Banner printed ahead of command output
pub fn banner(debug: bool) -> String {
    let mut banner = format!("jwtblock {}", VERSION);
    if debug {
        banner.push_str("\nDEBUG mode is enabled");
    }
    banner
}

/// Output of a blocklist command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Output {
    Block(BlockResult),
    Check(CheckResult),
    Unblock(UnblockResult),
    Flush(FlushResult),
    List(ListResult),
    Status(StatusResult),
}

impl Output {
    /// Human readable rendering
    pub fn text(&self) -> String {
        match self {
            Output::Block(result) => format!(
                "{} [New: {}] [TTL: {}]",
                result.message, result.is_new, result.ttl_display
            ),
            Output::Check(result) if result.blocked => String::from("Token is blocked"),
            Output::Check(_) => String::from("Token is allowed"),
            Output::Unblock(result) => result.message.clone(),
            Output::Flush(result) => format!("Flushed {} tokens from the blocklist", result.count),
            Output::List(result) if result.token_hashes.is_empty() => {
                String::from("No token hashes in the blocklist")
            }
            Output::List(result) => result
                .token_hashes
                .iter()
                .enumerate()
                .map(|(i, hash)| format!("{}: {}", i, hash))
                .collect::<Vec<_>>()
                .join("\n"),
            Output::Status(result) => format!("Blocklist size: {}", result.size),
        }
    }

    /// JSON rendering of the underlying result
    pub fn json(&self) -> serde_json::Result<String> {
        match self {
            Output::Block(result) => to_json(result),
            Output::Check(result) => to_json(result),
            Output::Unblock(result) => to_json(result),
            Output::Flush(result) => to_json(result),
            Output::List(result) => to_json(result),
            Output::Status(result) => to_json(result),
        }
    }

    pub fn render(&self, json: bool) -> serde_json::Result<String> {
        if json {
            self.json()
        } else {
            Ok(self.text())
        }
    }
}

fn to_json<T: Serialize>(value: &T) -> serde_json::Result<String> {
    serde_json::to_string(value)
}

/// Run a blocklist command against a service
pub async fn run_blocklist_command<S: BlocklistStore>(
    blocklist: &BlocklistService<S>,
    command: &Command,
    config: &AppConfig,
) -> anyhow::Result<Output> {
    let output = match command {
        Command::Block { jwt, .. } => Output::Block(blocklist.block(jwt, config.jwt.ttl.sec_specified).await?),
        Command::Check(args) => Output::Check(match args.lookup() {
            Lookup::Jwt(jwt) => blocklist.check_by_jwt(&jwt).await?,
            Lookup::Sha256(sha256) => blocklist.check_by_sha256(&sha256).await?,
        }),
        Command::Unblock(args) => Output::Unblock(match args.lookup() {
            Lookup::Jwt(jwt) => blocklist.unblock_by_jwt(&jwt).await?,
            Lookup::Sha256(sha256) => blocklist.unblock_by_sha256(&sha256).await?,
        }),
        Command::Flush => Output::Flush(blocklist.flush().await?),
        Command::List => Output::List(blocklist.list().await?),
        Command::Status => Output::Status(blocklist.status().await?),
        Command::Serve(_) | Command::Lambda | Command::Version => {
            anyhow::bail!("not a blocklist command")
        }
    };
    Ok(output)
}

/// Execute the parsed command line with a loaded configuration
pub async fn execute(cli: &Cli, config: AppConfig) -> anyhow::Result<()> {
    let command = match &cli.command {
        Some(command) => command.clone(),
        None => {
            anyhow::bail!("no command given, run with --help for usage")
        }
    };

    if cli.show_banner() {
        println!("{}", banner(cli.debug));
    }

    match command {
        Command::Version => {
            if cli.json {
                println!("{}", serde_json::json!({ "version": VERSION }));
            } else if cli.quiet {
                println!("{}", VERSION);
            }
            Ok(())
        }
        Command::Serve(_) => serve(&config).await,
        Command::Lambda => serve_lambda(&config).await,
        command => {
            let blocklist = build_blocklist(&config).await?;
            let output = run_blocklist_command(&blocklist, &command, &config).await?;
            println!("{}", output.render(cli.json)?);
            Ok(())
        }
    }
}

async fn serve(config: &AppConfig) -> anyhow::Result<()> {
    let blocklist = build_blocklist(config).await?;
    let state = AppState::new(blocklist, &config.http)?;

    println!("Serving the jwtblock web API on {}", config.http.bind_address());
    run_server(state, &config.http).await?;
    Ok(())
}

/// Serve Lambda invocations until the Runtime API fails
pub async fn serve_lambda(config: &AppConfig) -> anyhow::Result<()> {
    let runtime = LambdaRuntime::from_env()?;
    let blocklist = match build_blocklist(config).await {
        Ok(blocklist) => blocklist,
        Err(error) => {
            if let Err(report) = runtime.report_init_error(&format!("{:#}", error)).await {
                log::error!("Could not report the init error: {}", report);
            }
            return Err(error);
        }
    };
    let handler = ServerlessHandler::new(blocklist, Arc::new(CorsPolicy::from(&config.http)));

    runtime.run(&handler).await?;
    Ok(())
}
