use std::fs;
use std::path::PathBuf;

use clap::Parser;
use lambda_runtime::Error;
use serde_json::Value;
use serverless_router_lambda::config::RuntimeConfig;
use serverless_router_lambda::invocation::{Application, InvocationError};
use serverless_router_lambda::sample_events::{sample_event, sample_event_names};
use serverless_router_lambda::telemetry::{init_tracing, LogFormat};

#[derive(Parser)]
#[command(
    name = "run_local",
    about = "Run an event through the router against the configured database"
)]
struct Cli {
    /// Name of a bundled sample event, e.g. LIST_STUDENTS_REST
    #[arg(required_unless_present_any = ["file", "list"])]
    event: Option<String>,
    /// Read the event from a JSON file instead
    #[arg(long, conflicts_with = "event")]
    file: Option<PathBuf>,
    /// Print the bundled sample event names and exit
    #[arg(long)]
    list: bool,
}

fn load_event(cli: &Cli) -> Result<Value, Error> {
    if let Some(path) = &cli.file {
        let raw = fs::read_to_string(path)
            .map_err(|error| Error::from(format!("failed to read {}: {error}", path.display())))?;
        return Ok(serde_json::from_str(&raw)?);
    }

    let name = cli.event.as_deref().unwrap_or_default();
    match sample_event(name) {
        Some(event) => Ok(event?),
        None => Err(Error::from(format!(
            "unknown sample event '{name}'; run with --list to see the available names"
        ))),
    }
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    let cli = Cli::parse();
    if cli.list {
        for name in sample_event_names() {
            println!("{name}");
        }
        return Ok(());
    }

    init_tracing(LogFormat::Text);
    let event = load_event(&cli)?;
    println!("\nEVENT:\n{}", serde_json::to_string_pretty(&event)?);

    let config = RuntimeConfig::from_env()?;
    let app = Application::from_config(&config).await;
    let result = app
        .handle(event)
        .await
        .map_err(InvocationError::into_lambda_error)?;

    println!("\nRESULT:\n{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}
