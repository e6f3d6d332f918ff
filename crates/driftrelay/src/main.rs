use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use lambda_runtime::{service_fn, LambdaEvent};
use serde_json::Value;
use tokio::runtime::Runtime;

use driftrelay::cli::{Cli, Commands};
use driftrelay::config::Config;
use driftrelay::handler::{relay, Notifier};
use driftrelay::telemetry::init_tracing;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = Config::load(cli.config.clone())?;
    init_tracing(config.log_format, cli.verbose);

    let rt = Runtime::new()?;
    rt.block_on(async {
        match cli.command.clone().unwrap_or(Commands::Serve) {
            Commands::Serve => {
                // Secrets are resolved before the first event; a failure here fails the cold start.
                let notifier = Arc::new(Notifier::from_config(&config, false).await?);
                lambda_runtime::run(service_fn(move |event: LambdaEvent<Value>| {
                    let notifier = Arc::clone(&notifier);
                    async move { relay(&notifier, event).await }
                }))
                .await
                .map_err(|e| anyhow::anyhow!(e))?;
            }
            Commands::Invoke { event, dry_run } => {
                let raw = tokio::fs::read_to_string(&event)
                    .await
                    .with_context(|| format!("Reading event file {}", event.display()))?;
                let payload: Value = serde_json::from_str(&raw)
                    .with_context(|| format!("Parsing event JSON {}", event.display()))?;

                let notifier = Notifier::from_config(&config, dry_run).await?;
                let result = notifier.handle(&payload).await?;
                println!("{}", serde_json::to_string_pretty(&result)?);
            }
            Commands::Version { json } => {
                if json {
                    let info = serde_json::json!({
                        "version": env!("CARGO_PKG_VERSION"),
                        "commit": option_env!("GIT_SHA").unwrap_or("unknown"),
                        "build_date": option_env!("BUILD_DATE").unwrap_or("unknown"),
                    });
                    println!("{}", serde_json::to_string_pretty(&info)?);
                } else {
                    println!(
                        "driftrelay {} (commit: {}, built: {})",
                        env!("CARGO_PKG_VERSION"),
                        option_env!("GIT_SHA").unwrap_or("unknown"),
                        option_env!("BUILD_DATE").unwrap_or("unknown"),
                    );
                }
            }
        }
        Ok(())
    })
}

