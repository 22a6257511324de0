// Sintomas Entry Point
// Line-oriented console front end for the chatbot actor

use anyhow::{bail, Context};
use sintomas_core::actors::ChatbotHandle;
use sintomas_core::brain::ChatEngine;
use sintomas_core::config::AppConfig;
use sintomas_core::preflight::run_preflight_checks;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = AppConfig::load().context("invalid configuration")?;
    let paths = config.paths();
    paths
        .init()
        .with_context(|| format!("cannot create data directory {:?}", paths.data_dir()))?;

    let report = run_preflight_checks(&paths);
    if !report.ready_to_start {
        error!("Preflight failed: {}", report.summary);
        bail!("startup aborted: {}", report.summary);
    }
    if !report.all_passed {
        info!("Starting with warnings: {}", report.summary);
    }

    let engine = ChatEngine::from_config(&config).context("cannot load chat engine")?;
    let unknown = engine.unknown_classes();
    if !unknown.is_empty() {
        info!("Classes without intent records: {}", unknown.join(", "));
    }

    let chatbot = ChatbotHandle::new(engine, Duration::from_secs(config.request_timeout_secs));
    let session_id = uuid::Uuid::new_v4().to_string();
    info!("Session {} started", session_id);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = tokio::io::stdout();

    while let Some(line) = lines.next_line().await? {
        let message = line.trim();
        if message.is_empty() {
            continue;
        }
        match chatbot
            .process_message(session_id.clone(), message.to_string())
            .await
        {
            Ok(reply) => {
                stdout.write_all(format!("{}\n", reply).as_bytes()).await?;
                stdout.flush().await?;
            }
            Err(e) => error!("Failed to answer: {}", e),
        }
    }

    chatbot.shutdown().await?;
    info!("Session {} ended", session_id);
    Ok(())
}
