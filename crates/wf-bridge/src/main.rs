//! `wf-bridge`: runs the command engine over JSON lines.
//!
//! stdout carries exactly the message channel: two startup notifications,
//! then one response per inbound envelope read from stdin. Logs go to stderr.

mod config;

use anyhow::Context;
use clap::Parser;
use config::BridgeConfig;
use serde::Serialize;
use serde_json::Value;
use std::path::PathBuf;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use wf_core::{Host, MemoryHost};
use wf_engine::{Engine, Envelope, Notification, Response};

/// Wireforge bridge: design commands in on stdin, responses out on stdout.
#[derive(Debug, Parser)]
#[command(name = "wf-bridge", version)]
struct Args {
    /// TOML config file (defaults apply when omitted)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Menu command to run before reading stdin, e.g. `get-selection`
    #[arg(long)]
    command: Option<String>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let config = match &args.config {
        Some(path) => BridgeConfig::load(path)?,
        None => BridgeConfig::default(),
    };

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(&config.log_level))
        .target(env_logger::Target::Stderr)
        .init();

    let host = MemoryHost::new().with_viewport(config.viewport.width, config.viewport.height);
    let mut engine = Engine::new(host, config.engine.clone());
    let mut stdout = tokio::io::stdout();

    announce(&engine, &config, &mut stdout).await?;
    if let Some(name) = &args.command {
        log::info!("running menu command {name}");
        let response = engine.handle(Envelope::from_menu_command(name)).await;
        emit(&mut stdout, &response).await?;
    }

    serve(&mut engine, BufReader::new(tokio::io::stdin()), &mut stdout).await
}

/// `show-ui` with the configured size, then `started` naming the document
/// root and the focused page.
async fn announce<H: Host, W: AsyncWrite + Unpin>(
    engine: &Engine<H>,
    config: &BridgeConfig,
    out: &mut W,
) -> anyhow::Result<()> {
    emit(
        out,
        &Notification::ShowUi {
            width: config.ui.width,
            height: config.ui.height,
        },
    )
    .await?;

    let page = engine.host.current_page();
    let page_name = engine
        .host
        .node(page)
        .map(|n| n.name.clone())
        .unwrap_or_default();
    emit(
        out,
        &Notification::Started {
            root_id: engine.host.root().to_string(),
            page_name,
        },
    )
    .await
}

/// Read envelopes line by line until EOF, answering each in order.
async fn serve<H, R, W>(engine: &mut Engine<H>, input: R, out: &mut W) -> anyhow::Result<()>
where
    H: Host,
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut lines = input.lines();
    while let Some(line) = lines.next_line().await.context("failed to read stdin")? {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let response = match serde_json::from_str::<Value>(line) {
            Ok(raw) => engine.dispatch(raw).await,
            Err(err) => {
                log::warn!("inbound line is not JSON: {err}");
                Some(Response::fail(
                    "UNKNOWN",
                    format!("malformed envelope: {err}"),
                    Value::Null,
                ))
            }
        };
        if let Some(response) = response {
            emit(out, &response).await?;
        }
    }
    log::info!("input closed, shutting down");
    Ok(())
}

async fn emit<W: AsyncWrite + Unpin, T: Serialize>(out: &mut W, message: &T) -> anyhow::Result<()> {
    let mut line = serde_json::to_vec(message)?;
    line.push(b'\n');
    out.write_all(&line).await?;
    out.flush().await?;
    Ok(())
}
