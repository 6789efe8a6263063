use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use colored::Colorize;

use cipherlot_crypto::ContentHasher;
use cipherlot_server::{CipherlotServer, ServerConfig};
use cipherlot_sync::{HttpTransport, PollReport, Publisher, Subscriber};
use cipherlot_types::Timestamp;

use crate::cli::*;

pub async fn run_command(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Command::Serve(args) => cmd_serve(args).await,
        Command::Publish(args) => cmd_publish(args, cli.format).await,
        Command::Subscribe(args) => cmd_subscribe(args, cli.format).await,
        Command::Cid(args) => cmd_cid(args, cli.format).await,
    }
}

/// Config file, then environment, then flags.
fn server_config(
    args: &ServeArgs,
    env: impl Fn(&str) -> Option<String>,
) -> anyhow::Result<ServerConfig> {
    let base = match &args.config {
        Some(path) => ServerConfig::from_file(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => ServerConfig::default(),
    };
    let mut config = base.with_env_from(env);
    if let Some(bind) = args.bind {
        config.bind_addr = bind;
    }
    if let Some(root) = &args.data_root {
        config.data_root = root.clone();
    }
    Ok(config)
}

/// `--since` values of zero or below start from the beginning.
fn start_watermark(since: i64) -> Option<Timestamp> {
    (since > 0).then(|| Timestamp::new(since))
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "cannot listen for Ctrl-C; stop the process to exit");
        std::future::pending::<()>().await;
    }
}

async fn cmd_serve(args: ServeArgs) -> anyhow::Result<()> {
    let config = server_config(&args, |key| std::env::var(key).ok())?;
    let server = CipherlotServer::new(config.clone()).with_context(|| {
        format!("failed to open data root {}", config.data_root.display())
    })?;

    println!(
        "{} Cipherlot node on {} (data root: {})",
        "✓".green().bold(),
        config.bind_addr.to_string().bold(),
        config.data_root.display()
    );
    server
        .serve_with_shutdown(shutdown_signal())
        .await
        .context("node failed")?;
    println!("Node stopped.");
    Ok(())
}

async fn cmd_publish(args: PublishArgs, format: OutputFormat) -> anyhow::Result<()> {
    let content = tokio::fs::read(&args.file)
        .await
        .with_context(|| format!("failed to read {}", args.file.display()))?;
    let transport = HttpTransport::new(&args.node)?;
    let publisher = Publisher::new(Arc::new(transport), args.author)?;
    let receipt = publisher
        .publish(&content, args.ts.map(Timestamp::new))
        .await
        .context("publish failed")?;

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&receipt)?),
        OutputFormat::Text => {
            println!("  Blob:     {}", receipt.blob.to_string().cyan());
            println!("  Manifest: {}", receipt.manifest.to_string().cyan());
            println!("  Feed ts:  {}", receipt.entry.ts);
            println!("Published. Deeplink: {}", receipt.deep_link.yellow());
        }
    }
    Ok(())
}

fn print_report(report: &PollReport, format: OutputFormat) -> anyhow::Result<()> {
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string(report)?),
        OutputFormat::Text => {
            for path in &report.downloaded {
                println!("{} Downloaded {}", "✓".green(), path.display());
            }
            for skipped in &report.skipped {
                println!(
                    "{} Skipped {} (ts {}): {}",
                    "!".yellow().bold(),
                    skipped.entry.cid.short(),
                    skipped.entry.ts,
                    skipped.reason
                );
            }
        }
    }
    Ok(())
}

fn describe_watermark(watermark: Option<Timestamp>) -> String {
    watermark.map_or_else(|| "none".into(), |ts| ts.to_string())
}

async fn cmd_subscribe(args: SubscribeArgs, format: OutputFormat) -> anyhow::Result<()> {
    let transport = HttpTransport::new(&args.node)?;
    let mut subscriber = Subscriber::new(Arc::new(transport), args.author, args.out)?
        .since(start_watermark(args.since));

    if args.once {
        let report = subscriber.poll_once().await.context("feed poll failed")?;
        print_report(&report, format)?;
        if format == OutputFormat::Text {
            println!("Watermark: {}", describe_watermark(report.watermark).bold());
        }
        return Ok(());
    }

    println!(
        "Following {} every {}s into {} (Ctrl-C to stop)",
        subscriber.author().bold(),
        args.interval,
        subscriber.out_dir().display()
    );
    let mut handle = subscriber.spawn(Duration::from_secs(args.interval));
    let ctrl_c = shutdown_signal();
    tokio::pin!(ctrl_c);
    loop {
        tokio::select! {
            _ = &mut ctrl_c => break,
            report = handle.next_report() => match report {
                Some(report) => print_report(&report, format)?,
                None => break,
            },
        }
    }

    let watermark = handle.stop().await?;
    println!("Stopped. Watermark: {}", describe_watermark(watermark).bold());
    Ok(())
}

async fn cmd_cid(args: CidArgs, format: OutputFormat) -> anyhow::Result<()> {
    let content = tokio::fs::read(&args.file)
        .await
        .with_context(|| format!("failed to read {}", args.file.display()))?;
    let id = ContentHasher::RAW.hash(&content);
    match format {
        OutputFormat::Json => println!(
            "{}",
            serde_json::json!({
                "cid": id.to_string(),
                "sha256": id.digest().to_hex(),
                "bytes": content.len(),
            })
        ),
        OutputFormat::Text => println!("{id}"),
    }
    Ok(())
}
