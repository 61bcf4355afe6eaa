use std::sync::Arc;

use clap::Parser;
use secrecy::SecretString;

use role_scan::assign::Progress;
use role_scan::config::ScanConfig;
use role_scan::platform::{DiscordRest, DiscordRoleAssigner, ScanTarget, link};
use role_scan::report;
use role_scan::scan::{ScanEngine, ScanRequest};

mod cli;

use cli::{Cli, Commands};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let cli = Cli::parse();

    let token = std::env::var("DISCORD_TOKEN").unwrap_or_else(|_| {
        eprintln!("Error: DISCORD_TOKEN not set");
        eprintln!("  export DISCORD_TOKEN=...");
        std::process::exit(1);
    });

    let (target, args) = match &cli.command {
        Commands::Channel(args) => (ScanTarget::Channel(args.channel.clone()), args),
        Commands::Thread(args) => (ScanTarget::Thread(args.channel.clone()), args),
    };

    let bounds =
        link::bounds_from_links(args.start_message.as_deref(), args.end_message.as_deref())?;

    let rest = DiscordRest::new(SecretString::from(token));
    let mutator = DiscordRoleAssigner::new(rest.clone(), args.guild.clone(), args.role.clone());

    let engine = ScanEngine::new(
        Arc::new(rest.clone()),
        Arc::new(mutator),
        ScanConfig::default(),
    )
    .with_unarchiver(Arc::new(rest));

    let request = ScanRequest {
        target,
        bounds,
        filter: args.attachment_filter.into(),
    };

    let progress = |p: Progress| {
        if p.processed % 10 == 0 || p.processed == p.total {
            eprintln!("⏳ Assigning roles... {}/{} done", p.processed, p.total);
        }
    };

    match engine.run(&request, &progress).await {
        Ok(scan_report) => {
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&scan_report)?);
            } else {
                println!("{}", report::render_summary(&scan_report));
            }
            Ok(())
        }
        Err(e) => {
            // Distinct from a completed scan with zero eligible authors.
            eprintln!("❌ Scan could not complete: {e}");
            std::process::exit(1);
        }
    }
}
