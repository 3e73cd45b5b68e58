// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

use std::collections::BTreeSet;
use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use tracing::{debug, info, warn};

use pdnsync::config;
use pdnsync::constants::{CHANGED_MARKER, PRUNE_SCOPE};
use pdnsync::model::ZoneSpec;
use pdnsync::pdns::{api::PdnsApi, pdnsutil::PdnsUtil, PdnsStore, ZoneStore};
use pdnsync::reconcilers;

/// Converge declared PowerDNS zones, metadata and records against a server.
///
/// Emits one "CHANGED <zone>" line on stdout per zone that needed a
/// mutation; all diagnostics go to stderr.
#[derive(Parser, Debug)]
#[command(name = "pdnsync", version, about)]
struct Cli {
    /// Path to the desired-state configuration file
    #[arg(short, long)]
    config: PathBuf,

    /// Restrict the run to the given zone (repeatable); disables pruning
    #[arg(long = "zone", value_name = "NAME")]
    zones: Vec<String>,

    /// Compute and print plans as JSON without mutating anything
    #[arg(long)]
    dry_run: bool,

    /// Prune unknown zones even if the configuration does not enable it
    #[arg(long)]
    prune: bool,
}

fn main() -> Result<()> {
    // Build Tokio runtime with custom thread names
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(2)
        .thread_name("pdnsync")
        .enable_all()
        .build()?;

    runtime.block_on(async_main())
}

async fn async_main() -> Result<()> {
    // Initialize logging on stderr so stdout stays machine-readable for the
    // CHANGED markers and dry-run plans.
    //
    // Respects RUST_LOG for the filter (defaults to INFO) and
    // RUST_LOG_FORMAT for the output format (text or json).
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    let log_format = std::env::var("RUST_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());

    match log_format.to_lowercase().as_str() {
        "json" => {
            tracing_subscriber::fmt()
                .with_env_filter(env_filter)
                .with_writer(std::io::stderr)
                .with_target(false)
                .json()
                .init();
        }
        _ => {
            tracing_subscriber::fmt()
                .with_env_filter(env_filter)
                .with_writer(std::io::stderr)
                .with_target(false)
                .compact()
                .init();
        }
    }

    let cli = Cli::parse();

    info!(config = %cli.config.display(), dry_run = cli.dry_run, "Starting pdnsync");
    let run = config::load(&cli.config)?;
    debug!(zones = run.zones.len(), prune = run.prune, "Configuration loaded");

    let api_key = PdnsApi::api_key_from_env()?;
    let api = PdnsApi::new(&run.api_url, &run.server_id, api_key)?;
    let store = PdnsStore::new(api, PdnsUtil::new(&run.pdnsutil));

    let selected = select_zones(&run.zones, &cli.zones)?;

    // Zones are processed one at a time; the first failure aborts the whole
    // run and re-running converges whatever remains.
    for spec in &selected {
        if cli.dry_run {
            let actions = reconcilers::plan_zone(&store, spec).await?;
            let plan = serde_json::json!({ "zone": spec.name, "actions": actions });
            println!("{}", serde_json::to_string_pretty(&plan)?);
        } else {
            let outcome = reconcilers::reconcile_zone(&store, spec).await?;
            if outcome.changed {
                println!("{CHANGED_MARKER} {}", outcome.zone);
            }
        }
    }

    if run.prune || cli.prune {
        if !cli.zones.is_empty() {
            warn!("Pruning skipped: the run is narrowed by --zone");
        } else {
            let desired: BTreeSet<String> = run.zones.iter().map(|z| z.name.clone()).collect();
            if cli.dry_run {
                let live = store.list_zones().await?;
                let actions = reconcilers::gc::plan(&desired, &live);
                let plan = serde_json::json!({ "zone": PRUNE_SCOPE, "actions": actions });
                println!("{}", serde_json::to_string_pretty(&plan)?);
            } else if reconcilers::gc::collect(&store, &desired).await? {
                println!("{CHANGED_MARKER} {PRUNE_SCOPE}");
            }
        }
    }

    info!("Run complete");
    Ok(())
}

/// Narrow the validated zone list to the ones named on the command line.
///
/// With no filter, every declared zone is selected. Naming an undeclared
/// zone is an error: silently reconciling nothing would read as a no-op.
fn select_zones<'a>(zones: &'a [ZoneSpec], filter: &[String]) -> Result<Vec<&'a ZoneSpec>> {
    if filter.is_empty() {
        return Ok(zones.iter().collect());
    }

    let mut selected = Vec::with_capacity(filter.len());
    for name in filter {
        let wanted = name.trim_end_matches('.');
        match zones.iter().find(|z| z.name == wanted) {
            Some(spec) => selected.push(spec),
            None => anyhow::bail!("zone '{name}' is not declared in the configuration"),
        }
    }
    Ok(selected)
}
