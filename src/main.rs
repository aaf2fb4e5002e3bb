//! Packsmith CLI - dependency resolver and compiler for versioned game content
//!
//! Usage: packsmith [--json] [-v] [--config PATH] [--root PATH]... <COMMAND>
//!
//! Commands:
//!   check  Resolve every content root and report dropped modules
//!   packs  List compiled packs

mod cli;

use std::collections::{BTreeMap, BTreeSet};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;
use tracing::warn;
use tracing_subscriber::EnvFilter;

use packsmith::domain::entities::MissingAssets;
use packsmith::{
    AssetType, CompiledPack, Config, ContentProcessor, ContentRoot, GenericIdentifier, Identifier,
    ResolutionReport, RootOrigin, TomlModuleLoader,
};

use cli::{Cli, Commands};

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    let (config, warnings) =
        Config::load_or_default(cli.config.as_deref()).context("failed to load configuration")?;
    init_logging(cli.verbose, &config.logging.level);
    for warning in &warnings {
        warn!("{warning}");
    }

    let roots: Vec<ContentRoot> = if cli.roots.is_empty() {
        config.content_roots()
    } else {
        cli.roots
            .iter()
            .map(|path| ContentRoot::new(RootOrigin::BuiltIn, path))
            .collect()
    };

    let processor = ContentProcessor::new(TomlModuleLoader::default());
    let report = processor.process_all(&roots);

    match cli.command {
        Commands::Check => cmd_check(&report, cli.json),
        Commands::Packs { pack } => cmd_packs(&processor, pack.as_deref(), cli.json),
    }
}

fn init_logging(verbose: u8, configured: &str) {
    let filter = match verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(configured)),
        1 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn cmd_check(report: &ResolutionReport, json: bool) -> Result<ExitCode> {
    if json {
        println!("{}", serde_json::to_string_pretty(report)?);
    } else {
        print!("{report}");
    }

    Ok(if report.is_clean() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

#[derive(Serialize)]
struct PackSummary {
    identifier: Identifier,
    root: Option<PathBuf>,
    asset_dependencies: BTreeSet<Identifier>,
    resources: BTreeSet<Identifier>,
    assets: BTreeMap<AssetType, usize>,
    missing_assets: MissingAssets,
    /// Deferred references the resolved dependencies do not supply.
    unsatisfied: MissingAssets,
}

impl PackSummary {
    fn new(pack: &CompiledPack, dependencies: &[Arc<CompiledPack>]) -> Self {
        Self {
            identifier: pack.identifier().clone(),
            root: pack.root().cloned(),
            asset_dependencies: pack.asset_dependencies().clone(),
            resources: pack.resources().clone(),
            assets: pack
                .assets()
                .iter()
                .map(|(asset_type, by_id)| (*asset_type, by_id.len()))
                .collect(),
            missing_assets: pack.missing_assets().clone(),
            unsatisfied: pack.leftover_missing(dependencies.iter().map(Arc::as_ref)),
        }
    }
}

fn cmd_packs(
    processor: &ContentProcessor<TomlModuleLoader>,
    filter: Option<&str>,
    json: bool,
) -> Result<ExitCode> {
    let packs = match filter {
        Some(generic) => {
            let generic: GenericIdentifier = generic
                .parse()
                .with_context(|| format!("invalid pack filter '{generic}'"))?;
            processor.packs(&generic)
        }
        None => processor.all_packs(),
    };

    let summaries: Vec<PackSummary> = packs
        .iter()
        .map(|pack| {
            let dependencies: Vec<Arc<CompiledPack>> = pack
                .asset_dependencies()
                .iter()
                .filter_map(|id| processor.pack(id))
                .collect();
            PackSummary::new(pack, &dependencies)
        })
        .collect();

    if json {
        println!("{}", serde_json::to_string_pretty(&summaries)?);
        return Ok(ExitCode::SUCCESS);
    }

    if summaries.is_empty() {
        println!("No compiled packs.");
        return Ok(ExitCode::SUCCESS);
    }
    for summary in &summaries {
        print_summary(summary);
    }
    Ok(ExitCode::SUCCESS)
}

fn print_summary(summary: &PackSummary) {
    println!("{}", summary.identifier);
    if let Some(root) = &summary.root {
        println!("  root: {}", root.display());
    }
    let total: usize = summary.assets.values().sum();
    println!("  assets: {total}");
    for dependency in &summary.asset_dependencies {
        println!("  depends on: {dependency}");
    }
    for resource in &summary.resources {
        println!("  resource: {resource}");
    }
    for (asset_type, ids) in &summary.missing_assets {
        for id in ids {
            let marker = if summary
                .unsatisfied
                .get(asset_type)
                .is_some_and(|left| left.contains(id))
            {
                " (unsatisfied)"
            } else {
                ""
            };
            println!("  deferred: {asset_type} {id}{marker}");
        }
    }
}
