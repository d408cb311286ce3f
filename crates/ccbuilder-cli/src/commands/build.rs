use crate::cli::BuildArgs;
use crate::config::PartialBuildConfig;
use crate::error::Result;
use crate::input::read_parameters;
use crate::store::FileStore;
use crate::utils::progress::CliProgressHandler;
use ccbuilder::engine::progress::ProgressReporter;
use ccbuilder::workflows::build::{BuildOutcome, BuildService, BuildSource, build_model};
use std::sync::Arc;
use tracing::info;

pub async fn run(args: BuildArgs) -> Result<()> {
    let partial_config = match &args.config {
        Some(path) => PartialBuildConfig::from_file(path)?,
        None => PartialBuildConfig::default(),
    };
    info!("Merging configuration from file and CLI arguments...");
    let settings = partial_config.merge_with_cli(&args)?;

    info!("Reading helix parameters from {:?}", &args.input);
    let parameters = read_parameters(&args.input)?;

    let progress_handler = CliProgressHandler::new();
    let reporter = ProgressReporter::with_callback(progress_handler.get_callback());

    println!("Building a {}-chain bundle...", parameters.len());

    let outcome = if args.no_cache {
        info!("Cache disabled; invoking the build pipeline directly.");
        let result = tokio::task::block_in_place(|| {
            build_model(&parameters, &settings.build, &reporter, None)
        })?;
        BuildOutcome {
            result,
            source: BuildSource::Pipeline,
            request_count: None,
        }
    } else {
        let store_path = match settings.store_path {
            Some(path) => path,
            None => FileStore::default_path()?,
        };
        let store = Arc::new(FileStore::open(store_path));
        let service = BuildService::new(store, settings.build)?;
        let caller = args.caller.clone().unwrap_or_else(default_caller);

        info!("Invoking the build service as '{}'...", caller);
        tokio::task::block_in_place(|| {
            service.build_with_progress(&parameters, &caller, &reporter, None)
        })?
    };

    print_summary(&outcome);

    if let Some(output) = &args.output {
        info!("Writing structure to {:?}", output);
        std::fs::write(output, &outcome.result.structure_encoding)?;
        println!("✓ Structure written to: {}", output.display());
    }

    Ok(())
}

fn default_caller() -> String {
    std::env::var("USER")
        .or_else(|_| std::env::var("USERNAME"))
        .unwrap_or_else(|_| "ccbuilder-cli".to_string())
}

fn print_summary(outcome: &BuildOutcome) {
    let source = match outcome.source {
        BuildSource::Cache => "cache",
        BuildSource::Pipeline => "pipeline",
    };
    println!("  Total energy:        {:.4} kcal/mol", outcome.result.total_energy);
    println!(
        "  Mean residues/turn:  {:.4}",
        outcome.result.mean_residues_per_turn
    );
    println!("  Source:              {}", source);
    if let Some(count) = outcome.request_count {
        println!("  Request count:       {}", count);
    }
}
