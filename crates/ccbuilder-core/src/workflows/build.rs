use crate::core::coiled_coil::analysis::mean_residues_per_turn;
use crate::core::coiled_coil::backbone::generate_backbone;
use crate::core::forcefield::parameterization::Parameterizer;
use crate::core::forcefield::params::Forcefield;
use crate::core::forcefield::scoring::{NonBondedPotential, Scorer, ScoringConfig};
use crate::core::io::pdb::PdbFile;
use crate::core::packing::packer::pack_sequences;
use crate::core::parameters::helix::{BundleSpecification, HelixParameters};
use crate::engine::cache::{BuildCache, Fingerprint, RequestTicket};
use crate::engine::config::BuildConfig;
use crate::engine::error::BuildError;
use crate::engine::progress::{CancellationToken, Progress, ProgressReporter};
use crate::engine::state::BuildResult;
use crate::engine::store::BuildStore;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, instrument, warn};

/// Produces a model for a validated bundle. The default implementation is
/// [`CoiledCoilPipeline`]; tests substitute counting or failing pipelines.
pub trait ModelPipeline: Send + Sync {
    fn run(
        &self,
        spec: &BundleSpecification,
        reporter: &ProgressReporter,
        cancel: Option<&CancellationToken>,
    ) -> Result<BuildResult, BuildError>;
}

/// Backbone generation, packing, scoring, analysis and encoding with a
/// forcefield loaded once up front.
#[derive(Debug, Clone)]
pub struct CoiledCoilPipeline {
    forcefield: Forcefield,
    scoring: ScoringConfig,
}

impl CoiledCoilPipeline {
    pub fn new(forcefield: Forcefield, scoring: ScoringConfig) -> Self {
        Self {
            forcefield,
            scoring,
        }
    }

    pub fn from_config(config: &BuildConfig) -> Result<Self, BuildError> {
        Ok(Self::new(config.forcefield.load()?, config.scoring))
    }
}

impl ModelPipeline for CoiledCoilPipeline {
    fn run(
        &self,
        spec: &BundleSpecification,
        reporter: &ProgressReporter,
        cancel: Option<&CancellationToken>,
    ) -> Result<BuildResult, BuildError> {
        run_stages(spec, &self.forcefield, self.scoring, reporter, cancel)
    }
}

/// Builds one model without touching any cache.
///
/// An empty parameter list is rejected before any work starts.
#[instrument(skip_all, name = "build_model")]
pub fn build_model(
    parameters: &[HelixParameters],
    config: &BuildConfig,
    reporter: &ProgressReporter,
    cancel: Option<&CancellationToken>,
) -> Result<BuildResult, BuildError> {
    let spec = BundleSpecification::new(parameters.to_vec())?;
    let forcefield = config.forcefield.load()?;
    run_stages(&spec, &forcefield, config.scoring, reporter, cancel)
}

fn checkpoint(cancel: Option<&CancellationToken>, stage: &'static str) -> Result<(), BuildError> {
    match cancel {
        Some(token) if token.is_cancelled() => {
            info!(stage, "Build cancelled.");
            Err(BuildError::Cancelled { stage })
        }
        _ => Ok(()),
    }
}

fn run_stages(
    spec: &BundleSpecification,
    forcefield: &Forcefield,
    scoring: ScoringConfig,
    reporter: &ProgressReporter,
    cancel: Option<&CancellationToken>,
) -> Result<BuildResult, BuildError> {
    // === Stage 1: Backbone ===
    checkpoint(cancel, "Backbone")?;
    reporter.report(Progress::StageStart { name: "Backbone" });
    let chains = generate_backbone(spec);
    reporter.report(Progress::StageFinish);

    // === Stage 2: Packing ===
    checkpoint(cancel, "Packing")?;
    reporter.report(Progress::StageStart { name: "Packing" });
    let sequences: Vec<&str> = spec.chains().iter().map(|h| h.sequence()).collect();
    let mut system = pack_sequences(&chains, &sequences)?;
    reporter.report(Progress::Message(format!(
        "Packed {} atoms in {} chains",
        system.atom_count(),
        system.chain_count()
    )));
    reporter.report(Progress::StageFinish);

    // === Stage 3: Scoring ===
    checkpoint(cancel, "Scoring")?;
    reporter.report(Progress::StageStart { name: "Scoring" });
    Parameterizer::new(forcefield).parameterize_system(&mut system)?;
    let potential = NonBondedPotential::from_forcefield(forcefield);
    let energy = Scorer::new(&system, &potential, scoring).total_energy()?;
    debug!(vdw = energy.vdw, coulomb = energy.coulomb, "Scored bundle.");
    reporter.report(Progress::StageFinish);

    // === Stage 4: Analysis ===
    checkpoint(cancel, "Analysis")?;
    reporter.report(Progress::StageStart { name: "Analysis" });
    let mean_rpt = mean_residues_per_turn(&chains)?;
    reporter.report(Progress::StageFinish);

    // === Stage 5: Encoding ===
    checkpoint(cancel, "Encoding")?;
    reporter.report(Progress::StageStart { name: "Encoding" });
    let structure_encoding = PdbFile::encode(&system)?;
    reporter.report(Progress::StageFinish);

    info!(
        total_energy = energy.total(),
        mean_residues_per_turn = mean_rpt,
        "Model built."
    );

    Ok(BuildResult {
        structure_encoding,
        mean_residues_per_turn: mean_rpt,
        total_energy: energy.total(),
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildSource {
    /// Served from a promoted build record.
    Cache,
    /// Computed by the pipeline for this request.
    Pipeline,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BuildOutcome {
    pub result: BuildResult,
    pub source: BuildSource,
    /// Stored request count after this request. `None` for cache hits, which
    /// are not counted, and when the store could not be updated.
    pub request_count: Option<u64>,
}

/// The memoizing build entry point.
pub struct BuildService<P: ModelPipeline = CoiledCoilPipeline> {
    store: Arc<dyn BuildStore>,
    config: BuildConfig,
    pipeline: P,
}

impl BuildService<CoiledCoilPipeline> {
    /// Creates a service with the default pipeline, loading the configured
    /// forcefield once.
    pub fn new(store: Arc<dyn BuildStore>, config: BuildConfig) -> Result<Self, BuildError> {
        let pipeline = CoiledCoilPipeline::from_config(&config)?;
        Ok(Self::with_pipeline(store, config, pipeline))
    }
}

impl<P: ModelPipeline> BuildService<P> {
    pub fn with_pipeline(store: Arc<dyn BuildStore>, config: BuildConfig, pipeline: P) -> Self {
        Self {
            store,
            config,
            pipeline,
        }
    }

    pub fn config(&self) -> &BuildConfig {
        &self.config
    }

    pub fn pipeline(&self) -> &P {
        &self.pipeline
    }

    pub fn build(
        &self,
        parameters: &[HelixParameters],
        caller: &str,
    ) -> Result<BuildOutcome, BuildError> {
        self.build_with_progress(parameters, caller, &ProgressReporter::new(), None)
    }

    #[instrument(skip_all, name = "build_service")]
    pub fn build_with_progress(
        &self,
        parameters: &[HelixParameters],
        caller: &str,
        reporter: &ProgressReporter,
        cancel: Option<&CancellationToken>,
    ) -> Result<BuildOutcome, BuildError> {
        let spec = BundleSpecification::new(parameters.to_vec())?;
        let cache = BuildCache::new(self.store.as_ref(), self.config.promotion_threshold);

        let fingerprint = match Fingerprint::of(parameters) {
            Ok(fingerprint) => Some(fingerprint),
            Err(e) => {
                warn!(error = %e, "Could not fingerprint request; building without cache.");
                None
            }
        };

        if let Some(fingerprint) = &fingerprint {
            match cache.lookup(fingerprint, parameters) {
                Ok(Some(result)) => {
                    info!(fingerprint = %fingerprint, caller, "Serving promoted build record.");
                    return Ok(BuildOutcome {
                        result,
                        source: BuildSource::Cache,
                        request_count: None,
                    });
                }
                Ok(None) => {}
                Err(e) => {
                    warn!(fingerprint = %fingerprint, error = %e, "Build cache lookup failed.");
                }
            }
        }

        let ticket: Option<RequestTicket> = fingerprint.as_ref().and_then(|fingerprint| {
            cache
                .record_request(fingerprint, parameters)
                .map_err(|e| {
                    warn!(fingerprint = %fingerprint, error = %e, "Failed to record build request.");
                })
                .ok()
        });

        let started = Instant::now();
        let result = self.pipeline.run(&spec, reporter, cancel)?;
        let elapsed = started.elapsed();

        if let Some(fingerprint) = &fingerprint {
            if let Err(e) = cache.log_build(fingerprint, caller, elapsed) {
                warn!(fingerprint = %fingerprint, error = %e, "Failed to append build log entry.");
            }
            if ticket.is_some_and(|t| t.promote) {
                match cache.promote(fingerprint, parameters, result.clone()) {
                    Ok(_) => info!(fingerprint = %fingerprint, "Promoted build record."),
                    Err(e) => {
                        warn!(fingerprint = %fingerprint, error = %e, "Failed to promote build record.")
                    }
                }
            }
        }

        Ok(BuildOutcome {
            result,
            source: BuildSource::Pipeline,
            request_count: ticket.map(|t| t.count),
        })
    }
}
