use ccbuilder::core::parameters::helix::{BundleSpecification, HelixParameters};
use ccbuilder::core::parameters::register::Register;
use ccbuilder::engine::cache::Fingerprint;
use ccbuilder::engine::config::BuildConfig;
use ccbuilder::engine::error::BuildError;
use ccbuilder::engine::progress::{CancellationToken, ProgressReporter};
use ccbuilder::engine::state::BuildResult;
use ccbuilder::engine::store::{BuildStore, MemoryStore, RecordState};
use ccbuilder::workflows::build::{
    BuildService, BuildSource, CoiledCoilPipeline, ModelPipeline,
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Barrier};
use std::thread;

/// Counts pipeline invocations while delegating to the real pipeline.
struct SpyPipeline {
    inner: CoiledCoilPipeline,
    calls: AtomicUsize,
}

impl SpyPipeline {
    fn new() -> Self {
        Self {
            inner: CoiledCoilPipeline::from_config(&BuildConfig::default()).unwrap(),
            calls: AtomicUsize::new(0),
        }
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl ModelPipeline for SpyPipeline {
    fn run(
        &self,
        spec: &BundleSpecification,
        reporter: &ProgressReporter,
        cancel: Option<&CancellationToken>,
    ) -> Result<BuildResult, BuildError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.run(spec, reporter, cancel)
    }
}

fn dimer() -> Vec<HelixParameters> {
    ["EIAALKQEIAALKKENAALKWEIAALKQ", "KIAALKQKIAALKKKNAALKWKIAALKQ"]
        .into_iter()
        .map(|sequence| {
            HelixParameters::builder()
                .radius(5.1)
                .pitch(200.0)
                .interface_angle(26.0)
                .register(Register::A)
                .super_helical_rotation(0.0)
                .orientation(false)
                .z_shift(0.0)
                .sequence(sequence)
                .build()
                .unwrap()
        })
        .collect()
}

fn service(store: Arc<MemoryStore>, threshold: u64) -> BuildService<SpyPipeline> {
    let config = BuildConfig::builder()
        .promotion_threshold(threshold)
        .build()
        .unwrap();
    BuildService::with_pipeline(store, config, SpyPipeline::new())
}

#[test]
fn threshold_scenario_promotes_on_fifth_request_and_serves_sixth_from_cache() {
    let store = Arc::new(MemoryStore::new());
    let service = service(store.clone(), 5);
    let parameters = dimer();
    let fingerprint = Fingerprint::of(&parameters).unwrap();

    for request in 1..=4u64 {
        let outcome = service.build(&parameters, "scenario").unwrap();
        assert_eq!(outcome.source, BuildSource::Pipeline);
        assert_eq!(outcome.request_count, Some(request));
        let record = store.get(&fingerprint).unwrap().unwrap();
        assert_eq!(record.state(), RecordState::Seen { count: request });
    }

    let fifth = service.build(&parameters, "scenario").unwrap();
    assert_eq!(fifth.source, BuildSource::Pipeline);
    assert_eq!(fifth.request_count, Some(5));
    let record = store.get(&fingerprint).unwrap().unwrap();
    assert_eq!(record.state(), RecordState::Promoted);
    assert_eq!(service.pipeline().calls(), 5);

    let sixth = service.build(&parameters, "scenario").unwrap();
    assert_eq!(sixth.source, BuildSource::Cache);
    assert_eq!(sixth.result, fifth.result);
    assert_eq!(service.pipeline().calls(), 5);

    // Cache hits are not counted and not logged.
    let record = store.get(&fingerprint).unwrap().unwrap();
    assert_eq!(record.requested, 5);
    assert_eq!(store.log_entries().unwrap().len(), 5);
}

#[test]
fn different_requests_keep_separate_counters() {
    let store = Arc::new(MemoryStore::new());
    let service = service(store.clone(), 5);
    let parameters = dimer();
    let reversed: Vec<HelixParameters> = parameters.iter().rev().cloned().collect();

    service.build(&parameters, "a").unwrap();
    service.build(&parameters, "a").unwrap();
    let outcome = service.build(&reversed, "b").unwrap();

    assert_eq!(outcome.request_count, Some(1));
    assert_eq!(store.len().unwrap(), 2);
}

#[test]
fn concurrent_identical_requests_are_all_counted() {
    const REQUESTS: usize = 8;

    let store = Arc::new(MemoryStore::new());
    let service = Arc::new(service(store.clone(), 1_000));
    let parameters = Arc::new(dimer());
    let barrier = Arc::new(Barrier::new(REQUESTS));

    let handles: Vec<_> = (0..REQUESTS)
        .map(|i| {
            let service = Arc::clone(&service);
            let parameters = Arc::clone(&parameters);
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                service.build(&parameters, &format!("worker-{i}")).unwrap()
            })
        })
        .collect();

    let mut counts: Vec<u64> = handles
        .into_iter()
        .map(|handle| handle.join().unwrap().request_count.unwrap())
        .collect();
    counts.sort_unstable();

    let fingerprint = Fingerprint::of(&parameters).unwrap();
    let record = store.get(&fingerprint).unwrap().unwrap();
    assert_eq!(record.requested, REQUESTS as u64);
    assert_eq!(counts, (1..=REQUESTS as u64).collect::<Vec<_>>());
    assert_eq!(service.pipeline().calls(), REQUESTS);
}

#[test]
fn concurrent_requests_crossing_the_threshold_promote_once() {
    const REQUESTS: usize = 6;

    let store = Arc::new(MemoryStore::new());
    let service = Arc::new(service(store.clone(), 3));
    let parameters = Arc::new(dimer());
    let barrier = Arc::new(Barrier::new(REQUESTS));

    let handles: Vec<_> = (0..REQUESTS)
        .map(|_| {
            let service = Arc::clone(&service);
            let parameters = Arc::clone(&parameters);
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                service.build(&parameters, "racer").unwrap()
            })
        })
        .collect();
    let outcomes: Vec<_> = handles
        .into_iter()
        .map(|handle| handle.join().unwrap())
        .collect();

    let reference = &outcomes[0].result;
    assert!(outcomes.iter().all(|o| &o.result == reference));

    let fingerprint = Fingerprint::of(&parameters).unwrap();
    let record = store.get(&fingerprint).unwrap().unwrap();
    assert_eq!(record.state(), RecordState::Promoted);
    assert_eq!(record.model.as_ref(), Some(reference));
}

#[test]
fn cancelled_threshold_request_does_not_block_promotion() {
    let store = Arc::new(MemoryStore::new());
    let service = service(store.clone(), 2);
    let parameters = dimer();
    let fingerprint = Fingerprint::of(&parameters).unwrap();

    service.build(&parameters, "scenario").unwrap();

    let token = CancellationToken::new();
    token.cancel();
    let cancelled =
        service.build_with_progress(&parameters, "scenario", &ProgressReporter::new(), Some(&token));
    assert!(matches!(cancelled, Err(BuildError::Cancelled { .. })));
    let record = store.get(&fingerprint).unwrap().unwrap();
    assert_eq!(record.state(), RecordState::Seen { count: 2 });

    let third = service.build(&parameters, "scenario").unwrap();
    assert_eq!(third.source, BuildSource::Pipeline);
    assert_eq!(third.request_count, Some(3));
    let record = store.get(&fingerprint).unwrap().unwrap();
    assert_eq!(record.state(), RecordState::Promoted);

    let fourth = service.build(&parameters, "scenario").unwrap();
    assert_eq!(fourth.source, BuildSource::Cache);
    assert_eq!(fourth.result, third.result);
}
