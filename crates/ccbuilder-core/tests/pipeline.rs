use ccbuilder::core::coiled_coil::backbone::generate_backbone;
use ccbuilder::core::io::pdb::PdbFile;
use ccbuilder::core::parameters::helix::{BundleSpecification, HelixParameters};
use ccbuilder::core::parameters::register::Register;
use ccbuilder::engine::config::BuildConfig;
use ccbuilder::engine::error::BuildError;
use ccbuilder::engine::progress::ProgressReporter;
use ccbuilder::workflows::build::build_model;

const GCN4: &str = "RMKQLEDKVEELLSKNYHLENEVARLKKLVGER";

fn helix(register: Register, orientation: bool, sequence: &str) -> HelixParameters {
    HelixParameters::builder()
        .radius(4.9)
        .pitch(226.0)
        .interface_angle(24.0)
        .register(register)
        .super_helical_rotation(0.0)
        .orientation(orientation)
        .z_shift(0.0)
        .sequence(sequence)
        .build()
        .unwrap()
}

fn bundle(chains: usize) -> Vec<HelixParameters> {
    (0..chains)
        .map(|_| helix(Register::A, false, GCN4))
        .collect()
}

fn circular_difference(a: f64, b: f64) -> f64 {
    (a - b).rem_euclid(360.0)
}

#[test]
fn repeated_builds_are_byte_identical() {
    let parameters = bundle(3);
    let config = BuildConfig::default();
    let reporter = ProgressReporter::new();

    let first = build_model(&parameters, &config, &reporter, None).unwrap();
    let second = build_model(&parameters, &config, &reporter, None).unwrap();

    assert_eq!(first.structure_encoding, second.structure_encoding);
    assert_eq!(first.total_energy.to_bits(), second.total_energy.to_bits());
    assert_eq!(
        first.mean_residues_per_turn.to_bits(),
        second.mean_residues_per_turn.to_bits()
    );
}

#[test]
fn encoded_model_has_one_chain_per_parameter_set() {
    let config = BuildConfig::default();
    for chains in 1..=4 {
        let result =
            build_model(&bundle(chains), &config, &ProgressReporter::new(), None).unwrap();
        let (system, _) = PdbFile::decode(&result.structure_encoding).unwrap();
        assert_eq!(system.chain_count(), chains);
        assert_eq!(system.residue_count(), chains * GCN4.len());
    }
}

#[test]
fn register_changes_shift_every_helical_phase_exactly() {
    let phases = |register: Register| -> Vec<f64> {
        let spec = BundleSpecification::new(vec![helix(register, false, GCN4)]).unwrap();
        generate_backbone(&spec)[0]
            .residues
            .iter()
            .map(|residue| residue.phase.helical)
            .collect()
    };

    let a = phases(Register::A);
    for (register, offset) in [(Register::B, 102.8), (Register::D, 308.4)] {
        for (shifted, base) in phases(register).iter().zip(&a) {
            assert!((circular_difference(*shifted, *base) - offset).abs() < 1e-9);
        }
    }
}

#[test]
fn reversed_orientation_mirrors_the_chain_along_the_bundle_axis() {
    let forward = BundleSpecification::new(vec![
        helix(Register::A, false, GCN4),
        helix(Register::A, false, GCN4),
    ])
    .unwrap();
    let mirrored = BundleSpecification::new(vec![
        helix(Register::A, false, GCN4),
        helix(Register::A, true, GCN4),
    ])
    .unwrap();

    let forward = generate_backbone(&forward);
    let mirrored = generate_backbone(&mirrored);

    assert_eq!(forward[0], mirrored[0]);
    for (a, b) in forward[1].residues.iter().zip(&mirrored[1].residues) {
        for ((name, p), (_, q)) in a.atoms().iter().zip(b.atoms().iter()) {
            assert!((p.x - q.x).abs() < 1e-12, "{name} x differs");
            assert!((p.y - q.y).abs() < 1e-12, "{name} y differs");
            assert!((p.z + q.z).abs() < 1e-12, "{name} z is not mirrored");
        }
    }
}

#[test]
fn two_residue_chains_raise_undefined_geometry() {
    let parameters = vec![
        helix(Register::A, false, "LK"),
        helix(Register::A, false, "EL"),
    ];
    let result = build_model(
        &parameters,
        &BuildConfig::default(),
        &ProgressReporter::new(),
        None,
    );
    assert!(matches!(result, Err(BuildError::UndefinedGeometry(_))));
}

#[test]
fn empty_sequence_contributes_nothing_but_does_not_fail() {
    let parameters = vec![
        helix(Register::A, false, GCN4),
        helix(Register::A, false, ""),
    ];
    let result = build_model(
        &parameters,
        &BuildConfig::default(),
        &ProgressReporter::new(),
        None,
    )
    .unwrap();
    let (system, _) = PdbFile::decode(&result.structure_encoding).unwrap();
    assert_eq!(system.chain_count(), 2);
    assert_eq!(system.residue_count(), GCN4.len());
    assert!(result.mean_residues_per_turn.is_finite());
}

#[test]
fn invalid_parameters_are_rejected_before_building() {
    let error = HelixParameters::builder()
        .radius(0.0)
        .pitch(226.0)
        .interface_angle(0.0)
        .register(Register::A)
        .super_helical_rotation(0.0)
        .orientation(false)
        .z_shift(0.0)
        .sequence("LKE")
        .build()
        .unwrap_err();
    let error: BuildError = error.into();
    assert!(matches!(error, BuildError::InvalidParameter(_)));
}
