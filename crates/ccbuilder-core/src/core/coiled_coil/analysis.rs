use super::backbone::BackboneChain;
use itertools::Itertools;
use nalgebra::{Matrix3, Point3, Rotation3};
use thiserror::Error;
use tracing::trace;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum GeometryError {
    #[error("Residues per turn are undefined: no chain has an interior residue")]
    UndefinedMean,

    #[error("Residue {residue} of chain {chain} has collinear N, CA and C atoms")]
    DegenerateFrame { chain: char, residue: usize },

    #[error("Residues {residue} and {next} of chain {chain} have no relative twist")]
    NoTwist { chain: char, residue: usize, next: usize },
}

/// Rigid motion between the frames of two consecutive residues.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HelicalStep {
    /// Rotation angle in degrees.
    pub twist: f64,
    /// Displacement of CA along the rotation axis, in Angstroms.
    pub rise: f64,
}

/// Helix descriptors at one interior residue.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LocalHelixGeometry {
    pub residue: usize,
    pub residues_per_turn: f64,
    pub rise: f64,
    /// Advance along the helix axis per full turn, in Angstroms.
    pub pitch: f64,
}

/// Orthonormal frame of a residue (columns: CA->C, the N direction made
/// orthogonal to it, and their cross product).
pub fn residue_frame(n: &Point3<f64>, ca: &Point3<f64>, c: &Point3<f64>) -> Option<Matrix3<f64>> {
    let e1 = (c - ca).try_normalize(1e-9)?;
    let to_n = n - ca;
    let e2 = (to_n - e1 * to_n.dot(&e1)).try_normalize(1e-9)?;
    let e3 = e1.cross(&e2);
    Some(Matrix3::from_columns(&[e1, e2, e3]))
}

/// Twist and rise between every pair of consecutive residues of a chain.
pub fn helical_steps(chain: &BackboneChain) -> Result<Vec<HelicalStep>, GeometryError> {
    let frames = chain
        .residues
        .iter()
        .enumerate()
        .map(|(index, residue)| {
            residue_frame(&residue.n, &residue.ca, &residue.c).ok_or(
                GeometryError::DegenerateFrame {
                    chain: chain.label,
                    residue: index,
                },
            )
        })
        .collect::<Result<Vec<_>, _>>()?;

    frames
        .windows(2)
        .enumerate()
        .map(|(k, pair)| {
            let step = Rotation3::from_matrix_unchecked(pair[1] * pair[0].transpose());
            let (axis, angle) = step.axis_angle().ok_or(GeometryError::NoTwist {
                chain: chain.label,
                residue: k,
                next: k + 1,
            })?;
            let displacement = chain.residues[k + 1].ca - chain.residues[k].ca;
            Ok(HelicalStep {
                twist: angle.to_degrees(),
                rise: displacement.dot(&axis.into_inner()).abs(),
            })
        })
        .collect()
}

/// Descriptors at every interior residue of a chain. The first and last
/// residues have a neighbour on one side only and are skipped.
pub fn chain_geometry(chain: &BackboneChain) -> Result<Vec<LocalHelixGeometry>, GeometryError> {
    if chain.len() < 3 {
        return Ok(Vec::new());
    }
    let steps = helical_steps(chain)?;

    Ok(steps
        .iter()
        .tuple_windows()
        .enumerate()
        .map(|(k, (before, after))| {
            let twist = (before.twist + after.twist) / 2.0;
            let rise = (before.rise + after.rise) / 2.0;
            let residues_per_turn = 360.0 / twist;
            LocalHelixGeometry {
                residue: k + 1,
                residues_per_turn,
                rise,
                pitch: residues_per_turn * rise,
            }
        })
        .collect())
}

/// Residues per turn at each interior residue of a chain.
pub fn residues_per_turn(chain: &BackboneChain) -> Result<Vec<f64>, GeometryError> {
    Ok(chain_geometry(chain)?
        .into_iter()
        .map(|g| g.residues_per_turn)
        .collect())
}

/// Arithmetic mean of the interior residues-per-turn values of every chain.
pub fn mean_residues_per_turn(chains: &[BackboneChain]) -> Result<f64, GeometryError> {
    let mut sum = 0.0;
    let mut count = 0usize;
    for chain in chains {
        for value in residues_per_turn(chain)? {
            sum += value;
            count += 1;
        }
    }

    if count == 0 {
        return Err(GeometryError::UndefinedMean);
    }
    let mean = sum / count as f64;
    trace!(values = count, mean, "Computed mean residues per turn.");
    Ok(mean)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::coiled_coil::backbone::{
        BackboneResidue, RISE_PER_RESIDUE, ResiduePhase, generate_backbone,
    };
    use crate::core::parameters::helix::{BundleSpecification, HelixParameters};
    use crate::core::parameters::register::Register;

    fn chains(pitch: f64, sequences: &[&str]) -> Vec<BackboneChain> {
        let helices = sequences
            .iter()
            .map(|seq| {
                HelixParameters::builder()
                    .radius(5.1)
                    .pitch(pitch)
                    .interface_angle(0.0)
                    .register(Register::A)
                    .super_helical_rotation(0.0)
                    .orientation(false)
                    .z_shift(0.0)
                    .sequence(*seq)
                    .build()
                    .unwrap()
            })
            .collect();
        generate_backbone(&BundleSpecification::new(helices).unwrap())
    }

    #[test]
    fn nearly_straight_helix_has_three_and_a_half_residues_per_turn() {
        let chain = &chains(1.0e6, &["AAAAAAA"])[0];
        let geometry = chain_geometry(chain).unwrap();
        assert_eq!(geometry.len(), 5);
        for local in &geometry {
            assert!((local.residues_per_turn - 3.5).abs() < 1e-3);
            assert!((local.rise - RISE_PER_RESIDUE).abs() < 1e-6);
            assert!((local.pitch - 3.5 * RISE_PER_RESIDUE).abs() < 1e-2);
        }
        assert_eq!(geometry.first().map(|g| g.residue), Some(1));
        assert_eq!(geometry.last().map(|g| g.residue), Some(5));
    }

    #[test]
    fn supercoiled_helix_has_a_realistic_local_residues_per_turn() {
        let chain = &chains(226.0, &["EIAALKQEIAALKK"])[0];
        for value in residues_per_turn(chain).unwrap() {
            assert!((3.4..3.7).contains(&value), "rpt {value}");
        }
    }

    #[test]
    fn mean_spans_every_interior_residue_of_every_chain() {
        let bundle = chains(226.0, &["AAAAA", "AAA", "AA", ""]);
        let per_chain: Vec<Vec<f64>> = bundle.iter().map(|c| residues_per_turn(c).unwrap()).collect();
        assert_eq!(per_chain.iter().map(Vec::len).collect::<Vec<_>>(), vec![3, 1, 0, 0]);

        let all: Vec<f64> = per_chain.into_iter().flatten().collect();
        let expected = all.iter().sum::<f64>() / all.len() as f64;
        let mean = mean_residues_per_turn(&bundle).unwrap();
        assert!((mean - expected).abs() < 1e-12);
    }

    #[test]
    fn chains_without_interior_residues_give_undefined_mean() {
        let bundle = chains(200.0, &["AA", "LL"]);
        assert_eq!(mean_residues_per_turn(&bundle), Err(GeometryError::UndefinedMean));
        assert_eq!(mean_residues_per_turn(&[]), Err(GeometryError::UndefinedMean));
    }

    #[test]
    fn collinear_backbone_atoms_are_reported() {
        let residue = |z: f64| BackboneResidue {
            n: Point3::new(0.0, 0.0, z),
            ca: Point3::new(0.0, 0.0, z + 1.0),
            c: Point3::new(0.0, 0.0, z + 2.0),
            o: Point3::new(1.0, 0.0, z + 2.0),
            phase: ResiduePhase {
                helical: 0.0,
                superhelical: 0.0,
            },
        };
        let chain = BackboneChain {
            label: 'A',
            residues: vec![residue(0.0), residue(3.0), residue(6.0)],
        };
        assert_eq!(
            chain_geometry(&chain),
            Err(GeometryError::DegenerateFrame {
                chain: 'A',
                residue: 0
            })
        );
    }

    #[test]
    fn residue_frame_is_orthonormal() {
        let frame = residue_frame(
            &Point3::new(-0.5, 1.3, 0.2),
            &Point3::new(0.0, 0.0, 0.0),
            &Point3::new(1.5, 0.1, -0.3),
        )
        .unwrap();
        let identity = frame.transpose() * frame;
        assert!((identity - Matrix3::identity()).norm() < 1e-12);
        assert!((frame.determinant() - 1.0).abs() < 1e-12);
    }
}
