use super::energy::{EnergyCalculationError, EnergyCalculator};
use super::params::Forcefield;
use super::term::EnergyTerm;
use crate::core::models::atom::Atom;
use crate::core::models::ids::{AtomId, ChainId};
use crate::core::models::system::MolecularSystem;
use kiddo::{KdTree, SquaredEuclidean};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, instrument};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Atoms per work unit of the pair loop. Fixed so the partial sums, and
/// therefore the total, do not depend on the number of threads.
const ATOM_CHUNK_SIZE: usize = 256;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ScoringError {
    #[error("Atom with ID {0:?} not found in the system")]
    AtomNotFound(AtomId),
    #[error("Force field type not parameterized for atom '{0}'")]
    ForceFieldTypeMissing(String),
}

impl From<EnergyCalculationError> for ScoringError {
    fn from(error: EnergyCalculationError) -> Self {
        match error {
            EnergyCalculationError::UnparameterizedAtom(name) => Self::ForceFieldTypeMissing(name),
        }
    }
}

/// An interaction energy between two atoms as a function of their distance.
pub trait PairPotential: Send + Sync {
    fn terms(&self, a: &Atom, b: &Atom, distance: f64) -> Result<EnergyTerm, ScoringError>;

    fn energy(&self, a: &Atom, b: &Atom, distance: f64) -> Result<f64, ScoringError> {
        Ok(self.terms(a, b, distance)?.total())
    }
}

/// Van der Waals plus Coulomb with a constant dielectric.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NonBondedPotential {
    dielectric: f64,
}

impl NonBondedPotential {
    pub fn new(dielectric: f64) -> Self {
        Self { dielectric }
    }

    pub fn from_forcefield(forcefield: &Forcefield) -> Self {
        Self::new(forcefield.non_bonded.globals.dielectric_constant)
    }
}

impl PairPotential for NonBondedPotential {
    fn terms(&self, a: &Atom, b: &Atom, distance: f64) -> Result<EnergyTerm, ScoringError> {
        let vdw = EnergyCalculator::calculate_vdw(a, b, distance)?;
        let coulomb = EnergyCalculator::calculate_coulomb(a, b, distance, self.dielectric);
        Ok(EnergyTerm::new(vdw, coulomb))
    }
}

/// Which atom pairs are scored.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoringConfig {
    /// Pairs farther apart than this (Angstroms) are ignored.
    pub cutoff: f64,
    /// Pairs in the same chain whose residue numbers differ by at most this
    /// are ignored. Pairs in the same residue are always ignored.
    pub adjacent_residue_exclusion: usize,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            cutoff: 10.0,
            adjacent_residue_exclusion: 1,
        }
    }
}

struct ScoredAtom<'s> {
    atom: &'s Atom,
    chain_id: ChainId,
    residue_number: isize,
}

pub struct Scorer<'a, P: PairPotential> {
    system: &'a MolecularSystem,
    potential: &'a P,
    config: ScoringConfig,
}

impl<'a, P: PairPotential> Scorer<'a, P> {
    pub fn new(system: &'a MolecularSystem, potential: &'a P, config: ScoringConfig) -> Self {
        Self {
            system,
            potential,
            config,
        }
    }

    /// Sums the pair potential over every non-excluded atom pair within the
    /// cutoff.
    ///
    /// Atoms are indexed in chain, residue, atom order. Each atom `i` scores
    /// its neighbours `j > i` in ascending order, and per-chunk partial sums
    /// are added in chunk order, so the result is reproducible with or
    /// without the `parallel` feature.
    #[instrument(skip_all, name = "energy_scoring")]
    pub fn total_energy(&self) -> Result<EnergyTerm, ScoringError> {
        let atoms = self.collect_atoms()?;
        if atoms.len() < 2 {
            return Ok(EnergyTerm::default());
        }

        let positions: Vec<[f64; 3]> = atoms
            .iter()
            .map(|a| [a.atom.position.x, a.atom.position.y, a.atom.position.z])
            .collect();
        let kdtree: KdTree<f64, 3> = (&positions).into();
        let indices: Vec<usize> = (0..atoms.len()).collect();

        #[cfg(not(feature = "parallel"))]
        let chunks = indices.chunks(ATOM_CHUNK_SIZE);

        #[cfg(feature = "parallel")]
        let chunks = indices.par_chunks(ATOM_CHUNK_SIZE);

        let partials: Vec<Result<EnergyTerm, ScoringError>> = chunks
            .map(|chunk| self.score_chunk(chunk, &atoms, &positions, &kdtree))
            .collect();

        let mut total = EnergyTerm::default();
        for partial in partials {
            total += partial?;
        }

        debug!(
            atoms = atoms.len(),
            vdw = total.vdw,
            coulomb = total.coulomb,
            "Scored bundle."
        );
        Ok(total)
    }

    fn collect_atoms(&self) -> Result<Vec<ScoredAtom<'a>>, ScoringError> {
        let system = self.system;
        system
            .ordered_atom_ids()
            .into_iter()
            .map(|atom_id| {
                let atom = system
                    .atom(atom_id)
                    .ok_or(ScoringError::AtomNotFound(atom_id))?;
                let residue = system
                    .residue(atom.residue_id)
                    .ok_or(ScoringError::AtomNotFound(atom_id))?;
                Ok(ScoredAtom {
                    atom,
                    chain_id: residue.chain_id,
                    residue_number: residue.number,
                })
            })
            .collect()
    }

    fn score_chunk(
        &self,
        chunk: &[usize],
        atoms: &[ScoredAtom<'a>],
        positions: &[[f64; 3]],
        kdtree: &KdTree<f64, 3>,
    ) -> Result<EnergyTerm, ScoringError> {
        let cutoff_sq = self.config.cutoff * self.config.cutoff;
        let mut sum = EnergyTerm::default();

        for &i in chunk {
            let mut neighbours: Vec<usize> = kdtree
                .within_unsorted::<SquaredEuclidean>(&positions[i], cutoff_sq)
                .into_iter()
                .map(|neighbour| neighbour.item as usize)
                .filter(|&j| j > i)
                .collect();
            neighbours.sort_unstable();

            for j in neighbours {
                if self.is_excluded(&atoms[i], &atoms[j]) {
                    continue;
                }
                let distance = (atoms[i].atom.position - atoms[j].atom.position).norm();
                sum += self.potential.terms(atoms[i].atom, atoms[j].atom, distance)?;
            }
        }
        Ok(sum)
    }

    fn is_excluded(&self, a: &ScoredAtom, b: &ScoredAtom) -> bool {
        if a.atom.residue_id == b.atom.residue_id {
            return true;
        }
        a.chain_id == b.chain_id
            && a.residue_number.abs_diff(b.residue_number) <= self.config.adjacent_residue_exclusion
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::forcefield::parameterization::Parameterizer;
    use crate::core::forcefield::potentials::{COULOMB_CONSTANT, lennard_jones_12_6};
    use crate::core::models::atom::CachedVdwParam;
    use crate::core::models::residue::ResidueType;
    use nalgebra::Point3;

    fn add_atom(
        system: &mut MolecularSystem,
        chain: char,
        number: isize,
        name: &str,
        position: [f64; 3],
    ) -> AtomId {
        let chain_id = system.add_chain(chain);
        let residue_id = system
            .add_residue(chain_id, number, ResidueType::Lysine)
            .unwrap();
        let atom = Atom::new(
            name,
            residue_id,
            Point3::new(position[0], position[1], position[2]),
        );
        system.add_atom_to_residue(residue_id, atom).unwrap()
    }

    fn parameterized(mut system: MolecularSystem) -> MolecularSystem {
        Parameterizer::new(&Forcefield::builtin())
            .parameterize_system(&mut system)
            .unwrap();
        system
    }

    fn score(system: &MolecularSystem, config: ScoringConfig) -> EnergyTerm {
        let potential = NonBondedPotential::new(1.0);
        Scorer::new(system, &potential, config)
            .total_energy()
            .unwrap()
    }

    #[test]
    fn scores_a_single_inter_chain_pair() {
        let mut system = MolecularSystem::new();
        add_atom(&mut system, 'A', 1, "NZ", [0.0, 0.0, 0.0]);
        add_atom(&mut system, 'B', 1, "NZ", [4.0, 0.0, 0.0]);
        let system = parameterized(system);

        let energy = score(&system, ScoringConfig::default());
        let expected_vdw = lennard_jones_12_6(4.0, 3.6621, 0.0774);
        assert!((energy.vdw - expected_vdw).abs() < 1e-12);
        assert!((energy.coulomb - COULOMB_CONSTANT / 4.0).abs() < 1e-9);
    }

    #[test]
    fn ignores_interactions_within_the_same_residue() {
        let mut system = MolecularSystem::new();
        add_atom(&mut system, 'A', 1, "CA", [0.0, 0.0, 0.0]);
        add_atom(&mut system, 'A', 1, "CB", [1.5, 0.0, 0.0]);
        let system = parameterized(system);
        assert_eq!(score(&system, ScoringConfig::default()), EnergyTerm::default());
    }

    #[test]
    fn adjacent_residue_exclusion_is_configurable() {
        let mut system = MolecularSystem::new();
        add_atom(&mut system, 'A', 1, "CA", [0.0, 0.0, 0.0]);
        add_atom(&mut system, 'A', 2, "CA", [3.8, 0.0, 0.0]);
        add_atom(&mut system, 'A', 3, "CA", [7.6, 0.0, 0.0]);
        let system = parameterized(system);

        let only_adjacent = ScoringConfig {
            adjacent_residue_exclusion: 1,
            ..ScoringConfig::default()
        };
        let expected = lennard_jones_12_6(7.6, 3.8983, 0.0951);
        assert!((score(&system, only_adjacent).vdw - expected).abs() < 1e-12);

        let none_excluded = ScoringConfig {
            adjacent_residue_exclusion: 0,
            ..ScoringConfig::default()
        };
        let expected = 2.0 * lennard_jones_12_6(3.8, 3.8983, 0.0951) + expected;
        assert!((score(&system, none_excluded).vdw - expected).abs() < 1e-12);

        let wide = ScoringConfig {
            adjacent_residue_exclusion: 2,
            ..ScoringConfig::default()
        };
        assert_eq!(score(&system, wide), EnergyTerm::default());
    }

    #[test]
    fn same_residue_numbers_in_different_chains_are_scored() {
        let mut system = MolecularSystem::new();
        add_atom(&mut system, 'A', 5, "CA", [0.0, 0.0, 0.0]);
        add_atom(&mut system, 'B', 5, "CA", [5.0, 0.0, 0.0]);
        let system = parameterized(system);
        assert!(score(&system, ScoringConfig::default()).vdw != 0.0);
    }

    #[test]
    fn pairs_beyond_the_cutoff_are_ignored() {
        let mut system = MolecularSystem::new();
        add_atom(&mut system, 'A', 1, "CA", [0.0, 0.0, 0.0]);
        add_atom(&mut system, 'B', 1, "CA", [12.0, 0.0, 0.0]);
        let system = parameterized(system);
        assert_eq!(score(&system, ScoringConfig::default()), EnergyTerm::default());

        let long = ScoringConfig {
            cutoff: 15.0,
            ..ScoringConfig::default()
        };
        assert!(score(&system, long).vdw != 0.0);
    }

    #[test]
    fn unparameterized_atoms_are_reported() {
        let mut system = MolecularSystem::new();
        add_atom(&mut system, 'A', 1, "CA", [0.0, 0.0, 0.0]);
        let b = add_atom(&mut system, 'B', 1, "CA", [4.0, 0.0, 0.0]);
        let mut system = parameterized(system);
        system.atom_mut(b).unwrap().vdw_param = CachedVdwParam::None;

        let potential = NonBondedPotential::new(1.0);
        let result = Scorer::new(&system, &potential, ScoringConfig::default()).total_energy();
        assert_eq!(result, Err(ScoringError::ForceFieldTypeMissing("CA".to_string())));
    }

    #[test]
    fn chunked_sum_matches_a_sequential_pair_loop() {
        let mut system = MolecularSystem::new();
        let mut positions = Vec::new();
        for chain in ['A', 'B', 'C'] {
            for number in 1..=120 {
                let t = number as f64 * 0.9 + chain as u8 as f64;
                let position = [t.cos() * 6.0, t.sin() * 6.0, number as f64 * 1.1];
                add_atom(&mut system, chain, number, "CA", position);
                positions.push(position);
            }
        }
        let system = parameterized(system);
        let config = ScoringConfig::default();

        let mut expected = EnergyTerm::default();
        let ids = system.ordered_atom_ids();
        for i in 0..ids.len() {
            for j in (i + 1)..ids.len() {
                let a = system.atom(ids[i]).unwrap();
                let b = system.atom(ids[j]).unwrap();
                let ra = system.residue(a.residue_id).unwrap();
                let rb = system.residue(b.residue_id).unwrap();
                if ra.chain_id == rb.chain_id && ra.number.abs_diff(rb.number) <= 1 {
                    continue;
                }
                let distance = (a.position - b.position).norm();
                if distance <= config.cutoff {
                    expected.vdw += lennard_jones_12_6(distance, 3.8983, 0.0951);
                }
            }
        }

        let energy = score(&system, config);
        assert!(ids.len() > ATOM_CHUNK_SIZE);
        assert!((energy.vdw - expected.vdw).abs() <= 1e-9 * expected.vdw.abs().max(1.0));
        assert_eq!(energy, score(&system, config));
    }

    #[test]
    fn empty_system_scores_zero() {
        let system = MolecularSystem::new();
        assert_eq!(score(&system, ScoringConfig::default()), EnergyTerm::default());
    }

    #[test]
    fn pair_potential_energy_is_the_total_of_its_terms() {
        let mut system = MolecularSystem::new();
        let a = add_atom(&mut system, 'A', 1, "NZ", [0.0, 0.0, 0.0]);
        let b = add_atom(&mut system, 'B', 1, "NZ", [4.0, 0.0, 0.0]);
        let system = parameterized(system);
        let potential = NonBondedPotential::new(4.0);
        let (a, b) = (system.atom(a).unwrap(), system.atom(b).unwrap());
        let terms = potential.terms(a, b, 4.0).unwrap();
        assert_eq!(potential.energy(a, b, 4.0).unwrap(), terms.total());
    }
}
