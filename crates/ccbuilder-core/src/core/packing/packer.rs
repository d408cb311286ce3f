use super::templates::side_chain_template;
use crate::core::coiled_coil::backbone::BackboneChain;
use crate::core::models::atom::{Atom, AtomRole};
use crate::core::models::ids::ResidueId;
use crate::core::models::residue::ResidueType;
use crate::core::models::system::MolecularSystem;
use crate::core::parameters::ParameterError;
use crate::core::utils::geometry::place_atom;
use nalgebra::Point3;
use thiserror::Error;
use tracing::{debug, instrument};

#[derive(Debug, Error, Clone, PartialEq)]
pub enum PackingError {
    #[error(transparent)]
    InvalidParameter(#[from] ParameterError),

    #[error("Cannot place atom {atom} of residue {residue} in chain {chain}: reference atoms are collinear")]
    DegenerateGeometry {
        chain: char,
        residue: isize,
        atom: &'static str,
    },

    #[error("Internal logic error: {0}")]
    Internal(String),
}

/// Builds the full-atom bundle: backbone atoms from `chains` and side chains
/// for `sequences`, one sequence per chain in the same order.
///
/// Residues are numbered from 1 within each chain. Backbone atoms are tagged
/// [`AtomRole::Backbone`] and placed side-chain atoms [`AtomRole::Sidechain`].
#[instrument(skip_all, name = "sequence_packing")]
pub fn pack_sequences<S: AsRef<str>>(
    chains: &[BackboneChain],
    sequences: &[S],
) -> Result<MolecularSystem, PackingError> {
    if chains.len() != sequences.len() {
        return Err(ParameterError::ChainCountMismatch {
            expected: chains.len(),
            found: sequences.len(),
        }
        .into());
    }

    let mut system = MolecularSystem::new();
    for (index, (chain, sequence)) in chains.iter().zip(sequences).enumerate() {
        let residue_types = parse_sequence(sequence.as_ref())?;
        if residue_types.len() != chain.len() {
            return Err(ParameterError::SequenceLengthMismatch {
                chain: index,
                sequence: residue_types.len(),
                residues: chain.len(),
            }
            .into());
        }
        pack_chain(&mut system, chain, &residue_types)?;
    }

    debug!(
        chains = system.chain_count(),
        residues = system.residue_count(),
        atoms = system.atom_count(),
        "Packed side chains onto backbone."
    );
    Ok(system)
}

fn parse_sequence(sequence: &str) -> Result<Vec<ResidueType>, ParameterError> {
    sequence
        .chars()
        .enumerate()
        .map(|(position, code)| {
            ResidueType::from_one_letter(code).ok_or(ParameterError::UnknownResidue { code, position })
        })
        .collect()
}

fn pack_chain(
    system: &mut MolecularSystem,
    chain: &BackboneChain,
    residue_types: &[ResidueType],
) -> Result<(), PackingError> {
    let chain_id = system.add_chain(chain.label);

    for (index, (backbone, &residue_type)) in chain.residues.iter().zip(residue_types).enumerate() {
        let number = index as isize + 1;
        let residue_id = system
            .add_residue(chain_id, number, residue_type)
            .ok_or_else(|| PackingError::Internal(format!("chain {} vanished", chain.label)))?;

        let mut placed: Vec<(&'static str, Point3<f64>)> = Vec::with_capacity(16);
        for (name, position) in backbone.atoms() {
            add_atom(system, residue_id, name, position, AtomRole::Backbone)?;
            placed.push((name, position));
        }

        for template in side_chain_template(residue_type) {
            let [a, b, c] = template.references.map(|name| lookup(&placed, name));
            let position = match (a, b, c) {
                (Some(a), Some(b), Some(c)) => place_atom(
                    &a,
                    &b,
                    &c,
                    template.bond_length,
                    template.bond_angle,
                    template.torsion,
                ),
                _ => {
                    return Err(PackingError::Internal(format!(
                        "template for {residue_type} places {} before its references",
                        template.name
                    )));
                }
            }
            .ok_or(PackingError::DegenerateGeometry {
                chain: chain.label,
                residue: number,
                atom: template.name,
            })?;

            add_atom(system, residue_id, template.name, position, AtomRole::Sidechain)?;
            placed.push((template.name, position));
        }
    }
    Ok(())
}

fn lookup(placed: &[(&'static str, Point3<f64>)], name: &str) -> Option<Point3<f64>> {
    placed
        .iter()
        .find(|(placed_name, _)| *placed_name == name)
        .map(|(_, position)| *position)
}

fn add_atom(
    system: &mut MolecularSystem,
    residue_id: ResidueId,
    name: &str,
    position: Point3<f64>,
    role: AtomRole,
) -> Result<(), PackingError> {
    let atom = Atom::new(name, residue_id, position).with_role(role);
    system
        .add_atom_to_residue(residue_id, atom)
        .map(|_| ())
        .ok_or_else(|| PackingError::Internal(format!("residue for atom {name} vanished")))
}
