use super::params::{Forcefield, VdwParam};
use crate::core::models::atom::{Atom, CachedVdwParam};
use crate::core::models::ids::AtomId;
use crate::core::models::system::MolecularSystem;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParameterizationError {
    #[error(
        "Missing VDW parameter for force field type: '{ff_type}' in atom '{atom_name}' of residue {residue_name}"
    )]
    MissingVdwParams {
        ff_type: String,
        atom_name: String,
        residue_name: String,
    },
    #[error("Atom {0:?} does not belong to a residue of the system")]
    OrphanAtom(AtomId),
}

/// Assigns forcefield type, van der Waals parameters and partial charge to
/// every atom of a system. The forcefield type of an atom is its element
/// symbol.
pub struct Parameterizer<'a> {
    forcefield: &'a Forcefield,
}

impl<'a> Parameterizer<'a> {
    pub fn new(forcefield: &'a Forcefield) -> Self {
        Self { forcefield }
    }

    pub fn parameterize_system(
        &self,
        system: &mut MolecularSystem,
    ) -> Result<(), ParameterizationError> {
        let mut work = Vec::with_capacity(system.atom_count());
        for atom_id in system.ordered_atom_ids() {
            let residue_name = system
                .atom(atom_id)
                .and_then(|atom| system.residue(atom.residue_id))
                .map(|residue| residue.name())
                .ok_or(ParameterizationError::OrphanAtom(atom_id))?;
            work.push((atom_id, residue_name));
        }

        for (atom_id, residue_name) in work {
            let atom = system
                .atom_mut(atom_id)
                .ok_or(ParameterizationError::OrphanAtom(atom_id))?;
            self.assign_physicochemical_params(atom, residue_name)?;
        }

        debug!(atoms = system.atom_count(), "Parameterized system.");
        Ok(())
    }

    fn assign_physicochemical_params(
        &self,
        atom: &mut Atom,
        residue_name: &str,
    ) -> Result<(), ParameterizationError> {
        atom.force_field_type = atom.element.symbol().to_string();

        let vdw_param = self
            .forcefield
            .non_bonded
            .vdw
            .get(&atom.force_field_type)
            .ok_or_else(|| ParameterizationError::MissingVdwParams {
                ff_type: atom.force_field_type.clone(),
                atom_name: atom.name.clone(),
                residue_name: residue_name.to_string(),
            })?;

        atom.vdw_param = match vdw_param {
            VdwParam::LennardJones { radius, well_depth } => CachedVdwParam::LennardJones {
                radius: *radius,
                well_depth: *well_depth,
            },
            VdwParam::Buckingham {
                radius,
                well_depth,
                scale,
            } => CachedVdwParam::Buckingham {
                radius: *radius,
                well_depth: *well_depth,
                scale: *scale,
            },
        };
        atom.partial_charge = self.forcefield.charge_for(residue_name, &atom.name);
        Ok(())
    }
}
