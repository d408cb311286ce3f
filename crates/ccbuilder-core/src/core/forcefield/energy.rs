use super::potentials;
use crate::core::models::atom::{Atom, CachedVdwParam};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum EnergyCalculationError {
    #[error("Atom '{0}' is not parameterized for VDW calculation")]
    UnparameterizedAtom(String),
}

pub struct EnergyCalculator;

impl EnergyCalculator {
    fn vdw_params(atom: &Atom) -> Result<(f64, f64, f64), EnergyCalculationError> {
        match atom.vdw_param {
            CachedVdwParam::LennardJones { radius, well_depth } => Ok((radius, well_depth, 0.0)),
            CachedVdwParam::Buckingham {
                radius,
                well_depth,
                scale,
            } => Ok((radius, well_depth, scale)),
            CachedVdwParam::None => Err(EnergyCalculationError::UnparameterizedAtom(
                atom.name.clone(),
            )),
        }
    }

    /// Van der Waals energy with arithmetic-mean radius and geometric-mean
    /// well depth. Buckingham is used when the combined scale is positive.
    pub fn calculate_vdw(atom1: &Atom, atom2: &Atom, dist: f64) -> Result<f64, EnergyCalculationError> {
        let (r_min1, well_depth1, scale1) = Self::vdw_params(atom1)?;
        let (r_min2, well_depth2, scale2) = Self::vdw_params(atom2)?;

        let r_min_combined = (r_min1 + r_min2) / 2.0;
        let well_depth_combined = (well_depth1 * well_depth2).sqrt();
        let scale_combined = (scale1 + scale2) / 2.0;

        let energy = if scale_combined > 0.0 {
            potentials::buckingham_exp_6(dist, r_min_combined, well_depth_combined, scale_combined)
        } else {
            potentials::lennard_jones_12_6(dist, r_min_combined, well_depth_combined)
        };
        Ok(energy)
    }

    pub fn calculate_coulomb(atom1: &Atom, atom2: &Atom, dist: f64, dielectric: f64) -> f64 {
        potentials::coulomb(dist, atom1.partial_charge, atom2.partial_charge, dielectric)
    }
}

#[cfg(test)]
mod energy_calculator_tests {
    use super::*;
    use crate::core::models::ids::ResidueId;
    use nalgebra::Point3;

    fn atom_with_params(vdw_param: CachedVdwParam, charge: f64) -> Atom {
        let mut atom = Atom::new("CX", ResidueId::default(), Point3::origin());
        atom.partial_charge = charge;
        atom.vdw_param = vdw_param;
        atom
    }

    fn lj(radius: f64, well_depth: f64) -> CachedVdwParam {
        CachedVdwParam::LennardJones { radius, well_depth }
    }

    #[test]
    fn vdw_uses_combined_radius_and_well_depth() {
        let a = atom_with_params(lj(3.0, 0.1), 0.0);
        let b = atom_with_params(lj(4.0, 0.4), 0.0);
        // r_min = 3.5, well depth = sqrt(0.04) = 0.2
        let energy = EnergyCalculator::calculate_vdw(&a, &b, 3.5).unwrap();
        assert!((energy + 0.2).abs() < 1e-12);
    }

    #[test]
    fn vdw_switches_to_buckingham_when_a_scale_is_present() {
        let a = atom_with_params(
            CachedVdwParam::Buckingham {
                radius: 4.0,
                well_depth: 0.1,
                scale: 12.0,
            },
            0.0,
        );
        let energy = EnergyCalculator::calculate_vdw(&a, &a, 4.0).unwrap();
        assert!((energy + 0.1).abs() < 1e-12);
    }

    #[test]
    fn vdw_fails_for_unparameterized_atom() {
        let a = atom_with_params(lj(3.0, 0.1), 0.0);
        let b = atom_with_params(CachedVdwParam::None, 0.0);
        assert_eq!(
            EnergyCalculator::calculate_vdw(&a, &b, 3.0),
            Err(EnergyCalculationError::UnparameterizedAtom("CX".to_string()))
        );
    }

    #[test]
    fn coulomb_uses_partial_charges_and_dielectric() {
        let a = atom_with_params(CachedVdwParam::None, 1.0);
        let b = atom_with_params(CachedVdwParam::None, -0.5);
        let energy = EnergyCalculator::calculate_coulomb(&a, &b, 2.0, 2.0);
        assert!((energy - potentials::COULOMB_CONSTANT * -0.5 / 4.0).abs() < 1e-9);
    }
}
