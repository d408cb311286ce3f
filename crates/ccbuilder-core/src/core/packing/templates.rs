use crate::core::models::residue::ResidueType;

/// Internal coordinates of one side-chain atom. The atom is bonded to
/// `references[2]`; the bond angle is `references[1]-references[2]-atom` and
/// the torsion is `references[0]-references[1]-references[2]-atom`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AtomTemplate {
    pub name: &'static str,
    pub references: [&'static str; 3],
    pub bond_length: f64,
    pub bond_angle: f64,
    pub torsion: f64,
}

const fn atom(
    name: &'static str,
    references: [&'static str; 3],
    bond_length: f64,
    bond_angle: f64,
    torsion: f64,
) -> AtomTemplate {
    AtomTemplate {
        name,
        references,
        bond_length,
        bond_angle,
        torsion,
    }
}

// Chi1 of the mt/m rotamer, the most populated one in helices.
const CHI1: f64 = -65.0;

const CB: AtomTemplate = atom("CB", ["C", "N", "CA"], 1.53, 110.5, -122.6);

const ALA: &[AtomTemplate] = &[CB];
const GLY: &[AtomTemplate] = &[];
const SER: &[AtomTemplate] = &[CB, atom("OG", ["N", "CA", "CB"], 1.42, 111.1, CHI1)];
const CYS: &[AtomTemplate] = &[CB, atom("SG", ["N", "CA", "CB"], 1.81, 113.8, CHI1)];
const THR: &[AtomTemplate] = &[
    CB,
    atom("OG1", ["N", "CA", "CB"], 1.43, 109.2, 60.0),
    atom("CG2", ["N", "CA", "CB"], 1.53, 111.1, -60.0),
];
const VAL: &[AtomTemplate] = &[
    CB,
    atom("CG1", ["N", "CA", "CB"], 1.53, 110.7, 175.0),
    atom("CG2", ["N", "CA", "CB"], 1.53, 110.4, -65.0),
];
const ILE: &[AtomTemplate] = &[
    CB,
    atom("CG1", ["N", "CA", "CB"], 1.53, 110.4, CHI1),
    atom("CG2", ["N", "CA", "CB"], 1.53, 110.5, 175.0),
    atom("CD1", ["CA", "CB", "CG1"], 1.52, 113.9, 170.0),
];
const LEU: &[AtomTemplate] = &[
    CB,
    atom("CG", ["N", "CA", "CB"], 1.53, 116.1, CHI1),
    atom("CD1", ["CA", "CB", "CG"], 1.52, 110.5, 175.0),
    atom("CD2", ["CA", "CB", "CG"], 1.52, 110.5, 65.0),
];
const PRO: &[AtomTemplate] = &[
    CB,
    atom("CG", ["N", "CA", "CB"], 1.50, 104.5, 30.0),
    atom("CD", ["CA", "CB", "CG"], 1.51, 105.5, -35.0),
];
const MET: &[AtomTemplate] = &[
    CB,
    atom("CG", ["N", "CA", "CB"], 1.52, 114.0, CHI1),
    atom("SD", ["CA", "CB", "CG"], 1.81, 112.7, 180.0),
    atom("CE", ["CB", "CG", "SD"], 1.79, 100.5, 70.0),
];
const ASP: &[AtomTemplate] = &[
    CB,
    atom("CG", ["N", "CA", "CB"], 1.52, 112.6, CHI1),
    atom("OD1", ["CA", "CB", "CG"], 1.25, 119.2, -40.0),
    atom("OD2", ["CA", "CB", "CG"], 1.25, 118.2, 140.0),
];
const ASN: &[AtomTemplate] = &[
    CB,
    atom("CG", ["N", "CA", "CB"], 1.52, 112.6, CHI1),
    atom("OD1", ["CA", "CB", "CG"], 1.23, 120.8, -40.0),
    atom("ND2", ["CA", "CB", "CG"], 1.33, 116.4, 140.0),
];
const GLU: &[AtomTemplate] = &[
    CB,
    atom("CG", ["N", "CA", "CB"], 1.52, 113.8, CHI1),
    atom("CD", ["CA", "CB", "CG"], 1.52, 112.6, 180.0),
    atom("OE1", ["CB", "CG", "CD"], 1.25, 119.0, -10.0),
    atom("OE2", ["CB", "CG", "CD"], 1.25, 118.1, 170.0),
];
const GLN: &[AtomTemplate] = &[
    CB,
    atom("CG", ["N", "CA", "CB"], 1.52, 113.8, CHI1),
    atom("CD", ["CA", "CB", "CG"], 1.52, 112.6, 180.0),
    atom("OE1", ["CB", "CG", "CD"], 1.23, 120.9, -25.0),
    atom("NE2", ["CB", "CG", "CD"], 1.33, 116.5, 155.0),
];
const LYS: &[AtomTemplate] = &[
    CB,
    atom("CG", ["N", "CA", "CB"], 1.52, 113.8, CHI1),
    atom("CD", ["CA", "CB", "CG"], 1.52, 111.8, 180.0),
    atom("CE", ["CB", "CG", "CD"], 1.52, 111.7, 180.0),
    atom("NZ", ["CG", "CD", "CE"], 1.49, 111.9, 180.0),
];
const ARG: &[AtomTemplate] = &[
    CB,
    atom("CG", ["N", "CA", "CB"], 1.52, 113.8, CHI1),
    atom("CD", ["CA", "CB", "CG"], 1.52, 111.8, 180.0),
    atom("NE", ["CB", "CG", "CD"], 1.46, 111.7, 180.0),
    atom("CZ", ["CG", "CD", "NE"], 1.33, 124.8, 180.0),
    atom("NH1", ["CD", "NE", "CZ"], 1.33, 120.6, 0.0),
    atom("NH2", ["CD", "NE", "CZ"], 1.33, 119.9, 180.0),
];
const PHE: &[AtomTemplate] = &[
    CB,
    atom("CG", ["N", "CA", "CB"], 1.50, 113.8, CHI1),
    atom("CD1", ["CA", "CB", "CG"], 1.39, 120.7, 90.0),
    atom("CD2", ["CA", "CB", "CG"], 1.39, 120.7, -90.0),
    atom("CE1", ["CB", "CG", "CD1"], 1.39, 120.7, 180.0),
    atom("CE2", ["CB", "CG", "CD2"], 1.39, 120.7, 180.0),
    atom("CZ", ["CG", "CD1", "CE1"], 1.39, 120.0, 0.0),
];
const TYR: &[AtomTemplate] = &[
    CB,
    atom("CG", ["N", "CA", "CB"], 1.51, 113.8, CHI1),
    atom("CD1", ["CA", "CB", "CG"], 1.39, 120.8, 90.0),
    atom("CD2", ["CA", "CB", "CG"], 1.39, 120.8, -90.0),
    atom("CE1", ["CB", "CG", "CD1"], 1.39, 121.2, 180.0),
    atom("CE2", ["CB", "CG", "CD2"], 1.39, 121.2, 180.0),
    atom("CZ", ["CG", "CD1", "CE1"], 1.39, 119.6, 0.0),
    atom("OH", ["CD1", "CE1", "CZ"], 1.38, 119.9, 180.0),
];
const TRP: &[AtomTemplate] = &[
    CB,
    atom("CG", ["N", "CA", "CB"], 1.50, 114.1, CHI1),
    atom("CD1", ["CA", "CB", "CG"], 1.37, 127.1, 90.0),
    atom("CD2", ["CA", "CB", "CG"], 1.43, 126.6, -90.0),
    atom("NE1", ["CB", "CG", "CD1"], 1.38, 110.2, 180.0),
    atom("CE2", ["CB", "CG", "CD2"], 1.40, 107.2, 180.0),
    atom("CE3", ["CB", "CG", "CD2"], 1.40, 133.9, 0.0),
    atom("CZ2", ["CG", "CD2", "CE2"], 1.40, 122.4, 180.0),
    atom("CZ3", ["CG", "CD2", "CE3"], 1.39, 118.7, 180.0),
    atom("CH2", ["CD2", "CE2", "CZ2"], 1.37, 117.5, 0.0),
];
const HIS: &[AtomTemplate] = &[
    CB,
    atom("CG", ["N", "CA", "CB"], 1.50, 113.7, CHI1),
    atom("ND1", ["CA", "CB", "CG"], 1.38, 122.7, -75.0),
    atom("CD2", ["CA", "CB", "CG"], 1.36, 131.0, 105.0),
    atom("CE1", ["CB", "CG", "ND1"], 1.32, 109.0, 180.0),
    atom("NE2", ["CB", "CG", "CD2"], 1.37, 107.0, 180.0),
];

/// Side-chain atoms of a residue type, in placement order. Every atom only
/// references backbone atoms or atoms earlier in the list.
pub fn side_chain_template(residue_type: ResidueType) -> &'static [AtomTemplate] {
    match residue_type {
        ResidueType::Alanine => ALA,
        ResidueType::Glycine => GLY,
        ResidueType::Isoleucine => ILE,
        ResidueType::Leucine => LEU,
        ResidueType::Proline => PRO,
        ResidueType::Valine => VAL,
        ResidueType::Phenylalanine => PHE,
        ResidueType::Tryptophan => TRP,
        ResidueType::Tyrosine => TYR,
        ResidueType::Asparagine => ASN,
        ResidueType::Cysteine => CYS,
        ResidueType::Glutamine => GLN,
        ResidueType::Serine => SER,
        ResidueType::Threonine => THR,
        ResidueType::Methionine => MET,
        ResidueType::Arginine => ARG,
        ResidueType::Lysine => LYS,
        ResidueType::AsparticAcid => ASP,
        ResidueType::GlutamicAcid => GLU,
        ResidueType::Histidine => HIS,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL_CODES: &str = "AGILPVFWYNCQSTMRKDEH";
    const BACKBONE: [&str; 4] = ["N", "CA", "C", "O"];

    #[test]
    fn every_template_references_only_already_placed_atoms() {
        for code in ALL_CODES.chars() {
            let residue_type = ResidueType::from_one_letter(code).unwrap();
            let mut placed: Vec<&str> = BACKBONE.to_vec();
            for template in side_chain_template(residue_type) {
                for reference in template.references {
                    assert!(
                        placed.contains(&reference),
                        "{residue_type}: {} references unplaced {reference}",
                        template.name
                    );
                }
                assert!(!placed.contains(&template.name), "{residue_type}: duplicate {}", template.name);
                placed.push(template.name);
            }
        }
    }

    #[test]
    fn heavy_atom_counts_match_the_standard_residues() {
        let expected = [
            (ResidueType::Glycine, 0),
            (ResidueType::Alanine, 1),
            (ResidueType::Serine, 2),
            (ResidueType::Leucine, 4),
            (ResidueType::Lysine, 5),
            (ResidueType::Arginine, 7),
            (ResidueType::Phenylalanine, 7),
            (ResidueType::Tyrosine, 8),
            (ResidueType::Tryptophan, 10),
            (ResidueType::Histidine, 6),
        ];
        for (residue_type, count) in expected {
            assert_eq!(side_chain_template(residue_type).len(), count, "{residue_type}");
        }
    }

    #[test]
    fn every_non_glycine_side_chain_starts_at_cb() {
        for code in ALL_CODES.chars().filter(|&c| c != 'G') {
            let residue_type = ResidueType::from_one_letter(code).unwrap();
            assert_eq!(side_chain_template(residue_type)[0], CB);
        }
    }
}
