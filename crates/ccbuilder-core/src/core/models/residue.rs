use super::ids::{AtomId, ChainId};
use phf::phf_map;
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// The twenty standard amino acids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ResidueType {
    // --- Aliphatic, Nonpolar ---
    Alanine,
    Glycine,
    Isoleucine,
    Leucine,
    Proline,
    Valine,

    // --- Aromatic ---
    Phenylalanine,
    Tryptophan,
    Tyrosine,

    // --- Polar, Uncharged ---
    Asparagine,
    Cysteine,
    Glutamine,
    Serine,
    Threonine,
    Methionine,

    // --- Charged ---
    Arginine,
    Lysine,
    AsparticAcid,
    GlutamicAcid,
    Histidine,
}

static ONE_LETTER_CODES: phf::Map<char, ResidueType> = phf_map! {
    'A' => ResidueType::Alanine,
    'G' => ResidueType::Glycine,
    'I' => ResidueType::Isoleucine,
    'L' => ResidueType::Leucine,
    'P' => ResidueType::Proline,
    'V' => ResidueType::Valine,
    'F' => ResidueType::Phenylalanine,
    'W' => ResidueType::Tryptophan,
    'Y' => ResidueType::Tyrosine,
    'N' => ResidueType::Asparagine,
    'C' => ResidueType::Cysteine,
    'Q' => ResidueType::Glutamine,
    'S' => ResidueType::Serine,
    'T' => ResidueType::Threonine,
    'M' => ResidueType::Methionine,
    'R' => ResidueType::Arginine,
    'K' => ResidueType::Lysine,
    'D' => ResidueType::AsparticAcid,
    'E' => ResidueType::GlutamicAcid,
    'H' => ResidueType::Histidine,
};

impl ResidueType {
    /// Looks up a one-letter code, case-insensitively.
    pub fn from_one_letter(code: char) -> Option<Self> {
        ONE_LETTER_CODES
            .get(&code.to_ascii_uppercase())
            .copied()
    }

    pub fn to_one_letter(&self) -> char {
        match self {
            Self::Alanine => 'A',
            Self::Glycine => 'G',
            Self::Isoleucine => 'I',
            Self::Leucine => 'L',
            Self::Proline => 'P',
            Self::Valine => 'V',
            Self::Phenylalanine => 'F',
            Self::Tryptophan => 'W',
            Self::Tyrosine => 'Y',
            Self::Asparagine => 'N',
            Self::Cysteine => 'C',
            Self::Glutamine => 'Q',
            Self::Serine => 'S',
            Self::Threonine => 'T',
            Self::Methionine => 'M',
            Self::Arginine => 'R',
            Self::Lysine => 'K',
            Self::AsparticAcid => 'D',
            Self::GlutamicAcid => 'E',
            Self::Histidine => 'H',
        }
    }

    pub fn to_three_letter(&self) -> &'static str {
        match self {
            Self::Alanine => "ALA",
            Self::Glycine => "GLY",
            Self::Isoleucine => "ILE",
            Self::Leucine => "LEU",
            Self::Proline => "PRO",
            Self::Valine => "VAL",
            Self::Phenylalanine => "PHE",
            Self::Tryptophan => "TRP",
            Self::Tyrosine => "TYR",
            Self::Asparagine => "ASN",
            Self::Cysteine => "CYS",
            Self::Glutamine => "GLN",
            Self::Serine => "SER",
            Self::Threonine => "THR",
            Self::Methionine => "MET",
            Self::Arginine => "ARG",
            Self::Lysine => "LYS",
            Self::AsparticAcid => "ASP",
            Self::GlutamicAcid => "GLU",
            Self::Histidine => "HIS",
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("Unknown residue name: '{0}'")]
pub struct ParseResidueTypeError(pub String);

impl FromStr for ResidueType {
    type Err = ParseResidueTypeError;

    /// Parses a three-letter residue name (case-insensitive). `HSE`, `HSD` and
    /// `HSP` are accepted as histidine.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let residue_type = match s.trim().to_ascii_uppercase().as_str() {
            "ALA" => Self::Alanine,
            "GLY" => Self::Glycine,
            "ILE" => Self::Isoleucine,
            "LEU" => Self::Leucine,
            "PRO" => Self::Proline,
            "VAL" => Self::Valine,
            "PHE" => Self::Phenylalanine,
            "TRP" => Self::Tryptophan,
            "TYR" => Self::Tyrosine,
            "ASN" => Self::Asparagine,
            "CYS" => Self::Cysteine,
            "GLN" => Self::Glutamine,
            "SER" => Self::Serine,
            "THR" => Self::Threonine,
            "MET" => Self::Methionine,
            "ARG" => Self::Arginine,
            "LYS" => Self::Lysine,
            "ASP" => Self::AsparticAcid,
            "GLU" => Self::GlutamicAcid,
            "HIS" | "HSE" | "HSD" | "HSP" => Self::Histidine,
            _ => return Err(ParseResidueTypeError(s.to_string())),
        };
        Ok(residue_type)
    }
}

impl fmt::Display for ResidueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.to_three_letter())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Residue {
    pub number: isize,                      // Residue sequence number, 1-based within its chain
    pub residue_type: ResidueType,          // Amino-acid identity
    pub chain_id: ChainId,                  // ID of the parent chain
    pub(crate) atoms: Vec<AtomId>,          // Atoms in placement order
    atom_name_map: HashMap<String, AtomId>, // Map from atom name to its stable ID
}

impl Residue {
    pub(crate) fn new(number: isize, residue_type: ResidueType, chain_id: ChainId) -> Self {
        Self {
            number,
            residue_type,
            chain_id,
            atoms: Vec::new(),
            atom_name_map: HashMap::new(),
        }
    }

    pub(crate) fn add_atom(&mut self, atom_name: &str, atom_id: AtomId) {
        self.atoms.push(atom_id);
        self.atom_name_map.insert(atom_name.to_string(), atom_id);
    }

    pub fn name(&self) -> &'static str {
        self.residue_type.to_three_letter()
    }

    pub fn atoms(&self) -> &[AtomId] {
        &self.atoms
    }

    pub fn get_atom_id_by_name(&self, name: &str) -> Option<AtomId> {
        self.atom_name_map.get(name).copied()
    }
}
