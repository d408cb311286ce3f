use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(untagged)]
pub enum VdwParam {
    Buckingham {
        radius: f64,
        well_depth: f64,
        scale: f64,
    },
    LennardJones {
        radius: f64,
        well_depth: f64,
    },
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct GlobalParams {
    pub dielectric_constant: f64,
}

/// Non-bonded parameters keyed by forcefield atom type.
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct NonBondedParams {
    pub globals: GlobalParams,
    pub vdw: HashMap<String, VdwParam>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ChargeParam {
    pub res_type: String,
    pub atom_name: String,
    pub charge: f64,
}

#[derive(Debug, Clone)]
pub struct Forcefield {
    pub non_bonded: NonBondedParams,
    /// Partial charges keyed by (three-letter residue name, atom name).
    /// Atoms without an entry are neutral.
    pub charges: HashMap<(String, String), f64>,
}

#[derive(Debug, Error)]
pub enum ParamLoadError {
    #[error("File I/O error for '{path}': {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("CSV parsing error for '{path}': {source}")]
    Csv { path: String, source: csv::Error },
    #[error("TOML parsing error for '{path}': {source}")]
    Toml {
        path: String,
        source: toml::de::Error,
    },
}

const BUILTIN_VDW: [(&str, f64, f64); 4] = [
    ("C", 3.8983, 0.0951),
    ("N", 3.6621, 0.0774),
    ("O", 3.4046, 0.0957),
    ("S", 4.0300, 0.3440),
];

const BUILTIN_CHARGES: [(&str, &str, f64); 7] = [
    ("ASP", "OD1", -0.5),
    ("ASP", "OD2", -0.5),
    ("GLU", "OE1", -0.5),
    ("GLU", "OE2", -0.5),
    ("LYS", "NZ", 1.0),
    ("ARG", "NH1", 0.5),
    ("ARG", "NH2", 0.5),
];

impl Forcefield {
    pub fn load(non_bonded_path: &Path, charges_path: &Path) -> Result<Self, ParamLoadError> {
        let non_bonded = Self::load_non_bonded(non_bonded_path)?;
        let charges = Self::load_charges_csv(charges_path)?;

        Ok(Self {
            non_bonded,
            charges,
        })
    }

    /// Lennard-Jones parameters for the heavy elements of proteins and formal
    /// charges on the ionizable side-chain atoms. Backbone atoms are neutral.
    pub fn builtin() -> Self {
        let vdw = BUILTIN_VDW
            .iter()
            .map(|&(ff_type, radius, well_depth)| {
                (
                    ff_type.to_string(),
                    VdwParam::LennardJones { radius, well_depth },
                )
            })
            .collect();
        let charges = BUILTIN_CHARGES
            .iter()
            .map(|&(res_type, atom_name, charge)| {
                ((res_type.to_string(), atom_name.to_string()), charge)
            })
            .collect();

        Self {
            non_bonded: NonBondedParams {
                globals: GlobalParams {
                    dielectric_constant: 1.0,
                },
                vdw,
            },
            charges,
        }
    }

    pub fn charge_for(&self, residue_name: &str, atom_name: &str) -> f64 {
        self.charges
            .get(&(residue_name.to_string(), atom_name.to_string()))
            .copied()
            .unwrap_or(0.0)
    }

    fn load_non_bonded(path: &Path) -> Result<NonBondedParams, ParamLoadError> {
        let content = std::fs::read_to_string(path).map_err(|e| ParamLoadError::Io {
            path: path.to_string_lossy().to_string(),
            source: e,
        })?;
        toml::from_str(&content).map_err(|e| ParamLoadError::Toml {
            path: path.to_string_lossy().to_string(),
            source: e,
        })
    }

    fn load_charges_csv(path: &Path) -> Result<HashMap<(String, String), f64>, ParamLoadError> {
        let mut reader = csv::Reader::from_path(path).map_err(|e| ParamLoadError::Csv {
            path: path.to_string_lossy().to_string(),
            source: e,
        })?;

        let mut charges = HashMap::new();
        for result in reader.deserialize::<ChargeParam>() {
            let record = result.map_err(|e| ParamLoadError::Csv {
                path: path.to_string_lossy().to_string(),
                source: e,
            })?;
            charges.insert((record.res_type, record.atom_name), record.charge);
        }
        Ok(charges)
    }
}

impl Default for Forcefield {
    fn default() -> Self {
        Self::builtin()
    }
}
