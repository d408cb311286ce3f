use crate::core::io::traits::MolecularFile;
use crate::core::models::atom::{Atom, AtomRole, Element};
use crate::core::models::residue::ResidueType;
use crate::core::models::system::MolecularSystem;
use nalgebra::Point3;
use std::io::{self, BufRead, Write};
use thiserror::Error;

const BACKBONE_ATOM_NAMES: [&str; 4] = ["N", "CA", "C", "O"];

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PdbMetadata {
    /// Free text of `REMARK` records, written before the coordinates.
    pub remarks: Vec<String>,
}

#[derive(Debug, Error)]
pub enum PdbError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("Parse error on line {line}: {kind}")]
    Parse {
        line: usize,
        kind: PdbParseErrorKind,
    },
    #[error("Inconsistent data: {0}")]
    Inconsistency(String),
}

#[derive(Debug, Error)]
pub enum PdbParseErrorKind {
    #[error("Invalid integer format in columns {columns} (value: '{value}')")]
    InvalidInt { columns: String, value: String },
    #[error("Invalid float format in columns {columns} (value: '{value}')")]
    InvalidFloat { columns: String, value: String },
    #[error("Required field in columns {columns} is empty")]
    MissingRequiredField { columns: String },
    #[error("Unknown residue name '{0}'")]
    UnknownResidue(String),
    #[error("Line is too short for an ATOM/HETATM record (must be at least 54 chars)")]
    LineTooShort,
}

fn slice_and_trim(line: &str, start: usize, end: usize) -> &str {
    line.get(start..end).unwrap_or("").trim()
}

fn parse_float(line: &str, line_num: usize, start: usize, end: usize) -> Result<f64, PdbError> {
    let value = slice_and_trim(line, start, end);
    value.parse().map_err(|_| PdbError::Parse {
        line: line_num,
        kind: PdbParseErrorKind::InvalidFloat {
            columns: format!("{}-{}", start + 1, end),
            value: value.to_string(),
        },
    })
}

/// PDB atom names shorter than four characters start in column 14.
fn format_atom_name(name: &str) -> String {
    if name.len() < 4 {
        format!(" {:<3}", name)
    } else {
        name.to_string()
    }
}

pub struct PdbFile;

impl PdbFile {
    /// Encodes a system as PDB text. The output only depends on the atoms'
    /// names, residues and coordinates (printed to 3 decimals), so equal
    /// models give byte-identical text.
    pub fn encode(system: &MolecularSystem) -> Result<String, PdbError> {
        let mut buffer = Vec::new();
        Self::write_system_to(system, &mut buffer)?;
        Ok(String::from_utf8_lossy(&buffer).into_owned())
    }

    pub fn decode(text: &str) -> Result<(MolecularSystem, PdbMetadata), PdbError> {
        Self::read_from(&mut text.as_bytes())
    }

    fn write_atoms(system: &MolecularSystem, writer: &mut impl Write) -> Result<(), PdbError> {
        let mut serial = 1usize;
        for (_, chain) in system.chains_iter() {
            let mut last_residue = None;
            for &residue_id in chain.residues() {
                let residue = system.residue(residue_id).ok_or_else(|| {
                    PdbError::Inconsistency(format!("chain {} lists a missing residue", chain.id))
                })?;
                for &atom_id in residue.atoms() {
                    let atom = system.atom(atom_id).ok_or_else(|| {
                        PdbError::Inconsistency(format!(
                            "residue {} of chain {} lists a missing atom",
                            residue.number, chain.id
                        ))
                    })?;
                    writeln!(
                        writer,
                        "ATOM  {:>5} {:<4} {:>3} {}{:>4}    {:>8.3}{:>8.3}{:>8.3}{:>6.2}{:>6.2}          {:>2}",
                        serial,
                        format_atom_name(&atom.name),
                        residue.name(),
                        chain.id,
                        residue.number,
                        atom.position.x,
                        atom.position.y,
                        atom.position.z,
                        1.0,
                        0.0,
                        atom.element.symbol(),
                    )?;
                    serial += 1;
                }
                last_residue = Some(residue);
            }
            // An empty chain still gets a bare TER so decoding keeps the chain count.
            match last_residue {
                Some(residue) => writeln!(
                    writer,
                    "TER   {:>5}      {:>3} {}{:>4}",
                    serial,
                    residue.name(),
                    chain.id,
                    residue.number
                )?,
                None => writeln!(writer, "TER   {:>5}          {}", serial, chain.id)?,
            }
            serial += 1;
        }
        writeln!(writer, "END")?;
        Ok(())
    }
}

impl MolecularFile for PdbFile {
    type Metadata = PdbMetadata;
    type Error = PdbError;

    fn read_from(
        reader: &mut impl BufRead,
    ) -> Result<(MolecularSystem, Self::Metadata), Self::Error> {
        let mut system = MolecularSystem::new();
        let mut metadata = PdbMetadata::default();

        for (line_num, line_res) in reader.lines().enumerate() {
            let line = line_res?;
            let line_num = line_num + 1;

            match slice_and_trim(&line, 0, 6) {
                "REMARK" => metadata
                    .remarks
                    .push(line.get(7..).unwrap_or("").trim_end().to_string()),
                "TER" => {
                    let label = line.get(21..22).and_then(|s| s.chars().next());
                    if let Some(label) = label.filter(|&c| c != ' ') {
                        system.add_chain(label);
                    }
                }
                "ATOM" | "HETATM" => {
                    if line.len() < 54 {
                        return Err(PdbError::Parse {
                            line: line_num,
                            kind: PdbParseErrorKind::LineTooShort,
                        });
                    }

                    let name = slice_and_trim(&line, 12, 16);
                    if name.is_empty() {
                        return Err(PdbError::Parse {
                            line: line_num,
                            kind: PdbParseErrorKind::MissingRequiredField {
                                columns: "13-16".into(),
                            },
                        });
                    }
                    let res_name = slice_and_trim(&line, 17, 20);
                    let residue_type: ResidueType = res_name.parse().map_err(|_| PdbError::Parse {
                        line: line_num,
                        kind: PdbParseErrorKind::UnknownResidue(res_name.to_string()),
                    })?;
                    let chain_label = line.get(21..22).and_then(|s| s.chars().next()).unwrap_or(' ');
                    let res_seq_str = slice_and_trim(&line, 22, 26);
                    let res_seq: isize = res_seq_str.parse().map_err(|_| PdbError::Parse {
                        line: line_num,
                        kind: PdbParseErrorKind::InvalidInt {
                            columns: "23-26".into(),
                            value: res_seq_str.to_string(),
                        },
                    })?;
                    let position = Point3::new(
                        parse_float(&line, line_num, 30, 38)?,
                        parse_float(&line, line_num, 38, 46)?,
                        parse_float(&line, line_num, 46, 54)?,
                    );
                    let element = slice_and_trim(&line, 76, 78)
                        .parse::<Element>()
                        .unwrap_or_else(|_| Element::from_atom_name(name));
                    let role = if BACKBONE_ATOM_NAMES.contains(&name) {
                        AtomRole::Backbone
                    } else {
                        AtomRole::Sidechain
                    };

                    let chain_id = system.add_chain(chain_label);
                    let residue_id = system
                        .add_residue(chain_id, res_seq, residue_type)
                        .ok_or_else(|| {
                            PdbError::Inconsistency(format!("chain {chain_label} was not created"))
                        })?;
                    let atom = Atom::new(name, residue_id, position)
                        .with_role(role)
                        .with_element(element);
                    system.add_atom_to_residue(residue_id, atom).ok_or_else(|| {
                        PdbError::Inconsistency(format!("residue {res_seq} was not created"))
                    })?;
                }
                _ => {}
            }
        }

        Ok((system, metadata))
    }

    fn write_to(
        system: &MolecularSystem,
        metadata: &Self::Metadata,
        writer: &mut impl Write,
    ) -> Result<(), Self::Error> {
        for remark in &metadata.remarks {
            writeln!(writer, "REMARK {}", remark)?;
        }
        Self::write_atoms(system, writer)
    }

    fn write_system_to(
        system: &MolecularSystem,
        writer: &mut impl Write,
    ) -> Result<(), Self::Error> {
        Self::write_atoms(system, writer)
    }
}
