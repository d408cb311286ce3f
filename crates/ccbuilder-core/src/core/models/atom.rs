use super::ids::ResidueId;
use nalgebra::Point3;
use std::fmt;
use std::str::FromStr;

/// Chemical elements that occur in packed protein models.
///
/// Hydrogens are never generated by the packer but can appear in structures read
/// back from PDB text, so they are still representable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Element {
    H, // Hydrogen
    C, // Carbon
    N, // Nitrogen
    O, // Oxygen
    S, // Sulfur
    Unknown,
}

impl Element {
    pub fn symbol(&self) -> &'static str {
        match self {
            Self::H => "H",
            Self::C => "C",
            Self::N => "N",
            Self::O => "O",
            Self::S => "S",
            Self::Unknown => "X",
        }
    }

    /// Infers the element from a PDB-style atom name such as `CA`, `OD1` or `SG`.
    pub fn from_atom_name(name: &str) -> Self {
        match name.trim().chars().find(|c| c.is_ascii_alphabetic()) {
            Some('H') | Some('h') => Self::H,
            Some('C') | Some('c') => Self::C,
            Some('N') | Some('n') => Self::N,
            Some('O') | Some('o') => Self::O,
            Some('S') | Some('s') => Self::S,
            _ => Self::Unknown,
        }
    }
}

impl FromStr for Element {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "H" | "D" => Ok(Self::H),
            "C" => Ok(Self::C),
            "N" => Ok(Self::N),
            "O" => Ok(Self::O),
            "S" => Ok(Self::S),
            _ => Err(()),
        }
    }
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// Role of an atom within its residue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub enum AtomRole {
    /// Main-chain atom (N, CA, C, O).
    Backbone,
    /// Atom placed by the sequence packer.
    Sidechain,
    /// Unknown or unclassified atom role.
    #[default]
    Other,
}

/// Caches van der Waals parameters on the atom so pair evaluation avoids
/// repeated forcefield lookups.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CachedVdwParam {
    /// Lennard-Jones potential parameters.
    LennardJones {
        /// The van der Waals radius in Angstroms.
        radius: f64,
        /// The well depth parameter (epsilon) in kcal/mol.
        well_depth: f64,
    },
    /// Buckingham potential parameters.
    Buckingham {
        /// The van der Waals radius in Angstroms.
        radius: f64,
        /// The well depth parameter in kcal/mol.
        well_depth: f64,
        /// Scaling factor for the exponential term.
        scale: f64,
    },
    /// Not parameterized yet.
    None,
}

/// An atom of a packed bundle.
#[derive(Debug, Clone, PartialEq)]
pub struct Atom {
    /// The name of the atom (e.g., "CA", "OD1").
    pub name: String,
    /// The ID of the parent residue this atom belongs to.
    pub residue_id: ResidueId,
    /// Backbone or side chain.
    pub role: AtomRole,
    /// Chemical element, inferred from the name on construction.
    pub element: Element,
    /// The forcefield atom type assigned during parameterization.
    pub force_field_type: String,
    /// The partial atomic charge in elementary charge units.
    pub partial_charge: f64,
    /// The 3D coordinates of the atom in Angstroms.
    pub position: Point3<f64>,
    /// Cached van der Waals parameters.
    pub vdw_param: CachedVdwParam,
}

impl Atom {
    /// Creates a new `Atom`; the element is inferred from `name` and every
    /// forcefield field starts unassigned.
    pub fn new(name: &str, residue_id: ResidueId, position: Point3<f64>) -> Self {
        Self {
            name: name.to_string(),
            residue_id,
            role: AtomRole::default(),
            element: Element::from_atom_name(name),
            force_field_type: String::new(),
            partial_charge: 0.0,
            position,
            vdw_param: CachedVdwParam::None,
        }
    }

    pub fn with_role(mut self, role: AtomRole) -> Self {
        self.role = role;
        self
    }

    pub fn with_element(mut self, element: Element) -> Self {
        self.element = element;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_atom_infers_element_and_leaves_forcefield_fields_unset() {
        let residue_id = ResidueId::default();
        let atom = Atom::new("OD1", residue_id, Point3::new(1.0, 2.0, 3.0));

        assert_eq!(atom.element, Element::O);
        assert_eq!(atom.role, AtomRole::Other);
        assert_eq!(atom.force_field_type, "");
        assert_eq!(atom.partial_charge, 0.0);
        assert!(matches!(atom.vdw_param, CachedVdwParam::None));
    }

    #[test]
    fn builder_methods_override_role_and_element() {
        let atom = Atom::new("CA", ResidueId::default(), Point3::origin())
            .with_role(AtomRole::Backbone)
            .with_element(Element::C);
        assert_eq!(atom.role, AtomRole::Backbone);
        assert_eq!(atom.element, Element::C);
    }

    #[test]
    fn element_is_inferred_from_first_letter_of_atom_name() {
        assert_eq!(Element::from_atom_name("CA"), Element::C);
        assert_eq!(Element::from_atom_name(" NZ "), Element::N);
        assert_eq!(Element::from_atom_name("SG"), Element::S);
        assert_eq!(Element::from_atom_name("1HB"), Element::H);
        assert_eq!(Element::from_atom_name("?"), Element::Unknown);
    }

    #[test]
    fn element_parses_from_symbol_case_insensitively() {
        assert_eq!("c".parse::<Element>(), Ok(Element::C));
        assert_eq!(" S ".parse::<Element>(), Ok(Element::S));
        assert_eq!("Fe".parse::<Element>(), Err(()));
        assert_eq!(Element::O.to_string(), "O");
    }
}
