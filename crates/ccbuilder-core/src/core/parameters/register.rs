use super::ParameterError;
use phf::phf_map;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Heptad register position of the first residue of a chain.
///
/// Each label maps to a fixed angular offset that is added to the chain's
/// interface angle. Consecutive heptad positions are 102.8 degrees apart
/// (one residue at 3.5 residues per turn).
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(try_from = "String", into = "String")]
pub enum Register {
    #[default]
    A,
    B,
    C,
    D,
    E,
    F,
    G,
}

static REGISTER_LABELS: phf::Map<char, Register> = phf_map! {
    'a' => Register::A,
    'b' => Register::B,
    'c' => Register::C,
    'd' => Register::D,
    'e' => Register::E,
    'f' => Register::F,
    'g' => Register::G,
};

impl Register {
    pub const ALL: [Register; 7] = [
        Register::A,
        Register::B,
        Register::C,
        Register::D,
        Register::E,
        Register::F,
        Register::G,
    ];

    /// Angular offset in degrees added to the interface angle.
    pub const fn offset_degrees(&self) -> f64 {
        match self {
            Register::A => 0.0,
            Register::B => 102.8,
            Register::C => 205.6,
            Register::D => 308.4,
            Register::E => 51.4,
            Register::F => 154.2,
            Register::G => 257.0,
        }
    }

    pub const fn label(&self) -> char {
        match self {
            Register::A => 'a',
            Register::B => 'b',
            Register::C => 'c',
            Register::D => 'd',
            Register::E => 'e',
            Register::F => 'f',
            Register::G => 'g',
        }
    }
}

impl FromStr for Register {
    type Err = ParameterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.trim().chars();
        match (chars.next(), chars.next()) {
            (Some(label), None) => REGISTER_LABELS
                .get(&label.to_ascii_lowercase())
                .copied()
                .ok_or_else(|| ParameterError::UnknownRegister(s.to_string())),
            _ => Err(ParameterError::UnknownRegister(s.to_string())),
        }
    }
}

impl TryFrom<String> for Register {
    type Error = ParameterError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Register> for String {
    fn from(register: Register) -> Self {
        register.label().to_string()
    }
}

impl fmt::Display for Register {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}
