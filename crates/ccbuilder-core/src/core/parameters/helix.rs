use super::ParameterError;
use super::register::Register;
use crate::core::models::chain::MAX_CHAINS;
use crate::core::models::residue::ResidueType;
use serde::{Deserialize, Serialize};

/// Geometric and sequence parameters of one helix of a coiled-coil bundle.
///
/// Instances are always valid: radius is positive, pitch is non-zero, every
/// float is finite and the sequence only holds standard one-letter codes
/// (stored upper case). Build one with [`HelixParametersBuilder`] or by
/// deserializing a request document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawHelixParameters")]
pub struct HelixParameters {
    #[serde(rename = "Radius")]
    radius: f64,
    #[serde(rename = "Pitch")]
    pitch: f64,
    #[serde(rename = "Interface Angle")]
    interface_angle: f64,
    #[serde(rename = "Register")]
    register: Register,
    #[serde(rename = "Super-Helical Rotation")]
    super_helical_rotation: f64,
    #[serde(rename = "Orientation")]
    orientation: bool,
    #[serde(rename = "Z-Shift")]
    z_shift: f64,
    #[serde(rename = "Sequence")]
    sequence: String,
}

impl HelixParameters {
    pub fn builder() -> HelixParametersBuilder {
        HelixParametersBuilder::new()
    }

    /// Major (super-helical) radius in Angstroms.
    pub fn radius(&self) -> f64 {
        self.radius
    }

    /// Super-helical pitch in Angstroms. The sign selects the handedness of the supercoil.
    pub fn pitch(&self) -> f64 {
        self.pitch
    }

    /// Core-packing angle in degrees.
    pub fn interface_angle(&self) -> f64 {
        self.interface_angle
    }

    pub fn register(&self) -> Register {
        self.register
    }

    /// Rotation about the bundle axis in degrees, added to the default per-chain phase.
    pub fn super_helical_rotation(&self) -> f64 {
        self.super_helical_rotation
    }

    /// `true` reverses the chain direction along the bundle axis.
    pub fn orientation(&self) -> bool {
        self.orientation
    }

    /// Translation along the bundle axis in Angstroms.
    pub fn z_shift(&self) -> f64 {
        self.z_shift
    }

    pub fn sequence(&self) -> &str {
        &self.sequence
    }

    pub fn residue_count(&self) -> usize {
        self.sequence.len()
    }

    pub fn residue_types(&self) -> impl Iterator<Item = ResidueType> + '_ {
        self.sequence.chars().filter_map(ResidueType::from_one_letter)
    }

    /// `interface_angle` plus the register offset, in degrees.
    pub fn effective_interface_angle(&self) -> f64 {
        self.interface_angle + self.register.offset_degrees()
    }
}

/// Builder for [`HelixParameters`]. Every field is required; a missing one is
/// [`ParameterError::MissingField`].
#[derive(Debug, Default, Clone)]
pub struct HelixParametersBuilder {
    radius: Option<f64>,
    pitch: Option<f64>,
    interface_angle: Option<f64>,
    register: Option<Register>,
    super_helical_rotation: Option<f64>,
    orientation: Option<bool>,
    z_shift: Option<f64>,
    sequence: Option<String>,
}

impl HelixParametersBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn radius(mut self, radius: f64) -> Self {
        self.radius = Some(radius);
        self
    }
    pub fn pitch(mut self, pitch: f64) -> Self {
        self.pitch = Some(pitch);
        self
    }
    pub fn interface_angle(mut self, degrees: f64) -> Self {
        self.interface_angle = Some(degrees);
        self
    }
    pub fn register(mut self, register: Register) -> Self {
        self.register = Some(register);
        self
    }
    pub fn super_helical_rotation(mut self, degrees: f64) -> Self {
        self.super_helical_rotation = Some(degrees);
        self
    }
    pub fn orientation(mut self, reversed: bool) -> Self {
        self.orientation = Some(reversed);
        self
    }
    pub fn z_shift(mut self, shift: f64) -> Self {
        self.z_shift = Some(shift);
        self
    }
    pub fn sequence(mut self, sequence: impl Into<String>) -> Self {
        self.sequence = Some(sequence.into());
        self
    }

    pub fn build(self) -> Result<HelixParameters, ParameterError> {
        let radius = self
            .radius
            .ok_or(ParameterError::MissingField("radius"))?;
        let pitch = self.pitch.ok_or(ParameterError::MissingField("pitch"))?;
        let interface_angle = self
            .interface_angle
            .ok_or(ParameterError::MissingField("interface_angle"))?;
        let register = self
            .register
            .ok_or(ParameterError::MissingField("register"))?;
        let super_helical_rotation = self
            .super_helical_rotation
            .ok_or(ParameterError::MissingField("super_helical_rotation"))?;
        let orientation = self
            .orientation
            .ok_or(ParameterError::MissingField("orientation"))?;
        let z_shift = self
            .z_shift
            .ok_or(ParameterError::MissingField("z_shift"))?;
        let sequence = self
            .sequence
            .ok_or(ParameterError::MissingField("sequence"))?;

        if !(radius.is_finite() && radius > 0.0) {
            return Err(ParameterError::NonPositiveRadius(radius));
        }
        if !pitch.is_finite() || pitch == 0.0 {
            return Err(ParameterError::ZeroPitch(pitch));
        }
        let interface_angle = finite("interface_angle", interface_angle)?;
        let super_helical_rotation = finite("super_helical_rotation", super_helical_rotation)?;
        let z_shift = finite("z_shift", z_shift)?;

        Ok(HelixParameters {
            radius,
            pitch,
            interface_angle,
            register,
            super_helical_rotation,
            orientation,
            z_shift,
            sequence: normalize_sequence(&sequence)?,
        })
    }
}

fn finite(field: &'static str, value: f64) -> Result<f64, ParameterError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(ParameterError::NonFinite { field, value })
    }
}

fn normalize_sequence(sequence: &str) -> Result<String, ParameterError> {
    sequence
        .trim()
        .chars()
        .enumerate()
        .map(|(position, code)| {
            ResidueType::from_one_letter(code)
                .map(|residue_type| residue_type.to_one_letter())
                .ok_or(ParameterError::UnknownResidue { code, position })
        })
        .collect()
}

/// Wire shape of a helix request document. Field names follow the original
/// request format; camelCase aliases are accepted as well.
#[derive(Debug, Deserialize)]
struct RawHelixParameters {
    #[serde(rename = "Radius", alias = "radius")]
    radius: Option<f64>,
    #[serde(rename = "Pitch", alias = "pitch")]
    pitch: Option<f64>,
    #[serde(rename = "Interface Angle", alias = "interfaceAngle")]
    interface_angle: Option<f64>,
    #[serde(rename = "Register", alias = "register")]
    register: Option<String>,
    #[serde(rename = "Super-Helical Rotation", alias = "superHelicalRotation")]
    super_helical_rotation: Option<f64>,
    #[serde(rename = "Orientation", alias = "orientation")]
    orientation: Option<bool>,
    #[serde(rename = "Z-Shift", alias = "zShift")]
    z_shift: Option<f64>,
    #[serde(rename = "Sequence", alias = "sequence")]
    sequence: Option<String>,
}

impl TryFrom<RawHelixParameters> for HelixParameters {
    type Error = ParameterError;

    fn try_from(raw: RawHelixParameters) -> Result<Self, Self::Error> {
        let register: Register = raw
            .register
            .ok_or(ParameterError::MissingField("register"))?
            .parse()?;

        let mut builder = HelixParametersBuilder::new().register(register);
        if let Some(radius) = raw.radius {
            builder = builder.radius(radius);
        }
        if let Some(pitch) = raw.pitch {
            builder = builder.pitch(pitch);
        }
        if let Some(angle) = raw.interface_angle {
            builder = builder.interface_angle(angle);
        }
        if let Some(rotation) = raw.super_helical_rotation {
            builder = builder.super_helical_rotation(rotation);
        }
        if let Some(orientation) = raw.orientation {
            builder = builder.orientation(orientation);
        }
        if let Some(shift) = raw.z_shift {
            builder = builder.z_shift(shift);
        }
        if let Some(sequence) = raw.sequence {
            builder = builder.sequence(sequence);
        }
        builder.build()
    }
}

/// The validated, ordered list of helices making up one bundle request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<HelixParameters>", into = "Vec<HelixParameters>")]
pub struct BundleSpecification {
    chains: Vec<HelixParameters>,
}

impl BundleSpecification {
    pub fn new(chains: Vec<HelixParameters>) -> Result<Self, ParameterError> {
        if chains.is_empty() {
            return Err(ParameterError::EmptyBundle);
        }
        if chains.len() > MAX_CHAINS {
            return Err(ParameterError::TooManyChains {
                count: chains.len(),
                max: MAX_CHAINS,
            });
        }
        Ok(Self { chains })
    }

    /// Assembles a specification from per-parameter arrays, the layout used by
    /// array-oriented callers. Every array must have one entry per chain.
    pub fn from_columns(columns: BundleColumns) -> Result<Self, ParameterError> {
        let expected = columns.radii.len();
        let lengths = [
            columns.pitches.len(),
            columns.interface_angles.len(),
            columns.registers.len(),
            columns.super_helical_rotations.len(),
            columns.orientations.len(),
            columns.z_shifts.len(),
            columns.sequences.len(),
        ];
        if let Some(&found) = lengths.iter().find(|&&len| len != expected) {
            return Err(ParameterError::ChainCountMismatch { expected, found });
        }

        let chains = (0..expected)
            .map(|i| {
                HelixParametersBuilder::new()
                    .radius(columns.radii[i])
                    .pitch(columns.pitches[i])
                    .interface_angle(columns.interface_angles[i])
                    .register(columns.registers[i])
                    .super_helical_rotation(columns.super_helical_rotations[i])
                    .orientation(columns.orientations[i])
                    .z_shift(columns.z_shifts[i])
                    .sequence(columns.sequences[i].clone())
                    .build()
            })
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(chains)
    }

    pub fn chains(&self) -> &[HelixParameters] {
        &self.chains
    }

    /// Number of chains in the bundle.
    pub fn oligomer_state(&self) -> usize {
        self.chains.len()
    }
}

impl TryFrom<Vec<HelixParameters>> for BundleSpecification {
    type Error = ParameterError;

    fn try_from(chains: Vec<HelixParameters>) -> Result<Self, Self::Error> {
        Self::new(chains)
    }
}

impl From<BundleSpecification> for Vec<HelixParameters> {
    fn from(spec: BundleSpecification) -> Self {
        spec.chains
    }
}

/// Per-parameter arrays describing a bundle, one entry per chain.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BundleColumns {
    pub radii: Vec<f64>,
    pub pitches: Vec<f64>,
    pub interface_angles: Vec<f64>,
    pub registers: Vec<Register>,
    pub super_helical_rotations: Vec<f64>,
    pub orientations: Vec<bool>,
    pub z_shifts: Vec<f64>,
    pub sequences: Vec<String>,
}
