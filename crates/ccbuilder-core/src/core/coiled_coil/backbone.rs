use crate::core::models::chain::chain_label;
use crate::core::parameters::helix::{BundleSpecification, HelixParameters};
use crate::core::utils::geometry::{normalize_degrees, rotation_from_axis_angle};
use nalgebra::{Point3, Rotation3, Vector3};
use std::f64::consts::PI;
use tracing::{debug, instrument};

/// Radius of the CA trace around the local helix axis, in Angstroms.
pub const MINOR_RADIUS: f64 = 2.26;
/// Rise per residue along the local helix axis, in Angstroms.
pub const RISE_PER_RESIDUE: f64 = 1.52;
/// Residues per turn of the alpha helix relative to the super-helical frame.
pub const RESIDUES_PER_TURN: f64 = 3.5;
/// Position of a backbone atom relative to the super-helical frame of its residue.
#[derive(Debug, Clone, Copy)]
struct CylindricalOffset {
    rho: f64,   // Distance from the local helix axis
    delta: f64, // Angular offset from the residue phase, degrees
    zeta: f64,  // Displacement along the local helix axis
}

const N_OFFSET: CylindricalOffset = CylindricalOffset { rho: 1.55, delta: -20.0, zeta: -1.10 };
const CA_OFFSET: CylindricalOffset = CylindricalOffset { rho: MINOR_RADIUS, delta: 0.0, zeta: 0.0 };
const C_OFFSET: CylindricalOffset = CylindricalOffset { rho: 1.62, delta: 33.0, zeta: 0.85 };
const O_OFFSET: CylindricalOffset = CylindricalOffset { rho: 1.75, delta: 30.0, zeta: 2.05 };

/// Angular phases of one residue, in degrees within `[0, 360)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResiduePhase {
    /// Rotation of the CA about the local helix axis, measured from the
    /// direction pointing at the bundle axis. Includes interface angle and
    /// register offset.
    pub helical: f64,
    /// Position of the local helix axis around the bundle axis.
    pub superhelical: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BackboneResidue {
    pub n: Point3<f64>,
    pub ca: Point3<f64>,
    pub c: Point3<f64>,
    pub o: Point3<f64>,
    pub phase: ResiduePhase,
}

impl BackboneResidue {
    /// Backbone atoms in PDB order.
    pub fn atoms(&self) -> [(&'static str, Point3<f64>); 4] {
        [("N", self.n), ("CA", self.ca), ("C", self.c), ("O", self.o)]
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BackboneChain {
    pub label: char,
    pub residues: Vec<BackboneResidue>,
}

impl BackboneChain {
    pub fn len(&self) -> usize {
        self.residues.len()
    }

    pub fn is_empty(&self) -> bool {
        self.residues.is_empty()
    }
}

/// Frenet frame of the super-helical path at one residue.
struct PathFrame {
    origin: Point3<f64>,
    tangent: Vector3<f64>,
    normal: Vector3<f64>,
    binormal: Vector3<f64>,
    theta: f64,
}

/// The super-helix traced by the local axis of one chain, parameterised by
/// residue index so that consecutive residues are `RISE_PER_RESIDUE` apart
/// along the path.
struct SuperHelix {
    radius: f64,
    angle_per_residue: f64,
    z_per_residue: f64,
}

impl SuperHelix {
    fn new(radius: f64, pitch: f64) -> Self {
        let contour = ((2.0 * PI * radius).powi(2) + pitch.powi(2)).sqrt();
        Self {
            radius,
            angle_per_residue: -pitch.signum() * 2.0 * PI * RISE_PER_RESIDUE / contour,
            z_per_residue: RISE_PER_RESIDUE * pitch.abs() / contour,
        }
    }

    fn frame_at(&self, residue_index: usize) -> PathFrame {
        let r = residue_index as f64;
        let theta = r * self.angle_per_residue;
        let (sin, cos) = theta.sin_cos();

        let origin = Point3::new(self.radius * cos, self.radius * sin, r * self.z_per_residue);
        let tangent = Vector3::new(
            -self.radius * sin * self.angle_per_residue,
            self.radius * cos * self.angle_per_residue,
            self.z_per_residue,
        )
        .normalize();
        let normal = Vector3::new(-cos, -sin, 0.0);
        let binormal = tangent.cross(&normal);

        PathFrame { origin, tangent, normal, binormal, theta }
    }
}

/// Default rotational phase of chain `index` in a bundle of `count` chains,
/// spacing the chains evenly around the bundle axis.
pub fn default_rotational_phase(index: usize, count: usize) -> f64 {
    index as f64 * 360.0 / count as f64
}

/// Generates backbone coordinates for every chain of the bundle.
///
/// The bundle axis is the z axis. Chain `i` is labelled by [`chain_label`]
/// and has one residue per sequence letter; an empty sequence gives an empty
/// chain. The specification bounds the chain count, so every chain gets a
/// distinct label.
#[instrument(skip_all, name = "backbone_generation")]
pub fn generate_backbone(spec: &BundleSpecification) -> Vec<BackboneChain> {
    let count = spec.oligomer_state();
    let chains: Vec<BackboneChain> = spec
        .chains()
        .iter()
        .enumerate()
        .map(|(index, params)| build_chain(index, count, params))
        .collect();

    debug!(
        chains = chains.len(),
        residues = chains.iter().map(BackboneChain::len).sum::<usize>(),
        "Generated bundle backbone."
    );
    chains
}

fn build_chain(index: usize, count: usize, params: &HelixParameters) -> BackboneChain {
    // Super-helical rotation is added to the default phase, not substituted for it.
    let frame_rotation = default_rotational_phase(index, count) + params.super_helical_rotation();
    let rotation = rotation_from_axis_angle(&Vector3::z(), frame_rotation);
    let path = SuperHelix::new(params.radius(), params.pitch());
    let degrees_per_residue = 360.0 / RESIDUES_PER_TURN;

    let residues = (0..params.residue_count())
        .map(|r| {
            let frame = path.frame_at(r);
            let helical = r as f64 * degrees_per_residue + params.effective_interface_angle();
            let place = |offset: &CylindricalOffset| {
                place_backbone_atom(&frame, helical, offset, &rotation, params)
            };

            BackboneResidue {
                n: place(&N_OFFSET),
                ca: place(&CA_OFFSET),
                c: place(&C_OFFSET),
                o: place(&O_OFFSET),
                phase: ResiduePhase {
                    helical: normalize_degrees(helical),
                    superhelical: normalize_degrees(frame.theta.to_degrees() + frame_rotation),
                },
            }
        })
        .collect();

    BackboneChain {
        label: chain_label(index),
        residues,
    }
}

fn place_backbone_atom(
    frame: &PathFrame,
    helical: f64,
    offset: &CylindricalOffset,
    rotation: &Rotation3<f64>,
    params: &HelixParameters,
) -> Point3<f64> {
    let angle = (helical + offset.delta).to_radians();
    let radial = frame.normal * angle.cos() + frame.binormal * angle.sin();
    let local = frame.origin + radial * offset.rho + frame.tangent * offset.zeta;

    let mut position = rotation * local;
    if params.orientation() {
        position.z = -position.z;
    }
    position.z += params.z_shift();
    position
}
