use nalgebra::{Point3, Rotation3, Unit, Vector3};

pub fn rotation_from_axis_angle(axis: &Vector3<f64>, angle_degrees: f64) -> Rotation3<f64> {
    Rotation3::from_axis_angle(&Unit::new_normalize(*axis), angle_degrees.to_radians())
}

/// Places atom `d` bonded to `c` from internal coordinates (natural extension
/// reference frame): `|cd| = bond_length`, angle `b-c-d = bond_angle` and
/// dihedral `a-b-c-d = torsion`, both in degrees.
///
/// Returns `None` when `a`, `b` and `c` are collinear and the dihedral is undefined.
pub fn place_atom(
    a: &Point3<f64>,
    b: &Point3<f64>,
    c: &Point3<f64>,
    bond_length: f64,
    bond_angle: f64,
    torsion: f64,
) -> Option<Point3<f64>> {
    let bc = (c - b).try_normalize(1e-9)?;
    let n = (b - a).cross(&bc).try_normalize(1e-9)?;
    let m = n.cross(&bc);

    let theta = bond_angle.to_radians();
    let phi = torsion.to_radians();
    let local = Vector3::new(
        -bond_length * theta.cos(),
        bond_length * theta.sin() * phi.cos(),
        bond_length * theta.sin() * phi.sin(),
    );

    Some(c + bc * local.x + m * local.y + n * local.z)
}

/// Angle `a-b-c` in degrees.
pub fn angle_degrees(a: &Point3<f64>, b: &Point3<f64>, c: &Point3<f64>) -> f64 {
    (a - b).angle(&(c - b)).to_degrees()
}

/// Dihedral `a-b-c-d` in degrees, in `(-180, 180]`.
pub fn dihedral_degrees(a: &Point3<f64>, b: &Point3<f64>, c: &Point3<f64>, d: &Point3<f64>) -> f64 {
    let b0 = a - b;
    let b1 = (c - b).normalize();
    let b2 = d - c;

    let v = b0 - b1 * b0.dot(&b1);
    let w = b2 - b1 * b2.dot(&b1);
    let x = v.dot(&w);
    let y = b1.cross(&v).dot(&w);
    y.atan2(x).to_degrees()
}

/// Wraps an angle in degrees into `[0, 360)`.
pub fn normalize_degrees(angle: f64) -> f64 {
    let wrapped = angle.rem_euclid(360.0);
    if wrapped >= 360.0 { 0.0 } else { wrapped }
}
