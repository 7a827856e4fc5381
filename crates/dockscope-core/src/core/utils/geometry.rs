use crate::core::models::atom::AtomRecord;
use crate::core::models::coords::Coordinate;
use nalgebra::{Point3, Vector3};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Padding added on each side of the ligand extent for a blind-docking box.
pub const DEFAULT_BOX_PADDING: f64 = 5.0;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GeometryError {
    #[error("Cannot compare poses with different atom counts ({left} vs {right})")]
    IncomparablePoses { left: usize, right: usize },
    #[error("Cannot compute a geometric quantity over an empty atom selection")]
    EmptySelection,
    #[error("Atom index {index} is out of range for a selection of {len} atoms")]
    AtomIndexOutOfRange { index: usize, len: usize },
}

/// Arithmetic mean of the atom positions, or `None` for an empty slice.
pub fn centroid(atoms: &[AtomRecord]) -> Option<Point3<f64>> {
    if atoms.is_empty() {
        return None;
    }
    let sum = atoms
        .iter()
        .fold(Vector3::zeros(), |acc, atom| acc + atom.position().coords);
    Some(Point3::from(sum / atoms.len() as f64))
}

/// Dihedral angle in degrees defined by four points, in `(-180, 180]`.
///
/// With `b1 = p2 - p1`, `b2 = p3 - p2`, `b3 = p4 - p3`, `n1 = b1 x b2`,
/// `n2 = b2 x b3` and `m1 = n1 x b2/|b2|`, the angle is
/// `atan2(m1 . n2, n1 . n2)`. Using `atan2` over both projections keeps the
/// sign, which a plain `acos` of the normal dot product loses.
///
/// Collinear inputs have no defined dihedral and yield 0.0.
pub fn dihedral(
    p1: &Point3<f64>,
    p2: &Point3<f64>,
    p3: &Point3<f64>,
    p4: &Point3<f64>,
) -> f64 {
    let b1 = p2 - p1;
    let b2 = p3 - p2;
    let b3 = p4 - p3;

    let n1 = b1.cross(&b2);
    let n2 = b2.cross(&b3);
    let b2_len = b2.norm();
    if b2_len == 0.0 {
        return 0.0;
    }
    let m1 = n1.cross(&(b2 / b2_len));

    let angle = m1.dot(&n2).atan2(n1.dot(&n2)).to_degrees();
    if angle <= -180.0 { angle + 360.0 } else { angle }
}

fn atom_at(atoms: &[AtomRecord], index: usize) -> Result<Point3<f64>, GeometryError> {
    atoms
        .get(index)
        .map(AtomRecord::position)
        .ok_or(GeometryError::AtomIndexOutOfRange {
            index,
            len: atoms.len(),
        })
}

/// Torsion angle between the atoms at positions `i`, `j`, `k`, `l` of `atoms`.
///
/// Indices are positions in the slice, not serial numbers.
///
/// # Errors
///
/// Returns [`GeometryError::AtomIndexOutOfRange`] if any index is outside the slice.
pub fn torsion_angle(
    atoms: &[AtomRecord],
    i: usize,
    j: usize,
    k: usize,
    l: usize,
) -> Result<f64, GeometryError> {
    let p1 = atom_at(atoms, i)?;
    let p2 = atom_at(atoms, j)?;
    let p3 = atom_at(atoms, k)?;
    let p4 = atom_at(atoms, l)?;
    Ok(dihedral(&p1, &p2, &p3, &p4))
}

/// Root-mean-square deviation between two index-paired atom lists.
///
/// No superposition is performed: atom `n` of `a` is compared with atom `n`
/// of `b`, so both lists must enumerate the same atoms in the same order and
/// frame. Re-posed ligands from one docking run satisfy this.
///
/// # Errors
///
/// * [`GeometryError::IncomparablePoses`] if the lists differ in length.
/// * [`GeometryError::EmptySelection`] if both lists are empty.
pub fn rmsd(a: &[AtomRecord], b: &[AtomRecord]) -> Result<f64, GeometryError> {
    if a.len() != b.len() {
        return Err(GeometryError::IncomparablePoses {
            left: a.len(),
            right: b.len(),
        });
    }
    if a.is_empty() {
        return Err(GeometryError::EmptySelection);
    }
    let n = a.len() as f64;
    let squared_dist_sum: f64 = a
        .iter()
        .zip(b.iter())
        .map(|(p1, p2)| (p1.position() - p2.position()).norm_squared())
        .sum();
    Ok((squared_dist_sum / n).sqrt())
}

/// An axis-aligned docking search box.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DockingBox {
    pub center: Coordinate,
    pub size: Coordinate,
}

impl DockingBox {
    /// Returns a copy with every component rounded to `decimals` places.
    pub fn rounded(&self, decimals: i32) -> Self {
        let factor = 10f64.powi(decimals);
        let round = |c: Coordinate| {
            Coordinate::new(
                (c.x * factor).round() / factor,
                (c.y * factor).round() / factor,
                (c.z * factor).round() / factor,
            )
        };
        Self {
            center: round(self.center),
            size: round(self.size),
        }
    }
}

/// Builds a box around `atoms` for blind docking.
///
/// The center is the midpoint of the axis-aligned bounds and each edge is the
/// extent along that axis plus `padding` on both sides. Returns `None` for an
/// empty slice.
pub fn docking_box(atoms: &[AtomRecord], padding: f64) -> Option<DockingBox> {
    let first = atoms.first()?.position();
    let (min, max) = atoms.iter().skip(1).fold((first, first), |(min, max), atom| {
        let p = atom.position();
        (min.inf(&p), max.sup(&p))
    });

    let center = nalgebra::center(&min, &max);
    let size = (max - min).add_scalar(2.0 * padding);
    Some(DockingBox {
        center: center.into(),
        size: Coordinate::new(size.x, size.y, size.z),
    })
}
