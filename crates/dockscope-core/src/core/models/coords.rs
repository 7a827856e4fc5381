use nalgebra::Point3;
use serde::{Deserialize, Serialize};

/// A plain Cartesian coordinate in Angstroms.
///
/// Geometry is computed with `nalgebra` points internally; this type is the
/// serializable `{x, y, z}` shape handed to rendering collaborators.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Coordinate {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Coordinate {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    pub fn to_point(self) -> Point3<f64> {
        Point3::new(self.x, self.y, self.z)
    }
}

impl From<Point3<f64>> for Coordinate {
    fn from(p: Point3<f64>) -> Self {
        Self::new(p.x, p.y, p.z)
    }
}

impl From<Coordinate> for Point3<f64> {
    fn from(c: Coordinate) -> Self {
        c.to_point()
    }
}
