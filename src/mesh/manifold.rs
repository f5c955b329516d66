//! Geometry descriptions used when refinement creates new vertices.
//!
//! A [`Manifold`] decides where a new point goes given the existing points it
//! is built from. Faces (and through them edges) carry a
//! [`ManifoldId`](super::ManifoldId); refinement looks the id up in the
//! triangulation and asks the attached manifold for the new position. Faces
//! without an attached manifold fall back to [`FlatManifold`].

use std::fmt::Debug;

use nalgebra::{Point, Point2, Point3, Unit, Vector2, Vector3};

/// Places new points between existing ones.
pub trait Manifold<const DIM: usize>: Debug + Send + Sync {
    /// Compute the point described by `points` and their `weights`.
    ///
    /// The weights are non-negative and sum to one.
    fn new_point(&self, points: &[Point<f64, DIM>], weights: &[f64]) -> Point<f64, DIM>;
}

/// Straight-sided geometry: new points are weighted averages.
#[derive(Debug, Clone, Copy, Default)]
pub struct FlatManifold;

impl<const DIM: usize> Manifold<DIM> for FlatManifold {
    fn new_point(&self, points: &[Point<f64, DIM>], weights: &[f64]) -> Point<f64, DIM> {
        weighted_average(points, weights)
    }
}

fn weighted_average<const DIM: usize>(points: &[Point<f64, DIM>], weights: &[f64]) -> Point<f64, DIM> {
    let mut coords = nalgebra::SVector::<f64, DIM>::zeros();
    for (p, &w) in points.iter().zip(weights) {
        coords += p.coords * w;
    }
    Point::from(coords)
}

/// Circular geometry in the plane around a centre point.
///
/// Radii and directions are averaged separately, so points on a circle
/// around `center` produce new points on the same circle.
#[derive(Debug, Clone, Copy)]
pub struct PolarManifold {
    /// Centre of the circle.
    pub center: Point2<f64>,
}

impl PolarManifold {
    /// Create a polar manifold around `center`.
    pub fn new(center: Point2<f64>) -> Self {
        Self { center }
    }
}

impl Manifold<2> for PolarManifold {
    fn new_point(&self, points: &[Point2<f64>], weights: &[f64]) -> Point2<f64> {
        let mut radius = 0.0;
        let mut direction = Vector2::zeros();
        for (p, &w) in points.iter().zip(weights) {
            let offset = p - self.center;
            let r = offset.norm();
            radius += w * r;
            if r > 0.0 {
                direction += offset * (w / r);
            }
        }

        match Unit::try_new(direction, 1e-12) {
            Some(dir) => self.center + dir.into_inner() * radius,
            // Opposite points: no well-defined direction.
            None => weighted_average(points, weights),
        }
    }
}

/// Cylindrical geometry around an axis in 3D.
///
/// The axial coordinate is averaged linearly and the radial part is averaged
/// like [`PolarManifold`].
#[derive(Debug, Clone, Copy)]
pub struct CylindricalManifold {
    /// Unit direction of the cylinder axis.
    pub direction: Unit<Vector3<f64>>,
    /// A point on the axis.
    pub point_on_axis: Point3<f64>,
}

impl CylindricalManifold {
    /// Create a cylindrical manifold around the axis through `point_on_axis`.
    pub fn new(direction: Vector3<f64>, point_on_axis: Point3<f64>) -> Self {
        Self {
            direction: Unit::new_normalize(direction),
            point_on_axis,
        }
    }

    /// Cylinder around the z axis through the origin.
    pub fn z_axis() -> Self {
        Self::new(Vector3::z(), Point3::origin())
    }
}

impl Manifold<3> for CylindricalManifold {
    fn new_point(&self, points: &[Point3<f64>], weights: &[f64]) -> Point3<f64> {
        let axis = self.direction.into_inner();
        let mut height = 0.0;
        let mut radius = 0.0;
        let mut direction = Vector3::zeros();
        for (p, &w) in points.iter().zip(weights) {
            let offset = p - self.point_on_axis;
            let h = offset.dot(&axis);
            let radial = offset - axis * h;
            let r = radial.norm();
            height += w * h;
            radius += w * r;
            if r > 0.0 {
                direction += radial * (w / r);
            }
        }

        match Unit::try_new(direction, 1e-12) {
            Some(dir) => self.point_on_axis + axis * height + dir.into_inner() * radius,
            None => weighted_average(points, weights),
        }
    }
}
