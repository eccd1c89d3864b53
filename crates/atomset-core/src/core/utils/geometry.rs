use nalgebra::{Point3, Rotation3, Unit, Vector3};

pub fn rotation_from_axis_angle(axis: &Vector3<f64>, angle_degrees: f64) -> Rotation3<f64> {
    Rotation3::from_axis_angle(&Unit::new_normalize(*axis), angle_degrees.to_radians())
}

/// A rotation operator about one of the Cartesian axes through the origin.
///
/// The rotation angle is supplied per application, so a single operator can be
/// reused for every atom of a pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisRotation {
    axis: Unit<Vector3<f64>>,
}

impl AxisRotation {
    pub fn x() -> Self {
        Self {
            axis: Vector3::x_axis(),
        }
    }

    pub fn y() -> Self {
        Self {
            axis: Vector3::y_axis(),
        }
    }

    pub fn z() -> Self {
        Self {
            axis: Vector3::z_axis(),
        }
    }

    /// Rotates `point` by `angle_degrees` about this axis (right-hand rule).
    pub fn apply(&self, point: &Point3<f64>, angle_degrees: f64) -> Point3<f64> {
        rotation_from_axis_angle(&self.axis, angle_degrees) * point
    }
}
