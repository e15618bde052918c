use nalgebra::{Unit, UnitQuaternion};

use crate::geometry::{EPSILON, FloatType, WorldPoint, WorldVector};

use super::Volume;

#[derive(Copy, Clone, Debug)]
pub struct Sphere {
    pub center: WorldPoint,
    pub radius: FloatType,
}

impl Volume for Sphere {
    fn distance(&self, point: &WorldPoint) -> FloatType {
        (point - self.center).norm() - self.radius
    }

    fn normal(&self, point: &WorldPoint) -> Unit<WorldVector> {
        Unit::try_new(point - self.center, EPSILON).unwrap_or_else(WorldVector::y_axis)
    }
}

/// Oriented box.
#[derive(Copy, Clone, Debug)]
pub struct Cuboid {
    pub position: WorldPoint,
    /// Full edge lengths along the local axes
    pub scale: WorldVector,
    pub rotation: UnitQuaternion<FloatType>,
}

impl Cuboid {
    fn to_local(&self, point: &WorldPoint) -> WorldVector {
        self.rotation.inverse_transform_vector(&(point - self.position))
    }

    /// Per-axis distance of a local point outside of the faces, negative inside.
    fn face_offsets(&self, local: &WorldVector) -> WorldVector {
        local.abs() - self.scale / 2.0
    }
}

impl Volume for Cuboid {
    fn distance(&self, point: &WorldPoint) -> FloatType {
        let q = self.face_offsets(&self.to_local(point));
        let outside = q.map(|c| c.max(0.0)).norm();
        let inside = q.max().min(0.0);
        outside + inside
    }

    fn normal(&self, point: &WorldPoint) -> Unit<WorldVector> {
        let local = self.to_local(point);
        let axis = self.face_offsets(&local).imax();
        let sign = if local[axis] < 0.0 { -1.0 } else { 1.0 };
        let local_normal = WorldVector::ith(axis, sign);
        Unit::new_normalize(self.rotation * local_normal)
    }
}

/// Closed set of primitives that a scene file can describe.
#[derive(Copy, Clone, Debug)]
pub enum Shape {
    Sphere(Sphere),
    Cuboid(Cuboid),
}

impl Volume for Shape {
    fn distance(&self, point: &WorldPoint) -> FloatType {
        match self {
            Shape::Sphere(sphere) => sphere.distance(point),
            Shape::Cuboid(cuboid) => cuboid.distance(point),
        }
    }

    fn normal(&self, point: &WorldPoint) -> Unit<WorldVector> {
        match self {
            Shape::Sphere(sphere) => sphere.normal(point),
            Shape::Cuboid(cuboid) => cuboid.normal(point),
        }
    }
}

impl From<Sphere> for Shape {
    fn from(sphere: Sphere) -> Self {
        Shape::Sphere(sphere)
    }
}

impl From<Cuboid> for Shape {
    fn from(cuboid: Cuboid) -> Self {
        Shape::Cuboid(cuboid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert2::assert;
    use test_case::test_case;

    fn sphere() -> Sphere {
        Sphere {
            center: [1.0, 2.0, 3.0].into(),
            radius: 1.0,
        }
    }

    fn unit_cube(rotation: UnitQuaternion<FloatType>) -> Cuboid {
        Cuboid {
            position: WorldPoint::origin(),
            scale: WorldVector::new(2.0, 2.0, 2.0),
            rotation,
        }
    }

    #[test]
    fn sphere_distance_is_not_squared() {
        let d = sphere().distance(&[1.0, 2.0, 6.0].into());
        assert!((d - 2.0).abs() < 1e-6);
    }

    #[test]
    fn sphere_distance_inside_is_negative() {
        let d = sphere().distance(&[1.0, 2.0, 3.0].into());
        assert!((d + 1.0).abs() < 1e-6);
    }

    #[test]
    fn sphere_normal_points_outward() {
        let n = sphere().normal(&[1.0, 4.0, 3.0].into());
        assert!((n.as_ref() - WorldVector::y()).norm() < 1e-6);
    }

    #[test]
    fn sphere_normal_at_center_does_not_fail() {
        let n = sphere().normal(&[1.0, 2.0, 3.0].into());
        assert!((n.norm() - 1.0).abs() < 1e-6);
    }

    #[test_case([3.0, 0.0, 0.0], 2.0 ; "in front of a face")]
    #[test_case([2.0, 2.0, 1.0], std::f32::consts::SQRT_2 ; "next to an edge")]
    #[test_case([0.0, 0.5, 0.0], -0.5 ; "inside")]
    fn cuboid_distance(point: [FloatType; 3], expected: FloatType) {
        let d = unit_cube(UnitQuaternion::identity()).distance(&point.into());
        assert!((d - expected).abs() < 1e-5);
    }

    #[test_case([1.0, 0.2, 0.1], [1.0, 0.0, 0.0])]
    #[test_case([0.3, -1.0, 0.1], [0.0, -1.0, 0.0])]
    #[test_case([0.3, 0.2, -1.5], [0.0, 0.0, -1.0])]
    fn cuboid_normal(point: [FloatType; 3], expected: [FloatType; 3]) {
        let n = unit_cube(UnitQuaternion::identity()).normal(&point.into());
        assert!((n.as_ref() - WorldVector::from(expected)).norm() < 1e-6);
    }

    #[test]
    fn cuboid_rotation_is_applied() {
        let rotation =
            UnitQuaternion::from_axis_angle(&WorldVector::y_axis(), std::f32::consts::FRAC_PI_4);
        let cube = unit_cube(rotation);

        // The corner now faces +X at distance sqrt(2) from the center
        let d = cube.distance(&[3.0, 0.0, 0.0].into());
        assert!((d - (3.0 - std::f32::consts::SQRT_2)).abs() < 1e-5);

        let n = cube.normal(&[0.0, 0.0, 3.0].into());
        assert!(n.z > 0.5);
        assert!(n.y.abs() < 1e-6);
    }

    #[test]
    fn shape_dispatches() {
        let shape = Shape::from(sphere());
        assert!((shape.distance(&[1.0, 2.0, 6.0].into()) - 2.0).abs() < 1e-6);
    }
}
