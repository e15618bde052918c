use nalgebra::{Point2, Point3, Unit, Vector2, Vector3};

pub type FloatType = f32;

/// Vectors shorter than this are treated as zero.
pub const EPSILON: FloatType = 1e-6;

pub type ScreenPoint = Point2<u32>;
pub type ScreenSize = Vector2<u32>;

pub type WorldPoint = Point3<FloatType>;
pub type WorldVector = Vector3<FloatType>;

#[derive(Copy, Clone, Debug)]
pub struct Ray {
    pub origin: WorldPoint,
    pub direction: Unit<WorldVector>,
}

impl Ray {
    pub fn new(origin: WorldPoint, direction: WorldVector) -> Ray {
        Ray {
            origin,
            direction: Unit::new_normalize(direction),
        }
    }

    pub fn point_at(&self, distance: FloatType) -> WorldPoint {
        self.origin + self.direction.as_ref() * distance
    }
}

/// Surface found by the marcher.
#[derive(Copy, Clone, Debug)]
pub struct Hit {
    pub location: WorldPoint,
    pub normal: Unit<WorldVector>,
    /// Index of the volume that was hit
    pub volume: usize,
    /// Distance travelled along the ray before the hit
    pub distance: FloatType,
    pub steps: u32,
}

#[cfg(test)]
mod test {
    use super::*;
    use assert2::assert;

    #[test]
    fn ray_direction_is_normalized() {
        let ray = Ray::new(WorldPoint::origin(), WorldVector::new(3.0, 0.0, 4.0));
        assert!((ray.direction.norm() - 1.0).abs() < 1e-6);
        assert!((ray.point_at(5.0) - WorldPoint::new(3.0, 0.0, 4.0)).norm() < 1e-5);
    }
}
