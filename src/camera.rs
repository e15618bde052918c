use assert2::assert;
use bon::bon;
use nalgebra::UnitQuaternion;

use crate::geometry::{FloatType, Ray, ScreenPoint, ScreenSize, WorldPoint, WorldVector};

#[derive(Copy, Clone, Debug)]
pub struct Camera {
    position: WorldPoint,
    rotation: UnitQuaternion<FloatType>,

    resolution: ScreenSize,
    /// Vertical field of view in degrees
    fov: FloatType,

    /// Direction towards the sun, also used as the light direction for shading.
    /// Zero means there is no sun.
    main_direction: WorldVector,

    /// Not used by the marcher, which has its own fixed range.
    far_clip_plane: FloatType,
    /// Distance under which the marcher considers a surface hit
    precision: FloatType,

    aspect_ratio: FloatType,
    /// Tangent of half of the field of view
    scale: FloatType,
}

#[bon]
impl Camera {
    #[builder]
    pub fn new(
        #[builder(default = WorldPoint::origin())] position: WorldPoint,
        #[builder(default = UnitQuaternion::identity())] rotation: UnitQuaternion<FloatType>,
        resolution: ScreenSize,
        fov: FloatType,
        main_direction: WorldVector,
        #[builder(default = 1000.0)] far_clip_plane: FloatType,
        precision: FloatType,
    ) -> Self {
        assert!(resolution.x > 0);
        assert!(resolution.y > 0);
        assert!(fov > 0.0 && fov < 180.0);
        assert!(far_clip_plane > 0.0);
        assert!(precision > 0.0);

        Camera {
            position,
            rotation,
            resolution,
            fov,
            main_direction,
            far_clip_plane,
            precision,
            aspect_ratio: resolution.x as FloatType / resolution.y as FloatType,
            scale: (fov.to_radians() / 2.0).tan(),
        }
    }
}

impl Camera {
    pub fn get_resolution(&self) -> ScreenSize {
        self.resolution
    }

    pub fn position(&self) -> WorldPoint {
        self.position
    }

    pub fn rotation(&self) -> UnitQuaternion<FloatType> {
        self.rotation
    }

    pub fn fov(&self) -> FloatType {
        self.fov
    }

    pub fn main_direction(&self) -> WorldVector {
        self.main_direction
    }

    pub fn far_clip_plane(&self) -> FloatType {
        self.far_clip_plane
    }

    pub fn precision(&self) -> FloatType {
        self.precision
    }

    /// Ray through the center of the given image pixel.
    /// Camera looks along +Z in its own space, with +Y up and +X right.
    pub fn ray(&self, point: &ScreenPoint) -> Ray {
        let u = (point.x as FloatType + 0.5) / self.resolution.x as FloatType;
        let v = (point.y as FloatType + 0.5) / self.resolution.y as FloatType;

        let px = (2.0 * u - 1.0) * self.scale * self.aspect_ratio;
        let py = (1.0 - 2.0 * v) * self.scale;

        let local = WorldVector::new(px, py, 1.0).normalize();
        Ray::new(self.position, self.rotation * local)
    }

    /// Converts a linear row-major pixel index into screen coordinates.
    pub fn pixel_at(&self, index: usize) -> ScreenPoint {
        let width = self.resolution.x as usize;
        ScreenPoint::new((index % width) as u32, (index / width) as u32)
    }

    pub fn pixel_count(&self) -> usize {
        self.resolution.x as usize * self.resolution.y as usize
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use assert2::assert;
    use test_strategy::proptest;

    fn camera(rotation: UnitQuaternion<FloatType>) -> Camera {
        Camera::builder()
            .rotation(rotation)
            .resolution(ScreenSize::new(800, 600))
            .fov(90.0)
            .main_direction(WorldVector::y())
            .precision(1e-3)
            .build()
    }

    #[test]
    fn left_right_up_down() {
        let camera = camera(UnitQuaternion::identity());

        let ray_left = camera.ray(&ScreenPoint::new(0, 300));
        let ray_right = camera.ray(&ScreenPoint::new(799, 300));
        let ray_up = camera.ray(&ScreenPoint::new(400, 0));
        let ray_down = camera.ray(&ScreenPoint::new(400, 599));

        assert!(ray_left.direction.x < 0.0);
        assert!(ray_right.direction.x > 0.0);
        assert!(ray_up.direction.y > 0.0);
        assert!(ray_down.direction.y < 0.0);
        assert!(ray_left.origin == WorldPoint::origin());
    }

    #[test]
    fn corner_pixel_of_square_image() {
        let camera = Camera::builder()
            .resolution(ScreenSize::new(2, 2))
            .fov(90.0)
            .main_direction(WorldVector::y())
            .precision(1e-2)
            .build();

        let ray = camera.ray(&ScreenPoint::new(0, 0));
        let expected = WorldVector::new(-0.5, 0.5, 1.0).normalize();
        assert!((ray.direction.as_ref() - expected).norm() < 1e-6);
    }

    #[test]
    fn fov_spans_the_height() {
        let camera = Camera::builder()
            .resolution(ScreenSize::new(2000, 1000))
            .fov(90.0)
            .main_direction(WorldVector::y())
            .precision(1e-2)
            .build();

        let top = camera.ray(&ScreenPoint::new(1000, 0)).direction;
        let left = camera.ray(&ScreenPoint::new(0, 500)).direction;

        let vertical = top.y.atan2(top.z).to_degrees();
        let horizontal = (-left.x).atan2(left.z).to_degrees();
        assert!((vertical - 45.0).abs() < 0.1);
        // Wider by the aspect ratio: atan(2)
        assert!((horizontal - 63.43).abs() < 0.1);
    }

    #[test]
    fn rotation_turns_the_view() {
        // Quarter turn around Y maps +Z onto +X
        let rotation = UnitQuaternion::from_axis_angle(
            &WorldVector::y_axis(),
            std::f32::consts::FRAC_PI_2,
        );
        let camera = Camera::builder()
            .resolution(ScreenSize::new(3, 3))
            .rotation(rotation)
            .fov(60.0)
            .main_direction(WorldVector::y())
            .precision(1e-2)
            .build();

        let ray = camera.ray(&ScreenPoint::new(1, 1));
        assert!((ray.direction.as_ref() - WorldVector::x()).norm() < 1e-5);
    }

    #[test]
    fn pixel_index_is_row_major() {
        let camera = camera(UnitQuaternion::identity());
        assert!(camera.pixel_at(0) == ScreenPoint::new(0, 0));
        assert!(camera.pixel_at(801) == ScreenPoint::new(1, 1));
        assert!(camera.pixel_count() == 480_000);
    }

    #[test]
    #[should_panic]
    fn fov_must_be_below_180() {
        Camera::builder()
            .resolution(ScreenSize::new(2, 2))
            .fov(180.0)
            .main_direction(WorldVector::y())
            .precision(1e-2)
            .build();
    }

    #[proptest]
    fn ray_directions_are_unit(
        #[strategy(0u32..800)] x: u32,
        #[strategy(0u32..600)] y: u32,
        #[strategy(-3.0f32..3.0)] yaw: f32,
        #[strategy(-1.5f32..1.5)] pitch: f32,
    ) {
        let camera = camera(UnitQuaternion::from_euler_angles(0.0, pitch, yaw));
        let ray = camera.ray(&ScreenPoint::new(x, y));
        proptest::prop_assert!((ray.direction.norm() - 1.0).abs() < 1e-5);
    }
}
