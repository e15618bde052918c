use nalgebra::Unit;

use crate::camera::Camera;
use crate::geometry::{EPSILON, FloatType, Hit, ScreenPoint, WorldVector};
use crate::marcher;
use crate::scene::Volume;
use crate::sky;
use crate::util::{Rgba, WHITE, pack_bgra};

/// Result of shading a single pixel.
#[derive(Copy, Clone, Debug)]
pub struct Sample {
    pub color: Rgba,
    pub hit: Option<Hit>,
}

/// Lambert term between the surface normal and the light direction.
/// Surfaces facing away from the light are black, zero light gives zero intensity.
pub fn light_intensity(normal: &Unit<WorldVector>, light_direction: &WorldVector) -> FloatType {
    match light_direction.try_normalize(EPSILON) {
        Some(light) => normal.dot(&light).clamp(0.0, 1.0),
        None => 0.0,
    }
}

fn surface_color(normal: &Unit<WorldVector>, light_direction: &WorldVector) -> Rgba {
    let intensity = light_intensity(normal, light_direction);
    Rgba::new(WHITE.r * intensity, WHITE.g * intensity, WHITE.b * intensity, WHITE.a)
}

/// Sky, sun disc and a marched surface combined into the final color of a pixel.
pub fn shade_pixel<V: Volume>(camera: &Camera, volumes: &[V], point: &ScreenPoint) -> Sample {
    let ray = camera.ray(point);
    let sun = camera.main_direction();

    let color = sky::sun_disc(&ray.direction, &sun)
        .unwrap_or_else(|| sky::sky_color(&ray.direction, &sun));

    let hit = marcher::march(volumes, &ray, camera.precision());
    let color = match &hit {
        // TODO: Shadows: march again from `location + normal * precision` towards
        // the main direction and darken the surface on a hit.
        Some(hit) => surface_color(&hit.normal, &sun),
        None => color,
    };

    Sample { color, hit }
}

/// Packed B, G, R, A bytes of the pixel with the given row-major index.
pub fn render_pixel<V: Volume>(camera: &Camera, volumes: &[V], index: usize) -> [u8; 4] {
    pack_bgra(shade_pixel(camera, volumes, &camera.pixel_at(index)).color)
}
