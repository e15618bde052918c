use crate::geometry::{FloatType, Hit, Ray, WorldPoint};
use crate::scene::Volume;

/// Rays that travel this far without hitting anything are a miss.
pub const MAX_DISTANCE: FloatType = 100.0;

/// Finds the volume nearest to the point.
/// Returns its index and signed distance, the first one wins ties.
/// `None` for an empty scene.
pub fn closest_volume<V: Volume>(volumes: &[V], point: &WorldPoint) -> Option<(usize, FloatType)> {
    let mut closest: Option<(usize, FloatType)> = None;
    for (index, volume) in volumes.iter().enumerate() {
        let distance = volume.distance(point);
        if closest.is_none_or(|(_, best)| distance < best) {
            closest = Some((index, distance));
        }
    }
    closest
}

/// Sphere traces the ray through the volumes.
///
/// The probe advances by the distance to the closest volume until that distance
/// drops under `precision` (a hit) or the ray travels `MAX_DISTANCE` (a miss).
/// An empty scene is always a miss.
///
/// Every step that is not a hit advances by at least `precision`, so the number
/// of steps is bounded by `MAX_DISTANCE / precision`.
pub fn march<V: Volume>(volumes: &[V], ray: &Ray, precision: FloatType) -> Option<Hit> {
    let mut probe = ray.origin;
    let mut traveled: FloatType = 0.0;
    let mut steps = 0;

    while traveled < MAX_DISTANCE {
        let (index, distance) = closest_volume(volumes, &probe)?;

        if distance < precision {
            return Some(Hit {
                location: probe,
                normal: volumes[index].normal(&probe),
                volume: index,
                distance: traveled,
                steps,
            });
        }

        let next = traveled + distance;
        // NaN distance, or a step too small to move the ray at all
        if !(next > traveled) {
            return None;
        }

        probe += ray.direction.as_ref() * distance;
        traveled = next;
        steps += 1;
    }

    None
}
