//! Procedural sky: a day / sunset / night gradient driven by the sun altitude,
//! and the sun disc itself.

use crate::geometry::{EPSILON, FloatType, WorldVector};
use crate::util::{BLACK, Rgba, WHITE, lerp};

const fn opaque(r: FloatType, g: FloatType, b: FloatType) -> Rgba {
    Rgba { r, g, b, a: 1.0 }
}

const HORIZON_DAY: Rgba = opaque(0.82, 0.92, 0.98);
const HORIZON_SUNSET: Rgba = opaque(1.0, 0.48, 0.0);
const NIGHT: Rgba = BLACK;
const HIGH_ATMOSPHERE: Rgba = opaque(0.23, 0.41, 0.70);
const GROUND_ATMOSPHERE: Rgba = opaque(0.58, 0.53, 0.45);

const SUN_DAY: Rgba = WHITE;
const SUN_SET: Rgba = opaque(1.0, 0.33, 0.0);

/// Squared distance between unit vectors under which a ray looks into the sun.
pub const SUN_DISC_SIZE: FloatType = 0.0025;

/// Normalized sun direction, `None` if there is no sun.
fn sun(sun_direction: &WorldVector) -> Option<WorldVector> {
    sun_direction.try_normalize(EPSILON)
}

/// Background color seen along a normalized direction.
/// Zero sun direction gives a black sky.
pub fn sky_color(direction: &WorldVector, sun_direction: &WorldVector) -> Rgba {
    let Some(sun) = sun(sun_direction) else {
        return BLACK;
    };

    let sun_altitude = sun.y.abs();

    let (horizon, high, ground) = if sun.y < 0.0 {
        (
            lerp(HORIZON_SUNSET, NIGHT, sun_altitude.sqrt()),
            NIGHT,
            NIGHT,
        )
    } else {
        (
            lerp(HORIZON_SUNSET, HORIZON_DAY, sun_altitude.sqrt()),
            lerp(NIGHT, HIGH_ATMOSPHERE, sun_altitude.powf(0.6)),
            lerp(NIGHT, GROUND_ATMOSPHERE, sun_altitude.powf(0.6)),
        )
    };

    if direction.y > 0.0 {
        lerp(horizon, high, direction.y.powf(0.8))
    } else {
        lerp(horizon, ground, direction.y.abs().powf(0.25))
    }
}

/// Color of the sun disc if the direction looks into it.
/// Only directions above the horizon see the sun.
pub fn sun_disc(direction: &WorldVector, sun_direction: &WorldVector) -> Option<Rgba> {
    let sun = sun(sun_direction)?;

    if (direction - sun).norm_squared() >= SUN_DISC_SIZE || direction.y <= 0.0 {
        return None;
    }

    if sun.y < 0.0 {
        Some(lerp(SUN_SET, SUN_DAY, (sun.y.abs() * 2.0).sqrt()))
    } else {
        Some(SUN_DAY)
    }
}
