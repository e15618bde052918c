use std::fmt::Display;

use crate::geometry::Hit;

/// Marching statistics over a set of pixels.
#[derive(Clone, Debug, PartialEq)]
pub struct MarchStats {
    pub pixels: usize,
    pub hits: usize,
    /// Fewest steps needed for a hit
    pub min_steps: u32,
    /// Most steps needed for a hit
    pub max_steps: u32,
    /// Average steps per hit
    pub avg_steps: f32,
}

impl MarchStats {
    pub fn add_pixel(&mut self, hit: Option<&Hit>) {
        self.pixels += 1;
        let Some(hit) = hit else {
            return;
        };

        self.hits += 1;
        self.min_steps = self.min_steps.min(hit.steps);
        self.max_steps = self.max_steps.max(hit.steps);
        self.avg_steps += (hit.steps as f32 - self.avg_steps) / (self.hits as f32);
    }

    pub fn merge(&self, other: &Self) -> Self {
        MarchStats {
            pixels: self.pixels + other.pixels,
            hits: self.hits + other.hits,
            min_steps: self.min_steps.min(other.min_steps),
            max_steps: self.max_steps.max(other.max_steps),
            avg_steps: if self.hits > 0 || other.hits > 0 {
                (self.avg_steps * self.hits as f32 + other.avg_steps * other.hits as f32)
                    / (self.hits + other.hits) as f32
            } else {
                0.0
            },
        }
    }

    pub fn hit_ratio(&self) -> f32 {
        if self.pixels == 0 {
            0.0
        } else {
            self.hits as f32 / self.pixels as f32
        }
    }
}

impl Default for MarchStats {
    fn default() -> Self {
        MarchStats {
            pixels: 0,
            hits: 0,
            min_steps: u32::MAX,
            max_steps: 0,
            avg_steps: 0.0,
        }
    }
}

impl Display for MarchStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} pixels, {} hits", self.pixels, self.hits)?;
        if self.hits > 0 {
            write!(
                f,
                "; steps per hit {} - {}, avg {:.1}",
                self.min_steps, self.max_steps, self.avg_steps
            )?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{WorldPoint, WorldVector};
    use assert2::assert;
    use nalgebra::Unit;

    fn hit(steps: u32) -> Hit {
        Hit {
            location: WorldPoint::origin(),
            normal: Unit::new_normalize(WorldVector::y()),
            volume: 0,
            distance: 1.0,
            steps,
        }
    }

    #[test]
    fn misses_only_count_pixels() {
        let mut s = MarchStats::default();
        s.add_pixel(None);
        s.add_pixel(None);
        assert!(s.pixels == 2);
        assert!(s.hits == 0);
        assert!(s.hit_ratio() == 0.0);
    }

    #[test]
    fn add_hits() {
        let mut s = MarchStats::default();
        s.add_pixel(Some(&hit(4)));
        s.add_pixel(Some(&hit(8)));
        s.add_pixel(None);
        assert!(s.hits == 2);
        assert!(s.min_steps == 4);
        assert!(s.max_steps == 8);
        assert!(s.avg_steps == 6.0);
    }

    #[test]
    fn merge_stats() {
        let mut a = MarchStats::default();
        a.add_pixel(Some(&hit(10)));
        let mut b = MarchStats::default();
        b.add_pixel(Some(&hit(30)));
        b.add_pixel(Some(&hit(50)));
        b.add_pixel(None);

        let m = a.merge(&b);
        assert!(m.pixels == 4);
        assert!(m.hits == 3);
        assert!(m.min_steps == 10);
        assert!(m.max_steps == 50);
        assert!(m.avg_steps == 30.0);
        assert!(m.hit_ratio() == 0.75);
    }

    #[test]
    fn merge_two_default() {
        let default = MarchStats::default();
        assert!(default.merge(&default) == default);
    }

    #[test]
    fn display_format() {
        let mut s = MarchStats::default();
        s.add_pixel(Some(&hit(42)));
        let output = format!("{}", s);
        assert!(output.contains("1 pixels, 1 hits"));
        assert!(output.contains("42 - 42"));
        assert!(output.contains("avg 42.0"));
    }
}
