pub mod primitives;

use nalgebra::Unit;

use crate::geometry::{FloatType, WorldPoint, WorldVector};

pub use primitives::{Cuboid, Shape, Sphere};

/// Analytic shape contributing to the scene's distance field.
pub trait Volume {
    /// True signed distance from the point to the surface, negative inside.
    fn distance(&self, point: &WorldPoint) -> FloatType;

    /// Outward surface normal at (or near) the point.
    fn normal(&self, point: &WorldPoint) -> Unit<WorldVector>;
}

/// Ordered list of volumes, read only while a frame is rendered.
#[derive(Clone, Debug)]
pub struct Scene<V: Volume> {
    pub volumes: Vec<V>,
}

impl<V: Volume> Scene<V> {
    pub fn new(volumes: Vec<V>) -> Self {
        Scene { volumes }
    }

    pub fn is_empty(&self) -> bool {
        self.volumes.is_empty()
    }
}
