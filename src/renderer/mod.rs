mod machinery;
mod stats;
mod worker;

use std::num::{NonZeroU32, NonZeroUsize};

pub use crate::renderer::machinery::{RenderProgress, TileProgress, render, render_blocking};
pub use crate::renderer::stats::MarchStats;

pub const DEFAULT_TILE_SIZE: NonZeroU32 = NonZeroU32::new(64).unwrap();

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum WorkerCount {
    /// One worker pinned to each CPU core
    Auto,
    Manual(NonZeroUsize),
}

#[derive(Copy, Clone, Debug)]
pub struct RenderSettings {
    pub tile_size: NonZeroU32,
    pub worker_count: WorkerCount,
}

impl Default for RenderSettings {
    fn default() -> Self {
        RenderSettings {
            tile_size: DEFAULT_TILE_SIZE,
            worker_count: WorkerCount::Auto,
        }
    }
}
