mod camera;
pub mod config;
mod error;
pub mod frame;
pub mod geometry;
pub mod marcher;
mod renderer;
pub mod scene;
mod screen_block;
pub mod shading;
pub mod sky;
pub mod util;

pub use crate::renderer::{
    DEFAULT_TILE_SIZE, MarchStats, RenderProgress, RenderSettings, TileProgress, WorkerCount,
    render, render_blocking,
};
pub use camera::Camera;
pub use config::Config;
pub use error::ConfigError;
pub use scene::Scene;
pub use screen_block::ScreenBlock;
