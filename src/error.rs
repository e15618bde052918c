use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read {path}: {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse scene: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Resolution must be positive, got {width}x{height}")]
    InvalidResolution { width: u32, height: u32 },

    #[error("Field of view must be between 0 and 180 degrees, got {0}")]
    InvalidFov(f32),

    #[error("Precision must be positive, got {0}")]
    InvalidPrecision(f32),

    #[error("Far clip plane must be positive, got {0}")]
    InvalidFarClipPlane(f32),

    #[error("Tile size must be positive")]
    InvalidTileSize,

    #[error("Volume #{index}: {reason}")]
    InvalidVolume { index: usize, reason: String },
}
