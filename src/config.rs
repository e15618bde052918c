//! Scene description files.
//!
//! A scene is a TOML document with a `[camera]` table, an optional `[render]`
//! table and a list of `[[volumes]]`:
//!
//! ```toml
//! [camera]
//! resolution = [1024, 768]
//! fov = 60.0
//! position = [0.0, 1.0, -6.0]
//! rotation = [0.0, 0.0, 0.0]   # roll, pitch, yaw in degrees
//! main_direction = [0.4, 0.5, -0.7]
//! precision = 0.001
//!
//! [[volumes]]
//! type = "sphere"
//! center = [0.0, 1.0, 0.0]
//! radius = 1.0
//! ```

use std::{
    fs,
    num::{NonZeroU32, NonZeroUsize},
    path::Path,
};

use nalgebra::UnitQuaternion;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{
    camera::Camera,
    error::ConfigError,
    geometry::{FloatType, ScreenSize, WorldPoint, WorldVector},
    renderer::{DEFAULT_TILE_SIZE, RenderSettings, WorkerCount},
    scene::{Cuboid, Scene, Shape, Sphere},
};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    pub camera: CameraConfig,
    #[serde(default)]
    pub render: RenderConfig,
    #[serde(default)]
    pub volumes: Vec<VolumeConfig>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CameraConfig {
    pub resolution: [u32; 2],
    /// Vertical field of view in degrees
    pub fov: FloatType,
    #[serde(default)]
    pub position: [FloatType; 3],
    /// Roll, pitch and yaw in degrees
    #[serde(default)]
    pub rotation: [FloatType; 3],
    /// Sun direction, zero for no sun
    pub main_direction: [FloatType; 3],
    #[serde(default = "default_far_clip_plane")]
    pub far_clip_plane: FloatType,
    pub precision: FloatType,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RenderConfig {
    #[serde(default = "default_tile_size")]
    pub tile_size: u32,
    /// Number of worker threads, zero or missing for one per core
    #[serde(default)]
    pub workers: usize,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase", deny_unknown_fields)]
pub enum VolumeConfig {
    Sphere {
        center: [FloatType; 3],
        radius: FloatType,
    },
    Box {
        position: [FloatType; 3],
        /// Edge lengths
        scale: [FloatType; 3],
        /// Roll, pitch and yaw in degrees
        #[serde(default)]
        rotation: [FloatType; 3],
    },
}

fn default_far_clip_plane() -> FloatType {
    1000.0
}

fn default_tile_size() -> u32 {
    DEFAULT_TILE_SIZE.get()
}

fn euler_degrees(angles: &[FloatType; 3]) -> UnitQuaternion<FloatType> {
    UnitQuaternion::from_euler_angles(
        angles[0].to_radians(),
        angles[1].to_radians(),
        angles[2].to_radians(),
    )
}

impl Default for RenderConfig {
    fn default() -> Self {
        RenderConfig {
            tile_size: default_tile_size(),
            workers: 0,
        }
    }
}

impl Default for Config {
    /// Demo scene: a sphere and a tilted box in the afternoon sun.
    fn default() -> Self {
        Config {
            camera: CameraConfig {
                resolution: [1024, 768],
                fov: 60.0,
                position: [0.0, 1.0, -6.0],
                rotation: [0.0, 5.0, 0.0],
                main_direction: [0.4, 0.5, -0.7],
                far_clip_plane: default_far_clip_plane(),
                precision: 0.001,
            },
            render: RenderConfig::default(),
            volumes: vec![
                VolumeConfig::Sphere {
                    center: [1.0, 0.5, 0.0],
                    radius: 1.0,
                },
                VolumeConfig::Box {
                    position: [-2.0, 0.0, 0.0],
                    scale: [1.0, 1.0, 1.0],
                    rotation: [0.0, 20.0, 0.0],
                },
            ],
        }
    }
}

impl Config {
    pub fn load(path: impl AsRef<Path>) -> Result<Config, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ConfigError::ReadError {
            path: path.to_owned(),
            source,
        })?;
        let config = Self::from_toml_str(&content)?;
        debug!(path = %path.display(), volumes = config.volumes.len(), "Loaded scene");
        Ok(config)
    }

    pub fn from_toml_str(content: &str) -> Result<Config, ConfigError> {
        let config: Config = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks the values that would otherwise trip the camera and primitive contracts.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let camera = &self.camera;
        let [width, height] = camera.resolution;
        if width == 0 || height == 0 {
            return Err(ConfigError::InvalidResolution { width, height });
        }
        if !(camera.fov > 0.0 && camera.fov < 180.0) {
            return Err(ConfigError::InvalidFov(camera.fov));
        }
        if !(camera.precision > 0.0) {
            return Err(ConfigError::InvalidPrecision(camera.precision));
        }
        if !(camera.far_clip_plane > 0.0) {
            return Err(ConfigError::InvalidFarClipPlane(camera.far_clip_plane));
        }
        if self.render.tile_size == 0 {
            return Err(ConfigError::InvalidTileSize);
        }

        for (index, volume) in self.volumes.iter().enumerate() {
            let invalid = |reason: &str| ConfigError::InvalidVolume {
                index,
                reason: reason.to_owned(),
            };
            match volume {
                VolumeConfig::Sphere { radius, .. } => {
                    if !(*radius > 0.0) {
                        return Err(invalid("sphere radius must be positive"));
                    }
                }
                VolumeConfig::Box { scale, .. } => {
                    if !scale.iter().all(|s| *s > 0.0) {
                        return Err(invalid("box scale must be positive"));
                    }
                }
            }
        }

        Ok(())
    }

    pub fn camera(&self) -> Camera {
        let camera = &self.camera;
        Camera::builder()
            .resolution(ScreenSize::from(camera.resolution))
            .fov(camera.fov)
            .position(WorldPoint::from(camera.position))
            .rotation(euler_degrees(&camera.rotation))
            .main_direction(WorldVector::from(camera.main_direction))
            .far_clip_plane(camera.far_clip_plane)
            .precision(camera.precision)
            .build()
    }

    pub fn scene(&self) -> Scene<Shape> {
        Scene::new(
            self.volumes
                .iter()
                .map(|volume| match volume {
                    VolumeConfig::Sphere { center, radius } => Sphere {
                        center: WorldPoint::from(*center),
                        radius: *radius,
                    }
                    .into(),
                    VolumeConfig::Box {
                        position,
                        scale,
                        rotation,
                    } => Cuboid {
                        position: WorldPoint::from(*position),
                        scale: WorldVector::from(*scale),
                        rotation: euler_degrees(rotation),
                    }
                    .into(),
                })
                .collect(),
        )
    }

    pub fn render_settings(&self) -> RenderSettings {
        RenderSettings {
            tile_size: NonZeroU32::new(self.render.tile_size).unwrap_or(DEFAULT_TILE_SIZE),
            worker_count: match NonZeroUsize::new(self.render.workers) {
                Some(count) => WorkerCount::Manual(count),
                None => WorkerCount::Auto,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::Volume;
    use assert2::{assert, let_assert};
    use test_case::test_case;

    const MINIMAL: &str = r#"
        [camera]
        resolution = [2, 2]
        fov = 90.0
        main_direction = [0.0, 1.0, 0.0]
        precision = 0.01

        [[volumes]]
        type = "sphere"
        center = [0.0, 0.0, 5.0]
        radius = 1.0
    "#;

    #[test]
    fn minimal_scene() {
        let config = Config::from_toml_str(MINIMAL).unwrap();
        let camera = config.camera();
        assert!(camera.get_resolution() == ScreenSize::new(2, 2));
        assert!(camera.position() == WorldPoint::origin());
        assert!(camera.far_clip_plane() == 1000.0);

        let scene = config.scene();
        assert!(scene.volumes.len() == 1);
        assert!((scene.volumes[0].distance(&WorldPoint::origin()) - 4.0).abs() < 1e-6);

        let settings = config.render_settings();
        assert!(settings.tile_size == DEFAULT_TILE_SIZE);
        assert!(settings.worker_count == WorkerCount::Auto);
    }

    #[test]
    fn demo_file_matches_default() {
        let config = Config::from_toml_str(include_str!("../scenes/demo.toml")).unwrap();
        assert!(config == Config::default());
    }

    #[test]
    fn default_is_valid() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn box_with_rotation() {
        let config = Config::from_toml_str(
            r#"
            [camera]
            resolution = [4, 4]
            fov = 60.0
            main_direction = [0.0, 0.0, 0.0]
            precision = 0.01

            [render]
            tile_size = 2
            workers = 3

            [[volumes]]
            type = "box"
            position = [0.0, 0.0, 0.0]
            scale = [2.0, 2.0, 2.0]
            rotation = [0.0, 0.0, 45.0]
            "#,
        )
        .unwrap();

        let scene = config.scene();
        let_assert!([Shape::Cuboid(cuboid)] = scene.volumes.as_slice());
        let d = cuboid.distance(&WorldPoint::new(3.0, 0.0, 0.0));
        assert!((d - (3.0 - std::f32::consts::SQRT_2)).abs() < 1e-5);

        let settings = config.render_settings();
        assert!(settings.tile_size.get() == 2);
        assert!(settings.worker_count == WorkerCount::Manual(NonZeroUsize::new(3).unwrap()));
    }

    #[test_case("resolution = [0, 2]", "fov = 90.0" ; "zero resolution")]
    #[test_case("resolution = [2, 2]", "fov = 180.0" ; "fov too wide")]
    #[test_case("resolution = [2, 2]", "fov = 0.0" ; "zero fov")]
    fn invalid_camera(resolution: &str, fov: &str) {
        let content = format!(
            "[camera]\n{resolution}\n{fov}\nmain_direction = [0.0, 1.0, 0.0]\nprecision = 0.01\n"
        );
        let_assert!(Err(error) = Config::from_toml_str(&content));
        assert!(matches!(
            error,
            ConfigError::InvalidResolution { .. } | ConfigError::InvalidFov(_)
        ));
    }

    #[test]
    fn invalid_radius() {
        let content = MINIMAL.replace("radius = 1.0", "radius = -1.0");
        let_assert!(Err(ConfigError::InvalidVolume { index: 0, .. }) = Config::from_toml_str(&content));
    }

    #[test]
    fn unknown_volume_type() {
        let content = MINIMAL.replace("\"sphere\"", "\"torus\"");
        let_assert!(Err(ConfigError::ParseError(_)) = Config::from_toml_str(&content));
    }

    #[test]
    fn missing_file() {
        let_assert!(
            Err(ConfigError::ReadError { .. }) = Config::load("/nonexistent/minimarch/scene.toml")
        );
    }
}
