use crate::lighting::SceneLighting;
use glam::Vec3;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Errors from loading a scene config file.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config {path}: {source}")]
    Yaml {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub width: u32,
    pub height: u32,
    pub title: String,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: 800,
            height: 600,
            title: "LearnOpenGL".into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    pub position: Vec3,
    /// Degrees.
    pub yaw: f32,
    /// Degrees.
    pub pitch: f32,
    pub speed: f32,
    pub sensitivity: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            position: Vec3::new(0.0, 0.0, 3.0),
            yaw: crate::camera::DEFAULT_YAW,
            pitch: crate::camera::DEFAULT_PITCH,
            speed: crate::camera::DEFAULT_SPEED,
            sensitivity: crate::camera::DEFAULT_SENSITIVITY,
        }
    }
}

impl CameraConfig {
    pub fn build(&self) -> crate::FlyCamera {
        let mut camera =
            crate::FlyCamera::with_orientation(self.position, Vec3::Y, self.yaw, self.pitch);
        camera.speed = self.speed;
        camera.sensitivity = self.sensitivity;
        camera
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelTransform {
    pub translation: Vec3,
    pub scale: Vec3,
}

impl Default for ModelTransform {
    fn default() -> Self {
        Self {
            translation: Vec3::ZERO,
            scale: Vec3::ONE,
        }
    }
}

impl ModelTransform {
    pub fn matrix(&self) -> glam::Mat4 {
        glam::Mat4::from_translation(self.translation) * glam::Mat4::from_scale(self.scale)
    }
}

/// Everything the viewer reads at startup.
///
/// All fields default to the stock scene, so an empty YAML document is valid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    pub window: WindowConfig,
    pub model: PathBuf,
    /// WGSL file to use instead of the built-in shader.
    pub shader: Option<PathBuf>,
    /// Flip decoded images vertically before upload.
    pub flip_textures: bool,
    pub clear_color: [f64; 4],
    pub camera: CameraConfig,
    pub model_transform: ModelTransform,
    pub lighting: SceneLighting,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            window: WindowConfig::default(),
            model: PathBuf::from("models/scene.gltf"),
            shader: None,
            flip_textures: false,
            clear_color: [0.2, 0.3, 0.3, 1.0],
            camera: CameraConfig::default(),
            model_transform: ModelTransform::default(),
            lighting: SceneLighting::default(),
        }
    }
}

impl SceneConfig {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_yaml(&text).map_err(|source| ConfigError::Yaml {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::debug!("loaded scene config from {}", path.display());
        Ok(config)
    }

    pub fn from_yaml(text: &str) -> Result<Self, serde_yaml::Error> {
        // serde_yaml rejects an empty document for a struct; treat it as all defaults.
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn empty_document_is_default() {
        assert_eq!(SceneConfig::from_yaml("").unwrap(), SceneConfig::default());
        assert_eq!(SceneConfig::from_yaml("  \n").unwrap(), SceneConfig::default());
    }

    #[test]
    fn partial_document_keeps_other_defaults() {
        let yaml = r#"
window:
  width: 1280
model: assets/helmet.glb
lighting:
  material:
    shininess: 32.0
  spot:
    cut_off: 10.0
"#;
        let config = SceneConfig::from_yaml(yaml).unwrap();
        assert_eq!(config.window.width, 1280);
        assert_eq!(config.window.height, 600);
        assert_eq!(config.window.title, "LearnOpenGL");
        assert_eq!(config.model, PathBuf::from("assets/helmet.glb"));
        assert_eq!(config.lighting.material.shininess, 32.0);
        assert_eq!(config.lighting.material.specular, Vec3::splat(0.5));
        assert_eq!(config.lighting.spot.cut_off, 10.0);
        assert_eq!(config.lighting.spot.outer_cut_off, 15.0);
        assert_eq!(config.lighting.point_lights, SceneLighting::default().point_lights);
    }

    #[test]
    fn yaml_roundtrip_preserves_lighting() {
        let mut config = SceneConfig::default();
        config.lighting.mix_t = 0.7;
        config.shader = Some(PathBuf::from("shaders/custom.wgsl"));
        let text = serde_yaml::to_string(&config).unwrap();
        assert_eq!(SceneConfig::from_yaml(&text).unwrap(), config);
    }

    #[test]
    fn load_from_file() {
        let mut tmp = tempfile::NamedTempFile::new().unwrap();
        writeln!(tmp, "flip_textures: true\ncamera:\n  speed: 5.0").unwrap();
        let config = SceneConfig::load(tmp.path()).unwrap();
        assert!(config.flip_textures);
        let camera = config.camera.build();
        assert_eq!(camera.speed, 5.0);
        assert_eq!(camera.sensitivity, 0.1);
    }

    #[test]
    fn missing_file_is_io_error() {
        let tmp = tempfile::tempdir().unwrap();
        let err = SceneConfig::load(tmp.path().join("nope.yaml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
        assert!(err.to_string().contains("nope.yaml"));
    }

    #[test]
    fn malformed_file_is_yaml_error() {
        let mut tmp = tempfile::NamedTempFile::new().unwrap();
        writeln!(tmp, "window: [1, 2").unwrap();
        let err = SceneConfig::load(tmp.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Yaml { .. }));
    }

    #[test]
    fn shipped_config_is_stock_scene() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("../../config/scene.yaml");
        assert_eq!(SceneConfig::load(path).unwrap(), SceneConfig::default());
    }

    #[test]
    fn model_transform_default_is_identity() {
        assert_eq!(ModelTransform::default().matrix(), glam::Mat4::IDENTITY);
    }
}
