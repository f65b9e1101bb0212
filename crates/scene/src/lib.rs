//! Scene state for the lit-model viewer.
//!
//! Everything here is GPU-free: the fly camera, the frame clock, the fixed
//! lighting rig and the startup config. The render backend reads these values
//! once per frame and never writes them back.
//!
//! # Invariants
//! - Camera basis vectors stay orthonormal after every mutation.
//! - Point-light positions are constant for the lifetime of the process.

pub mod camera;
pub mod clock;
pub mod config;
pub mod lighting;
pub mod mouse;

pub use camera::{CameraMovement, FlyCamera};
pub use clock::{FrameClock, FrameTime};
pub use config::{CameraConfig, ConfigError, ModelTransform, SceneConfig, WindowConfig};
pub use lighting::{
    AnimatedColor, Attenuation, DirectionalLight, MaterialParams, PointLight, SceneLighting,
    SpotLight, POINT_LIGHT_COUNT, POINT_LIGHT_POSITIONS,
};
pub use mouse::MouseLook;
