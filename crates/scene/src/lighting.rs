//! Fixed lighting rig: one directional light, four point lights and a spot
//! light that rides on the camera, plus the material scalars the fragment
//! shader reads.
//!
//! Every type here defaults to the scene's stock constants, so a config file
//! only has to name the values it changes.

use glam::Vec3;
use serde::{Deserialize, Serialize};

pub const POINT_LIGHT_COUNT: usize = 4;

pub const POINT_LIGHT_POSITIONS: [Vec3; POINT_LIGHT_COUNT] = [
    Vec3::new(0.7, 0.2, 2.0),
    Vec3::new(2.3, -3.3, -4.0),
    Vec3::new(-4.0, 2.0, -12.0),
    Vec3::new(0.0, 0.0, -3.0),
];

/// Distance falloff `1 / (constant + linear * d + quadratic * d^2)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Attenuation {
    pub constant: f32,
    pub linear: f32,
    pub quadratic: f32,
}

impl Default for Attenuation {
    fn default() -> Self {
        Self {
            constant: 1.0,
            linear: 0.09,
            quadratic: 0.032,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DirectionalLight {
    pub direction: Vec3,
    pub ambient: Vec3,
    pub diffuse: Vec3,
    pub specular: Vec3,
}

impl Default for DirectionalLight {
    fn default() -> Self {
        Self {
            direction: Vec3::new(-0.2, -1.0, -0.3),
            ambient: Vec3::splat(0.05),
            diffuse: Vec3::splat(0.4),
            specular: Vec3::splat(0.5),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PointLight {
    pub position: Vec3,
    pub ambient: Vec3,
    pub diffuse: Vec3,
    pub specular: Vec3,
    pub attenuation: Attenuation,
}

impl PointLight {
    pub fn at(position: Vec3) -> Self {
        Self {
            position,
            ambient: Vec3::splat(0.05),
            diffuse: Vec3::splat(0.8),
            specular: Vec3::ONE,
            attenuation: Attenuation::default(),
        }
    }
}

impl Default for PointLight {
    fn default() -> Self {
        Self::at(Vec3::ZERO)
    }
}

/// Flashlight cone. Position and direction are taken from the camera each
/// frame, so only the colour terms and the cone live here.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpotLight {
    pub ambient: Vec3,
    pub diffuse: Vec3,
    pub specular: Vec3,
    pub attenuation: Attenuation,
    /// Inner cone half-angle in degrees.
    pub cut_off: f32,
    /// Outer cone half-angle in degrees; intensity fades to zero between the two.
    pub outer_cut_off: f32,
}

impl Default for SpotLight {
    fn default() -> Self {
        Self {
            ambient: Vec3::ZERO,
            diffuse: Vec3::ONE,
            specular: Vec3::ONE,
            attenuation: Attenuation::default(),
            cut_off: 12.5,
            outer_cut_off: 15.0,
        }
    }
}

impl SpotLight {
    pub fn cut_off_cos(&self) -> f32 {
        self.cut_off.to_radians().cos()
    }

    pub fn outer_cut_off_cos(&self) -> f32 {
        self.outer_cut_off.to_radians().cos()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MaterialParams {
    /// Specular colour used when a mesh has no specular map.
    pub specular: Vec3,
    pub shininess: f32,
}

impl Default for MaterialParams {
    fn default() -> Self {
        Self {
            specular: Vec3::splat(0.5),
            shininess: 64.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneLighting {
    pub directional: DirectionalLight,
    pub point_lights: [PointLight; POINT_LIGHT_COUNT],
    pub spot: SpotLight,
    pub material: MaterialParams,
    /// Blend factor for the emission map.
    pub mix_t: f32,
}

impl Default for SceneLighting {
    fn default() -> Self {
        Self {
            directional: DirectionalLight::default(),
            point_lights: POINT_LIGHT_POSITIONS.map(PointLight::at),
            spot: SpotLight::default(),
            material: MaterialParams::default(),
            mix_t: 0.2,
        }
    }
}

/// Time-varying light colour and the diffuse/ambient terms derived from it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnimatedColor {
    pub light: Vec3,
    pub diffuse: Vec3,
    pub ambient: Vec3,
}

impl AnimatedColor {
    pub fn at(elapsed: f32) -> Self {
        let light = Vec3::new(
            (elapsed * 2.0).sin(),
            (elapsed * 0.7).sin(),
            (elapsed * 1.3).sin(),
        );
        let diffuse = light * 0.5;
        let ambient = diffuse * 0.2;
        Self {
            light,
            diffuse,
            ambient,
        }
    }
}

/// Fast pulse fed to the shader as `sine_time`.
pub fn sine_time(elapsed: f32) -> f32 {
    (10.0 * elapsed).sin()
}
