use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec3};
use lumen_scene::lighting::{self, AnimatedColor};
use lumen_scene::{
    Attenuation, DirectionalLight, FlyCamera, FrameTime, POINT_LIGHT_COUNT, PointLight,
    SceneLighting, SpotLight,
};

// Every member is a vec4 or mat4 so the Rust layout matches WGSL uniform
// alignment without explicit padding fields.

#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct DirLightUniform {
    pub direction: [f32; 4],
    pub ambient: [f32; 4],
    pub diffuse: [f32; 4],
    pub specular: [f32; 4],
}

#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct PointLightUniform {
    pub position: [f32; 4],
    pub ambient: [f32; 4],
    pub diffuse: [f32; 4],
    pub specular: [f32; 4],
    pub attenuation: [f32; 4],
}

#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct SpotLightUniform {
    pub position: [f32; 4],
    pub direction: [f32; 4],
    pub ambient: [f32; 4],
    pub diffuse: [f32; 4],
    pub specular: [f32; 4],
    pub attenuation: [f32; 4],
    pub cone: [f32; 4],
}

/// Per-frame uniform block, bound at group 0 binding 0.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct FrameUniforms {
    pub view: [[f32; 4]; 4],
    pub projection: [[f32; 4]; 4],
    pub model: [[f32; 4]; 4],
    pub normal_matrix: [[f32; 4]; 4],
    pub view_pos: [f32; 4],
    pub dir_light: DirLightUniform,
    pub point_lights: [PointLightUniform; POINT_LIGHT_COUNT],
    pub spot_light: SpotLightUniform,
    /// sine_time, mix_t, shininess, elapsed
    pub params: [f32; 4],
    pub emission_tint: [f32; 4],
}

fn v4(v: Vec3, w: f32) -> [f32; 4] {
    v.extend(w).to_array()
}

fn attenuation(a: &Attenuation) -> [f32; 4] {
    [a.constant, a.linear, a.quadratic, 0.0]
}

impl From<&DirectionalLight> for DirLightUniform {
    fn from(light: &DirectionalLight) -> Self {
        Self {
            direction: v4(light.direction, 0.0),
            ambient: v4(light.ambient, 1.0),
            diffuse: v4(light.diffuse, 1.0),
            specular: v4(light.specular, 1.0),
        }
    }
}

impl From<&PointLight> for PointLightUniform {
    fn from(light: &PointLight) -> Self {
        Self {
            position: v4(light.position, 1.0),
            ambient: v4(light.ambient, 1.0),
            diffuse: v4(light.diffuse, 1.0),
            specular: v4(light.specular, 1.0),
            attenuation: attenuation(&light.attenuation),
        }
    }
}

impl SpotLightUniform {
    /// The spot light sits on the camera and points where it looks.
    pub fn from_camera(light: &SpotLight, camera: &FlyCamera) -> Self {
        Self {
            position: v4(camera.position, 1.0),
            direction: v4(camera.front(), 0.0),
            ambient: v4(light.ambient, 1.0),
            diffuse: v4(light.diffuse, 1.0),
            specular: v4(light.specular, 1.0),
            attenuation: attenuation(&light.attenuation),
            cone: [light.cut_off_cos(), light.outer_cut_off_cos(), 0.0, 0.0],
        }
    }
}

impl FrameUniforms {
    pub fn build(
        camera: &FlyCamera,
        lighting: &SceneLighting,
        time: &FrameTime,
        aspect: f32,
        model: Mat4,
    ) -> Self {
        let normal_matrix = if model.determinant().abs() > f32::EPSILON {
            model.inverse().transpose()
        } else {
            Mat4::IDENTITY
        };
        let tint = AnimatedColor::at(time.elapsed).diffuse;

        Self {
            view: camera.view_matrix().to_cols_array_2d(),
            projection: camera.projection_matrix(aspect).to_cols_array_2d(),
            model: model.to_cols_array_2d(),
            normal_matrix: normal_matrix.to_cols_array_2d(),
            view_pos: v4(camera.position, 1.0),
            dir_light: (&lighting.directional).into(),
            point_lights: lighting.point_lights.each_ref().map(PointLightUniform::from),
            spot_light: SpotLightUniform::from_camera(&lighting.spot, camera),
            params: [
                lighting::sine_time(time.elapsed),
                lighting.mix_t,
                lighting.material.shininess,
                time.elapsed,
            ],
            emission_tint: v4(tint, 1.0),
        }
    }
}
