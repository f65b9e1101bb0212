/// WGSL shader for the lit model: one directional light, four point lights and
/// a camera spot light over diffuse/specular/emission maps.
///
/// The `Frame` block must stay in sync with `uniforms::FrameUniforms`.
pub const LIT_SHADER: &str = r#"
struct DirLight {
    direction: vec4<f32>,
    ambient: vec4<f32>,
    diffuse: vec4<f32>,
    specular: vec4<f32>,
};

struct PointLight {
    position: vec4<f32>,
    ambient: vec4<f32>,
    diffuse: vec4<f32>,
    specular: vec4<f32>,
    // constant, linear, quadratic
    attenuation: vec4<f32>,
};

struct SpotLight {
    position: vec4<f32>,
    direction: vec4<f32>,
    ambient: vec4<f32>,
    diffuse: vec4<f32>,
    specular: vec4<f32>,
    attenuation: vec4<f32>,
    // cos(inner), cos(outer)
    cone: vec4<f32>,
};

const POINT_LIGHTS: u32 = 4u;

struct Frame {
    view: mat4x4<f32>,
    projection: mat4x4<f32>,
    model: mat4x4<f32>,
    normal_matrix: mat4x4<f32>,
    view_pos: vec4<f32>,
    dir_light: DirLight,
    point_lights: array<PointLight, 4>,
    spot_light: SpotLight,
    // sine_time, mix_t, shininess, elapsed
    params: vec4<f32>,
    emission_tint: vec4<f32>,
};

@group(0) @binding(0)
var<uniform> frame: Frame;

@group(1) @binding(0)
var diffuse_map: texture_2d<f32>;
@group(1) @binding(1)
var specular_map: texture_2d<f32>;
@group(1) @binding(2)
var emission_map: texture_2d<f32>;
@group(1) @binding(3)
var material_sampler: sampler;

struct VertexInput {
    @location(0) position: vec3<f32>,
    @location(1) normal: vec3<f32>,
    @location(2) tex_coords: vec2<f32>,
};

struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) world_pos: vec3<f32>,
    @location(1) normal: vec3<f32>,
    @location(2) tex_coords: vec2<f32>,
};

@vertex
fn vs_main(vertex: VertexInput) -> VertexOutput {
    let world = frame.model * vec4<f32>(vertex.position, 1.0);
    let normal_matrix = mat3x3<f32>(
        frame.normal_matrix[0].xyz,
        frame.normal_matrix[1].xyz,
        frame.normal_matrix[2].xyz,
    );

    var out: VertexOutput;
    out.clip_position = frame.projection * frame.view * world;
    out.world_pos = world.xyz;
    out.normal = normal_matrix * vertex.normal;
    out.tex_coords = vertex.tex_coords;
    return out;
}

fn phong(
    light_dir: vec3<f32>,
    normal: vec3<f32>,
    view_dir: vec3<f32>,
    ambient: vec3<f32>,
    diffuse: vec3<f32>,
    specular: vec3<f32>,
    albedo: vec3<f32>,
    spec_sample: vec3<f32>,
) -> array<vec3<f32>, 3> {
    let diff = max(dot(normal, light_dir), 0.0);
    let reflect_dir = reflect(-light_dir, normal);
    let spec = pow(max(dot(view_dir, reflect_dir), 0.0), frame.params.z);
    return array<vec3<f32>, 3>(
        ambient * albedo,
        diffuse * diff * albedo,
        specular * spec * spec_sample,
    );
}

fn attenuate(attenuation: vec4<f32>, distance: f32) -> f32 {
    return 1.0 / (attenuation.x + attenuation.y * distance + attenuation.z * distance * distance);
}

fn calc_dir_light(light: DirLight, normal: vec3<f32>, view_dir: vec3<f32>, albedo: vec3<f32>, spec_sample: vec3<f32>) -> vec3<f32> {
    let light_dir = normalize(-light.direction.xyz);
    let terms = phong(light_dir, normal, view_dir, light.ambient.xyz, light.diffuse.xyz, light.specular.xyz, albedo, spec_sample);
    return terms[0] + terms[1] + terms[2];
}

fn calc_point_light(light: PointLight, normal: vec3<f32>, frag_pos: vec3<f32>, view_dir: vec3<f32>, albedo: vec3<f32>, spec_sample: vec3<f32>) -> vec3<f32> {
    let to_light = light.position.xyz - frag_pos;
    let light_dir = normalize(to_light);
    let terms = phong(light_dir, normal, view_dir, light.ambient.xyz, light.diffuse.xyz, light.specular.xyz, albedo, spec_sample);
    let att = attenuate(light.attenuation, length(to_light));
    return (terms[0] + terms[1] + terms[2]) * att;
}

fn calc_spot_light(light: SpotLight, normal: vec3<f32>, frag_pos: vec3<f32>, view_dir: vec3<f32>, albedo: vec3<f32>, spec_sample: vec3<f32>) -> vec3<f32> {
    let to_light = light.position.xyz - frag_pos;
    let light_dir = normalize(to_light);
    let terms = phong(light_dir, normal, view_dir, light.ambient.xyz, light.diffuse.xyz, light.specular.xyz, albedo, spec_sample);
    let att = attenuate(light.attenuation, length(to_light));

    let theta = dot(light_dir, normalize(-light.direction.xyz));
    let epsilon = light.cone.x - light.cone.y;
    let intensity = clamp((theta - light.cone.y) / epsilon, 0.0, 1.0);

    return (terms[0] + terms[1] + terms[2]) * att * intensity;
}

@fragment
fn fs_main(in: VertexOutput) -> @location(0) vec4<f32> {
    let albedo = textureSample(diffuse_map, material_sampler, in.tex_coords).rgb;
    let spec_sample = textureSample(specular_map, material_sampler, in.tex_coords).rgb;
    let emission = textureSample(emission_map, material_sampler, in.tex_coords).rgb;

    let normal = normalize(in.normal);
    let view_dir = normalize(frame.view_pos.xyz - in.world_pos);

    var color = calc_dir_light(frame.dir_light, normal, view_dir, albedo, spec_sample);
    for (var i = 0u; i < POINT_LIGHTS; i = i + 1u) {
        color += calc_point_light(frame.point_lights[i], normal, in.world_pos, view_dir, albedo, spec_sample);
    }
    color += calc_spot_light(frame.spot_light, normal, in.world_pos, view_dir, albedo, spec_sample);

    let pulse = 0.5 + 0.5 * frame.params.x;
    color += emission * max(frame.emission_tint.rgb, vec3<f32>(0.0)) * frame.params.y * pulse;

    return vec4<f32>(color, 1.0);
}
"#;
