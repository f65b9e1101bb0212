//! wgpu render backend for the lit-model viewer.
//!
//! Draws one glTF model with a Phong shader under a directional light, four
//! point lights and a camera spot light.
//!
//! # Invariants
//! - Renderer never mutates scene state; it reads one `FrameUniforms` per frame.
//! - A missing or undecodable texture never aborts a load; it falls back to a
//!   solid colour and logs.
//! - Shader compile and pipeline link failures are logged with the compiler's
//!   messages and returned as errors.

mod context;
mod gpu;
pub mod model;
pub mod shader;
mod shaders;
pub mod texture;
mod uniforms;

pub use context::{GpuContext, RenderError};
pub use gpu::LitRenderer;
pub use model::{MaterialLayout, Model, ModelError, ModelOptions};
pub use shader::{Shader, ShaderError};
pub use shaders::LIT_SHADER;
pub use texture::{Texture, TextureError, TextureOptions, load_texture};
pub use uniforms::FrameUniforms;
