mod input;

use anyhow::{Context, Result};
use clap::Parser;
use input::HeldKeys;
use lumen_render_wgpu::{FrameUniforms, GpuContext, LitRenderer, Model, ModelOptions, Shader};
use lumen_scene::{FlyCamera, FrameClock, MouseLook, SceneConfig};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;
use winit::application::ApplicationHandler;
use winit::dpi::PhysicalSize;
use winit::event::{DeviceEvent, ElementState, KeyEvent, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{CursorGrabMode, Window, WindowId};

#[derive(Parser)]
#[command(name = "lumen-desktop", about = "Lit glTF model viewer with a free-fly camera")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Scene config file (YAML)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// glTF model to load, overriding the config
    #[arg(short, long)]
    model: Option<PathBuf>,

    /// WGSL shader to use instead of the built-in one
    #[arg(long)]
    shader: Option<PathBuf>,
}

impl Cli {
    fn scene_config(&self) -> Result<SceneConfig> {
        let mut config = match &self.config {
            Some(path) => SceneConfig::load(path)?,
            None => SceneConfig::default(),
        };
        if let Some(model) = &self.model {
            config.model = model.clone();
        }
        if let Some(shader) = &self.shader {
            config.shader = Some(shader.clone());
        }
        Ok(config)
    }
}

/// GPU resources, created once the window exists.
struct Gpu {
    window: Arc<Window>,
    context: GpuContext,
    renderer: LitRenderer,
    model: Model,
}

impl Gpu {
    fn new(event_loop: &ActiveEventLoop, config: &SceneConfig) -> Result<Self> {
        let attrs = Window::default_attributes()
            .with_title(config.window.title.clone())
            .with_inner_size(PhysicalSize::new(config.window.width, config.window.height));
        let window = Arc::new(event_loop.create_window(attrs).context("create window")?);

        let size = window.inner_size();
        let context = GpuContext::new(window.clone(), size.width, size.height)?;

        let shader = match &config.shader {
            Some(path) => Shader::from_file(&context.device, path)?,
            None => Shader::builtin(&context.device)?,
        };
        let (width, height) = context.size();
        let renderer = LitRenderer::new(
            &context.device,
            context.format(),
            width,
            height,
            &shader,
            config.clear_color,
        )?;

        let model = Model::load(
            &context.device,
            &context.queue,
            &config.model,
            renderer.material_layout(),
            &ModelOptions {
                flip_textures: config.flip_textures,
                fallback_specular: config.lighting.material.specular,
            },
        )
        .with_context(|| format!("load model {}", config.model.display()))?;

        Ok(Self {
            window,
            context,
            renderer,
            model,
        })
    }
}

struct Viewer {
    config: SceneConfig,
    camera: FlyCamera,
    clock: FrameClock,
    keys: HeldKeys,
    mouse: MouseLook,
    /// Set when the cursor cannot be grabbed; look then follows cursor
    /// positions instead of raw device motion.
    cursor_look: bool,
    gpu: Option<Gpu>,
    startup_error: Option<anyhow::Error>,
}

impl Viewer {
    fn new(config: SceneConfig) -> Self {
        Self {
            camera: config.camera.build(),
            config,
            clock: FrameClock::new(),
            keys: HeldKeys::default(),
            mouse: MouseLook::new(),
            cursor_look: false,
            gpu: None,
            startup_error: None,
        }
    }

    fn capture_cursor(&mut self) {
        let Some(gpu) = &self.gpu else {
            return;
        };
        let window = &gpu.window;
        let grabbed = window
            .set_cursor_grab(CursorGrabMode::Locked)
            .or_else(|_| window.set_cursor_grab(CursorGrabMode::Confined));
        if let Err(e) = grabbed {
            tracing::warn!("cursor grab unavailable ({e}), using cursor positions for mouse look");
            self.cursor_look = true;
        }
        window.set_cursor_visible(false);
        self.mouse.reset();
    }

    fn redraw(&mut self) {
        let time = self.clock.tick();
        self.keys.apply(&mut self.camera, time.dt);

        let Some(gpu) = &self.gpu else {
            return;
        };

        let frame = FrameUniforms::build(
            &self.camera,
            &self.config.lighting,
            &time,
            gpu.context.aspect(),
            self.config.model_transform.matrix(),
        );

        if let Some(output) = gpu.context.acquire() {
            let view = output
                .texture
                .create_view(&wgpu::TextureViewDescriptor::default());
            gpu.renderer.render(
                &gpu.context.device,
                &gpu.context.queue,
                &view,
                &frame,
                &gpu.model,
            );
            output.present();
        }

        if time.frame_index % 600 == 0 {
            tracing::debug!(
                "frame {}: dt={:.4}s camera=({:.2}, {:.2}, {:.2}) zoom={:.1}",
                time.frame_index,
                time.dt,
                self.camera.position.x,
                self.camera.position.y,
                self.camera.position.z,
                self.camera.zoom()
            );
        }

        gpu.window.request_redraw();
    }
}

impl ApplicationHandler for Viewer {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.gpu.is_some() {
            return;
        }

        match Gpu::new(event_loop, &self.config) {
            Ok(gpu) => {
                self.gpu = Some(gpu);
                self.capture_cursor();
                self.clock = FrameClock::new();
            }
            Err(e) => {
                tracing::error!("startup failed: {e:#}");
                self.startup_error = Some(e);
                event_loop.exit();
            }
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::Resized(new_size) => {
                if let Some(gpu) = &mut self.gpu {
                    gpu.context.resize(new_size.width, new_size.height);
                    let (width, height) = gpu.context.size();
                    gpu.renderer.resize(&gpu.context.device, width, height);
                }
            }
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(key),
                        state: key_state,
                        ..
                    },
                ..
            } => {
                let pressed = key_state == ElementState::Pressed;
                if key == KeyCode::Escape && pressed {
                    event_loop.exit();
                    return;
                }
                self.keys.set(key, pressed);
            }
            WindowEvent::CursorMoved { position, .. } if self.cursor_look => {
                let offset = self.mouse.cursor_moved(position.x, position.y);
                self.camera.process_mouse_movement(offset.x, offset.y, true);
            }
            WindowEvent::MouseWheel { delta, .. } => {
                self.camera.process_mouse_scroll(input::scroll_lines(delta));
            }
            WindowEvent::Focused(focused) => {
                if focused {
                    self.capture_cursor();
                    self.clock.reset_delta();
                } else {
                    self.keys.clear();
                }
            }
            WindowEvent::RedrawRequested => {
                self.redraw();
            }
            _ => {}
        }
    }

    fn device_event(
        &mut self,
        _event_loop: &ActiveEventLoop,
        _device_id: winit::event::DeviceId,
        event: DeviceEvent,
    ) {
        if let DeviceEvent::MouseMotion { delta } = event {
            if !self.cursor_look && self.gpu.is_some() {
                let offset = self.mouse.motion(delta.0, delta.1);
                self.camera.process_mouse_movement(offset.x, offset.y, true);
            }
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(gpu) = &self.gpu {
            gpu.window.request_redraw();
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    let config = cli.scene_config()?;
    tracing::info!(
        "lumen-desktop starting: model {}, window {}x{}",
        config.model.display(),
        config.window.width,
        config.window.height
    );

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut viewer = Viewer::new(config);
    event_loop.run_app(&mut viewer)?;

    match viewer.startup_error.take() {
        Some(e) => Err(e),
        None => Ok(()),
    }
}
