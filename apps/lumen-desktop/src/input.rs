use lumen_scene::{CameraMovement, FlyCamera};
use std::collections::HashSet;
use winit::event::MouseScrollDelta;
use winit::keyboard::KeyCode;

/// Trackpads report pixels; this many pixels count as one wheel notch.
const PIXELS_PER_LINE: f64 = 20.0;

pub fn movement_for(key: KeyCode) -> Option<CameraMovement> {
    match key {
        KeyCode::KeyW => Some(CameraMovement::Forward),
        KeyCode::KeyS => Some(CameraMovement::Backward),
        KeyCode::KeyA => Some(CameraMovement::Left),
        KeyCode::KeyD => Some(CameraMovement::Right),
        _ => None,
    }
}

/// Vertical scroll in wheel notches, positive away from the user.
pub fn scroll_lines(delta: MouseScrollDelta) -> f32 {
    match delta {
        MouseScrollDelta::LineDelta(_, y) => y,
        MouseScrollDelta::PixelDelta(pos) => (pos.y / PIXELS_PER_LINE) as f32,
    }
}

/// Movement keys currently held down.
#[derive(Debug, Default)]
pub struct HeldKeys {
    held: HashSet<KeyCode>,
}

impl HeldKeys {
    pub fn set(&mut self, key: KeyCode, pressed: bool) {
        if pressed {
            self.held.insert(key);
        } else {
            self.held.remove(&key);
        }
    }

    pub fn clear(&mut self) {
        self.held.clear();
    }

    pub fn is_held(&self, key: KeyCode) -> bool {
        self.held.contains(&key)
    }

    /// Move the camera for every held movement key, in W/S/A/D order.
    pub fn apply(&self, camera: &mut FlyCamera, dt: f32) {
        for key in [KeyCode::KeyW, KeyCode::KeyS, KeyCode::KeyA, KeyCode::KeyD] {
            if self.is_held(key) {
                if let Some(movement) = movement_for(key) {
                    camera.process_keyboard(movement, dt);
                }
            }
        }
    }
}
