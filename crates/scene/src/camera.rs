use glam::{Mat4, Vec3};

pub const DEFAULT_YAW: f32 = -90.0;
pub const DEFAULT_PITCH: f32 = 0.0;
pub const DEFAULT_SPEED: f32 = 2.5;
pub const DEFAULT_SENSITIVITY: f32 = 0.1;
pub const DEFAULT_ZOOM: f32 = 45.0;

const PITCH_LIMIT: f32 = 89.0;
const MIN_ZOOM: f32 = 1.0;
const MAX_ZOOM: f32 = 45.0;

/// Keyboard-driven movement directions, relative to where the camera looks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CameraMovement {
    Forward,
    Backward,
    Left,
    Right,
}

/// Free-fly camera driven by yaw/pitch (degrees), WASD movement and scroll zoom.
///
/// `front`, `right` and `up` are derived from yaw and pitch and stay an
/// orthonormal basis after every mutation, so they are not publicly writable.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlyCamera {
    pub position: Vec3,
    pub speed: f32,
    pub sensitivity: f32,
    pub near: f32,
    pub far: f32,
    front: Vec3,
    up: Vec3,
    right: Vec3,
    world_up: Vec3,
    yaw: f32,
    pitch: f32,
    zoom: f32,
}

impl Default for FlyCamera {
    fn default() -> Self {
        Self::new(Vec3::new(0.0, 0.0, 3.0))
    }
}

impl FlyCamera {
    pub fn new(position: Vec3) -> Self {
        Self::with_orientation(position, Vec3::Y, DEFAULT_YAW, DEFAULT_PITCH)
    }

    pub fn with_orientation(position: Vec3, world_up: Vec3, yaw: f32, pitch: f32) -> Self {
        let mut camera = Self {
            position,
            speed: DEFAULT_SPEED,
            sensitivity: DEFAULT_SENSITIVITY,
            near: 0.1,
            far: 100.0,
            front: Vec3::NEG_Z,
            up: Vec3::Y,
            right: Vec3::X,
            world_up: world_up.normalize_or(Vec3::Y),
            yaw,
            pitch,
            zoom: DEFAULT_ZOOM,
        };
        camera.update_vectors();
        camera
    }

    pub fn front(&self) -> Vec3 {
        self.front
    }

    pub fn right(&self) -> Vec3 {
        self.right
    }

    pub fn up(&self) -> Vec3 {
        self.up
    }

    pub fn yaw(&self) -> f32 {
        self.yaw
    }

    pub fn pitch(&self) -> f32 {
        self.pitch
    }

    /// Vertical field of view in degrees.
    pub fn zoom(&self) -> f32 {
        self.zoom
    }

    pub fn process_keyboard(&mut self, direction: CameraMovement, dt: f32) {
        let velocity = self.speed * dt;
        match direction {
            CameraMovement::Forward => self.position += self.front * velocity,
            CameraMovement::Backward => self.position -= self.front * velocity,
            CameraMovement::Left => self.position -= self.right * velocity,
            CameraMovement::Right => self.position += self.right * velocity,
        }
    }

    /// Applies a mouse offset in pixels. `dy` is positive when the mouse moves up.
    pub fn process_mouse_movement(&mut self, dx: f32, dy: f32, constrain_pitch: bool) {
        self.yaw += dx * self.sensitivity;
        self.pitch += dy * self.sensitivity;

        if constrain_pitch {
            self.pitch = self.pitch.clamp(-PITCH_LIMIT, PITCH_LIMIT);
        }

        self.update_vectors();
    }

    pub fn process_mouse_scroll(&mut self, dy: f32) {
        self.zoom = (self.zoom - dy).clamp(MIN_ZOOM, MAX_ZOOM);
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.position + self.front, self.up)
    }

    pub fn projection_matrix(&self, aspect: f32) -> Mat4 {
        Mat4::perspective_rh(self.zoom.to_radians(), aspect, self.near, self.far)
    }

    fn update_vectors(&mut self) {
        let (yaw, pitch) = (self.yaw.to_radians(), self.pitch.to_radians());
        self.front = Vec3::new(yaw.cos() * pitch.cos(), pitch.sin(), yaw.sin() * pitch.cos())
            .normalize();
        // Looking straight along world_up leaves right undefined; keep the last one.
        self.right = self
            .front
            .cross(self.world_up)
            .try_normalize()
            .unwrap_or(self.right);
        self.up = self.right.cross(self.front).normalize();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-5;

    fn assert_orthonormal(cam: &FlyCamera) {
        for v in [cam.front(), cam.right(), cam.up()] {
            assert!((v.length() - 1.0).abs() < EPS, "not unit: {v:?}");
        }
        assert!(cam.front().dot(cam.right()).abs() < EPS);
        assert!(cam.front().dot(cam.up()).abs() < EPS);
        assert!(cam.right().dot(cam.up()).abs() < EPS);
    }

    #[test]
    fn default_camera_looks_down_negative_z() {
        let cam = FlyCamera::default();
        assert_eq!(cam.position, Vec3::new(0.0, 0.0, 3.0));
        assert!(cam.front().abs_diff_eq(Vec3::NEG_Z, EPS));
        assert!(cam.right().abs_diff_eq(Vec3::X, EPS));
        assert!(cam.up().abs_diff_eq(Vec3::Y, EPS));
        assert_eq!(cam.zoom(), 45.0);
    }

    #[test]
    fn keyboard_moves_by_speed_times_dt() {
        let mut cam = FlyCamera::default();
        cam.process_keyboard(CameraMovement::Forward, 1.0);
        assert!(cam.position.abs_diff_eq(Vec3::new(0.0, 0.0, 0.5), EPS));

        cam.process_keyboard(CameraMovement::Right, 2.0);
        assert!(cam.position.abs_diff_eq(Vec3::new(5.0, 0.0, 0.5), EPS));

        cam.process_keyboard(CameraMovement::Left, 2.0);
        cam.process_keyboard(CameraMovement::Backward, 1.0);
        assert!(cam.position.abs_diff_eq(Vec3::new(0.0, 0.0, 3.0), EPS));
    }

    #[test]
    fn mouse_movement_scales_by_sensitivity() {
        let mut cam = FlyCamera::default();
        cam.process_mouse_movement(100.0, 50.0, true);
        assert!((cam.yaw() - -80.0).abs() < EPS);
        assert!((cam.pitch() - 5.0).abs() < EPS);
        assert_orthonormal(&cam);
    }

    #[test]
    fn pitch_is_clamped_when_constrained() {
        let mut cam = FlyCamera::default();
        cam.process_mouse_movement(0.0, 10_000.0, true);
        assert_eq!(cam.pitch(), 89.0);
        cam.process_mouse_movement(0.0, -20_000.0, true);
        assert_eq!(cam.pitch(), -89.0);
        assert_orthonormal(&cam);
    }

    #[test]
    fn unconstrained_vertical_look_stays_finite() {
        let mut cam = FlyCamera::default();
        cam.process_mouse_movement(0.0, 900.0, false);
        assert_eq!(cam.pitch(), 90.0);
        assert!(cam.view_matrix().is_finite());
        assert_orthonormal(&cam);
    }

    #[test]
    fn orientation_stays_orthonormal() {
        let mut cam = FlyCamera::default();
        for i in 0..200 {
            let dx = ((i * 37) % 23) as f32 - 11.0;
            let dy = ((i * 53) % 17) as f32 - 8.0;
            cam.process_mouse_movement(dx * 3.0, dy * 2.0, true);
            assert_orthonormal(&cam);
        }
    }

    #[test]
    fn scroll_zoom_is_clamped() {
        let mut cam = FlyCamera::default();
        cam.process_mouse_scroll(10.0);
        assert_eq!(cam.zoom(), 35.0);
        cam.process_mouse_scroll(100.0);
        assert_eq!(cam.zoom(), 1.0);
        cam.process_mouse_scroll(-100.0);
        assert_eq!(cam.zoom(), 45.0);
    }

    #[test]
    fn view_matrix_maps_eye_to_origin() {
        let mut cam = FlyCamera::new(Vec3::new(1.0, 2.0, 3.0));
        cam.process_mouse_movement(123.0, -45.0, true);
        let eye = cam.view_matrix().transform_point3(cam.position);
        assert!(eye.abs_diff_eq(Vec3::ZERO, 1e-4));

        let ahead = cam.view_matrix().transform_point3(cam.position + cam.front());
        assert!(ahead.abs_diff_eq(Vec3::NEG_Z, 1e-4));
    }

    #[test]
    fn projection_is_finite() {
        let cam = FlyCamera::default();
        let proj = cam.projection_matrix(800.0 / 600.0);
        assert!(proj.is_finite());
        assert!(!proj.col(0).x.is_nan());
    }
}
