use nalgebra_glm::{Mat4, Vec3};
use strum::EnumIter;

const YAW: f32 = -90.0;
const PITCH: f32 = 0.0;
const SPEED: f32 = 2.5;
const SENSITIVITY: f32 = 0.1;
const ZOOM: f32 = 45.0;

const PITCH_LIMIT: f32 = 89.0;
const MIN_ZOOM: f32 = 1.0;
const MAX_ZOOM: f32 = 45.0;

pub const NEAR: f32 = 0.1;
pub const FAR: f32 = 100.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, EnumIter)]
pub enum CameraMovement {
    Forward,
    Backward,
    Left,
    Right,
}

/// Free-flying camera driven by Euler angles, in degrees.
#[derive(Clone, Debug)]
pub struct Camera {
    pub position: Vec3,
    front: Vec3,
    up: Vec3,
    right: Vec3,
    world_up: Vec3,
    yaw: f32,
    pitch: f32,
    pub movement_speed: f32,
    pub mouse_sensitivity: f32,
    zoom: f32,
}

impl Camera {
    pub fn new(position: Vec3) -> Self {
        let mut camera = Self {
            position,
            front: glm::vec3(0.0, 0.0, -1.0),
            up: Vec3::y(),
            right: Vec3::x(),
            world_up: Vec3::y(),
            yaw: YAW,
            pitch: PITCH,
            movement_speed: SPEED,
            mouse_sensitivity: SENSITIVITY,
            zoom: ZOOM,
        };
        camera.update_vectors();
        camera
    }

    pub fn front(&self) -> Vec3 {
        self.front
    }

    /// Vertical field of view in degrees.
    pub fn zoom(&self) -> f32 {
        self.zoom
    }

    pub fn view_matrix(&self) -> Mat4 {
        glm::look_at(&self.position, &(self.position + self.front), &self.up)
    }

    pub fn projection(&self, aspect: f32) -> Mat4 {
        glm::perspective(aspect, self.zoom.to_radians(), NEAR, FAR)
    }

    pub fn process_keyboard(&mut self, direction: CameraMovement, delta_time: f32) {
        let velocity = self.movement_speed * delta_time;
        match direction {
            CameraMovement::Forward => self.position += self.front * velocity,
            CameraMovement::Backward => self.position -= self.front * velocity,
            CameraMovement::Left => self.position -= self.right * velocity,
            CameraMovement::Right => self.position += self.right * velocity,
        }
    }

    pub fn process_mouse_movement(&mut self, x_offset: f32, y_offset: f32, constrain_pitch: bool) {
        self.yaw += x_offset * self.mouse_sensitivity;
        self.pitch += y_offset * self.mouse_sensitivity;

        if constrain_pitch {
            self.pitch = self.pitch.clamp(-PITCH_LIMIT, PITCH_LIMIT);
        }

        self.update_vectors();
    }

    pub fn process_mouse_scroll(&mut self, y_offset: f32) {
        self.zoom = (self.zoom - y_offset).clamp(MIN_ZOOM, MAX_ZOOM);
    }

    fn update_vectors(&mut self) {
        let (yaw, pitch) = (self.yaw.to_radians(), self.pitch.to_radians());
        let front = glm::vec3(yaw.cos() * pitch.cos(), pitch.sin(), yaw.sin() * pitch.cos());
        self.front = glm::normalize(&front);
        self.right = glm::normalize(&glm::cross(&self.front, &self.world_up));
        self.up = glm::normalize(&glm::cross(&self.right, &self.front));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(a: &Vec3, b: &Vec3) {
        assert!(glm::distance(a, b) < 1e-5, "{a:?} != {b:?}");
    }

    #[test]
    fn starts_looking_down_negative_z() {
        let camera = Camera::new(glm::vec3(0.0, 1.0, 5.0));
        assert_close(&camera.front(), &glm::vec3(0.0, 0.0, -1.0));
        assert_close(&camera.right, &glm::vec3(1.0, 0.0, 0.0));
        assert_close(&camera.up, &glm::vec3(0.0, 1.0, 0.0));
        assert_eq!(camera.zoom(), 45.0);
    }

    #[test]
    fn keyboard_moves_along_the_camera_basis() {
        let mut camera = Camera::new(Vec3::zeros());
        camera.process_keyboard(CameraMovement::Forward, 2.0);
        assert_close(&camera.position, &glm::vec3(0.0, 0.0, -5.0));
        camera.process_keyboard(CameraMovement::Right, 1.0);
        assert_close(&camera.position, &glm::vec3(2.5, 0.0, -5.0));
        camera.process_keyboard(CameraMovement::Backward, 2.0);
        camera.process_keyboard(CameraMovement::Left, 1.0);
        assert_close(&camera.position, &Vec3::zeros());
    }

    #[test]
    fn pitch_is_clamped_when_constrained() {
        let mut camera = Camera::new(Vec3::zeros());
        camera.process_mouse_movement(0.0, 10_000.0, true);
        assert_eq!(camera.pitch, 89.0);
        camera.process_mouse_movement(0.0, -20_000.0, true);
        assert_eq!(camera.pitch, -89.0);

        camera.process_mouse_movement(0.0, 2_000.0, false);
        assert!(camera.pitch > 89.0);
    }

    #[test]
    fn mouse_turns_yaw_scaled_by_sensitivity() {
        let mut camera = Camera::new(Vec3::zeros());
        // 900 px * 0.1 = 90 degrees to the right: now facing +X.
        camera.process_mouse_movement(900.0, 0.0, true);
        assert_close(&camera.front(), &glm::vec3(1.0, 0.0, 0.0));
        assert_close(&camera.right, &glm::vec3(0.0, 0.0, 1.0));
    }

    #[test]
    fn scroll_zoom_stays_in_range() {
        let mut camera = Camera::new(Vec3::zeros());
        camera.process_mouse_scroll(10.0);
        assert_eq!(camera.zoom(), 35.0);
        camera.process_mouse_scroll(100.0);
        assert_eq!(camera.zoom(), 1.0);
        camera.process_mouse_scroll(-100.0);
        assert_eq!(camera.zoom(), 45.0);
    }

    #[test]
    fn view_matrix_maps_the_eye_to_the_origin() {
        let camera = Camera::new(glm::vec3(0.0, 1.0, 5.0));
        let eye = camera.view_matrix() * glm::vec4(0.0, 1.0, 5.0, 1.0);
        assert_close(&eye.xyz(), &Vec3::zeros());
    }
}
