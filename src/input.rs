use crate::camera::CameraMovement;
use glfw::{Action, Key, Window};

pub const CLOSE_KEY: Key = Key::Escape;

impl CameraMovement {
    pub fn key(self) -> Key {
        match self {
            CameraMovement::Forward => Key::W,
            CameraMovement::Backward => Key::S,
            CameraMovement::Left => Key::A,
            CameraMovement::Right => Key::D,
        }
    }
}

pub fn is_pressed(window: &Window, key: Key) -> bool {
    matches!(window.get_key(key), Action::Press | Action::Repeat)
}

/// Turns absolute cursor positions into per-event offsets. Y grows upward in
/// the returned offsets while screen coordinates grow downward.
#[derive(Default, Debug)]
pub struct CursorTracker {
    last: Option<(f64, f64)>,
}

impl CursorTracker {
    pub fn offset(&mut self, x: f64, y: f64) -> (f32, f32) {
        let (last_x, last_y) = self.last.unwrap_or((x, y));
        self.last = Some((x, y));
        ((x - last_x) as f32, (last_y - y) as f32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn first_sample_does_not_jump() {
        let mut tracker = CursorTracker::default();
        assert_eq!(tracker.offset(800.0, 450.0), (0.0, 0.0));
    }

    #[test]
    fn offsets_invert_the_vertical_axis() {
        let mut tracker = CursorTracker::default();
        tracker.offset(800.0, 450.0);
        assert_eq!(tracker.offset(810.0, 440.0), (10.0, 10.0));
        assert_eq!(tracker.offset(805.0, 460.0), (-5.0, -20.0));
    }

    #[test]
    fn movement_keys_are_wasd() {
        let keys: Vec<Key> = CameraMovement::iter().map(CameraMovement::key).collect();
        assert_eq!(keys, vec![Key::W, Key::S, Key::A, Key::D]);
        assert!(!keys.contains(&CLOSE_KEY));
    }
}
