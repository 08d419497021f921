//! Pointer, keyboard and wheel handling
//!
//! Every rotation is an increment composed onto the head's orientation. The
//! screen-fixed axis is first mapped into the head's frame through the
//! current orientation, so a key press or drag turns the head the same way
//! on screen whatever its pose, and pressing Left k times equals a single
//! turn of k steps.

use brainviz_core::{RotationState, Vector3f, ZoomConfig, ZoomState};

/// Interaction tuning
#[derive(Debug, Clone)]
pub struct ControllerConfig {
    /// Rotation per arrow-key press, in radians
    pub rotation_step: f32,
    /// Rotation for a drag across the full window, in radians
    pub drag_sensitivity: f32,
    /// Wheel lines (or pixel-delta equivalents) per zoom tick
    pub lines_per_tick: f32,
    pub zoom: ZoomConfig,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            rotation_step: std::f32::consts::PI / 90.0,
            drag_sensitivity: std::f32::consts::TAU,
            lines_per_tick: 1.0,
            zoom: ZoomConfig::default(),
        }
    }
}

/// Arrow keys
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RotateKey {
    Left,
    Right,
    Up,
    Down,
}

/// Owns the head orientation and zoom and applies input to them
#[derive(Debug, Clone)]
pub struct InteractionController {
    config: ControllerConfig,
    rotation: RotationState,
    zoom: ZoomState,
    /// Last pointer position while the left button is held
    drag_anchor: Option<[f64; 2]>,
    /// Fractional wheel lines not yet turned into ticks
    scroll_remainder: f32,
}

impl InteractionController {
    pub fn new(config: ControllerConfig) -> Self {
        let zoom = ZoomState::new(config.zoom);
        Self {
            config,
            rotation: RotationState::identity(),
            zoom,
            drag_anchor: None,
            scroll_remainder: 0.0,
        }
    }

    pub fn config(&self) -> &ControllerConfig {
        &self.config
    }

    pub fn rotation(&self) -> &RotationState {
        &self.rotation
    }

    pub fn zoom(&self) -> &ZoomState {
        &self.zoom
    }

    pub fn is_dragging(&self) -> bool {
        self.drag_anchor.is_some()
    }

    /// Left button pressed at `position`: start tracking the pointer
    pub fn press(&mut self, position: [f64; 2]) {
        self.drag_anchor = Some(position);
    }

    /// Left button released
    pub fn release(&mut self) {
        self.drag_anchor = None;
    }

    /// Pointer moved to `position` in a window of `window_size` pixels.
    ///
    /// Rotates only while a drag is in progress. Returns whether the
    /// orientation changed.
    pub fn pointer_moved(&mut self, position: [f64; 2], window_size: [f64; 2]) -> bool {
        let Some(anchor) = self.drag_anchor else {
            return false;
        };
        self.drag_anchor = Some(position);
        let dx = position[0] - anchor[0];
        let dy = position[1] - anchor[1];
        self.drag(dx, dy, window_size)
    }

    /// Apply a pointer displacement of `(dx, dy)` pixels.
    ///
    /// Horizontal motion turns the head about the vertical axis, then
    /// vertical motion tilts it about the X axis.
    pub fn drag(&mut self, dx: f64, dy: f64, window_size: [f64; 2]) -> bool {
        let [width, height] = window_size;
        if width <= 0.0 || height <= 0.0 {
            return false;
        }
        let sensitivity = self.config.drag_sensitivity as f64;
        let yaw = (sensitivity * dx / width) as f32;
        let pitch = (-sensitivity * dy / height) as f32;

        let turned = self.rotation.rotate_local(&Vector3f::z(), yaw).is_some();
        let tilted = self.rotation.rotate_local(&Vector3f::x(), pitch).is_some();
        turned || tilted
    }

    /// Rotate one step for an arrow key press
    pub fn rotate_key(&mut self, key: RotateKey) {
        let step = self.config.rotation_step;
        let (axis, angle) = match key {
            RotateKey::Left => (Vector3f::z(), step),
            RotateKey::Right => (Vector3f::z(), -step),
            RotateKey::Up => (Vector3f::x(), step),
            RotateKey::Down => (Vector3f::x(), -step),
        };
        self.rotation.rotate_local(&axis, angle);
    }

    /// Apply wheel motion in lines, positive away from the user.
    ///
    /// Scrolling towards the user (wheel down) zooms in. Returns whether the
    /// zoom changed.
    pub fn scroll(&mut self, lines: f32) -> bool {
        if !lines.is_finite() {
            return false;
        }
        self.scroll_remainder -= lines / self.config.lines_per_tick.max(f32::EPSILON);
        let ticks = self.scroll_remainder.trunc();
        self.scroll_remainder -= ticks;
        ticks != 0.0 && self.zoom.step_by(ticks as i32)
    }

    /// Apply whole wheel ticks; positive ticks are wheel-down
    pub fn wheel_ticks(&mut self, ticks: i32) -> bool {
        self.zoom.step_by(ticks)
    }

    /// Restore the initial orientation and zoom
    pub fn reset(&mut self) {
        self.rotation = RotationState::identity();
        self.zoom.reset();
        self.drag_anchor = None;
        self.scroll_remainder = 0.0;
    }
}

impl Default for InteractionController {
    fn default() -> Self {
        Self::new(ControllerConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use brainviz_core::{Point3f, Unit, UnitQuaternion};

    #[test]
    fn test_repeated_left_presses_compose_about_local_vertical() {
        let mut controller = InteractionController::default();
        let step = controller.config().rotation_step;
        for _ in 0..30 {
            controller.rotate_key(RotateKey::Left);
        }
        let expected = UnitQuaternion::from_axis_angle(&Vector3f::z_axis(), 30.0 * step);
        assert_relative_eq!(
            controller.rotation().matrix(),
            expected.to_rotation_matrix().into_inner(),
            epsilon = 1e-5
        );
    }

    #[test]
    fn test_repeated_left_presses_from_arbitrary_pose() {
        let mut controller = InteractionController::default();
        let step = controller.config().rotation_step;
        let setup = [(RotateKey::Up, 10), (RotateKey::Right, 7), (RotateKey::Up, 4), (RotateKey::Left, 2)];
        for (key, presses) in setup {
            for _ in 0..presses {
                controller.rotate_key(key);
            }
        }
        let r0 = *controller.rotation().orientation();
        assert!(r0.angle() > 0.1);

        for _ in 0..30 {
            controller.rotate_key(RotateKey::Left);
        }
        let local_vertical = Unit::new_normalize(r0.inverse() * Vector3f::z());
        let expected = r0 * UnitQuaternion::from_axis_angle(&local_vertical, 30.0 * step);
        assert_relative_eq!(
            controller.rotation().matrix(),
            expected.to_rotation_matrix().into_inner(),
            epsilon = 1e-4
        );
    }

    #[test]
    fn test_key_rotation_follows_tilted_head() {
        let mut controller = InteractionController::default();
        // Tilt the head a quarter turn
        for _ in 0..45 {
            controller.rotate_key(RotateKey::Up);
        }
        let tilted = *controller.rotation();
        let axis = tilted.local_axis(&Vector3f::z()).unwrap();
        assert_relative_eq!(axis.into_inner(), Vector3f::new(0.0, 1.0, 0.0), epsilon = 1e-5);

        // The head point on the vertical axis stays there under Left
        controller.rotate_key(RotateKey::Left);
        let on_axis = controller.rotation().transform_point(&Point3f::from(axis.into_inner()));
        assert_relative_eq!(on_axis, Point3f::new(0.0, 0.0, 1.0), epsilon = 1e-5);
        assert_ne!(*controller.rotation(), tilted);
    }

    #[test]
    fn test_opposite_keys_cancel() {
        let mut controller = InteractionController::default();
        controller.rotate_key(RotateKey::Up);
        controller.rotate_key(RotateKey::Left);
        let before = *controller.rotation();
        controller.rotate_key(RotateKey::Right);
        controller.rotate_key(RotateKey::Left);
        assert_relative_eq!(controller.rotation().matrix(), before.matrix(), epsilon = 1e-6);
    }

    #[test]
    fn test_drag_requires_press() {
        let mut controller = InteractionController::default();
        assert!(!controller.pointer_moved([100.0, 100.0], [800.0, 600.0]));
        assert_eq!(*controller.rotation(), RotationState::identity());

        controller.press([100.0, 100.0]);
        assert!(controller.pointer_moved([300.0, 100.0], [800.0, 600.0]));
        controller.release();
        let after_drag = *controller.rotation();
        assert!(!controller.pointer_moved([500.0, 100.0], [800.0, 600.0]));
        assert_eq!(*controller.rotation(), after_drag);
    }

    #[test]
    fn test_horizontal_drag_turns_about_vertical_axis() {
        let mut controller = InteractionController::default();
        // A quarter of the window width is a quarter turn at the default sensitivity
        controller.press([0.0, 0.0]);
        controller.pointer_moved([200.0, 0.0], [800.0, 600.0]);

        let nose = controller.rotation().transform_point(&Point3f::new(1.0, 0.0, 0.0));
        assert_relative_eq!(nose, Point3f::new(0.0, 1.0, 0.0), epsilon = 1e-5);
        assert!(controller.rotation().is_valid_rotation(1e-5));
    }

    #[test]
    fn test_wheel_down_zooms_in_within_bounds() {
        let mut controller = InteractionController::default();
        for _ in 0..25 {
            controller.scroll(-1.0);
        }
        assert_relative_eq!(controller.zoom().value(), 2.25, epsilon = 1e-4);

        controller.scroll(1.0);
        assert_relative_eq!(controller.zoom().value(), 2.2, epsilon = 1e-4);

        for _ in 0..1000 {
            controller.wheel_ticks(-1);
        }
        assert_relative_eq!(controller.zoom().value(), 0.1);
        assert!(!controller.wheel_ticks(-1));
    }

    #[test]
    fn test_fractional_scroll_accumulates() {
        let mut controller = InteractionController::default();
        assert!(!controller.scroll(-0.4));
        assert!(!controller.scroll(-0.4));
        assert!(controller.scroll(-0.4));
        assert_relative_eq!(controller.zoom().value(), 1.05, epsilon = 1e-5);
    }

    #[test]
    fn test_reset_restores_initial_view() {
        let mut controller = InteractionController::default();
        controller.rotate_key(RotateKey::Down);
        controller.wheel_ticks(3);
        controller.press([1.0, 1.0]);
        controller.reset();
        assert_eq!(*controller.rotation(), RotationState::identity());
        assert_relative_eq!(controller.zoom().value(), 1.0);
        assert!(!controller.is_dragging());
    }
}
