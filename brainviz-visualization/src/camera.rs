//! Camera and per-frame view state

use brainviz_core::{Point3f, Vector3f};
use brainviz_gpu::CameraUniform;
use nalgebra::{Matrix4, Perspective3};

/// nalgebra projections map depth to [-1, 1]; wgpu expects [0, 1]
#[rustfmt::skip]
pub fn opengl_to_wgpu() -> Matrix4<f32> {
    Matrix4::new(
        1.0, 0.0, 0.0, 0.0,
        0.0, 1.0, 0.0, 0.0,
        0.0, 0.0, 0.5, 0.5,
        0.0, 0.0, 0.0, 1.0,
    )
}

/// A fixed 3D camera looking at the head
#[derive(Debug, Clone)]
pub struct Camera {
    pub position: Point3f,
    pub target: Point3f,
    pub up: Vector3f,
    pub fov: f32,
    pub aspect_ratio: f32,
    pub near: f32,
    pub far: f32,
}

impl Camera {
    /// Create a new camera
    pub fn new(
        position: Point3f,
        target: Point3f,
        up: Vector3f,
        fov: f32,
        aspect_ratio: f32,
        near: f32,
        far: f32,
    ) -> Self {
        Self {
            position,
            target,
            up,
            fov,
            aspect_ratio,
            near,
            far,
        }
    }

    /// Get the view matrix
    pub fn view_matrix(&self) -> Matrix4<f32> {
        Matrix4::look_at_rh(&self.position, &self.target, &self.up)
    }

    /// Get the projection matrix, wgpu depth convention
    pub fn projection_matrix(&self) -> Matrix4<f32> {
        let perspective = Perspective3::new(self.aspect_ratio, self.fov, self.near, self.far);
        opengl_to_wgpu() * perspective.into_inner()
    }

    pub fn view_projection(&self) -> Matrix4<f32> {
        self.projection_matrix() * self.view_matrix()
    }
}

impl Default for Camera {
    /// Above and in front of the left side of the head, Z up
    fn default() -> Self {
        Self::new(
            Point3f::new(2.5, 2.5, 2.5),
            Point3f::origin(),
            Vector3f::z(),
            std::f32::consts::FRAC_PI_4,
            16.0 / 9.0,
            0.1,
            100.0,
        )
    }
}

/// Camera and viewport of the current frame
#[derive(Debug, Clone)]
pub struct ViewState {
    pub camera: Camera,
    width: u32,
    height: u32,
}

impl ViewState {
    pub fn new(camera: Camera, width: u32, height: u32) -> Self {
        let mut view = Self {
            camera,
            width: 1,
            height: 1,
        };
        view.resize(width, height);
        view
    }

    /// Track a new window size. Zero sizes (minimized windows) are ignored.
    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        self.width = width;
        self.height = height;
        self.camera.aspect_ratio = width as f32 / height as f32;
    }

    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn camera_uniform(&self) -> CameraUniform {
        CameraUniform::new(self.camera.view_projection(), self.camera.position)
    }
}

impl Default for ViewState {
    fn default() -> Self {
        Self::new(Camera::default(), 1200, 800)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use nalgebra::Vector4;

    #[test]
    fn test_projected_depth_in_wgpu_range() {
        let camera = Camera::default();
        let view_proj = camera.view_projection();
        for point in [Point3f::origin(), Point3f::new(1.0, 0.0, 0.0), Point3f::new(-1.0, -1.0, 0.0)] {
            let clip = view_proj * Vector4::new(point.x, point.y, point.z, 1.0);
            let depth = clip.z / clip.w;
            assert!((0.0..=1.0).contains(&depth), "depth {}", depth);
        }
    }

    #[test]
    fn test_resize_updates_aspect_and_ignores_zero() {
        let mut view = ViewState::default();
        view.resize(1000, 500);
        assert_relative_eq!(view.camera.aspect_ratio, 2.0);
        view.resize(0, 300);
        assert_eq!(view.size(), (1000, 500));
    }
}
