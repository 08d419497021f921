//! Backend-independent description of a frame
//!
//! A frame is an ordered list of [`DrawCommand`]s. It is built on the CPU by
//! the render loop and replayed against a [`SceneRenderer`]; the wgpu
//! implementation lives in [`crate::renderer`].

use brainviz_core::{Point3f, Result};
use bytemuck::{Pod, Zeroable};
use nalgebra::{Matrix4, Vector4};

/// Camera uniform data
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct CameraUniform {
    pub view_proj: [[f32; 4]; 4],
    pub eye: [f32; 3],
    pub _padding: f32,
}

impl CameraUniform {
    pub fn new(view_proj: Matrix4<f32>, eye: Point3f) -> Self {
        Self {
            view_proj: view_proj.into(),
            eye: eye.coords.into(),
            _padding: 0.0,
        }
    }

    pub fn view_proj_matrix(&self) -> Matrix4<f32> {
        Matrix4::from(self.view_proj)
    }
}

/// Directional light with an ambient term
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct LightingUniform {
    /// Direction towards the light, world space
    pub direction: [f32; 3],
    pub ambient: f32,
    pub color: [f32; 3],
    pub _padding: f32,
}

impl Default for LightingUniform {
    fn default() -> Self {
        Self {
            direction: [0.4, 0.3, 0.85],
            ambient: 0.35,
            color: [1.0, 1.0, 1.0],
            _padding: 0.0,
        }
    }
}

/// One instanced marker: an octahedron centered at `position`
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct Marker {
    pub position: [f32; 3],
    pub size: f32,
    pub color: [f32; 4],
}

impl Marker {
    pub fn new(position: Point3f, size: f32, color: [f32; 4]) -> Self {
        Self {
            position: position.coords.into(),
            size,
            color,
        }
    }

    /// Instance buffer layout, locations 2..=4
    pub fn desc<'a>() -> wgpu::VertexBufferLayout<'a> {
        const ATTRIBUTES: [wgpu::VertexAttribute; 3] =
            wgpu::vertex_attr_array![2 => Float32x3, 3 => Float32, 4 => Float32x4];
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Marker>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &ATTRIBUTES,
        }
    }
}

/// Text anchored at a world-space point
#[derive(Debug, Clone, PartialEq)]
pub struct Label {
    pub position: Point3f,
    pub text: String,
}

/// A single step of frame composition
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    /// Acquire the next frame and clear color and depth
    Clear([f64; 4]),
    Camera(CameraUniform),
    Lighting(LightingUniform),
    /// Screen-filling backdrop, drawn without depth
    Background,
    /// Uniform scene scale applied to everything drawn afterwards
    Scale(f32),
    Sources(Vec<Marker>),
    Electrodes { markers: Vec<Marker>, labels: Vec<Label> },
    /// Translucent brain mesh; depth-tested but never written to depth
    Mesh { model: Matrix4<f32> },
    Present,
}

/// Ordered draw commands for one display refresh
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Frame {
    pub commands: Vec<DrawCommand>,
}

impl Frame {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, command: DrawCommand) {
        self.commands.push(command);
    }

    pub fn iter(&self) -> std::slice::Iter<'_, DrawCommand> {
        self.commands.iter()
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}

/// Target that frames are replayed against
///
/// `begin_frame` failing means no frame could be acquired; the remaining
/// calls of that frame are skipped. Failures of the `draw_*` calls affect
/// only their own layer.
pub trait SceneRenderer {
    fn begin_frame(&mut self, clear_color: [f64; 4]) -> Result<()>;
    fn set_camera(&mut self, camera: &CameraUniform);
    fn set_lighting(&mut self, lighting: &LightingUniform);
    fn set_scale(&mut self, scale: f32);
    fn draw_background(&mut self) -> Result<()>;
    fn draw_markers(&mut self, markers: &[Marker]) -> Result<()>;
    fn draw_labels(&mut self, labels: &[Label]) -> Result<()>;
    fn draw_mesh(&mut self, model: &Matrix4<f32>) -> Result<()>;
    fn present(&mut self) -> Result<()>;
}

/// Project a world-space point to screen coordinates (origin top-left,
/// y down) in a viewport of `size`. Returns `None` for points behind the
/// camera or outside the depth range.
pub fn project_to_screen(view_proj: &Matrix4<f32>, point: &Point3f, size: [f32; 2]) -> Option<[f32; 2]> {
    let clip = view_proj * Vector4::new(point.x, point.y, point.z, 1.0);
    if clip.w <= f32::EPSILON {
        return None;
    }
    let ndc = clip.xyz() / clip.w;
    if !(-1.0..=1.0).contains(&ndc.z) {
        return None;
    }
    Some([
        (ndc.x + 1.0) * 0.5 * size[0],
        (1.0 - ndc.y) * 0.5 * size[1],
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use nalgebra::{Perspective3, Vector3};

    fn view_proj() -> Matrix4<f32> {
        let view = Matrix4::look_at_rh(
            &Point3f::new(0.0, 0.0, 5.0),
            &Point3f::origin(),
            &Vector3::y(),
        );
        let proj = Perspective3::new(1.0, std::f32::consts::FRAC_PI_4, 0.1, 100.0).into_inner();
        proj * view
    }

    #[test]
    fn test_target_projects_to_viewport_center() {
        let screen = project_to_screen(&view_proj(), &Point3f::origin(), [800.0, 600.0]).unwrap();
        assert_relative_eq!(screen[0], 400.0, epsilon = 1e-3);
        assert_relative_eq!(screen[1], 300.0, epsilon = 1e-3);
    }

    #[test]
    fn test_screen_y_points_down() {
        let above = project_to_screen(&view_proj(), &Point3f::new(0.0, 1.0, 0.0), [800.0, 600.0]).unwrap();
        let right = project_to_screen(&view_proj(), &Point3f::new(1.0, 0.0, 0.0), [800.0, 600.0]).unwrap();
        assert!(above[1] < 300.0);
        assert!(right[0] > 400.0);
    }

    #[test]
    fn test_point_behind_camera_is_not_projected() {
        assert!(project_to_screen(&view_proj(), &Point3f::new(0.0, 0.0, 10.0), [800.0, 600.0]).is_none());
    }

    #[test]
    fn test_gpu_struct_sizes() {
        assert_eq!(std::mem::size_of::<CameraUniform>(), 80);
        assert_eq!(std::mem::size_of::<LightingUniform>(), 32);
        assert_eq!(std::mem::size_of::<Marker>(), 32);
    }
}
