//! wgpu scene renderer
//!
//! Every layer of a frame is recorded as its own render pass into a single
//! command encoder, which is submitted on `present`. Electrode labels are
//! painted with egui on top of the 3D layers.

use crate::device::GpuContext;
use crate::scene::{project_to_screen, CameraUniform, Label, LightingUniform, Marker, SceneRenderer};
use brainviz_core::{Error, Result, TriangleMesh};
use bytemuck::{Pod, Zeroable};
use nalgebra::Matrix4;
use std::sync::Arc;
use winit::window::Window;

const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

/// Vertex data for meshes and marker glyphs
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct MeshVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
}

impl MeshVertex {
    /// Vertex buffer layout descriptor
    pub fn desc<'a>() -> wgpu::VertexBufferLayout<'a> {
        const ATTRIBUTES: [wgpu::VertexAttribute; 2] =
            wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x3];
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<MeshVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &ATTRIBUTES,
        }
    }
}

#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
struct ModelUniform {
    transform: [[f32; 4]; 4],
    color: [f32; 4],
}

#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
struct BackgroundUniform {
    top: [f32; 4],
    bottom: [f32; 4],
}

/// Scene rendering configuration
#[derive(Debug, Clone)]
pub struct SceneConfig {
    pub background_top: [f32; 4],
    pub background_bottom: [f32; 4],
    /// Brain mesh color; alpha below 1 makes the shell translucent
    pub mesh_color: [f32; 4],
    pub label_color: [u8; 3],
    pub label_font_size: f32,
    pub vsync: bool,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            background_top: [0.10, 0.12, 0.18, 1.0],
            background_bottom: [0.01, 0.01, 0.02, 1.0],
            mesh_color: [0.85, 0.70, 0.70, 0.35],
            label_color: [230, 230, 230],
            label_font_size: 12.0,
            vsync: true,
        }
    }
}

struct IndexedBuffers {
    vertices: wgpu::Buffer,
    indices: wgpu::Buffer,
    index_count: u32,
}

struct FrameTarget {
    output: wgpu::SurfaceTexture,
    view: wgpu::TextureView,
    encoder: wgpu::CommandEncoder,
}

/// Renders brainviz frames into a window with wgpu
pub struct WgpuSceneRenderer {
    window: Arc<Window>,
    gpu: GpuContext,
    surface: wgpu::Surface<'static>,
    surface_config: wgpu::SurfaceConfiguration,
    depth_view: wgpu::TextureView,
    config: SceneConfig,

    camera: CameraUniform,
    scale: f32,
    camera_buffer: wgpu::Buffer,
    lighting_buffer: wgpu::Buffer,
    scene_bind_group: wgpu::BindGroup,
    model_buffer: wgpu::Buffer,
    model_bind_group: wgpu::BindGroup,
    background_bind_group: wgpu::BindGroup,

    background_pipeline: wgpu::RenderPipeline,
    marker_pipeline: wgpu::RenderPipeline,
    mesh_pipeline: wgpu::RenderPipeline,

    glyph: IndexedBuffers,
    mesh: Option<IndexedBuffers>,

    egui_ctx: egui::Context,
    egui_state: egui_winit::State,
    egui_renderer: egui_wgpu::Renderer,
    labels: Vec<(egui::Pos2, String)>,

    frame: Option<FrameTarget>,
}

impl WgpuSceneRenderer {
    /// Create a renderer presenting to `window`
    pub async fn new(window: Arc<Window>, config: SceneConfig) -> Result<Self> {
        let (gpu, surface) = GpuContext::for_window(Arc::clone(&window)).await?;

        let surface_caps = surface.get_capabilities(&gpu.adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .copied()
            .find(|f| f.is_srgb())
            .or_else(|| surface_caps.formats.first().copied())
            .ok_or_else(|| Error::Gpu("Surface reports no supported formats".to_string()))?;
        let alpha_mode = surface_caps
            .alpha_modes
            .first()
            .copied()
            .unwrap_or(wgpu::CompositeAlphaMode::Auto);

        let size = window.inner_size();
        let surface_config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: if config.vsync {
                wgpu::PresentMode::AutoVsync
            } else {
                wgpu::PresentMode::AutoNoVsync
            },
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&gpu.device, &surface_config);
        let depth_view = create_depth_view(&gpu.device, &surface_config);

        let camera = CameraUniform::new(Matrix4::identity(), nalgebra::Point3::origin());
        let camera_buffer = gpu.create_buffer_init(
            "Camera Buffer",
            &[camera],
            wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        );
        let lighting_buffer = gpu.create_buffer_init(
            "Lighting Buffer",
            &[LightingUniform::default()],
            wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        );
        let model_buffer = gpu.create_buffer_init(
            "Model Buffer",
            &[ModelUniform {
                transform: Matrix4::identity().into(),
                color: config.mesh_color,
            }],
            wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        );
        let background_buffer = gpu.create_buffer_init(
            "Background Buffer",
            &[BackgroundUniform {
                top: config.background_top,
                bottom: config.background_bottom,
            }],
            wgpu::BufferUsages::UNIFORM,
        );

        let all_stages = wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT;
        let scene_layout = gpu.create_uniform_layout("scene_bind_group_layout", &[all_stages, all_stages]);
        let model_layout = gpu.create_uniform_layout("model_bind_group_layout", &[all_stages]);
        let background_layout =
            gpu.create_uniform_layout("background_bind_group_layout", &[wgpu::ShaderStages::FRAGMENT]);

        let scene_bind_group =
            gpu.create_buffer_bind_group("scene_bind_group", &scene_layout, &[&camera_buffer, &lighting_buffer]);
        let model_bind_group = gpu.create_buffer_bind_group("model_bind_group", &model_layout, &[&model_buffer]);
        let background_bind_group =
            gpu.create_buffer_bind_group("background_bind_group", &background_layout, &[&background_buffer]);

        let background_shader = gpu.create_shader_module("Background Shader", include_str!("shaders/background.wgsl"));
        let marker_shader = gpu.create_shader_module("Marker Shader", include_str!("shaders/marker.wgsl"));
        let mesh_shader = gpu.create_shader_module("Mesh Shader", include_str!("shaders/mesh.wgsl"));

        let background_pipeline = create_render_pipeline(
            &gpu.device,
            "Background",
            &[&background_layout],
            &background_shader,
            &[],
            surface_format,
            None,
            wgpu::BlendState::REPLACE,
        );
        let marker_pipeline = create_render_pipeline(
            &gpu.device,
            "Marker",
            &[&scene_layout],
            &marker_shader,
            &[MeshVertex::desc(), Marker::desc()],
            surface_format,
            Some(true),
            wgpu::BlendState::ALPHA_BLENDING,
        );
        let mesh_pipeline = create_render_pipeline(
            &gpu.device,
            "Mesh",
            &[&scene_layout, &model_layout],
            &mesh_shader,
            &[MeshVertex::desc()],
            surface_format,
            Some(false),
            wgpu::BlendState::ALPHA_BLENDING,
        );

        let (glyph_vertices, glyph_indices) = octahedron();
        let glyph = upload_indexed(&gpu, "Marker Glyph", &glyph_vertices, &glyph_indices);

        let egui_ctx = egui::Context::default();
        let egui_state = egui_winit::State::new(
            egui_ctx.clone(),
            egui::ViewportId::ROOT,
            window.as_ref(),
            Some(window.scale_factor() as f32),
            None,
        );
        let egui_renderer = egui_wgpu::Renderer::new(&gpu.device, surface_format, None, 1);

        log::info!(
            "Scene renderer ready: {}x{} {:?}",
            surface_config.width,
            surface_config.height,
            surface_format
        );

        Ok(Self {
            window,
            gpu,
            surface,
            surface_config,
            depth_view,
            config,
            camera,
            scale: 1.0,
            camera_buffer,
            lighting_buffer,
            scene_bind_group,
            model_buffer,
            model_bind_group,
            background_bind_group,
            background_pipeline,
            marker_pipeline,
            mesh_pipeline,
            glyph,
            mesh: None,
            egui_ctx,
            egui_state,
            egui_renderer,
            labels: Vec::new(),
            frame: None,
        })
    }

    pub fn window(&self) -> &Arc<Window> {
        &self.window
    }

    pub fn config(&self) -> &SceneConfig {
        &self.config
    }

    /// Upload the brain mesh drawn by `draw_mesh`
    pub fn set_mesh(&mut self, mesh: &TriangleMesh) -> Result<()> {
        if mesh.is_empty() {
            return Err(Error::InvalidData("Cannot upload a mesh without faces".to_string()));
        }
        mesh.validate()?;

        let computed;
        let normals = match &mesh.normals {
            Some(normals) if normals.len() == mesh.vertex_count() => normals,
            _ => {
                let mut with_normals = mesh.clone();
                with_normals.compute_vertex_normals();
                computed = with_normals.normals.unwrap_or_default();
                &computed
            }
        };

        let vertices: Vec<MeshVertex> = mesh
            .vertices
            .iter()
            .zip(normals)
            .map(|(p, n)| MeshVertex {
                position: p.coords.into(),
                normal: (*n).into(),
            })
            .collect();
        let indices = mesh
            .faces
            .iter()
            .flatten()
            .map(|&i| u32::try_from(i).map_err(|_| Error::Gpu(format!("Vertex index {} exceeds u32", i))))
            .collect::<Result<Vec<u32>>>()?;

        self.mesh = Some(upload_indexed(&self.gpu, "Brain Mesh", &vertices, &indices));
        log::debug!("Uploaded mesh with {} vertices", vertices.len());
        Ok(())
    }

    /// Resize the surface and depth buffer. Zero-sized windows are ignored.
    pub fn resize(&mut self, new_size: winit::dpi::PhysicalSize<u32>) {
        if new_size.width > 0 && new_size.height > 0 {
            self.surface_config.width = new_size.width;
            self.surface_config.height = new_size.height;
            self.surface.configure(&self.gpu.device, &self.surface_config);
            self.depth_view = create_depth_view(&self.gpu.device, &self.surface_config);
        }
    }

    fn upload_camera(&self) {
        let view_proj = self.camera.view_proj_matrix() * Matrix4::new_scaling(self.scale);
        let uniform = CameraUniform {
            view_proj: view_proj.into(),
            ..self.camera
        };
        self.gpu
            .queue
            .write_buffer(&self.camera_buffer, 0, bytemuck::bytes_of(&uniform));
    }
}

fn no_frame() -> Error {
    Error::Visualization("No frame in progress".to_string())
}

impl SceneRenderer for WgpuSceneRenderer {
    fn begin_frame(&mut self, clear_color: [f64; 4]) -> Result<()> {
        if self.frame.take().is_some() {
            log::warn!("Previous frame was never presented; dropping it");
        }
        self.labels.clear();

        let output = match self.surface.get_current_texture() {
            Ok(output) => output,
            Err(e @ (wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated)) => {
                self.surface.configure(&self.gpu.device, &self.surface_config);
                return Err(e.into());
            }
            Err(e) => return Err(e.into()),
        };
        let view = output.texture.create_view(&wgpu::TextureViewDescriptor::default());
        let mut encoder = self
            .gpu
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Frame Encoder"),
            });

        encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("Clear Pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: &view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(wgpu::Color {
                        r: clear_color[0],
                        g: clear_color[1],
                        b: clear_color[2],
                        a: clear_color[3],
                    }),
                    store: wgpu::StoreOp::Store,
                },
            })],
            depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                view: &self.depth_view,
                depth_ops: Some(wgpu::Operations {
                    load: wgpu::LoadOp::Clear(1.0),
                    store: wgpu::StoreOp::Store,
                }),
                stencil_ops: None,
            }),
            timestamp_writes: None,
            occlusion_query_set: None,
        });

        self.frame = Some(FrameTarget { output, view, encoder });
        Ok(())
    }

    fn set_camera(&mut self, camera: &CameraUniform) {
        self.camera = *camera;
        self.upload_camera();
    }

    fn set_lighting(&mut self, lighting: &LightingUniform) {
        self.gpu
            .queue
            .write_buffer(&self.lighting_buffer, 0, bytemuck::bytes_of(lighting));
    }

    fn set_scale(&mut self, scale: f32) {
        self.scale = scale;
        self.upload_camera();
    }

    fn draw_background(&mut self) -> Result<()> {
        let frame = self.frame.as_mut().ok_or_else(no_frame)?;
        let mut pass = frame.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("Background Pass"),
            color_attachments: &[Some(load_color(&frame.view))],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
        });
        pass.set_pipeline(&self.background_pipeline);
        pass.set_bind_group(0, &self.background_bind_group, &[]);
        pass.draw(0..3, 0..1);
        Ok(())
    }

    fn draw_markers(&mut self, markers: &[Marker]) -> Result<()> {
        if markers.is_empty() {
            return Ok(());
        }
        let frame = self.frame.as_mut().ok_or_else(no_frame)?;
        let instances = self
            .gpu
            .create_buffer_init("Marker Instances", markers, wgpu::BufferUsages::VERTEX);

        let mut pass = frame.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("Marker Pass"),
            color_attachments: &[Some(load_color(&frame.view))],
            depth_stencil_attachment: Some(load_depth(&self.depth_view)),
            timestamp_writes: None,
            occlusion_query_set: None,
        });
        pass.set_pipeline(&self.marker_pipeline);
        pass.set_bind_group(0, &self.scene_bind_group, &[]);
        pass.set_vertex_buffer(0, self.glyph.vertices.slice(..));
        pass.set_vertex_buffer(1, instances.slice(..));
        pass.set_index_buffer(self.glyph.indices.slice(..), wgpu::IndexFormat::Uint32);
        pass.draw_indexed(0..self.glyph.index_count, 0, 0..markers.len() as u32);
        Ok(())
    }

    fn draw_labels(&mut self, labels: &[Label]) -> Result<()> {
        if self.frame.is_none() {
            return Err(no_frame());
        }
        let pixels_per_point = egui_winit::pixels_per_point(&self.egui_ctx, &self.window);
        let size = [
            self.surface_config.width as f32 / pixels_per_point,
            self.surface_config.height as f32 / pixels_per_point,
        ];
        let view_proj = self.camera.view_proj_matrix() * Matrix4::new_scaling(self.scale);

        self.labels.extend(labels.iter().filter_map(|label| {
            project_to_screen(&view_proj, &label.position, size)
                .map(|[x, y]| (egui::pos2(x, y), label.text.clone()))
        }));
        Ok(())
    }

    fn draw_mesh(&mut self, model: &Matrix4<f32>) -> Result<()> {
        let mesh = self
            .mesh
            .as_ref()
            .ok_or_else(|| Error::Visualization("No brain mesh uploaded".to_string()))?;
        let frame = self.frame.as_mut().ok_or_else(no_frame)?;

        let uniform = ModelUniform {
            transform: (*model).into(),
            color: self.config.mesh_color,
        };
        self.gpu
            .queue
            .write_buffer(&self.model_buffer, 0, bytemuck::bytes_of(&uniform));

        let mut pass = frame.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("Mesh Pass"),
            color_attachments: &[Some(load_color(&frame.view))],
            depth_stencil_attachment: Some(load_depth(&self.depth_view)),
            timestamp_writes: None,
            occlusion_query_set: None,
        });
        pass.set_pipeline(&self.mesh_pipeline);
        pass.set_bind_group(0, &self.scene_bind_group, &[]);
        pass.set_bind_group(1, &self.model_bind_group, &[]);
        pass.set_vertex_buffer(0, mesh.vertices.slice(..));
        pass.set_index_buffer(mesh.indices.slice(..), wgpu::IndexFormat::Uint32);
        pass.draw_indexed(0..mesh.index_count, 0, 0..1);
        Ok(())
    }

    fn present(&mut self) -> Result<()> {
        let mut frame = self.frame.take().ok_or_else(no_frame)?;

        let raw_input = self.egui_state.take_egui_input(&self.window);
        let labels = std::mem::take(&mut self.labels);
        let [r, g, b] = self.config.label_color;
        let font = egui::FontId::proportional(self.config.label_font_size);
        let full_output = self.egui_ctx.run(raw_input, |ctx| {
            let painter = ctx.layer_painter(egui::LayerId::background());
            for (pos, text) in &labels {
                painter.text(
                    *pos,
                    egui::Align2::LEFT_BOTTOM,
                    text,
                    font.clone(),
                    egui::Color32::from_rgb(r, g, b),
                );
            }
        });

        let screen = egui_wgpu::ScreenDescriptor {
            size_in_pixels: [self.surface_config.width, self.surface_config.height],
            pixels_per_point: full_output.pixels_per_point,
        };
        let jobs = self
            .egui_ctx
            .tessellate(full_output.shapes, full_output.pixels_per_point);
        for (id, delta) in &full_output.textures_delta.set {
            self.egui_renderer
                .update_texture(&self.gpu.device, &self.gpu.queue, *id, delta);
        }
        let egui_commands = self.egui_renderer.update_buffers(
            &self.gpu.device,
            &self.gpu.queue,
            &mut frame.encoder,
            &jobs,
            &screen,
        );
        {
            let mut pass = frame.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Label Pass"),
                color_attachments: &[Some(load_color(&frame.view))],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });
            self.egui_renderer.render(&mut pass, &jobs, &screen);
        }
        for id in &full_output.textures_delta.free {
            self.egui_renderer.free_texture(id);
        }

        self.gpu
            .queue
            .submit(egui_commands.into_iter().chain(std::iter::once(frame.encoder.finish())));
        frame.output.present();
        Ok(())
    }
}

fn load_color(view: &wgpu::TextureView) -> wgpu::RenderPassColorAttachment<'_> {
    wgpu::RenderPassColorAttachment {
        view,
        resolve_target: None,
        ops: wgpu::Operations {
            load: wgpu::LoadOp::Load,
            store: wgpu::StoreOp::Store,
        },
    }
}

fn load_depth(view: &wgpu::TextureView) -> wgpu::RenderPassDepthStencilAttachment<'_> {
    wgpu::RenderPassDepthStencilAttachment {
        view,
        depth_ops: Some(wgpu::Operations {
            load: wgpu::LoadOp::Load,
            store: wgpu::StoreOp::Store,
        }),
        stencil_ops: None,
    }
}

fn create_depth_view(device: &wgpu::Device, config: &wgpu::SurfaceConfiguration) -> wgpu::TextureView {
    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some("Depth Texture"),
        size: wgpu::Extent3d {
            width: config.width,
            height: config.height,
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: DEPTH_FORMAT,
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
        view_formats: &[],
    });
    texture.create_view(&wgpu::TextureViewDescriptor::default())
}

/// `depth_write`: `None` for no depth attachment, otherwise whether the
/// pipeline writes depth (it always tests it)
#[allow(clippy::too_many_arguments)]
fn create_render_pipeline(
    device: &wgpu::Device,
    label: &str,
    bind_group_layouts: &[&wgpu::BindGroupLayout],
    shader: &wgpu::ShaderModule,
    buffers: &[wgpu::VertexBufferLayout],
    format: wgpu::TextureFormat,
    depth_write: Option<bool>,
    blend: wgpu::BlendState,
) -> wgpu::RenderPipeline {
    let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some(&format!("{} Pipeline Layout", label)),
        bind_group_layouts,
        push_constant_ranges: &[],
    });

    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some(&format!("{} Pipeline", label)),
        layout: Some(&layout),
        vertex: wgpu::VertexState {
            module: shader,
            entry_point: "vs_main",
            compilation_options: wgpu::PipelineCompilationOptions::default(),
            buffers,
        },
        fragment: Some(wgpu::FragmentState {
            module: shader,
            entry_point: "fs_main",
            compilation_options: wgpu::PipelineCompilationOptions::default(),
            targets: &[Some(wgpu::ColorTargetState {
                format,
                blend: Some(blend),
                write_mask: wgpu::ColorWrites::ALL,
            })],
        }),
        primitive: wgpu::PrimitiveState {
            topology: wgpu::PrimitiveTopology::TriangleList,
            strip_index_format: None,
            front_face: wgpu::FrontFace::Ccw,
            cull_mode: None,
            unclipped_depth: false,
            polygon_mode: wgpu::PolygonMode::Fill,
            conservative: false,
        },
        depth_stencil: depth_write.map(|depth_write_enabled| wgpu::DepthStencilState {
            format: DEPTH_FORMAT,
            depth_write_enabled,
            depth_compare: wgpu::CompareFunction::Less,
            stencil: wgpu::StencilState::default(),
            bias: wgpu::DepthBiasState::default(),
        }),
        multisample: wgpu::MultisampleState::default(),
        multiview: None,
    })
}

fn upload_indexed(gpu: &GpuContext, label: &str, vertices: &[MeshVertex], indices: &[u32]) -> IndexedBuffers {
    IndexedBuffers {
        vertices: gpu.create_buffer_init(&format!("{} Vertices", label), vertices, wgpu::BufferUsages::VERTEX),
        indices: gpu.create_buffer_init(&format!("{} Indices", label), indices, wgpu::BufferUsages::INDEX),
        index_count: indices.len() as u32,
    }
}

/// Unit octahedron with flat-shaded faces, used as the marker glyph
pub fn octahedron() -> (Vec<MeshVertex>, Vec<u32>) {
    let mut vertices = Vec::with_capacity(24);
    for sx in [1.0f32, -1.0] {
        for sy in [1.0f32, -1.0] {
            for sz in [1.0f32, -1.0] {
                let normal = [sx, sy, sz].map(|c| c / 3.0f32.sqrt());
                let corners = [[sx, 0.0, 0.0], [0.0, sy, 0.0], [0.0, 0.0, sz]];
                // Counter-clockwise seen from outside
                let ordered = if sx * sy * sz > 0.0 {
                    corners
                } else {
                    [corners[0], corners[2], corners[1]]
                };
                vertices.extend(ordered.iter().map(|&position| MeshVertex { position, normal }));
            }
        }
    }
    let indices = (0..vertices.len() as u32).collect();
    (vertices, indices)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use nalgebra::Vector3;

    #[test]
    fn test_octahedron_faces_point_outwards() {
        let (vertices, indices) = octahedron();
        assert_eq!(vertices.len(), 24);
        assert_eq!(indices.len(), 24);

        for face in vertices.chunks(3) {
            let [a, b, c] = [face[0], face[1], face[2]].map(|v| Vector3::from(v.position));
            let winding = (b - a).cross(&(c - a));
            let normal = Vector3::from(face[0].normal);
            assert_relative_eq!(normal.norm(), 1.0, epsilon = 1e-6);
            assert!(winding.dot(&normal) > 0.0);
            let centroid = (a + b + c) / 3.0;
            assert!(centroid.dot(&normal) > 0.0);
        }
    }

    #[test]
    fn test_vertex_layout_matches_struct() {
        assert_eq!(std::mem::size_of::<MeshVertex>(), 24);
        assert_eq!(MeshVertex::desc().array_stride, 24);
        assert_eq!(std::mem::size_of::<ModelUniform>(), 80);
    }
}
