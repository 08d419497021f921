//! Interactive window
//!
//! Runs the winit event loop on the calling thread, feeding input to the
//! [`InteractionController`] and drawing a frame on every redraw.

use crate::camera::{Camera, ViewState};
use crate::controller::{ControllerConfig, InteractionController, RotateKey};
use crate::render_loop::{RenderConfig, RenderLoop};
use brainviz_core::{ElectrodeLayout, Error, Published, Result, SourceSnapshot, TriangleMesh};
use brainviz_gpu::{SceneConfig, WgpuSceneRenderer};
use std::sync::Arc;
use winit::{
    dpi::PhysicalPosition,
    event::{ElementState, Event, MouseButton, MouseScrollDelta, WindowEvent},
    event_loop::{ControlFlow, EventLoop},
    keyboard::{Key, NamedKey},
    window::WindowBuilder,
};

/// Pixel-delta scroll distance counted as one wheel line
const PIXELS_PER_LINE: f64 = 40.0;

/// Window settings
#[derive(Debug, Clone)]
pub struct ViewerConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub scene: SceneConfig,
    pub render: RenderConfig,
    pub controller: ControllerConfig,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            title: "brainviz".to_string(),
            width: 1200,
            height: 800,
            scene: SceneConfig::default(),
            render: RenderConfig::default(),
            controller: ControllerConfig::default(),
        }
    }
}

/// Live viewer of the head, its electrodes and the localized sources
pub struct Viewer {
    config: ViewerConfig,
    controller: InteractionController,
    render_loop: RenderLoop,
    mesh: TriangleMesh,
}

impl Viewer {
    /// Create a new viewer showing snapshots from `snapshots`
    pub fn new(
        config: ViewerConfig,
        layout: Arc<ElectrodeLayout>,
        snapshots: Arc<Published<SourceSnapshot>>,
        mesh: TriangleMesh,
    ) -> Self {
        let controller = InteractionController::new(config.controller.clone());
        let render_loop = RenderLoop::new(snapshots, layout, config.render.clone());
        Self {
            config,
            controller,
            render_loop,
            mesh,
        }
    }

    /// Open the window and run until it is closed or Escape is pressed
    pub fn run(self) -> Result<()> {
        let Self {
            config,
            mut controller,
            mut render_loop,
            mesh,
        } = self;

        let event_loop = EventLoop::new()
            .map_err(|e| Error::Visualization(format!("Failed to create event loop: {}", e)))?;
        let window = Arc::new(
            WindowBuilder::new()
                .with_title(&config.title)
                .with_inner_size(winit::dpi::LogicalSize::new(config.width, config.height))
                .build(&event_loop)
                .map_err(|e| Error::Visualization(format!("Failed to create window: {}", e)))?,
        );

        let mut renderer = pollster::block_on(WgpuSceneRenderer::new(Arc::clone(&window), config.scene.clone()))?;
        renderer.set_mesh(&mesh)?;

        let size = window.inner_size();
        let mut view = ViewState::new(Camera::default(), size.width, size.height);
        let mut cursor: Option<PhysicalPosition<f64>> = None;
        let mut frames: u64 = 0;

        log::info!("Viewer running; drag or use the arrow keys to rotate, scroll to zoom, R to reset");

        event_loop
            .run(move |event, elwt| {
                elwt.set_control_flow(ControlFlow::Poll);

                match event {
                    Event::WindowEvent { event, window_id } if window_id == window.id() => match event {
                        WindowEvent::CloseRequested => elwt.exit(),
                        WindowEvent::Resized(new_size) => {
                            renderer.resize(new_size);
                            view.resize(new_size.width, new_size.height);
                        }
                        WindowEvent::MouseInput {
                            state,
                            button: MouseButton::Left,
                            ..
                        } => match state {
                            ElementState::Pressed => {
                                if let Some(position) = cursor {
                                    controller.press([position.x, position.y]);
                                }
                            }
                            ElementState::Released => controller.release(),
                        },
                        WindowEvent::CursorMoved { position, .. } => {
                            cursor = Some(position);
                            let size = window.inner_size();
                            controller.pointer_moved(
                                [position.x, position.y],
                                [size.width as f64, size.height as f64],
                            );
                        }
                        WindowEvent::CursorLeft { .. } => {
                            cursor = None;
                            controller.release();
                        }
                        WindowEvent::MouseWheel { delta, .. } => {
                            let lines = match delta {
                                MouseScrollDelta::LineDelta(_, y) => y,
                                MouseScrollDelta::PixelDelta(offset) => (offset.y / PIXELS_PER_LINE) as f32,
                            };
                            if controller.scroll(lines) {
                                log::debug!("Zoom {:.2}", controller.zoom().value());
                            }
                        }
                        WindowEvent::KeyboardInput { event, .. } if event.state == ElementState::Pressed => {
                            match &event.logical_key {
                                Key::Named(NamedKey::Escape) => elwt.exit(),
                                Key::Named(NamedKey::ArrowLeft) => controller.rotate_key(RotateKey::Left),
                                Key::Named(NamedKey::ArrowRight) => controller.rotate_key(RotateKey::Right),
                                Key::Named(NamedKey::ArrowUp) => controller.rotate_key(RotateKey::Up),
                                Key::Named(NamedKey::ArrowDown) => controller.rotate_key(RotateKey::Down),
                                Key::Character(c) if c.as_str().eq_ignore_ascii_case("r") => {
                                    controller.reset();
                                    log::info!("View reset");
                                }
                                _ => {}
                            }
                        }
                        WindowEvent::RedrawRequested => {
                            render_loop.draw(&mut renderer, controller.rotation(), controller.zoom(), &view);
                            frames += 1;
                        }
                        _ => {}
                    },
                    Event::AboutToWait => window.request_redraw(),
                    Event::LoopExiting => log::info!("Viewer closed after {} frames", frames),
                    _ => {}
                }
            })
            .map_err(|e| Error::Visualization(format!("Event loop error: {}", e)))
    }
}
