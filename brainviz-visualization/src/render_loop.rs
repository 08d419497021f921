//! Per-refresh frame composition
//!
//! [`compose_frame`] turns the current orientation, zoom and source snapshot
//! into an ordered [`Frame`]; [`render_frame`] replays it against a
//! [`SceneRenderer`]. Neither waits on the localization pipeline: the
//! snapshot is whatever was last published.

use crate::camera::ViewState;
use brainviz_core::{
    ElectrodeLayout, EstimateStatus, Published, RotationState, SourceSnapshot, ZoomState,
};
use brainviz_gpu::{DrawCommand, Frame, Label, LightingUniform, Marker, SceneRenderer};
use std::sync::Arc;

/// Colors and sizes of scene elements
#[derive(Debug, Clone)]
pub struct RenderConfig {
    pub clear_color: [f64; 4],
    pub lighting: LightingUniform,
    pub source_size: f32,
    pub source_color: [f32; 4],
    /// Color of sources whose last localization failed
    pub stale_source_color: [f32; 4],
    pub electrode_size: f32,
    pub electrode_color: [f32; 4],
    /// Labels sit this factor further out than their electrode
    pub label_offset: f32,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            clear_color: [0.0, 0.0, 0.0, 1.0],
            lighting: LightingUniform::default(),
            source_size: 0.07,
            source_color: [1.0, 0.25, 0.1, 1.0],
            stale_source_color: [0.6, 0.45, 0.4, 1.0],
            electrode_size: 0.035,
            electrode_color: [0.2, 0.6, 1.0, 1.0],
            label_offset: 1.08,
        }
    }
}

/// What happened when a frame was replayed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FrameReport {
    pub presented: bool,
    /// Draw steps that failed and were skipped
    pub failed_draws: usize,
}

/// Compose the draw commands of one frame.
///
/// Sources that were never localized are not drawn. Sources, electrodes
/// and mesh all follow the head orientation; zoom scales the whole scene.
pub fn compose_frame(
    rotation: &RotationState,
    zoom: &ZoomState,
    snapshot: &SourceSnapshot,
    layout: &ElectrodeLayout,
    view: &ViewState,
    config: &RenderConfig,
) -> Frame {
    let mut frame = Frame::new();
    frame.push(DrawCommand::Clear(config.clear_color));
    frame.push(DrawCommand::Camera(view.camera_uniform()));
    frame.push(DrawCommand::Lighting(config.lighting));
    frame.push(DrawCommand::Background);
    frame.push(DrawCommand::Scale(zoom.value()));

    let sources = snapshot
        .estimates()
        .iter()
        .filter(|estimate| estimate.is_known())
        .map(|estimate| {
            let color = match estimate.status {
                EstimateStatus::Stale => config.stale_source_color,
                _ => config.source_color,
            };
            Marker::new(rotation.transform_point(&estimate.position), config.source_size, color)
        })
        .collect();
    frame.push(DrawCommand::Sources(sources));

    let mut markers = Vec::with_capacity(layout.len());
    let mut labels = Vec::with_capacity(layout.len());
    for electrode in layout {
        let position = rotation.transform_point(&electrode.position);
        markers.push(Marker::new(position, config.electrode_size, config.electrode_color));
        labels.push(Label {
            position: position * config.label_offset,
            text: electrode.label.clone(),
        });
    }
    frame.push(DrawCommand::Electrodes { markers, labels });

    frame.push(DrawCommand::Mesh {
        model: rotation.to_transform().matrix,
    });
    frame.push(DrawCommand::Present);
    frame
}

/// Replay `frame` against `renderer`.
///
/// If no frame can be acquired the rest is skipped. A failing draw step is
/// logged and the frame is still presented.
pub fn render_frame(renderer: &mut dyn SceneRenderer, frame: &Frame) -> FrameReport {
    let mut report = FrameReport::default();

    for command in frame.iter() {
        let (step, result) = match command {
            DrawCommand::Clear(color) => {
                if let Err(e) = renderer.begin_frame(*color) {
                    log::warn!("Skipping frame: {}", e);
                    return report;
                }
                continue;
            }
            DrawCommand::Camera(camera) => {
                renderer.set_camera(camera);
                continue;
            }
            DrawCommand::Lighting(lighting) => {
                renderer.set_lighting(lighting);
                continue;
            }
            DrawCommand::Scale(scale) => {
                renderer.set_scale(*scale);
                continue;
            }
            DrawCommand::Background => ("background", renderer.draw_background()),
            DrawCommand::Sources(markers) => ("sources", renderer.draw_markers(markers)),
            DrawCommand::Electrodes { markers, labels } => (
                "electrodes",
                renderer
                    .draw_markers(markers)
                    .and_then(|()| renderer.draw_labels(labels)),
            ),
            DrawCommand::Mesh { model } => ("mesh", renderer.draw_mesh(model)),
            DrawCommand::Present => match renderer.present() {
                Ok(()) => {
                    report.presented = true;
                    continue;
                }
                Err(e) => ("present", Err(e)),
            },
        };

        if let Err(e) = result {
            log::error!("Failed to draw {}: {}", step, e);
            report.failed_draws += 1;
        }
    }

    report
}

/// Draws frames from the latest published snapshot
pub struct RenderLoop {
    snapshots: Arc<Published<SourceSnapshot>>,
    layout: Arc<ElectrodeLayout>,
    config: RenderConfig,
    last_cycle: u64,
}

impl RenderLoop {
    pub fn new(
        snapshots: Arc<Published<SourceSnapshot>>,
        layout: Arc<ElectrodeLayout>,
        config: RenderConfig,
    ) -> Self {
        Self {
            snapshots,
            layout,
            config,
            last_cycle: 0,
        }
    }

    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    /// Compose the next frame, loading the current snapshot once
    pub fn compose(&mut self, rotation: &RotationState, zoom: &ZoomState, view: &ViewState) -> Frame {
        let snapshot = self.snapshots.load();
        if snapshot.cycle() != self.last_cycle {
            log::trace!(
                "Showing snapshot {} ({} of {} fresh)",
                snapshot.cycle(),
                snapshot.fresh_count(),
                snapshot.len()
            );
            self.last_cycle = snapshot.cycle();
        }
        compose_frame(rotation, zoom, &snapshot, &self.layout, view, &self.config)
    }

    /// Compose and render one frame
    pub fn draw(
        &mut self,
        renderer: &mut dyn SceneRenderer,
        rotation: &RotationState,
        zoom: &ZoomState,
        view: &ViewState,
    ) -> FrameReport {
        let frame = self.compose(rotation, zoom, view);
        render_frame(renderer, &frame)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use brainviz_core::{
        Electrode, Error, Point3f, Result, SourceEstimate, UnitQuaternion, Vector3f, ZoomConfig,
    };
    use brainviz_gpu::CameraUniform;
    use nalgebra::Matrix4;

    #[derive(Debug, Clone, PartialEq)]
    enum Call {
        Begin,
        Camera,
        Lighting,
        Scale(f32),
        Background,
        Markers(usize),
        Labels(Vec<String>),
        Mesh,
        Present,
    }

    #[derive(Default)]
    struct RecordingRenderer {
        calls: Vec<Call>,
        fail_begin: bool,
        fail_mesh: bool,
    }

    impl SceneRenderer for RecordingRenderer {
        fn begin_frame(&mut self, _clear_color: [f64; 4]) -> Result<()> {
            if self.fail_begin {
                return Err(Error::Gpu("surface lost".to_string()));
            }
            self.calls.push(Call::Begin);
            Ok(())
        }

        fn set_camera(&mut self, _camera: &CameraUniform) {
            self.calls.push(Call::Camera);
        }

        fn set_lighting(&mut self, _lighting: &LightingUniform) {
            self.calls.push(Call::Lighting);
        }

        fn set_scale(&mut self, scale: f32) {
            self.calls.push(Call::Scale(scale));
        }

        fn draw_background(&mut self) -> Result<()> {
            self.calls.push(Call::Background);
            Ok(())
        }

        fn draw_markers(&mut self, markers: &[Marker]) -> Result<()> {
            self.calls.push(Call::Markers(markers.len()));
            Ok(())
        }

        fn draw_labels(&mut self, labels: &[Label]) -> Result<()> {
            self.calls.push(Call::Labels(labels.iter().map(|l| l.text.clone()).collect()));
            Ok(())
        }

        fn draw_mesh(&mut self, _model: &Matrix4<f32>) -> Result<()> {
            if self.fail_mesh {
                return Err(Error::Visualization("mesh buffer missing".to_string()));
            }
            self.calls.push(Call::Mesh);
            Ok(())
        }

        fn present(&mut self) -> Result<()> {
            self.calls.push(Call::Present);
            Ok(())
        }
    }

    fn layout() -> ElectrodeLayout {
        ElectrodeLayout::new(vec![
            Electrode::new("Fz", Point3f::new(1.0, 0.0, 0.0)),
            Electrode::new("Cz", Point3f::new(0.0, 0.0, 1.0)),
        ])
        .unwrap()
    }

    fn snapshot() -> SourceSnapshot {
        SourceSnapshot::new(
            4,
            vec![
                SourceEstimate::fresh(Point3f::new(0.5, 0.0, 0.0)),
                SourceEstimate::unknown(),
                SourceEstimate::fresh(Point3f::new(0.0, 0.5, 0.0)).into_stale(),
            ],
        )
    }

    #[test]
    fn test_frame_layers_are_ordered() {
        let frame = compose_frame(
            &RotationState::identity(),
            &ZoomState::default(),
            &snapshot(),
            &layout(),
            &ViewState::default(),
            &RenderConfig::default(),
        );
        let kinds: Vec<&str> = frame
            .iter()
            .map(|command| match command {
                DrawCommand::Clear(_) => "clear",
                DrawCommand::Camera(_) => "camera",
                DrawCommand::Lighting(_) => "lighting",
                DrawCommand::Background => "background",
                DrawCommand::Scale(_) => "scale",
                DrawCommand::Sources(_) => "sources",
                DrawCommand::Electrodes { .. } => "electrodes",
                DrawCommand::Mesh { .. } => "mesh",
                DrawCommand::Present => "present",
            })
            .collect();
        assert_eq!(
            kinds,
            ["clear", "camera", "lighting", "background", "scale", "sources", "electrodes", "mesh", "present"]
        );
    }

    #[test]
    fn test_unknown_sources_are_hidden_and_stale_ones_dimmed() {
        let config = RenderConfig::default();
        let frame = compose_frame(
            &RotationState::identity(),
            &ZoomState::default(),
            &snapshot(),
            &layout(),
            &ViewState::default(),
            &config,
        );
        let sources = frame
            .iter()
            .find_map(|command| match command {
                DrawCommand::Sources(markers) => Some(markers.clone()),
                _ => None,
            })
            .unwrap();
        assert_eq!(sources.len(), 2);
        assert_eq!(sources[0].color, config.source_color);
        assert_eq!(sources[1].color, config.stale_source_color);
    }

    #[test]
    fn test_scene_follows_rotation_and_zoom() {
        let rotation = RotationState::from_quaternion(UnitQuaternion::from_axis_angle(
            &Vector3f::z_axis(),
            std::f32::consts::FRAC_PI_2,
        ));
        let mut zoom = ZoomState::new(ZoomConfig::default());
        zoom.step_by(4);

        let frame = compose_frame(
            &rotation,
            &zoom,
            &snapshot(),
            &layout(),
            &ViewState::default(),
            &RenderConfig::default(),
        );
        for command in frame.iter() {
            match command {
                DrawCommand::Scale(scale) => assert_relative_eq!(*scale, 1.2, epsilon = 1e-5),
                DrawCommand::Sources(markers) => {
                    assert_relative_eq!(markers[0].position[1], 0.5, epsilon = 1e-6);
                }
                DrawCommand::Electrodes { markers, labels } => {
                    // Fz (nose) turned a quarter turn to the left ear
                    assert_relative_eq!(markers[0].position[0], 0.0, epsilon = 1e-6);
                    assert_relative_eq!(markers[0].position[1], 1.0, epsilon = 1e-6);
                    assert_eq!(labels[0].text, "Fz");
                    assert!(labels[0].position.y > 1.0);
                }
                DrawCommand::Mesh { model } => {
                    assert_relative_eq!(*model, rotation.to_transform().matrix, epsilon = 1e-6);
                }
                _ => {}
            }
        }
    }

    #[test]
    fn test_render_frame_replays_every_step() {
        let frame = compose_frame(
            &RotationState::identity(),
            &ZoomState::default(),
            &snapshot(),
            &layout(),
            &ViewState::default(),
            &RenderConfig::default(),
        );
        let mut renderer = RecordingRenderer::default();
        let report = render_frame(&mut renderer, &frame);

        assert_eq!(report, FrameReport { presented: true, failed_draws: 0 });
        assert_eq!(
            renderer.calls,
            vec![
                Call::Begin,
                Call::Camera,
                Call::Lighting,
                Call::Background,
                Call::Scale(1.0),
                Call::Markers(2),
                Call::Markers(2),
                Call::Labels(vec!["Fz".to_string(), "Cz".to_string()]),
                Call::Mesh,
                Call::Present,
            ]
        );
    }

    #[test]
    fn test_failed_draw_still_presents() {
        let frame = compose_frame(
            &RotationState::identity(),
            &ZoomState::default(),
            &snapshot(),
            &layout(),
            &ViewState::default(),
            &RenderConfig::default(),
        );
        let mut renderer = RecordingRenderer {
            fail_mesh: true,
            ..Default::default()
        };
        let report = render_frame(&mut renderer, &frame);

        assert!(report.presented);
        assert_eq!(report.failed_draws, 1);
        assert_eq!(renderer.calls.last(), Some(&Call::Present));
        assert!(!renderer.calls.contains(&Call::Mesh));
    }

    #[test]
    fn test_unavailable_frame_is_skipped() {
        let frame = compose_frame(
            &RotationState::identity(),
            &ZoomState::default(),
            &snapshot(),
            &layout(),
            &ViewState::default(),
            &RenderConfig::default(),
        );
        let mut renderer = RecordingRenderer {
            fail_begin: true,
            ..Default::default()
        };
        let report = render_frame(&mut renderer, &frame);

        assert!(!report.presented);
        assert!(renderer.calls.is_empty());
    }

    #[test]
    fn test_render_loop_reads_latest_snapshot() {
        let snapshots = Arc::new(Published::new(SourceSnapshot::initial(3)));
        let mut render_loop = RenderLoop::new(Arc::clone(&snapshots), Arc::new(layout()), RenderConfig::default());
        let view = ViewState::default();
        let rotation = RotationState::identity();
        let zoom = ZoomState::default();

        let mut renderer = RecordingRenderer::default();
        render_loop.draw(&mut renderer, &rotation, &zoom, &view);
        assert!(renderer.calls.contains(&Call::Markers(0)));

        snapshots.publish(snapshot());
        let mut renderer = RecordingRenderer::default();
        render_loop.draw(&mut renderer, &rotation, &zoom, &view);
        assert_eq!(renderer.calls[5], Call::Markers(2));
    }
}
