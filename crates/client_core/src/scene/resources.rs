use std::{slice, sync::Arc};

use rand::Rng;
use tokio::sync::mpsc;
use tracing::debug;

use super::{
    backend::{BufferId, DrawItem, FrameSnapshot, GeometryUpload, Primitive, RenderBackend, SurfaceId},
    geometry::{normalize_pointer, ring_outlines, Camera, PointCloud, SceneMotion},
    input::{EventTarget, InputKind, InputSink, ListenerId, SceneInput},
    SceneError, SurfaceRegion,
};

const POINT_OPACITY: f32 = 0.8;

/// Everything one mounted scene has acquired. Dropping it releases each
/// resource exactly once, including after a partially failed build.
pub(crate) struct SceneResources {
    backend: Box<dyn RenderBackend>,
    events: Arc<dyn EventTarget>,
    surface: Option<SurfaceId>,
    cloud: Option<BufferId>,
    rings: Vec<BufferId>,
    listeners: Vec<ListenerId>,
    camera: Camera,
    motion: SceneMotion,
}

impl SceneResources {
    pub(crate) fn build<R: Rng + ?Sized>(
        backend: Box<dyn RenderBackend>,
        region: &SurfaceRegion,
        events: Arc<dyn EventTarget>,
        input_tx: &mpsc::UnboundedSender<SceneInput>,
        rng: &mut R,
    ) -> Result<Self, SceneError> {
        let cloud = PointCloud::generate(rng);
        let outlines = ring_outlines();

        let mut resources = Self {
            backend,
            events,
            surface: None,
            cloud: None,
            rings: Vec::with_capacity(outlines.len()),
            listeners: Vec::with_capacity(3),
            camera: Camera::new(region.width, region.height, region.device_pixel_ratio),
            motion: SceneMotion::new(&cloud, &outlines),
        };

        resources.surface = Some(
            resources
                .backend
                .create_surface(region)
                .map_err(SceneError::Surface)?,
        );
        resources.cloud = Some(
            resources
                .backend
                .upload_geometry(GeometryUpload {
                    primitive: Primitive::Points,
                    positions: &cloud.positions,
                    colors: &cloud.colors,
                    sizes: &cloud.sizes,
                    opacity: POINT_OPACITY,
                })
                .map_err(SceneError::Geometry)?,
        );
        for outline in &outlines {
            let buffer = resources
                .backend
                .upload_geometry(GeometryUpload {
                    primitive: Primitive::LineStrip,
                    positions: &outline.positions,
                    colors: slice::from_ref(&outline.color),
                    sizes: &[],
                    opacity: outline.opacity,
                })
                .map_err(SceneError::Geometry)?;
            resources.rings.push(buffer);
        }

        for kind in [InputKind::PointerMove, InputKind::TouchMove, InputKind::Resize] {
            let id = resources
                .events
                .add_listener(kind, InputSink::new(input_tx.clone()));
            resources.listeners.push(id);
        }

        debug!(
            points = cloud.len(),
            rings = resources.rings.len(),
            width = region.width,
            height = region.height,
            "scene resources allocated"
        );
        Ok(resources)
    }

    pub(crate) fn render_frame(&mut self, elapsed_secs: f32) -> anyhow::Result<()> {
        self.motion.step(elapsed_secs);

        let (Some(surface), Some(cloud)) = (self.surface, self.cloud) else {
            return Ok(());
        };
        self.backend
            .write_positions(cloud, &self.motion.live_positions)?;

        let rings: Vec<DrawItem> = self
            .rings
            .iter()
            .zip(&self.motion.ring_rotations)
            .map(|(buffer, rotation)| DrawItem {
                buffer: *buffer,
                rotation: *rotation,
            })
            .collect();
        let frame = FrameSnapshot {
            elapsed_secs,
            camera: &self.camera,
            cloud: DrawItem {
                buffer: cloud,
                rotation: self.motion.cloud_rotation,
            },
            rings: &rings,
        };
        self.backend.draw(surface, &frame)
    }

    pub(crate) fn apply_input(&mut self, input: SceneInput) {
        match input {
            SceneInput::PointerMove {
                position,
                window_width,
                window_height,
            } => {
                if let Some((x, y)) =
                    normalize_pointer(position.x, position.y, window_width, window_height)
                {
                    self.motion.point_at(x, y);
                }
            }
            SceneInput::TouchMove {
                touches,
                window_width,
                window_height,
            } => {
                let steered = touches.first().and_then(|touch| {
                    normalize_pointer(touch.x, touch.y, window_width, window_height)
                });
                if let Some((x, y)) = steered {
                    self.motion.point_at(x, y);
                }
            }
            SceneInput::Resize { width, height } => {
                if !self.camera.resize(width, height) {
                    return;
                }
                if let Some(surface) = self.surface {
                    self.backend.resize_surface(surface, width, height);
                }
            }
        }
    }

    pub(crate) fn camera(&self) -> &Camera {
        &self.camera
    }

    pub(crate) fn motion(&self) -> &SceneMotion {
        &self.motion
    }
}

impl Drop for SceneResources {
    fn drop(&mut self) {
        for id in self.listeners.drain(..) {
            self.events.remove_listener(id);
        }
        if let Some(cloud) = self.cloud.take() {
            self.backend.release_buffer(cloud);
        }
        for ring in self.rings.drain(..) {
            self.backend.release_buffer(ring);
        }
        if let Some(surface) = self.surface.take() {
            self.backend.release_surface(surface);
        }
        if let Err(error) = self.backend.lose_context() {
            debug!(%error, "explicit context loss failed");
        }
        debug!("scene resources released");
    }
}
