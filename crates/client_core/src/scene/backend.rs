use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc,
};

use anyhow::{anyhow, Result};
use async_trait::async_trait;

use super::{
    geometry::{Camera, Rgb, Vec3},
    SurfaceRegion,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SurfaceId(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BufferId(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Primitive {
    /// Additive-blended round points.
    Points,
    LineStrip,
}

#[derive(Debug, Clone, Copy)]
pub struct GeometryUpload<'a> {
    pub primitive: Primitive,
    pub positions: &'a [Vec3],
    /// One colour per vertex, or a single colour for the whole primitive.
    pub colors: &'a [Rgb],
    pub sizes: &'a [f32],
    pub opacity: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawItem {
    pub buffer: BufferId,
    pub rotation: Vec3,
}

#[derive(Debug, Clone, Copy)]
pub struct FrameSnapshot<'a> {
    pub elapsed_secs: f32,
    pub camera: &'a Camera,
    pub cloud: DrawItem,
    pub rings: &'a [DrawItem],
}

/// A drawing context the scene renders into. Every `create_*`/`upload_*`
/// result is handed back through exactly one matching `release_*` call.
pub trait RenderBackend: Send {
    fn create_surface(&mut self, region: &SurfaceRegion) -> Result<SurfaceId>;
    fn upload_geometry(&mut self, geometry: GeometryUpload<'_>) -> Result<BufferId>;
    fn write_positions(&mut self, buffer: BufferId, positions: &[Vec3]) -> Result<()>;
    fn resize_surface(&mut self, surface: SurfaceId, width: u32, height: u32);
    fn draw(&mut self, surface: SurfaceId, frame: &FrameSnapshot<'_>) -> Result<()>;
    fn release_buffer(&mut self, buffer: BufferId);
    fn release_surface(&mut self, surface: SurfaceId);
    /// Best effort; failures are logged and ignored by the caller.
    fn lose_context(&mut self) -> Result<()>;
}

/// Lazily acquires the rendering capability. Loading may be slow and may fail
/// on devices without a usable graphics stack.
#[async_trait]
pub trait BackendLoader: Send + Sync {
    async fn load(&self) -> Result<Box<dyn RenderBackend>>;
}

#[derive(Debug, Default)]
pub struct HeadlessStats {
    pub surfaces_created: AtomicUsize,
    pub surfaces_released: AtomicUsize,
    pub buffers_uploaded: AtomicUsize,
    pub buffers_released: AtomicUsize,
    pub frames_drawn: AtomicUsize,
    pub contexts_lost: AtomicUsize,
}

impl HeadlessStats {
    pub fn live_buffers(&self) -> usize {
        self.buffers_uploaded.load(Ordering::SeqCst) - self.buffers_released.load(Ordering::SeqCst)
    }

    pub fn live_surfaces(&self) -> usize {
        self.surfaces_created.load(Ordering::SeqCst)
            - self.surfaces_released.load(Ordering::SeqCst)
    }
}

/// Backend that draws nothing and only counts calls. Used by the CLI preview
/// and on hosts without a GPU.
pub struct HeadlessBackend {
    stats: Arc<HeadlessStats>,
    next_id: u64,
    fail_draws_after: Option<usize>,
}

impl HeadlessBackend {
    pub fn new(stats: Arc<HeadlessStats>) -> Self {
        Self {
            stats,
            next_id: 1,
            fail_draws_after: None,
        }
    }

    fn next(&mut self) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }
}

impl RenderBackend for HeadlessBackend {
    fn create_surface(&mut self, region: &SurfaceRegion) -> Result<SurfaceId> {
        if region.width == 0 || region.height == 0 {
            return Err(anyhow!("surface {}x{} has no area", region.width, region.height));
        }
        self.stats.surfaces_created.fetch_add(1, Ordering::SeqCst);
        Ok(SurfaceId(self.next()))
    }

    fn upload_geometry(&mut self, geometry: GeometryUpload<'_>) -> Result<BufferId> {
        if geometry.positions.is_empty() {
            return Err(anyhow!("empty {:?} geometry", geometry.primitive));
        }
        self.stats.buffers_uploaded.fetch_add(1, Ordering::SeqCst);
        Ok(BufferId(self.next()))
    }

    fn write_positions(&mut self, _buffer: BufferId, _positions: &[Vec3]) -> Result<()> {
        Ok(())
    }

    fn resize_surface(&mut self, _surface: SurfaceId, _width: u32, _height: u32) {}

    fn draw(&mut self, _surface: SurfaceId, _frame: &FrameSnapshot<'_>) -> Result<()> {
        let drawn = self.stats.frames_drawn.fetch_add(1, Ordering::SeqCst);
        if let Some(limit) = self.fail_draws_after {
            if drawn >= limit {
                return Err(anyhow!("headless draw budget of {limit} frames exhausted"));
            }
        }
        Ok(())
    }

    fn release_buffer(&mut self, _buffer: BufferId) {
        self.stats.buffers_released.fetch_add(1, Ordering::SeqCst);
    }

    fn release_surface(&mut self, _surface: SurfaceId) {
        self.stats.surfaces_released.fetch_add(1, Ordering::SeqCst);
    }

    fn lose_context(&mut self) -> Result<()> {
        self.stats.contexts_lost.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

#[derive(Clone, Default)]
pub struct HeadlessLoader {
    stats: Arc<HeadlessStats>,
    fail_draws_after: Option<usize>,
}

impl HeadlessLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every draw after the first `frames` fail, to exercise the
    /// render-failure fallback.
    pub fn failing_after(frames: usize) -> Self {
        Self {
            stats: Arc::default(),
            fail_draws_after: Some(frames),
        }
    }

    pub fn stats(&self) -> Arc<HeadlessStats> {
        Arc::clone(&self.stats)
    }
}

#[async_trait]
impl BackendLoader for HeadlessLoader {
    async fn load(&self) -> Result<Box<dyn RenderBackend>> {
        let mut backend = HeadlessBackend::new(Arc::clone(&self.stats));
        backend.fail_draws_after = self.fail_draws_after;
        Ok(Box::new(backend))
    }
}

/// Stands in for a platform where no graphics capability can be acquired.
pub struct UnavailableLoader;

#[async_trait]
impl BackendLoader for UnavailableLoader {
    async fn load(&self) -> Result<Box<dyn RenderBackend>> {
        Err(anyhow!("no rendering backend available on this host"))
    }
}
