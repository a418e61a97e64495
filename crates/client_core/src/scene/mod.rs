//! Animated landing-page background.
//!
//! [`SceneHost::mount`] acquires a render backend asynchronously, allocates
//! the point cloud and ring geometry, registers input listeners and starts a
//! per-frame loop. [`SceneHost::unmount`] may be called at any point, any
//! number of times. Any failure along the way turns into
//! [`SceneStatus::Fallback`] instead of an error.

use std::{
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc, Mutex, MutexGuard, PoisonError,
    },
    time::Duration,
};

use rand::{rngs::StdRng, SeedableRng};
use thiserror::Error;
use tokio::{
    sync::{mpsc, watch},
    task::JoinHandle,
    time::{interval, Instant, MissedTickBehavior},
};
use tracing::{debug, info, warn};

pub mod backend;
pub mod geometry;
pub mod input;
mod resources;

pub use backend::{BackendLoader, RenderBackend};
pub use input::{EventTarget, SceneInput};

use geometry::Camera;
use resources::SceneResources;

/// Roughly one display refresh at 60 Hz.
pub const DEFAULT_FRAME_INTERVAL: Duration = Duration::from_micros(16_667);

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceRegion {
    pub width: u32,
    pub height: u32,
    pub device_pixel_ratio: f32,
}

impl SurfaceRegion {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            device_pixel_ratio: 1.0,
        }
    }

    pub fn with_pixel_ratio(mut self, device_pixel_ratio: f32) -> Self {
        self.device_pixel_ratio = device_pixel_ratio;
        self
    }

    pub fn has_area(&self) -> bool {
        self.width > 0 && self.height > 0
    }
}

#[derive(Debug, Clone, Copy)]
pub struct SceneOptions {
    pub frame_interval: Duration,
    /// Fixed seed for a reproducible point cloud; random when unset.
    pub seed: Option<u64>,
}

impl Default for SceneOptions {
    fn default() -> Self {
        Self {
            frame_interval: DEFAULT_FRAME_INTERVAL,
            seed: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FallbackReason {
    ZeroSizedSurface,
    BackendUnavailable,
    RenderFailed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SceneStatus {
    Loading,
    Running,
    Fallback(FallbackReason),
    Unmounted,
}

#[derive(Debug, Error)]
pub enum SceneError {
    #[error("container is {width}x{height}; nothing to draw into")]
    ZeroSizedSurface { width: u32, height: u32 },
    #[error("render backend could not be loaded: {0}")]
    BackendUnavailable(#[source] anyhow::Error),
    #[error("render surface could not be created: {0}")]
    Surface(#[source] anyhow::Error),
    #[error("geometry upload failed: {0}")]
    Geometry(#[source] anyhow::Error),
    #[error("frame could not be drawn: {0}")]
    Draw(#[source] anyhow::Error),
}

impl SceneError {
    pub fn fallback_reason(&self) -> FallbackReason {
        match self {
            SceneError::ZeroSizedSurface { .. } => FallbackReason::ZeroSizedSurface,
            SceneError::BackendUnavailable(_)
            | SceneError::Surface(_)
            | SceneError::Geometry(_) => FallbackReason::BackendUnavailable,
            SceneError::Draw(_) => FallbackReason::RenderFailed,
        }
    }
}

/// One ring of the static placeholder shown instead of the animated scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PulsingRing {
    pub color_hex: u32,
    pub inset_px: u32,
    pub pulse_delay_ms: u32,
}

/// Centred dot that pings outward over the rings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PingDot {
    pub color_hex: u32,
    pub diameter_px: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FallbackVisual {
    pub size_px: u32,
    pub rings: [PulsingRing; 3],
    pub ping_dot: PingDot,
}

pub const FALLBACK_VISUAL: FallbackVisual = FallbackVisual {
    size_px: 256,
    rings: [
        PulsingRing {
            color_hex: geometry::PALETTE_HEX[0],
            inset_px: 0,
            pulse_delay_ms: 0,
        },
        PulsingRing {
            color_hex: geometry::PALETTE_HEX[1],
            inset_px: 16,
            pulse_delay_ms: 200,
        },
        PulsingRing {
            color_hex: geometry::PALETTE_HEX[2],
            inset_px: 32,
            pulse_delay_ms: 400,
        },
    ],
    ping_dot: PingDot {
        color_hex: geometry::PALETTE_HEX[1],
        diameter_px: 16,
    },
};

#[derive(Default)]
struct LiveScene {
    init: Option<JoinHandle<()>>,
    frame_loop: Option<JoinHandle<()>>,
    resources: Option<SceneResources>,
}

struct SceneShared {
    torn_down: AtomicBool,
    live: Mutex<LiveScene>,
    status: watch::Sender<SceneStatus>,
}

impl SceneShared {
    fn lock(&self) -> MutexGuard<'_, LiveScene> {
        self.live.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn is_torn_down(&self) -> bool {
        self.torn_down.load(Ordering::SeqCst)
    }

    /// Drops whatever was live and reports the fallback, unless the host has
    /// already unmounted.
    fn fall_back(&self, error: &SceneError) {
        let released = {
            let mut live = self.lock();
            if self.is_torn_down() {
                return;
            }
            live.frame_loop = None;
            let released = live.resources.take();
            self.status
                .send_replace(SceneStatus::Fallback(error.fallback_reason()));
            released
        };
        drop(released);
        warn!(%error, "decorative scene unavailable, showing fallback");
    }
}

pub struct SceneHost {
    shared: Arc<SceneShared>,
    status_rx: watch::Receiver<SceneStatus>,
}

impl SceneHost {
    /// A container without area reports the fallback immediately and never
    /// touches the loader. Otherwise this must run inside a tokio runtime.
    pub fn mount(
        region: SurfaceRegion,
        loader: Arc<dyn BackendLoader>,
        events: Arc<dyn EventTarget>,
        options: SceneOptions,
    ) -> Self {
        let (status, status_rx) = watch::channel(SceneStatus::Loading);
        let shared = Arc::new(SceneShared {
            torn_down: AtomicBool::new(false),
            live: Mutex::new(LiveScene::default()),
            status,
        });
        let host = Self { shared, status_rx };

        if !region.has_area() {
            host.shared.fall_back(&SceneError::ZeroSizedSurface {
                width: region.width,
                height: region.height,
            });
            return host;
        }

        let init = tokio::spawn(initialize(
            Arc::clone(&host.shared),
            region,
            loader,
            events,
            options,
        ));
        host.shared.lock().init = Some(init);
        host
    }

    pub fn status(&self) -> SceneStatus {
        *self.status_rx.borrow()
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self.status(), SceneStatus::Fallback(_))
    }

    pub fn fallback_reason(&self) -> Option<FallbackReason> {
        match self.status() {
            SceneStatus::Fallback(reason) => Some(reason),
            _ => None,
        }
    }

    /// Placeholder to draw while the scene is in fallback.
    pub fn fallback_visual(&self) -> Option<&'static FallbackVisual> {
        self.is_fallback().then_some(&FALLBACK_VISUAL)
    }

    pub fn subscribe(&self) -> watch::Receiver<SceneStatus> {
        self.shared.status.subscribe()
    }

    /// Waits until loading has finished one way or the other.
    pub async fn settled(&self) -> SceneStatus {
        let mut rx = self.subscribe();
        loop {
            let status = *rx.borrow_and_update();
            if status != SceneStatus::Loading {
                return status;
            }
            if rx.changed().await.is_err() {
                return self.status();
            }
        }
    }

    pub fn camera(&self) -> Option<Camera> {
        self.shared
            .lock()
            .resources
            .as_ref()
            .map(|resources| *resources.camera())
    }

    /// Rotation the scene is easing toward, `(x, y)` in radians.
    pub fn target_rotation(&self) -> Option<(f32, f32)> {
        self.shared
            .lock()
            .resources
            .as_ref()
            .map(|resources| resources.motion().target_rotation())
    }

    pub fn unmount(&self) {
        if self.shared.torn_down.swap(true, Ordering::SeqCst) {
            return;
        }

        let (init, frame_loop, resources) = {
            let mut live = self.shared.lock();
            self.shared.status.send_replace(SceneStatus::Unmounted);
            (
                live.init.take(),
                live.frame_loop.take(),
                live.resources.take(),
            )
        };
        if let Some(init) = init {
            init.abort();
        }
        if let Some(frame_loop) = frame_loop {
            frame_loop.abort();
        }
        let had_resources = resources.is_some();
        drop(resources);
        debug!(had_resources, "decorative scene unmounted");
    }
}

impl Drop for SceneHost {
    fn drop(&mut self) {
        self.unmount();
    }
}

async fn initialize(
    shared: Arc<SceneShared>,
    region: SurfaceRegion,
    loader: Arc<dyn BackendLoader>,
    events: Arc<dyn EventTarget>,
    options: SceneOptions,
) {
    let backend = match loader.load().await {
        Ok(backend) => backend,
        Err(error) => {
            shared.fall_back(&SceneError::BackendUnavailable(error));
            return;
        }
    };
    if shared.is_torn_down() {
        debug!("scene unmounted while the backend was loading");
        return;
    }

    let mut rng = match options.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let (input_tx, input_rx) = mpsc::unbounded_channel();
    let resources = match SceneResources::build(backend, &region, events, &input_tx, &mut rng) {
        Ok(resources) => resources,
        Err(error) => {
            shared.fall_back(&error);
            return;
        }
    };
    drop(input_tx);

    let mut live = shared.lock();
    if shared.is_torn_down() {
        drop(live);
        drop(resources);
        return;
    }
    live.resources = Some(resources);
    live.frame_loop = Some(tokio::spawn(run_frame_loop(
        Arc::clone(&shared),
        input_rx,
        options.frame_interval,
    )));
    live.init = None;
    shared.status.send_replace(SceneStatus::Running);
    info!(
        width = region.width,
        height = region.height,
        "decorative scene running"
    );
}

async fn run_frame_loop(
    shared: Arc<SceneShared>,
    mut input_rx: mpsc::UnboundedReceiver<SceneInput>,
    frame_interval: Duration,
) {
    let started = Instant::now();
    let mut ticker = interval(frame_interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                if shared.is_torn_down() {
                    break;
                }
                let elapsed = started.elapsed().as_secs_f32();
                let drawn = match shared.lock().resources.as_mut() {
                    Some(resources) => resources.render_frame(elapsed),
                    None => break,
                };
                if let Err(error) = drawn {
                    shared.fall_back(&SceneError::Draw(error));
                    break;
                }
            }
            Some(input) = input_rx.recv() => {
                if shared.is_torn_down() {
                    break;
                }
                match shared.lock().resources.as_mut() {
                    Some(resources) => resources.apply_input(input),
                    None => break,
                }
            }
        }
    }
}

#[cfg(test)]
#[path = "../tests/scene_tests.rs"]
mod tests;
