//! Client-side behaviour of the portfolio site that is more than markup: the
//! page transition sequencer and the animated landing-page background.

pub mod scene;
pub mod transition;

pub use scene::{
    BackendLoader, EventTarget, FallbackReason, RenderBackend, SceneHost, SceneOptions,
    SceneStatus, SurfaceRegion,
};
pub use transition::{
    ContentStyle, RouteChange, TransitionController, TransitionPhase, TransitionTimings,
    TransitionView,
};
