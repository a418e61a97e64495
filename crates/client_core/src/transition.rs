//! Page transition sequencing.
//!
//! A route change runs exit → swap → enter → idle on a single timer task per
//! controller. Only one transition is ever in flight; route changes that arrive
//! mid-sequence are dropped rather than queued.

use std::{
    fmt::Debug,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
    time::Duration,
};

use tokio::{sync::watch, task::JoinHandle, time::sleep};
use tracing::{debug, trace};

pub const EXIT_DURATION: Duration = Duration::from_millis(250);
pub const ENTER_DELAY: Duration = Duration::from_millis(50);
const EXIT_OFFSET_PX: f32 = 16.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionPhase {
    Idle,
    Exiting,
    Entering,
}

impl TransitionPhase {
    pub fn overlay_visible(self) -> bool {
        !matches!(self, TransitionPhase::Idle)
    }

    pub fn content_style(self) -> ContentStyle {
        match self {
            TransitionPhase::Exiting => ContentStyle {
                opacity: 0.0,
                offset_y_px: EXIT_OFFSET_PX,
            },
            TransitionPhase::Idle | TransitionPhase::Entering => ContentStyle {
                opacity: 1.0,
                offset_y_px: 0.0,
            },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContentStyle {
    pub opacity: f32,
    pub offset_y_px: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransitionTimings {
    pub exit: Duration,
    pub enter: Duration,
}

impl Default for TransitionTimings {
    fn default() -> Self {
        Self {
            exit: EXIT_DURATION,
            enter: ENTER_DELAY,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteChange {
    /// A new exit → enter cycle was scheduled.
    Started,
    /// Same route while idle; displayed content replaced in place.
    Refreshed,
    /// Mid-transition or unmounted; nothing changed.
    Ignored,
}

/// What the host should render right now.
#[derive(Debug, Clone)]
pub struct TransitionView<R, C> {
    pub phase: TransitionPhase,
    pub route: R,
    pub content: C,
}

impl<R, C> TransitionView<R, C> {
    pub fn overlay_visible(&self) -> bool {
        self.phase.overlay_visible()
    }

    pub fn content_style(&self) -> ContentStyle {
        self.phase.content_style()
    }
}

struct ControllerState<R, C> {
    phase: TransitionPhase,
    displayed_route: R,
    displayed: C,
    incoming: Option<(R, C)>,
    completed_cycles: u64,
    mounted: bool,
    sequence: Option<JoinHandle<()>>,
}

struct Shared<R, C> {
    state: Mutex<ControllerState<R, C>>,
    phase_tx: watch::Sender<TransitionPhase>,
}

impl<R, C> Shared<R, C> {
    fn lock(&self) -> MutexGuard<'_, ControllerState<R, C>> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Returns false when already unmounted.
    fn cancel(&self) -> bool {
        let mut state = self.lock();
        if !state.mounted {
            return false;
        }
        state.mounted = false;
        state.incoming = None;
        if let Some(sequence) = state.sequence.take() {
            sequence.abort();
        }
        true
    }
}

pub struct TransitionController<R, C> {
    shared: Arc<Shared<R, C>>,
    timings: TransitionTimings,
}

impl<R, C> TransitionController<R, C>
where
    R: Clone + PartialEq + Debug + Send + 'static,
    C: Clone + Send + 'static,
{
    /// The initial route and content are shown immediately, without a transition.
    pub fn mount(route: R, content: C) -> Self {
        Self::with_timings(route, content, TransitionTimings::default())
    }

    pub fn with_timings(route: R, content: C, timings: TransitionTimings) -> Self {
        let (phase_tx, _) = watch::channel(TransitionPhase::Idle);
        Self {
            shared: Arc::new(Shared {
                state: Mutex::new(ControllerState {
                    phase: TransitionPhase::Idle,
                    displayed_route: route,
                    displayed: content,
                    incoming: None,
                    completed_cycles: 0,
                    mounted: true,
                    sequence: None,
                }),
                phase_tx,
            }),
            timings,
        }
    }

    /// Must be called from within a tokio runtime; the exit and enter timers
    /// run on a spawned task.
    pub fn on_route_change(&self, route: R, content: C) -> RouteChange {
        let mut state = self.shared.lock();
        if !state.mounted || state.phase != TransitionPhase::Idle {
            trace!(?route, phase = ?state.phase, "route change ignored");
            return RouteChange::Ignored;
        }

        if route == state.displayed_route {
            state.displayed = content;
            return RouteChange::Refreshed;
        }

        debug!(from = ?state.displayed_route, to = ?route, "page transition started");
        state.incoming = Some((route, content));
        state.phase = TransitionPhase::Exiting;
        self.shared.phase_tx.send_replace(TransitionPhase::Exiting);
        state.sequence = Some(tokio::spawn(run_sequence(
            Arc::clone(&self.shared),
            self.timings,
        )));
        RouteChange::Started
    }

    pub fn phase(&self) -> TransitionPhase {
        self.shared.lock().phase
    }

    pub fn displayed_route(&self) -> R {
        self.shared.lock().displayed_route.clone()
    }

    pub fn view(&self) -> TransitionView<R, C> {
        let state = self.shared.lock();
        TransitionView {
            phase: state.phase,
            route: state.displayed_route.clone(),
            content: state.displayed.clone(),
        }
    }

    pub fn completed_cycles(&self) -> u64 {
        self.shared.lock().completed_cycles
    }

    pub fn subscribe(&self) -> watch::Receiver<TransitionPhase> {
        self.shared.phase_tx.subscribe()
    }

    pub fn is_mounted(&self) -> bool {
        self.shared.lock().mounted
    }

    /// Cancels any pending timers. Safe to call repeatedly.
    pub fn unmount(&self) {
        if self.shared.cancel() {
            debug!(phase = ?self.phase(), "transition controller unmounted");
        }
    }
}

impl<R, C> Drop for TransitionController<R, C> {
    fn drop(&mut self) {
        self.shared.cancel();
    }
}

async fn run_sequence<R: Debug, C>(shared: Arc<Shared<R, C>>, timings: TransitionTimings) {
    sleep(timings.exit).await;
    {
        let mut state = shared.lock();
        if !state.mounted {
            return;
        }
        let Some((route, content)) = state.incoming.take() else {
            return;
        };
        state.displayed_route = route;
        state.displayed = content;
        state.phase = TransitionPhase::Entering;
        shared.phase_tx.send_replace(TransitionPhase::Entering);
        trace!(route = ?state.displayed_route, "content swapped");
    }

    sleep(timings.enter).await;
    let mut state = shared.lock();
    if !state.mounted {
        return;
    }
    state.phase = TransitionPhase::Idle;
    state.completed_cycles += 1;
    state.sequence = None;
    shared.phase_tx.send_replace(TransitionPhase::Idle);
    debug!(route = ?state.displayed_route, "page transition finished");
}

#[cfg(test)]
#[path = "tests/transition_tests.rs"]
mod tests;
