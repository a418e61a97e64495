use std::{
    collections::BTreeMap,
    sync::{Mutex, MutexGuard, PoisonError},
};

use tokio::sync::mpsc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputKind {
    PointerMove,
    TouchMove,
    Resize,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScreenPoint {
    pub x: f32,
    pub y: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SceneInput {
    /// Position in client pixels plus the window size it is relative to.
    PointerMove {
        position: ScreenPoint,
        window_width: u32,
        window_height: u32,
    },
    /// Only the first touch steers the scene.
    TouchMove {
        touches: Vec<ScreenPoint>,
        window_width: u32,
        window_height: u32,
    },
    /// New size of the scene container.
    Resize { width: u32, height: u32 },
}

impl SceneInput {
    pub fn kind(&self) -> InputKind {
        match self {
            SceneInput::PointerMove { .. } => InputKind::PointerMove,
            SceneInput::TouchMove { .. } => InputKind::TouchMove,
            SceneInput::Resize { .. } => InputKind::Resize,
        }
    }
}

/// Delivery end handed to an [`EventTarget`] when a listener is registered.
#[derive(Debug, Clone)]
pub struct InputSink {
    tx: mpsc::UnboundedSender<SceneInput>,
}

impl InputSink {
    pub(crate) fn new(tx: mpsc::UnboundedSender<SceneInput>) -> Self {
        Self { tx }
    }

    /// Returns false once the owning scene has gone away.
    pub fn deliver(&self, input: SceneInput) -> bool {
        self.tx.send(input).is_ok()
    }
}

/// The window-like object the scene listens on.
pub trait EventTarget: Send + Sync {
    fn add_listener(&self, kind: InputKind, sink: InputSink) -> ListenerId;
    fn remove_listener(&self, id: ListenerId);
}

#[derive(Default)]
struct RegistryInner {
    next_id: u64,
    listeners: BTreeMap<ListenerId, (InputKind, InputSink)>,
}

/// In-process [`EventTarget`] that fans dispatched input out to matching
/// listeners.
#[derive(Default)]
pub struct ListenerRegistry {
    inner: Mutex<RegistryInner>,
}

impl ListenerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, RegistryInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn listener_count(&self) -> usize {
        self.lock().listeners.len()
    }

    pub fn listener_count_for(&self, kind: InputKind) -> usize {
        self.lock()
            .listeners
            .values()
            .filter(|(listening_for, _)| *listening_for == kind)
            .count()
    }

    /// Returns how many listeners accepted the input.
    pub fn dispatch(&self, input: SceneInput) -> usize {
        let kind = input.kind();
        let sinks: Vec<InputSink> = self
            .lock()
            .listeners
            .values()
            .filter(|(listening_for, _)| *listening_for == kind)
            .map(|(_, sink)| sink.clone())
            .collect();
        sinks
            .into_iter()
            .filter(|sink| sink.deliver(input.clone()))
            .count()
    }
}

impl EventTarget for ListenerRegistry {
    fn add_listener(&self, kind: InputKind, sink: InputSink) -> ListenerId {
        let mut inner = self.lock();
        inner.next_id += 1;
        let id = ListenerId(inner.next_id);
        inner.listeners.insert(id, (kind, sink));
        id
    }

    fn remove_listener(&self, id: ListenerId) {
        self.lock().listeners.remove(&id);
    }
}
