use core::fmt;

use crate::{Edge, Rect};

/// Edge-triggered visibility watcher for one sentinel.
///
/// This is the headless counterpart of an `IntersectionObserver` rooted at the scroll
/// container: the adapter feeds it geometry through [`observe`](Self::observe) and it reports
/// each transition of the sentinel into view exactly once.
///
/// The observation is keyed on `(container, sentinel, armed)`. Any change of the key tears the
/// observation down; a new one only exists while `armed` is true and both elements exist.
pub struct EdgeVisibilityDetector<Id> {
    edge: Edge,
    root_margin: u32,
    container: Option<Id>,
    sentinel: Option<Id>,
    armed: bool,
    observation: Option<Observation>,
}

#[derive(Clone, Copy, Debug)]
struct Observation {
    intersecting: bool,
}

impl<Id: Clone + PartialEq + fmt::Debug> EdgeVisibilityDetector<Id> {
    pub fn new(edge: Edge) -> Self {
        Self {
            edge,
            root_margin: 0,
            container: None,
            sentinel: None,
            armed: false,
            observation: None,
        }
    }

    pub fn with_root_margin(mut self, root_margin: u32) -> Self {
        self.root_margin = root_margin;
        self
    }

    pub fn edge(&self) -> Edge {
        self.edge
    }

    pub fn is_observing(&self) -> bool {
        self.observation.is_some()
    }

    /// Re-keys the detector.
    ///
    /// Returns `true` when a new observation was created. Calling this with the same inputs as
    /// the previous call keeps the current observation untouched.
    pub fn rearm(&mut self, container: Option<&Id>, sentinel: Option<&Id>, armed: bool) -> bool {
        if self.container.as_ref() == container
            && self.sentinel.as_ref() == sentinel
            && self.armed == armed
        {
            return false;
        }

        self.disconnect();
        self.container = container.cloned();
        self.sentinel = sentinel.cloned();
        self.armed = armed;

        if !armed || container.is_none() || sentinel.is_none() {
            ltrace!(edge = ?self.edge, armed, "detector inert");
            return false;
        }

        ldebug!(edge = ?self.edge, ?container, ?sentinel, "detector armed");
        self.observation = Some(Observation {
            intersecting: false,
        });
        true
    }

    /// Feeds current geometry into the observation.
    ///
    /// Returns `true` only when the sentinel has just entered the container's visible region.
    /// The first call after arming fires for a sentinel that is already visible.
    pub fn observe(&mut self, container: Option<Rect>, sentinel: Option<Rect>) -> bool {
        let Some(observation) = self.observation.as_mut() else {
            return false;
        };

        let intersecting = match (container, sentinel) {
            (Some(c), Some(s)) => c.expand(self.root_margin).intersects(&s),
            _ => false,
        };

        let entered = intersecting && !observation.intersecting;
        observation.intersecting = intersecting;
        if entered {
            ltrace!(edge = ?self.edge, "sentinel entered view");
        }
        entered
    }

    pub fn disconnect(&mut self) {
        if self.observation.take().is_some() {
            ltrace!(edge = ?self.edge, "detector disconnected");
        }
    }

    /// Forgets the key as well, so the next [`rearm`](Self::rearm) always rebuilds.
    pub fn reset(&mut self) {
        self.disconnect();
        self.container = None;
        self.sentinel = None;
        self.armed = false;
    }
}

impl<Id: fmt::Debug> fmt::Debug for EdgeVisibilityDetector<Id> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EdgeVisibilityDetector")
            .field("edge", &self.edge)
            .field("root_margin", &self.root_margin)
            .field("container", &self.container)
            .field("sentinel", &self.sentinel)
            .field("armed", &self.armed)
            .field("observing", &self.observation.is_some())
            .finish()
    }
}
