use core::fmt;

/// One of the two loadable ends of the list.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Edge {
    /// The top of the list (older content).
    Start,
    /// The bottom of the list (newer content).
    End,
}

impl Edge {
    pub const ALL: [Edge; 2] = [Edge::Start, Edge::End];
}

impl fmt::Display for Edge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Start => "start",
            Self::End => "end",
        })
    }
}

/// A bounding box on the scroll axis, relative to the screen (like `getBoundingClientRect`).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Rect {
    pub top: i64,
    pub height: u32,
}

impl Rect {
    pub fn new(top: i64, height: u32) -> Self {
        Self { top, height }
    }

    pub fn bottom(&self) -> i64 {
        self.top.saturating_add(self.height as i64)
    }

    /// Returns `true` when the two boxes overlap or touch.
    ///
    /// Edge-adjacent boxes count as intersecting, so zero-height sentinels still report.
    pub fn intersects(&self, other: &Rect) -> bool {
        self.top <= other.bottom() && other.top <= self.bottom()
    }

    /// Grows the box by `margin` on both sides of the scroll axis.
    pub fn expand(&self, margin: u32) -> Rect {
        Rect {
            top: self.top.saturating_sub(margin as i64),
            height: self.height.saturating_add(margin.saturating_mul(2)),
        }
    }
}

/// Derived per-edge state for one render.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EdgeState {
    /// The caller reported no further content beyond this edge.
    pub exhausted: bool,
    /// The edge's detector should be observing.
    pub armed: bool,
}

/// One value per [`Edge`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EdgePair<T> {
    pub start: T,
    pub end: T,
}

impl<T> EdgePair<T> {
    pub fn new(start: T, end: T) -> Self {
        Self { start, end }
    }

    pub fn from_fn(mut f: impl FnMut(Edge) -> T) -> Self {
        Self {
            start: f(Edge::Start),
            end: f(Edge::End),
        }
    }

    pub fn get(&self, edge: Edge) -> &T {
        match edge {
            Edge::Start => &self.start,
            Edge::End => &self.end,
        }
    }

    pub fn get_mut(&mut self, edge: Edge) -> &mut T {
        match edge {
            Edge::Start => &mut self.start,
            Edge::End => &mut self.end,
        }
    }

    pub fn map<U>(self, mut f: impl FnMut(Edge, T) -> U) -> EdgePair<U> {
        EdgePair {
            start: f(Edge::Start, self.start),
            end: f(Edge::End, self.end),
        }
    }
}
