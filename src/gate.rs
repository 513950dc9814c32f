use crate::{Edge, EdgePair, EdgeState};

/// The caller-owned signals that decide which sentinels exist and which detectors listen.
///
/// A fresh gate is read from the [`crate::ListSource`] on every render.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FetchGate {
    /// Global switch, e.g. off while an incompatible operation is running.
    pub permit_fetching: bool,
    pub at_start: bool,
    pub at_end: bool,
}

impl Default for FetchGate {
    fn default() -> Self {
        Self {
            permit_fetching: true,
            at_start: false,
            at_end: false,
        }
    }
}

impl FetchGate {
    pub fn new(permit_fetching: bool, at_start: bool, at_end: bool) -> Self {
        Self {
            permit_fetching,
            at_start,
            at_end,
        }
    }

    pub fn with_permit_fetching(mut self, permit_fetching: bool) -> Self {
        self.permit_fetching = permit_fetching;
        self
    }

    pub fn with_at_start(mut self, at_start: bool) -> Self {
        self.at_start = at_start;
        self
    }

    pub fn with_at_end(mut self, at_end: bool) -> Self {
        self.at_end = at_end;
        self
    }

    pub fn is_exhausted(&self, edge: Edge) -> bool {
        match edge {
            Edge::Start => self.at_start,
            Edge::End => self.at_end,
        }
    }

    /// The sentinel of an edge is mounted exactly while the edge is not exhausted.
    pub fn sentinel_mounted(&self, edge: Edge) -> bool {
        !self.is_exhausted(edge)
    }

    pub fn is_armed(&self, edge: Edge) -> bool {
        !self.is_exhausted(edge) && self.permit_fetching
    }

    pub fn edge_state(&self, edge: Edge) -> EdgeState {
        EdgeState {
            exhausted: self.is_exhausted(edge),
            armed: self.is_armed(edge),
        }
    }

    pub fn edge_states(&self) -> EdgePair<EdgeState> {
        EdgePair::from_fn(|edge| self.edge_state(edge))
    }
}
