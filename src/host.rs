use core::fmt;
use core::future::Future;

use crate::{Edge, FetchGate, Rect};

/// The UI side of a list view.
///
/// A host owns the real scroll container and its children (DOM nodes, widgets, terminal rows).
/// The list view never holds UI objects itself; it asks the host for geometry and tells it
/// which sentinels to mount and where to scroll.
pub trait ListHost {
    /// Identifies an element: the container, a sentinel, or an item usable as a scroll anchor.
    type Id: Clone + PartialEq + fmt::Debug;

    /// The current scroll container, if it exists.
    fn container(&self) -> Option<Self::Id>;

    /// Mounts or unmounts the loading sentinel (skeleton) for `edge`.
    ///
    /// Returns the sentinel's id while it is mounted.
    fn sync_sentinel(&mut self, edge: Edge, mounted: bool) -> Option<Self::Id>;

    /// Current bounding box of an element, or `None` if it is not in the tree.
    fn rect(&self, id: &Self::Id) -> Option<Rect>;

    fn scroll_offset(&self) -> u64;

    fn set_scroll_offset(&mut self, offset: u64);

    /// Runs a content mutation as one atomic batch.
    ///
    /// Hosts with reactive or incremental rendering override this so intermediate states are
    /// never painted.
    fn batch(&mut self, commit: impl FnOnce(&mut Self))
    where
        Self: Sized,
    {
        commit(self);
    }

    /// Asks the host to call [`crate::ListView::on_layout_settled`] once the last commit has
    /// been laid out (e.g. from the next animation frame).
    fn request_settle(&mut self) {}
}

/// A content change produced by a fetch.
pub struct ListUpdate<H: ListHost> {
    /// Element whose on-screen position must survive the commit.
    pub scroll_anchor_id: Option<H::Id>,
    commit: Box<dyn FnOnce(&mut H)>,
}

impl<H: ListHost> ListUpdate<H> {
    pub fn new(scroll_anchor_id: Option<H::Id>, commit: impl FnOnce(&mut H) + 'static) -> Self {
        Self {
            scroll_anchor_id,
            commit: Box::new(commit),
        }
    }

    pub fn anchored(scroll_anchor_id: H::Id, commit: impl FnOnce(&mut H) + 'static) -> Self {
        Self::new(Some(scroll_anchor_id), commit)
    }

    /// An update that accepts whatever scroll position the commit leaves behind.
    pub fn unanchored(commit: impl FnOnce(&mut H) + 'static) -> Self {
        Self::new(None, commit)
    }

    /// Drops the anchor, keeping the commit.
    pub(crate) fn without_anchor(mut self) -> Self {
        self.scroll_anchor_id = None;
        self
    }

    pub(crate) fn into_parts(self) -> (Option<H::Id>, Box<dyn FnOnce(&mut H)>) {
        (self.scroll_anchor_id, self.commit)
    }
}

impl<H: ListHost> fmt::Debug for ListUpdate<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListUpdate")
            .field("scroll_anchor_id", &self.scroll_anchor_id)
            .finish_non_exhaustive()
    }
}

/// The data side of a list view.
///
/// `fetch_top`/`fetch_bottom` resolve to `Ok(None)` when there is nothing more to load; by then
/// the source is expected to report the edge as exhausted through `at_start`/`at_end`.
pub trait ListSource<H: ListHost> {
    type Error: std::error::Error + 'static;

    fn fetch_top(&self) -> impl Future<Output = Result<Option<ListUpdate<H>>, Self::Error>>;

    fn fetch_bottom(&self) -> impl Future<Output = Result<Option<ListUpdate<H>>, Self::Error>>;

    fn at_start(&self) -> bool;

    fn at_end(&self) -> bool;

    fn permit_fetching(&self) -> bool {
        true
    }

    /// Reads the three signals into one snapshot.
    fn gate(&self) -> FetchGate {
        FetchGate {
            permit_fetching: self.permit_fetching(),
            at_start: self.at_start(),
            at_end: self.at_end(),
        }
    }
}
