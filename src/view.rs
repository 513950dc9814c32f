use core::cell::RefCell;
use core::fmt;

use futures::future::{Either, join_all};

use crate::{
    ApplyOutcome, Correction, Edge, EdgePair, EdgeState, EdgeVisibilityDetector, FetchFailure,
    FetchGate, FetchOrchestrator, ListHost, ListSource, ListUpdate, ListViewOptions, LoadOutcome,
    ScrollAnchorController, SettleMode,
};

/// A bidirectional lazy-loading list view.
///
/// The view owns a [`ListHost`] for its lifetime, along with one [`EdgeVisibilityDetector`]
/// per edge, a [`FetchOrchestrator`] and a [`ScrollAnchorController`]. It is driven by the
/// adapter:
/// - [`render`](Self::render) whenever the source's gate or the host's container may have
///   changed
/// - [`handle_scroll`](Self::handle_scroll) (or [`poll_visibility`](Self::poll_visibility) +
///   [`load`](Self::load)) on scroll and layout events
/// - [`on_layout_settled`](Self::on_layout_settled) after the host paints a commit
///
/// All methods take `&self` so load futures can be in flight while the adapter keeps handling
/// events. The view is single-threaded; run its futures on a local executor.
///
/// Update commits receive the host by `&mut` and must not call back into the view.
pub struct ListView<H: ListHost, S> {
    source: S,
    options: ListViewOptions,
    orchestrator: FetchOrchestrator,
    inner: RefCell<Inner<H>>,
}

struct Inner<H: ListHost> {
    host: Option<H>,
    gate: FetchGate,
    sentinels: EdgePair<Option<H::Id>>,
    detectors: EdgePair<EdgeVisibilityDetector<H::Id>>,
    anchor: ScrollAnchorController<H::Id>,
}

impl<H: ListHost, S: ListSource<H>> ListView<H, S> {
    pub fn new(host: H, source: S) -> Self {
        Self::with_options(host, source, ListViewOptions::default())
    }

    /// Creates a mounted view and performs the first render.
    pub fn with_options(host: H, source: S, options: ListViewOptions) -> Self {
        let root_margin = options.root_margin;
        ldebug!(?options, "ListView::new");
        let view = Self {
            source,
            options,
            orchestrator: FetchOrchestrator::new(),
            inner: RefCell::new(Inner {
                host: Some(host),
                gate: FetchGate::default(),
                sentinels: EdgePair::default(),
                detectors: EdgePair::from_fn(|edge| {
                    EdgeVisibilityDetector::new(edge).with_root_margin(root_margin)
                }),
                anchor: ScrollAnchorController::new(),
            }),
        };
        view.render();
        view
    }

    pub fn options(&self) -> &ListViewOptions {
        &self.options
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn is_mounted(&self) -> bool {
        self.inner.borrow().host.is_some()
    }

    /// The gate read during the last render.
    pub fn gate(&self) -> FetchGate {
        self.inner.borrow().gate
    }

    pub fn edge_state(&self, edge: Edge) -> EdgeState {
        self.gate().edge_state(edge)
    }

    /// The mounted sentinel for `edge`, if any.
    pub fn sentinel(&self, edge: Edge) -> Option<H::Id> {
        self.inner.borrow().sentinels.get(edge).clone()
    }

    pub fn is_observing(&self, edge: Edge) -> bool {
        self.inner.borrow().detectors.get(edge).is_observing()
    }

    pub fn is_in_flight(&self, edge: Edge) -> bool {
        self.orchestrator.is_in_flight(edge)
    }

    pub fn is_correction_pending(&self) -> bool {
        self.inner.borrow().anchor.is_pending()
    }

    pub fn with_host<R>(&self, f: impl FnOnce(&H) -> R) -> Option<R> {
        self.inner.borrow().host.as_ref().map(f)
    }

    /// Gives the adapter mutable access to the host (e.g. to apply a user scroll).
    ///
    /// A scroll made here while a correction is pending is kept: the pending anchor snapshot
    /// is shifted by the same amount, so the correction only compensates for the commit.
    pub fn with_host_mut<R>(&self, f: impl FnOnce(&mut H) -> R) -> Option<R> {
        let mut inner = self.inner.borrow_mut();
        let Inner { host, anchor, .. } = &mut *inner;
        let host = host.as_mut()?;

        let before = host.scroll_offset();
        let result = f(host);
        let after = host.scroll_offset();
        if after != before {
            anchor.rebase((after as i64).saturating_sub(before as i64));
        }
        Some(result)
    }

    /// Reads the gate from the source, mounts/unmounts sentinels and re-keys the detectors.
    ///
    /// Detectors whose container, sentinel and armed flag are unchanged keep observing.
    pub fn render(&self) {
        let gate = self.source.gate();
        let mut inner = self.inner.borrow_mut();
        let Inner {
            host,
            gate: current_gate,
            sentinels,
            detectors,
            ..
        } = &mut *inner;
        let Some(host) = host.as_mut() else {
            return;
        };

        if *current_gate != gate {
            ltrace!(?gate, "gate changed");
        }
        *current_gate = gate;

        let container = host.container();
        for edge in Edge::ALL {
            let sentinel = host.sync_sentinel(edge, gate.sentinel_mounted(edge));
            detectors.get_mut(edge).rearm(
                container.as_ref(),
                sentinel.as_ref(),
                gate.is_armed(edge),
            );
            *sentinels.get_mut(edge) = sentinel;
        }
    }

    /// Feeds current geometry to both detectors.
    ///
    /// Returns the edges whose sentinel has just entered view.
    pub fn poll_visibility(&self) -> Vec<Edge> {
        let mut inner = self.inner.borrow_mut();
        let Inner {
            host,
            sentinels,
            detectors,
            ..
        } = &mut *inner;
        let Some(host) = host.as_ref() else {
            return Vec::new();
        };

        let container = host.container().and_then(|id| host.rect(&id));
        Edge::ALL
            .into_iter()
            .filter(|&edge| {
                let sentinel = sentinels.get(edge).as_ref().and_then(|id| host.rect(id));
                detectors.get_mut(edge).observe(container, sentinel)
            })
            .collect()
    }

    /// Polls visibility and loads every edge that fired, concurrently.
    pub async fn handle_scroll(&self) -> Vec<(Edge, Result<LoadOutcome, FetchFailure<S::Error>>)> {
        let edges = self.poll_visibility();
        join_all(
            edges
                .into_iter()
                .map(|edge| async move { (edge, self.load(edge).await) }),
        )
        .await
    }

    pub async fn load_start(&self) -> Result<LoadOutcome, FetchFailure<S::Error>> {
        self.load(Edge::Start).await
    }

    pub async fn load_end(&self) -> Result<LoadOutcome, FetchFailure<S::Error>> {
        self.load(Edge::End).await
    }

    /// Fetches one page for `edge` and commits it.
    ///
    /// A second call for an edge that is still loading returns
    /// [`LoadOutcome::AlreadyInFlight`] without fetching. The view re-renders afterwards so an
    /// edge the source now reports as exhausted loses its sentinel.
    pub async fn load(&self, edge: Edge) -> Result<LoadOutcome, FetchFailure<S::Error>> {
        if !self.is_mounted() {
            return Ok(LoadOutcome::Detached);
        }

        let outcome = self
            .orchestrator
            .run(
                edge,
                || match edge {
                    Edge::Start => Either::Left(self.source.fetch_top()),
                    Edge::End => Either::Right(self.source.fetch_bottom()),
                },
                |update| self.deliver(update),
            )
            .await;

        self.render();
        outcome
    }

    fn deliver(&self, update: ListUpdate<H>) -> LoadOutcome {
        let mut inner = self.inner.borrow_mut();
        let Inner { host, anchor, .. } = &mut *inner;
        let Some(host) = host.as_mut() else {
            ldebug!(?update, "view unmounted; dropping update");
            return LoadOutcome::Detached;
        };

        let update = if self.options.scroll_anchoring {
            update
        } else {
            update.without_anchor()
        };

        let applied = anchor.apply(host, update);
        if applied == ApplyOutcome::CorrectionPending
            && self.options.settle_mode == SettleMode::Immediate
        {
            anchor.settle(host);
        }
        LoadOutcome::Applied(applied)
    }

    /// Runs the second anchoring phase. Call once the host has laid out the last commit.
    pub fn on_layout_settled(&self) -> Option<Correction> {
        let correction = {
            let mut inner = self.inner.borrow_mut();
            let Inner { host, anchor, .. } = &mut *inner;
            let host = host.as_mut()?;
            anchor.settle(host)
        };
        self.render();
        correction
    }

    /// Mounts a (new) host, returning the previous one.
    ///
    /// Detectors are rebuilt against the new container even if element ids repeat.
    pub fn mount(&self, host: H) -> Option<H> {
        let previous = self.unmount();
        self.inner.borrow_mut().host = Some(host);
        self.render();
        previous
    }

    /// Disconnects both detectors, drops any pending correction and releases the host.
    ///
    /// Fetches that are still running complete normally but their updates are dropped, even
    /// if another host has been mounted by then. They do not block loads on a later mount.
    pub fn unmount(&self) -> Option<H> {
        self.orchestrator.detach();
        let mut inner = self.inner.borrow_mut();
        for edge in Edge::ALL {
            inner.detectors.get_mut(edge).reset();
        }
        inner.anchor.cancel();
        inner.sentinels = EdgePair::default();
        let host = inner.host.take();
        if host.is_some() {
            ldebug!("list view unmounted");
        }
        host
    }
}

impl<H: ListHost, S> fmt::Debug for ListView<H, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.inner.borrow();
        f.debug_struct("ListView")
            .field("options", &self.options)
            .field("orchestrator", &self.orchestrator)
            .field("mounted", &inner.host.is_some())
            .field("gate", &inner.gate)
            .field("sentinels", &inner.sentinels)
            .field("detectors", &inner.detectors)
            .field("anchor", &inner.anchor)
            .finish_non_exhaustive()
    }
}
