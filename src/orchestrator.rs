use core::cell::Cell;
use core::future::Future;

use crate::{ApplyOutcome, Edge, EdgePair, FetchFailure};

/// What happened to one load request.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum LoadOutcome {
    /// A fetch for the same edge was already running; nothing was started.
    AlreadyInFlight,
    /// The fetcher reported no more data.
    Exhausted,
    /// The update was committed.
    Applied(ApplyOutcome),
    /// The view was unmounted before the update arrived; it was dropped uncommitted.
    Detached,
}

/// Runs fetches with at most one in flight per edge.
///
/// Start and end are independent: both may be in flight at the same time.
///
/// Fetches belong to the epoch they started in. [`detach`](Self::detach) opens a new epoch:
/// fetches from older epochs no longer count as in flight and their updates are never
/// delivered.
#[derive(Debug, Default)]
pub struct FetchOrchestrator {
    epoch: Cell<u64>,
    in_flight: EdgePair<Cell<Option<u64>>>,
}

/// Releases an edge's in-flight flag when dropped, including on error or cancellation.
struct InFlightGuard<'a> {
    edge: Edge,
    epoch: u64,
    flag: &'a Cell<Option<u64>>,
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        // A guard from an older epoch must not release a newer fetch.
        if self.flag.get() == Some(self.epoch) {
            self.flag.set(None);
            ltrace!(edge = ?self.edge, "in-flight guard released");
        }
    }
}

impl FetchOrchestrator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn epoch(&self) -> u64 {
        self.epoch.get()
    }

    /// Orphans every running fetch.
    pub fn detach(&self) {
        self.epoch.set(self.epoch.get().wrapping_add(1));
        ltrace!(epoch = self.epoch.get(), "fetches detached");
    }

    pub fn is_in_flight(&self, edge: Edge) -> bool {
        self.in_flight.get(edge).get() == Some(self.epoch.get())
    }

    fn try_begin(&self, edge: Edge) -> Option<InFlightGuard<'_>> {
        let epoch = self.epoch.get();
        let flag = self.in_flight.get(edge);
        if flag.get() == Some(epoch) {
            return None;
        }
        flag.set(Some(epoch));
        Some(InFlightGuard { edge, epoch, flag })
    }

    /// Fetches one page for `edge` and hands a resulting update to `deliver`.
    ///
    /// `deliver` runs synchronously right after the fetch resolves, while the edge is still
    /// marked in flight. An update that resolves after [`detach`](Self::detach) is dropped
    /// and reported as [`LoadOutcome::Detached`].
    pub async fn run<T, E, Fut>(
        &self,
        edge: Edge,
        fetch: impl FnOnce() -> Fut,
        deliver: impl FnOnce(T) -> LoadOutcome,
    ) -> Result<LoadOutcome, FetchFailure<E>>
    where
        Fut: Future<Output = Result<Option<T>, E>>,
        E: std::error::Error + 'static,
    {
        let Some(guard) = self.try_begin(edge) else {
            ltrace!(edge = ?edge, "duplicate trigger suppressed");
            return Ok(LoadOutcome::AlreadyInFlight);
        };

        ldebug!(edge = ?edge, "fetch started");
        match fetch().await {
            Ok(Some(_)) if guard.epoch != self.epoch.get() => {
                ldebug!(edge = ?edge, "fetch outlived its epoch; dropping update");
                Ok(LoadOutcome::Detached)
            }
            Ok(Some(update)) => Ok(deliver(update)),
            Ok(None) => {
                ldebug!(edge = ?edge, "fetcher reported no more data");
                Ok(LoadOutcome::Exhausted)
            }
            Err(source) => {
                lwarn!(edge = ?edge, error = %source, "fetch failed");
                Err(FetchFailure::new(edge, source))
            }
        }
    }
}
