use core::fmt;

use crate::{ListHost, ListUpdate, Rect};

/// Geometry of an anchor element at one point in time.
#[derive(Clone, PartialEq, Eq)]
pub struct AnchorSnapshot<Id> {
    pub id: Id,
    pub rect: Rect,
}

impl<Id: Clone> AnchorSnapshot<Id> {
    /// Resolves `id` in the host. Returns `None` if the element does not exist.
    pub fn capture<H: ListHost<Id = Id>>(host: &H, id: &Id) -> Option<Self> {
        host.rect(id).map(|rect| Self {
            id: id.clone(),
            rect,
        })
    }

    pub fn top(&self) -> i64 {
        self.rect.top
    }
}

impl<Id: fmt::Debug> fmt::Debug for AnchorSnapshot<Id> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnchorSnapshot")
            .field("id", &self.id)
            .field("rect", &self.rect)
            .finish()
    }
}

/// Result of the first phase of [`ScrollAnchorController::apply`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ApplyOutcome {
    /// The update named no anchor; the commit ran without correction.
    Unanchored,
    /// The anchor did not exist before the commit; no correction will happen.
    AnchorMissing,
    /// The anchor was captured; a correction waits for [`ScrollAnchorController::settle`].
    CorrectionPending,
}

/// Result of the second phase, [`ScrollAnchorController::settle`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Correction {
    /// The scroll offset was moved by `delta` (zero means no write was needed).
    Adjusted { delta: i64 },
    /// The anchor no longer exists after the commit; the scroll offset was left alone.
    AnchorLost,
}

/// Keeps an anchor element visually stationary across a content commit.
///
/// Anchoring is a two-phase operation:
/// 1. [`apply`](Self::apply) measures the anchor, runs the commit in one host batch and asks
///    the host to report when layout has settled.
/// 2. [`settle`](Self::settle) re-measures the anchor and scrolls by the difference.
///
/// Only one correction is pending at a time. Applying another update while one is pending
/// settles the pending one first, so each capture/commit/re-measure/correct sequence runs
/// to completion before the next starts.
#[derive(Clone, Debug)]
pub struct ScrollAnchorController<Id> {
    pending: Option<AnchorSnapshot<Id>>,
}

impl<Id> Default for ScrollAnchorController<Id> {
    fn default() -> Self {
        Self { pending: None }
    }
}

impl<Id: Clone + PartialEq + fmt::Debug> ScrollAnchorController<Id> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn pending(&self) -> Option<&AnchorSnapshot<Id>> {
        self.pending.as_ref()
    }

    pub fn apply<H>(&mut self, host: &mut H, update: ListUpdate<H>) -> ApplyOutcome
    where
        H: ListHost<Id = Id>,
    {
        if self.pending.is_some() {
            ldebug!("settling previous correction before the next commit");
            self.settle(host);
        }

        let (anchor_id, commit) = update.into_parts();
        let before = anchor_id
            .as_ref()
            .and_then(|id| AnchorSnapshot::capture(host, id));

        host.batch(commit);
        ltrace!(anchor = ?anchor_id, "update committed");

        match (anchor_id, before) {
            (None, _) => ApplyOutcome::Unanchored,
            (Some(_id), None) => {
                ldebug!(anchor = ?_id, "anchor missing before commit; skipping correction");
                ApplyOutcome::AnchorMissing
            }
            (Some(_), Some(before)) => {
                self.pending = Some(before);
                host.request_settle();
                ApplyOutcome::CorrectionPending
            }
        }
    }

    /// Re-measures the pending anchor and corrects the scroll offset.
    ///
    /// Returns `None` when nothing was pending.
    pub fn settle<H>(&mut self, host: &mut H) -> Option<Correction>
    where
        H: ListHost<Id = Id>,
    {
        let before = self.pending.take()?;
        let Some(after) = AnchorSnapshot::capture(host, &before.id) else {
            ldebug!(anchor = ?before.id, "anchor lost after commit; skipping correction");
            return Some(Correction::AnchorLost);
        };

        let delta = after.top() - before.top();
        if delta != 0 {
            let offset = host.scroll_offset().saturating_add_signed(delta);
            host.set_scroll_offset(offset);
        }
        ltrace!(anchor = ?before.id, delta, "scroll corrected");
        Some(Correction::Adjusted { delta })
    }

    /// Accounts for a scroll made outside the controller between `apply` and `settle`.
    ///
    /// Scrolling down by `scrolled_by` moves the anchor up on screen by the same amount; the
    /// pending snapshot follows it so the correction does not undo the scroll.
    pub fn rebase(&mut self, scrolled_by: i64) {
        if let Some(pending) = self.pending.as_mut() {
            pending.rect.top = pending.rect.top.saturating_sub(scrolled_by);
            ltrace!(scrolled_by, "pending anchor rebased");
        }
    }

    /// Drops a pending correction without touching the host.
    pub fn cancel(&mut self) {
        if self.pending.take().is_some() {
            lwarn!("pending scroll correction cancelled");
        }
    }
}
