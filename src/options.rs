/// When the second anchoring phase runs.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SettleMode {
    /// Wait for the host to call [`crate::ListView::on_layout_settled`] (after paint).
    #[default]
    Deferred,
    /// Re-measure right after the commit. Only correct for hosts whose `rect` reflects a
    /// commit synchronously (terminal UIs, the in-memory simulator).
    Immediate,
}

/// Configuration for [`crate::ListView`].
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ListViewOptions {
    /// Preserve the anchor element's screen position across commits.
    ///
    /// When disabled, updates are committed and the scroll offset is left wherever the commit
    /// put it.
    pub scroll_anchoring: bool,

    pub settle_mode: SettleMode,

    /// Grows the container's visible region by this many pixels on both ends when testing
    /// sentinel visibility (aka `IntersectionObserver` `rootMargin`).
    pub root_margin: u32,
}

impl Default for ListViewOptions {
    fn default() -> Self {
        Self {
            scroll_anchoring: true,
            settle_mode: SettleMode::Deferred,
            root_margin: 0,
        }
    }
}

impl ListViewOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_scroll_anchoring(mut self, scroll_anchoring: bool) -> Self {
        self.scroll_anchoring = scroll_anchoring;
        self
    }

    pub fn with_settle_mode(mut self, settle_mode: SettleMode) -> Self {
        self.settle_mode = settle_mode;
        self
    }

    pub fn with_root_margin(mut self, root_margin: u32) -> Self {
        self.root_margin = root_margin;
        self
    }
}
