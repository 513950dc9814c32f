use std::collections::HashMap;

use lazylist::{Edge, EdgePair, ListHost, Rect};

use crate::SimKey;
use crate::fenwick::Fenwick;
use crate::skeleton::Skeleton;

/// Elements of a [`SimHost`].
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SimNode<K> {
    Container,
    Sentinel(Edge),
    Item(K),
}

/// Configuration for [`SimHost`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SimHostOptions {
    /// Screen y of the container's top edge.
    pub viewport_top: i64,
    pub viewport_height: u32,
    /// Space between consecutive items (message group spacing).
    pub gap: u32,
    /// Root font size, used to size the skeleton sentinels.
    pub rem_px: u32,
}

impl Default for SimHostOptions {
    fn default() -> Self {
        Self {
            viewport_top: 0,
            viewport_height: 600,
            gap: 0,
            rem_px: 16,
        }
    }
}

impl SimHostOptions {
    pub fn with_viewport(mut self, viewport_top: i64, viewport_height: u32) -> Self {
        self.viewport_top = viewport_top;
        self.viewport_height = viewport_height;
        self
    }

    pub fn with_gap(mut self, gap: u32) -> Self {
        self.gap = gap;
        self
    }

    pub fn with_rem_px(mut self, rem_px: u32) -> Self {
        self.rem_px = rem_px;
        self
    }
}

/// Counters for how the list view drove the host.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SimStats {
    /// Calls to `ListHost::batch`.
    pub batches: usize,
    /// Calls to `ListHost::set_scroll_offset` (user scrolls are not counted).
    pub scroll_writes: usize,
    pub settle_requests: usize,
}

/// An in-memory vertical list host.
///
/// Lays out `[start skeleton] items.. [end skeleton]` in a scroll container, computing item
/// offsets with prefix sums so that geometry queries stay cheap for long histories. Layout is
/// synchronous: every mutation is visible to `rect` immediately. The scroll offset is clamped
/// to the scrollable range, as a browser would.
///
/// Useful for tests, demos and as a reference when binding a real UI.
#[derive(Clone, Debug)]
pub struct SimHost<K> {
    options: SimHostOptions,
    keys: Vec<K>,
    sizes: Vec<u32>,
    index: HashMap<K, usize>,
    sums: Fenwick,
    sentinels: EdgePair<Option<u32>>,
    attached: bool,
    scroll_offset: u64,
    stats: SimStats,
}

impl<K: SimKey> SimHost<K> {
    pub fn new(options: SimHostOptions) -> Self {
        Self {
            options,
            keys: Vec::new(),
            sizes: Vec::new(),
            index: HashMap::new(),
            sums: Fenwick::new(),
            sentinels: EdgePair::default(),
            attached: true,
            scroll_offset: 0,
            stats: SimStats::default(),
        }
    }

    pub fn with_items(options: SimHostOptions, items: impl IntoIterator<Item = (K, u32)>) -> Self {
        let mut host = Self::new(options);
        host.append(items);
        host
    }

    pub fn options(&self) -> &SimHostOptions {
        &self.options
    }

    pub fn stats(&self) -> SimStats {
        self.stats
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn keys(&self) -> &[K] {
        &self.keys
    }

    pub fn contains(&self, key: &K) -> bool {
        self.index.contains_key(key)
    }

    pub fn is_sentinel_mounted(&self, edge: Edge) -> bool {
        self.sentinels.get(edge).is_some()
    }

    /// Attaches or detaches the scroll container (e.g. the element was replaced).
    pub fn set_attached(&mut self, attached: bool) {
        self.attached = attached;
    }

    /// Inserts items before the current first item.
    pub fn prepend(&mut self, items: impl IntoIterator<Item = (K, u32)>) {
        let (mut keys, mut sizes): (Vec<K>, Vec<u32>) = items.into_iter().unzip();
        if keys.is_empty() {
            return;
        }
        keys.append(&mut self.keys);
        sizes.append(&mut self.sizes);
        self.keys = keys;
        self.sizes = sizes;
        self.rebuild();
    }

    /// Inserts items after the current last item.
    pub fn append(&mut self, items: impl IntoIterator<Item = (K, u32)>) {
        let gap = self.options.gap as i64;
        for (key, size) in items {
            if gap > 0 && !self.keys.is_empty() {
                self.sums.add(self.keys.len() - 1, gap);
            }
            self.index.insert(key.clone(), self.keys.len());
            self.keys.push(key);
            self.sizes.push(size);
            self.sums.push_value(size as u64);
        }
    }

    /// Removes an item. Returns `false` if it was not present.
    pub fn remove(&mut self, key: &K) -> bool {
        let Some(index) = self.index.get(key).copied() else {
            return false;
        };
        self.keys.remove(index);
        self.sizes.remove(index);
        self.rebuild();
        true
    }

    /// Changes an item's height (e.g. an image finished loading).
    pub fn resize(&mut self, key: &K, size: u32) -> bool {
        let Some(index) = self.index.get(key).copied() else {
            return false;
        };
        let delta = size as i64 - self.sizes[index] as i64;
        self.sizes[index] = size;
        self.sums.add(index, delta);
        true
    }

    fn rebuild(&mut self) {
        self.sums = Fenwick::from_sizes(&self.sizes, self.options.gap);
        self.index = self
            .keys
            .iter()
            .enumerate()
            .map(|(i, k)| (k.clone(), i))
            .collect();
    }

    fn start_extent(&self) -> u64 {
        self.sentinels.start.unwrap_or(0) as u64
    }

    /// Offset of an item from the top of the scrollable content.
    pub fn item_start(&self, key: &K) -> Option<u64> {
        let index = *self.index.get(key)?;
        Some(self.start_extent() + self.sums.prefix_sum(index))
    }

    pub fn content_height(&self) -> u64 {
        self.start_extent() + self.sums.total() + self.sentinels.end.unwrap_or(0) as u64
    }

    pub fn max_scroll_offset(&self) -> u64 {
        self.content_height()
            .saturating_sub(self.options.viewport_height as u64)
    }

    /// The item at the top edge of the viewport, a natural scroll anchor.
    pub fn first_visible(&self) -> Option<&K> {
        let offset = self.scroll_offset.saturating_sub(self.start_extent());
        let index = self.sums.lower_bound(offset);
        self.keys.get(index)
    }

    /// A scroll made by the user (wheel, drag, keyboard).
    pub fn scroll_to(&mut self, offset: u64) {
        self.scroll_offset = offset.min(self.max_scroll_offset());
    }

    pub fn scroll_to_bottom(&mut self) {
        self.scroll_offset = self.max_scroll_offset();
    }

    pub fn screen_top(&self, key: &K) -> Option<i64> {
        self.rect(&SimNode::Item(key.clone())).map(|r| r.top)
    }

    fn to_screen(&self, offset: u64, height: u32) -> Rect {
        Rect::new(
            self.options.viewport_top + offset as i64 - self.scroll_offset as i64,
            height,
        )
    }
}

impl<K: SimKey> ListHost for SimHost<K> {
    type Id = SimNode<K>;

    fn container(&self) -> Option<SimNode<K>> {
        self.attached.then_some(SimNode::Container)
    }

    fn sync_sentinel(&mut self, edge: Edge, mounted: bool) -> Option<SimNode<K>> {
        let height = mounted.then(|| Skeleton::height_px(self.options.rem_px));
        *self.sentinels.get_mut(edge) = height;
        mounted.then_some(SimNode::Sentinel(edge))
    }

    fn rect(&self, id: &SimNode<K>) -> Option<Rect> {
        match id {
            SimNode::Container => self
                .attached
                .then(|| Rect::new(self.options.viewport_top, self.options.viewport_height)),
            SimNode::Sentinel(Edge::Start) => self.sentinels.start.map(|h| self.to_screen(0, h)),
            SimNode::Sentinel(Edge::End) => self
                .sentinels
                .end
                .map(|h| self.to_screen(self.start_extent() + self.sums.total(), h)),
            SimNode::Item(key) => {
                let index = *self.index.get(key)?;
                let start = self.start_extent() + self.sums.prefix_sum(index);
                Some(self.to_screen(start, self.sizes[index]))
            }
        }
    }

    fn scroll_offset(&self) -> u64 {
        self.scroll_offset
    }

    fn set_scroll_offset(&mut self, offset: u64) {
        self.stats.scroll_writes += 1;
        self.scroll_offset = offset.min(self.max_scroll_offset());
    }

    fn batch(&mut self, commit: impl FnOnce(&mut Self)) {
        self.stats.batches += 1;
        commit(self);
    }

    fn request_settle(&mut self) {
        self.stats.settle_requests += 1;
    }
}
