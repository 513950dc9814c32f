use crate::*;

use std::cell::Cell;
use std::convert::Infallible;
use std::future::ready;

use futures::executor::block_on;
use lazylist::{
    ApplyOutcome, Correction, Edge, ListHost, ListSource, ListUpdate, ListView, LoadOutcome,
    Rect,
};

type Host = SimHost<u32>;
type Reply = Result<Option<ListUpdate<Host>>, Infallible>;

/// Message history with keys `oldest..=newest`, of which `first..=last` are loaded.
struct History {
    oldest: u32,
    newest: Cell<u32>,
    first: Cell<u32>,
    last: Cell<u32>,
    page: u32,
    height: u32,
    /// Anchor on this key instead of the loaded boundary.
    pin: Option<u32>,
    permit: Cell<bool>,
}

impl History {
    fn new(oldest: u32, newest: u32, loaded: core::ops::RangeInclusive<u32>) -> Self {
        Self {
            oldest,
            newest: Cell::new(newest),
            first: Cell::new(*loaded.start()),
            last: Cell::new(*loaded.end()),
            page: 10,
            height: 100,
            pin: None,
            permit: Cell::new(true),
        }
    }

    fn loaded(&self, opts: SimHostOptions) -> Host {
        let height = self.height;
        SimHost::with_items(opts, (self.first.get()..=self.last.get()).map(|k| (k, height)))
    }
}

impl ListSource<Host> for History {
    type Error = Infallible;

    fn fetch_top(&self) -> impl Future<Output = Reply> {
        let first = self.first.get();
        if first <= self.oldest {
            return ready(Ok(None));
        }
        let from = first.saturating_sub(self.page).max(self.oldest);
        self.first.set(from);
        let height = self.height;
        ready(Ok(Some(ListUpdate::anchored(
            SimNode::Item(self.pin.unwrap_or(first)),
            move |host: &mut Host| host.prepend((from..first).map(|k| (k, height))),
        ))))
    }

    fn fetch_bottom(&self) -> impl Future<Output = Reply> {
        let last = self.last.get();
        let newest = self.newest.get();
        if last >= newest {
            return ready(Ok(None));
        }
        let to = last.saturating_add(self.page).min(newest);
        self.last.set(to);
        let height = self.height;
        ready(Ok(Some(ListUpdate::anchored(
            SimNode::Item(self.pin.unwrap_or(last)),
            move |host: &mut Host| host.append((last + 1..=to).map(|k| (k, height))),
        ))))
    }

    fn at_start(&self) -> bool {
        self.first.get() <= self.oldest
    }

    fn at_end(&self) -> bool {
        self.last.get() >= self.newest.get()
    }

    fn permit_fetching(&self) -> bool {
        self.permit.get()
    }
}

#[test]
fn sim_layout_follows_gap_and_mutations() {
    let opts = SimHostOptions::default().with_viewport(0, 100).with_gap(10);
    let mut host = SimHost::with_items(opts, [(1u32, 100), (2, 50), (3, 100)]);
    assert_eq!(host.item_start(&1), Some(0));
    assert_eq!(host.item_start(&2), Some(110));
    assert_eq!(host.item_start(&3), Some(170));
    assert_eq!(host.content_height(), 270);

    host.append([(4, 20)]);
    assert_eq!(host.item_start(&4), Some(280));
    assert_eq!(host.content_height(), 300);

    assert!(host.resize(&2, 80));
    assert_eq!(host.item_start(&3), Some(200));

    assert!(host.remove(&1));
    assert!(!host.remove(&1));
    assert_eq!(host.keys(), &[2, 3, 4]);
    assert_eq!(host.item_start(&2), Some(0));
    assert_eq!(host.item_start(&3), Some(90));
    assert_eq!(host.item_start(&4), Some(200));

    host.scroll_to(95);
    assert_eq!(host.first_visible(), Some(&3));
    assert_eq!(host.screen_top(&3), Some(-5));

    host.scroll_to(10_000);
    assert_eq!(host.scroll_offset(), host.max_scroll_offset());
    assert_eq!(host.max_scroll_offset(), 120);
}

#[test]
fn sim_prepend_shifts_existing_items() {
    let mut host = SimHost::with_items(SimHostOptions::default(), [(10u32, 100)]);
    host.prepend([(8, 10), (9, 10)]);
    assert_eq!(host.keys(), &[8, 9, 10]);
    assert_eq!(host.item_start(&10), Some(20));
    assert!(host.contains(&8));
    assert_eq!(host.len(), 3);
}

#[test]
fn sim_sentinels_are_sized_by_skeleton() {
    let mut host = SimHost::with_items(SimHostOptions::default(), [(1u32, 100), (2, 100)]);
    assert_eq!(host.container(), Some(SimNode::Container));
    assert_eq!(
        host.sync_sentinel(Edge::Start, true),
        Some(SimNode::Sentinel(Edge::Start))
    );
    assert_eq!(host.sync_sentinel(Edge::End, true), Some(SimNode::Sentinel(Edge::End)));

    assert_eq!(host.item_start(&1), Some(1600));
    assert_eq!(host.rect(&SimNode::Sentinel(Edge::Start)), Some(Rect::new(0, 1600)));
    assert_eq!(host.rect(&SimNode::Sentinel(Edge::End)), Some(Rect::new(1800, 1600)));
    assert_eq!(host.content_height(), 3400);

    assert_eq!(host.sync_sentinel(Edge::Start, false), None);
    assert!(!host.is_sentinel_mounted(Edge::Start));
    assert_eq!(host.rect(&SimNode::Sentinel(Edge::Start)), None);
    assert_eq!(host.item_start(&1), Some(0));

    host.set_attached(false);
    assert_eq!(host.container(), None);
    assert_eq!(host.rect(&SimNode::Container), None);
}

#[test]
fn skeleton_is_a_pure_function_of_alignment() {
    let top = Skeleton::for_edge(Edge::Start);
    let bottom = Skeleton::for_edge(Edge::End);
    assert_eq!(top.align, SkeletonAlign::End);
    assert_eq!(bottom.align, SkeletonAlign::Start);
    assert_eq!(top.rows, bottom.rows);
    assert_eq!(top, Skeleton::new(SkeletonAlign::End));

    assert_eq!(top.rows.len(), skeleton::SKELETON_ROWS);
    for row in &top.rows {
        assert!((5..=9).contains(&row.username_em));
        assert!((1..=3).contains(&row.content_em.len()));
        assert!(row.content_em.iter().all(|w| (15..=24).contains(w)));

        let shapes: Vec<Shape> = row.shapes().collect();
        assert_eq!(shapes[0], Shape::Avatar);
        assert_eq!(
            shapes[1],
            Shape::Username {
                width_em: row.username_em
            }
        );
        assert_eq!(shapes.len(), 2 + row.content_em.len());
    }
    assert_eq!(Skeleton::height_px(16), 1600);
    assert_eq!(Skeleton::height_px(10), 1000);

    let other = Skeleton::with_rows(SkeletonAlign::Start, 5, 7);
    assert_eq!(other.rows.len(), 5);
    assert_eq!(other, Skeleton::with_rows(SkeletonAlign::Start, 5, 7));
}

#[test]
fn prepend_keeps_item_15_at_y_200() {
    let mut history = History::new(1, 20, 10..=20);
    history.page = 9;
    history.pin = Some(15);
    let host = history.loaded(SimHostOptions::default());
    let view = ListView::new(host, history);

    view.with_host_mut(|h| h.scroll_to(1900));
    assert_eq!(view.with_host(|h| h.screen_top(&15)), Some(Some(200)));

    assert_eq!(
        block_on(view.load_start()).unwrap(),
        LoadOutcome::Applied(ApplyOutcome::CorrectionPending)
    );
    // The start skeleton unmounted in the same frame (oldest page reached); the correction
    // accounts for both shifts.
    assert!(view.edge_state(Edge::Start).exhausted);
    assert!(view.on_layout_settled().is_some());

    assert_eq!(view.with_host(|h| h.screen_top(&15)), Some(Some(200)));
    assert_eq!(view.with_host(|h| h.len()), Some(20));
    assert_eq!(view.with_host(|h| h.stats().scroll_writes), Some(1));
}

#[test]
fn exhausted_bottom_unmounts_skeleton_without_scrolling() {
    let history = History::new(1, 25, 10..=20);
    let host = history.loaded(SimHostOptions::default());
    let view = ListView::new(host, history);
    assert!(view.with_host(|h| h.is_sentinel_mounted(Edge::End)).unwrap());

    view.with_host_mut(|h| h.scroll_to(1900));
    // The server reports nothing newer after all.
    view.source().newest.set(20);

    assert_eq!(block_on(view.load_end()).unwrap(), LoadOutcome::Exhausted);
    assert!(!view.with_host(|h| h.is_sentinel_mounted(Edge::End)).unwrap());
    assert!(!view.is_observing(Edge::End));
    assert_eq!(view.with_host(|h| h.scroll_offset()), Some(1900));
    assert_eq!(
        view.with_host(|h| h.stats()),
        Some(SimStats {
            batches: 0,
            scroll_writes: 0,
            settle_requests: 0,
        })
    );
}

#[test]
fn scrolling_up_pages_through_history_until_start() {
    let history = History::new(1, 100, 91..=100);
    let host = history.loaded(SimHostOptions::default());
    let view = ListView::new(host, history);
    assert!(view.sentinel(Edge::End).is_none());
    view.with_host_mut(|h| h.scroll_to_bottom());
    assert!(view.poll_visibility().is_empty());

    let mut loads = 0;
    while !view.edge_state(Edge::Start).exhausted {
        assert!(loads < 20, "history never reached its start");

        // Bring the bottom 300px of the start skeleton into view.
        view.with_host_mut(|h| h.scroll_to(1300));
        let anchor = view.with_host(|h| h.keys()[0]).unwrap();
        let before = view.with_host(|h| h.screen_top(&anchor)).flatten();

        let results = block_on(view.handle_scroll());
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].0, Edge::Start);
        loads += 1;

        assert!(matches!(
            view.on_layout_settled(),
            Some(Correction::Adjusted { .. })
        ));
        assert_eq!(view.with_host(|h| h.screen_top(&anchor)).flatten(), before);
        // The correction scrolled the skeleton out of view.
        assert!(view.poll_visibility().is_empty());
    }

    assert_eq!(loads, 9);
    assert_eq!(view.with_host(|h| h.len()), Some(100));
    assert_eq!(view.sentinel(Edge::Start), None);
    assert_eq!(view.with_host(|h| h.first_visible().copied()), Some(Some(8)));
}

#[test]
fn fetching_suspended_keeps_skeletons_inert() {
    let history = History::new(1, 100, 45..=55);
    history.permit.set(false);
    let host = history.loaded(SimHostOptions::default());
    let view = ListView::new(host, history);

    assert!(view.with_host(|h| h.is_sentinel_mounted(Edge::Start)).unwrap());
    assert!(view.with_host(|h| h.is_sentinel_mounted(Edge::End)).unwrap());
    assert!(!view.is_observing(Edge::Start));
    assert!(!view.is_observing(Edge::End));
    assert!(block_on(view.handle_scroll()).is_empty());

    view.source().permit.set(true);
    view.render();
    assert_eq!(view.poll_visibility(), vec![Edge::Start]);
}

#[test]
fn detached_container_disarms_until_reattached() {
    let history = History::new(1, 100, 45..=55);
    let host = history.loaded(SimHostOptions::default());
    let view = ListView::new(host, history);
    assert!(view.is_observing(Edge::Start));

    view.with_host_mut(|h| h.set_attached(false));
    view.render();
    assert!(!view.is_observing(Edge::Start));
    assert!(view.poll_visibility().is_empty());

    view.with_host_mut(|h| h.set_attached(true));
    view.render();
    assert_eq!(view.poll_visibility(), vec![Edge::Start]);
}
