use std::cell::Cell;
use std::convert::Infallible;
use std::future::ready;

use futures::executor::block_on;
use lazylist::{Edge, ListSource, ListUpdate, ListView};
use lazylist_adapter::{SimHost, SimHostOptions, SimNode};

/// Messages 1..=200; the newest 20 are loaded at startup.
struct Chat {
    first: Cell<u32>,
}

impl ListSource<SimHost<u32>> for Chat {
    type Error = Infallible;

    fn fetch_top(
        &self,
    ) -> impl Future<Output = Result<Option<ListUpdate<SimHost<u32>>>, Infallible>> {
        let first = self.first.get();
        let from = first.saturating_sub(25).max(1);
        self.first.set(from);
        ready(Ok((from < first).then(|| {
            ListUpdate::anchored(SimNode::Item(first), move |host: &mut SimHost<u32>| {
                host.prepend((from..first).map(|k| (k, 40 + (k % 3) * 20)))
            })
        })))
    }

    fn fetch_bottom(
        &self,
    ) -> impl Future<Output = Result<Option<ListUpdate<SimHost<u32>>>, Infallible>> {
        ready(Ok(None))
    }

    fn at_start(&self) -> bool {
        self.first.get() <= 1
    }

    fn at_end(&self) -> bool {
        true
    }
}

fn main() {
    // Example: a chat view that loads older messages as the user scrolls up.
    //
    // The adapter flow is:
    // 1) on every scroll event, `handle_scroll` (loads whichever edge came into view)
    // 2) after the next paint, `on_layout_settled` (keeps the anchor message in place)
    let host = SimHost::with_items(
        SimHostOptions::default().with_gap(8),
        (181..=200).map(|k| (k, 40 + (k % 3) * 20)),
    );
    let view = ListView::new(host, Chat { first: Cell::new(181) });
    view.with_host_mut(|h| h.scroll_to_bottom());
    view.poll_visibility();

    while !view.edge_state(Edge::Start).exhausted {
        // The user drags the scrollbar until the loading skeleton peeks in.
        let top = view
            .with_host(|h| h.item_start(&h.keys()[0]).unwrap_or(0))
            .unwrap_or(0);
        view.with_host_mut(|h| h.scroll_to(top.saturating_sub(200)));

        for (edge, outcome) in block_on(view.handle_scroll()) {
            println!("load {edge}: {outcome:?}");
        }
        let correction = view.on_layout_settled();
        view.poll_visibility();

        view.with_host(|h| {
            println!(
                "  loaded={} first_visible={:?} correction={correction:?}",
                h.len(),
                h.first_visible()
            )
        });
    }
}
