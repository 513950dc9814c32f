//! A headless bidirectional lazy-loading list view with scroll anchoring.
//!
//! A scrollable list that fetches older content as the user nears its top and newer content
//! as they near its bottom, while keeping a chosen element visually pinned across each content
//! mutation. Typical users are chat and timeline views.
//!
//! It is UI-agnostic. A DOM/TUI/GUI layer is expected to provide (via [`ListHost`]):
//! - element geometry relative to the screen
//! - the scroll offset of the container
//! - mounting of the two edge sentinels (loading skeletons)
//!
//! and the data layer provides pages through [`ListSource`].
//!
//! For a simulated column host and skeleton placeholders, see the `lazylist-adapter` crate.
#![forbid(unsafe_code)]

#[macro_use]
mod macros;

mod anchor;
mod detector;
mod error;
mod gate;
mod host;
mod options;
mod orchestrator;
mod types;
mod view;


pub use anchor::{AnchorSnapshot, ApplyOutcome, Correction, ScrollAnchorController};
pub use detector::EdgeVisibilityDetector;
pub use error::FetchFailure;
pub use gate::FetchGate;
pub use host::{ListHost, ListSource, ListUpdate};
pub use options::{ListViewOptions, SettleMode};
pub use orchestrator::{FetchOrchestrator, LoadOutcome};
pub use types::{Edge, EdgePair, EdgeState, Rect};
pub use view::ListView;
