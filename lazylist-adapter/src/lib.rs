//! Adapter utilities for the `lazylist` crate.
//!
//! The `lazylist` crate is UI-agnostic and only reasons about element identity, geometry and
//! edge visibility. This crate provides small, framework-neutral pieces commonly needed around
//! it:
//!
//! - [`SimHost`]: an in-memory column layout implementing `lazylist::ListHost`
//! - [`Skeleton`]: the loading placeholder shown in place of an edge sentinel
//!
//! This crate is intentionally framework-agnostic (no DOM/ratatui/egui bindings).
#![forbid(unsafe_code)]

mod fenwick;
mod key;
mod sim;
pub mod skeleton;

#[cfg(test)]
mod tests;

pub use key::SimKey;
pub use sim::{SimHost, SimHostOptions, SimNode, SimStats};
pub use skeleton::{Shape, Skeleton, SkeletonAlign, SkeletonRow};
