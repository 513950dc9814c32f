use thiserror::Error;

use crate::Edge;

/// A caller-supplied fetcher failed.
///
/// The in-flight guard for `edge` is already released when this is returned; the sentinel
/// stays mounted, so the next time it scrolls into view the fetch is retried.
#[derive(Debug, Error)]
#[error("failed to fetch the {edge} of the list")]
pub struct FetchFailure<E: std::error::Error + 'static> {
    pub edge: Edge,
    #[source]
    pub source: E,
}

impl<E: std::error::Error + 'static> FetchFailure<E> {
    pub fn new(edge: Edge, source: E) -> Self {
        Self { edge, source }
    }

    pub fn into_source(self) -> E {
        self.source
    }
}
