//! Loading placeholders rendered in place of an edge sentinel.
//!
//! The skeleton is presentation only: a pure function of its alignment (and seed). Hosts use
//! [`Skeleton::height_px`] to size the sentinel element the list view observes.

use lazylist::Edge;

/// Number of placeholder messages in one skeleton.
pub const SKELETON_ROWS: usize = 30;
/// Height of the skeleton block, in rem.
pub const SKELETON_HEIGHT_REM: u32 = 100;
/// Diameter of the avatar placeholder.
pub const AVATAR_PX: u32 = 36;

const DEFAULT_SEED: u64 = 0x5EED;

/// Which end of the skeleton block the rows are packed against.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SkeletonAlign {
    Start,
    End,
}

impl SkeletonAlign {
    /// Rows hug the list content: the top skeleton packs its rows at its end, the bottom one
    /// at its start.
    pub fn for_edge(edge: Edge) -> Self {
        match edge {
            Edge::Start => Self::End,
            Edge::End => Self::Start,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Shape {
    /// A round avatar frame of [`AVATAR_PX`].
    Avatar,
    Username { width_em: u8 },
    Content { width_em: u8 },
}

/// One placeholder message: avatar, username bar and 1-3 content bars.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SkeletonRow {
    pub username_em: u8,
    pub content_em: Vec<u8>,
}

impl SkeletonRow {
    pub fn shapes(&self) -> impl Iterator<Item = Shape> + '_ {
        [
            Shape::Avatar,
            Shape::Username {
                width_em: self.username_em,
            },
        ]
        .into_iter()
        .chain(
            self.content_em
                .iter()
                .map(|&width_em| Shape::Content { width_em }),
        )
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Skeleton {
    pub align: SkeletonAlign,
    pub rows: Vec<SkeletonRow>,
}

impl Skeleton {
    pub fn new(align: SkeletonAlign) -> Self {
        Self::with_rows(align, SKELETON_ROWS, DEFAULT_SEED)
    }

    pub fn for_edge(edge: Edge) -> Self {
        Self::new(SkeletonAlign::for_edge(edge))
    }

    /// Builds `rows` placeholders. Widths vary per row but are fixed for a given `seed`.
    pub fn with_rows(align: SkeletonAlign, rows: usize, seed: u64) -> Self {
        let mut rng = Lcg(seed);
        let rows = (0..rows)
            .map(|_| {
                let username_em = rng.gen_range(5, 10) as u8;
                let lines = rng.gen_range(1, 4);
                let content_em = (0..lines).map(|_| rng.gen_range(15, 25) as u8).collect();
                SkeletonRow {
                    username_em,
                    content_em,
                }
            })
            .collect();
        Self { align, rows }
    }

    /// Height of the block (and therefore of the sentinel) for a given root font size.
    ///
    /// Every skeleton has the same height, whatever its rows.
    pub fn height_px(rem_px: u32) -> u32 {
        SKELETON_HEIGHT_REM.saturating_mul(rem_px)
    }
}

#[derive(Clone, Copy, Debug)]
struct Lcg(u64);

impl Lcg {
    fn next_u64(&mut self) -> u64 {
        self.0 = self
            .0
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        self.0
    }

    fn gen_range(&mut self, start: u64, end_exclusive: u64) -> u64 {
        // High bits of an LCG are the well-mixed ones.
        start + ((self.next_u64() >> 33) % (end_exclusive - start))
    }
}
