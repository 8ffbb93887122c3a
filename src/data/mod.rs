//! The typed records returned by the Gelbooru API.
//!
//! Every record keeps the response fragment it was built from in a `raw` field,
//! so fields that are not modeled here are still reachable.

pub(crate) mod de;

mod comment;
mod post;
mod tag;

use serde::Serialize;

pub use comment::Comment;
pub use post::{Post, Rating};
pub use tag::{Tag, TagType};

/// The decoded response fragment a record was built from, kept verbatim.
pub type RawData = serde_json::Map<String, serde_json::Value>;

/// The width and height of an image, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub struct ImageDimensions {
    /// The width in pixels.
    pub width: u32,
    /// The height in pixels.
    pub height: u32,
}

impl ImageDimensions {
    /// Create a new pair.
    #[inline]
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

impl From<(u32, u32)> for ImageDimensions {
    #[inline]
    fn from((width, height): (u32, u32)) -> Self {
        Self::new(width, height)
    }
}
