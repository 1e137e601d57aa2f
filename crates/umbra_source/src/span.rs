//! Byte ranges within design text.

use crate::file_id::FileId;
use serde::{Deserialize, Serialize};

/// A half-open byte range `[start, end)` within one loaded text.
///
/// Module headers, instantiations and connections all keep the span they were
/// recognized at, so every diagnostic can point back at the offending text and
/// the emitter can splice markers at exact offsets.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub struct Span {
    /// The text this span belongs to.
    pub file: FileId,
    /// Inclusive start offset.
    pub start: u32,
    /// Exclusive end offset.
    pub end: u32,
}

impl Span {
    /// Span used when an element has no location in any input.
    pub const DUMMY: Span = Span {
        file: FileId::DUMMY,
        start: 0,
        end: 0,
    };

    /// Creates a new span.
    pub fn new(file: FileId, start: u32, end: u32) -> Self {
        Self { file, start, end }
    }

    /// Returns the smallest span covering both `self` and `other`.
    ///
    /// # Panics
    ///
    /// Panics if the spans belong to different files.
    pub fn merge(self, other: Span) -> Span {
        assert_eq!(
            self.file, other.file,
            "cannot merge spans from different files"
        );
        Span {
            file: self.file,
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }

    /// Length in bytes.
    pub fn len(&self) -> u32 {
        self.end - self.start
    }

    /// Returns `true` for a zero-length span.
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Returns `true` for [`Span::DUMMY`]-like spans.
    pub fn is_dummy(&self) -> bool {
        self.file == FileId::DUMMY
    }
}
