//! A loaded design text with a line index.

use crate::file_id::FileId;
use umbra_common::ContentHash;
use std::path::PathBuf;

/// One design text loaded into a run.
pub struct SourceFile {
    /// Identifier within the [`SourceDb`](crate::SourceDb).
    pub id: FileId,
    /// Filesystem path, or a synthetic name for in-memory text.
    pub path: PathBuf,
    /// The full text.
    pub content: String,
    /// Byte offset of each line start; the first entry is always 0.
    line_starts: Vec<u32>,
    /// Fingerprint of the text as read.
    pub content_hash: ContentHash,
}

impl SourceFile {
    /// Creates a source file, indexing line starts and fingerprinting the content.
    pub fn new(id: FileId, path: PathBuf, content: String) -> Self {
        let line_starts = compute_line_starts(&content);
        let content_hash = ContentHash::of_text(&content);
        Self {
            id,
            path,
            content,
            line_starts,
            content_hash,
        }
    }

    /// Converts a byte offset into 1-indexed `(line, column)`.
    pub fn line_col(&self, byte_offset: u32) -> (u32, u32) {
        let line_idx = match self.line_starts.binary_search(&byte_offset) {
            Ok(idx) => idx,
            Err(idx) => idx - 1,
        };
        let line = (line_idx as u32) + 1;
        let col = byte_offset - self.line_starts[line_idx] + 1;
        (line, col)
    }

    /// Returns the text between two byte offsets.
    pub fn snippet(&self, start: u32, end: u32) -> &str {
        &self.content[start as usize..end as usize]
    }

    /// Number of lines in the text.
    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }
}

fn compute_line_starts(content: &str) -> Vec<u32> {
    let mut starts = vec![0u32];
    for (i, byte) in content.bytes().enumerate() {
        if byte == b'\n' {
            starts.push((i + 1) as u32);
        }
    }
    starts
}
