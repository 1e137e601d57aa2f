//! Insertions spliced into design text at byte offsets.

use serde::{Deserialize, Serialize};

/// Text to insert in front of the byte at `offset`.
///
/// Edits never replace or delete input text, so every byte outside the
/// insertion points is emitted unchanged.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextEdit {
    /// Byte offset in the original text.
    pub offset: u32,
    /// The inserted text.
    pub insert: String,
}

impl TextEdit {
    /// Creates an insertion at `offset`.
    pub fn insert(offset: u32, text: impl Into<String>) -> Self {
        Self {
            offset,
            insert: text.into(),
        }
    }
}

/// Applies insertions to `text`, returning the edited copy.
///
/// Edits are applied in offset order; edits sharing an offset keep the
/// order in which they were given. Offsets past the end of `text` are
/// clamped to the end.
pub fn apply_edits(text: &str, edits: &[TextEdit]) -> String {
    let mut ordered: Vec<&TextEdit> = edits.iter().collect();
    ordered.sort_by_key(|e| e.offset);

    let extra: usize = ordered.iter().map(|e| e.insert.len()).sum();
    let mut out = String::with_capacity(text.len() + extra);
    let mut cursor = 0usize;
    for edit in ordered {
        let at = (edit.offset as usize).min(text.len());
        out.push_str(&text[cursor..at]);
        out.push_str(&edit.insert);
        cursor = at;
    }
    out.push_str(&text[cursor..]);
    out
}
