//! Design text management, span tracking and text edits.
//!
//! The [`SourceDb`] owns the design text read for a run. [`FileId`] and
//! [`Span`] locate structural elements inside it, [`ResolvedSpan`] turns byte
//! offsets into `file:line:col` for diagnostics, and [`TextEdit`] describes
//! the insertions the emitter splices into the original text.

#![warn(missing_docs)]

pub mod edit;
pub mod file_id;
pub mod resolved_span;
pub mod source_db;
pub mod source_file;
pub mod span;

pub use edit::{apply_edits, TextEdit};
pub use file_id::FileId;
pub use resolved_span::ResolvedSpan;
pub use source_db::SourceDb;
pub use source_file::SourceFile;
pub use span::Span;
