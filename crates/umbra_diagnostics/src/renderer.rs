//! Diagnostic rendering.

use crate::diagnostic::Diagnostic;
use crate::label::LabelStyle;
use umbra_source::SourceDb;

/// Formats a diagnostic for output.
pub trait DiagnosticRenderer {
    /// Renders one diagnostic.
    fn render(&self, diag: &Diagnostic, source_db: &SourceDb) -> String;
}

/// rustc-style terminal output:
///
/// ```text
/// warning[P102]: unbalanced parentheses in instantiation `u_leaf` of `leaf`
///   --> combined.v:42:5
///    |
/// 42 |     leaf u_leaf (.a(x), .b(y);
///    |     ^^^^ skipped
///    |
///    = help: ...
/// ```
pub struct TerminalRenderer {
    /// Whether to emit ANSI colors.
    pub color: bool,
}

impl TerminalRenderer {
    /// Creates a renderer.
    pub fn new(color: bool) -> Self {
        Self { color }
    }

    fn paint(&self, text: &str, ansi: &str) -> String {
        if self.color {
            format!("\x1b[{ansi}m{text}\x1b[0m")
        } else {
            text.to_string()
        }
    }
}

impl DiagnosticRenderer for TerminalRenderer {
    fn render(&self, diag: &Diagnostic, source_db: &SourceDb) -> String {
        let mut out = String::new();

        let color = match diag.severity {
            crate::Severity::Error => "1;31",
            crate::Severity::Warning => "1;33",
            crate::Severity::Note => "1;36",
        };
        let head = format!("{}[{}]", diag.severity, diag.code);
        out.push_str(&format!("{}: {}\n", self.paint(&head, color), diag.message));

        if !diag.primary_span.is_dummy() {
            let resolved = source_db.resolve_span(diag.primary_span);
            out.push_str(&format!("  --> {resolved}\n"));

            let file = source_db.get_file(diag.primary_span.file);
            let (line, col) = file.line_col(diag.primary_span.start);
            let line_num = line.to_string();
            let padding = " ".repeat(line_num.len());
            let line_content = source_line(&file.content, diag.primary_span.start);

            out.push_str(&format!("{padding} |\n"));
            out.push_str(&format!("{line_num} | {line_content}\n"));

            // Underline stays on the first line of multi-line spans.
            let line_rest = line_content.len().saturating_sub((col as usize).saturating_sub(1));
            let span_len = (diag.primary_span.len() as usize).clamp(1, line_rest.max(1));
            let carets = "^".repeat(span_len);
            let col_padding = " ".repeat((col as usize).saturating_sub(1));
            let primary_msg = diag
                .labels
                .iter()
                .find(|l| l.style == LabelStyle::Primary)
                .map(|l| format!(" {}", l.message))
                .unwrap_or_default();
            out.push_str(&format!("{padding} | {col_padding}{carets}{primary_msg}\n"));
        }

        for label in diag.labels.iter().filter(|l| l.style == LabelStyle::Secondary) {
            if label.span.is_dummy() {
                out.push_str(&format!("   = note: {}\n", label.message));
            } else {
                let resolved = source_db.resolve_span(label.span);
                out.push_str(&format!("   = note: {} ({resolved})\n", label.message));
            }
        }
        for note in &diag.notes {
            out.push_str(&format!("   = note: {note}\n"));
        }
        for help in &diag.help {
            out.push_str(&format!("   = help: {help}\n"));
        }

        out
    }
}

fn source_line(content: &str, byte_offset: u32) -> &str {
    let offset = (byte_offset as usize).min(content.len());
    let start = content[..offset].rfind('\n').map_or(0, |pos| pos + 1);
    let end = content[offset..]
        .find('\n')
        .map_or(content.len(), |pos| offset + pos);
    &content[start..end]
}
