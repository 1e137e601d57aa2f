//! Boundary markers: flags on the model and insertions into the text.

use umbra_model::DesignModel;
use umbra_source::TextEdit;

use crate::partition::Partition;

/// The attribute text placed before a blackboxed declaration.
pub fn marker_text(marker: &str) -> String {
    format!("(* {marker} *)\n")
}

/// Flags every blackboxed module in `model` and returns the text insertions
/// for declared modules that do not already carry `marker`.
///
/// Synthesized stubs get flagged but no edit; they are rendered with the
/// marker when emitted. A marker already present in the input is recorded
/// in [`Module::marked_in_input`](umbra_model::Module) and left in the text,
/// but only partition members are flagged as blackboxed.
pub fn apply_markers(
    model: &mut DesignModel,
    partition: &Partition,
    marker: &str,
) -> Vec<TextEdit> {
    let mut edits = Vec::new();
    for module in model.iter_mut() {
        module.marked_in_input = module.has_attribute(marker);
        module.is_blackboxed = partition.blackboxed.contains(&module.name);
        if !module.is_blackboxed || module.marked_in_input {
            continue;
        }
        if let Some(offset) = module.marker_offset() {
            tracing::debug!(module = %module.name, offset, "inserting boundary marker");
            edits.push(TextEdit::insert(offset, marker_text(marker)));
        }
    }
    edits
}
