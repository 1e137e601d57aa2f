//! Port inference from instantiation sites.

use umbra_common::Direction;
use umbra_diagnostics::DiagnosticSink;
use umbra_model::{DesignModel, Port};
use umbra_source::Span;

use crate::errors;
use crate::roles::RoleTable;

/// Infers the port list of the undeclared module `target`.
///
/// Ports appear in the order their formal names are first seen across all
/// instantiations. Each port takes the widest resolved actual; a port with
/// no resolved actual is one bit wide and reported with `I201`.
pub fn infer_ports(
    model: &DesignModel,
    target: &str,
    roles: &RoleTable,
    sink: &DiagnosticSink,
) -> Vec<Port> {
    // (name, widest resolved width, first site)
    let mut formals: Vec<(String, Option<u32>, Span)> = Vec::new();
    for inst in model.instantiations_of(target) {
        for conn in &inst.connections {
            let site = if conn.span.is_dummy() {
                inst.span
            } else {
                conn.span
            };
            let width = conn.width.bits();
            match formals.iter_mut().find(|(name, _, _)| *name == conn.formal) {
                Some(entry) => entry.1 = entry.1.max(width),
                None => formals.push((conn.formal.clone(), width, site)),
            }
        }
    }

    formals
        .into_iter()
        .map(|(name, width, site)| {
            let direction = roles.direction_for(&name).unwrap_or(Direction::Input);
            let width = match width {
                Some(w) => w,
                None => {
                    sink.emit(errors::note_unresolved_width(target, &name, site));
                    1
                }
            };
            Port::new(name, direction, width)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use umbra_model::scan;
    use umbra_source::FileId;

    fn infer(src: &str, target: &str) -> (Vec<Port>, Vec<String>) {
        let sink = DiagnosticSink::new();
        let model = scan(src, FileId::from_raw(0), &sink);
        assert!(sink.take_all().is_empty());
        let ports = infer_ports(&model, target, &RoleTable::defaults(), &sink);
        let codes = sink.take_all().iter().map(|d| d.code.to_string()).collect();
        (ports, codes)
    }

    #[test]
    fn widest_actual_wins() {
        let (ports, codes) = infer(
            "module top;\n\
             wire sig; wire [15:0] bus;\n\
             leaf_ext u0 (.a(sig));\n\
             leaf_ext u1 (.a(bus[7:0]));\n\
             endmodule\n",
            "leaf_ext",
        );
        assert_eq!(ports, vec![Port::new("a", Direction::Input, 8)]);
        assert!(codes.is_empty());
    }

    #[test]
    fn formals_in_first_seen_order_across_sites() {
        let (ports, _) = infer(
            "module a; mem m (.R0_addr(x), .R0_data(y)); endmodule\n\
             module b; mem m (.W0_en(e), .R0_addr(z[4:0]), .W0_data(d)); endmodule\n",
            "mem",
        );
        let summary: Vec<_> = ports
            .iter()
            .map(|p| (p.name.as_str(), p.direction, p.width))
            .collect();
        assert_eq!(
            summary,
            vec![
                ("R0_addr", Direction::Input, 5),
                ("R0_data", Direction::Output, 1),
                ("W0_en", Direction::Input, 1),
                ("W0_data", Direction::Input, 1),
            ]
        );
    }

    #[test]
    fn unresolved_width_defaults_to_one_with_note() {
        let (ports, codes) = infer(
            "module top; leaf u (.p(), .q(a & b), .r(v[W-1:0])); endmodule",
            "leaf",
        );
        assert!(ports.iter().all(|p| p.width == 1));
        assert_eq!(codes, vec!["I201", "I201", "I201"]);
    }

    #[test]
    fn positional_ports() {
        let (ports, _) = infer("module top; cell c (x, 3'b0); endmodule", "cell");
        let names: Vec<_> = ports.iter().map(|p| (p.name.as_str(), p.width)).collect();
        assert_eq!(names, vec![("port_0", 1), ("port_1", 3)]);
    }
}
