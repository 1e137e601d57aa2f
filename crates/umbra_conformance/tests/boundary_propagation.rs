//! Boundary propagation: everything strictly below the boundary is
//! blackboxed except whitebox targets and their descendants, and text
//! outside the marked subtree is emitted unchanged.

use umbra_boundary::BoundaryError;
use umbra_conformance::{is_marked, module_text, prepare_design};
use umbra_flow::FlowError;

const HIERARCHY: &str = r#"
module Top (input clk);
    A a (.clk(clk));
    C c (.clk(clk));
endmodule

module A (input clk);
    B b (.clk(clk));
endmodule

module B (input clk);
endmodule

module C (input clk);
endmodule
"#;

#[test]
fn whitebox_subtree_is_preserved() {
    let result = prepare_design(HIERARCHY, "Top", &["B"]).unwrap();
    let partition = result.prepared.partition.as_ref().unwrap();
    let under: Vec<_> = partition.under_boundary.iter().map(String::as_str).collect();
    assert_eq!(under, vec!["A", "B", "C"]);
    assert_eq!(result.preserved(), vec!["B"]);
    assert_eq!(result.blackboxed(), vec!["A", "C"]);

    let text = result.text();
    assert!(is_marked(text, "A"));
    assert!(is_marked(text, "C"));
    assert!(!is_marked(text, "B"));
    assert!(!is_marked(text, "Top"));
    assert_eq!(text.matches("(* blackbox *)").count(), 2);
}

#[test]
fn diamond_shared_module_stays_preserved() {
    let src = r#"
module Top; A a (); C c (); endmodule
module A; D d (); endmodule
module C; D d (); endmodule
module D; endmodule
"#;
    let result = prepare_design(src, "Top", &["A"]).unwrap();
    assert_eq!(result.preserved(), vec!["A", "D"]);
    assert_eq!(result.blackboxed(), vec!["C"]);
    assert!(!is_marked(result.text(), "D"));
    assert!(is_marked(result.text(), "C"));
}

#[test]
fn partition_is_disjoint_and_covers_the_subtree() {
    let src = r#"
module Top; A a (); B b (); endmodule
module A; C c (); D d (); endmodule
module B; D d (); E e (); endmodule
module C; endmodule
module D; F f (); endmodule
module E; endmodule
module F; endmodule
"#;
    let cases: &[&[&str]] = &[&[], &["A"], &["B"], &["D"], &["A", "E"], &["F", "C"]];
    for whitebox in cases {
        let result = prepare_design(src, "Top", whitebox).unwrap();
        let p = result.prepared.partition.as_ref().unwrap();
        assert!(p.blackboxed.is_disjoint(&p.preserved), "{whitebox:?}");
        let union: std::collections::BTreeSet<_> =
            p.blackboxed.union(&p.preserved).cloned().collect();
        assert_eq!(union, p.under_boundary, "{whitebox:?}");
        for name in &p.preserved {
            assert!(!is_marked(result.text(), name), "{name} marked for {whitebox:?}");
        }
        for name in &p.blackboxed {
            assert!(is_marked(result.text(), name), "{name} unmarked for {whitebox:?}");
        }
    }
}

#[test]
fn text_outside_the_subtree_is_byte_identical() {
    let src = r#"
// test harness
module Harness;
    reg clk;
    Top dut (.clk(clk));
    Monitor mon ();
endmodule

module Top (input clk);
    A a (.clk(clk));
endmodule

module A (input clk);
    reg [3:0] count;
    always @(posedge clk) count <= count + 1;
endmodule

module Monitor;
endmodule
"#;
    let result = prepare_design(src, "Top", &[]).unwrap();
    assert_eq!(result.blackboxed(), vec!["A"]);
    let text = result.text();
    for module in ["Harness", "Top", "Monitor"] {
        assert_eq!(module_text(text, module), module_text(src, module), "{module}");
        assert!(!is_marked(text, module));
    }
    assert_eq!(module_text(text, "A"), module_text(src, "A"));

    // Removing the inserted markers and the appended stand-ins gives the input back.
    let body = text.split("\n// ---- interface stubs").next().unwrap();
    assert_eq!(body.replace("(* blackbox *)\n", ""), src);
}

#[test]
fn instantiation_order_does_not_change_the_partition() {
    let forward = r#"
module Top; A a (); C c (); endmodule
module A; B b (); endmodule
module B; endmodule
module C; B b (); endmodule
"#;
    let permuted = r#"
module C; B b (); endmodule
module B; endmodule
module Top; C c (); A a (); endmodule
module A; B b (); endmodule
"#;
    for whitebox in [&[][..], &["C"][..], &["B"][..]] {
        let a = prepare_design(forward, "Top", whitebox).unwrap();
        let b = prepare_design(permuted, "Top", whitebox).unwrap();
        assert_eq!(a.prepared.partition, b.prepared.partition, "{whitebox:?}");
    }
}

#[test]
fn stand_ins_below_the_boundary_are_marked() {
    let src = r#"
module Top; Tile t (); endmodule
module Tile;
    tag_array_ext tags (.R0_addr(6'd0), .R0_data());
    Frontend fe ();
endmodule
module Frontend;
    icache_ext ic (.R0_addr(6'd0));
endmodule
"#;
    let result = prepare_design(src, "Top", &["Frontend"]).unwrap();
    assert_eq!(result.blackboxed(), vec!["Tile", "tag_array_ext"]);
    assert_eq!(result.preserved(), vec!["Frontend", "icache_ext"]);
    let text = result.text();
    assert!(is_marked(text, "tag_array_ext ("));
    assert!(!is_marked(text, "icache_ext ("));
    assert!(!is_marked(text, "plusarg_reader"));
}

#[test]
fn existing_markers_are_not_duplicated() {
    let src = "module Top; A a (); endmodule\n(* blackbox *)\nmodule A; endmodule\n";
    let result = prepare_design(src, "Top", &[]).unwrap();
    assert_eq!(result.blackboxed(), vec!["A"]);
    assert_eq!(result.text().matches("(* blackbox *)").count(), 1);
    assert!(result.prepared.model.get("A").unwrap().is_blackboxed);
}

#[test]
fn preserved_modules_are_never_flagged() {
    let src = "module Top; A a (); endmodule\n\
               (* blackbox *)\nmodule A; B b (); endmodule\n\
               module B; endmodule\n";
    let result = prepare_design(src, "Top", &["A"]).unwrap();
    assert!(result.blackboxed().is_empty());
    assert_eq!(result.text().matches("(* blackbox *)").count(), 1);
    for name in result.preserved() {
        assert!(!result.prepared.model.get(name).unwrap().is_blackboxed, "{name}");
    }
    assert!(result.prepared.model.get("A").unwrap().marked_in_input);
}

#[test]
fn missing_boundary_is_fatal() {
    let err = prepare_design(HIERARCHY, "Tile", &[]).err().unwrap();
    match err {
        FlowError::Boundary(e @ BoundaryError::BoundaryNotFound { .. }) => {
            assert_eq!(e.code().to_string(), "B301");
            assert!(e.to_string().contains("`Tile`"));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn whitebox_outside_the_subtree_is_fatal() {
    let src = format!("{HIERARCHY}\nmodule Other; endmodule\n");
    for bad in ["Other", "Top", "Missing"] {
        let err = prepare_design(&src, "Top", &["B", bad]).err().unwrap();
        match err {
            FlowError::Boundary(e @ BoundaryError::UnknownWhiteboxTarget { .. }) => {
                assert_eq!(e.code().to_string(), "B302");
                assert!(e.to_string().contains(&format!("`{bad}`")), "{e}");
            }
            other => panic!("unexpected error for {bad}: {other}"),
        }
    }
}

#[test]
fn cyclic_hierarchy_is_fatal() {
    let src = r#"
module Top; A a (); endmodule
module A; B b (); endmodule
module B; A a (); endmodule
"#;
    let err = prepare_design(src, "Top", &[]).err().unwrap();
    match err {
        FlowError::Boundary(e @ BoundaryError::CyclicDependency { .. }) => {
            assert_eq!(e.code().to_string(), "B303");
            assert_eq!(e.to_string(), "cyclic instantiation among modules `A`, `B`");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn boundary_leaf_has_empty_partition() {
    let result = prepare_design(HIERARCHY, "C", &[]).unwrap();
    let p = result.prepared.partition.as_ref().unwrap();
    assert!(p.under_boundary.is_empty());
    assert!(!result.text().contains("(* blackbox *)"));
}
