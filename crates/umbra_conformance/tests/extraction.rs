//! Structural extraction over realistic and malformed design text: the
//! model is always produced, malformed elements are skipped with a warning,
//! and the scan never panics.

use umbra_conformance::{codes, extract_design, stub_design};
use umbra_model::ActualWidth;

#[test]
fn ansi_and_non_ansi_modules_side_by_side() {
    let src = r#"
module core (
    input  wire        clock,
    input  wire        reset,
    output wire [31:0] pc
);
    regfile rf (.clock(clock), .raddr(pc[4:0]));
endmodule

module regfile (clock, raddr, rdata);
    input clock;
    input [4:0] raddr;
    output [63:0] rdata;
endmodule
"#;
    let extraction = extract_design(src);
    assert!(extraction.diagnostics.is_empty(), "{:?}", extraction.diagnostics);

    let core = extraction.model.get("core").unwrap();
    assert_eq!(core.ports.len(), 3);
    assert_eq!(core.port("pc").unwrap().width, 32);
    let rf = &core.instantiations[0];
    assert_eq!(rf.target_module, "regfile");
    assert_eq!(rf.connections[1].width, ActualWidth::Resolved(5));

    let regfile = extraction.model.get("regfile").unwrap();
    let widths: Vec<_> = regfile.ports.iter().map(|p| p.width).collect();
    assert_eq!(widths, vec![1, 5, 64]);
    assert!(extraction.model.dangling_references().is_empty());
}

#[test]
fn bad_header_then_good_module_recovers() {
    let src = r#"
module broken (input a;
endmodule

module good (input a, output y);
    assign y = a;
endmodule
"#;
    let extraction = extract_design(src);
    assert_eq!(codes(&extraction.diagnostics), vec!["P101"]);
    assert!(extraction.model.get("broken").is_none());
    assert!(extraction.model.get("good").is_some());
}

#[test]
fn unbalanced_instantiation_skips_only_that_statement() {
    let src = r#"
module top (input x, input y);
    leaf u0 (.a(x);
    leaf u1 (.a(y));
endmodule
"#;
    let extraction = extract_design(src);
    assert_eq!(codes(&extraction.diagnostics), vec!["P102"]);
    let top = extraction.model.get("top").unwrap();
    assert_eq!(top.instantiations.len(), 1);
    assert_eq!(top.instantiations[0].instance_name, "u1");
}

#[test]
fn missing_endmodule_drops_the_module_and_continues() {
    let src = "module a; leaf u (); \nmodule b; endmodule\n";
    let extraction = extract_design(src);
    assert_eq!(codes(&extraction.diagnostics), vec!["P103"]);
    assert!(extraction.model.get("a").is_none());
    assert!(extraction.model.get("b").is_some());
}

#[test]
fn duplicate_declaration_keeps_the_first() {
    let src = "module a (input x); endmodule\nmodule a (input [3:0] y); endmodule\n";
    let extraction = extract_design(src);
    assert_eq!(codes(&extraction.diagnostics), vec!["P104"]);
    let a = extraction.model.get("a").unwrap();
    assert_eq!(a.ports.len(), 1);
    assert_eq!(a.ports[0].name, "x");
}

#[test]
fn undeclared_direction_defaults_to_input() {
    let src = "module m (a, b);\n  output a;\nendmodule\n";
    let extraction = extract_design(src);
    assert_eq!(codes(&extraction.diagnostics), vec!["P105"]);
    let m = extraction.model.get("m").unwrap();
    assert_eq!(m.port("b").unwrap().direction.keyword(), Some("input"));
    assert_eq!(m.port("a").unwrap().direction.keyword(), Some("output"));
}

#[test]
fn several_problems_are_all_reported() {
    let src = r#"
module one (input a;
endmodule
module two;
    leaf u0 (.a(b);
endmodule
module two; endmodule
module three;
"#;
    let extraction = extract_design(src);
    assert_eq!(
        codes(&extraction.diagnostics),
        vec!["P101", "P102", "P104", "P103"]
    );
    assert_eq!(extraction.model.len(), 1);
}

#[test]
fn preprocessor_and_behavioral_code_is_stepped_over() {
    let src = r#"
`timescale 1ns/1ps
`define WIDTH 8
module counter (input clk, output reg [7:0] q);
    always @(posedge clk) begin
        if (q == 8'hFF) q <= 0;
        else q <= q + 1;
    end
    function [7:0] inc;
        input [7:0] v;
        inc = v + 1;
    endfunction
    sub #(.W(`WIDTH)) s (.d(q), .clk(clk));
endmodule
"#;
    let extraction = extract_design(src);
    assert!(extraction.diagnostics.is_empty(), "{:?}", extraction.diagnostics);
    let counter = extraction.model.get("counter").unwrap();
    assert_eq!(counter.instantiations.len(), 1);
    assert_eq!(counter.instantiations[0].target_module, "sub");
    assert_eq!(counter.instantiations[0].connections[0].width, ActualWidth::Resolved(8));
    assert_eq!(extraction.model.dangling_references(), vec!["sub"]);
}

#[test]
fn garbage_never_panics() {
    let inputs = [
        "",
        "module",
        "module (",
        "endmodule endmodule",
        "(* blackbox",
        "module m(* x *)",
        "module m; a b (",
        "module m; a #(",
        "module m; a b (.c(d)), ",
        "\"unterminated",
        "/* unterminated",
        "\\",
        "module m; `",
        "primitive p; table",
        "module m; x [",
        "module m (input [7:0 a); endmodule",
        "module m; a b [3:0] (.c({4{d}})); endmodule",
        "module m; (* keep",
        "module m; always @(* ) x = y; endmodule",
        "module m; a b (.c(d[4294967295:0])); endmodule",
        "module m(input [4294967295:4294967295] a); endmodule",
    ];
    for src in inputs {
        let extraction = extract_design(src);
        assert!(extraction.model.len() <= 1, "{src:?}");
    }
}

#[test]
fn malformed_attributes_do_not_swallow_later_modules() {
    let src = r#"
(* keep
module first (input a, output reg y);
    always @(* ) y = a;
    second u_second (.p(a));
endmodule

module second (input p);
    (* dont_touch
    third u_third (.q(p));
endmodule

module third (input q);
endmodule
"#;
    let extraction = extract_design(src);
    let names: Vec<_> = extraction.model.iter().map(|m| m.name.as_str()).collect();
    assert_eq!(names, vec!["first", "second", "third"]);
    assert!(extraction.model.dangling_references().is_empty());
    assert_eq!(codes(&extraction.diagnostics), vec!["P100", "P100"]);

    let result = stub_design(src);
    assert!(result.prepared.stubs.iter().all(|s| s == "plusarg_reader"));
}
