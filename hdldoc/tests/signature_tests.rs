//! Signature extraction: module name, parameter list, port list and
//! end-of-line descriptions.

pub mod common;

use common::TestHarness;
use hdldoc::{HdlDocParser, PortDirection};

module_shape_tests! {
    test_adder_shape => ("modules/adder.v", "adder", 1, 3),
    test_fifo_shape => ("modules/fifo.v", "sync_fifo", 4, 9),
    test_counter_shape => ("modules/counter.v", "counter", 0, 3),
    test_uart_shape => ("docs/uart_tx.v", "uart_tx", 1, 5),
}

fn extract(source: &str) -> hdldoc::ModuleSignature {
    HdlDocParser::new().parse_content(source).signature
}

#[test]
fn test_adder_signature() {
    let signature = TestHarness::default().signature("modules/adder.v");

    assert_eq!(signature.name, "adder");

    assert_eq!(signature.parameters.len(), 1);
    let width = &signature.parameters[0];
    assert_eq!(width.name, "WIDTH");
    assert_eq!(width.value.as_deref(), Some("8"));
    assert_eq!(width.description, "bit width");

    let ports: Vec<_> = signature
        .ports
        .iter()
        .map(|p| (p.name.as_str(), p.direction, p.description.as_str()))
        .collect();
    assert_eq!(
        ports,
        vec![
            ("a", PortDirection::Input, "operand a"),
            ("b", PortDirection::Input, "operand b"),
            ("sum", PortDirection::Output, ""),
        ]
    );
    assert!(signature
        .ports
        .iter()
        .all(|p| p.port_type == "(wire) [WIDTH-1:0]"));
}

#[test]
fn test_parameter_types_and_values() {
    let signature = TestHarness::default().signature("modules/fifo.v");

    let params: Vec<_> = signature
        .parameters
        .iter()
        .map(|p| (p.name.as_str(), p.param_type.as_str(), p.value.as_deref()))
        .collect();
    assert_eq!(
        params,
        vec![
            ("DATA_WIDTH", "integer", Some("32")),
            ("DEPTH", "", Some("16")),
            ("ADDR_WIDTH", "", Some("$clog2(DEPTH)")),
            ("OFFSET", "signed [7:0]", Some("-8'sd1")),
        ]
    );

    assert_eq!(signature.parameters[0].description, "width of a data word");
    assert_eq!(signature.parameters[1].description, "number of entries");
    assert_eq!(signature.parameters[2].description, "");
}

#[test]
fn test_port_types_and_continuations() {
    let signature = TestHarness::default().signature("modules/fifo.v");

    let ports: Vec<_> = signature
        .ports
        .iter()
        .map(|p| (p.name.as_str(), p.direction, p.port_type.as_str()))
        .collect();
    assert_eq!(
        ports,
        vec![
            ("clk", PortDirection::Input, "wire"),
            ("rst_n", PortDirection::Input, "wire"),
            ("wr_data", PortDirection::Input, "wire [DATA_WIDTH-1:0]"),
            ("wr_en", PortDirection::Input, "wire"),
            ("rd_en", PortDirection::Input, "wire"),
            ("rd_data", PortDirection::Output, "reg [DATA_WIDTH-1:0]"),
            ("full", PortDirection::Output, "wire"),
            ("empty", PortDirection::Output, "wire"),
            ("gpio", PortDirection::Inout, "tri [3:0]"),
        ]
    );

    let gpio = signature.port("gpio").unwrap();
    assert_eq!(gpio.description, "debug pins");
    assert_eq!(gpio.range(), Some("[3:0]"));
    assert_eq!(signature.port("full").unwrap().description, "FIFO is full");
    assert_eq!(signature.port("empty").unwrap().description, "");
}

#[test]
fn test_comments_and_attributes_are_ignored() {
    let signature = TestHarness::default().signature("modules/counter.v");

    // the header inside the block comment is not the module
    assert_eq!(signature.name, "counter");
    let names: Vec<_> = signature.ports.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, vec!["clk", "rst", "count"]);

    let count = signature.port("count").unwrap();
    assert_eq!(count.direction, PortDirection::Output);
    assert_eq!(count.port_type, "reg [3:0]");
    assert_eq!(count.description, "current count");
    assert_eq!(signature.port("clk").unwrap().port_type, "(wire)");
}

#[test]
fn test_no_module_yields_empty_signature() {
    let signature = TestHarness::default().signature("modules/no_module.v");
    assert!(signature.is_empty());
    assert!(signature.parameters.is_empty());
    assert!(signature.ports.is_empty());

    assert!(extract("").is_empty());
    assert!(extract("// module commented_out (input a);\n").is_empty());
}

#[test]
fn test_module_without_port_list() {
    let signature = extract("module top;\nendmodule\n");
    assert_eq!(signature.name, "top");
    assert!(signature.parameters.is_empty());
    assert!(signature.ports.is_empty());
}

#[test]
fn test_first_module_wins() {
    let source = "module first (input a);\nendmodule\nmodule second (output b);\nendmodule\n";
    let signature = extract(source);
    assert_eq!(signature.name, "first");
    assert_eq!(signature.ports.len(), 1);
    assert_eq!(signature.ports[0].name, "a");
}

#[test]
fn test_declaration_order_is_preserved() {
    let source = r#"
module order #(parameter P3 = 3, parameter P1 = 1, parameter P2 = 2) (
    output z,
    input y,
    inout x,
    input w
);
endmodule
"#;
    let signature = extract(source);

    let params: Vec<_> = signature.parameters.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(params, vec!["P3", "P1", "P2"]);

    let ports: Vec<_> = signature.ports.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(ports, vec!["z", "y", "x", "w"]);

    let left: Vec<_> = signature.left_ports().map(|p| p.name.as_str()).collect();
    let right: Vec<_> = signature.right_ports().map(|p| p.name.as_str()).collect();
    assert_eq!(left, vec!["y", "w"]);
    assert_eq!(right, vec!["z", "x"]);
}

#[test]
fn test_parameter_without_default() {
    let signature = extract("module m #(parameter N) (input a);\nendmodule\n");
    assert_eq!(signature.parameters.len(), 1);
    assert_eq!(signature.parameters[0].name, "N");
    assert_eq!(signature.parameters[0].value, None);
}

#[test]
fn test_port_default_value() {
    let signature = extract("module m (output reg done = 1'b0);\nendmodule\n");
    let done = signature.port("done").unwrap();
    assert_eq!(done.port_type, "reg");
    assert_eq!(done.value.as_deref(), Some("1'b0"));
}

#[test]
fn test_parameter_list_without_keyword_continuation() {
    let signature = extract("module m #(parameter integer A = 1, B = 2) (input a);\nendmodule\n");
    let params: Vec<_> = signature
        .parameters
        .iter()
        .map(|p| (p.name.as_str(), p.param_type.as_str()))
        .collect();
    assert_eq!(params, vec![("A", "integer"), ("B", "integer")]);
}

#[test]
fn test_description_lookup_is_name_based() {
    // `en` has no comment of its own; the function argument line matches
    // the same keyword and name, so its comment is picked up
    let source = r#"
module m (
    input clk, // clock
    input en
);
    function f;
        input en; // function argument
    endfunction
endmodule
"#;
    let signature = extract(source);
    assert_eq!(signature.port("clk").unwrap().description, "clock");
    assert_eq!(signature.port("en").unwrap().description, "function argument");
}

#[test]
fn test_extraction_is_idempotent() {
    let harness = TestHarness::default();
    for relative in ["modules/adder.v", "modules/fifo.v", "docs/uart_tx.v"] {
        let first = harness.extract_fixture(relative);
        let second = harness.extract_fixture(relative);
        assert_eq!(first, second, "{} changed between runs", relative);
        assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap()
        );
    }
}
