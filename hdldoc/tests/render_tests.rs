//! Instantiation snippets, testbenches and HTML pages.

pub mod common;

use common::{doc_lines, TestHarness};
use hdldoc::render::{
    render_instantiation, render_notes, render_page, render_parameter_table, render_testbench,
    render_uut, Template, DEFAULT_PAGE_TEMPLATE, DEFAULT_TESTBENCH_TEMPLATE,
};
use hdldoc::{parse_annotations, Config, HdlDocParser};

#[test]
fn test_instantiation_snippet() {
    let signature = TestHarness::default().signature("modules/adder.v");
    let expected = concat!(
        "    adder # (\n",
        "        .WIDTH  (8  )   // bit width\n",
        "    ) u_adder (\n",
        "        .a      (a      ),  // input, (wire) [WIDTH-1:0], operand a\n",
        "        .b      (b      ),  // input, (wire) [WIDTH-1:0], operand b\n",
        "        .sum    (sum    )   // output, (wire) [WIDTH-1:0], \n",
        "    );\n",
    );
    assert_eq!(render_instantiation(&signature, "u_"), expected);
}

#[test]
fn test_instantiation_without_parameters() {
    let signature = HdlDocParser::new()
        .parse_content("module buf1 (input i, output o);\nendmodule\n")
        .signature;
    let expected = concat!(
        "    buf1 inst_buf1 (\n",
        "        .i  (i  ),  // input, (wire), \n",
        "        .o  (o  )   // output, (wire), \n",
        "    );\n",
    );
    assert_eq!(render_instantiation(&signature, "inst_"), expected);
}

#[test]
fn test_parameter_without_default_connects_by_name() {
    let signature = HdlDocParser::new()
        .parse_content("module m #(parameter N) (input a);\nendmodule\n")
        .signature;
    let snippet = render_instantiation(&signature, "u_");
    assert!(snippet.contains("        .N  (N  )   // \n"), "{}", snippet);
}

#[test]
fn test_nothing_to_instantiate() {
    let harness = TestHarness::default();
    assert_eq!(render_instantiation(&harness.signature("modules/no_module.v"), "u_"), "");

    let portless = HdlDocParser::new().parse_content("module top;\nendmodule\n").signature;
    assert_eq!(render_instantiation(&portless, "u_"), "");
}

#[test]
fn test_uut_block() {
    let signature = TestHarness::default().signature("modules/adder.v");
    let expected = concat!(
        "    // parameters\n",
        "    parameter WIDTH = 8;  // bit width\n",
        "    // ports\n",
        "    reg     [WIDTH-1:0] a  ;  // operand a\n",
        "    reg     [WIDTH-1:0] b  ;  // operand b\n",
        "    wire    [WIDTH-1:0] sum;  // \n",
        "    // module\n",
        "    adder # (\n",
        "        .WIDTH  (WIDTH  )\n",
        "    ) uut (\n",
        "        .a      (a      ),\n",
        "        .b      (b      ),\n",
        "        .sum    (sum    )\n",
        "    );",
    );
    assert_eq!(render_uut(&signature), expected);
}

#[test]
fn test_testbench_with_fixture_template() {
    let harness = TestHarness::default();
    let template = Template::load(&harness.fixture_path("templates/testbench.tpl")).unwrap();
    let signature = harness.signature("modules/counter.v");

    let testbench = render_testbench(&signature, &template).unwrap();
    assert!(testbench.starts_with("// testbench for counter\nmodule counter_tb;\n"));
    assert!(testbench.contains("    reg         clk  ;  // clock\n"), "{}", testbench);
    assert!(testbench.contains("    wire  [3:0] count;  // current count\n"), "{}", testbench);
    assert!(testbench.contains("    counter uut (\n"));
    assert!(testbench.ends_with("    );\nendmodule\n"));
}

#[test]
fn test_default_testbench_template() {
    let template = Template::parse(DEFAULT_TESTBENCH_TEMPLATE).unwrap();
    let signature = TestHarness::default().signature("modules/adder.v");

    let testbench = render_testbench(&signature, &template).unwrap();
    assert!(testbench.contains("module tb_adder;"));
    assert!(testbench.contains("$dumpvars(0, tb_adder);"));
    assert!(testbench.contains(&render_uut(&signature)));
    assert!(!testbench.contains("{{"));
}

#[test]
fn test_missing_template_file() {
    let err = Template::load(std::path::Path::new("/nonexistent/hdldoc/tb.tpl")).unwrap_err();
    assert!(matches!(err, hdldoc::HdlDocError::Io { .. }));
}

#[test]
fn test_notes_html() {
    let document = parse_annotations(&doc_lines(&[
        " # Usage",
        " Send <data> & wait",
        "     - nested item",
        " | Field | Bits |",
        " |-------|:----:|",
        " | en    | 0    |",
    ]));
    let html = render_notes(&document);

    assert!(html.contains("<h3>Usage</h3>\n"));
    assert!(html.contains("<p>Send &lt;data&gt; &amp; wait</p>\n"));
    assert!(html.contains("<li style=\"padding-left:2rem\">nested item</li>\n"));
    assert!(html.contains("\t\t\t<th>Field</th>\n"));
    assert!(html.contains("\t\t\t<td>en</td>\n"));
    assert!(html.contains("\t\t\t<td style=\"text-align: center\">0</td>\n"));
}

#[test]
fn test_wave_notes_html() {
    let document = parse_annotations(&doc_lines(&[
        "     <wave>",
        r#"     {"signal": [{"name": "a", "wave": "01"}]}"#,
        "     </wave>",
    ]));
    let html = render_notes(&document);

    assert!(html.starts_with("<div style=\"padding: 0 0 50px 2rem\">\n\t<script type=\"WaveDrom\">\n"));
    assert!(html.contains(r#"{"signal":[{"name":"a","wave":"01"}]}"#));
}

#[test]
fn test_parameter_table_html() {
    let signature = TestHarness::default().signature("modules/fifo.v");
    let html = render_parameter_table(&signature.parameters);
    assert!(html.contains("\t\t\t<th>Default</th>\n"));
    assert!(html.contains("\t\t\t<td>$clog2(DEPTH)</td>\n"));
    assert_eq!(html.matches("\t\t<tr>\n").count(), 1 + 4);

    assert_eq!(render_parameter_table(&[]), "");
}

#[test]
fn test_documentation_page() {
    let source = TestHarness::default().extract_fixture("docs/uart_tx.v");
    let template = Template::parse(DEFAULT_PAGE_TEMPLATE).unwrap();
    let config = Config::default();

    let page = render_page(&source, &template, &config).unwrap();
    assert!(page.contains("<title>uart_tx</title>"));
    assert!(page.contains("<svg xmlns="));
    assert!(page.contains("<td>CLKS_PER_BIT</td>"));
    assert!(page.contains("<td>transmission in progress</td>"));
    assert!(page.contains("<h3>UART transmitter</h3>"));
    assert_eq!(page.matches("<script type=\"WaveDrom\">").count(), 2);
    for src in &config.wavedrom_scripts {
        assert!(page.contains(&format!("<script src=\"{}\"></script>", src)));
    }
    assert!(page.contains("WaveDrom.ProcessAll();"));
}

#[test]
fn test_page_without_waves_has_no_scripts() {
    let source = TestHarness::default().extract_fixture("modules/adder.v");
    let template =
        Template::parse("{{ module_name }}|{{ wavedrom_html }}|{{ notes_html }}").unwrap();

    let page = render_page(&source, &template, &Config::default()).unwrap();
    assert_eq!(page, "adder||");
}

#[test]
fn test_page_template_loops_over_ports() {
    let source = TestHarness::default().extract_fixture("docs/uart_tx.v");
    let template = Template::parse(concat!(
        "{% if hasPorts %}<ul>{% for p in ports %}",
        "<li>{{ p.name }} {{ p.direction }}: {{ p.description }}</li>",
        "{% endfor %}</ul>{% endif %}\n",
        "{% for p in parameters %}{{ p.name }}={{ p.value }}{% endfor %}\n",
        "{% if hasWavedrom %}{% for src in wavedrom_scripts %}[{{ src }}]{% endfor %}{% endif %}",
    ))
    .unwrap();
    let config = Config {
        wavedrom_scripts: vec!["wavedrom.js".to_string()],
        ..Config::default()
    };

    let page = render_page(&source, &template, &config).unwrap();
    let lines: Vec<&str> = page.lines().collect();
    assert!(lines[0].starts_with("<ul><li>clk input: clock</li><li>data input: byte to send</li>"));
    assert!(lines[0].ends_with("<li>busy output: transmission in progress</li></ul>"));
    assert_eq!(lines[1], "CLKS_PER_BIT=87");
    assert_eq!(lines[2], "[wavedrom.js]");
}

#[test]
fn test_wavedrom_condition_without_waves() {
    let source = TestHarness::default().extract_fixture("modules/adder.v");
    let template =
        Template::parse("{% if hasWavedrom %}waves{% else %}no waves{% endif %}").unwrap();

    let page = render_page(&source, &template, &Config::default()).unwrap();
    assert_eq!(page, "no waves");
}

#[test]
fn test_testbench_template_sees_ports() {
    let signature = TestHarness::default().signature("modules/counter.v");
    let template = Template::parse(concat!(
        "{% for p in ports %}{% if p.direction == \"input\" %}",
        "initial {{ p.name }} = 0;\n",
        "{% endif %}{% endfor %}",
        "{% if not hasParameters %}// no parameters\n{% endif %}",
    ))
    .unwrap();

    let testbench = render_testbench(&signature, &template).unwrap();
    assert_eq!(testbench, "initial clk = 0;\ninitial rst = 0;\n// no parameters\n");
}
