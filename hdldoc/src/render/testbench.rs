use minijinja::context;

use super::{connection_width, join_connections, longest, Template};
use crate::signature::collapse_whitespace;
use crate::{HdlDocError, ModuleSignature, Port, PortDirection};

/// Render `template` with the module name, the `uut` block and the
/// parameter and port lists. Returns an empty string when there is no
/// module or it has no ports.
pub fn render_testbench(
    signature: &ModuleSignature,
    template: &Template,
) -> Result<String, HdlDocError> {
    if signature.is_empty() || signature.ports.is_empty() {
        return Ok(String::new());
    }

    template.render(context! {
        module_name => signature.name,
        uut => render_uut(signature),
        parameters => signature.parameters,
        hasParameters => !signature.parameters.is_empty(),
        ports => signature.ports,
        hasPorts => true,
    })
}

/// Signal declarations for every parameter and port plus an instance named
/// `uut` wired to them.
pub fn render_uut(signature: &ModuleSignature) -> String {
    let mut uut = String::new();

    if !signature.parameters.is_empty() {
        let longest_name = longest(signature.parameters.iter().map(|p| p.name.as_str()));
        let name_width = ((longest_name + 2) / 4) * 4 + 2;
        let value_width = longest(
            signature
                .parameters
                .iter()
                .map(|p| p.value.as_deref().unwrap_or("")),
        );

        uut.push_str("    // parameters\n");
        for param in &signature.parameters {
            uut.push_str(&format!(
                "    parameter {:<nw$}= {:<vw$};  // {}\n",
                param.name,
                param.value.as_deref().unwrap_or(""),
                param.description,
                nw = name_width,
                vw = value_width
            ));
        }
    }

    let ranges: Vec<String> = signature.ports.iter().map(declared_range).collect();
    let range_width = ((longest(ranges.iter().map(String::as_str)) + 1) / 4) * 4 + 2;
    let name_width = longest(signature.ports.iter().map(|p| p.name.as_str()));

    uut.push_str("    // ports\n");
    for (port, range) in signature.ports.iter().zip(&ranges) {
        let kind = match port.direction {
            PortDirection::Input => "reg ",
            PortDirection::Output | PortDirection::Inout => "wire",
        };
        uut.push_str(&format!(
            "    {} {:>rw$} {:<nw$};  // {}\n",
            kind,
            range,
            port.name,
            port.description,
            rw = range_width,
            nw = name_width
        ));
    }

    uut.push_str("    // module\n");
    uut.push_str(&format!("    {}", signature.name));
    if !signature.parameters.is_empty() {
        let width =
            connection_width(longest(signature.parameters.iter().map(|p| p.name.as_str())));
        uut.push_str(" # (\n");
        uut.push_str(&join_connections(&signature.parameters, "", |param, separator| {
            format!("        .{:<w$}({:<w$}){}\n", param.name, param.name, separator, w = width)
        }));
        uut.push_str("    )");
    }
    uut.push_str(" uut (\n");

    let width = connection_width(longest(signature.ports.iter().map(|p| p.name.as_str())));
    uut.push_str(&join_connections(&signature.ports, "", |port, separator| {
        format!("        .{:<w$}({:<w$}){}\n", port.name, port.name, separator, w = width)
    }));
    uut.push_str("    );");
    uut
}

/// `[msb:lsb]` part of the port type with whitespace collapsed, or empty.
fn declared_range(port: &Port) -> String {
    port.range()
        .filter(|range| range.contains(':'))
        .map(collapse_whitespace)
        .unwrap_or_default()
}
