use super::{connection_width, join_connections, longest};
use crate::{ModuleSignature, Parameter};

/// Instantiation snippet for `signature`, or an empty string when there is
/// no module or it has no ports.
///
/// ```text
///     adder # (
///         .WIDTH  (8  )   // bit width
///     ) u_adder (
///         .a      (a      ),  // input, (wire) [WIDTH-1:0], operand a
///         .sum    (sum    )   // output, (wire) [WIDTH-1:0],
///     );
/// ```
pub fn render_instantiation(signature: &ModuleSignature, instance_prefix: &str) -> String {
    if signature.is_empty() || signature.ports.is_empty() {
        return String::new();
    }

    let mut inst = format!("    {}", signature.name);

    if !signature.parameters.is_empty() {
        let rows: Vec<(&Parameter, &str)> = signature
            .parameters
            .iter()
            .map(|p| (p, parameter_value(p)))
            .collect();
        let name_width = connection_width(longest(rows.iter().map(|(p, _)| p.name.as_str())));
        let value_width = (longest(rows.iter().map(|(_, v)| *v)) / 4) * 4 + 3;

        inst.push_str(" # (\n");
        inst.push_str(&join_connections(&rows, " ", |(param, value), separator| {
            format!(
                "        .{:<nw$}({:<vw$}){}  // {}\n",
                param.name,
                value,
                separator,
                param.description,
                nw = name_width,
                vw = value_width
            )
        }));
        inst.push_str("    )");
    }

    inst.push_str(&format!(" {}{} (\n", instance_prefix, signature.name));

    let name_width = connection_width(longest(signature.ports.iter().map(|p| p.name.as_str())));
    inst.push_str(&join_connections(&signature.ports, " ", |port, separator| {
        format!(
            "        .{:<w$}({:<w$}){}  // {}, {}, {}\n",
            port.name,
            port.name,
            separator,
            port.direction,
            port.port_type,
            port.description,
            w = name_width
        )
    }));
    inst.push_str("    );\n");
    inst
}

/// A parameter without a default is connected to a signal of the same name.
fn parameter_value(param: &Parameter) -> &str {
    param.value.as_deref().unwrap_or(&param.name)
}
