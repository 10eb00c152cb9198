//! Block diagram layout for a module interface
//!
//! The diagram is an optional parameter box stacked above a port box.
//! Inputs hang off the left edge of the port box, outputs and inouts off the
//! right edge. All coordinates are in SVG user units.

use crate::render::escape_html;
use crate::{ModuleSignature, Port, PortDirection};

/// Horizontal space taken by one character of label text.
pub const CHAR_WIDTH: usize = 10;
/// Vertical distance between two pins.
pub const ROW_PITCH: usize = 20;
/// Extra space above and below the rows of a box.
pub const BOX_PADDING: usize = 10;
/// Gap between the parameter box and the port box.
pub const BOX_GAP: usize = 10;
/// Length of the stub line drawn outside a box for each pin.
pub const STUB_LENGTH: usize = 10;
/// Thickness of the black box outline.
pub const BORDER: usize = 2;
pub const FONT_SIZE: usize = 18;

const PARAMETER_FILL: &str = "#bdecb6";
const PORT_FILL: &str = "#fdfd96";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoxGeometry {
    pub x: usize,
    pub y: usize,
    pub width: usize,
    pub height: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Left,
    Right,
}

/// Connector glyph drawn just inside the box edge for a port.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Glyph {
    /// Only the stub line, used for inputs and parameters.
    Stub,
    /// Triangular arrow pointing out of the box.
    Arrow,
    /// Diamond-like double arrow.
    Diamond,
}

impl Glyph {
    fn for_direction(direction: PortDirection) -> Self {
        match direction {
            PortDirection::Input => Glyph::Stub,
            PortDirection::Output => Glyph::Arrow,
            PortDirection::Inout => Glyph::Diamond,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pin {
    pub name: String,
    /// Type text drawn outside the box; empty for parameters.
    pub type_text: String,
    pub side: Side,
    pub glyph: Glyph,
    /// Baseline of the label text.
    pub text_y: usize,
}

impl Pin {
    /// Vertical position of the stub line, centred on the label.
    pub fn line_y(&self) -> usize {
        self.text_y - 5
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiagramLayout {
    pub width: usize,
    pub height: usize,
    /// Room left on both sides of the boxes for type labels.
    pub margin: usize,
    pub parameter_box: Option<BoxGeometry>,
    pub port_box: BoxGeometry,
    pub parameter_pins: Vec<Pin>,
    pub port_pins: Vec<Pin>,
}

impl DiagramLayout {
    /// Lay out the diagram for `signature`. Returns `None` when the module
    /// has no ports, in which case nothing is drawn.
    pub fn new(signature: &ModuleSignature) -> Option<Self> {
        if signature.ports.is_empty() {
            return None;
        }

        let left: Vec<_> = signature.left_ports().collect();
        let right: Vec<_> = signature.right_ports().collect();

        let char_len = |text: &String| text.chars().count();
        let param_name = longest(signature.parameters.iter().map(|p| char_len(&p.name)));
        let left_name = longest(left.iter().map(|p| char_len(&p.name)));
        let right_name = longest(right.iter().map(|p| char_len(&p.name)));
        let box_width = 30 + CHAR_WIDTH * param_name.max(left_name + right_name);

        let type_text = longest(
            signature
                .parameters
                .iter()
                .map(|p| char_len(&p.param_type))
                .chain(signature.ports.iter().map(|p| char_len(&p.port_type))),
        );
        let margin = CHAR_WIDTH * type_text + 10;

        let parameter_box = (!signature.parameters.is_empty()).then(|| BoxGeometry {
            x: margin,
            y: 0,
            width: box_width,
            height: signature.parameters.len() * ROW_PITCH + BOX_PADDING,
        });
        let port_top = parameter_box.map_or(0, |b| b.height + BOX_GAP);
        let port_box = BoxGeometry {
            x: margin,
            y: port_top,
            width: box_width,
            height: BOX_PADDING + ROW_PITCH * left.len().max(right.len()),
        };

        let parameter_pins = signature
            .parameters
            .iter()
            .enumerate()
            .map(|(i, param)| Pin {
                name: param.name.clone(),
                type_text: String::new(),
                side: Side::Left,
                glyph: Glyph::Stub,
                text_y: (i + 1) * ROW_PITCH,
            })
            .collect();

        let pins_for = |ports: &[&Port], side: Side| -> Vec<Pin> {
            ports
                .iter()
                .enumerate()
                .map(|(i, port)| Pin {
                    name: port.name.clone(),
                    type_text: port.port_type.clone(),
                    side,
                    glyph: Glyph::for_direction(port.direction),
                    text_y: port_top + (i + 1) * ROW_PITCH,
                })
                .collect()
        };
        let mut port_pins = pins_for(&left, Side::Left);
        port_pins.extend(pins_for(&right, Side::Right));

        log::debug!(
            "diagram for {}: box {}x{}, margin {}",
            signature.name,
            box_width,
            port_box.height,
            margin
        );

        Some(DiagramLayout {
            width: box_width + margin * 2,
            height: port_box.y + port_box.height,
            margin,
            parameter_box,
            port_box,
            parameter_pins,
            port_pins,
        })
    }

    pub fn to_svg(&self) -> String {
        let mut svg = format!(
            "<svg xmlns=\"http://www.w3.org/2000/svg\" version=\"1.1\" viewBox=\"0 0 {} {}\">\n",
            self.width, self.height
        );

        if let Some(geometry) = self.parameter_box {
            push_box(&mut svg, geometry, PARAMETER_FILL);
            for pin in &self.parameter_pins {
                push_line(&mut svg, self.margin - STUB_LENGTH, self.margin, pin.line_y());
                push_text(&mut svg, self.margin + 5, pin.text_y, None, &pin.name);
            }
        }

        push_box(&mut svg, self.port_box, PORT_FILL);
        let right_edge = self.port_box.x + self.port_box.width;
        for pin in &self.port_pins {
            match pin.side {
                Side::Left => {
                    push_line(&mut svg, self.margin - STUB_LENGTH, self.margin, pin.line_y());
                    push_text(&mut svg, self.margin + 20, pin.text_y, None, &pin.name);
                    push_text(&mut svg, self.margin - 15, pin.text_y, Some("end"), &pin.type_text);
                }
                Side::Right => {
                    push_line(&mut svg, right_edge, right_edge + STUB_LENGTH, pin.line_y());
                    if let Some(points) = glyph_points(pin.glyph, right_edge - BORDER, pin.line_y()) {
                        svg.push_str(&format!(
                            "\t<polyline points=\"{}\" style=\"fill:none; stroke:black; stroke-width:2\"></polyline>\n",
                            points
                        ));
                    }
                    push_text(&mut svg, right_edge - 22, pin.text_y, Some("end"), &pin.name);
                    push_text(&mut svg, right_edge + 15, pin.text_y, None, &pin.type_text);
                }
            }
        }

        svg.push_str("</svg>\n");
        svg
    }
}

/// SVG block diagram of `signature`, or an empty string when it has no ports.
pub fn render_svg(signature: &ModuleSignature) -> String {
    DiagramLayout::new(signature)
        .map(|layout| layout.to_svg())
        .unwrap_or_default()
}

fn longest(lengths: impl Iterator<Item = usize>) -> usize {
    lengths.max().unwrap_or(0)
}

/// Polyline points of a glyph whose tip sits at (`tip_x`, `y`).
fn glyph_points(glyph: Glyph, tip_x: usize, y: usize) -> Option<String> {
    let offsets: &[(usize, isize)] = match glyph {
        Glyph::Stub => return None,
        Glyph::Arrow => &[(0, 0), (5, -5), (15, -5), (15, 5), (5, 5), (0, 0)],
        Glyph::Diamond => &[(0, 0), (5, -5), (10, -5), (15, 0), (10, 5), (5, 5), (0, 0)],
    };
    let points: Vec<String> = offsets
        .iter()
        .map(|(dx, dy)| format!("{},{}", tip_x - dx, y as isize + dy))
        .collect();
    Some(points.join(" "))
}

fn push_box(svg: &mut String, geometry: BoxGeometry, fill: &str) {
    svg.push_str(&format!(
        "\t<rect x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\" fill=\"black\"></rect>\n",
        geometry.x, geometry.y, geometry.width, geometry.height
    ));
    svg.push_str(&format!(
        "\t<rect x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\" fill=\"{}\"></rect>\n",
        geometry.x + BORDER,
        geometry.y + BORDER,
        geometry.width - 2 * BORDER,
        geometry.height - 2 * BORDER,
        fill
    ));
}

fn push_line(svg: &mut String, x1: usize, x2: usize, y: usize) {
    svg.push_str(&format!(
        "\t<line x1=\"{}\" y1=\"{}\" x2=\"{}\" y2=\"{}\" stroke=\"black\" stroke-width=\"2\"></line>\n",
        x1, y, x2, y
    ));
}

fn push_text(svg: &mut String, x: usize, y: usize, anchor: Option<&str>, text: &str) {
    let anchor = anchor
        .map(|a| format!(" text-anchor=\"{}\"", a))
        .unwrap_or_default();
    svg.push_str(&format!(
        "\t<text x=\"{}\" y=\"{}\"{} font-size=\"{}\">{}</text>\n",
        x,
        y,
        anchor,
        FONT_SIZE,
        escape_html(text)
    ));
}
