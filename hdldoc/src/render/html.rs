//! HTML documentation pages

use minijinja::context;

use super::Template;
use crate::annotation::{
    header_title, list_item_body, AnnotationDocument, ColumnAlign, SegmentKind, Table,
};
use crate::diagram::render_svg;
use crate::{Config, ExtractedSource, HdlDocError, Parameter, Port};

/// Render the documentation comments of a module as an HTML fragment.
pub fn render_notes(document: &AnnotationDocument) -> String {
    let mut html = String::new();

    for segment in &document.segments {
        let indent = html_indent(segment.indent);
        let padding = if indent > 0 {
            format!(" style=\"padding-left:{}rem\"", indent)
        } else {
            String::new()
        };

        match &segment.kind {
            SegmentKind::WaveDiagram(diagram) => {
                if indent > 0 {
                    html.push_str(&format!("<div style=\"padding: 0 0 50px {}rem\">\n", indent));
                } else {
                    html.push_str("<div style=\"padding: 0 0 50px\">\n");
                }
                html.push_str("\t<script type=\"WaveDrom\">\n");
                // "</" inside a script element would end it early
                html.push_str(&format!("\t\t{}\n", diagram.to_json().replace("</", "<\\/")));
                html.push_str("\t</script>\n</div>\n");
            }
            SegmentKind::Table(table) => {
                html.push_str(&format!("<div{}>\n", padding));
                write_notes_table(&mut html, table);
                html.push_str("</div>\n");
            }
            SegmentKind::Header(text) => {
                let title = escape_html(header_title(text));
                html.push_str(&format!("<h3{}>{}</h3>\n", padding, title));
            }
            SegmentKind::ListItem(text) => {
                let body = escape_html(list_item_body(text));
                html.push_str(&format!("<li{}>{}</li>\n", padding, body));
            }
            SegmentKind::PlainText(text) => {
                html.push_str(&format!("<p{}>{}</p>\n", padding, escape_html(text)));
            }
        }
    }

    html
}

/// Doc indentation to `rem` of left padding.
fn html_indent(indent: usize) -> usize {
    indent.saturating_sub(1) / 2
}

fn write_notes_table(html: &mut String, table: &Table) {
    html.push_str("<table>\n\t<thead>\n\t\t<tr>\n");
    for cell in &table.thead {
        html.push_str(&format!("\t\t\t<th>{}</th>\n", escape_html(cell)));
    }
    html.push_str("\t\t</tr>\n\t</thead>\n\t<tbody>\n");
    for row in &table.tbody {
        html.push_str("\t\t<tr>\n");
        for (align, cell) in table.align.iter().zip(row) {
            match align {
                ColumnAlign::Left => {
                    html.push_str(&format!("\t\t\t<td>{}</td>\n", escape_html(cell)));
                }
                ColumnAlign::Center | ColumnAlign::Right => {
                    html.push_str(&format!(
                        "\t\t\t<td style=\"text-align: {}\">{}</td>\n",
                        align.as_str(),
                        escape_html(cell)
                    ));
                }
            }
        }
        html.push_str("\t\t</tr>\n");
    }
    html.push_str("\t</tbody>\n</table>\n");
}

pub fn render_parameter_table(parameters: &[Parameter]) -> String {
    let rows: Vec<[&str; 4]> = parameters
        .iter()
        .map(|p| {
            [
                p.name.as_str(),
                p.param_type.as_str(),
                p.value.as_deref().unwrap_or(""),
                p.description.as_str(),
            ]
        })
        .collect();
    interface_table(["Name", "Type", "Default", "Description"], &rows)
}

pub fn render_port_table(ports: &[Port]) -> String {
    let rows: Vec<[&str; 4]> = ports
        .iter()
        .map(|p| {
            [
                p.name.as_str(),
                p.direction.as_str(),
                p.port_type.as_str(),
                p.description.as_str(),
            ]
        })
        .collect();
    interface_table(["Name", "Direction", "Type", "Description"], &rows)
}

fn interface_table(header: [&str; 4], rows: &[[&str; 4]]) -> String {
    if rows.is_empty() {
        return String::new();
    }

    let mut html = String::from("<table>\n\t<thead>\n\t\t<tr>\n");
    for title in header {
        html.push_str(&format!("\t\t\t<th>{}</th>\n", title));
    }
    html.push_str("\t\t</tr>\n\t</thead>\n\t<tbody>\n");
    for row in rows {
        html.push_str("\t\t<tr>\n");
        for cell in row {
            html.push_str(&format!("\t\t\t<td>{}</td>\n", escape_html(cell)));
        }
        html.push_str("\t\t</tr>\n");
    }
    html.push_str("\t</tbody>\n</table>\n");
    html
}

/// WaveDrom script tags, only needed when the notes contain a wave diagram.
fn wavedrom_scripts(document: &AnnotationDocument, config: &Config) -> String {
    if !document.has_wave_diagram {
        return String::new();
    }

    let mut html = String::new();
    for src in &config.wavedrom_scripts {
        html.push_str(&format!("<script src=\"{}\"></script>\n", escape_html(src)));
    }
    html.push_str("<script>WaveDrom.ProcessAll();</script>\n");
    html
}

/// Full documentation page for an extracted source file.
///
/// Besides the pre-rendered HTML fragments, the template sees the raw
/// `parameters` and `ports` lists and the `hasParameters`, `hasPorts` and
/// `hasWavedrom` flags.
pub fn render_page(
    source: &ExtractedSource,
    template: &Template,
    config: &Config,
) -> Result<String, HdlDocError> {
    let signature = &source.signature;
    let notes = &source.annotations;

    template.render(context! {
        module_name => escape_html(&signature.name),
        module_diagram => render_svg(signature),
        parameters => signature.parameters,
        hasParameters => !signature.parameters.is_empty(),
        parameters_html => render_parameter_table(&signature.parameters),
        ports => signature.ports,
        hasPorts => !signature.ports.is_empty(),
        ports_html => render_port_table(&signature.ports),
        notes_html => render_notes(notes),
        hasWavedrom => notes.has_wave_diagram,
        wavedrom_scripts => config.wavedrom_scripts,
        wavedrom_html => wavedrom_scripts(notes, config),
    })
}

/// Escape text for HTML and SVG content and attribute values.
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
