//! Text generated from an extracted module: instantiation snippets,
//! testbenches and HTML documentation pages.

pub mod html;
pub mod instance;
pub mod template;
pub mod testbench;

pub use html::{escape_html, render_notes, render_page, render_parameter_table, render_port_table};
pub use instance::render_instantiation;
pub use template::{Template, DEFAULT_PAGE_TEMPLATE, DEFAULT_TESTBENCH_TEMPLATE};
pub use testbench::{render_testbench, render_uut};

/// Column width shared by the name columns of instantiation snippets.
pub(crate) fn connection_width(longest: usize) -> usize {
    ((longest + 1) / 4) * 4 + 3
}

pub(crate) fn longest<'a>(texts: impl Iterator<Item = &'a str>) -> usize {
    texts.map(|t| t.chars().count()).max().unwrap_or(0)
}

/// Render `items` one per line, each followed by `,` except the last which
/// gets `last` instead.
pub(crate) fn join_connections<T>(
    items: &[T],
    last: &str,
    mut line: impl FnMut(&T, &str) -> String,
) -> String {
    items
        .iter()
        .enumerate()
        .map(|(i, item)| {
            let separator = if i + 1 == items.len() { last } else { "," };
            line(item, separator)
        })
        .collect()
}
