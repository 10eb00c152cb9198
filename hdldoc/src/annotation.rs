//! Documentation comment parsing
//!
//! Turns the `//>` comment-line stream into an ordered list of segments:
//! plain text, headers, list items, markdown pipe tables and WaveDrom
//! blocks. Wave blocks are located first; tables are only searched for in
//! the lines between them, and whatever is left is classified line by line.

use serde::Serialize;

use crate::wave::{self, WaveDiagram, WaveFormat, WAVE_TAGS};

/// Column at which the text after the `//>` marker starts.
pub const MARKER_WIDTH: usize = 3;
pub const TAB_WIDTH: usize = 4;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AnnotationDocument {
    pub segments: Vec<AnnotationSegment>,
    pub has_wave_diagram: bool,
}

impl AnnotationDocument {
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn tables(&self) -> impl Iterator<Item = &Table> {
        self.segments.iter().filter_map(|s| match &s.kind {
            SegmentKind::Table(table) => Some(table),
            _ => None,
        })
    }

    pub fn wave_diagrams(&self) -> impl Iterator<Item = &WaveDiagram> {
        self.segments.iter().filter_map(|s| match &s.kind {
            SegmentKind::WaveDiagram(diagram) => Some(diagram),
            _ => None,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnnotationSegment {
    pub indent: usize,
    #[serde(flatten)]
    pub kind: SegmentKind,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum SegmentKind {
    PlainText(String),
    Header(String),
    ListItem(String),
    Table(Table),
    WaveDiagram(WaveDiagram),
}

impl SegmentKind {
    /// Text of a plain, header or list segment as written (markers included).
    pub fn text(&self) -> Option<&str> {
        match self {
            SegmentKind::PlainText(text)
            | SegmentKind::Header(text)
            | SegmentKind::ListItem(text) => Some(text),
            SegmentKind::Table(_) | SegmentKind::WaveDiagram(_) => None,
        }
    }
}

/// Header text without the leading `#`.
pub fn header_title(text: &str) -> &str {
    text.trim_start().trim_start_matches('#').trim()
}

/// List item text without its bullet or ordinal marker.
pub fn list_item_body(text: &str) -> &str {
    let text = text.trim_start();
    let marker_len = list_marker_len(text).unwrap_or(0);
    text[marker_len..].trim()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Table {
    pub thead: Vec<String>,
    pub align: Vec<ColumnAlign>,
    pub tbody: Vec<Vec<String>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnAlign {
    Left,
    Center,
    Right,
}

impl ColumnAlign {
    /// `:---:` is centred, `---:` right aligned, anything else left aligned.
    pub fn from_token(token: &str) -> Self {
        let token = token.trim();
        let dashes = |s: &str| !s.is_empty() && s.chars().all(|c| c == '-');

        if let Some(inner) = token.strip_prefix(':').and_then(|t| t.strip_suffix(':')) {
            if dashes(inner) {
                return ColumnAlign::Center;
            }
        }
        if let Some(inner) = token.strip_suffix(':') {
            if inner.len() >= 2 && dashes(inner) {
                return ColumnAlign::Right;
            }
        }
        ColumnAlign::Left
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ColumnAlign::Left => "left",
            ColumnAlign::Center => "center",
            ColumnAlign::Right => "right",
        }
    }
}

pub fn parse_annotations(lines: &[String]) -> AnnotationDocument {
    let mut builder = DocumentBuilder::default();
    let total = lines.len();
    let mut pos = 0;

    while pos < total {
        match find_wave_block(lines, pos, total) {
            WaveScan::Block(block) => {
                builder.push_range(lines, pos, block.start);
                if let Some(diagram) = wave::parse_payload(block.format, &block.text) {
                    builder.push(block.indent, SegmentKind::WaveDiagram(diagram));
                    builder.document.has_wave_diagram = true;
                }
                pos = block.end + 1;
            }
            WaveScan::Unterminated { start } => {
                log::warn!("dropping unterminated wave block at doc line {}", start + 1);
                builder.push_range(lines, pos, start);
                pos = total;
            }
            WaveScan::NotFound => {
                builder.push_range(lines, pos, total);
                pos = total;
            }
        }
    }

    log::debug!(
        "{} doc line(s) -> {} segment(s)",
        total,
        builder.document.segments.len()
    );
    builder.document
}

#[derive(Default)]
struct DocumentBuilder {
    document: AnnotationDocument,
}

impl DocumentBuilder {
    fn push(&mut self, indent: usize, kind: SegmentKind) {
        self.document.segments.push(AnnotationSegment { indent, kind });
    }

    /// Emit tables and classified lines for `lines[start..stop]`.
    fn push_range(&mut self, lines: &[String], start: usize, stop: usize) {
        let mut cursor = start;
        while let Some(found) = find_table(lines, cursor, stop) {
            self.push_lines(&lines[cursor..found.start]);
            self.push(found.indent, SegmentKind::Table(found.table));
            cursor = found.end + 1;
        }
        self.push_lines(&lines[cursor..stop.max(cursor)]);
    }

    fn push_lines(&mut self, lines: &[String]) {
        for line in lines {
            if let Some(kind) = classify_line(line) {
                self.push(doc_indent(line), kind);
            }
        }
    }
}

/// Classify a line outside tables and wave blocks. Blank lines yield `None`.
pub fn classify_line(line: &str) -> Option<SegmentKind> {
    let text = line.trim();
    if text.is_empty() {
        return None;
    }

    let kind = if is_header(text) {
        SegmentKind::Header(text.to_string())
    } else if list_marker_len(text).is_some() {
        SegmentKind::ListItem(text.to_string())
    } else {
        SegmentKind::PlainText(text.to_string())
    };
    Some(kind)
}

fn is_header(text: &str) -> bool {
    text.strip_prefix('#')
        .and_then(|rest| rest.chars().next())
        .map_or(false, char::is_whitespace)
}

/// Byte length of a `*`, `+`, `-` or `12.` marker followed by whitespace.
fn list_marker_len(text: &str) -> Option<usize> {
    let marker_len = match text.chars().next()? {
        '*' | '+' | '-' => 1,
        c if c.is_ascii_digit() => {
            let digits = text.chars().take_while(char::is_ascii_digit).count();
            if text[digits..].starts_with('.') {
                digits + 1
            } else {
                return None;
            }
        }
        _ => return None,
    };
    text[marker_len..]
        .chars()
        .next()
        .filter(|c| c.is_whitespace())
        .map(|_| marker_len)
}

/// Indentation of a doc line, measured from the end of the `//>` marker.
/// Spaces count one column, tabs advance to the next multiple of 4
/// (columns are counted from the start of the comment).
pub fn doc_indent(line: &str) -> usize {
    let mut column = MARKER_WIDTH;
    for c in line.chars() {
        match c {
            ' ' => column += 1,
            '\t' => column += TAB_WIDTH - column % TAB_WIDTH,
            _ => break,
        }
    }
    column.saturating_sub(MARKER_WIDTH)
}

/// Remove leading whitespace from `line` up to `indent` columns.
fn strip_indent(line: &str, indent: usize) -> &str {
    let mut column = MARKER_WIDTH;
    for (i, c) in line.char_indices() {
        let next = match c {
            ' ' => column + 1,
            '\t' => column + TAB_WIDTH - column % TAB_WIDTH,
            _ => return &line[i..],
        };
        if next - MARKER_WIDTH > indent {
            return &line[i..];
        }
        column = next;
    }
    ""
}

struct WaveBlock {
    start: usize,
    end: usize, // line holding the closing tag
    indent: usize,
    format: WaveFormat,
    text: String,
}

enum WaveScan {
    Block(WaveBlock),
    Unterminated { start: usize },
    NotFound,
}

/// Position, byte length and tag of the earliest opening wave tag in `line`.
fn find_open_tag(line: &str) -> Option<(usize, usize, &'static str, WaveFormat)> {
    WAVE_TAGS
        .iter()
        .filter_map(|(tag, format)| {
            let open = format!("<{}>", tag);
            line.find(&open).map(|at| (at, open.len(), *tag, *format))
        })
        .min_by_key(|(at, ..)| *at)
}

fn find_wave_block(lines: &[String], start: usize, stop: usize) -> WaveScan {
    let Some((first, (at, open_len, tag, format))) = (start..stop)
        .find_map(|i| find_open_tag(&lines[i]).map(|found| (i, found)))
    else {
        return WaveScan::NotFound;
    };

    let close = format!("</{}>", tag);
    let line = &lines[first];
    let indent = doc_indent(line);
    let rest = &line[at + open_len..];

    // Single-line block
    if let Some(end_at) = rest.find(&close) {
        return WaveScan::Block(WaveBlock {
            start: first,
            end: first,
            indent,
            format,
            text: rest[..end_at].to_string(),
        });
    }

    let mut body: Vec<&str> = Vec::new();
    if !rest.trim().is_empty() {
        body.push(rest);
    }
    for (i, line) in lines.iter().enumerate().take(stop).skip(first + 1) {
        if let Some(end_at) = line.find(&close) {
            body.push(strip_indent(&line[..end_at], indent));
            return WaveScan::Block(WaveBlock {
                start: first,
                end: i,
                indent,
                format,
                text: body.join("\n"),
            });
        }
        body.push(strip_indent(line, indent));
    }

    WaveScan::Unterminated { start: first }
}

struct TableMatch {
    start: usize,
    end: usize, // last body row
    indent: usize,
    table: Table,
}

/// Find the first table whose header row lies in `lines[start..stop]` and
/// whose header, alignment and first body row all fit before `stop`.
fn find_table(lines: &[String], start: usize, stop: usize) -> Option<TableMatch> {
    let mut i = start;
    while i + 2 < stop {
        let header = &lines[i];
        let align = &lines[i + 1];
        let first_row = &lines[i + 2];
        let indent = doc_indent(header);

        if !is_table_row(header)
            || !is_alignment_row(align)
            || doc_indent(align) != indent
            || !is_table_row(first_row)
            || doc_indent(first_row) != indent
        {
            i += 1;
            continue;
        }

        let thead = split_cells(header);
        let aligns: Vec<ColumnAlign> = split_cells(align)
            .iter()
            .map(|token| ColumnAlign::from_token(token))
            .collect();
        if aligns.len() != thead.len() {
            log::warn!(
                "doc line {}: table header has {} column(s) but alignment row has {}",
                i + 1,
                thead.len(),
                aligns.len()
            );
            i += 1;
            continue;
        }

        let mut end = i + 2;
        while end + 1 < stop
            && is_table_row(&lines[end + 1])
            && doc_indent(&lines[end + 1]) == indent
        {
            end += 1;
        }

        let width = thead.len();
        let tbody = lines[i + 2..=end]
            .iter()
            .map(|line| {
                let mut row = split_cells(line);
                row.resize(width, String::new());
                row
            })
            .collect();

        return Some(TableMatch {
            start: i,
            end,
            indent,
            table: Table {
                thead,
                align: aligns,
                tbody,
            },
        });
    }
    None
}

/// A row has an unescaped `|` after at least one character (a leading pipe
/// does not count).
pub fn is_table_row(line: &str) -> bool {
    let text = line.trim();
    let text = text.strip_prefix('|').unwrap_or(text);
    unescaped_pipes(text).any(|at| at > 0)
}

/// Every cell of the row is an alignment token: `[:-]-+[-:]`.
pub fn is_alignment_row(line: &str) -> bool {
    let text = line.trim();
    if !text.contains('|') {
        return false;
    }
    let cells = split_cells(text);
    !cells.is_empty() && cells.iter().all(|cell| is_alignment_token(cell))
}

fn is_alignment_token(token: &str) -> bool {
    let chars: Vec<char> = token.chars().collect();
    chars.len() >= 3
        && matches!(chars[0], ':' | '-')
        && matches!(chars[chars.len() - 1], ':' | '-')
        && chars[1..chars.len() - 1].iter().all(|c| *c == '-')
}

/// Split a row into trimmed cells. Optional outer pipes are dropped and
/// `\|` is kept as a literal pipe inside the cell.
pub fn split_cells(line: &str) -> Vec<String> {
    let text = line.trim();
    let text = text.strip_prefix('|').unwrap_or(text);
    let text = match text.strip_suffix('|') {
        Some(inner) if !inner.ends_with('\\') => inner,
        _ => text,
    };

    let mut cells = Vec::new();
    let mut last = 0;
    for at in unescaped_pipes(text) {
        cells.push(clean_cell(&text[last..at]));
        last = at + 1;
    }
    cells.push(clean_cell(&text[last..]));
    cells
}

fn clean_cell(cell: &str) -> String {
    cell.trim().replace("\\|", "|")
}

fn unescaped_pipes(text: &str) -> impl Iterator<Item = usize> + '_ {
    let bytes = text.as_bytes();
    (0..bytes.len()).filter(move |&i| bytes[i] == b'|' && (i == 0 || bytes[i - 1] != b'\\'))
}
