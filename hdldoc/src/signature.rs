//! Module signature extraction
//!
//! This is not a Verilog parser. It recovers the module name, the ANSI
//! parameter list and the ANSI port list from the comment-free view of a
//! source file, and then binds end-of-line comments to parameters and ports
//! by name. Every miss degrades to an empty field.
//!
//! The scanner moves through three states:
//! - header search: first `module <identifier>` up to the statement `;`
//! - parameter list: the `#( ... )` group right after the name
//! - port list: the group whose content starts with a direction keyword

use crate::normalizer::NormalizedSource;
use crate::{ModuleSignature, Parameter, Port, PortDirection};

/// Type text used for ports declared without a net type.
pub const DEFAULT_NET_TYPE: &str = "(wire)";

const NET_TYPES: &[&str] = &[
    "wire", "wand", "wor", "tri", "tri0", "tri1", "triand", "trior", "trireg", "reg", "logic",
    "var", "supply0", "supply1", "uwire",
];

const PARAMETER_KEYWORDS: &[&str] = &["parameter", "localparam"];

pub fn extract_signature(source: &NormalizedSource) -> ModuleSignature {
    let header = match find_module_header(source.stripped()) {
        Some(header) => header,
        None => {
            log::debug!("no module header found");
            return ModuleSignature::default();
        }
    };

    let (param_text, port_search_from) = split_parameter_list(header.body);
    let port_text = find_port_list(&header.body[port_search_from..]);

    let mut parameters = param_text.map(parse_parameters).unwrap_or_default();
    let mut ports = port_text.map(parse_ports).unwrap_or_default();

    let described = source.description_view();
    for param in &mut parameters {
        if let Some(desc) = find_description(described, PARAMETER_KEYWORDS, &param.name) {
            param.description = desc;
        }
    }
    for port in &mut ports {
        if let Some(desc) = find_description(described, &[port.direction.as_str()], &port.name) {
            port.description = desc;
        }
    }

    log::debug!(
        "module `{}`: {} parameter(s), {} port(s)",
        header.name,
        parameters.len(),
        ports.len()
    );

    ModuleSignature {
        name: header.name.to_string(),
        parameters,
        ports,
    }
}

struct ModuleHeader<'a> {
    name: &'a str,
    body: &'a str, // everything after the name up to and including the terminating ';'
}

fn find_module_header(text: &str) -> Option<ModuleHeader<'_>> {
    let mut search_from = 0;

    while let Some(offset) = find_word(&text[search_from..], "module") {
        let keyword_end = search_from + offset + "module".len();
        search_from = keyword_end;

        let after = &text[keyword_end..];
        let name_start = keyword_end + (after.len() - after.trim_start().len());
        let name_len = identifier_len(&text[name_start..]);
        if name_len == 0 {
            continue;
        }
        let name_end = name_start + name_len;

        let body_len = find_terminator(&text[name_end..])?;
        return Some(ModuleHeader {
            name: &text[name_start..name_end],
            body: &text[name_end..name_end + body_len + 1],
        });
    }

    None
}

/// Returns the parameter list text (if the header has a `#( ... )` group)
/// and the offset in `body` where the port list search starts.
fn split_parameter_list(body: &str) -> (Option<&str>, usize) {
    let trimmed = body.trim_start();
    let lead = body.len() - trimmed.len();

    let Some(after_hash) = trimmed.strip_prefix('#') else {
        return (None, 0);
    };
    let after_hash_trimmed = after_hash.trim_start();
    if !after_hash_trimmed.starts_with('(') {
        return (None, 0);
    }
    let open = lead + 1 + (after_hash.len() - after_hash_trimmed.len());
    let start = open + 1;

    // The list ends at the first ')' that is followed by the port list, so
    // default values like `$clog2(DEPTH)` stay inside it.
    let mut search = start;
    while let Some(rel) = body[search..].find(')') {
        let close = search + rel;
        if starts_with_port_list(&body[close + 1..]) {
            return (Some(&body[start..close]), close + 1);
        }
        search = close + 1;
    }

    // No ANSI port list: fall back to the first closing parenthesis.
    match body[start..].find(')') {
        Some(rel) => (Some(&body[start..start + rel]), start + rel + 1),
        None => (Some(&body[start..]), body.len()),
    }
}

/// Offset of the first `(` in `text` whose content starts with a direction
/// keyword.
fn port_list_open(text: &str) -> Option<usize> {
    let mut search = 0;
    while let Some(rel) = text[search..].find('(') {
        let open = search + rel;
        let inner = text[open + 1..].trim_start();
        if PortDirection::from_keyword(&inner[..identifier_len(inner)]).is_some() {
            return Some(open);
        }
        search = open + 1;
    }
    None
}

/// True when `text` starts, after whitespace, with the port list group.
fn starts_with_port_list(text: &str) -> bool {
    port_list_open(text).map_or(false, |open| text[..open].trim().is_empty())
}

fn find_port_list(text: &str) -> Option<&str> {
    let open = port_list_open(text)?;

    // The list runs to the last ')' before the terminating ';'.
    let body = text[open + 1..].trim_end();
    let body = body.strip_suffix(';')?.trim_end();
    body.strip_suffix(')')
}

fn parse_parameters(text: &str) -> Vec<Parameter> {
    let mut parameters = Vec::new();
    let mut current_type = String::new();

    for item in split_top_level(text, ',') {
        let (lhs, value) = split_assignment(&item);
        let mut lhs = lhs.trim();

        if let Some(rest) = PARAMETER_KEYWORDS
            .iter()
            .find_map(|kw| strip_keyword(lhs, kw))
        {
            lhs = rest;
            let (type_text, _) = split_trailing_identifier(lhs);
            current_type = collapse_whitespace(type_text);
        }

        let (type_text, name) = split_trailing_identifier(lhs);
        if name.is_empty() {
            continue;
        }
        let param_type = if type_text.trim().is_empty() {
            current_type.clone()
        } else {
            collapse_whitespace(type_text)
        };

        parameters.push(Parameter {
            name: name.to_string(),
            param_type,
            value,
            description: String::new(),
        });
    }

    parameters
}

fn parse_ports(text: &str) -> Vec<Port> {
    let mut ports = Vec::new();
    // Direction and type of the last declaration, inherited by `input a, b`
    let mut current: Option<(PortDirection, String)> = None;

    for item in split_top_level(text, ',') {
        let (lhs, value) = split_assignment(&item);
        let lhs = lhs.trim();

        let word_len = identifier_len(lhs);
        if let Some(direction) = PortDirection::from_keyword(&lhs[..word_len]) {
            let (type_text, name) = split_trailing_identifier(&lhs[word_len..]);
            let port_type = port_type_text(type_text);
            current = Some((direction, port_type.clone()));
            if name.is_empty() {
                continue;
            }
            ports.push(Port {
                name: name.to_string(),
                direction,
                port_type,
                value,
                description: String::new(),
            });
        } else if let Some((direction, port_type)) = &current {
            // Only a bare identifier continues the previous declaration
            if word_len == 0 || word_len != lhs.len() {
                continue;
            }
            ports.push(Port {
                name: lhs.to_string(),
                direction: *direction,
                port_type: port_type.clone(),
                value,
                description: String::new(),
            });
        }
    }

    ports
}

fn port_type_text(type_text: &str) -> String {
    let collapsed = collapse_whitespace(type_text);
    let first_word = &collapsed[..identifier_len(&collapsed)];
    if NET_TYPES.contains(&first_word) {
        collapsed
    } else if collapsed.is_empty() {
        DEFAULT_NET_TYPE.to_string()
    } else {
        format!("{} {}", DEFAULT_NET_TYPE, collapsed)
    }
}

/// Looks for the first line that contains one of `keywords`, then `name`
/// later on the same line, then an end-of-line comment. The comment text is
/// the description.
///
/// The lookup is by name only and is not scoped to the declaring statement;
/// an identifier reused elsewhere on a matching line can bind the wrong
/// comment.
fn find_description(text: &str, keywords: &[&str], name: &str) -> Option<String> {
    for line in text.lines() {
        let Some(comment_at) = find_line_comment(line) else {
            continue;
        };
        let code = &line[..comment_at];

        let Some(keyword_end) = keywords
            .iter()
            .filter_map(|kw| find_word(code, kw).map(|at| at + kw.len()))
            .min()
        else {
            continue;
        };

        if find_word(&code[keyword_end..], name).is_some() {
            let comment = line[comment_at + 2..].trim();
            return Some(comment.to_string());
        }
    }
    None
}

/// Byte offset of the first `//` outside a string literal.
fn find_line_comment(line: &str) -> Option<usize> {
    let bytes = line.as_bytes();
    let mut in_string = false;
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'\\' if in_string => i += 1,
            b'"' => in_string = !in_string,
            b'/' if !in_string && bytes.get(i + 1) == Some(&b'/') => return Some(i),
            _ => {}
        }
        i += 1;
    }
    None
}

/// Byte offset of the first `;` outside a string literal.
fn find_terminator(text: &str) -> Option<usize> {
    let bytes = text.as_bytes();
    let mut in_string = false;
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'\\' if in_string => i += 1,
            b'"' => in_string = !in_string,
            b';' if !in_string => return Some(i),
            _ => {}
        }
        i += 1;
    }
    None
}

/// Split on `sep` outside of brackets, braces, parentheses and strings.
fn split_top_level(text: &str, sep: char) -> Vec<String> {
    let mut items = Vec::new();
    let mut current = String::new();
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for c in text.chars() {
        if in_string {
            current.push(c);
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '"' {
                in_string = false;
            }
            continue;
        }
        match c {
            '"' => in_string = true,
            '(' | '[' | '{' => depth += 1,
            ')' | ']' | '}' => depth = depth.saturating_sub(1),
            _ if c == sep && depth == 0 => {
                items.push(std::mem::take(&mut current));
                continue;
            }
            _ => {}
        }
        current.push(c);
    }
    items.push(current);

    items
        .into_iter()
        .map(|item| item.trim().to_string())
        .filter(|item| !item.is_empty())
        .collect()
}

/// Split `lhs = value` at the first top-level `=`. The value has its
/// whitespace collapsed; an empty value is treated as absent.
fn split_assignment(item: &str) -> (&str, Option<String>) {
    let mut depth = 0usize;
    for (i, c) in item.char_indices() {
        match c {
            '(' | '[' | '{' => depth += 1,
            ')' | ']' | '}' => depth = depth.saturating_sub(1),
            '=' if depth == 0 => {
                let value = collapse_whitespace(&item[i + 1..]);
                return (&item[..i], (!value.is_empty()).then_some(value));
            }
            _ => {}
        }
    }
    (item, None)
}

/// Split `text` into everything before its trailing identifier and the
/// identifier itself (empty when `text` does not end in one).
fn split_trailing_identifier(text: &str) -> (&str, &str) {
    let text = text.trim_end();
    let start = text
        .char_indices()
        .rev()
        .take_while(|(_, c)| is_ident_char(*c))
        .last()
        .map(|(i, _)| i)
        .unwrap_or(text.len());

    let name = &text[start..];
    match name.chars().next() {
        Some(c) if is_ident_start(c) => (&text[..start], name),
        _ => (text, ""),
    }
}

fn strip_keyword<'a>(text: &'a str, keyword: &str) -> Option<&'a str> {
    let rest = text.strip_prefix(keyword)?;
    match rest.chars().next() {
        Some(c) if is_ident_char(c) => None,
        _ => Some(rest),
    }
}

/// Byte offset of `word` in `text` as a whole identifier.
fn find_word(text: &str, word: &str) -> Option<usize> {
    if word.is_empty() {
        return None;
    }
    let mut search = 0;
    while let Some(rel) = text[search..].find(word) {
        let at = search + rel;
        let end = at + word.len();
        let before_ok = text[..at].chars().next_back().map_or(true, |c| !is_ident_char(c));
        let after_ok = text[end..].chars().next().map_or(true, |c| !is_ident_char(c));
        if before_ok && after_ok {
            return Some(at);
        }
        search = at + word.len();
    }
    None
}

/// Length in bytes of the identifier at the start of `text` (0 if none).
fn identifier_len(text: &str) -> usize {
    match text.chars().next() {
        Some(c) if is_ident_start(c) => text
            .char_indices()
            .find(|(_, c)| !is_ident_char(*c))
            .map(|(i, _)| i)
            .unwrap_or(text.len()),
        _ => 0,
    }
}

fn is_ident_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

fn is_ident_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '$'
}

pub(crate) fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
