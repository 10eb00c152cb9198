//! Comment and attribute normalisation for Verilog source text
//!
//! The source is lexed once into [`Piece`]s and then folded into the three
//! views the rest of the pipeline needs:
//! - the fully stripped view used to find the module header,
//! - the description view used to look up end-of-line comments,
//! - the stream of documentation comment lines (`//>` lines).

use chumsky::prelude::*;

/// Prefix of a whole-line comment that opts the line into documentation.
pub const DOC_MARKER: &str = "//>";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Piece {
    Code(String),
    StringLiteral(String),
    Attribute(String),
    LineComment(String), // includes the leading "//"
    BlockComment(String),
    Newline,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NormalizedSource {
    stripped: String,
    described: String,
    doc_lines: Vec<String>,
}

impl NormalizedSource {
    /// Source with every comment removed and attributes replaced by a space.
    pub fn stripped(&self) -> &str {
        &self.stripped
    }

    /// Source with block comments and non-documentation whole-line comments
    /// removed; end-of-line comments and `//>` lines are kept.
    pub fn description_view(&self) -> &str {
        &self.described
    }

    /// Documentation comment lines with the marker removed, in source order.
    pub fn doc_lines(&self) -> &[String] {
        &self.doc_lines
    }
}

pub fn normalize(source: &str) -> NormalizedSource {
    let pieces = tokenize(source);

    let mut out = NormalizedSource::default();
    // Only whitespace has been seen since the last newline
    let mut at_line_start = true;

    for piece in &pieces {
        match piece {
            Piece::Code(text) => {
                out.stripped.push_str(text);
                out.described.push_str(text);
                if !text.trim().is_empty() {
                    at_line_start = false;
                }
            }
            Piece::StringLiteral(text) => {
                out.stripped.push_str(text);
                out.described.push_str(text);
                at_line_start = false;
            }
            Piece::Attribute(_) => {
                out.stripped.push(' ');
                out.described.push(' ');
                at_line_start = false;
            }
            Piece::BlockComment(_) => {
                out.stripped.push(' ');
                out.described.push(' ');
                at_line_start = false;
            }
            Piece::LineComment(text) => {
                let whole_line = at_line_start;
                let is_doc = whole_line && text.starts_with(DOC_MARKER);

                if is_doc {
                    out.doc_lines.push(text[DOC_MARKER.len()..].to_string());
                }
                if !whole_line || is_doc {
                    out.described.push_str(text);
                }
                at_line_start = false;
            }
            Piece::Newline => {
                out.stripped.push('\n');
                out.described.push('\n');
                at_line_start = true;
            }
        }
    }

    out
}

/// Split source text into code, strings, attributes, comments and newlines.
///
/// Adjacent code characters are merged into a single [`Piece::Code`].
pub fn tokenize(source: &str) -> Vec<Piece> {
    let source = source.replace("\r\n", "\n");

    match lexer().parse(source.as_str()) {
        Ok(pieces) => merge_code(pieces),
        Err(errors) => {
            // The lexer accepts every character, so this only guards against
            // surprises; treat the text as plain code.
            log::warn!("source lexer failed: {:?}", errors);
            source
                .split('\n')
                .enumerate()
                .flat_map(|(i, line)| {
                    let newline = (i > 0).then_some(Piece::Newline);
                    newline.into_iter().chain(std::iter::once(Piece::Code(line.to_string())))
                })
                .collect()
        }
    }
}

fn lexer() -> impl Parser<char, Vec<Piece>, Error = Simple<char>> {
    let newline = just('\n').to(Piece::Newline);

    // `// ...` up to the end of the line
    let line_comment = just("//")
        .ignore_then(filter(|c: &char| *c != '\n').repeated())
        .collect::<String>()
        .map(|body| Piece::LineComment(format!("//{}", body)));

    // `/* ... */`, an unterminated comment runs to the end of the file
    let block_comment = just("/*")
        .ignore_then(just("*/").not().rewind().ignore_then(any()).repeated())
        .then_ignore(just("*/").or_not())
        .collect::<String>()
        .map(|body| Piece::BlockComment(format!("/*{}*/", body)));

    // `@(*)` is an event control, not an attribute
    let star_paren = just("(*")
        .ignore_then(filter(|c: &char| c.is_whitespace()).repeated())
        .then_ignore(just(')'))
        .collect::<String>()
        .map(|ws| Piece::Code(format!("(*{})", ws)));

    // `(* ... *)`
    let attribute = just("(*")
        .ignore_then(just("*)").not().rewind().ignore_then(any()).repeated())
        .then_ignore(just("*)"))
        .collect::<String>()
        .map(|body| Piece::Attribute(format!("(*{}*)", body)));

    // String literals are passed through verbatim, escapes included
    let string_char = just('\\')
        .then(any())
        .map(|(a, b)| format!("{}{}", a, b))
        .or(filter(|c: &char| *c != '"' && *c != '\\' && *c != '\n').map(|c| c.to_string()));
    let string = just('"')
        .ignore_then(string_char.repeated())
        .then(just('"').or_not())
        .map(|(parts, close)| {
            let mut text = String::from("\"");
            text.push_str(&parts.concat());
            if close.is_some() {
                text.push('"');
            }
            Piece::StringLiteral(text)
        });

    let code = filter(|c: &char| *c != '\n').map(|c| Piece::Code(c.to_string()));

    choice((
        newline,
        line_comment,
        block_comment,
        star_paren,
        attribute,
        string,
        code,
    ))
    .repeated()
    .then_ignore(end())
}

fn merge_code(pieces: Vec<Piece>) -> Vec<Piece> {
    let mut merged: Vec<Piece> = Vec::with_capacity(pieces.len());
    for piece in pieces {
        match (merged.last_mut(), piece) {
            (Some(Piece::Code(prev)), Piece::Code(text)) => prev.push_str(&text),
            (_, piece) => merged.push(piece),
        }
    }
    merged
}
