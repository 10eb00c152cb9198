//! WaveDrom payloads embedded in documentation comments
//!
//! `<wave>` / `<wavedrom>` blocks hold JSON, or the relaxed JSON-like
//! literal WaveDrom examples are usually written in (bare keys, single
//! quotes, trailing commas). `<wave_yaml>` / `<wave_yml>` blocks hold YAML.
//! Every payload is normalised to a [`serde_json::Value`].

use chumsky::prelude::*;
use serde::Serialize;
use serde_json::{Map, Number, Value};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaveFormat {
    Json,
    Yaml,
}

/// Tag names of a wave block and the payload format each one holds.
pub const WAVE_TAGS: &[(&str, WaveFormat)] = &[
    ("wavedrom", WaveFormat::Json),
    ("wave_yaml", WaveFormat::Yaml),
    ("wave_yml", WaveFormat::Yaml),
    ("wave", WaveFormat::Json),
];

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WaveDiagram {
    pub data: Value,
}

impl WaveDiagram {
    /// The payload serialised as compact JSON, ready for a WaveDrom script tag.
    pub fn to_json(&self) -> String {
        self.data.to_string()
    }
}

/// Interpret the accumulated text of a wave block.
///
/// Returns `None` when the text cannot be read in its format, or when it
/// does not describe a mapping.
pub fn parse_payload(format: WaveFormat, text: &str) -> Option<WaveDiagram> {
    let value = match format {
        WaveFormat::Json => match serde_json::from_str::<Value>(text.trim()) {
            Ok(value) => value,
            Err(json_err) => match parse_relaxed(text) {
                Some(value) => value,
                None => {
                    log::warn!("dropping wave block: {}", json_err);
                    return None;
                }
            },
        },
        WaveFormat::Yaml => match serde_yaml::from_str::<Value>(text) {
            Ok(value) => value,
            Err(err) => {
                log::warn!("dropping wave_yaml block: {}", err);
                return None;
            }
        },
    };

    match value {
        Value::Object(_) => Some(WaveDiagram { data: value }),
        other => {
            log::warn!("dropping wave block: payload is not a mapping ({})", other);
            None
        }
    }
}

/// Parse a relaxed JSON literal. Bare identifiers are read as strings,
/// except `true`/`false`/`null` and their capitalised forms.
pub fn parse_relaxed(text: &str) -> Option<Value> {
    relaxed_value().then_ignore(end()).parse(text).ok()
}

fn relaxed_value() -> impl Parser<char, Value, Error = Simple<char>> + Clone {
    recursive(|value| {
        let frac = just('.').chain(text::digits(10));

        let exp = just('e')
            .or(just('E'))
            .chain(just('+').or(just('-')).or_not())
            .chain::<char, _, _>(text::digits(10));

        let number = just('-')
            .or_not()
            .chain::<char, _, _>(text::int(10))
            .chain::<char, _, _>(frac.or_not().flatten())
            .chain::<char, _, _>(exp.or_not().flatten())
            .collect::<String>()
            .try_map(|digits, span| {
                serde_json::from_str::<Number>(&digits)
                    .map_err(|_| Simple::custom(span, "invalid number"))
            })
            .labelled("number");

        let string = quoted('"').or(quoted('\'')).labelled("string");

        // Bare words: keywords become literals, anything else a string
        let word = text::ident().map(|word: String| match word.as_str() {
            "true" | "True" => Value::Bool(true),
            "false" | "False" => Value::Bool(false),
            "null" | "None" => Value::Null,
            _ => Value::String(word),
        });

        let array = value
            .clone()
            .separated_by(just(',').padded())
            .allow_trailing()
            .padded()
            .delimited_by(just('['), just(']'))
            .map(Value::Array)
            .labelled("array");

        // Python-style tuples read as arrays
        let tuple = value
            .clone()
            .separated_by(just(',').padded())
            .allow_trailing()
            .padded()
            .delimited_by(just('('), just(')'))
            .map(Value::Array);

        let key = string
            .clone()
            .or(text::ident())
            .or(text::int(10))
            .padded();

        let member = key.then_ignore(just(':')).then(value);

        let object = member
            .separated_by(just(',').padded())
            .allow_trailing()
            .padded()
            .delimited_by(just('{'), just('}'))
            .map(|members: Vec<(String, Value)>| Value::Object(members.into_iter().collect::<Map<_, _>>()))
            .labelled("object");

        choice((
            number.map(Value::Number),
            string.map(Value::String),
            word,
            array,
            tuple,
            object,
        ))
        .padded()
    })
}

fn quoted(quote: char) -> impl Parser<char, String, Error = Simple<char>> + Clone {
    just(quote)
        .ignore_then(
            filter(move |c: &char| *c != '\\' && *c != quote)
                .or(escape())
                .repeated(),
        )
        .then_ignore(just(quote))
        .collect::<String>()
}

fn escape() -> impl Parser<char, char, Error = Simple<char>> + Clone {
    just('\\').ignore_then(choice((
        just('\\'),
        just('/'),
        just('"'),
        just('\''),
        just('b').to('\x08'),
        just('f').to('\x0C'),
        just('n').to('\n'),
        just('r').to('\r'),
        just('t').to('\t'),
        just('u').ignore_then(
            filter(|c: &char| c.is_ascii_hexdigit())
                .repeated()
                .exactly(4)
                .collect::<String>()
                .try_map(|digits, span| {
                    u32::from_str_radix(&digits, 16)
                        .ok()
                        .and_then(char::from_u32)
                        .ok_or_else(|| Simple::custom(span, "invalid unicode escape"))
                }),
        ),
    )))
}
