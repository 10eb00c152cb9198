//! Jinja templates for testbenches and documentation pages
//!
//! Templates are rendered with `minijinja`, so `{% for %}` loops and
//! `{% if %}` conditionals over the extracted module work. Variables that
//! are not in the context render as nothing.

use std::path::Path;

use minijinja::Environment;
use serde::Serialize;

use crate::HdlDocError;

pub const DEFAULT_TESTBENCH_TEMPLATE: &str = r#"`timescale 1ns / 1ps

module tb_{{ module_name }};

{{ uut }}

    initial begin
        $dumpfile("tb_{{ module_name }}.vcd");
        $dumpvars(0, tb_{{ module_name }});
    end

endmodule
"#;

pub const DEFAULT_PAGE_TEMPLATE: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8">
  <meta name="viewport" content="width=device-width, initial-scale=1.0">
  <title>{{ module_name }}</title>
  <style>
    body { font-family: -apple-system, 'Segoe UI', Roboto, sans-serif; margin: 2rem; line-height: 1.6; }
    table { border-collapse: collapse; margin: 0.5rem 0 1rem; }
    th, td { border: 1px solid #999; padding: 0.2rem 0.6rem; }
    th { background-color: #eee; }
    .diagram svg { max-width: 100%; }
  </style>
</head>
<body>
  <h1>{{ module_name }}</h1>
  <h2>Block Diagram</h2>
  <div class="diagram">
{{ module_diagram }}
  </div>
{% if hasParameters %}
  <h2>Parameters</h2>
{{ parameters_html }}
{% endif %}
{% if hasPorts %}
  <h2>Ports</h2>
{{ ports_html }}
{% endif %}
  <h2>Notes</h2>
{{ notes_html }}
{% if hasWavedrom %}
{{ wavedrom_html }}
{% endif %}
</body>
</html>
"#;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    source: String,
}

impl Template {
    /// Check the template syntax and keep the source for rendering.
    pub fn parse(text: &str) -> Result<Self, HdlDocError> {
        environment()
            .template_from_str(text)
            .map_err(template_error)?;
        Ok(Self {
            source: text.to_string(),
        })
    }

    pub fn load(path: &Path) -> Result<Self, HdlDocError> {
        let text = std::fs::read_to_string(path).map_err(|e| HdlDocError::io(path, e))?;
        Self::parse(&text).map_err(|err| match err {
            HdlDocError::Template { message } => HdlDocError::Template {
                message: format!("{}: {}", path.display(), message),
            },
            other => other,
        })
    }

    /// The template at `path`, or `default` when no path is configured.
    pub fn resolve(path: Option<&Path>, default: &str) -> Result<Self, HdlDocError> {
        match path {
            Some(path) => Self::load(path),
            None => Self::parse(default),
        }
    }

    pub fn render<S: Serialize>(&self, context: S) -> Result<String, HdlDocError> {
        environment()
            .render_str(&self.source, context)
            .map_err(template_error)
    }
}

fn environment() -> Environment<'static> {
    let mut env = Environment::new();
    // Generated files end the way the template file ends
    env.set_keep_trailing_newline(true);
    env
}

fn template_error(err: minijinja::Error) -> HdlDocError {
    HdlDocError::Template {
        message: err.to_string(),
    }
}
