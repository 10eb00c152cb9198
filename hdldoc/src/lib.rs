pub mod annotation;
pub mod cli;
pub mod config;
pub mod diagram;
pub mod normalizer;
pub mod parser;
pub mod render;
pub mod signature;
pub mod wave;

use std::path::PathBuf;

use serde::Serialize;

pub use annotation::{
    parse_annotations, AnnotationDocument, AnnotationSegment, ColumnAlign, SegmentKind, Table,
};
pub use cli::{generate, resolve_args, write_output, Action, Cli, OutputTarget, ParsedArgs};
pub use config::Config;
pub use diagram::DiagramLayout;
pub use normalizer::{normalize, NormalizedSource};
pub use parser::{ExtractedSource, HdlDocParser};
pub use signature::extract_signature;
pub use wave::{WaveDiagram, WaveFormat};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HdlDocError {
    /// A file could not be read or written.
    Io { path: PathBuf, message: String },
    /// The configuration file exists but is not valid.
    Config { path: PathBuf, message: String },
    /// A template could not be rendered.
    Template { message: String },
    /// Extracted data could not be serialised for `--dump`.
    Serialize { message: String },
}

impl HdlDocError {
    pub fn io(path: impl Into<PathBuf>, err: std::io::Error) -> Self {
        HdlDocError::Io {
            path: path.into(),
            message: err.to_string(),
        }
    }
}

impl std::fmt::Display for HdlDocError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HdlDocError::Io { path, message } => {
                write!(f, "I/O error on {}: {}", path.display(), message)
            }
            HdlDocError::Config { path, message } => {
                write!(f, "Invalid configuration in {}: {}", path.display(), message)
            }
            HdlDocError::Template { message } => write!(f, "Template error: {}", message),
            HdlDocError::Serialize { message } => write!(f, "Serialization error: {}", message),
        }
    }
}

impl std::error::Error for HdlDocError {}

/// Interface of the first module found in a source file.
///
/// An empty `name` means no module header was recognised; the parameter and
/// port lists are empty in that case.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ModuleSignature {
    pub name: String,
    pub parameters: Vec<Parameter>,
    pub ports: Vec<Port>,
}

impl ModuleSignature {
    pub fn is_empty(&self) -> bool {
        self.name.is_empty()
    }

    pub fn parameter(&self, name: &str) -> Option<&Parameter> {
        self.parameters.iter().find(|p| p.name == name)
    }

    pub fn port(&self, name: &str) -> Option<&Port> {
        self.ports.iter().find(|p| p.name == name)
    }

    /// Inputs, drawn on the left of the block diagram.
    pub fn left_ports(&self) -> impl Iterator<Item = &Port> {
        self.ports
            .iter()
            .filter(|p| p.direction == PortDirection::Input)
    }

    /// Outputs and inouts, drawn on the right of the block diagram.
    pub fn right_ports(&self) -> impl Iterator<Item = &Port> {
        self.ports
            .iter()
            .filter(|p| p.direction != PortDirection::Input)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Parameter {
    pub name: String,
    #[serde(rename = "type")]
    pub param_type: String,
    pub value: Option<String>,
    pub description: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PortDirection {
    Input,
    Output,
    Inout,
}

impl PortDirection {
    pub fn from_keyword(word: &str) -> Option<Self> {
        match word {
            "input" => Some(PortDirection::Input),
            "output" => Some(PortDirection::Output),
            "inout" => Some(PortDirection::Inout),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PortDirection::Input => "input",
            PortDirection::Output => "output",
            PortDirection::Inout => "inout",
        }
    }
}

impl std::fmt::Display for PortDirection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Port {
    pub name: String,
    pub direction: PortDirection,
    #[serde(rename = "type")]
    pub port_type: String, // net type + signed + range, "(wire)" when no net type is given
    pub value: Option<String>,
    pub description: String,
}

impl Port {
    /// The bit range of the port type, e.g. `[WIDTH-1:0]`, if any.
    pub fn range(&self) -> Option<&str> {
        let start = self.port_type.find('[')?;
        let end = self.port_type.rfind(']')?;
        (end > start).then(|| &self.port_type[start..=end])
    }
}
