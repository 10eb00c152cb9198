use std::path::{Path, PathBuf};

use clap::{Args, Parser};

use crate::render::{
    render_instantiation, render_page, render_testbench, Template, DEFAULT_PAGE_TEMPLATE,
    DEFAULT_TESTBENCH_TEMPLATE,
};
use crate::{Config, HdlDocError, HdlDocParser};

/// Source file read when none is given on the command line; editor
/// integrations write the current buffer here.
pub const DEFAULT_INPUT_NAME: &str = "code";
/// Output file written by `--to-temp`.
pub const TEMP_OUTPUT_NAME: &str = "hdldoc_output";

#[derive(Parser, Debug)]
#[command(name = "hdldoc")]
#[command(about = "Generate instantiations, testbenches and documentation for Verilog modules")]
#[command(version)]
pub struct Cli {
    #[command(flatten)]
    pub action: ActionFlags,

    /// Template file (testbench for -t, page for -p/-e)
    #[arg(short = 'T', long = "template")]
    pub template: Option<PathBuf>,

    /// Write the result to this file instead of stdout
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,

    /// Write the result to a file in the temp directory and print its path
    #[arg(long = "to-temp", conflicts_with = "output")]
    pub to_temp: bool,

    /// Configuration file (defaults to ./hdldoc.toml when present)
    #[arg(long = "config")]
    pub config: Option<PathBuf>,

    /// Verbose output (debug logging)
    #[arg(short = 'v', long = "verbose")]
    pub verbose: bool,

    /// Verilog source file
    pub file: Option<PathBuf>,
}

#[derive(Args, Debug)]
#[group(required = true, multiple = false)]
pub struct ActionFlags {
    /// Generate an instantiation snippet
    #[arg(short = 'i', long = "instantiation")]
    pub instantiation: bool,

    /// Generate a testbench
    #[arg(short = 't', long = "testbench")]
    pub testbench: bool,

    /// Generate documentation HTML for preview
    #[arg(short = 'p', long = "preview")]
    pub preview: bool,

    /// Generate documentation HTML for export
    #[arg(short = 'e', long = "export")]
    pub export: bool,

    /// Dump the extracted module and documentation as JSON
    #[arg(short = 'd', long = "dump")]
    pub dump: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Instantiation,
    Testbench,
    Preview,
    Export,
    Dump,
}

impl From<&ActionFlags> for Action {
    fn from(flags: &ActionFlags) -> Self {
        if flags.instantiation {
            Action::Instantiation
        } else if flags.testbench {
            Action::Testbench
        } else if flags.preview {
            Action::Preview
        } else if flags.export {
            Action::Export
        } else {
            Action::Dump
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputTarget {
    Stdout,
    File(PathBuf),
    /// `<temp dir>/hdldoc_output`
    Temp,
}

impl OutputTarget {
    /// File the output is written to, `None` for stdout.
    pub fn path(&self) -> Option<PathBuf> {
        match self {
            OutputTarget::Stdout => None,
            OutputTarget::File(path) => Some(path.clone()),
            OutputTarget::Temp => Some(std::env::temp_dir().join(TEMP_OUTPUT_NAME)),
        }
    }
}

#[derive(Debug, PartialEq)]
pub struct ParsedArgs {
    pub action: Action,
    pub file: PathBuf,
    pub template: Option<PathBuf>,
    pub output: OutputTarget,
    pub config: Option<PathBuf>,
    pub verbose: bool,
}

pub fn resolve_args(cli: Cli) -> ParsedArgs {
    let action = Action::from(&cli.action);
    let file = cli
        .file
        .unwrap_or_else(|| std::env::temp_dir().join(DEFAULT_INPUT_NAME));

    let output = match (cli.output, cli.to_temp) {
        (Some(path), _) => OutputTarget::File(path),
        (None, true) => OutputTarget::Temp,
        // Exported pages land next to the source by default
        (None, false) if action == Action::Export => OutputTarget::File(file.with_extension("html")),
        (None, false) => OutputTarget::Stdout,
    };

    ParsedArgs {
        action,
        file,
        template: cli.template,
        output,
        config: cli.config,
        verbose: cli.verbose,
    }
}

/// Produce the text requested by `args.action`. An empty string means there
/// was nothing to generate.
pub fn generate(args: &ParsedArgs, config: &Config) -> Result<String, HdlDocError> {
    let parser = HdlDocParser::new();
    let source = parser.parse_file(&args.file)?;
    let signature = &source.signature;

    let text = match args.action {
        Action::Instantiation => render_instantiation(signature, &config.instance_prefix),
        Action::Testbench => {
            let path = args.template.as_deref().or(config.testbench_template.as_deref());
            let template = Template::resolve(path, DEFAULT_TESTBENCH_TEMPLATE)?;
            render_testbench(signature, &template)?
        }
        Action::Preview | Action::Export => {
            let path = args.template.as_deref().or(config.html_template.as_deref());
            let template = Template::resolve(path, DEFAULT_PAGE_TEMPLATE)?;
            if signature.is_empty() {
                String::new()
            } else {
                render_page(&source, &template, config)?
            }
        }
        Action::Dump => serde_json::to_string_pretty(&source).map_err(|e| {
            HdlDocError::Serialize {
                message: e.to_string(),
            }
        })?,
    };

    if text.is_empty() {
        log::warn!("nothing to generate for {}", args.file.display());
    }
    Ok(text)
}

pub fn write_output(path: &Path, text: &str) -> Result<(), HdlDocError> {
    std::fs::write(path, text).map_err(|e| HdlDocError::io(path, e))?;
    log::debug!("wrote {} bytes to {}", text.len(), path.display());
    Ok(())
}
