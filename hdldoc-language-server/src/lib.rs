use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use hdldoc::render::{
    render_instantiation, render_page, render_testbench, Template, DEFAULT_PAGE_TEMPLATE,
    DEFAULT_TESTBENCH_TEMPLATE,
};
use hdldoc::{Config, ExtractedSource, HdlDocParser, ModuleSignature, Parameter, Port};
use serde_json::Value;
use tokio::sync::RwLock;
use tower_lsp::jsonrpc::{Error as RpcError, Result as LspResult};
use tower_lsp::lsp_types::*;
use tower_lsp::{Client, LanguageServer};

pub const SERVER_NAME: &str = "hdldoc-language-server";

pub const INSTANTIATION_COMMAND: &str = "hdldoc.instantiation";
pub const TESTBENCH_COMMAND: &str = "hdldoc.testbench";
pub const DOCUMENTATION_COMMAND: &str = "hdldoc.documentation";

const COMMANDS: &[&str] = &[INSTANTIATION_COMMAND, TESTBENCH_COMMAND, DOCUMENTATION_COMMAND];

#[derive(Debug, Clone)]
pub struct Backend {
    pub client: Client,
    /// Latest full text of every open document.
    pub documents: Arc<RwLock<HashMap<Url, String>>>,
    pub config: Arc<RwLock<Config>>,
}

pub fn create_backend(client: Client) -> Backend {
    Backend {
        client,
        documents: Arc::new(RwLock::new(HashMap::new())),
        config: Arc::new(RwLock::new(Config::default())),
    }
}

#[tower_lsp::async_trait]
impl LanguageServer for Backend {
    async fn initialize(&self, params: InitializeParams) -> LspResult<InitializeResult> {
        if let Some(root) = workspace_root(&params) {
            match Config::discover(&root) {
                Ok(config) => *self.config.write().await = config,
                Err(err) => {
                    log::warn!("{}", err);
                    self.client
                        .log_message(MessageType::WARNING, err.to_string())
                        .await;
                }
            }
        }

        Ok(InitializeResult {
            server_info: Some(ServerInfo {
                name: SERVER_NAME.to_string(),
                version: Some(env!("CARGO_PKG_VERSION").to_string()),
            }),
            capabilities: ServerCapabilities {
                text_document_sync: Some(TextDocumentSyncCapability::Kind(
                    TextDocumentSyncKind::FULL,
                )),
                hover_provider: Some(HoverProviderCapability::Simple(true)),
                document_symbol_provider: Some(OneOf::Left(true)),
                execute_command_provider: Some(ExecuteCommandOptions {
                    commands: COMMANDS.iter().map(|c| c.to_string()).collect(),
                    work_done_progress_options: WorkDoneProgressOptions::default(),
                }),
                ..ServerCapabilities::default()
            },
        })
    }

    async fn initialized(&self, _: InitializedParams) {
        self.client
            .log_message(MessageType::INFO, "hdldoc language server initialized")
            .await;
    }

    async fn shutdown(&self) -> LspResult<()> {
        Ok(())
    }

    async fn did_open(&self, params: DidOpenTextDocumentParams) {
        self.on_change(
            params.text_document.uri,
            params.text_document.text,
            params.text_document.version,
        )
        .await
    }

    async fn did_change(&self, mut params: DidChangeTextDocumentParams) {
        // Full sync: the last change holds the whole document
        let Some(change) = params.content_changes.pop() else {
            return;
        };
        self.on_change(
            params.text_document.uri,
            change.text,
            params.text_document.version,
        )
        .await
    }

    async fn did_close(&self, params: DidCloseTextDocumentParams) {
        self.documents
            .write()
            .await
            .remove(&params.text_document.uri);
        self.client
            .publish_diagnostics(params.text_document.uri, Vec::new(), None)
            .await;
    }

    async fn hover(&self, params: HoverParams) -> LspResult<Option<Hover>> {
        let uri = params.text_document_position_params.text_document.uri;
        let position = params.text_document_position_params.position;

        let Some(text) = self.documents.read().await.get(&uri).cloned() else {
            return Ok(None);
        };
        let Some(word) = identifier_at(&text, position) else {
            return Ok(None);
        };

        let signature = HdlDocParser::new().parse_content(&text).signature;
        let markdown = if let Some(param) = signature.parameter(&word) {
            parameter_hover(param)
        } else if let Some(port) = signature.port(&word) {
            port_hover(port)
        } else if !signature.is_empty() && signature.name == word {
            module_hover(&signature)
        } else {
            return Ok(None);
        };

        Ok(Some(Hover {
            contents: HoverContents::Markup(MarkupContent {
                kind: MarkupKind::Markdown,
                value: markdown,
            }),
            range: None,
        }))
    }

    async fn document_symbol(
        &self,
        params: DocumentSymbolParams,
    ) -> LspResult<Option<DocumentSymbolResponse>> {
        let Some(text) = self
            .documents
            .read()
            .await
            .get(&params.text_document.uri)
            .cloned()
        else {
            return Ok(None);
        };

        let signature = HdlDocParser::new().parse_content(&text).signature;
        if signature.is_empty() {
            return Ok(Some(DocumentSymbolResponse::Nested(Vec::new())));
        }
        Ok(Some(DocumentSymbolResponse::Nested(vec![module_symbol(
            &text, &signature,
        )])))
    }

    async fn execute_command(&self, params: ExecuteCommandParams) -> LspResult<Option<Value>> {
        let uri = params
            .arguments
            .first()
            .and_then(Value::as_str)
            .and_then(|s| Url::parse(s).ok())
            .ok_or_else(|| RpcError::invalid_params("expected a document URI argument"))?;

        let source = self.extract(&uri).await?;
        let config = self.config.read().await.clone();
        let text = generate(&params.command, &source, &config)?;

        self.client
            .log_message(
                MessageType::INFO,
                format!("{} for {}: {} bytes", params.command, uri, text.len()),
            )
            .await;
        Ok(Some(Value::String(text)))
    }
}

impl Backend {
    async fn on_change(&self, uri: Url, text: String, version: i32) {
        let diagnostics = validate_document(&text);
        self.documents.write().await.insert(uri.clone(), text);
        self.client
            .publish_diagnostics(uri, diagnostics, Some(version))
            .await;
    }

    /// Extract the open document at `uri`, falling back to the file on disk.
    async fn extract(&self, uri: &Url) -> LspResult<ExtractedSource> {
        let parser = HdlDocParser::new();
        if let Some(text) = self.documents.read().await.get(uri) {
            return Ok(parser.parse_content(text));
        }

        let path = uri
            .to_file_path()
            .map_err(|_| RpcError::invalid_params(format!("not a file URI: {}", uri)))?;
        parser.parse_file(&path).map_err(internal_error)
    }
}

#[allow(deprecated)]
fn workspace_root(params: &InitializeParams) -> Option<PathBuf> {
    let uri = params
        .workspace_folders
        .as_ref()
        .and_then(|folders| folders.first())
        .map(|folder| &folder.uri)
        .or(params.root_uri.as_ref())?;
    uri.to_file_path().ok()
}

fn generate(command: &str, source: &ExtractedSource, config: &Config) -> LspResult<String> {
    let signature = &source.signature;
    match command {
        INSTANTIATION_COMMAND => Ok(render_instantiation(signature, &config.instance_prefix)),
        TESTBENCH_COMMAND => {
            let template = Template::resolve(
                config.testbench_template.as_deref(),
                DEFAULT_TESTBENCH_TEMPLATE,
            )
            .map_err(internal_error)?;
            render_testbench(signature, &template).map_err(internal_error)
        }
        DOCUMENTATION_COMMAND => {
            if signature.is_empty() {
                return Ok(String::new());
            }
            let template =
                Template::resolve(config.html_template.as_deref(), DEFAULT_PAGE_TEMPLATE)
                    .map_err(internal_error)?;
            render_page(source, &template, config).map_err(internal_error)
        }
        other => Err(RpcError::invalid_params(format!("unknown command: {}", other))),
    }
}

fn internal_error(err: hdldoc::HdlDocError) -> RpcError {
    let mut error = RpcError::internal_error();
    error.message = err.to_string().into();
    error
}

pub fn validate_document(text: &str) -> Vec<Diagnostic> {
    let signature = HdlDocParser::new().parse_content(text).signature;
    if !signature.is_empty() {
        return Vec::new();
    }

    vec![Diagnostic {
        range: Range::new(Position::new(0, 0), Position::new(0, 0)),
        severity: Some(DiagnosticSeverity::INFORMATION),
        source: Some("hdldoc".to_string()),
        message: "no module header found".to_string(),
        ..Diagnostic::default()
    }]
}

fn parameter_hover(param: &Parameter) -> String {
    let mut declaration = String::from("parameter");
    if !param.param_type.is_empty() {
        declaration.push(' ');
        declaration.push_str(&param.param_type);
    }
    declaration.push(' ');
    declaration.push_str(&param.name);
    if let Some(value) = &param.value {
        declaration.push_str(" = ");
        declaration.push_str(value);
    }
    with_description(&declaration, &param.description)
}

fn port_hover(port: &Port) -> String {
    let declaration = format!("{} {} {}", port.direction, port.port_type, port.name);
    with_description(&declaration, &port.description)
}

fn module_hover(signature: &ModuleSignature) -> String {
    let declaration = format!("module {}", signature.name);
    let summary = format!(
        "{} parameter(s), {} port(s)",
        signature.parameters.len(),
        signature.ports.len()
    );
    with_description(&declaration, &summary)
}

fn with_description(declaration: &str, description: &str) -> String {
    let mut markdown = format!("```verilog\n{}\n```", declaration);
    if !description.is_empty() {
        markdown.push_str("\n\n");
        markdown.push_str(description);
    }
    markdown
}

#[allow(deprecated)]
fn module_symbol(text: &str, signature: &ModuleSignature) -> DocumentSymbol {
    let module_range = find_module_name(text, &signature.name).unwrap_or_default();

    let parameters = signature.parameters.iter().map(|param| DocumentSymbol {
        name: param.name.clone(),
        detail: param.value.clone(),
        kind: SymbolKind::CONSTANT,
        tags: None,
        deprecated: None,
        range: Range::default(),
        selection_range: Range::default(),
        children: None,
    });
    let ports = signature.ports.iter().map(|port| DocumentSymbol {
        name: port.name.clone(),
        detail: Some(format!("{} {}", port.direction, port.port_type)),
        kind: SymbolKind::FIELD,
        tags: None,
        deprecated: None,
        range: Range::default(),
        selection_range: Range::default(),
        children: None,
    });

    let children = parameters
        .chain(ports)
        .map(|mut symbol| {
            let range =
                find_identifier(text, &symbol.name, module_range.end).unwrap_or(module_range);
            symbol.range = range;
            symbol.selection_range = range;
            symbol
        })
        .collect();

    DocumentSymbol {
        name: signature.name.clone(),
        detail: None,
        kind: SymbolKind::MODULE,
        tags: None,
        deprecated: None,
        range: module_range,
        selection_range: module_range,
        children: Some(children),
    }
}

fn is_identifier_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '$'
}

/// Identifier touching `position`, with characters counted from the start
/// of the line.
pub fn identifier_at(text: &str, position: Position) -> Option<String> {
    let line: Vec<char> = text.lines().nth(position.line as usize)?.chars().collect();
    let at = position.character as usize;
    if at > line.len() {
        return None;
    }

    let mut start = at;
    while start > 0 && is_identifier_char(line[start - 1]) {
        start -= 1;
    }
    let mut end = at;
    while end < line.len() && is_identifier_char(line[end]) {
        end += 1;
    }

    (start < end).then(|| line[start..end].iter().collect())
}

/// First whole-word occurrence of `name` at or after `from`.
pub fn find_identifier(text: &str, name: &str, from: Position) -> Option<Range> {
    let needle: Vec<char> = name.chars().collect();
    if needle.is_empty() {
        return None;
    }

    for (line_no, line) in text.lines().enumerate().skip(from.line as usize) {
        let chars: Vec<char> = line.chars().collect();
        let mut col = if line_no == from.line as usize {
            from.character as usize
        } else {
            0
        };

        while col + needle.len() <= chars.len() {
            let end = col + needle.len();
            if chars[col..end] == needle[..]
                && (col == 0 || !is_identifier_char(chars[col - 1]))
                && (end == chars.len() || !is_identifier_char(chars[end]))
            {
                return Some(Range::new(
                    Position::new(line_no as u32, col as u32),
                    Position::new(line_no as u32, end as u32),
                ));
            }
            col += 1;
        }
    }
    None
}

/// Location of the module name, preferring an occurrence that directly
/// follows the `module` keyword on the same line.
fn find_module_name(text: &str, name: &str) -> Option<Range> {
    let first = find_identifier(text, name, Position::default())?;
    let mut from = Position::default();

    while let Some(range) = find_identifier(text, name, from) {
        let line = text.lines().nth(range.start.line as usize).unwrap_or_default();
        let before: String = line.chars().take(range.start.character as usize).collect();
        if before.trim_end().ends_with("module") {
            return Some(range);
        }
        from = range.end;
    }
    Some(first)
}
