use hdldoc_language_server::Backend;
use tower_lsp::lsp_types::*;
use tower_lsp::{LanguageServer, LspService};

pub const ADDER: &str = r#"module adder #(
    parameter WIDTH = 8 // bit width
) (
    input [WIDTH-1:0] a, // operand a
    input [WIDTH-1:0] b, // operand b
    output [WIDTH-1:0] sum
);
    assign sum = a + b;
endmodule
"#;

/// Create a backend for direct testing. The backend shares its state with
/// the one owned by the service.
pub fn create_test_backend() -> Backend {
    let (service, _socket) = LspService::new(hdldoc_language_server::create_backend);
    service.inner().clone()
}

/// Helper to create a test URI
pub fn test_uri(path: &str) -> Url {
    Url::parse(&format!("file://{}", path)).unwrap()
}

#[allow(dead_code)]
pub fn test_position(line: u32, character: u32) -> Position {
    Position { line, character }
}

pub async fn open_document(backend: &Backend, uri: &Url, text: &str) {
    backend
        .did_open(DidOpenTextDocumentParams {
            text_document: TextDocumentItem {
                uri: uri.clone(),
                language_id: "verilog".to_string(),
                version: 1,
                text: text.to_string(),
            },
        })
        .await;
}

#[allow(dead_code)]
pub async fn hover_text(backend: &Backend, uri: &Url, line: u32, character: u32) -> Option<String> {
    let hover = backend
        .hover(HoverParams {
            text_document_position_params: TextDocumentPositionParams {
                text_document: TextDocumentIdentifier { uri: uri.clone() },
                position: test_position(line, character),
            },
            work_done_progress_params: WorkDoneProgressParams::default(),
        })
        .await
        .unwrap()?;

    match hover.contents {
        HoverContents::Markup(content) => Some(content.value),
        other => panic!("Hover should return markup content, got {:?}", other),
    }
}

#[allow(dead_code)]
pub async fn run_command(
    backend: &Backend,
    command: &str,
    arguments: Vec<serde_json::Value>,
) -> tower_lsp::jsonrpc::Result<Option<serde_json::Value>> {
    backend
        .execute_command(ExecuteCommandParams {
            command: command.to_string(),
            arguments,
            work_done_progress_params: WorkDoneProgressParams::default(),
        })
        .await
}
