pub mod common;

use common::{open_document, ADDER};
use tower_lsp::lsp_types::*;
use tower_lsp::LanguageServer;

async fn symbols(backend: &hdldoc_language_server::Backend, uri: &Url) -> Vec<DocumentSymbol> {
    let response = backend
        .document_symbol(DocumentSymbolParams {
            text_document: TextDocumentIdentifier { uri: uri.clone() },
            work_done_progress_params: WorkDoneProgressParams::default(),
            partial_result_params: PartialResultParams::default(),
        })
        .await
        .unwrap();

    match response {
        Some(DocumentSymbolResponse::Nested(symbols)) => symbols,
        other => panic!("expected nested symbols, got {:?}", other),
    }
}

#[tokio::test]
async fn test_module_with_parameters_and_ports() {
    let backend = common::create_test_backend();
    let uri = common::test_uri("/test/adder.v");
    open_document(&backend, &uri, ADDER).await;

    let symbols = symbols(&backend, &uri).await;
    assert_eq!(symbols.len(), 1);

    let module = &symbols[0];
    assert_eq!(module.name, "adder");
    assert_eq!(module.kind, SymbolKind::MODULE);
    assert_eq!(
        module.selection_range,
        Range::new(common::test_position(0, 7), common::test_position(0, 12))
    );

    let children = module.children.as_ref().unwrap();
    let names: Vec<_> = children.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, vec!["WIDTH", "a", "b", "sum"]);

    assert_eq!(children[0].kind, SymbolKind::CONSTANT);
    assert_eq!(children[0].detail.as_deref(), Some("8"));
    assert_eq!(children[0].range.start, common::test_position(1, 14));

    assert_eq!(children[3].kind, SymbolKind::FIELD);
    assert_eq!(children[3].detail.as_deref(), Some("output (wire) [WIDTH-1:0]"));
    assert_eq!(
        children[3].range,
        Range::new(common::test_position(5, 23), common::test_position(5, 26))
    );
}

#[tokio::test]
async fn test_module_name_in_comment_is_skipped() {
    let backend = common::create_test_backend();
    let uri = common::test_uri("/test/counter.v");
    let text = "// counter wraps at 15\nmodule counter (input clk);\nendmodule\n";
    open_document(&backend, &uri, text).await;

    let symbols = symbols(&backend, &uri).await;
    assert_eq!(symbols[0].range.start, common::test_position(1, 7));
    let clk = &symbols[0].children.as_ref().unwrap()[0];
    assert_eq!(clk.range.start, common::test_position(1, 22));
}

#[tokio::test]
async fn test_no_symbols_without_module() {
    let backend = common::create_test_backend();
    let uri = common::test_uri("/test/empty.v");
    open_document(&backend, &uri, "// just a comment\n").await;

    assert!(symbols(&backend, &uri).await.is_empty());
}
