use std::fs;
use std::path::{Path, PathBuf};

use hdldoc::{AnnotationDocument, ExtractedSource, HdlDocParser, ModuleSignature};

pub mod macros;

pub struct TestHarness {
    parser: HdlDocParser,
    fixtures_root: PathBuf,
}

impl TestHarness {
    pub fn new() -> Self {
        Self {
            parser: HdlDocParser::new(),
            fixtures_root: default_fixtures_root(),
        }
    }

    #[allow(dead_code)]
    pub fn fixtures_root(&self) -> &Path {
        &self.fixtures_root
    }

    pub fn fixture_path(&self, relative: &str) -> PathBuf {
        self.fixtures_root.join(relative)
    }

    pub fn read_fixture(&self, relative: &str) -> String {
        let path = self.fixture_path(relative);
        fs::read_to_string(&path).unwrap_or_else(|err| {
            panic!("Failed to read fixture {}: {}", path.display(), err);
        })
    }

    pub fn extract_fixture(&self, relative: &str) -> ExtractedSource {
        let content = self.read_fixture(relative);
        self.parser.parse_content(&content)
    }

    #[allow(dead_code)]
    pub fn signature(&self, relative: &str) -> ModuleSignature {
        self.extract_fixture(relative).signature
    }
}

impl Default for TestHarness {
    fn default() -> Self {
        Self::new()
    }
}

pub fn default_fixtures_root() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("test_files")
}

#[allow(dead_code)]
pub fn iter_verilog_files(relative_dir: &str) -> Vec<PathBuf> {
    let root = default_fixtures_root().join(relative_dir);
    if !root.exists() {
        return Vec::new();
    }

    let mut files: Vec<PathBuf> = fs::read_dir(&root)
        .unwrap_or_else(|err| panic!("Failed to read directory {}: {}", root.display(), err))
        .filter_map(|entry| {
            let path = entry.ok()?.path();
            match path.extension().and_then(|ext| ext.to_str()) {
                Some("v") | Some("sv") => Some(path),
                _ => None,
            }
        })
        .collect();
    files.sort();
    files
}

/// Build a doc line stream the way the normalizer hands it over: the text
/// after the `//>` marker.
#[allow(dead_code)]
pub fn doc_lines(lines: &[&str]) -> Vec<String> {
    lines.iter().map(|line| line.to_string()).collect()
}

/// Parse a documentation block written as `//>` comment lines.
#[allow(dead_code)]
pub fn parse_doc_comments(source: &str) -> AnnotationDocument {
    HdlDocParser::new().parse_content(source).annotations
}

#[allow(dead_code)]
pub fn assert_module(relative: &str, name: &str, parameters: usize, ports: usize) {
    let signature = TestHarness::default().signature(relative);
    assert_eq!(signature.name, name, "module name of {}", relative);
    assert_eq!(
        signature.parameters.len(),
        parameters,
        "parameter count of {}",
        relative
    );
    assert_eq!(signature.ports.len(), ports, "port count of {}", relative);
}
