use std::path::Path;

use serde::Serialize;

use crate::annotation::{parse_annotations, AnnotationDocument};
use crate::normalizer::normalize;
use crate::signature::extract_signature;
use crate::{HdlDocError, ModuleSignature};

/// Everything pulled out of one source file.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ExtractedSource {
    pub signature: ModuleSignature,
    pub annotations: AnnotationDocument,
}

#[derive(Debug, Clone, Default)]
pub struct HdlDocParser;

impl HdlDocParser {
    pub fn new() -> Self {
        Self
    }

    pub fn parse_file(&self, file_path: &Path) -> Result<ExtractedSource, HdlDocError> {
        let content =
            std::fs::read_to_string(file_path).map_err(|e| HdlDocError::io(file_path, e))?;
        log::debug!("read {} ({} bytes)", file_path.display(), content.len());

        Ok(self.parse_content(&content))
    }

    /// Run the extraction pipeline over in-memory source text. Never fails:
    /// missing pieces show up as empty fields.
    pub fn parse_content(&self, content: &str) -> ExtractedSource {
        let normalized = normalize(content);
        let signature = extract_signature(&normalized);
        let annotations = parse_annotations(normalized.doc_lines());

        if signature.is_empty() {
            log::debug!("no module header found");
        } else {
            log::debug!(
                "module {}: {} parameter(s), {} port(s)",
                signature.name,
                signature.parameters.len(),
                signature.ports.len()
            );
        }

        ExtractedSource {
            signature,
            annotations,
        }
    }
}
