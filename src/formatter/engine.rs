//! Typst rendering engine.
//!
//! Handles the low-level details of writing Typst source to a temporary
//! directory, invoking the compiler, and reading back the output PDF.

use std::fs;
use std::process::Command;
use tempfile::{tempdir, TempDir};

use super::layout::FormattedDocument;
use super::typst::to_typst;
use super::{DocumentRenderer, RenderError};

const SOURCE_FILE: &str = "document.typ";
const OUTPUT_FILE: &str = "document.pdf";

/// Renders documents by shelling out to the `typst` CLI.
#[derive(Debug, Clone)]
pub struct TypstRenderEngine {
    binary: String,
}

impl TypstRenderEngine {
    /// `binary` is the compiler executable, a name on `PATH` or a full path.
    pub fn new(binary: impl Into<String>) -> Self {
        Self {
            binary: binary.into(),
        }
    }

    /// Compile an already generated Typst source to PDF bytes.
    pub fn compile_source(&self, typst_source: &str) -> Result<Vec<u8>, RenderError> {
        let temp_dir = tempdir().map_err(RenderError::TempDir)?;
        fs::write(temp_dir.path().join(SOURCE_FILE), typst_source).map_err(RenderError::WriteSource)?;
        compile_typst_to_pdf(&self.binary, &temp_dir)
    }
}

impl Default for TypstRenderEngine {
    fn default() -> Self {
        Self::new("typst")
    }
}

impl DocumentRenderer for TypstRenderEngine {
    fn render(&self, document: &FormattedDocument) -> Result<Vec<u8>, RenderError> {
        self.compile_source(&to_typst(document))
    }
}

fn compile_typst_to_pdf(binary: &str, temp_dir: &TempDir) -> Result<Vec<u8>, RenderError> {
    let output = Command::new(binary)
        .arg("compile")
        .arg(SOURCE_FILE)
        .arg(OUTPUT_FILE)
        .current_dir(temp_dir.path())
        .output()
        .map_err(RenderError::TypstIo)?;

    if !output.status.success() {
        return Err(RenderError::TypstExit {
            code: output.status.code().unwrap_or(-1),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }

    fs::read(temp_dir.path().join(OUTPUT_FILE)).map_err(RenderError::ReadPdf)
}
