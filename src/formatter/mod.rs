//! Formatter module - turns generated text into a paginated PDF.
//!
//! - `layout` - line classification and per-block presentation rules
//! - `typst` - Typst markup for a laid-out document
//! - `engine` - compiles the markup with the Typst CLI
//! - `common` - date, escaping and filename helpers

pub mod common;
pub mod engine;
pub mod layout;
pub mod typst;

pub use engine::TypstRenderEngine;
pub use layout::{classify, layout, Block, BlockKind, FormattedDocument};

use thiserror::Error;

/// Errors that can occur while rendering a document to PDF.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("failed to create temporary directory: {0}")]
    TempDir(#[source] std::io::Error),
    #[error("failed to write Typst source: {0}")]
    WriteSource(#[source] std::io::Error),
    #[error("Typst CLI execution failed: {0}")]
    TypstIo(#[source] std::io::Error),
    #[error("Typst CLI exited with status {code}: {stderr}")]
    TypstExit { code: i32, stderr: String },
    #[error("failed to read generated PDF: {0}")]
    ReadPdf(#[source] std::io::Error),
    #[error("render worker failed: {0}")]
    Worker(String),
}

/// Produces the bytes of a rendered file for a formatted document.
pub trait DocumentRenderer: Send + Sync {
    fn render(&self, document: &FormattedDocument) -> Result<Vec<u8>, RenderError>;
}
