//! Error types for template building and rendering.

use std::error::Error as _;
use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for render operations.
pub type RenderResult<T> = Result<T, RenderError>;

/// Errors that can occur while building the template cache or rendering a page.
#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Template directory does not exist: {0}")]
    TemplateDirMissing(PathBuf),

    #[error("Invalid template pattern: {0}")]
    Pattern(#[from] glob::PatternError),

    #[error("Failed to list templates: {0}")]
    Glob(#[from] glob::GlobError),

    #[error("Failed to parse template {template}: {}", chain(.source))]
    Parse {
        template: String,
        source: tera::Error,
    },

    #[error("Page {page} references unknown layout {layout}")]
    UnknownLayout { page: String, layout: String },

    #[error("Template not found in cache: {0}")]
    NotFound(String),

    #[error("Failed to execute template {page}: {}", chain(.source))]
    Execution {
        page: String,
        source: tera::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl RenderError {
    /// Failure while discovering or compiling templates.
    pub fn is_build_error(&self) -> bool {
        matches!(
            self,
            Self::TemplateDirMissing(_)
                | Self::Pattern(_)
                | Self::Glob(_)
                | Self::Parse { .. }
                | Self::UnknownLayout { .. }
        )
    }

    /// The requested page has no compiled template.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

/// Tera keeps the useful detail (line, column, missing variable) in the
/// source chain rather than the top-level message.
fn chain(err: &tera::Error) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(inner) = source {
        message.push_str(": ");
        message.push_str(&inner.to_string());
        source = inner.source();
    }
    message
}
