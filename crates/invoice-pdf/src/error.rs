use thiserror::Error;

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Invalid invoice amount: {0} (must be finite and non-negative)")]
    InvalidAmount(f64),

    #[error("Invalid {kind} at position {index}: {reason}")]
    InvalidLineItem {
        kind: &'static str,
        index: usize,
        reason: String,
    },

    #[error("Invalid style: {0}")]
    Style(#[from] StyleError),

    #[error("Layout failed: {0}")]
    Layout(String),

    #[error("Failed to write PDF: {0}")]
    Serialize(String),
}

#[derive(Error, Debug)]
pub enum StyleError {
    #[error("{field} must be a positive number, got {value}")]
    InvalidSize { field: &'static str, value: f32 },

    #[error("Margin {margin}pt leaves too little room on a {width}x{height}pt page")]
    MarginTooLarge { margin: f32, width: f32, height: f32 },

    #[error("Invalid color: {0}")]
    InvalidColor(String),

    #[error("Unknown page size: {0}")]
    UnknownPageSize(String),

    #[error("Failed to parse style: {0}")]
    Parse(#[from] serde_json::Error),
}

#[derive(Error, Debug)]
pub enum ArtifactError {
    #[error("Artifact is empty")]
    Empty,

    #[error("Artifact too small to be a PDF ({0} bytes)")]
    TooSmall(usize),

    #[error("Not a PDF (missing %PDF- header)")]
    MissingHeader,

    #[error("Failed to parse PDF: {0}")]
    Parse(String),

    #[error("PDF has no pages")]
    NoPages,
}
