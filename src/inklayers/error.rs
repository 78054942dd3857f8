use thiserror::Error;

#[derive(Error, Debug)]
pub enum DocumentError {
    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Unknown layer: {0}")]
    LayerUnknown(String),

    #[error("Malformed layer path (must start with '/'): {0}")]
    MalformedPath(String),

    #[error("Duplicate layer: {0}")]
    DuplicateLayer(String),

    #[error("Invalid opacity {0} (expected a value between 0.0 and 1.0)")]
    InvalidOpacity(f64),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Config error: {0}")]
    Config(String),
}

impl DocumentError {
    /// True for every error that means "this path does not name a layer",
    /// whether the path was absent or malformed.
    pub fn is_unknown_layer(&self) -> bool {
        matches!(
            self,
            DocumentError::LayerUnknown(_) | DocumentError::MalformedPath(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, DocumentError>;
