use std::path::{Path, PathBuf};

pub mod colorize;
pub mod extract;
pub mod list;

#[derive(Debug, Clone)]
pub enum MessageLevel {
    Info,
    Success,
    Warning,
}

#[derive(Debug, Clone)]
pub struct CmdMessage {
    pub level: MessageLevel,
    pub content: String,
}

impl CmdMessage {
    pub fn info(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Info,
            content: content.into(),
        }
    }

    pub fn success(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Success,
            content: content.into(),
        }
    }

    pub fn warning(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Warning,
            content: content.into(),
        }
    }
}

/// The layer paths of one input file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListedLayers {
    pub file: PathBuf,
    pub layers: Vec<String>,
}

#[derive(Debug, Default)]
pub struct CmdResult {
    pub listed_layers: Vec<ListedLayers>,
    pub written_files: Vec<PathBuf>,
    pub messages: Vec<CmdMessage>,
}

impl CmdResult {
    pub fn add_message(&mut self, message: CmdMessage) {
        self.messages.push(message);
    }

    pub fn with_listed_layers(mut self, listed: Vec<ListedLayers>) -> Self {
        self.listed_layers = listed;
        self
    }

    pub fn with_written_files(mut self, files: Vec<PathBuf>) -> Self {
        self.written_files = files;
        self
    }
}

/// Base name for files derived from `file`: its stem, `image` if it has none.
pub(crate) fn base_name(file: &Path) -> String {
    file.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| "image".to_string())
}
