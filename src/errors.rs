use thiserror::Error;

/// Raised when the input text cannot be read as CSS at all.
///
/// `line` and `column` are 1-based and point at the start of the offending
/// rule or declaration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid CSS syntax: {reason} (line {line}, column {column})")]
pub struct CssSyntaxError {
    pub line: u32,
    pub column: u32,
    pub reason: String,
}

impl CssSyntaxError {
    pub fn new(line: u32, column: u32, reason: impl Into<String>) -> Self {
        Self {
            line,
            column,
            reason: reason.into(),
        }
    }

    /// Build from a `cssparser` location (0-based line, 1-based column)
    pub fn at(location: cssparser::SourceLocation, reason: impl Into<String>) -> Self {
        Self::new(location.line + 1, location.column, reason)
    }
}

/// Main error type for the tailwind-converter crate
#[derive(Debug, Error)]
pub enum ConverterError {
    #[error(transparent)]
    CssSyntax(#[from] CssSyntaxError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Failed to parse YAML config: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Failed to write output to {path}: {message}")]
    OutputError { path: String, message: String },
}

pub type Result<T> = std::result::Result<T, ConverterError>;
