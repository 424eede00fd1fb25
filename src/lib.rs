pub mod args;
pub mod config;
pub mod converter;
pub mod errors;
pub mod formatter;
pub mod parser;
pub mod resolver;
pub mod service;
pub mod table;

pub use args::{Cli, Commands, ConvertArgs, LookupArgs};
pub use config::{ConverterConfig, OutputConfig, PropertyConfig, ThemeConfig, ThemeExtend};
pub use converter::{ConversionOutcome, DeclarationConverter};
pub use errors::{ConverterError, CssSyntaxError, Result};
pub use formatter::{format_classes, OutputFormatter, OutputMode};
pub use parser::{Declaration, DeclarationSource, StylesheetParser};
pub use resolver::{Resolution, ValueResolver};
pub use service::{ConversionResult, ConversionService, ConvertRequest};
pub use table::{ClassValue, PropertyEntry, PropertyTable};

use once_cell::sync::Lazy;
use std::path::Path;

static DEFAULT_SERVICE: Lazy<ConversionService> = Lazy::new(ConversionService::new);

/// Convert CSS with the default table and parser
pub fn convert_css(request: &ConvertRequest) -> std::result::Result<ConversionResult, CssSyntaxError> {
    DEFAULT_SERVICE.convert(request)
}

/// Convert several independent requests in parallel with the default service
pub fn convert_batch(requests: &[ConvertRequest]) -> Vec<std::result::Result<ConversionResult, CssSyntaxError>> {
    DEFAULT_SERVICE.convert_batch(requests)
}

fn load_config(path: Option<&Path>) -> Result<ConverterConfig> {
    match path {
        Some(path) => {
            log::debug!("loading config from {}", path.display());
            ConverterConfig::from_file(path)
        }
        None => Ok(ConverterConfig::default()),
    }
}

/// Handle the convert command - read CSS from a file or stdin, emit the JSON result
#[cfg(feature = "cli")]
pub async fn handle_convert_command(args: ConvertArgs) -> Result<ConversionResult> {
    use tokio::io::{self, AsyncReadExt, AsyncWriteExt};

    args.validate().map_err(ConverterError::InvalidInput)?;

    let config = load_config(args.config.as_deref())?;
    let mode = args.mode.unwrap_or(config.output.default_mode);

    let css = match &args.input {
        Some(path) => tokio::fs::read_to_string(path).await.map_err(|e| {
            ConverterError::InvalidInput(format!("Failed to read {}: {}", path.display(), e))
        })?,
        None => {
            let mut input = String::new();
            io::stdin().read_to_string(&mut input).await?;
            input
        }
    };

    let service = ConversionService::from_config(&config);
    let result = service.convert(&ConvertRequest::new(css).with_mode(mode))?;

    let mut rendered = if args.pretty {
        serde_json::to_string_pretty(&result)?
    } else {
        serde_json::to_string(&result)?
    };
    rendered.push('\n');

    match &args.output {
        Some(path) => {
            write_atomic(path, &rendered).map_err(|e| ConverterError::OutputError {
                path: path.display().to_string(),
                message: e.to_string(),
            })?;
        }
        None => {
            let mut stdout = io::stdout();
            stdout
                .write_all(rendered.as_bytes())
                .await
                .map_err(|e| ConverterError::OutputError {
                    path: "stdout".to_string(),
                    message: e.to_string(),
                })?;
            stdout.flush().await.map_err(|e| ConverterError::OutputError {
                path: "stdout".to_string(),
                message: e.to_string(),
            })?;
        }
    }

    log::info!(
        "converted to {} ({} unsupported, {} suggestions)",
        mode,
        result.unsupported_styles.as_ref().map_or(0, Vec::len),
        result.suggestions.as_ref().map_or(0, Vec::len)
    );

    Ok(result)
}

/// Handle the lookup command - return the table entry for one property, if any
pub fn handle_lookup_command(args: &LookupArgs) -> Result<Option<PropertyEntry>> {
    let config = load_config(args.config.as_deref())?;
    let table = PropertyTable::from_config(&config);
    Ok(table.lookup(&args.property).cloned())
}

/// Write file atomically by writing to a fresh temp file in the same
/// directory, then renaming it over `path`
#[cfg(feature = "cli")]
fn write_atomic<P: AsRef<Path>>(path: P, content: &str) -> std::io::Result<()> {
    use std::io::Write;

    let path = path.as_ref();
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(parent)?;

    let mut file = tempfile::NamedTempFile::new_in(parent)?;
    file.write_all(content.as_bytes())?;
    file.as_file().sync_all()?;
    file.persist(path)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[cfg(feature = "cli")]
    #[test]
    fn test_write_atomic_creates_parents() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let target = temp_dir.path().join("nested/dir/result.json");

        write_atomic(&target, "{}").unwrap();

        assert_eq!(std::fs::read_to_string(&target).unwrap(), "{}");
        let entries: Vec<_> = std::fs::read_dir(target.parent().unwrap()).unwrap().collect();
        assert_eq!(entries.len(), 1);
    }

    #[cfg(feature = "cli")]
    #[test]
    fn test_write_atomic_leaves_siblings_alone() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let sibling = temp_dir.path().join("result.tmp");
        let target = temp_dir.path().join("result.json");
        std::fs::write(&sibling, ".a { margin: 0 }").unwrap();

        write_atomic(&target, "{}").unwrap();
        write_atomic(&target, "[]").unwrap();

        assert_eq!(std::fs::read_to_string(&sibling).unwrap(), ".a { margin: 0 }");
        assert_eq!(std::fs::read_to_string(&target).unwrap(), "[]");
    }

    #[test]
    fn test_convert_css_uses_default_table() {
        let result = convert_css(&ConvertRequest::new(".a { display: flex }")).unwrap();
        assert_eq!(result.tailwind_classes, "flex");
    }
}
