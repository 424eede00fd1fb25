use crate::config::ConverterConfig;
use crate::converter::DeclarationConverter;
use crate::errors::{ConverterError, CssSyntaxError, Result};
use crate::formatter::{OutputFormatter, OutputMode};
use crate::parser::{DeclarationSource, StylesheetParser};
use crate::table::PropertyTable;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;

/// Suggestion returned for empty input
pub const EMPTY_INPUT_SUGGESTION: &str = "Provide some CSS to convert";

/// Validated `convert_css` parameters
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConvertRequest {
    /// Raw CSS text; may hold any number of rules
    pub css: String,

    /// Output shape, `classes` when omitted
    #[serde(default)]
    pub mode: OutputMode,
}

impl ConvertRequest {
    pub fn new(css: impl Into<String>) -> Self {
        Self {
            css: css.into(),
            mode: OutputMode::default(),
        }
    }

    pub fn with_mode(mut self, mode: OutputMode) -> Self {
        self.mode = mode;
        self
    }

    /// Validate a loosely typed parameter object.
    ///
    /// `css` must be a string. A missing, null or unrecognized `mode` means
    /// `classes`.
    pub fn from_params(params: &Value) -> Result<Self> {
        let object = params
            .as_object()
            .ok_or_else(|| ConverterError::InvalidInput("parameters must be a JSON object".to_string()))?;

        let css = match object.get("css") {
            Some(Value::String(css)) => css.clone(),
            Some(other) => {
                return Err(ConverterError::InvalidInput(format!(
                    "`css` must be a string, got {}",
                    json_type_name(other)
                )))
            }
            None => {
                return Err(ConverterError::InvalidInput(
                    "missing required parameter `css`".to_string(),
                ))
            }
        };

        let mode = match object.get("mode") {
            Some(Value::String(name)) => OutputMode::from_name(name),
            None | Some(Value::Null) => OutputMode::default(),
            Some(other) => {
                log::warn!("ignoring non-string mode ({}), using classes", json_type_name(other));
                OutputMode::default()
            }
        };

        Ok(Self { css, mode })
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Result of one conversion, in the shape callers serialize
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversionResult {
    /// Classes rendered in the requested mode
    pub tailwind_classes: String,

    /// `property: value` pairs that have no utility-class equivalent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unsupported_styles: Option<Vec<String>>,

    /// Hints about arbitrary-value classes, or about empty input
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suggestions: Option<Vec<String>>,
}

impl ConversionResult {
    fn empty_input() -> Self {
        Self {
            tailwind_classes: String::new(),
            unsupported_styles: None,
            suggestions: Some(vec![EMPTY_INPUT_SUGGESTION.to_string()]),
        }
    }
}

/// Entry point of the conversion engine.
///
/// Holds a shared read-only [`PropertyTable`]; the service itself carries no
/// mutable state, so one instance can serve any number of concurrent calls.
#[derive(Debug, Clone)]
pub struct ConversionService<P = StylesheetParser> {
    table: Arc<PropertyTable>,
    parser: P,
    formatter: OutputFormatter,
}

impl ConversionService<StylesheetParser> {
    /// Service over the process-wide default table
    pub fn new() -> Self {
        Self::with_table(PropertyTable::shared_default())
    }

    pub fn with_table(table: Arc<PropertyTable>) -> Self {
        Self::with_parser(table, StylesheetParser::new())
    }

    /// Service whose table and component selector come from `config`
    pub fn from_config(config: &ConverterConfig) -> Self {
        Self::with_table(Arc::new(PropertyTable::from_config(config)))
            .with_formatter(OutputFormatter::with_selector(config.output.component_selector.clone()))
    }
}

impl Default for ConversionService<StylesheetParser> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P: DeclarationSource> ConversionService<P> {
    pub fn with_parser(table: Arc<PropertyTable>, parser: P) -> Self {
        Self {
            table,
            parser,
            formatter: OutputFormatter::new(),
        }
    }

    pub fn with_formatter(mut self, formatter: OutputFormatter) -> Self {
        self.formatter = formatter;
        self
    }

    pub fn table(&self) -> &PropertyTable {
        &self.table
    }

    /// Convert the CSS of `request` into utility classes.
    ///
    /// Fails only when the CSS cannot be parsed; anything that parses yields
    /// a (possibly partial) result.
    pub fn convert(&self, request: &ConvertRequest) -> std::result::Result<ConversionResult, CssSyntaxError> {
        if request.css.trim().is_empty() {
            return Ok(ConversionResult::empty_input());
        }

        let declarations = self.parser.parse_declarations(&request.css)?;
        let outcome = DeclarationConverter::new(&self.table).convert(&declarations);
        let tailwind_classes = self.formatter.format(&outcome.matched_classes, request.mode);

        Ok(ConversionResult {
            tailwind_classes,
            unsupported_styles: non_empty(outcome.unsupported),
            suggestions: non_empty(outcome.suggestions),
        })
    }
}

impl<P: DeclarationSource + Sync> ConversionService<P> {
    /// Convert independent requests in parallel; results keep input order
    pub fn convert_batch(
        &self,
        requests: &[ConvertRequest],
    ) -> Vec<std::result::Result<ConversionResult, CssSyntaxError>> {
        requests.par_iter().map(|request| self.convert(request)).collect()
    }
}

fn non_empty(items: Vec<String>) -> Option<Vec<String>> {
    if items.is_empty() {
        None
    } else {
        Some(items)
    }
}
