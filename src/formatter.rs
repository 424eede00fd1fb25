use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Selector written by [`OutputMode::Component`] unless configured otherwise
pub const DEFAULT_COMPONENT_SELECTOR: &str = ".component";

/// Shape of the rendered class list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase", from = "String")]
pub enum OutputMode {
    /// `flex justify-center`
    #[default]
    Classes,
    /// `class="flex justify-center"`
    Inline,
    /// A rule applying the classes with `@apply`
    Component,
}

impl OutputMode {
    /// Parse a mode name; anything unrecognized means `classes`
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "inline" => OutputMode::Inline,
            "component" => OutputMode::Component,
            _ => OutputMode::Classes,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            OutputMode::Classes => "classes",
            OutputMode::Inline => "inline",
            OutputMode::Component => "component",
        }
    }
}

impl From<String> for OutputMode {
    fn from(name: String) -> Self {
        Self::from_name(&name)
    }
}

impl fmt::Display for OutputMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Renders converted classes in one of the [`OutputMode`] shapes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputFormatter {
    component_selector: String,
}

impl OutputFormatter {
    pub fn new() -> Self {
        Self::with_selector(DEFAULT_COMPONENT_SELECTOR)
    }

    pub fn with_selector(selector: impl Into<String>) -> Self {
        Self {
            component_selector: selector.into(),
        }
    }

    pub fn component_selector(&self) -> &str {
        &self.component_selector
    }

    pub fn format(&self, classes: &[String], mode: OutputMode) -> String {
        let joined = classes.join(" ");

        match mode {
            OutputMode::Classes => joined,
            OutputMode::Inline => format!("class=\"{}\"", joined),
            // An empty `@apply ;` is invalid CSS, so no classes means an empty rule
            OutputMode::Component if joined.is_empty() => {
                format!("{} {{\n}}", self.component_selector)
            }
            OutputMode::Component => {
                format!("{} {{\n  @apply {};\n}}", self.component_selector, joined)
            }
        }
    }
}

impl Default for OutputFormatter {
    fn default() -> Self {
        Self::new()
    }
}

/// Format with the default component selector
pub fn format_classes(classes: &[String], mode: OutputMode) -> String {
    OutputFormatter::new().format(classes, mode)
}
