use crate::config::ConverterConfig;
use crate::parser::collapse_whitespace;
use indexmap::IndexMap;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Process-wide default table, built on first use and never mutated
static DEFAULT_TABLE: Lazy<Arc<PropertyTable>> = Lazy::new(|| Arc::new(PropertyTable::new()));

/// Tailwind spacing scale as `(suffix, css value)`.
///
/// `1.75rem` (`7`) is left out on purpose so it resolves through the
/// arbitrary-value path.
const SPACING_SCALE: &[(&str, &str)] = &[
    ("0", "0"),
    ("px", "1px"),
    ("0.5", "0.125rem"),
    ("1", "0.25rem"),
    ("1.5", "0.375rem"),
    ("2", "0.5rem"),
    ("2.5", "0.625rem"),
    ("3", "0.75rem"),
    ("3.5", "0.875rem"),
    ("4", "1rem"),
    ("5", "1.25rem"),
    ("6", "1.5rem"),
    ("8", "2rem"),
    ("10", "2.5rem"),
    ("12", "3rem"),
    ("16", "4rem"),
    ("20", "5rem"),
    ("24", "6rem"),
];

/// Properties that take the spacing scale, with their class prefix
const SPACING_PROPERTIES: &[(&str, &str)] = &[
    ("margin", "m"),
    ("margin-top", "mt"),
    ("margin-right", "mr"),
    ("margin-bottom", "mb"),
    ("margin-left", "ml"),
    ("padding", "p"),
    ("padding-top", "pt"),
    ("padding-right", "pr"),
    ("padding-bottom", "pb"),
    ("padding-left", "pl"),
    ("gap", "gap"),
    ("row-gap", "gap-y"),
    ("column-gap", "gap-x"),
    ("width", "w"),
    ("height", "h"),
    ("top", "top"),
    ("right", "right"),
    ("bottom", "bottom"),
    ("left", "left"),
];

/// Color properties and the prefix their theme colors use
const COLOR_PROPERTIES: &[(&str, &str)] = &[
    ("color", "text"),
    ("background-color", "bg"),
    ("border-color", "border"),
];

const BASE_COLORS: &[(&str, &str)] = &[
    ("#000", "black"),
    ("#000000", "black"),
    ("black", "black"),
    ("#fff", "white"),
    ("#ffffff", "white"),
    ("white", "white"),
    ("transparent", "transparent"),
    ("currentColor", "current"),
    ("inherit", "inherit"),
];

/// One utility class and the literal CSS value it stands for
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassValue {
    pub class: String,
    pub value: String,
}

/// Known values of one CSS property.
///
/// Values are kept in insertion order and are unique; the first literal
/// added wins.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertyEntry {
    values: Vec<ClassValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    abbreviation: Option<String>,
}

impl PropertyEntry {
    /// Entry that supports arbitrary values through `abbreviation`
    pub fn new(abbreviation: impl Into<String>) -> Self {
        Self {
            values: Vec::new(),
            abbreviation: Some(abbreviation.into()),
        }
    }

    /// Entry with no arbitrary-value form
    pub fn keywords_only() -> Self {
        Self::default()
    }

    pub fn with_value(mut self, value: &str, class: &str) -> Self {
        self.push(value, class);
        self
    }

    pub fn with_values(mut self, pairs: &[(&str, &str)]) -> Self {
        for (value, class) in pairs {
            self.push(*value, *class);
        }
        self
    }

    /// Append a value; returns `false` if the literal is already mapped
    pub fn push(&mut self, value: impl Into<String>, class: impl Into<String>) -> bool {
        let value = value.into();
        if self.values.iter().any(|known| known.value == value) {
            return false;
        }
        self.values.push(ClassValue {
            class: class.into(),
            value,
        });
        true
    }

    pub fn set_abbreviation(&mut self, abbreviation: impl Into<String>) {
        self.abbreviation = Some(abbreviation.into());
    }

    pub fn abbreviation(&self) -> Option<&str> {
        self.abbreviation.as_deref()
    }

    pub fn values(&self) -> &[ClassValue] {
        &self.values
    }

    /// First class whose literal equals `value`
    pub fn class_for(&self, value: &str) -> Option<&str> {
        self.values
            .iter()
            .find(|known| known.value == value)
            .map(|known| known.class.as_str())
    }
}

/// Mapping from CSS property name to the utility classes that express it
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertyTable {
    entries: IndexMap<String, PropertyEntry>,
}

impl PropertyTable {
    /// Table with no properties
    pub fn empty() -> Self {
        Self::default()
    }

    /// Table populated with the built-in Tailwind defaults
    pub fn new() -> Self {
        let mut table = Self::empty();
        table.add_spacing();
        table.add_sizing();
        table.add_layout();
        table.add_flexbox();
        table.add_grid();
        table.add_typography();
        table.add_decoration();
        table
    }

    /// Shared handle to the process-wide default table
    pub fn shared_default() -> Arc<Self> {
        Arc::clone(&DEFAULT_TABLE)
    }

    /// Default table extended with the theme and property overrides of `config`
    pub fn from_config(config: &ConverterConfig) -> Self {
        let mut table = Self::new();
        let extend = &config.theme.extend;

        for (name, value) in &extend.spacing {
            for (property, prefix) in SPACING_PROPERTIES {
                table.push_value(property, value, &format!("{}-{}", prefix, name));
            }
        }

        for (name, value) in &extend.colors {
            for (property, prefix) in COLOR_PROPERTIES {
                table.push_value(property, value, &format!("{}-{}", prefix, name));
            }
        }

        for (name, families) in &extend.font_family {
            table.push_value("font-family", &families.join(", "), &format!("font-{}", name));
        }

        for (property, overrides) in &config.properties {
            let entry = table.entry_mut(property);
            if let Some(abbreviation) = &overrides.abbreviation {
                entry.set_abbreviation(abbreviation.clone());
            }
            for (value, class) in &overrides.values {
                if !entry.push(collapse_whitespace(value), class.clone()) {
                    log::warn!(
                        "ignoring `{}: {}` -> `{}`, value is already mapped",
                        property,
                        value,
                        class
                    );
                }
            }
        }

        table
    }

    /// Insert or replace the entry for `property`
    pub fn insert(&mut self, property: &str, entry: PropertyEntry) {
        self.entries.insert(property.to_ascii_lowercase(), entry);
    }

    /// Entry for `property`, created without an abbreviation if missing
    pub fn entry_mut(&mut self, property: &str) -> &mut PropertyEntry {
        self.entries.entry(property.to_ascii_lowercase()).or_default()
    }

    pub fn lookup(&self, property: &str) -> Option<&PropertyEntry> {
        match self.entries.get(property) {
            Some(entry) => Some(entry),
            None => self.entries.get(&property.to_ascii_lowercase()),
        }
    }

    pub fn abbreviation_for(&self, property: &str) -> Option<&str> {
        self.lookup(property).and_then(PropertyEntry::abbreviation)
    }

    /// Property names in table order
    pub fn properties(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn push_value(&mut self, property: &str, value: &str, class: &str) {
        if !self.entry_mut(property).push(collapse_whitespace(value), class) {
            log::warn!("ignoring `{}: {}` -> `{}`, value is already mapped", property, value, class);
        }
    }

    fn add_spacing(&mut self) {
        for (property, prefix) in SPACING_PROPERTIES {
            let mut entry = PropertyEntry::new(*prefix);
            for (suffix, value) in SPACING_SCALE {
                entry.push(*value, format!("{}-{}", prefix, suffix));
            }
            entry.push("0px", format!("{}-0", prefix));
            if property.starts_with("margin") {
                entry.push("auto", format!("{}-auto", prefix));
            }
            self.insert(property, entry);
        }
    }

    fn add_sizing(&mut self) {
        let width = self.entry_mut("width");
        for (value, class) in [
            ("auto", "w-auto"),
            ("100%", "w-full"),
            ("100vw", "w-screen"),
            ("50%", "w-1/2"),
            ("33.333333%", "w-1/3"),
            ("66.666667%", "w-2/3"),
            ("25%", "w-1/4"),
            ("75%", "w-3/4"),
            ("min-content", "w-min"),
            ("max-content", "w-max"),
            ("fit-content", "w-fit"),
        ] {
            width.push(value, class);
        }

        let height = self.entry_mut("height");
        for (value, class) in [
            ("auto", "h-auto"),
            ("100%", "h-full"),
            ("100vh", "h-screen"),
            ("50%", "h-1/2"),
            ("min-content", "h-min"),
            ("max-content", "h-max"),
            ("fit-content", "h-fit"),
        ] {
            height.push(value, class);
        }

        self.insert(
            "min-width",
            PropertyEntry::new("min-w").with_values(&[
                ("0", "min-w-0"),
                ("100%", "min-w-full"),
                ("min-content", "min-w-min"),
                ("max-content", "min-w-max"),
                ("fit-content", "min-w-fit"),
            ]),
        );
        self.insert(
            "min-height",
            PropertyEntry::new("min-h").with_values(&[
                ("0", "min-h-0"),
                ("100%", "min-h-full"),
                ("100vh", "min-h-screen"),
                ("min-content", "min-h-min"),
                ("max-content", "min-h-max"),
                ("fit-content", "min-h-fit"),
            ]),
        );
        self.insert(
            "max-width",
            PropertyEntry::new("max-w").with_values(&[
                ("none", "max-w-none"),
                ("20rem", "max-w-xs"),
                ("24rem", "max-w-sm"),
                ("28rem", "max-w-md"),
                ("32rem", "max-w-lg"),
                ("36rem", "max-w-xl"),
                ("42rem", "max-w-2xl"),
                ("48rem", "max-w-3xl"),
                ("56rem", "max-w-4xl"),
                ("64rem", "max-w-5xl"),
                ("72rem", "max-w-6xl"),
                ("80rem", "max-w-7xl"),
                ("100%", "max-w-full"),
                ("65ch", "max-w-prose"),
            ]),
        );
        self.insert(
            "max-height",
            PropertyEntry::new("max-h").with_values(&[
                ("none", "max-h-none"),
                ("100%", "max-h-full"),
                ("100vh", "max-h-screen"),
            ]),
        );
    }

    fn add_layout(&mut self) {
        self.insert(
            "display",
            PropertyEntry::keywords_only().with_values(&[
                ("block", "block"),
                ("inline-block", "inline-block"),
                ("inline", "inline"),
                ("flex", "flex"),
                ("inline-flex", "inline-flex"),
                ("grid", "grid"),
                ("inline-grid", "inline-grid"),
                ("table", "table"),
                ("contents", "contents"),
                ("flow-root", "flow-root"),
                ("none", "hidden"),
            ]),
        );
        self.insert(
            "position",
            PropertyEntry::keywords_only().with_values(&[
                ("static", "static"),
                ("fixed", "fixed"),
                ("absolute", "absolute"),
                ("relative", "relative"),
                ("sticky", "sticky"),
            ]),
        );

        for side in ["top", "right", "bottom", "left"] {
            let entry = self.entry_mut(side);
            entry.push("auto", format!("{}-auto", side));
            entry.push("100%", format!("{}-full", side));
            entry.push("50%", format!("{}-1/2", side));
        }

        self.insert(
            "z-index",
            PropertyEntry::new("z").with_values(&[
                ("0", "z-0"),
                ("10", "z-10"),
                ("20", "z-20"),
                ("30", "z-30"),
                ("40", "z-40"),
                ("50", "z-50"),
                ("auto", "z-auto"),
            ]),
        );
        self.insert(
            "overflow",
            PropertyEntry::keywords_only().with_values(&[
                ("auto", "overflow-auto"),
                ("hidden", "overflow-hidden"),
                ("clip", "overflow-clip"),
                ("visible", "overflow-visible"),
                ("scroll", "overflow-scroll"),
            ]),
        );
        self.insert(
            "visibility",
            PropertyEntry::keywords_only().with_values(&[
                ("visible", "visible"),
                ("hidden", "invisible"),
                ("collapse", "collapse"),
            ]),
        );
        self.insert(
            "box-sizing",
            PropertyEntry::keywords_only().with_values(&[
                ("border-box", "box-border"),
                ("content-box", "box-content"),
            ]),
        );
    }

    fn add_flexbox(&mut self) {
        self.insert(
            "flex-direction",
            PropertyEntry::keywords_only().with_values(&[
                ("row", "flex-row"),
                ("row-reverse", "flex-row-reverse"),
                ("column", "flex-col"),
                ("column-reverse", "flex-col-reverse"),
            ]),
        );
        self.insert(
            "flex-wrap",
            PropertyEntry::keywords_only().with_values(&[
                ("wrap", "flex-wrap"),
                ("wrap-reverse", "flex-wrap-reverse"),
                ("nowrap", "flex-nowrap"),
            ]),
        );
        self.insert(
            "flex",
            PropertyEntry::new("flex").with_values(&[
                ("1 1 0%", "flex-1"),
                ("1 1 auto", "flex-auto"),
                ("0 1 auto", "flex-initial"),
                ("none", "flex-none"),
            ]),
        );
        self.insert(
            "flex-grow",
            PropertyEntry::new("grow").with_values(&[("1", "grow"), ("0", "grow-0")]),
        );
        self.insert(
            "flex-shrink",
            PropertyEntry::new("shrink").with_values(&[("1", "shrink"), ("0", "shrink-0")]),
        );
        self.insert(
            "justify-content",
            PropertyEntry::keywords_only().with_values(&[
                ("normal", "justify-normal"),
                ("flex-start", "justify-start"),
                ("start", "justify-start"),
                ("flex-end", "justify-end"),
                ("end", "justify-end"),
                ("center", "justify-center"),
                ("space-between", "justify-between"),
                ("space-around", "justify-around"),
                ("space-evenly", "justify-evenly"),
                ("stretch", "justify-stretch"),
            ]),
        );
        self.insert(
            "align-items",
            PropertyEntry::keywords_only().with_values(&[
                ("flex-start", "items-start"),
                ("start", "items-start"),
                ("flex-end", "items-end"),
                ("end", "items-end"),
                ("center", "items-center"),
                ("baseline", "items-baseline"),
                ("stretch", "items-stretch"),
            ]),
        );
        self.insert(
            "align-self",
            PropertyEntry::keywords_only().with_values(&[
                ("auto", "self-auto"),
                ("flex-start", "self-start"),
                ("flex-end", "self-end"),
                ("center", "self-center"),
                ("stretch", "self-stretch"),
                ("baseline", "self-baseline"),
            ]),
        );
    }

    fn add_grid(&mut self) {
        let mut columns = PropertyEntry::new("grid-cols");
        for count in 1..=12 {
            columns.push(
                format!("repeat({}, minmax(0, 1fr))", count),
                format!("grid-cols-{}", count),
            );
        }
        columns.push("none", "grid-cols-none");
        self.insert("grid-template-columns", columns);

        let mut rows = PropertyEntry::new("grid-rows");
        for count in 1..=6 {
            rows.push(
                format!("repeat({}, minmax(0, 1fr))", count),
                format!("grid-rows-{}", count),
            );
        }
        rows.push("none", "grid-rows-none");
        self.insert("grid-template-rows", rows);
    }

    fn add_typography(&mut self) {
        self.insert(
            "font-size",
            PropertyEntry::new("text").with_values(&[
                ("0.75rem", "text-xs"),
                ("0.875rem", "text-sm"),
                ("1rem", "text-base"),
                ("1.125rem", "text-lg"),
                ("1.25rem", "text-xl"),
                ("1.5rem", "text-2xl"),
                ("1.875rem", "text-3xl"),
                ("2.25rem", "text-4xl"),
                ("3rem", "text-5xl"),
                ("3.75rem", "text-6xl"),
                ("4.5rem", "text-7xl"),
                ("6rem", "text-8xl"),
                ("8rem", "text-9xl"),
            ]),
        );
        self.insert(
            "font-weight",
            PropertyEntry::new("font").with_values(&[
                ("100", "font-thin"),
                ("200", "font-extralight"),
                ("300", "font-light"),
                ("400", "font-normal"),
                ("normal", "font-normal"),
                ("500", "font-medium"),
                ("600", "font-semibold"),
                ("700", "font-bold"),
                ("bold", "font-bold"),
                ("800", "font-extrabold"),
                ("900", "font-black"),
            ]),
        );
        self.insert(
            "font-family",
            PropertyEntry::new("font").with_values(&[
                ("ui-sans-serif, system-ui, sans-serif", "font-sans"),
                ("ui-serif, Georgia, Cambria, \"Times New Roman\", Times, serif", "font-serif"),
                ("ui-monospace, SFMono-Regular, Menlo, Monaco, Consolas, monospace", "font-mono"),
            ]),
        );
        self.insert(
            "text-align",
            PropertyEntry::keywords_only().with_values(&[
                ("left", "text-left"),
                ("center", "text-center"),
                ("right", "text-right"),
                ("justify", "text-justify"),
                ("start", "text-start"),
                ("end", "text-end"),
            ]),
        );
        self.insert(
            "line-height",
            PropertyEntry::new("leading").with_values(&[
                ("1", "leading-none"),
                ("1.25", "leading-tight"),
                ("1.375", "leading-snug"),
                ("1.5", "leading-normal"),
                ("1.625", "leading-relaxed"),
                ("2", "leading-loose"),
                ("0.75rem", "leading-3"),
                ("1rem", "leading-4"),
                ("1.25rem", "leading-5"),
                ("1.5rem", "leading-6"),
                ("1.75rem", "leading-7"),
                ("2rem", "leading-8"),
                ("2.25rem", "leading-9"),
                ("2.5rem", "leading-10"),
            ]),
        );
        self.insert(
            "letter-spacing",
            PropertyEntry::new("tracking").with_values(&[
                ("-0.05em", "tracking-tighter"),
                ("-0.025em", "tracking-tight"),
                ("0", "tracking-normal"),
                ("0em", "tracking-normal"),
                ("0.025em", "tracking-wide"),
                ("0.05em", "tracking-wider"),
                ("0.1em", "tracking-widest"),
            ]),
        );
        self.insert(
            "text-transform",
            PropertyEntry::keywords_only().with_values(&[
                ("uppercase", "uppercase"),
                ("lowercase", "lowercase"),
                ("capitalize", "capitalize"),
                ("none", "normal-case"),
            ]),
        );
    }

    fn add_decoration(&mut self) {
        for (property, prefix) in COLOR_PROPERTIES {
            let mut entry = PropertyEntry::new(*prefix);
            for (value, name) in BASE_COLORS {
                entry.push(*value, format!("{}-{}", prefix, name));
            }
            self.insert(property, entry);
        }

        self.insert(
            "border-width",
            PropertyEntry::new("border").with_values(&[
                ("0", "border-0"),
                ("0px", "border-0"),
                ("1px", "border"),
                ("2px", "border-2"),
                ("4px", "border-4"),
                ("8px", "border-8"),
            ]),
        );
        self.insert(
            "border-radius",
            PropertyEntry::new("rounded").with_values(&[
                ("0", "rounded-none"),
                ("0.125rem", "rounded-sm"),
                ("0.25rem", "rounded"),
                ("0.375rem", "rounded-md"),
                ("0.5rem", "rounded-lg"),
                ("0.75rem", "rounded-xl"),
                ("1rem", "rounded-2xl"),
                ("1.5rem", "rounded-3xl"),
                ("9999px", "rounded-full"),
            ]),
        );

        let mut opacity = PropertyEntry::new("opacity");
        for percent in [0u32, 5, 10, 20, 25, 30, 40, 50, 60, 70, 75, 80, 90, 95, 100] {
            let value = match percent {
                0 => "0".to_string(),
                100 => "1".to_string(),
                p => format!("{}", p as f64 / 100.0),
            };
            opacity.push(value, format!("opacity-{}", percent));
        }
        self.insert("opacity", opacity);

        self.insert(
            "cursor",
            PropertyEntry::new("cursor").with_values(&[
                ("auto", "cursor-auto"),
                ("default", "cursor-default"),
                ("pointer", "cursor-pointer"),
                ("wait", "cursor-wait"),
                ("text", "cursor-text"),
                ("move", "cursor-move"),
                ("not-allowed", "cursor-not-allowed"),
            ]),
        );
    }
}
