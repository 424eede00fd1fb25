use crate::parser::collapse_whitespace;
use crate::table::PropertyTable;

/// How a single `property: value` pair maps onto utility classes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// A predefined class expresses the value exactly
    Exact(String),
    /// No predefined class; a bracketed arbitrary-value class was built
    Arbitrary(String),
    /// The property is unknown, or has no arbitrary form for this value
    Unsupported,
}

/// Resolves declarations against a [`PropertyTable`]
#[derive(Debug, Clone, Copy)]
pub struct ValueResolver<'a> {
    table: &'a PropertyTable,
}

impl<'a> ValueResolver<'a> {
    pub fn new(table: &'a PropertyTable) -> Self {
        Self { table }
    }

    /// Exact table match first, then `<abbrev>-[<value>]`, else unsupported
    pub fn resolve(&self, property: &str, value: &str) -> Resolution {
        let Some(entry) = self.table.lookup(property) else {
            return Resolution::Unsupported;
        };

        let value = collapse_whitespace(value);
        if let Some(class) = entry.class_for(&value) {
            return Resolution::Exact(class.to_string());
        }

        match entry.abbreviation() {
            Some(abbreviation) if !value.is_empty() => {
                Resolution::Arbitrary(arbitrary_class(abbreviation, &value))
            }
            _ => Resolution::Unsupported,
        }
    }
}

/// `m` + `0 auto` -> `m-[0_auto]`
pub fn arbitrary_class(abbreviation: &str, value: &str) -> String {
    let cleaned = value.split_whitespace().collect::<Vec<_>>().join("_");
    format!("{}-[{}]", abbreviation, cleaned)
}
