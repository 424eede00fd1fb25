use crate::parser::Declaration;
use crate::resolver::{Resolution, ValueResolver};
use crate::table::PropertyTable;

/// Tailwind's important modifier
const IMPORTANT_PREFIX: &str = "!";

/// Buckets filled while converting one batch of declarations.
///
/// Every declaration ends up either in `matched_classes` or in
/// `unsupported`; arbitrary-value classes additionally leave a suggestion.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConversionOutcome {
    pub matched_classes: Vec<String>,
    pub unsupported: Vec<String>,
    pub suggestions: Vec<String>,
}

impl ConversionOutcome {
    /// Number of declarations accounted for
    pub fn declaration_count(&self) -> usize {
        self.matched_classes.len() + self.unsupported.len()
    }
}

/// Runs a [`ValueResolver`] over declarations in source order
#[derive(Debug, Clone, Copy)]
pub struct DeclarationConverter<'a> {
    resolver: ValueResolver<'a>,
}

impl<'a> DeclarationConverter<'a> {
    pub fn new(table: &'a PropertyTable) -> Self {
        Self {
            resolver: ValueResolver::new(table),
        }
    }

    pub fn convert(&self, declarations: &[Declaration]) -> ConversionOutcome {
        let mut outcome = ConversionOutcome::default();

        for declaration in declarations {
            match self.resolver.resolve(&declaration.property, &declaration.value) {
                Resolution::Exact(class) => {
                    outcome.matched_classes.push(with_importance(class, declaration.important));
                }
                Resolution::Arbitrary(class) => {
                    let class = with_importance(class, declaration.important);
                    outcome.suggestions.push(format!(
                        "Consider using {} for {}: {}",
                        class, declaration.property, declaration.value
                    ));
                    outcome.matched_classes.push(class);
                }
                Resolution::Unsupported => {
                    outcome
                        .unsupported
                        .push(format!("{}: {}", declaration.property, declaration.value));
                }
            }
        }

        log::debug!(
            "converted {} declarations: {} classes ({} arbitrary), {} unsupported",
            declarations.len(),
            outcome.matched_classes.len(),
            outcome.suggestions.len(),
            outcome.unsupported.len()
        );
        outcome
    }
}

fn with_importance(class: String, important: bool) -> String {
    if important {
        format!("{}{}", IMPORTANT_PREFIX, class)
    } else {
        class
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn convert(declarations: &[Declaration]) -> ConversionOutcome {
        let table = PropertyTable::new();
        DeclarationConverter::new(&table).convert(declarations)
    }

    #[test]
    fn test_buckets() {
        let outcome = convert(&[
            Declaration::new("margin", "1rem"),
            Declaration::new("margin", "1.75rem"),
            Declaration::new("filter", "blur(5px)"),
        ]);

        assert_eq!(outcome.matched_classes, vec!["m-4", "m-[1.75rem]"]);
        assert_eq!(outcome.unsupported, vec!["filter: blur(5px)"]);
        assert_eq!(
            outcome.suggestions,
            vec!["Consider using m-[1.75rem] for margin: 1.75rem"]
        );
        assert_eq!(outcome.declaration_count(), 3);
    }

    #[test]
    fn test_order_is_preserved() {
        let outcome = convert(&[
            Declaration::new("display", "flex"),
            Declaration::new("justify-content", "center"),
            Declaration::new("padding", "0.5rem"),
        ]);
        assert_eq!(outcome.matched_classes, vec!["flex", "justify-center", "p-2"]);
    }

    #[test]
    fn test_duplicates_are_kept() {
        let outcome = convert(&[
            Declaration::new("display", "block"),
            Declaration::new("display", "block"),
            Declaration::new("filter", "none"),
            Declaration::new("filter", "none"),
        ]);
        assert_eq!(outcome.matched_classes, vec!["block", "block"]);
        assert_eq!(outcome.unsupported, vec!["filter: none", "filter: none"]);
    }

    #[test]
    fn test_empty_value_is_unsupported() {
        let outcome = convert(&[Declaration::new("display", "")]);
        assert!(outcome.matched_classes.is_empty());
        assert_eq!(outcome.unsupported, vec!["display: "]);
    }

    #[test]
    fn test_important_modifier() {
        let outcome = convert(&[
            Declaration::new("margin", "1rem").important(),
            Declaration::new("margin", "1.75rem").important(),
            Declaration::new("filter", "blur(5px)").important(),
        ]);
        assert_eq!(outcome.matched_classes, vec!["!m-4", "!m-[1.75rem]"]);
        assert_eq!(
            outcome.suggestions,
            vec!["Consider using !m-[1.75rem] for margin: 1.75rem"]
        );
        assert_eq!(outcome.unsupported, vec!["filter: blur(5px)"]);
    }

    #[test]
    fn test_every_declaration_is_accounted_for() {
        let properties = ["margin", "display", "filter", "width", "position", "color"];
        let values = ["0", "1rem", "block", "auto", "13px", "", "relative", "#fff"];

        let mut declarations = Vec::new();
        for property in properties {
            for value in values {
                declarations.push(Declaration::new(property, value));
            }
        }

        let outcome = convert(&declarations);
        assert_eq!(outcome.declaration_count(), declarations.len());
    }
}
