//! CSS source → flat list of declarations.
//!
//! Rules, nested rules and at-rule blocks are walked in source order and every
//! `property: value` pair found inside a block is emitted. Selectors and
//! at-rule preludes are not interpreted.

use crate::errors::CssSyntaxError;
use cssparser::{
    Delimiter, Delimiters, ParseError, ParseErrorKind, Parser, ParserInput, SourceLocation, Token,
};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

static COMMENT: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)/\*.*?\*/").expect("comment pattern"));
static IMPORTANT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)!\s*important\s*$").expect("important pattern"));
static PROPERTY_NAME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(--[A-Za-z0-9_-]+|-?[A-Za-z_][A-Za-z0-9_-]*)$").expect("property pattern")
});
static WHITESPACE_OR_STRING: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#""(?:[^"\\]|\\.)*"|'(?:[^'\\]|\\.)*'|\s+"#).expect("whitespace pattern")
});

/// Deepest `{}` nesting accepted before the input is rejected
pub const MAX_NESTING_DEPTH: usize = 128;

type ParseResult<'i, T> = Result<T, ParseError<'i, CssSyntaxError>>;

/// A single `property: value` pair taken from a rule body
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Declaration {
    /// Property name as written
    pub property: String,

    /// Value with comments removed and whitespace outside strings collapsed
    pub value: String,

    /// Whether the declaration carried `!important`
    #[serde(default)]
    pub important: bool,
}

impl Declaration {
    pub fn new(property: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            property: property.into(),
            value: value.into(),
            important: false,
        }
    }

    /// Mark the declaration as `!important`
    pub fn important(mut self) -> Self {
        self.important = true;
        self
    }
}

/// Collapse whitespace runs to a single space and trim the ends.
///
/// Quoted strings are copied unchanged.
pub fn collapse_whitespace(value: &str) -> String {
    WHITESPACE_OR_STRING
        .replace_all(value.trim(), |caps: &regex::Captures<'_>| {
            let matched = &caps[0];
            if matched.starts_with('"') || matched.starts_with('\'') {
                matched.to_string()
            } else {
                " ".to_string()
            }
        })
        .into_owned()
}

/// Source of declarations for the conversion service.
///
/// The default implementation is [`StylesheetParser`]; tests and embedders
/// can supply their own.
pub trait DeclarationSource {
    /// Parse `css` into declarations, in source order
    fn parse_declarations(&self, css: &str) -> Result<Vec<Declaration>, CssSyntaxError>;
}

/// Stylesheet parser backed by the `cssparser` tokenizer
#[derive(Debug, Clone, Copy, Default)]
pub struct StylesheetParser;

impl StylesheetParser {
    pub fn new() -> Self {
        Self
    }
}

impl DeclarationSource for StylesheetParser {
    fn parse_declarations(&self, css: &str) -> Result<Vec<Declaration>, CssSyntaxError> {
        // cssparser closes unterminated blocks at EOF, so balance is checked up front
        check_balance(css)?;

        let mut input = ParserInput::new(css);
        let mut parser = Parser::new(&mut input);
        let mut declarations = Vec::new();

        parse_stylesheet(&mut parser, &mut declarations).map_err(into_syntax_error)?;

        log::trace!("parsed {} declarations", declarations.len());
        Ok(declarations)
    }
}

/// What the next top-level or block-level item starts with
enum Item {
    Separator,
    AtRule,
    Other,
}

fn next_item<'i>(parser: &mut Parser<'i, '_>) -> ParseResult<'i, Item> {
    let item = match parser.next()? {
        Token::Semicolon => Item::Separator,
        Token::AtKeyword(_) => Item::AtRule,
        _ => Item::Other,
    };
    Ok(item)
}

fn parse_stylesheet<'i>(parser: &mut Parser<'i, '_>, out: &mut Vec<Declaration>) -> ParseResult<'i, ()> {
    loop {
        parser.skip_whitespace();
        if parser.is_exhausted() {
            return Ok(());
        }

        let location = parser.current_source_location();
        let state = parser.state();
        match next_item(parser)? {
            Item::Separator => continue,
            Item::AtRule => parse_at_rule(parser, out)?,
            Item::Other => {
                parser.reset(&state);
                parse_rule(parser, location, out)?;
            }
        }
    }
}

/// Top-level qualified rule: `<selector> { <body> }`
fn parse_rule<'i>(
    parser: &mut Parser<'i, '_>,
    location: SourceLocation,
    out: &mut Vec<Declaration>,
) -> ParseResult<'i, ()> {
    let start = parser.position();
    skip_until(parser, Delimiter::Semicolon | Delimiter::CurlyBracketBlock)?;
    let prelude = parser.slice_from(start).trim();

    let opens_block = matches!(parser.next(), Ok(Token::CurlyBracketBlock));
    if !opens_block {
        // A bare declaration outside of any rule ends up here
        return Err(parser.new_custom_error(CssSyntaxError::at(
            location,
            format!("Unknown word `{}`, expected a rule block", prelude),
        )));
    }

    parser.parse_nested_block(|block| parse_rule_body(block, out))
}

/// `@name <prelude>;` or `@name <prelude> { <body> }`
fn parse_at_rule<'i>(parser: &mut Parser<'i, '_>, out: &mut Vec<Declaration>) -> ParseResult<'i, ()> {
    skip_until(parser, Delimiter::Semicolon | Delimiter::CurlyBracketBlock)?;

    let opens_block = matches!(parser.next(), Ok(Token::CurlyBracketBlock));
    if opens_block {
        parser.parse_nested_block(|block| parse_rule_body(block, out))?;
    }
    Ok(())
}

/// Contents of a `{ ... }` block: declarations, nested rules and at-rules
fn parse_rule_body<'i>(parser: &mut Parser<'i, '_>, out: &mut Vec<Declaration>) -> ParseResult<'i, ()> {
    loop {
        parser.skip_whitespace();
        if parser.is_exhausted() {
            return Ok(());
        }

        let location = parser.current_source_location();
        let state = parser.state();
        match next_item(parser)? {
            Item::Separator => continue,
            Item::AtRule => parse_at_rule(parser, out)?,
            Item::Other => {
                parser.reset(&state);
                parse_body_item(parser, location, out)?;
            }
        }
    }
}

fn parse_body_item<'i>(
    parser: &mut Parser<'i, '_>,
    location: SourceLocation,
    out: &mut Vec<Declaration>,
) -> ParseResult<'i, ()> {
    let start = parser.position();
    skip_until(parser, Delimiter::Semicolon | Delimiter::CurlyBracketBlock)?;
    let text = parser.slice_from(start);

    // Either `;`, `{` or the end of the enclosing block follows
    let opens_block = matches!(parser.next(), Ok(Token::CurlyBracketBlock));
    if opens_block {
        return parser.parse_nested_block(|block| parse_rule_body(block, out));
    }

    match parse_declaration(text, location) {
        Ok(declaration) => {
            out.push(declaration);
            Ok(())
        }
        Err(err) => Err(parser.new_custom_error(err)),
    }
}

/// Consume tokens up to (not including) one of `delimiters`
fn skip_until<'i>(parser: &mut Parser<'i, '_>, delimiters: Delimiters) -> ParseResult<'i, ()> {
    parser.parse_until_before(delimiters, |inner| {
        while inner.next_including_whitespace_and_comments().is_ok() {}
        Ok(())
    })
}

fn parse_declaration(text: &str, location: SourceLocation) -> Result<Declaration, CssSyntaxError> {
    let source = COMMENT.replace_all(text, "");
    let source = source.trim();
    let unknown_word = || CssSyntaxError::at(location, format!("Unknown word `{}`", source));

    let (name, value) = source.split_once(':').ok_or_else(unknown_word)?;
    let name = name.trim();
    if !PROPERTY_NAME.is_match(name) {
        return Err(unknown_word());
    }

    let important = IMPORTANT.is_match(value);
    let value = if important {
        IMPORTANT.replace(value, "")
    } else {
        value.into()
    };

    Ok(Declaration {
        property: name.to_string(),
        value: collapse_whitespace(&value),
        important,
    })
}

fn into_syntax_error(err: ParseError<'_, CssSyntaxError>) -> CssSyntaxError {
    match err.kind {
        ParseErrorKind::Custom(inner) => inner,
        ParseErrorKind::Basic(kind) => CssSyntaxError::at(err.location, format!("{:?}", kind)),
    }
}

#[derive(Debug, Clone, Copy)]
struct Cursor {
    line: u32,
    column: u32,
}

impl Cursor {
    fn bump(&mut self, ch: char) {
        if ch == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
    }
}

/// Reject unbalanced braces, blocks nested past [`MAX_NESTING_DEPTH`],
/// unclosed strings and unclosed comments
fn check_balance(css: &str) -> Result<(), CssSyntaxError> {
    let mut cursor = Cursor { line: 1, column: 1 };
    let mut open_blocks: Vec<Cursor> = Vec::new();
    let mut quote: Option<(char, Cursor)> = None;
    let mut comment: Option<Cursor> = None;
    let mut chars = css.chars().peekable();

    while let Some(ch) = chars.next() {
        let here = cursor;
        cursor.bump(ch);

        if comment.is_some() {
            if ch == '*' && chars.peek() == Some(&'/') {
                chars.next();
                cursor.bump('/');
                comment = None;
            }
            continue;
        }

        if let Some((delimiter, opened_at)) = quote {
            match ch {
                '\\' => {
                    if let Some(escaped) = chars.next() {
                        cursor.bump(escaped);
                    }
                }
                '\n' => {
                    return Err(CssSyntaxError::new(opened_at.line, opened_at.column, "Unclosed string"));
                }
                c if c == delimiter => quote = None,
                _ => {}
            }
            continue;
        }

        match ch {
            '/' if chars.peek() == Some(&'*') => {
                chars.next();
                cursor.bump('*');
                comment = Some(here);
            }
            '"' | '\'' => quote = Some((ch, here)),
            '\\' => {
                if let Some(escaped) = chars.next() {
                    cursor.bump(escaped);
                }
            }
            '{' => {
                if open_blocks.len() >= MAX_NESTING_DEPTH {
                    return Err(CssSyntaxError::new(here.line, here.column, "Nesting too deep"));
                }
                open_blocks.push(here);
            }
            '}' => {
                if open_blocks.pop().is_none() {
                    return Err(CssSyntaxError::new(here.line, here.column, "Unexpected `}`"));
                }
            }
            _ => {}
        }
    }

    if let Some(at) = comment {
        return Err(CssSyntaxError::new(at.line, at.column, "Unclosed comment"));
    }
    if let Some((_, at)) = quote {
        return Err(CssSyntaxError::new(at.line, at.column, "Unclosed string"));
    }
    if let Some(at) = open_blocks.pop() {
        return Err(CssSyntaxError::new(at.line, at.column, "Unclosed block"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(css: &str) -> Result<Vec<Declaration>, CssSyntaxError> {
        StylesheetParser::new().parse_declarations(css)
    }

    #[test]
    fn test_parses_declarations_in_order() {
        let declarations = parse(".a { margin: 0; padding: 1rem } .b { width: 100% }").unwrap();
        assert_eq!(
            declarations,
            vec![
                Declaration::new("margin", "0"),
                Declaration::new("padding", "1rem"),
                Declaration::new("width", "100%"),
            ]
        );
    }

    #[test]
    fn test_collapses_whitespace_and_strips_comments() {
        let declarations = parse(".a {\n  margin:   0\n    auto /* centered */;\n}").unwrap();
        assert_eq!(declarations, vec![Declaration::new("margin", "0 auto")]);
    }

    #[test]
    fn test_important_is_recorded() {
        let declarations = parse(".a { margin: 1rem !important; }").unwrap();
        assert_eq!(declarations, vec![Declaration::new("margin", "1rem").important()]);
    }

    #[test]
    fn test_property_spelling_is_kept() {
        let declarations = parse(".a { MARGIN: 0; --Brand-Color: #fff }").unwrap();
        assert_eq!(declarations[0].property, "MARGIN");
        assert_eq!(declarations[1].property, "--Brand-Color");
    }

    #[test]
    fn test_whitespace_inside_strings_is_kept() {
        let declarations = parse(".a::before { content: \"a   b\";  font-family:  'My   Font',\n  serif }").unwrap();
        assert_eq!(declarations[0].value, "\"a   b\"");
        assert_eq!(declarations[1].value, "'My   Font', serif");
    }

    #[test]
    fn test_collapse_whitespace() {
        assert_eq!(collapse_whitespace("  0 \t\n auto "), "0 auto");
        assert_eq!(collapse_whitespace(r#""x  \"  y"  1fr"#), r#""x  \"  y" 1fr"#);
    }

    #[test]
    fn test_nesting_limit() {
        let nested = |depth: usize| format!("{}margin: 0;{}", ".a { ".repeat(depth), "}".repeat(depth));

        let declarations = parse(&nested(MAX_NESTING_DEPTH)).unwrap();
        assert_eq!(declarations, vec![Declaration::new("margin", "0")]);

        let err = parse(&nested(MAX_NESTING_DEPTH + 1)).unwrap_err();
        assert_eq!(err.reason, "Nesting too deep");
        assert_eq!((err.line, err.column), (1, 5 * MAX_NESTING_DEPTH as u32 + 4));
    }

    #[test]
    fn test_functions_survive_intact() {
        let declarations =
            parse(".grid { grid-template-columns: repeat(3, minmax(0, 1fr)); filter: blur(5px) }").unwrap();
        assert_eq!(declarations[0].value, "repeat(3, minmax(0, 1fr))");
        assert_eq!(declarations[1].value, "blur(5px)");
    }

    #[test]
    fn test_walks_media_and_nested_rules() {
        let css = r#"
            @import url("base.css");
            @media (min-width: 640px) {
                .a { display: flex; }
            }
            .b {
                color: #fff;
                &:hover { color: #000; }
            }
        "#;
        let declarations = parse(css).unwrap();
        let properties: Vec<_> = declarations.iter().map(|d| d.value.as_str()).collect();
        assert_eq!(properties, vec!["flex", "#fff", "#000"]);
    }

    #[test]
    fn test_empty_value_is_a_declaration() {
        let declarations = parse(".a { display: ; }").unwrap();
        assert_eq!(declarations, vec![Declaration::new("display", "")]);
    }

    #[test]
    fn test_rejects_word_without_colon() {
        let err = parse(".el { invalid-syntax }").unwrap_err();
        assert!(err.reason.contains("invalid-syntax"), "{}", err);
        assert_eq!(err.line, 1);
    }

    #[test]
    fn test_rejects_bare_declaration() {
        let err = parse("margin: 0;").unwrap_err();
        assert!(err.reason.contains("rule block"), "{}", err);
    }

    #[test]
    fn test_rejects_unbalanced_braces() {
        let unclosed = parse(".a { margin: 0;").unwrap_err();
        assert_eq!(unclosed.reason, "Unclosed block");
        assert_eq!((unclosed.line, unclosed.column), (1, 4));

        let stray = parse(".a { margin: 0; } }").unwrap_err();
        assert_eq!(stray.reason, "Unexpected `}`");
    }

    #[test]
    fn test_braces_inside_strings_are_ignored() {
        let declarations = parse(".a::after { content: \"}\"; }").unwrap();
        assert_eq!(declarations[0].value, "\"}\"");
    }

    #[test]
    fn test_rejects_unclosed_comment() {
        let err = parse(".a { margin: 0 } /* trailing").unwrap_err();
        assert_eq!(err.reason, "Unclosed comment");
    }
}
