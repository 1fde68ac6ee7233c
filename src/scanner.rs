//! Placeholder scanner
//!
//! Finds the `{{...}}` spans of a source string, left to right, without
//! overlap. Each span ends at the first `}}` and starts at the closest `{{`
//! before it, so handlebars never nest.

use crate::parser::ast::Span;

const OPEN: &str = "{{";
const CLOSE: &str = "}}";

/// A `{{...}}` span of the source, delimiters included
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placeholder<'a> {
    pub text: &'a str,
    pub span: Span,
}

impl<'a> Placeholder<'a> {
    /// Text between the delimiters, whitespace untouched
    pub fn body(&self) -> &'a str {
        &self.text[OPEN.len()..self.text.len() - CLOSE.len()]
    }

    /// Absolute offset of the body in the source
    pub fn body_offset(&self) -> usize {
        self.span.start + OPEN.len()
    }

    /// Whether the body holds nothing but whitespace
    pub fn is_blank(&self) -> bool {
        self.body().trim().is_empty()
    }
}

/// Lazy iterator over the placeholders of a source string
///
/// Clones are independent and continue from the same position.
#[derive(Debug, Clone)]
pub struct Placeholders<'a> {
    source: &'a str,
    pos: usize,
}

/// Scan `source` for placeholders
pub fn scan(source: &str) -> Placeholders<'_> {
    Placeholders { source, pos: 0 }
}

impl<'a> Iterator for Placeholders<'a> {
    type Item = Placeholder<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let rest = &self.source[self.pos..];
        let first_open = rest.find(OPEN)?;
        let close = match rest[first_open + OPEN.len()..].find(CLOSE) {
            Some(p) => first_open + OPEN.len() + p,
            None => {
                self.pos = self.source.len();
                return None;
            }
        };
        // `{{a {{b()}}` and `{{{b()}}` both start at the last `{{`
        let open = first_open + rest[first_open..close].rfind(OPEN).unwrap_or(0);

        let start = self.pos + open;
        let end = self.pos + close + CLOSE.len();
        self.pos = end;
        Some(Placeholder {
            text: &self.source[start..end],
            span: start..end,
        })
    }
}
