//! Parser for placeholder bodies using chumsky
//!
//! A body is exactly one helper call, possibly wrapping further calls:
//!
//! ```text
//! call     := name "(" argument? ")"
//! argument := call | literal
//! ```
//!
//! A literal is every token up to the closing parenthesis. It is taken as the
//! raw source slice so inner whitespace survives, and it may not contain a
//! parenthesis, which keeps the innermost call unambiguous.

use chumsky::input::{Stream, ValueInput};
use chumsky::prelude::*;

use crate::config::Grammar;
use crate::error::SyntaxError;
use crate::parser::ast::*;
use crate::parser::lexer::Token;

/// Parse a placeholder body (the text between `{{` and `}}`) into a call
///
/// Spans in the result and in errors are relative to `body`.
pub fn parse(body: &str, grammar: &Grammar) -> Result<Call, Vec<SyntaxError>> {
    let len = body.len();

    let token_iter = crate::parser::lexer::lex(body).map(|(tok, span)| (tok, span.into()));

    let token_stream = Stream::from_iter(token_iter)
        .map((len..len).into(), |(t, s): (_, _)| (t, s));

    let call = call_parser(body)
        .parse(token_stream)
        .into_result()
        .map_err(|errs| errs.into_iter().map(|e| e.into()).collect::<Vec<_>>())?;

    let errors = validate(&call, grammar);
    if errors.is_empty() {
        Ok(call)
    } else {
        Err(errors)
    }
}

/// Check names and literals of a structurally valid call against the grammar
fn validate(call: &Call, grammar: &Grammar) -> Vec<SyntaxError> {
    let mut errors = Vec::new();
    for call in call.chain() {
        if !grammar.accepts_name(call.name()) {
            errors.push(SyntaxError::Syntax {
                span: call.name.span.clone(),
                message: format!("'{}' is not a valid helper name", call.name()),
                expected: vec![],
            });
        }
        if let Argument::Literal(lit) = &call.argument {
            if let Some((at, c)) = lit.node.char_indices().find(|(_, c)| !grammar.allows(*c)) {
                let start = lit.span.start + at;
                errors.push(SyntaxError::Syntax {
                    span: start..start + c.len_utf8(),
                    message: format!("character '{}' is not allowed in a helper argument", c),
                    expected: vec![],
                });
            }
        }
    }
    errors
}

/// Helper to extract span range from chumsky's MapExtra
fn span_range(e: &impl chumsky::span::Span<Offset = usize>) -> std::ops::Range<usize> {
    e.start()..e.end()
}

fn call_parser<'a, I>(body: &'a str) -> impl Parser<'a, I, Call, extra::Err<Rich<'a, Token>>> + Clone
where
    I: ValueInput<'a, Token = Token, Span = SimpleSpan>,
{
    let name = select! {
        Token::Ident(s) => s,
    }
    .map_with(|s, e| Spanned::new(s, span_range(&e.span())));

    // Everything up to the closing parenthesis, taken verbatim from the body
    let literal = any()
        .filter(|tok: &Token| !matches!(tok, Token::ParenOpen | Token::ParenClose))
        .repeated()
        .at_least(1)
        .map_with(move |_, e| {
            let range = span_range(&e.span());
            Argument::Literal(Spanned::new(body[range.clone()].to_string(), range))
        });

    let call = recursive(|call| {
        name.clone()
            .then(
                choice((
                    call.map(|inner: Call| Argument::Call(Box::new(inner))),
                    literal.clone(),
                ))
                .or_not()
                .delimited_by(just(Token::ParenOpen), just(Token::ParenClose)),
            )
            .map_with(|(name, argument), e| Call {
                name,
                argument: argument.unwrap_or(Argument::Empty),
                span: span_range(&e.span()),
            })
            .boxed()
    });

    call.then_ignore(end())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Charset, QuotePolicy};

    fn parse_default(body: &str) -> Result<Call, Vec<SyntaxError>> {
        parse(body, &Grammar::default())
    }

    fn literal(call: &Call) -> &str {
        match &call.argument {
            Argument::Literal(lit) => &lit.node,
            other => panic!("Expected literal, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_single_call() {
        let call = parse_default("capitalize(john)").expect("Should parse");
        assert_eq!(call.name(), "capitalize");
        assert_eq!(literal(&call), "john");
        assert_eq!(call.span, 0..16);
    }

    #[test]
    fn test_parse_empty_argument() {
        let call = parse_default("user_name()").expect("Should parse");
        assert_eq!(call.name(), "user_name");
        assert_eq!(call.argument, Argument::Empty);
    }

    #[test]
    fn test_parse_surrounding_whitespace() {
        let call = parse_default("     user_name()     ").expect("Should parse");
        assert_eq!(call.name(), "user_name");
        assert_eq!(call.span, 5..16);
    }

    #[test]
    fn test_parse_nested_calls() {
        let call = parse_default("swapcase(capitalize(john))").expect("Should parse");
        let names: Vec<_> = call.chain().iter().map(|c| c.name()).collect();
        assert_eq!(names, vec!["swapcase", "capitalize"]);
        assert_eq!(literal(call.innermost()), "john");
        assert_eq!(call.innermost().span, 9..25);
    }

    #[test]
    fn test_parse_whitespace_around_parens() {
        let call = parse_default(" a ( b ( 'x  y' ) ) ").expect("Should parse");
        assert_eq!(call.depth(), 2);
        assert_eq!(literal(call.innermost()), "'x  y'");
    }

    #[test]
    fn test_parse_literal_with_commas_and_quotes() {
        let call = parse_default(r#"join("a, b", c)"#).expect("Should parse");
        assert_eq!(literal(&call), r#""a, b", c"#);
    }

    #[test]
    fn test_quotes_are_not_stripped_by_parser() {
        let grammar = Grammar::new().with_quotes(QuotePolicy::StripMatching);
        let call = parse("date('now')", &grammar).expect("Should parse");
        assert_eq!(literal(&call), "'now'");
    }

    #[test]
    fn test_parse_extended_charset() {
        assert!(parse_default(r"path(a/b\c+d*e)").is_ok());

        let standard = Grammar::new().with_charset(Charset::Standard);
        let errors = parse(r"path(a/b)", &standard).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].span(), &(6..7));
        assert!(errors[0].to_string().contains("character '/'"));
    }

    #[test]
    fn test_parse_rejects_disallowed_char() {
        let errors = parse_default("shout(hey!)").unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(errors[0]
            .to_string()
            .contains("character '!' is not allowed"));
    }

    #[test]
    fn test_parse_hyphenated_name() {
        assert!(parse_default("format-date(today)").is_ok());

        let grammar = Grammar::new().with_hyphenated_names(false);
        let errors = parse("format-date(today)", &grammar).unwrap_err();
        assert!(errors[0]
            .to_string()
            .contains("'format-date' is not a valid helper name"));
    }

    #[test]
    fn test_parse_rejects_empty_body() {
        assert!(parse_default("").is_err());
        assert!(parse_default("   ").is_err());
    }

    #[test]
    fn test_parse_rejects_plain_text() {
        assert!(parse_default("hello").is_err());
        assert!(parse_default("hello world").is_err());
    }

    #[test]
    fn test_parse_rejects_unbalanced_parens() {
        assert!(parse_default("a(b(c)").is_err());
        assert!(parse_default("a(b))").is_err());
    }

    #[test]
    fn test_parse_rejects_trailing_text() {
        assert!(parse_default("a(b) extra").is_err());
        assert!(parse_default("a(b(c) d)").is_err());
    }

    #[test]
    fn test_parse_rejects_sibling_calls() {
        assert!(parse_default("a(x) b(y)").is_err());
    }

    #[test]
    fn test_error_span_is_body_relative() {
        let errors = parse_default("a(b c) )").unwrap_err();
        assert_eq!(errors[0].span(), &(7..8));
    }
}
