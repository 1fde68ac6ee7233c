//! Lexer for placeholder bodies using logos

use logos::Logos;

use super::ast::Span;

#[derive(Logos, Debug, Clone, PartialEq)]
#[logos(skip r"[ \t\n\r\f]+")]
pub enum Token {
    #[token("(")]
    ParenOpen,
    #[token(")")]
    ParenClose,

    // Helper names and bare argument words share one token; hyphen policy is
    // enforced by the grammar
    #[regex(r"[a-zA-Z0-9_-]+", |lex| lex.slice().to_string())]
    Ident(String),

    // Anything else that is not whitespace (quotes, commas, dots, ...)
    #[regex(r"[^ \t\n\r\fa-zA-Z0-9_()-]", |lex| lex.slice().chars().next())]
    Symbol(char),
}

/// Lex a placeholder body into tokens with spans
pub fn lex(input: &str) -> impl Iterator<Item = (Token, Span)> + '_ {
    Token::lexer(input)
        .spanned()
        .filter_map(|(tok, span)| tok.ok().map(|t| (t, span)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_call() {
        let tokens: Vec<_> = lex("capitalize(john)").map(|(t, _)| t).collect();
        assert_eq!(
            tokens,
            vec![
                Token::Ident("capitalize".to_string()),
                Token::ParenOpen,
                Token::Ident("john".to_string()),
                Token::ParenClose,
            ]
        );
    }

    #[test]
    fn test_whitespace_skipped() {
        let tokens: Vec<_> = lex("   user_name( )   ").map(|(t, _)| t).collect();
        assert_eq!(
            tokens,
            vec![
                Token::Ident("user_name".to_string()),
                Token::ParenOpen,
                Token::ParenClose,
            ]
        );
    }

    #[test]
    fn test_hyphenated_ident() {
        let tokens: Vec<_> = lex("format-date(2024-01-01)").map(|(t, _)| t).collect();
        assert_eq!(
            tokens,
            vec![
                Token::Ident("format-date".to_string()),
                Token::ParenOpen,
                Token::Ident("2024-01-01".to_string()),
                Token::ParenClose,
            ]
        );
    }

    #[test]
    fn test_symbols() {
        let tokens: Vec<_> = lex(r#"'a',"b"."#).map(|(t, _)| t).collect();
        assert_eq!(
            tokens,
            vec![
                Token::Symbol('\''),
                Token::Ident("a".to_string()),
                Token::Symbol('\''),
                Token::Symbol(','),
                Token::Symbol('"'),
                Token::Ident("b".to_string()),
                Token::Symbol('"'),
                Token::Symbol('.'),
            ]
        );
    }

    #[test]
    fn test_spans_point_into_input() {
        let input = "  a( b c )";
        let spans: Vec<_> = lex(input).map(|(_, s)| s).collect();
        assert_eq!(spans, vec![2..3, 3..4, 5..6, 7..8, 9..10]);
        assert_eq!(&input[5..8], "b c");
    }

    #[test]
    fn test_non_ascii_symbol() {
        let tokens: Vec<_> = lex("é").map(|(t, _)| t).collect();
        assert_eq!(tokens, vec![Token::Symbol('é')]);
    }
}
