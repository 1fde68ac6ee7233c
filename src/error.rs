//! Error types for parsing, resolution and registration

use ariadne::{Color, Label, Report, ReportKind, Source};
use thiserror::Error;

use crate::parser::lexer::Token;

/// Byte range in source text
pub type Span = std::ops::Range<usize>;

/// A placeholder body that looks like a helper call but does not parse
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SyntaxError {
    #[error("Syntax error at {span:?}: {message}")]
    Syntax {
        span: Span,
        message: String,
        expected: Vec<String>,
    },
}

impl SyntaxError {
    pub fn span(&self) -> &Span {
        match self {
            SyntaxError::Syntax { span, .. } => span,
        }
    }

    /// Move the span by `offset` bytes, from body-relative to source-relative
    pub fn shifted(self, offset: usize) -> Self {
        match self {
            SyntaxError::Syntax {
                span,
                message,
                expected,
            } => SyntaxError::Syntax {
                span: span.start + offset..span.end + offset,
                message,
                expected,
            },
        }
    }

    /// Format the error with source context using ariadne
    pub fn format(&self, source: &str, filename: &str) -> String {
        let mut buf = Vec::new();
        match self {
            SyntaxError::Syntax {
                span,
                message,
                expected,
            } => {
                let expected_str = if expected.is_empty() {
                    String::new()
                } else {
                    format!("\nExpected: {}", expected.join(", "))
                };

                Report::build(ReportKind::Error, filename, span.start)
                    .with_message(message)
                    .with_label(
                        Label::new((filename, span.clone()))
                            .with_message(format!("{}{}", message, expected_str))
                            .with_color(Color::Red),
                    )
                    .finish()
                    .write((filename, Source::from(source)), &mut buf)
                    .unwrap();
            }
        }
        String::from_utf8(buf).unwrap()
    }
}

impl<'a> From<chumsky::error::Rich<'a, Token>> for SyntaxError {
    fn from(err: chumsky::error::Rich<'a, Token>) -> Self {
        use chumsky::error::RichReason;

        let message = match err.reason() {
            RichReason::ExpectedFound { found, .. } => {
                let found_str = match found {
                    Some(tok) => format_token(tok),
                    None => "end of placeholder".to_string(),
                };
                format!("Unexpected {}", found_str)
            }
            RichReason::Custom(msg) => msg.to_string(),
        };

        let expected: Vec<String> = err
            .expected()
            .filter_map(|e| match e {
                chumsky::error::RichPattern::Token(tok) => Some(format_token(tok)),
                chumsky::error::RichPattern::Label(label) => Some(label.to_string()),
                chumsky::error::RichPattern::EndOfInput => Some("end of placeholder".to_string()),
                chumsky::error::RichPattern::Identifier(s) => Some(format!("identifier '{}'", s)),
                chumsky::error::RichPattern::Any => Some("any token".to_string()),
                chumsky::error::RichPattern::SomethingElse => None,
            })
            .collect();

        SyntaxError::Syntax {
            span: err.span().into_range(),
            message,
            expected,
        }
    }
}

/// Format a token for human-readable error messages
fn format_token(tok: &Token) -> String {
    match tok {
        Token::Ident(s) => format!("name '{}'", s),
        Token::Symbol(c) => format!("'{}'", c),
        Token::ParenOpen => "'('".to_string(),
        Token::ParenClose => "')'".to_string(),
    }
}

/// Failure to evaluate one helper call
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ResolveError {
    /// The call names a helper absent from the registry
    #[error("Unregistered helper '{name}'")]
    UnregisteredHelper { name: String },

    /// A zero-argument helper got an argument, or the other way around
    #[error("helper '{name}' takes {expected} argument(s), {found} given")]
    ArityMismatch {
        name: String,
        expected: usize,
        found: usize,
    },

    /// The helper itself reported a failure
    #[error("{message}")]
    HelperFailed { name: String, message: String },
}

impl ResolveError {
    pub fn unregistered(name: impl Into<String>) -> Self {
        Self::UnregisteredHelper { name: name.into() }
    }

    /// Name of the helper involved in the failure
    pub fn helper(&self) -> &str {
        match self {
            ResolveError::UnregisteredHelper { name }
            | ResolveError::ArityMismatch { name, .. }
            | ResolveError::HelperFailed { name, .. } => name,
        }
    }
}

/// Error record for one placeholder that could not be resolved
#[derive(Error, Debug, Clone, PartialEq)]
#[error("{error} while interpolating '{placeholder}'")]
pub struct InterpolationError {
    pub error: ResolveError,
    /// Literal placeholder text, delimiters included
    pub placeholder: String,
    /// Location of the placeholder in the template source
    pub span: Span,
}

impl InterpolationError {
    pub fn new(error: ResolveError, placeholder: impl Into<String>, span: Span) -> Self {
        Self {
            error,
            placeholder: placeholder.into(),
            span,
        }
    }

    /// Format the error with source context using ariadne
    pub fn format(&self, source: &str, filename: &str) -> String {
        let mut buf = Vec::new();
        let kind = match &self.error {
            ResolveError::UnregisteredHelper { .. } => ReportKind::Error,
            ResolveError::ArityMismatch { .. } => ReportKind::Error,
            ResolveError::HelperFailed { .. } => ReportKind::Warning,
        };
        Report::build(kind, filename, self.span.start)
            .with_message(self.to_string())
            .with_label(
                Label::new((filename, self.span.clone()))
                    .with_message(format!("helper '{}': {}", self.error.helper(), self.error))
                    .with_color(Color::Yellow),
            )
            .finish()
            .write((filename, Source::from(source)), &mut buf)
            .unwrap();
        String::from_utf8(buf).unwrap()
    }
}

/// Failure reported by a helper function
#[derive(Error, Debug, Clone, PartialEq)]
#[error("{message}")]
pub struct HelperError {
    pub message: String,
}

impl HelperError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl From<String> for HelperError {
    fn from(message: String) -> Self {
        Self::new(message)
    }
}

impl From<&str> for HelperError {
    fn from(message: &str) -> Self {
        Self::new(message)
    }
}

/// Errors raised while editing a helper registry
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RegistryError {
    #[error("invalid helper name '{name}': only letters, digits, '_' and '-' are allowed")]
    InvalidName { name: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interpolation_message() {
        let err = InterpolationError::new(
            ResolveError::unregistered("some_unknown_helper"),
            "{{some_unknown_helper(john)}}",
            11..40,
        );
        assert_eq!(
            err.to_string(),
            "Unregistered helper 'some_unknown_helper' while interpolating '{{some_unknown_helper(john)}}'"
        );
    }

    #[test]
    fn test_helper_failure_keeps_message() {
        let err = ResolveError::HelperFailed {
            name: "fail".to_string(),
            message: "disk on fire".to_string(),
        };
        assert_eq!(err.to_string(), "disk on fire");
        assert_eq!(err.helper(), "fail");
    }

    #[test]
    fn test_shifted_span() {
        let err = SyntaxError::Syntax {
            span: 3..5,
            message: "Unexpected ')'".to_string(),
            expected: vec![],
        };
        assert_eq!(err.shifted(10).span(), &(13..15));
    }

    #[test]
    fn test_format_mentions_placeholder() {
        let source = "Hi {{nope(x)}}!";
        let err = InterpolationError::new(ResolveError::unregistered("nope"), "{{nope(x)}}", 3..14);
        let report = err.format(source, "greeting.txt");
        assert!(report.contains("greeting.txt"));
        assert!(report.contains("Unregistered helper 'nope'"));
    }
}
