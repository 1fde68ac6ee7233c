//! Placeholder replacement over a whole template

use tracing::warn;

use crate::config::Grammar;
use crate::context::Context;
use crate::error::{InterpolationError, ResolveError, SyntaxError};
use crate::helper::HelperRegistry;
use crate::resolver::Resolver;
use crate::scanner::{scan, Placeholder};

/// Result of a non-strict replacement
#[derive(Debug, Clone, PartialEq)]
pub struct Rendered {
    /// Source with every resolvable placeholder replaced
    pub output: String,
    /// One record per placeholder that failed, in source order
    pub errors: Vec<InterpolationError>,
}

impl Rendered {
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Replaces placeholders using a fixed registry and grammar
///
/// A `Replacer` holds no per-call state, so one instance can serve any number
/// of templates, from several threads if the helpers allow it.
#[derive(Debug, Clone, Default)]
pub struct Replacer {
    registry: HelperRegistry,
    grammar: Grammar,
}

impl Replacer {
    /// Create a replacer with the default grammar
    pub fn new(registry: HelperRegistry) -> Self {
        Self {
            registry,
            grammar: Grammar::default(),
        }
    }

    /// Set the grammar
    pub fn with_grammar(mut self, grammar: Grammar) -> Self {
        self.grammar = grammar;
        self
    }

    pub fn registry(&self) -> &HelperRegistry {
        &self.registry
    }

    pub fn grammar(&self) -> &Grammar {
        &self.grammar
    }

    /// Check if a helper is registered
    pub fn helper_exists(&self, name: &str) -> bool {
        self.registry.exists(name)
    }

    /// Wrap a source string into a [`Template`] bound to this replacer
    pub fn template(&self, source: impl Into<String>) -> Template<'_> {
        Template::new(source, self)
    }

    fn resolver(&self) -> Resolver<'_> {
        Resolver::new(&self.registry, &self.grammar)
    }

    /// Whether `source` holds at least one well-formed helper placeholder
    pub fn is_replaceable(&self, source: &str) -> bool {
        let resolver = self.resolver();
        scan(source).any(|p| resolver.is_call(&p))
    }

    /// Replace every placeholder, recording failures instead of stopping
    ///
    /// A placeholder that fails is copied to the output unchanged.
    pub fn render(&self, source: &str, context: &Context) -> Rendered {
        let mut errors = Vec::new();
        let output = self.run(source, context, |err| {
            warn!(error = %err, "placeholder left unresolved");
            errors.push(err);
            Ok(())
        });
        Rendered {
            // the error sink never aborts
            output: output.unwrap_or_default(),
            errors,
        }
    }

    /// Replace every placeholder, stopping at the first failure
    pub fn render_strict(&self, source: &str, context: &Context) -> Result<String, InterpolationError> {
        self.run(source, context, Err)
    }

    /// Placeholders that look like helper calls but do not parse
    ///
    /// Spans are relative to `source`. Placeholders without a `(` are plain
    /// text and never reported.
    pub fn lint(&self, source: &str) -> Vec<SyntaxError> {
        let resolver = self.resolver();
        scan(source)
            .filter(|p| p.body().contains('('))
            .filter_map(|p| {
                let offset = p.body_offset();
                resolver
                    .parse(&p)
                    .err()
                    .map(|errs| errs.into_iter().map(move |e| e.shifted(offset)))
            })
            .flatten()
            .collect()
    }

    fn run<F>(&self, source: &str, context: &Context, mut on_error: F) -> Result<String, InterpolationError>
    where
        F: FnMut(InterpolationError) -> Result<(), InterpolationError>,
    {
        let resolver = self.resolver();
        let mut output = String::with_capacity(source.len());
        let mut copied = 0;
        for placeholder in scan(source) {
            output.push_str(&source[copied..placeholder.span.start]);
            copied = placeholder.span.end;
            match resolver.resolve(&placeholder, context) {
                Ok(Some(value)) => output.push_str(&value),
                Ok(None) => output.push_str(placeholder.text),
                Err(error) => {
                    on_error(record(&placeholder, error))?;
                    output.push_str(placeholder.text);
                }
            }
        }
        output.push_str(&source[copied..]);
        Ok(output)
    }
}

fn record(placeholder: &Placeholder<'_>, error: ResolveError) -> InterpolationError {
    InterpolationError::new(error, placeholder.text, placeholder.span.clone())
}

/// A source string bound to a [`Replacer`]
///
/// Keeps the errors of the last [`replace`](Template::replace) call.
#[derive(Debug, Clone)]
pub struct Template<'r> {
    source: String,
    replacer: &'r Replacer,
    errors: Vec<InterpolationError>,
}

impl<'r> Template<'r> {
    pub fn new(source: impl Into<String>, replacer: &'r Replacer) -> Self {
        Self {
            source: source.into(),
            replacer,
            errors: Vec::new(),
        }
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    /// Replace placeholders, recording failures in [`errors`](Template::errors)
    pub fn replace(&mut self, context: &Context) -> String {
        let rendered = self.replacer.render(&self.source, context);
        self.errors = rendered.errors;
        rendered.output
    }

    /// Replace placeholders, returning the first failure as an error
    ///
    /// The error list is empty afterwards whatever the outcome.
    pub fn replace_strict(&mut self, context: &Context) -> Result<String, InterpolationError> {
        self.errors.clear();
        self.replacer.render_strict(&self.source, context)
    }

    /// Failures of the last [`replace`](Template::replace) call
    pub fn errors(&self) -> &[InterpolationError] {
        &self.errors
    }

    pub fn helper_exists(&self, name: &str) -> bool {
        self.replacer.helper_exists(name)
    }

    pub fn is_replaceable(&self) -> bool {
        self.replacer.is_replaceable(&self.source)
    }
}
