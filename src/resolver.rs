//! Innermost-first evaluation of the helper calls inside one placeholder

use tracing::{debug, trace};

use crate::config::Grammar;
use crate::context::Context;
use crate::error::{ResolveError, SyntaxError};
use crate::helper::HelperRegistry;
use crate::parser::{self, Argument, Call};
use crate::scanner::Placeholder;

/// Resolves placeholders against a registry under a grammar
#[derive(Debug, Clone, Copy)]
pub struct Resolver<'r> {
    registry: &'r HelperRegistry,
    grammar: &'r Grammar,
}

impl<'r> Resolver<'r> {
    pub fn new(registry: &'r HelperRegistry, grammar: &'r Grammar) -> Self {
        Self { registry, grammar }
    }

    /// Parse the body of a placeholder
    ///
    /// Spans of the returned call or errors are relative to the body.
    pub fn parse(&self, placeholder: &Placeholder<'_>) -> Result<Call, Vec<SyntaxError>> {
        parser::parse(placeholder.body(), self.grammar)
    }

    /// Whether the placeholder holds a well-formed helper call
    pub fn is_call(&self, placeholder: &Placeholder<'_>) -> bool {
        self.parse(placeholder).is_ok()
    }

    /// Compute the replacement text of a placeholder
    ///
    /// `Ok(None)` means the placeholder is not a helper call (empty, blank,
    /// plain text or malformed) and must stay as it is.
    pub fn resolve(
        &self,
        placeholder: &Placeholder<'_>,
        context: &Context,
    ) -> Result<Option<String>, ResolveError> {
        if placeholder.is_blank() {
            trace!(placeholder = placeholder.text, "blank placeholder, left as is");
            return Ok(None);
        }
        let call = match self.parse(placeholder) {
            Ok(call) => call,
            Err(_) => {
                trace!(placeholder = placeholder.text, "not a helper call, left as is");
                return Ok(None);
            }
        };
        let value = self.evaluate(&call, context)?;
        debug!(
            placeholder = placeholder.text,
            depth = call.depth(),
            innermost = call.innermost().name(),
            value = %value,
            "resolved placeholder"
        );
        Ok(Some(value))
    }

    /// Evaluate a call chain, innermost call first
    ///
    /// The result of each call becomes the argument of the enclosing call
    /// under the same rules as a literal: the quote policy applies, and an
    /// empty result makes the enclosing call a zero-argument call.
    pub fn evaluate(&self, call: &Call, context: &Context) -> Result<String, ResolveError> {
        let mut inner: Option<String> = None;
        for call in call.chain().into_iter().rev() {
            let argument = match &call.argument {
                Argument::Empty => None,
                Argument::Literal(lit) => self.argument(&lit.node),
                Argument::Call(_) => inner.take().and_then(|value| self.argument(&value)),
            };
            debug!(helper = call.name(), argument = ?argument, "invoking helper");
            let value = self
                .registry
                .invoke(call.name(), context, argument.as_deref())?;
            inner = Some(value);
        }
        Ok(inner.unwrap_or_default())
    }

    fn argument(&self, raw: &str) -> Option<String> {
        if raw.is_empty() {
            return None;
        }
        Some(self.grammar.quotes.apply(raw).to_string())
    }
}
