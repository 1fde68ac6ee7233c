//! helperbars - whitelisted helper calls inside `{{...}}` placeholders
//!
//! A template is plain text with placeholders such as
//! `{{swapcase(capitalize(john))}}`. Each placeholder holds one helper call,
//! possibly wrapping further calls. Calls are evaluated innermost first and
//! the placeholder is replaced by the final value. Only helpers present in a
//! [`HelperRegistry`] can run.
//!
//! A placeholder that fails (unknown helper, helper error) is left verbatim
//! and recorded; the other placeholders still resolve. Strict mode turns the
//! first failure into an error instead.
//!
//! # Example
//!
//! ```rust
//! use helperbars::{builtins, Context, Replacer};
//!
//! let mut helpers = builtins::standard();
//! helpers
//!     .register_nullary("user_name", |ctx| Ok(ctx.get("user_name").unwrap_or("nobody").to_string()))
//!     .unwrap();
//!
//! let replacer = Replacer::new(helpers);
//! let mut template = replacer.template("{{ swapcase(capitalize(john)) }} meets {{user_name()}}");
//!
//! let ctx = Context::new().with("user_name", "Luke");
//! assert_eq!(template.replace(&ctx), "jOHN meets Luke");
//! assert!(template.errors().is_empty());
//! ```

pub mod config;
pub mod context;
pub mod error;
pub mod helper;
pub mod parser;
pub mod replacer;
pub mod resolver;
pub mod scanner;

pub use config::{Charset, ConfigError, Grammar, QuotePolicy};
pub use context::{Context, DataError};
pub use error::{HelperError, InterpolationError, RegistryError, ResolveError, SyntaxError};
pub use helper::{builtins, Helper, HelperRegistry, HelperResult};
pub use replacer::{Rendered, Replacer, Template};
pub use resolver::Resolver;
pub use scanner::{scan, Placeholder, Placeholders};

/// Replace the placeholders of `source` with the default grammar
///
/// Failures are recorded in the returned [`Rendered`].
///
/// # Example
///
/// ```rust
/// use helperbars::{builtins, replace, Context};
///
/// let rendered = replace(
///     "My name is {{capitalize(john)}} {{nope(x)}}",
///     &builtins::standard(),
///     &Context::new(),
/// );
/// assert_eq!(rendered.output, "My name is John {{nope(x)}}");
/// assert_eq!(rendered.errors.len(), 1);
/// ```
pub fn replace(source: &str, helpers: &HelperRegistry, context: &Context) -> Rendered {
    Replacer::new(helpers.clone()).render(source, context)
}
