//! Helpers callable from placeholders
//!
//! Only helpers present in a [`HelperRegistry`] can run. A helper either takes
//! no argument and reads the [`Context`](crate::Context) of the current
//! replacement, or takes one string argument.
//!
//! # Example
//!
//! ```
//! use helperbars::{Context, HelperRegistry};
//!
//! let mut helpers = HelperRegistry::new();
//! helpers.register_unary("shout", |_, arg| Ok(arg.to_uppercase())).unwrap();
//! helpers.register_nullary("user_name", |ctx| {
//!     Ok(ctx.get("user_name").unwrap_or("stranger").to_string())
//! }).unwrap();
//!
//! let ctx = Context::new().with("user_name", "Luke");
//! assert_eq!(helpers.invoke("shout", &ctx, Some("hi")).unwrap(), "HI");
//! assert_eq!(helpers.invoke("user_name", &ctx, None).unwrap(), "Luke");
//! ```

pub mod builtins;
mod registry;

pub use registry::{Helper, HelperRegistry, HelperResult};
