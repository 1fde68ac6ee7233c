//! Helper registry: the whitelist of callables placeholders may invoke

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use tracing::debug;

use crate::context::Context;
use crate::error::{HelperError, RegistryError, ResolveError};

/// Outcome of a helper function
pub type HelperResult = Result<String, HelperError>;

type NullaryFn = dyn Fn(&Context) -> HelperResult + Send + Sync;
type UnaryFn = dyn Fn(&Context, &str) -> HelperResult + Send + Sync;

/// A callable bound to a helper name
#[derive(Clone)]
pub enum Helper {
    /// Called as `name()`
    Nullary(Arc<NullaryFn>),
    /// Called as `name(argument)`
    Unary(Arc<UnaryFn>),
}

impl Helper {
    pub fn nullary<F>(f: F) -> Self
    where
        F: Fn(&Context) -> HelperResult + Send + Sync + 'static,
    {
        Helper::Nullary(Arc::new(f))
    }

    pub fn unary<F>(f: F) -> Self
    where
        F: Fn(&Context, &str) -> HelperResult + Send + Sync + 'static,
    {
        Helper::Unary(Arc::new(f))
    }

    /// Number of arguments the helper takes
    pub fn arity(&self) -> usize {
        match self {
            Helper::Nullary(_) => 0,
            Helper::Unary(_) => 1,
        }
    }
}

impl fmt::Debug for Helper {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Helper::Nullary(_) => write!(f, "Helper::Nullary(..)"),
            Helper::Unary(_) => write!(f, "Helper::Unary(..)"),
        }
    }
}

/// Registry mapping helper names to callables
///
/// Names keep their registration order. A registry can start as a copy of a
/// parent registry with [`HelperRegistry::inherit`] and then grow or shrink
/// without touching the parent.
#[derive(Debug, Clone, Default)]
pub struct HelperRegistry {
    helpers: HashMap<String, Helper>,
    order: Vec<String>,
}

impl HelperRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry holding a copy of every helper of `parent`
    pub fn inherit(parent: &HelperRegistry) -> Self {
        parent.clone()
    }

    /// Register a helper, replacing any previous binding of the same name
    ///
    /// Returns the canonical name the helper is reachable under.
    pub fn register(&mut self, name: &str, helper: Helper) -> Result<String, RegistryError> {
        let name = canonical_name(name)?;
        if self.helpers.insert(name.clone(), helper).is_none() {
            self.order.push(name.clone());
        }
        debug!(helper = %name, "registered helper");
        Ok(name)
    }

    /// Register a helper called without argument
    pub fn register_nullary<F>(&mut self, name: &str, f: F) -> Result<String, RegistryError>
    where
        F: Fn(&Context) -> HelperResult + Send + Sync + 'static,
    {
        self.register(name, Helper::nullary(f))
    }

    /// Register a helper called with one argument
    pub fn register_unary<F>(&mut self, name: &str, f: F) -> Result<String, RegistryError>
    where
        F: Fn(&Context, &str) -> HelperResult + Send + Sync + 'static,
    {
        self.register(name, Helper::unary(f))
    }

    /// Remove a helper; unknown names are ignored
    ///
    /// Returns the names still registered.
    pub fn unregister(&mut self, name: &str) -> Vec<String> {
        let name = name.trim();
        if self.helpers.remove(name).is_some() {
            self.order.retain(|n| n != name);
            debug!(helper = %name, "unregistered helper");
        }
        self.order.clone()
    }

    /// Check if a helper exists
    pub fn exists(&self, name: &str) -> bool {
        self.helpers.contains_key(name.trim())
    }

    /// Get a helper by name
    pub fn get(&self, name: &str) -> Option<&Helper> {
        self.helpers.get(name.trim())
    }

    /// Helper names in registration order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(|s| s.as_str())
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Call a helper with an optional argument
    pub fn invoke(
        &self,
        name: &str,
        context: &Context,
        argument: Option<&str>,
    ) -> Result<String, ResolveError> {
        let name = name.trim();
        let helper = self
            .helpers
            .get(name)
            .ok_or_else(|| ResolveError::unregistered(name))?;

        let result = match (helper, argument) {
            (Helper::Nullary(f), None) => f(context),
            (Helper::Unary(f), Some(arg)) => f(context, arg),
            (helper, argument) => {
                return Err(ResolveError::ArityMismatch {
                    name: name.to_string(),
                    expected: helper.arity(),
                    found: usize::from(argument.is_some()),
                });
            }
        };

        result.map_err(|e| ResolveError::HelperFailed {
            name: name.to_string(),
            message: e.message,
        })
    }
}

fn canonical_name(name: &str) -> Result<String, RegistryError> {
    let name = name.trim();
    let valid = !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
    if valid {
        Ok(name.to_string())
    } else {
        Err(RegistryError::InvalidName {
            name: name.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> HelperRegistry {
        let mut registry = HelperRegistry::new();
        registry
            .register_unary("capitalize", |_, arg| {
                let mut chars = arg.chars();
                Ok(match chars.next() {
                    Some(first) => first.to_uppercase().chain(chars).collect(),
                    None => String::new(),
                })
            })
            .unwrap();
        registry
            .register_nullary("user_name", |ctx| {
                ctx.get("user_name")
                    .map(str::to_string)
                    .ok_or_else(|| HelperError::new("no user_name in context"))
            })
            .unwrap();
        registry
    }

    #[test]
    fn test_register_returns_canonical_name() {
        let mut registry = HelperRegistry::new();
        let name = registry
            .register_nullary("  today ", |_| Ok("monday".to_string()))
            .unwrap();
        assert_eq!(name, "today");
        assert!(registry.exists("today"));
    }

    #[test]
    fn test_register_rejects_invalid_names() {
        let mut registry = HelperRegistry::new();
        for bad in ["", "   ", "a.b", "a(b)", "has space"] {
            let result = registry.register_nullary(bad, |_| Ok(String::new()));
            assert!(
                matches!(result, Err(RegistryError::InvalidName { .. })),
                "{:?} should be rejected",
                bad
            );
        }
        assert!(registry.is_empty());
    }

    #[test]
    fn test_names_keep_registration_order() {
        let registry = sample();
        assert_eq!(
            registry.names().collect::<Vec<_>>(),
            vec!["capitalize", "user_name"]
        );
    }

    #[test]
    fn test_reregister_keeps_position() {
        let mut registry = sample();
        registry
            .register_unary("capitalize", |_, arg| Ok(arg.to_uppercase()))
            .unwrap();
        assert_eq!(registry.len(), 2);
        assert_eq!(registry.names().next(), Some("capitalize"));
        assert_eq!(
            registry.invoke("capitalize", &Context::new(), Some("john")),
            Ok("JOHN".to_string())
        );
    }

    #[test]
    fn test_unregister() {
        let mut registry = sample();
        assert_eq!(registry.unregister("capitalize"), vec!["user_name".to_string()]);
        assert!(!registry.exists("capitalize"));
        // unknown names are a no-op
        assert_eq!(registry.unregister("capitalize"), vec!["user_name".to_string()]);
    }

    #[test]
    fn test_inherit_copies_parent() {
        let parent = sample();
        let mut child = HelperRegistry::inherit(&parent);
        child
            .register_unary("downcase", |_, arg| Ok(arg.to_lowercase()))
            .unwrap();

        assert_eq!(child.names().next(), Some("capitalize"));
        assert_eq!(child.names().last(), Some("downcase"));
        assert!(!parent.exists("downcase"));

        child.unregister("capitalize");
        assert!(parent.exists("capitalize"));
    }

    #[test]
    fn test_invoke() {
        let registry = sample();
        let ctx = Context::new().with("user_name", "Luke");
        assert_eq!(
            registry.invoke("capitalize", &ctx, Some("john")),
            Ok("John".to_string())
        );
        assert_eq!(registry.invoke("user_name", &ctx, None), Ok("Luke".to_string()));
    }

    #[test]
    fn test_lookups_agree_on_padded_names() {
        let registry = sample();
        let ctx = Context::new();
        assert!(registry.exists(" capitalize "));
        assert!(registry.get(" capitalize ").is_some());
        assert_eq!(
            registry.invoke(" capitalize ", &ctx, Some("john")),
            Ok("John".to_string())
        );
    }

    #[test]
    fn test_invoke_unregistered() {
        let registry = sample();
        assert_eq!(
            registry.invoke("nope", &Context::new(), None),
            Err(ResolveError::unregistered("nope"))
        );
    }

    #[test]
    fn test_invoke_arity_mismatch() {
        let registry = sample();
        let ctx = Context::new();
        assert_eq!(
            registry.invoke("capitalize", &ctx, None),
            Err(ResolveError::ArityMismatch {
                name: "capitalize".to_string(),
                expected: 1,
                found: 0
            })
        );
        assert!(matches!(
            registry.invoke("user_name", &ctx, Some("x")),
            Err(ResolveError::ArityMismatch { expected: 0, found: 1, .. })
        ));
    }

    #[test]
    fn test_invoke_helper_failure() {
        let registry = sample();
        assert_eq!(
            registry.invoke("user_name", &Context::new(), None),
            Err(ResolveError::HelperFailed {
                name: "user_name".to_string(),
                message: "no user_name in context".to_string()
            })
        );
    }
}
