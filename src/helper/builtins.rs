//! Ready-made helpers for common string transformations

use crate::context::Context;
use crate::error::HelperError;

use super::registry::HelperRegistry;

/// Registry with the builtin helpers
///
/// | Helper | Example | Result |
/// |--------|---------|--------|
/// | capitalize | `capitalize(jOHN)` | `John` |
/// | swapcase | `swapcase(John)` | `jOHN` |
/// | upcase | `upcase(john)` | `JOHN` |
/// | downcase | `downcase(JOHN)` | `john` |
/// | trim | `trim(' john ')` | `john` |
/// | reverse | `reverse(abc)` | `cba` |
/// | fetch | `fetch(user_name)` | context value of `user_name` |
pub fn standard() -> HelperRegistry {
    let mut registry = HelperRegistry::new();
    let unary: [(&str, fn(&str) -> String); 6] = [
        ("capitalize", capitalize),
        ("swapcase", swapcase),
        ("upcase", |s| s.to_uppercase()),
        ("downcase", |s| s.to_lowercase()),
        ("trim", |s| s.trim().to_string()),
        ("reverse", |s| s.chars().rev().collect()),
    ];
    for (name, f) in unary {
        registry
            .register_unary(name, move |_, arg| Ok(f(arg)))
            .expect("builtin helper names are valid");
    }
    registry
        .register_unary("fetch", |ctx, key| lookup(ctx, key))
        .expect("builtin helper names are valid");
    registry
}

/// Register one zero-argument helper per context key
///
/// `{{user_name()}}` then reads `user_name` from the context passed to each
/// replacement. Keys that are not valid helper names are skipped; existing
/// helpers are not overridden. Returns the names that were added.
pub fn expose_context(registry: &mut HelperRegistry, context: &Context) -> Vec<String> {
    let mut added = Vec::new();
    for key in context.keys() {
        if registry.exists(key) {
            continue;
        }
        let owned = key.to_string();
        if let Ok(name) = registry.register_nullary(key, move |ctx| lookup(ctx, &owned)) {
            added.push(name);
        }
    }
    added
}

fn lookup(context: &Context, key: &str) -> Result<String, HelperError> {
    context
        .get(key.trim())
        .map(str::to_string)
        .ok_or_else(|| HelperError::new(format!("no value for '{}' in context", key.trim())))
}

/// Uppercase the first character, lowercase the rest
pub fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}

/// Invert the case of every character
pub fn swapcase(s: &str) -> String {
    s.chars()
        .flat_map(|c| {
            if c.is_uppercase() {
                c.to_lowercase().collect::<Vec<_>>()
            } else if c.is_lowercase() {
                c.to_uppercase().collect::<Vec<_>>()
            } else {
                vec![c]
            }
        })
        .collect()
}
