//! `$ref` dereferencing.
//!
//! Every mapping carrying a `$ref` key is replaced by the resolved body of
//! the referenced fragment, with the mapping's other keys laid over it.
//! The merge is shallow: a sibling key replaces the target's value for the
//! same key wholesale, new sibling keys are appended after the target's.
//!
//! Resolution is not memoized. A stack of identifiers currently being
//! resolved rejects reference cycles, and a depth limit bounds pathological
//! but acyclic nesting.

use std::ops::Deref;

use serde_json::{Map, Value};
use tracing::debug;

use crate::error::{Result, SchemaError};
use crate::fragment::{FragmentCache, FragmentDocument};

/// Key introducing a reference to another fragment.
pub const REF_KEY: &str = "$ref";

/// Default maximum number of nested references.
pub const DEFAULT_MAX_DEPTH: usize = 64;

/// Options for the reference resolver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolverOptions {
    /// Maximum number of references followed along one chain.
    pub max_depth: usize,
}

impl Default for ResolverOptions {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

/// A fragment whose body contains no `$ref` keys.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedDocument {
    fragment: FragmentDocument,
}

impl ResolvedDocument {
    /// Unwraps into the underlying fragment.
    #[must_use]
    pub fn into_fragment(self) -> FragmentDocument {
        self.fragment
    }
}

impl Deref for ResolvedDocument {
    type Target = FragmentDocument;

    fn deref(&self) -> &Self::Target {
        &self.fragment
    }
}

/// Resolves references against a borrowed fragment cache.
#[derive(Debug)]
pub struct ReferenceResolver<'a> {
    cache: &'a FragmentCache,
    options: ResolverOptions,
    resolution_stack: Vec<String>,
}

impl<'a> ReferenceResolver<'a> {
    /// Creates a resolver over `cache`.
    #[must_use]
    pub const fn new(cache: &'a FragmentCache, options: ResolverOptions) -> Self {
        Self {
            cache,
            options,
            resolution_stack: Vec::new(),
        }
    }

    /// Resolves the fragment registered under `id`.
    ///
    /// # Errors
    ///
    /// Returns `UnresolvedReference` if `id` (or any identifier it reaches)
    /// is not cached, `CircularReference` if the chain leads back to an
    /// identifier still being resolved, and `DepthExceeded` past the
    /// configured nesting limit.
    pub fn resolve_fragment(&mut self, id: &str) -> Result<Value> {
        if let Some(pos) = self.resolution_stack.iter().position(|s| s == id) {
            let mut cycle = self.resolution_stack[pos..].to_vec();
            cycle.push(id.to_string());
            return Err(SchemaError::CircularReference { cycle });
        }

        if self.resolution_stack.len() >= self.options.max_depth {
            return Err(SchemaError::DepthExceeded {
                depth: self.resolution_stack.len() + 1,
                max: self.options.max_depth,
            });
        }

        let cache = self.cache;
        let fragment = cache
            .get(id)
            .ok_or_else(|| SchemaError::UnresolvedReference {
                id: id.to_string(),
                suggestion: cache.suggest(id),
            })?;

        self.resolution_stack.push(id.to_string());
        let resolved = self.resolve(&fragment.body);
        self.resolution_stack.pop();
        resolved
    }

    /// Resolves every reference inside `value`.
    ///
    /// # Errors
    ///
    /// See [`ReferenceResolver::resolve_fragment`].
    pub fn resolve(&mut self, value: &Value) -> Result<Value> {
        match value {
            Value::Object(map) => match map.get(REF_KEY) {
                Some(target) => self.resolve_reference(target, map),
                None => {
                    let mut out = Map::with_capacity(map.len());
                    for (key, child) in map {
                        out.insert(key.clone(), self.resolve(child)?);
                    }
                    Ok(Value::Object(out))
                }
            },
            Value::Array(items) => items
                .iter()
                .map(|item| self.resolve(item))
                .collect::<Result<Vec<_>>>()
                .map(Value::Array),
            scalar => Ok(scalar.clone()),
        }
    }

    /// Replaces a `$ref` mapping by its target, siblings taking precedence.
    fn resolve_reference(&mut self, target: &Value, site: &Map<String, Value>) -> Result<Value> {
        let Some(id) = target.as_str() else {
            return Err(SchemaError::UnresolvedReference {
                id: target.to_string(),
                suggestion: None,
            });
        };

        let base = self.resolve_fragment(id)?;

        let mut siblings = Map::new();
        for (key, child) in site.iter().filter(|(key, _)| key.as_str() != REF_KEY) {
            siblings.insert(key.clone(), self.resolve(child)?);
        }

        match base {
            Value::Object(mut merged) => {
                for (key, child) in siblings {
                    merged.insert(key, child);
                }
                Ok(Value::Object(merged))
            }
            // A non-mapping target has nothing to merge siblings into.
            other if siblings.is_empty() => Ok(other),
            _ => Ok(Value::Object(siblings)),
        }
    }
}

/// Resolves every fragment in `cache`, preserving cache order.
///
/// # Errors
///
/// Returns the first resolution error encountered.
pub fn resolve_cache(
    cache: &FragmentCache,
    options: ResolverOptions,
) -> Result<Vec<ResolvedDocument>> {
    let mut resolver = ReferenceResolver::new(cache, options);
    cache
        .iter()
        .map(|fragment| {
            debug!(id = %fragment.id, "dereferencing $ref values in schema");
            let body = resolver.resolve_fragment(&fragment.id)?;
            Ok(ResolvedDocument {
                fragment: FragmentDocument {
                    body,
                    ..fragment.clone()
                },
            })
        })
        .collect()
}

/// Returns true if any mapping inside `value` still carries a `$ref` key.
#[must_use]
pub fn contains_reference(value: &Value) -> bool {
    match value {
        Value::Object(map) => map.contains_key(REF_KEY) || map.values().any(contains_reference),
        Value::Array(items) => items.iter().any(contains_reference),
        _ => false,
    }
}
