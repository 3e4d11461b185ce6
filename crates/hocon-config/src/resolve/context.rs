//! The per-call resolver state and the per-variant algorithms.

use super::ResolveOptions;
use super::memo::{CycleKey, Memo, MemoKey};
use super::source::ResolveSource;
use crate::error::ConfigError;
use crate::merge::consolidate;
use crate::path::Path;
use crate::value::{SubstitutionExpression, Value, ValueKind};
use indexmap::IndexMap;
use std::collections::HashSet;
use tracing::trace;

/// Why a node produced no value.
#[derive(Debug)]
pub(crate) enum ResolveError {
    /// The node is already being resolved further up; only a
    /// substitution can turn this into a user-visible error.
    NotPossible,
    Config(ConfigError),
}

impl From<ConfigError> for ResolveError {
    fn from(err: ConfigError) -> Self {
        ResolveError::Config(err)
    }
}

type ResolveResult = Result<Option<Value>, ResolveError>;

pub(crate) struct ResolveContext<'a> {
    options: ResolveOptions,
    source: ResolveSource<'a>,
    memo: Memo,
    in_progress: HashSet<CycleKey>,
    /// Substitutions being resolved, outermost first
    trace: Vec<String>,
}

impl<'a> ResolveContext<'a> {
    pub(crate) fn new(options: ResolveOptions, source: ResolveSource<'a>) -> Self {
        ResolveContext {
            options,
            source,
            memo: Memo::default(),
            in_progress: HashSet::new(),
            trace: Vec::new(),
        }
    }

    /// Resolve `value`, or only the part of it along `restriction`.
    ///
    /// `Ok(None)` means the value is absent (an optional substitution
    /// with no referent).
    pub(crate) fn resolve(&mut self, value: &Value, restriction: Option<&Path>) -> ResolveResult {
        if let Some((stack, skip)) = self.source.replacement(value) {
            let len = stack.merge_stack().map_or(0, <[Value]>::len);
            trace!(skip, len, "merge stack replaced by its remainder");
            if skip >= len {
                return Ok(None);
            }
            return self.resolve_node(&stack, skip, restriction);
        }
        self.resolve_node(value, 0, restriction)
    }

    fn resolve_node(&mut self, value: &Value, start: usize, restriction: Option<&Path>) -> ResolveResult {
        if value.is_resolved() {
            return Ok(Some(value.clone()));
        }

        let tracks_cycles = matches!(
            value.kind(),
            ValueKind::Reference { .. }
                | ValueKind::Concatenation(_)
                | ValueKind::DelayedMerge(_)
                | ValueKind::DelayedMergeObject(_)
        );
        // substitutions and concatenations always resolve in full
        let restriction = match value.kind() {
            ValueKind::Reference { .. } | ValueKind::Concatenation(_) => None,
            _ => restriction,
        };

        let root = self.source.root();
        let scope = self.source.scope();
        let full_key = MemoKey::new(root, value, start, None, scope);
        let restricted_key = restriction.map(|r| MemoKey::new(root, value, start, Some(r), scope));

        // a full result can answer a restricted request, not the reverse
        if let Some(cached) = self.memo.get(&full_key) {
            trace!("memo hit");
            return Ok(cached.clone());
        }
        if let Some(cached) = restricted_key.as_ref().and_then(|key| self.memo.get(key)) {
            trace!(restriction = %restriction.map(Path::render).unwrap_or_default(), "restricted memo hit");
            return Ok(cached.clone());
        }

        let cycle_key = CycleKey {
            value: value.id(),
            start,
            restriction: restriction.cloned(),
        };
        if tracks_cycles && !self.in_progress.insert(cycle_key.clone()) {
            trace!(trace = ?self.trace, "cycle detected");
            return Err(ResolveError::NotPossible);
        }

        let result = self.resolve_kind(value, start, restriction);

        if tracks_cycles {
            self.in_progress.remove(&cycle_key);
        }
        let result = result?;

        match (&result, restricted_key) {
            (Some(v), Some(key)) if !v.is_resolved() => self.memo.put(key, result.clone()),
            (Some(v), None) if !v.is_resolved() => {
                if self.options.allow_unresolved {
                    self.memo.put(full_key, result.clone());
                }
            }
            _ => self.memo.put(full_key, result.clone()),
        }
        Ok(result)
    }

    fn resolve_kind(&mut self, value: &Value, start: usize, restriction: Option<&Path>) -> ResolveResult {
        match value.kind() {
            ValueKind::Object {
                entries,
                ignores_fallbacks,
            } => self.resolve_object(value, entries, *ignores_fallbacks, restriction),
            ValueKind::List(items) => self.resolve_list(value, items, restriction),
            ValueKind::Reference {
                expr,
                prefix_length,
            } => self.resolve_reference(value, expr, *prefix_length),
            ValueKind::Concatenation(pieces) => self.resolve_concatenation(value, pieces),
            ValueKind::DelayedMerge(stack) | ValueKind::DelayedMergeObject(stack) => {
                self.resolve_stack(value, stack, start, restriction)
            }
            _ => Ok(Some(value.clone())),
        }
    }

    fn resolve_object(
        &mut self,
        value: &Value,
        entries: &IndexMap<String, Value>,
        ignores_fallbacks: bool,
        restriction: Option<&Path>,
    ) -> ResolveResult {
        let mut changed = false;
        let mut resolved = IndexMap::with_capacity(entries.len());

        for (key, child) in entries {
            let new_child = match restriction {
                // not on the path we were asked about
                Some(path) if path.first() != key => Some(child.clone()),
                Some(path) => self.resolve(child, path.remainder().as_ref())?,
                None => self.resolve(child, None)?,
            };
            match new_child {
                Some(new_child) => {
                    if !new_child.ptr_eq(child) {
                        changed = true;
                    }
                    resolved.insert(key.clone(), new_child);
                }
                None => changed = true,
            }
        }

        if !changed {
            return Ok(Some(value.clone()));
        }
        Ok(Some(Value::object_with_flag(
            resolved,
            ignores_fallbacks,
            value.origin().clone(),
        )))
    }

    fn resolve_list(&mut self, value: &Value, items: &[Value], restriction: Option<&Path>) -> ResolveResult {
        // a list has no keyed children to restrict to
        if restriction.is_some() {
            return Ok(Some(value.clone()));
        }

        let mut changed = false;
        let mut resolved = Vec::with_capacity(items.len());
        for item in items {
            match self.resolve(item, None)? {
                Some(new_item) => {
                    if !new_item.ptr_eq(item) {
                        changed = true;
                    }
                    resolved.push(new_item);
                }
                None => changed = true,
            }
        }

        if !changed {
            return Ok(Some(value.clone()));
        }
        Ok(Some(Value::list(resolved, value.origin().clone())))
    }

    fn resolve_reference(
        &mut self,
        value: &Value,
        expr: &SubstitutionExpression,
        prefix_length: usize,
    ) -> ResolveResult {
        self.trace.push(expr.to_string());
        let looked_up = self.lookup_subst(expr, prefix_length);

        let result = match looked_up {
            Ok(Some(found)) => Ok(Some(found)),
            Ok(None) if expr.optional => Ok(None),
            Ok(None) if self.options.allow_unresolved => Ok(Some(value.clone())),
            Ok(None) => Err(ResolveError::Config(ConfigError::UnresolvedSubstitution {
                expression: expr.to_string(),
                origin: Some(value.origin().clone()),
            })),
            Err(ResolveError::NotPossible) if expr.optional => Ok(None),
            Err(ResolveError::NotPossible) if self.options.allow_unresolved => {
                Ok(Some(value.clone()))
            }
            Err(ResolveError::NotPossible) => {
                Err(ResolveError::Config(ConfigError::CyclicSubstitution {
                    expression: expr.to_string(),
                    trace: self.trace.clone(),
                    origin: Some(value.origin().clone()),
                }))
            }
            Err(err) => Err(err),
        };

        self.trace.pop();
        result
    }

    /// Find and resolve the value a substitution refers to.
    fn lookup_subst(&mut self, expr: &SubstitutionExpression, prefix_length: usize) -> ResolveResult {
        let root = self.source.root().clone();
        let mut found = self.find_in_object(&root, &expr.path)?;

        // grafted documents also see the top-level root
        let unprefixed = expr.path.sub_path(prefix_length);
        if found.is_none()
            && prefix_length > 0
            && let Some(unprefixed) = &unprefixed
        {
            found = self.find_in_object(&root, unprefixed)?;
        }

        match found {
            Some(found) => self.resolve(&found, None),
            None if self.options.use_environment_fallback => {
                let path = unprefixed.as_ref().unwrap_or(&expr.path);
                let external = self.source.external().lookup(path).filter(Value::is_resolved);
                if external.is_some() {
                    trace!(path = %path, "substitution found outside the document");
                }
                Ok(external)
            }
            None => Ok(None),
        }
    }

    /// Resolve only what lies along `path` below `object`, then look there.
    fn find_in_object(&mut self, object: &Value, path: &Path) -> ResolveResult {
        let Some(partial) = self.resolve(object, Some(path))? else {
            return Ok(None);
        };
        // an unresolved step on the way counts as not found
        Ok(partial.peek_path(path).ok().flatten().cloned())
    }

    fn resolve_concatenation(&mut self, value: &Value, pieces: &[Value]) -> ResolveResult {
        let mut resolved = Vec::with_capacity(pieces.len());
        for piece in pieces {
            if let Some(piece) = self.resolve(piece, None)? {
                resolved.push(piece);
            }
        }

        let mut joined = consolidate(resolved).map_err(|e| e.with_origin_if_missing(value.origin()))?;
        match joined.len() {
            0 => Ok(None),
            1 => Ok(joined.pop()),
            _ if self.options.allow_unresolved => Ok(Some(Value::from_kind(
                ValueKind::Concatenation(joined),
                value.origin().clone(),
            ))),
            n => Err(ResolveError::Config(ConfigError::NotResolved {
                path: None,
                message: format!("Concatenation still has {n} unresolved pieces after resolving"),
                origin: Some(value.origin().clone()),
            })),
        }
    }

    /// Resolve `stack[start..]` and merge the results, first wins.
    fn resolve_stack(
        &mut self,
        value: &Value,
        stack: &[Value],
        start: usize,
        restriction: Option<&Path>,
    ) -> ResolveResult {
        let mut merged: Option<Value> = None;

        for (index, element) in stack.iter().enumerate().skip(start) {
            if merged.as_ref().is_some_and(Value::ignores_fallbacks) {
                break;
            }

            // only a substitution or concatenation can refer back to the
            // stack it sits in; children of an object layer see the whole merge
            let resolved = if element.is_unmergeable() {
                self.source.push_binding(value, index + 1);
                let resolved = self.resolve(element, restriction);
                self.source.pop_binding();
                resolved
            } else {
                self.resolve(element, restriction)
            };

            if let Some(resolved) = resolved? {
                merged = Some(match merged {
                    None => resolved,
                    Some(above) => above.with_fallback(&resolved),
                });
            }
        }

        Ok(merged)
    }
}
