//! The resolution root and the replacement bindings for merge stacks.

use crate::external::ExternalLookup;
use crate::value::Value;

/// While element `skip - 1` of `stack` is being resolved, lookups that
/// land on the stack itself see only `stack[skip..]`.
#[derive(Debug)]
struct Binding {
    stack: Value,
    skip: usize,
    scope: u64,
}

/// Where substitutions are looked up.
pub(crate) struct ResolveSource<'a> {
    root: Value,
    external: &'a dyn ExternalLookup,
    bindings: Vec<Binding>,
    next_scope: u64,
}

impl<'a> ResolveSource<'a> {
    pub(crate) fn new(root: Value, external: &'a dyn ExternalLookup) -> Self {
        ResolveSource {
            root,
            external,
            bindings: Vec::new(),
            next_scope: 1,
        }
    }

    pub(crate) fn root(&self) -> &Value {
        &self.root
    }

    pub(crate) fn external(&self) -> &'a dyn ExternalLookup {
        self.external
    }

    /// The innermost binding for `value`, as `(stack, skip)`.
    pub(crate) fn replacement(&self, value: &Value) -> Option<(Value, usize)> {
        self.bindings
            .iter()
            .rev()
            .find(|binding| binding.stack.ptr_eq(value))
            .map(|binding| (binding.stack.clone(), binding.skip))
    }

    /// Bind `stack` to its elements from `skip` on. Bindings nest and
    /// must be popped in reverse order.
    pub(crate) fn push_binding(&mut self, stack: &Value, skip: usize) {
        let scope = self.next_scope;
        self.next_scope += 1;
        self.bindings.push(Binding {
            stack: stack.clone(),
            skip,
            scope,
        });
    }

    pub(crate) fn pop_binding(&mut self) {
        self.bindings.pop();
    }

    /// Identifies the current set of bindings; 0 when there are none.
    pub(crate) fn scope(&self) -> u64 {
        self.bindings.last().map_or(0, |binding| binding.scope)
    }
}
