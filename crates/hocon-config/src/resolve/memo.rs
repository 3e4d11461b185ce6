//! Identity-keyed memo table for one resolve call.

use crate::path::Path;
use crate::value::Value;
use std::collections::HashMap;

/// Identifies one resolution request.
///
/// `start` is the first stack index for a partial merge stack (0
/// otherwise). `scope` is the replacement binding in force when the
/// result was computed, so results that saw "only what lies below" one
/// stack element are never reused outside that element.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub(crate) struct MemoKey {
    root: usize,
    value: usize,
    start: usize,
    restriction: Option<Path>,
    scope: u64,
}

impl MemoKey {
    pub(crate) fn new(
        root: &Value,
        value: &Value,
        start: usize,
        restriction: Option<&Path>,
        scope: u64,
    ) -> Self {
        MemoKey {
            root: root.id(),
            value: value.id(),
            start,
            restriction: restriction.cloned(),
            scope,
        }
    }
}

/// A node (or partial merge stack) currently being resolved.
///
/// A merge stack may be re-entered along a narrower restriction while it
/// is being resolved in full, so the restriction is part of the key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub(crate) struct CycleKey {
    pub value: usize,
    pub start: usize,
    pub restriction: Option<Path>,
}

/// Results computed so far. `None` records an absent result.
#[derive(Debug, Default)]
pub(crate) struct Memo {
    table: HashMap<MemoKey, Option<Value>>,
}

impl Memo {
    pub(crate) fn get(&self, key: &MemoKey) -> Option<&Option<Value>> {
        self.table.get(key)
    }

    pub(crate) fn put(&mut self, key: MemoKey, result: Option<Value>) {
        self.table.insert(key, result);
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.table.len()
    }
}
