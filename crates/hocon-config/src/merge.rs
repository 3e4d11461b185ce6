//! Fallback merging and value concatenation.
//!
//! `a.with_fallback(b)` keeps everything in `a` and fills gaps from `b`.
//! Objects merge key by key. Any other concrete value simply wins. When
//! the winner is a substitution, a concatenation or an existing merge
//! stack, the merge can't happen until resolve time, so the two are kept
//! side by side in a delayed-merge stack.

use crate::error::ConfigError;
use crate::transform::object_to_list;
use crate::value::{Value, ValueKind};
use hocon_origin::Origin;
use indexmap::IndexMap;

impl Value {
    /// True if merging anything below this value would have no effect.
    ///
    /// Substitutions and concatenations never ignore fallbacks, since an
    /// optional substitution may turn out absent or refer to what lies
    /// below it. A merge stack ignores fallbacks when its last element
    /// does.
    pub fn ignores_fallbacks(&self) -> bool {
        match self.kind() {
            ValueKind::Object {
                ignores_fallbacks, ..
            } => *ignores_fallbacks,
            ValueKind::Reference { .. } | ValueKind::Concatenation(_) => false,
            ValueKind::DelayedMerge(stack) | ValueKind::DelayedMergeObject(stack) => {
                stack.last().is_some_and(Value::ignores_fallbacks)
            }
            _ => true,
        }
    }

    /// Merge `fallback` below this value. This value wins on conflicts.
    pub fn with_fallback(&self, fallback: &Value) -> Value {
        if self.ignores_fallbacks() {
            return self.clone();
        }

        match self.kind() {
            ValueKind::Object { .. } => {
                if fallback.as_object().is_some() {
                    merge_objects(self, fallback)
                } else if fallback.is_unmergeable() || !self.is_resolved() {
                    delay_merge(self, fallback)
                } else {
                    // a concrete non-object below a concrete object ends the chain
                    self.with_fallbacks_ignored()
                }
            }
            _ => delay_merge(self, fallback),
        }
    }

    /// Apply [`Value::with_fallback`] for each fallback in turn.
    pub fn with_fallbacks<'a>(&self, fallbacks: impl IntoIterator<Item = &'a Value>) -> Value {
        fallbacks
            .into_iter()
            .fold(self.clone(), |merged, fallback| merged.with_fallback(fallback))
    }

    fn with_fallbacks_ignored(&self) -> Value {
        match self.kind() {
            ValueKind::Object { entries, .. } => {
                Value::object_with_flag(entries.clone(), true, self.origin().clone())
            }
            _ => self.clone(),
        }
    }

    /// Join adjacent pieces as far as possible.
    ///
    /// `None` for no pieces, the single joined value when everything
    /// joins, otherwise a concatenation of what is left.
    pub fn concatenate(pieces: Vec<Value>) -> Result<Option<Value>, ConfigError> {
        let mut consolidated = consolidate(pieces)?;
        match consolidated.len() {
            0 => Ok(None),
            1 => Ok(consolidated.pop()),
            _ => {
                let origin = Origin::merge_all(consolidated.iter().map(Value::origin))
                    .unwrap_or_default();
                Ok(Some(Value::from_kind(
                    ValueKind::Concatenation(consolidated),
                    origin,
                )))
            }
        }
    }
}

fn merge_objects(winner: &Value, fallback: &Value) -> Value {
    let (
        ValueKind::Object {
            entries: first,
            ignores_fallbacks: first_ignores,
        },
        ValueKind::Object {
            entries: second,
            ignores_fallbacks: second_ignores,
        },
    ) = (winner.kind(), fallback.kind())
    else {
        return winner.clone();
    };

    let mut merged = IndexMap::with_capacity(first.len() + second.len());
    let mut changed = false;

    for (key, value) in first {
        let kept = match second.get(key) {
            Some(below) => value.with_fallback(below),
            None => value.clone(),
        };
        if !kept.ptr_eq(value) {
            changed = true;
        }
        merged.insert(key.clone(), kept);
    }
    for (key, value) in second {
        if !first.contains_key(key) {
            merged.insert(key.clone(), value.clone());
            changed = true;
        }
    }

    if changed {
        Value::object_with_flag(
            merged,
            *second_ignores,
            Origin::merge(winner.origin(), fallback.origin()),
        )
    } else if second_ignores != first_ignores {
        Value::object_with_flag(first.clone(), *second_ignores, winner.origin().clone())
    } else {
        winner.clone()
    }
}

fn delay_merge(winner: &Value, fallback: &Value) -> Value {
    let mut stack: Vec<Value> = match winner.merge_stack() {
        Some(elements) => elements.to_vec(),
        None => vec![winner.clone()],
    };
    match fallback.merge_stack() {
        Some(elements) => stack.extend(elements.iter().cloned()),
        None => stack.push(fallback.clone()),
    }
    Value::delayed_merge(stack)
}

/// Flatten nested concatenations and join whatever can be joined now.
pub(crate) fn consolidate(pieces: Vec<Value>) -> Result<Vec<Value>, ConfigError> {
    if pieces.len() < 2 {
        return Ok(pieces);
    }

    let mut flattened = Vec::with_capacity(pieces.len());
    for piece in pieces {
        let nested = match piece.kind() {
            ValueKind::Concatenation(inner) => Some(inner.clone()),
            _ => None,
        };
        match nested {
            Some(inner) => flattened.extend(inner),
            None => flattened.push(piece),
        }
    }

    let mut consolidated: Vec<Value> = Vec::with_capacity(flattened.len());
    for piece in flattened {
        join(&mut consolidated, piece)?;
    }
    Ok(consolidated)
}

fn join(builder: &mut Vec<Value>, right: Value) -> Result<(), ConfigError> {
    let Some(mut left) = builder.last().cloned() else {
        builder.push(right);
        return Ok(());
    };
    let mut right = right;

    // an object with numeric keys next to a list is read as a list
    if left.is_object_like() && right.as_list().is_some() {
        left = object_to_list(&left).unwrap_or(left);
    } else if left.as_list().is_some() && right.is_object_like() {
        right = object_to_list(&right).unwrap_or(right);
    }

    let joined = if left.is_object_like() && right.is_object_like() {
        Some(right.with_fallback(&left))
    } else if let (Some(l), Some(r)) = (left.as_list(), right.as_list()) {
        Some(Value::list(
            l.iter().chain(r).cloned().collect(),
            Origin::merge(left.origin(), right.origin()),
        ))
    } else if left.is_unmergeable() || right.is_unmergeable() {
        None
    } else {
        match (left.transform_to_string(), right.transform_to_string()) {
            (Some(a), Some(b)) => Some(Value::string(
                a + &b,
                Origin::merge(left.origin(), right.origin()),
            )),
            _ => {
                return Err(ConfigError::WrongType {
                    path: None,
                    expected: left.value_type(),
                    found: right.value_type(),
                    origin: Some(left.origin().clone()),
                });
            }
        }
    };

    match joined {
        Some(joined) => {
            builder.pop();
            builder.push(joined);
        }
        None => builder.push(right),
    }
    Ok(())
}
