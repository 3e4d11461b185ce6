//! Dotted key paths.
//!
//! A [`Path`] is a non-empty sequence of object keys, written `a.b.c`.
//! Keys containing dots or other punctuation are double-quoted when
//! rendered (`a."b.c"`), and [`Path::parse`] accepts the same syntax.

use crate::error::ConfigError;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

/// A non-empty sequence of keys addressing a value inside nested objects.
///
/// Paths share their key storage, so `remainder`, `sub_path` and clones are
/// cheap.
#[derive(Clone)]
pub struct Path {
    keys: Arc<[String]>,
    start: usize,
}

impl Path {
    /// A single-key path.
    pub fn new(key: impl Into<String>) -> Self {
        Path {
            keys: Arc::from(vec![key.into()]),
            start: 0,
        }
    }

    /// Build a path from keys. `None` if `keys` is empty.
    pub fn from_keys<I, S>(keys: I) -> Option<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let keys: Vec<String> = keys.into_iter().map(Into::into).collect();
        if keys.is_empty() {
            None
        } else {
            Some(Path {
                keys: Arc::from(keys),
                start: 0,
            })
        }
    }

    /// Parse a path expression such as `a.b."c.d"`.
    pub fn parse(expression: &str) -> Result<Self, ConfigError> {
        let bad = |message: &str| ConfigError::BadPath {
            path: expression.to_string(),
            message: message.to_string(),
            origin: None,
        };

        if expression.is_empty() {
            return Err(bad("path expression is empty"));
        }

        let mut keys = Vec::new();
        let mut current = String::new();
        let mut chars = expression.chars().peekable();
        // a segment is "started" once it has any text or a quoted part
        let mut started = false;

        while let Some(c) = chars.next() {
            match c {
                '.' => {
                    if !started {
                        return Err(bad("path has a leading, trailing or doubled '.'"));
                    }
                    keys.push(std::mem::take(&mut current));
                    started = false;
                }
                '"' => {
                    started = true;
                    loop {
                        match chars.next() {
                            None => return Err(bad("unterminated quoted key")),
                            Some('"') => break,
                            Some('\\') => match chars.next() {
                                Some('"') => current.push('"'),
                                Some('\\') => current.push('\\'),
                                Some('n') => current.push('\n'),
                                Some('t') => current.push('\t'),
                                Some(other) => {
                                    current.push('\\');
                                    current.push(other);
                                }
                                None => return Err(bad("unterminated quoted key")),
                            },
                            Some(other) => current.push(other),
                        }
                    }
                }
                _ => {
                    started = true;
                    current.push(c);
                }
            }
        }

        if !started {
            return Err(bad("path has a leading, trailing or doubled '.'"));
        }
        keys.push(current);

        Ok(Path {
            keys: Arc::from(keys),
            start: 0,
        })
    }

    fn slice(&self) -> &[String] {
        &self.keys[self.start..]
    }

    pub fn first(&self) -> &str {
        &self.slice()[0]
    }

    /// Everything after the first key, or `None` for a single-key path.
    pub fn remainder(&self) -> Option<Path> {
        if self.len() > 1 {
            Some(Path {
                keys: Arc::clone(&self.keys),
                start: self.start + 1,
            })
        } else {
            None
        }
    }

    pub fn last(&self) -> &str {
        let slice = self.slice();
        &slice[slice.len() - 1]
    }

    /// Everything but the last key, or `None` for a single-key path.
    pub fn parent(&self) -> Option<Path> {
        if self.len() > 1 {
            let slice = self.slice();
            Path::from_keys(slice[..slice.len() - 1].iter().cloned())
        } else {
            None
        }
    }

    pub fn len(&self) -> usize {
        self.keys.len() - self.start
    }

    /// Always false; paths have at least one key.
    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.slice().iter().map(String::as_str)
    }

    /// `prefix` followed by this path.
    pub fn prepend(&self, prefix: &Path) -> Path {
        let keys: Vec<String> = prefix.slice().iter().chain(self.slice()).cloned().collect();
        Path {
            keys: Arc::from(keys),
            start: 0,
        }
    }

    /// This path followed by `key`.
    pub fn append_key(&self, key: impl Into<String>) -> Path {
        let mut keys = self.slice().to_vec();
        keys.push(key.into());
        Path {
            keys: Arc::from(keys),
            start: 0,
        }
    }

    /// The path starting at key index `start`.
    ///
    /// Returns `self` unchanged when `start` is zero and `None` when `start`
    /// is at or past the end.
    pub fn sub_path(&self, start: usize) -> Option<Path> {
        if start >= self.len() {
            None
        } else {
            Some(Path {
                keys: Arc::clone(&self.keys),
                start: self.start + start,
            })
        }
    }

    /// Keys `start..end`. `None` when the range is empty or out of bounds.
    pub fn sub_path_range(&self, start: usize, end: usize) -> Option<Path> {
        if start >= end || end > self.len() {
            None
        } else {
            Path::from_keys(self.slice()[start..end].iter().cloned())
        }
    }

    pub fn starts_with(&self, prefix: &Path) -> bool {
        prefix.len() <= self.len() && self.slice()[..prefix.len()] == *prefix.slice()
    }

    /// Render as a path expression, quoting keys that need it.
    pub fn render(&self) -> String {
        let mut out = String::new();
        for (i, key) in self.slice().iter().enumerate() {
            if i > 0 {
                out.push('.');
            }
            if key.is_empty() || has_funky_chars(key) {
                out.push_str(&render_json_string(key));
            } else {
                out.push_str(key);
            }
        }
        out
    }
}

/// True if `key` has characters that need quoting in a path expression.
pub(crate) fn has_funky_chars(key: &str) -> bool {
    key.chars()
        .any(|c| !(c.is_alphanumeric() || c == '-' || c == '_'))
}

/// Quote a string as a JSON string literal.
pub(crate) fn render_json_string(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '\u{08}' => out.push_str("\\b"),
            '\u{0c}' => out.push_str("\\f"),
            c if (c as u32) < 0x20 => out.push_str(&format!("\\u{:04x}", c as u32)),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

// compare the keys in view, not the shared storage behind them
impl PartialEq for Path {
    fn eq(&self, other: &Self) -> bool {
        self.slice() == other.slice()
    }
}

impl Eq for Path {}

impl Hash for Path {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.slice().hash(state);
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

impl fmt::Debug for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Path({})", self.render())
    }
}
