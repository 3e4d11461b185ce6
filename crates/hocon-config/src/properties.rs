//! `.properties` files as value trees.
//!
//! Keys are split on `.` into paths, so `db.host=x` becomes
//! `{ db: { host: "x" } }`. Every value is a string. When a key is both a
//! value and a parent of other keys (`a=1` next to `a.b=2`) the object
//! wins. Later duplicates replace earlier ones.

use crate::error::ConfigError;
use crate::path::Path;
use crate::value::Value;
use hocon_origin::Origin;
use indexmap::IndexMap;
use tracing::debug;

/// Parse `.properties` text. `origin_name` names the source in origins.
pub fn parse_properties(text: &str, origin_name: &str) -> Result<Value, ConfigError> {
    let base = Origin::file(origin_name);
    let mut entries: IndexMap<Vec<String>, (String, usize)> = IndexMap::new();

    for (line, logical) in logical_lines(text) {
        let origin = base.clone().with_line(line);
        let (key, value) = split_entry(&logical, &origin)?;
        let keys: Vec<String> = key.split('.').map(str::to_string).collect();
        // re-insert so the later position wins too
        entries.shift_remove(&keys);
        entries.insert(keys, (value, line));
    }

    let mut root = Value::empty_object(base.clone());
    for (keys, (value, line)) in &entries {
        let is_parent = entries
            .keys()
            .any(|other| other.len() > keys.len() && other.starts_with(keys));
        if is_parent {
            debug!(key = %keys.join("."), "properties key is also an object; dropping its value");
            continue;
        }
        let Some(path) = Path::from_keys(keys.iter().cloned()) else {
            continue;
        };
        let leaf = Value::string(value.clone(), base.clone().with_line(*line));
        root = root.with_value(&path, leaf)?;
    }
    Ok(root)
}

/// Join continuation lines and drop blanks and comments. Yields the
/// 1-based line each logical line starts on.
fn logical_lines(text: &str) -> Vec<(usize, String)> {
    let mut out = Vec::new();
    let mut current: Option<(usize, String)> = None;

    for (index, raw) in text.lines().enumerate() {
        let trimmed = raw.trim_start_matches([' ', '\t', '\u{0c}']);
        let line = match current.take() {
            Some((start, mut pending)) => {
                pending.push_str(trimmed);
                (start, pending)
            }
            None => {
                if trimmed.is_empty() || trimmed.starts_with('#') || trimmed.starts_with('!') {
                    continue;
                }
                (index + 1, trimmed.to_string())
            }
        };

        let (start, mut text) = line;
        if ends_with_continuation(&text) {
            text.pop();
            current = Some((start, text));
        } else {
            out.push((start, text));
        }
    }
    if let Some(pending) = current {
        out.push(pending);
    }
    out
}

/// An odd number of trailing backslashes continues the line.
fn ends_with_continuation(line: &str) -> bool {
    line.chars().rev().take_while(|c| *c == '\\').count() % 2 == 1
}

fn split_entry(line: &str, origin: &Origin) -> Result<(String, String), ConfigError> {
    let mut chars = line.chars().peekable();
    let mut raw_key = String::new();
    let mut escaped = false;

    while let Some(&c) = chars.peek() {
        if escaped {
            raw_key.push(c);
            escaped = false;
        } else if c == '\\' {
            raw_key.push(c);
            escaped = true;
        } else if c == '=' || c == ':' || c.is_whitespace() {
            break;
        } else {
            raw_key.push(c);
        }
        chars.next();
    }

    while chars.next_if(|c| c.is_whitespace()).is_some() {}
    if chars.next_if(|c| *c == '=' || *c == ':').is_some() {
        while chars.next_if(|c| c.is_whitespace()).is_some() {}
    }
    let raw_value: String = chars.collect();

    let key = unescape(&raw_key, origin)?;
    let value = unescape(&raw_value, origin)?;
    Ok((key, value))
}

fn unescape(raw: &str, origin: &Origin) -> Result<String, ConfigError> {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('t') => out.push('\t'),
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some('f') => out.push('\u{0c}'),
            Some('u') => {
                let hex: String = chars.by_ref().take(4).collect();
                let decoded = u32::from_str_radix(&hex, 16)
                    .ok()
                    .filter(|_| hex.len() == 4)
                    .and_then(char::from_u32)
                    .ok_or_else(|| ConfigError::BadValue {
                        path: raw.to_string(),
                        message: format!("malformed \\u escape '\\u{hex}'"),
                        origin: Some(origin.clone()),
                    })?;
                out.push(decoded);
            }
            Some(other) => out.push(other),
            None => {}
        }
    }
    Ok(out)
}
