//! Rendering value trees as HOCON-ish or JSON text.
//!
//! Rendering works on unresolved trees too: substitutions print as
//! `${path}`, concatenations print their pieces back to back, and merge
//! stacks print as a commented block listing every element. Such output is
//! for humans; only resolved trees rendered with `json` set round-trip
//! through a JSON parser.

use crate::path::render_json_string;
use crate::value::{Value, ValueKind};
use indexmap::IndexMap;
use num_bigint::BigInt;
use std::cmp::Ordering;
use std::fmt;

const INDENT: &str = "    ";

/// Controls the shape of rendered text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderOptions {
    /// Emit comments attached to values in the source
    pub comments: bool,
    /// Emit a `# description` line with each value's origin
    pub origin_comments: bool,
    /// Indent and break lines
    pub formatted: bool,
    /// Quote every key and string and use `:` separators
    pub json: bool,
}

impl RenderOptions {
    /// Everything on: formatted JSON with comments.
    pub fn defaults() -> Self {
        RenderOptions {
            comments: true,
            origin_comments: true,
            formatted: true,
            json: true,
        }
    }

    /// Compact single-line JSON.
    pub fn concise() -> Self {
        RenderOptions {
            comments: false,
            origin_comments: false,
            formatted: false,
            json: true,
        }
    }

    pub fn with_comments(mut self, comments: bool) -> Self {
        self.comments = comments;
        self
    }

    pub fn with_origin_comments(mut self, origin_comments: bool) -> Self {
        self.origin_comments = origin_comments;
        self
    }

    pub fn with_formatted(mut self, formatted: bool) -> Self {
        self.formatted = formatted;
        self
    }

    pub fn with_json(mut self, json: bool) -> Self {
        self.json = json;
        self
    }
}

impl Default for RenderOptions {
    fn default() -> Self {
        RenderOptions::defaults()
    }
}

impl Value {
    /// Render this value as text.
    pub fn render(&self, options: &RenderOptions) -> String {
        let mut renderer = Renderer {
            options: *options,
            out: String::new(),
        };
        renderer.value(self, 0, true, None);
        renderer.out
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render(&RenderOptions::concise()))
    }
}

struct Renderer {
    options: RenderOptions,
    out: String,
}

impl Renderer {
    fn indent(&mut self, level: usize) {
        if self.options.formatted {
            for _ in 0..level {
                self.out.push_str(INDENT);
            }
        }
    }

    /// Drop the last `n` bytes, which are always ASCII separators.
    fn chop(&mut self, n: usize) {
        let len = self.out.len().saturating_sub(n);
        self.out.truncate(len);
    }

    fn value(&mut self, value: &Value, level: usize, at_root: bool, at_key: Option<&str>) {
        if let ValueKind::DelayedMerge(stack) | ValueKind::DelayedMergeObject(stack) = value.kind()
        {
            self.delayed_merge(stack, level, at_root, at_key);
            return;
        }

        if let Some(key) = at_key {
            let rendered = if self.options.json {
                render_json_string(key)
            } else {
                render_string_unquoted_if_possible(key)
            };
            self.out.push_str(&rendered);

            let separator = match (self.options.json, self.options.formatted) {
                (true, true) => " : ",
                (true, false) => ":",
                (false, true) if value.as_object().is_some() => " ",
                (false, false) if value.as_object().is_some() => "",
                (false, _) => "=",
            };
            self.out.push_str(separator);
        }

        self.bare(value, level, at_root);
    }

    fn bare(&mut self, value: &Value, level: usize, at_root: bool) {
        match value.kind() {
            ValueKind::Null => self.out.push_str("null"),
            ValueKind::Boolean(b) => self.out.push_str(if *b { "true" } else { "false" }),
            ValueKind::Number { number, original } => match original {
                Some(text) => self.out.push_str(text),
                None => self.out.push_str(&number.to_string()),
            },
            ValueKind::String(s) => {
                let rendered = if self.options.json {
                    render_json_string(s)
                } else {
                    render_string_unquoted_if_possible(s)
                };
                self.out.push_str(&rendered);
            }
            ValueKind::List(items) => self.list(items, level),
            ValueKind::Object { entries, .. } => self.object(entries, level, at_root),
            ValueKind::Reference { expr, .. } => self.out.push_str(&expr.to_string()),
            ValueKind::Concatenation(pieces) => {
                for piece in pieces {
                    self.value(piece, level, false, None);
                }
            }
            ValueKind::DelayedMerge(stack) | ValueKind::DelayedMergeObject(stack) => {
                self.delayed_merge(stack, level, at_root, None);
            }
        }
    }

    fn comment_lines(&mut self, value: &Value, level: usize) {
        if self.options.origin_comments {
            let description = value.origin().description();
            for line in description.split('\n') {
                self.indent(level);
                self.out.push('#');
                if !line.is_empty() {
                    self.out.push(' ');
                }
                self.out.push_str(line);
                self.out.push('\n');
            }
        }
        if self.options.comments {
            for comment in &value.origin().comments {
                self.indent(level);
                self.out.push('#');
                if !comment.starts_with(' ') {
                    self.out.push(' ');
                }
                self.out.push_str(comment);
                self.out.push('\n');
            }
        }
    }

    fn object(&mut self, entries: &IndexMap<String, Value>, level: usize, at_root: bool) {
        if entries.is_empty() {
            self.out.push_str("{}");
        } else {
            let outer_braces = self.options.json || !at_root;
            let inner = if outer_braces {
                self.out.push('{');
                if self.options.formatted {
                    self.out.push('\n');
                }
                level + 1
            } else {
                level
            };

            let mut keys: Vec<&String> = entries.keys().collect();
            keys.sort_by(|a, b| compare_keys(a, b));

            let mut separator_len = 0;
            for key in keys {
                let child = &entries[key.as_str()];
                self.comment_lines(child, inner);
                self.indent(inner);
                self.value(child, inner, false, Some(key));

                if self.options.formatted {
                    if self.options.json {
                        self.out.push(',');
                        separator_len = 2;
                    } else {
                        separator_len = 1;
                    }
                    self.out.push('\n');
                } else {
                    self.out.push(',');
                    separator_len = 1;
                }
            }
            self.chop(separator_len);

            if outer_braces {
                if self.options.formatted {
                    self.out.push('\n');
                    self.indent(level);
                }
                self.out.push('}');
            }
        }

        if at_root && self.options.formatted {
            self.out.push('\n');
        }
    }

    fn list(&mut self, items: &[Value], level: usize) {
        if items.is_empty() {
            self.out.push_str("[]");
            return;
        }

        self.out.push('[');
        if self.options.formatted {
            self.out.push('\n');
        }
        for item in items {
            self.comment_lines(item, level + 1);
            self.indent(level + 1);
            self.value(item, level + 1, false, None);
            self.out.push(',');
            if self.options.formatted {
                self.out.push('\n');
            }
        }
        self.chop(1);
        if self.options.formatted {
            // the newline went first, now the comma
            self.chop(1);
            self.out.push('\n');
            self.indent(level);
        }
        self.out.push(']');
    }

    fn delayed_merge(&mut self, stack: &[Value], level: usize, at_root: bool, at_key: Option<&str>) {
        let comment_merge = self.options.comments;
        if comment_merge {
            self.out.push_str(&format!(
                "# unresolved merge of {} values follows (\n",
                stack.len()
            ));
            if at_key.is_none() {
                self.indent(level);
                self.out.push_str(
                    "# this unresolved merge will not be parseable because it's at the root of the object\n",
                );
                self.indent(level);
                self.out.push_str(
                    "# the HOCON format has no way to list multiple root objects in a single file\n",
                );
            }
        }

        // bottom of the stack first, so later text overrides earlier as in a file
        for (i, element) in stack.iter().rev().enumerate() {
            if comment_merge {
                self.indent(level);
                match at_key {
                    Some(key) => self.out.push_str(&format!(
                        "#     unmerged value {i} for key {} from ",
                        render_json_string(key)
                    )),
                    None => self.out.push_str(&format!("#     unmerged value {i} from ")),
                }
                self.out.push_str(&element.origin().description());
                self.out.push('\n');
                for comment in &element.origin().comments {
                    self.indent(level);
                    self.out.push_str("# ");
                    self.out.push_str(comment);
                    self.out.push('\n');
                }
            }
            self.indent(level);
            if let Some(key) = at_key {
                self.out.push_str(&render_json_string(key));
                self.out.push_str(if self.options.formatted { " : " } else { ":" });
            }
            self.value(element, level, at_root, None);
            self.out.push(',');
            if self.options.formatted {
                self.out.push('\n');
            }
        }
        self.chop(1);
        if self.options.formatted {
            self.chop(1);
            self.out.push('\n');
        }
        if comment_merge {
            self.indent(level);
            self.out.push_str("# ) end of unresolved merge\n");
        }
    }
}

/// Numeric keys first, in numeric order, then everything else.
fn compare_keys(a: &str, b: &str) -> Ordering {
    match (numeric_key(a), numeric_key(b)) {
        (Some(x), Some(y)) => x.cmp(&y).then_with(|| a.cmp(b)),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => a.cmp(b),
    }
}

fn numeric_key(key: &str) -> Option<BigInt> {
    if key.is_empty() || !key.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    key.parse().ok()
}

/// Leave simple words unquoted; quote anything that could be misread.
fn render_string_unquoted_if_possible(s: &str) -> String {
    let Some(first) = s.chars().next() else {
        return render_json_string(s);
    };
    if first.is_ascii_digit() || first == '-' {
        return render_json_string(s);
    }
    if ["include", "true", "false", "null"]
        .iter()
        .any(|word| s.starts_with(word))
        || s.contains("//")
    {
        return render_json_string(s);
    }
    if s.chars().all(|c| c.is_alphanumeric() || c == '-') {
        s.to_string()
    } else {
        render_json_string(s)
    }
}
