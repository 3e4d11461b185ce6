//! YAML parser that builds configuration value trees.

use crate::error::{Result, YamlError};
use hocon_config::{Number, Path, Value};
use hocon_origin::Origin;
use indexmap::IndexMap;
use num_bigint::BigInt;
use tracing::{debug, trace};
use yaml_rust2::parser::{Event, MarkedEventReceiver, Parser, Tag};
use yaml_rust2::scanner::{Marker, TScalarStyle};

/// Parse YAML from a string.
///
/// Only the first document is read. An empty document is an empty object.
///
/// # Example
///
/// ```rust
/// use hocon_yaml::parse;
///
/// let value = parse("title: My Document").unwrap();
/// assert_eq!(value.get("title").and_then(|v| v.as_str()), Some("My Document"));
/// ```
///
/// # Errors
///
/// Returns an error if the YAML is invalid or uses a construct with no
/// configuration equivalent.
pub fn parse(content: &str) -> Result<Value> {
    parse_impl(content, Origin::generic("yaml"))
}

/// Parse YAML from a string with an associated filename.
///
/// The filename and line of every node end up in its origin.
///
/// ```rust
/// use hocon_yaml::parse_file;
///
/// let value = parse_file("title: Test", "config.yaml").unwrap();
/// assert_eq!(value.origin().filename.as_deref(), Some("config.yaml"));
/// ```
pub fn parse_file(content: &str, filename: &str) -> Result<Value> {
    parse_impl(content, Origin::file(filename))
}

fn parse_impl(content: &str, base: Origin) -> Result<Value> {
    debug!(origin = %base.description, bytes = content.len(), "parsing YAML");
    let mut parser = Parser::new_from_str(content);
    let mut builder = ValueBuilder::new(base);

    parser
        .load(&mut builder, false) // false = single document only
        .map_err(|err| YamlError::from_scan(&err, &builder.base))?;

    builder.result()
}

/// Builder that implements MarkedEventReceiver to construct a value tree.
struct ValueBuilder {
    base: Origin,

    /// Containers being constructed
    stack: Vec<Frame>,

    root: Option<Value>,

    /// First error seen; later events are ignored
    error: Option<YamlError>,
}

/// A container being constructed during parsing.
enum Frame {
    Sequence {
        origin: Origin,
        items: Vec<Value>,
        tag: Option<String>,
    },

    Mapping {
        origin: Origin,
        entries: IndexMap<String, Value>,
        tag: Option<String>,
        /// Key waiting for its value
        key: Option<String>,
    },
}

impl ValueBuilder {
    fn new(base: Origin) -> Self {
        Self {
            base,
            stack: Vec::new(),
            root: None,
            error: None,
        }
    }

    fn result(self) -> Result<Value> {
        if let Some(err) = self.error {
            return Err(err);
        }
        Ok(self
            .root
            .unwrap_or_else(|| Value::empty_object(self.base.clone())))
    }

    fn origin_at(&self, marker: &Marker) -> Origin {
        // yaml-rust2 lines are 0-based
        self.base.clone().with_line(marker.line() + 1)
    }

    fn unsupported(&self, message: impl Into<String>, marker: &Marker) -> YamlError {
        YamlError::Unsupported {
            message: message.into(),
            origin: self.origin_at(marker),
        }
    }

    /// True when the next scalar is a mapping key.
    fn expecting_key(&self) -> bool {
        matches!(self.stack.last(), Some(Frame::Mapping { key: None, .. }))
    }

    /// Keys from the root down to the value being built, if it sits only
    /// under mappings.
    fn key_path(&self) -> Option<Path> {
        let mut keys = Vec::with_capacity(self.stack.len());
        for frame in &self.stack {
            match frame {
                Frame::Mapping { key: Some(key), .. } => keys.push(key.clone()),
                _ => return None,
            }
        }
        Path::from_keys(keys)
    }

    fn push_complete(&mut self, node: Value) {
        match self.stack.last_mut() {
            None => {
                if self.root.is_none() {
                    self.root = Some(node);
                }
            }
            Some(Frame::Sequence { items, .. }) => items.push(node),
            Some(Frame::Mapping { entries, key, .. }) => {
                if let Some(key) = key.take() {
                    // a repeated key merges over the earlier value
                    let merged = match entries.get(&key) {
                        Some(earlier) => node.with_fallback(earlier),
                        None => node,
                    };
                    entries.insert(key, merged);
                }
            }
        }
    }

    /// Expand `key: !append value` into `${?key} [value]`.
    fn appended(&self, node: Value, marker: &Marker) -> Result<Value> {
        let path = self
            .key_path()
            .ok_or_else(|| self.unsupported("!append is only allowed on mapping values", marker))?;
        Ok(Value::self_append(&path, node))
    }

    fn scalar(&mut self, text: String, style: TScalarStyle, tag: Option<Tag>, marker: Marker) -> Result<()> {
        if self.expecting_key() {
            if let Some(Frame::Mapping { key, .. }) = self.stack.last_mut() {
                *key = Some(text);
            }
            return Ok(());
        }

        let origin = self.origin_at(&marker);
        let tag = tag.map(|t| t.suffix);
        let node = match tag.as_deref() {
            Some("str") => Value::string(text, origin),
            Some("concat") => {
                return Err(self.unsupported("!concat applies to sequences, not scalars", &marker));
            }
            _ => scalar_value(&text, style, origin)?,
        };
        let node = match tag.as_deref() {
            Some("append") => self.appended(node, &marker)?,
            Some(other) if other != "str" => {
                trace!(tag = other, "ignoring YAML tag");
                node
            }
            _ => node,
        };
        self.push_complete(node);
        Ok(())
    }

    fn container_start(&mut self, frame: Frame, marker: &Marker) -> Result<()> {
        if self.expecting_key() {
            return Err(self.unsupported("only scalar mapping keys are supported", marker));
        }
        self.stack.push(frame);
        Ok(())
    }

    fn sequence_end(&mut self, marker: &Marker) -> Result<()> {
        let Some(Frame::Sequence { origin, items, tag }) = self.stack.pop() else {
            return Err(self.unsupported("sequence end without a sequence", marker));
        };
        let node = match tag.as_deref() {
            Some("concat") => Value::concatenate(items)?
                .ok_or_else(|| self.unsupported("!concat needs at least one item", marker))?,
            _ => Value::list(items, origin),
        };
        let node = match tag.as_deref() {
            Some("append") => self.appended(node, marker)?,
            _ => node,
        };
        self.push_complete(node);
        Ok(())
    }

    fn mapping_end(&mut self, marker: &Marker) -> Result<()> {
        let Some(Frame::Mapping {
            origin,
            entries,
            tag,
            ..
        }) = self.stack.pop()
        else {
            return Err(self.unsupported("mapping end without a mapping", marker));
        };
        let node = Value::object(entries, origin);
        let node = match tag.as_deref() {
            Some("append") => self.appended(node, marker)?,
            Some("concat") => {
                return Err(self.unsupported("!concat applies to sequences, not mappings", marker));
            }
            _ => node,
        };
        self.push_complete(node);
        Ok(())
    }

    fn handle(&mut self, ev: Event, marker: Marker) -> Result<()> {
        match ev {
            Event::Nothing
            | Event::StreamStart
            | Event::StreamEnd
            | Event::DocumentStart
            | Event::DocumentEnd => Ok(()),

            Event::Scalar(text, style, _anchor_id, tag) => self.scalar(text, style, tag, marker),

            Event::SequenceStart(_anchor_id, tag) => {
                let frame = Frame::Sequence {
                    origin: self.origin_at(&marker),
                    items: Vec::new(),
                    tag: tag.map(|t| t.suffix),
                };
                self.container_start(frame, &marker)
            }
            Event::SequenceEnd => self.sequence_end(&marker),

            Event::MappingStart(_anchor_id, tag) => {
                let frame = Frame::Mapping {
                    origin: self.origin_at(&marker),
                    entries: IndexMap::new(),
                    tag: tag.map(|t| t.suffix),
                    key: None,
                };
                self.container_start(frame, &marker)
            }
            Event::MappingEnd => self.mapping_end(&marker),

            Event::Alias(_anchor_id) => Err(self.unsupported("YAML aliases are not supported", &marker)),
        }
    }
}

impl MarkedEventReceiver for ValueBuilder {
    fn on_event(&mut self, ev: Event, marker: Marker) {
        if self.error.is_some() {
            return;
        }
        if let Err(err) = self.handle(ev, marker) {
            self.error = Some(err);
        }
    }
}

/// Type a scalar. Only plain (unquoted) scalars are inferred; quoted ones
/// are always strings.
fn scalar_value(text: &str, style: TScalarStyle, origin: Origin) -> Result<Value> {
    if style != TScalarStyle::Plain {
        return Ok(Value::string(text, origin));
    }
    if text.contains("${") {
        return substitution_value(text, origin);
    }

    let value = match text {
        "null" | "Null" | "NULL" | "~" | "" => Value::null(origin),
        "true" | "True" | "TRUE" | "yes" | "Yes" | "YES" | "on" | "On" | "ON" => {
            Value::boolean(true, origin)
        }
        "false" | "False" | "FALSE" | "no" | "No" | "NO" | "off" | "Off" | "OFF" => {
            Value::boolean(false, origin)
        }
        _ => match parse_number(text) {
            Some(number) => Value::number(number, Some(text.to_string()), origin),
            None => Value::string(text, origin),
        },
    };
    Ok(value)
}

fn parse_number(text: &str) -> Option<Number> {
    if let Ok(i) = text.parse::<i64>() {
        return Some(Number::Int(i));
    }
    let digits = text.strip_prefix('-').unwrap_or(text);
    if !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()) {
        return text.parse::<BigInt>().ok().map(Number::BigInt);
    }
    // keep words like "inf" and "nan" as strings
    let numeric_chars = text
        .bytes()
        .all(|b| b.is_ascii_digit() || matches!(b, b'+' | b'-' | b'.' | b'e' | b'E'));
    if numeric_chars && text.bytes().any(|b| b.is_ascii_digit()) {
        return text.parse::<f64>().ok().map(Number::Double);
    }
    None
}

/// Split `prefix ${a.b} suffix` into string and substitution pieces.
fn substitution_value(text: &str, origin: Origin) -> Result<Value> {
    let mut pieces = Vec::new();
    let mut rest = text;

    while let Some(start) = rest.find("${") {
        if start > 0 {
            pieces.push(Value::string(&rest[..start], origin.clone()));
        }
        let after = &rest[start + 2..];
        let Some(end) = after.find('}') else {
            return Err(YamlError::Unsupported {
                message: format!("unterminated substitution in '{text}'"),
                origin,
            });
        };
        let inner = &after[..end];
        let (optional, expression) = match inner.strip_prefix('?') {
            Some(expression) => (true, expression),
            None => (false, inner),
        };
        let path = Path::parse(expression.trim()).map_err(|err| err.with_origin_if_missing(&origin))?;
        pieces.push(Value::reference(path, optional, origin.clone()));
        rest = &after[end + 1..];
    }
    if !rest.is_empty() {
        pieces.push(Value::string(rest, origin.clone()));
    }

    Ok(Value::concatenate(pieces)?.unwrap_or_else(|| Value::string(text, origin)))
}
