//! Origin records attached to configuration values

use crate::types::Range;
use serde::{Deserialize, Serialize};
use std::fmt;

const MERGE_OF_PREFIX: &str = "merge of ";

/// Where an origin's text came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OriginKind {
    /// Synthetic description (built in code, merged origins, ...)
    Generic,
    /// A file on disk or a named in-memory document
    File,
    /// An injected environment or system-property snapshot
    Environment,
}

/// Provenance of a configuration value.
///
/// Origins are informational: two values with different origins can still
/// be equal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Origin {
    /// Human-readable source name (file name, "env variables", ...)
    pub description: String,
    /// File name, for file-backed origins
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
    /// Line range in the source, when known
    #[serde(skip_serializing_if = "Option::is_none")]
    pub range: Option<Range>,
    /// Comments that preceded the value in the source
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub comments: Vec<String>,
    pub kind: OriginKind,
}

impl Default for Origin {
    fn default() -> Self {
        Origin::generic("hardcoded value")
    }
}

impl Origin {
    /// Origin with a synthetic description.
    pub fn generic(description: impl Into<String>) -> Self {
        Origin {
            description: description.into(),
            filename: None,
            range: None,
            comments: Vec::new(),
            kind: OriginKind::Generic,
        }
    }

    /// Origin for a file (or a named in-memory document).
    pub fn file(path: impl Into<String>) -> Self {
        let path = path.into();
        Origin {
            description: path.clone(),
            filename: Some(path),
            range: None,
            comments: Vec::new(),
            kind: OriginKind::File,
        }
    }

    /// Origin for values taken from an environment snapshot.
    pub fn environment() -> Self {
        Origin {
            description: "env variables".to_string(),
            filename: None,
            range: None,
            comments: Vec::new(),
            kind: OriginKind::Environment,
        }
    }

    pub fn with_range(mut self, range: Range) -> Self {
        self.range = Some(range);
        self
    }

    /// Set a single-line range. `line` is 1-based.
    pub fn with_line(self, line: usize) -> Self {
        let row = line.saturating_sub(1);
        self.with_range(Range::lines(row, row))
    }

    pub fn with_comments(mut self, comments: Vec<String>) -> Self {
        self.comments = comments;
        self
    }

    /// Put `comments` in front of the existing ones.
    pub fn prepend_comments(mut self, mut comments: Vec<String>) -> Self {
        comments.append(&mut self.comments);
        self.comments = comments;
        self
    }

    /// First line of the range (1-based), if known.
    pub fn line_number(&self) -> Option<usize> {
        self.range.map(|r| r.start.row + 1)
    }

    /// Last line of the range (1-based), if known.
    pub fn end_line_number(&self) -> Option<usize> {
        self.range.map(|r| r.end.row.max(r.start.row) + 1)
    }

    /// Description with line numbers, e.g. `app.conf: 3-5`.
    pub fn description(&self) -> String {
        match (self.line_number(), self.end_line_number()) {
            (Some(start), Some(end)) if end > start => {
                format!("{}: {}-{}", self.description, start, end)
            }
            (Some(start), _) => format!("{}: {}", self.description, start),
            _ => self.description.clone(),
        }
    }

    /// Combine two origins, e.g. for the result of merging two values.
    ///
    /// Origins from the same source collapse into one record spanning both
    /// line ranges. Anything else becomes a generic "merge of" record.
    pub fn merge(a: &Origin, b: &Origin) -> Origin {
        if a == b {
            return a.clone();
        }

        let comments = merge_comments(&a.comments, &b.comments);

        if a.kind == b.kind && a.description == b.description && a.filename == b.filename {
            let range = match (a.range, b.range) {
                (Some(ra), Some(rb)) => Some(ra.span(&rb)),
                (ra, rb) => ra.or(rb),
            };
            return Origin {
                description: a.description.clone(),
                filename: a.filename.clone(),
                range,
                comments,
                kind: a.kind,
            };
        }

        let a_desc = a.description();
        let b_desc = b.description();
        let a_desc = a_desc.strip_prefix(MERGE_OF_PREFIX).unwrap_or(&a_desc);
        let b_desc = b_desc.strip_prefix(MERGE_OF_PREFIX).unwrap_or(&b_desc);

        Origin {
            description: format!("{MERGE_OF_PREFIX}{a_desc},{b_desc}"),
            filename: None,
            range: None,
            comments,
            kind: OriginKind::Generic,
        }
    }

    /// Fold [`Origin::merge`] over a sequence. `None` for an empty sequence.
    pub fn merge_all<'a>(origins: impl IntoIterator<Item = &'a Origin>) -> Option<Origin> {
        let mut iter = origins.into_iter();
        let first = iter.next()?.clone();
        Some(iter.fold(first, |acc, next| Origin::merge(&acc, next)))
    }
}

fn merge_comments(a: &[String], b: &[String]) -> Vec<String> {
    let mut out = a.to_vec();
    for c in b {
        if !out.contains(c) {
            out.push(c.clone());
        }
    }
    out
}

impl fmt::Display for Origin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.description())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_description_single_line() {
        let origin = Origin::file("app.conf").with_line(3);
        assert_eq!(origin.description(), "app.conf: 3");
        assert_eq!(origin.line_number(), Some(3));
    }

    #[test]
    fn test_description_without_lines() {
        assert_eq!(Origin::generic("defaults").description(), "defaults");
        assert_eq!(Origin::environment().to_string(), "env variables");
    }

    #[test]
    fn test_merge_same_file_spans_lines() {
        let a = Origin::file("app.conf").with_line(7);
        let b = Origin::file("app.conf").with_line(3);

        let merged = Origin::merge(&a, &b);
        assert_eq!(merged.kind, OriginKind::File);
        assert_eq!(merged.description(), "app.conf: 3-7");
    }

    #[test]
    fn test_merge_different_sources() {
        let a = Origin::file("a.conf").with_line(1);
        let b = Origin::file("b.conf").with_line(2);

        let merged = Origin::merge(&a, &b);
        assert_eq!(merged.kind, OriginKind::Generic);
        assert_eq!(merged.description(), "merge of a.conf: 1,b.conf: 2");
    }

    #[test]
    fn test_merge_does_not_nest_prefix() {
        let a = Origin::file("a.conf");
        let b = Origin::file("b.conf");
        let c = Origin::file("c.conf");

        let merged = Origin::merge_all([&a, &b, &c]).unwrap();
        assert_eq!(merged.description(), "merge of a.conf,b.conf,c.conf");
    }

    #[test]
    fn test_merge_comments_deduplicated() {
        let a = Origin::file("a.conf").with_comments(vec!["shared".into(), "only a".into()]);
        let b = Origin::file("a.conf").with_comments(vec!["shared".into(), "only b".into()]);

        let merged = Origin::merge(&a, &b);
        assert_eq!(merged.comments, vec!["shared", "only a", "only b"]);
    }

    #[test]
    fn test_merge_all_empty() {
        assert!(Origin::merge_all(std::iter::empty()).is_none());
    }

    #[test]
    fn test_prepend_comments() {
        let origin = Origin::generic("x")
            .with_comments(vec!["second".into()])
            .prepend_comments(vec!["first".into()]);
        assert_eq!(origin.comments, vec!["first", "second"]);
    }

    #[test]
    fn test_serde_roundtrip() {
        let origin = Origin::file("app.conf")
            .with_line(4)
            .with_comments(vec!["note".into()]);
        let json = serde_json::to_string(&origin).unwrap();
        let back: Origin = serde_json::from_str(&json).unwrap();
        assert_eq!(origin, back);
    }
}
