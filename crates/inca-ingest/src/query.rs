//! Minimal jq-style paths over report JSON.
//!
//! Supported syntax: `.` (identity), `.key`, `."quoted key"`, `[]` (iterate
//! an array or object values) and `[n]` (index). Segments chain, e.g.
//! `.acmgScoring.criteria[].name`. A missing key on an object (or a key on
//! null) yields null, as jq does.

use std::fmt;
use std::str::FromStr;

use serde_json::Value;

use crate::error::IngestError;

static NULL: Value = Value::Null;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Key(String),
    Iterate,
    Index(usize),
}

/// A parsed path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JsonQuery {
    source: String,
    segments: Vec<Segment>,
}

impl JsonQuery {
    pub fn parse(query: &str) -> Result<Self, IngestError> {
        let invalid = |reason: &str| IngestError::InvalidQuery {
            query: query.to_string(),
            reason: reason.to_string(),
        };
        let trimmed = query.trim();
        if !trimmed.starts_with('.') {
            return Err(invalid("path must start with '.'"));
        }
        let mut segments = Vec::new();
        let mut chars = trimmed.chars().peekable();
        while let Some(ch) = chars.next() {
            match ch {
                '.' => match chars.peek() {
                    None | Some('.' | '[') => {}
                    Some('"') => {
                        chars.next();
                        let mut key = String::new();
                        let mut closed = false;
                        for ch in chars.by_ref() {
                            if ch == '"' {
                                closed = true;
                                break;
                            }
                            key.push(ch);
                        }
                        if !closed {
                            return Err(invalid("unterminated quoted key"));
                        }
                        segments.push(Segment::Key(key));
                    }
                    Some(_) => {
                        let mut key = String::new();
                        while let Some(next) = chars.next_if(|c| *c != '.' && *c != '[') {
                            key.push(next);
                        }
                        segments.push(Segment::Key(key));
                    }
                },
                '[' => {
                    let mut inner = String::new();
                    let mut closed = false;
                    for ch in chars.by_ref() {
                        if ch == ']' {
                            closed = true;
                            break;
                        }
                        inner.push(ch);
                    }
                    if !closed {
                        return Err(invalid("unterminated '['"));
                    }
                    let inner = inner.trim();
                    if inner.is_empty() {
                        segments.push(Segment::Iterate);
                    } else {
                        let index = inner
                            .parse::<usize>()
                            .map_err(|_| invalid("index must be a non-negative integer"))?;
                        segments.push(Segment::Index(index));
                    }
                }
                _ => return Err(invalid("unexpected character")),
            }
        }
        Ok(Self {
            source: trimmed.to_string(),
            segments,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Every value the path reaches, in document order.
    pub fn all<'a>(&self, input: &'a Value) -> Vec<&'a Value> {
        let mut current = vec![input];
        for segment in &self.segments {
            let mut next = Vec::new();
            for value in current {
                match segment {
                    Segment::Key(key) => {
                        if let Some(found) = value.get(key.as_str()) {
                            next.push(found);
                        } else if value.is_object() || value.is_null() {
                            next.push(&NULL);
                        }
                    }
                    Segment::Iterate => match value {
                        Value::Array(items) => next.extend(items.iter()),
                        Value::Object(map) => next.extend(map.values()),
                        _ => {}
                    },
                    Segment::Index(index) => {
                        if let Some(found) = value.get(*index) {
                            next.push(found);
                        }
                    }
                }
            }
            current = next;
        }
        current
    }

    /// First value reached, treating null as absent.
    pub fn first<'a>(&self, input: &'a Value) -> Option<&'a Value> {
        self.all(input).into_iter().find(|value| !value.is_null())
    }
}

impl FromStr for JsonQuery {
    type Err = IngestError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for JsonQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn doc() -> Value {
        json!({
            "geneName": "BRCA1",
            "acmgScoring": {
                "criteria": [
                    {"name": "PM2_SUPPORTING", "strength": "SUPPORTING"},
                    {"name": "PP3", "strength": "SUPPORTING"}
                ]
            },
            "odd key": 3
        })
    }

    #[test]
    fn key_paths() {
        let doc = doc();
        let query = JsonQuery::parse(".geneName").unwrap();
        assert_eq!(query.all(&doc), vec![&json!("BRCA1")]);
        let quoted = JsonQuery::parse(".\"odd key\"").unwrap();
        assert_eq!(quoted.first(&doc), Some(&json!(3)));
    }

    #[test]
    fn iterate_and_index() {
        let doc = doc();
        let names = JsonQuery::parse(".acmgScoring.criteria[].name").unwrap();
        assert_eq!(
            names.all(&doc),
            vec![&json!("PM2_SUPPORTING"), &json!("PP3")]
        );
        let second = JsonQuery::parse(".acmgScoring.criteria[1].name").unwrap();
        assert_eq!(second.first(&doc), Some(&json!("PP3")));
    }

    #[test]
    fn missing_key_on_object_yields_null() {
        let doc = doc();
        let query = JsonQuery::parse(".transcript").unwrap();
        assert_eq!(query.all(&doc), vec![&Value::Null]);
        assert_eq!(query.first(&doc), None);
        let nested = JsonQuery::parse(".transcript.id").unwrap();
        assert_eq!(nested.all(&doc), vec![&Value::Null]);
        let on_string = JsonQuery::parse(".geneName.symbol").unwrap();
        assert!(on_string.all(&doc).is_empty());
    }

    #[test]
    fn identity_and_errors() {
        let doc = doc();
        assert_eq!(JsonQuery::parse(".").unwrap().all(&doc).len(), 1);
        assert!(JsonQuery::parse("geneName").is_err());
        assert!(JsonQuery::parse(".a[").is_err());
        assert!(JsonQuery::parse(".a[x]").is_err());
    }
}
