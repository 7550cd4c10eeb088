//! Panel database dump reader.
//!
//! One panel per line: `id<TAB>name<TAB>relevant_disorders`, where the last
//! column is a list literal such as `['R134', "Familial hypercholesterolaemia"]`.

use std::path::Path;

use inca_model::PanelRecord;
use tracing::{debug, warn};

use crate::error::{IngestError, Result};
use crate::tsv::{cell, csv_error, is_blank, line_of, tsv_reader};

/// Read every panel from the dump.
pub fn read_panel_dump(path: &Path) -> Result<Vec<PanelRecord>> {
    let mut reader = tsv_reader(path, false)?;
    let mut panels = Vec::new();
    for (index, record) in reader.records().enumerate() {
        let record = record.map_err(|source| csv_error(path, source))?;
        if is_blank(&record) {
            continue;
        }
        let id = cell(&record, 0);
        if index == 0 && id.eq_ignore_ascii_case("id") {
            continue;
        }
        if record.len() < 3 {
            return Err(IngestError::MalformedRow {
                path: path.to_path_buf(),
                line: line_of(&record),
                reason: format!("expected 3 columns, found {}", record.len()),
            });
        }
        let disorders =
            parse_disorder_list(cell(&record, 2)).map_err(|reason| IngestError::MalformedRow {
                path: path.to_path_buf(),
                line: line_of(&record),
                reason,
            })?;
        panels.push(PanelRecord::new(id, cell(&record, 1), disorders));
    }
    if panels.is_empty() {
        warn!(path = %path.display(), "panel dump is empty");
    }
    debug!(path = %path.display(), panel_count = panels.len(), "panel dump loaded");
    Ok(panels)
}

/// Parse a list literal of quoted strings.
///
/// Accepts single or double quotes, backslash escapes, and a trailing comma.
pub fn parse_disorder_list(raw: &str) -> std::result::Result<Vec<String>, String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(Vec::new());
    }
    let inner = trimmed
        .strip_prefix('[')
        .and_then(|rest| rest.strip_suffix(']'))
        .ok_or_else(|| format!("disorders must be a bracketed list: {trimmed}"))?;

    let mut items = Vec::new();
    let mut chars = inner.chars().peekable();
    loop {
        while chars.next_if(|ch| ch.is_whitespace()).is_some() {}
        let Some(quote) = chars.next() else {
            break;
        };
        if quote != '\'' && quote != '"' {
            return Err(format!("expected a quoted string, found '{quote}'"));
        }
        let mut value = String::new();
        let mut closed = false;
        while let Some(ch) = chars.next() {
            match ch {
                '\\' => match chars.next() {
                    Some('n') => value.push('\n'),
                    Some('t') => value.push('\t'),
                    Some(other) => value.push(other),
                    None => break,
                },
                ch if ch == quote => {
                    closed = true;
                    break;
                }
                ch => value.push(ch),
            }
        }
        if !closed {
            return Err("unterminated string in disorder list".to_string());
        }
        items.push(value);
        while chars.next_if(|ch| ch.is_whitespace()).is_some() {}
        match chars.next() {
            Some(',') | None => {}
            Some(other) => return Err(format!("expected ',' between items, found '{other}'")),
        }
    }
    Ok(items)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_mixed_quotes() {
        let parsed = parse_disorder_list(r#"['R134', "Alport's syndrome", 'a\'b',]"#).unwrap();
        assert_eq!(parsed, vec!["R134", "Alport's syndrome", "a'b"]);
    }

    #[test]
    fn empty_list_and_blank() {
        assert!(parse_disorder_list("[]").unwrap().is_empty());
        assert!(parse_disorder_list("  ").unwrap().is_empty());
    }

    #[test]
    fn rejects_bare_words() {
        assert!(parse_disorder_list("[R134]").is_err());
        assert!(parse_disorder_list("'R134'").is_err());
        assert!(parse_disorder_list("['R134'").is_err());
        assert!(parse_disorder_list("['R134' 'R135']").is_err());
    }
}
