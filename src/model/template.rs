// File: ./src/model/template.rs
//! `{...}` placeholder substitution for titles and descriptions.
//!
//! Three placeholder kinds are understood:
//!
//! - `{key}`: the value stored under `key`, as text.
//! - `{TID[key]}`: the minutes spanned by the `hhmm-hhmm` pair under `key`.
//! - `{FOR[key][format]}`: one line per entry of the list under `key`,
//!   where `<N>` in `format` is replaced by field `N` of the entry. A `#`
//!   after the key (`FOR[key#][...]`) drops entries whose last field
//!   contains `#ignore`.
//!
//! Substituted text is never scanned again.

use crate::model::timerange::{TimeRangeError, duration_minutes_with_today};
use chrono::{Local, NaiveDate};
use serde_json::{Map, Value};
use thiserror::Error;

/// Marks an entry that `FOR[key#]` should leave out.
pub const SKIP_MARKER: &str = "#ignore";
/// What a duration with no time pair collapses to inside a `FOR` format.
pub const EMPTY_DURATION: &str = "(TID[]m)";
pub const DEFAULT_OFF_RECORD_LABEL: &str = "(外部利用)";

#[derive(Debug, Error)]
pub enum TemplateError {
    #[error("malformed FOR placeholder '{0}': expected FOR[key][format]")]
    MalformedForEach(String),
    #[error("TID[{key}] needs a text value")]
    NotARange { key: String },
    #[error("FOR[{key}] needs a list value")]
    NotASequence { key: String },
    #[error("cannot compute duration of '{range}': {source}")]
    Duration {
        range: String,
        #[source]
        source: TimeRangeError,
    },
}

/// Read access to the data a template is rendered against.
pub trait Lookup {
    fn lookup(&self, key: &str) -> Option<&Value>;
}

impl Lookup for Map<String, Value> {
    fn lookup(&self, key: &str) -> Option<&Value> {
        self.get(key)
    }
}

impl Lookup for Value {
    fn lookup(&self, key: &str) -> Option<&Value> {
        self.as_object().and_then(|map| map.get(key))
    }
}

/// Renders `value` the way it appears inside generated text.
pub fn value_to_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        other => other.to_string(),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placeholder<'a> {
    Key(&'a str),
    DurationOf(&'a str),
    ForEach {
        key: &'a str,
        skip_flagged: bool,
        format: &'a str,
    },
}

impl<'a> Placeholder<'a> {
    /// Classifies the text between `{` and `}`.
    pub fn parse(body: &'a str) -> Result<Self, TemplateError> {
        if let Some(key) = body.strip_prefix("TID[").and_then(|s| s.strip_suffix(']')) {
            return Ok(Self::DurationOf(key));
        }
        if let Some(inner) = body.strip_prefix("FOR[").and_then(|s| s.strip_suffix(']')) {
            let malformed = || TemplateError::MalformedForEach(body.to_string());
            let (key, format) = inner.split_once("][").ok_or_else(malformed)?;
            if format.contains("][") {
                return Err(malformed());
            }
            let (key, skip_flagged) = match key.strip_suffix('#') {
                Some(key) => (key, true),
                None => (key, false),
            };
            if key.is_empty() {
                return Err(malformed());
            }
            return Ok(Self::ForEach {
                key,
                skip_flagged,
                format,
            });
        }
        Ok(Self::Key(body))
    }
}

#[derive(Debug, Clone)]
pub struct TemplateEngine {
    off_record_label: String,
    today: NaiveDate,
}

impl Default for TemplateEngine {
    fn default() -> Self {
        Self::new(DEFAULT_OFF_RECORD_LABEL)
    }
}

impl TemplateEngine {
    pub fn new(off_record_label: impl Into<String>) -> Self {
        Self {
            off_record_label: off_record_label.into(),
            today: Local::now().date_naive(),
        }
    }

    /// Overrides the reference date durations are computed on.
    pub fn with_today(mut self, today: NaiveDate) -> Self {
        self.today = today;
        self
    }

    pub fn render(&self, template: &str, data: &impl Lookup) -> Result<String, TemplateError> {
        let mut out = String::with_capacity(template.len());
        let mut rest = template;

        while let Some(open) = rest.find('{') {
            out.push_str(&rest[..open]);
            let after = &rest[open + 1..];
            match after.find('}') {
                Some(close) if close > 0 => {
                    let placeholder = Placeholder::parse(&after[..close])?;
                    out.push_str(&self.expand(placeholder, data)?);
                    rest = &after[close + 1..];
                }
                // `{}` is literal text; scanning resumes after the brace.
                Some(_) => {
                    out.push('{');
                    rest = after;
                }
                None => {
                    out.push_str(&rest[open..]);
                    rest = "";
                }
            }
        }
        out.push_str(rest);
        Ok(out)
    }

    fn expand(
        &self,
        placeholder: Placeholder<'_>,
        data: &impl Lookup,
    ) -> Result<String, TemplateError> {
        match placeholder {
            Placeholder::Key(key) => Ok(data.lookup(key).map(value_to_text).unwrap_or_default()),
            Placeholder::DurationOf(key) => match data.lookup(key) {
                None => Ok(String::new()),
                Some(Value::String(range)) => self.minutes(range),
                Some(_) => Err(TemplateError::NotARange {
                    key: key.to_string(),
                }),
            },
            Placeholder::ForEach {
                key,
                skip_flagged,
                format,
            } => {
                let items = match data.lookup(key) {
                    None => return Ok(String::new()),
                    Some(Value::Array(items)) => items,
                    Some(_) => {
                        return Err(TemplateError::NotASequence {
                            key: key.to_string(),
                        });
                    }
                };

                let mut res = String::new();
                for item in items {
                    let fields: &[Value] = match item {
                        Value::Array(fields) => fields.as_slice(),
                        single => std::slice::from_ref(single),
                    };
                    if skip_flagged
                        && fields
                            .last()
                            .is_some_and(|last| value_to_text(last).contains(SKIP_MARKER))
                    {
                        continue;
                    }
                    res.push_str(&self.expand_item(format, fields)?);
                    res.push('\n');
                }
                Ok(res)
            }
        }
    }

    fn expand_item(&self, format: &str, fields: &[Value]) -> Result<String, TemplateError> {
        let line = substitute_fields(format, fields);
        let line = self.substitute_durations(&line)?;
        Ok(line.replace(EMPTY_DURATION, &self.off_record_label))
    }

    fn minutes(&self, range: &str) -> Result<String, TemplateError> {
        duration_minutes_with_today(range, self.today).map_err(|source| {
            TemplateError::Duration {
                range: range.to_string(),
                source,
            }
        })
    }

    /// Replaces every `TID[hhmm-hhmm]` with its length in minutes.
    fn substitute_durations(&self, line: &str) -> Result<String, TemplateError> {
        const OPEN: &str = "TID[";
        // hhmm-hhmm
        const RANGE_LEN: usize = 9;

        let mut out = String::with_capacity(line.len());
        let mut rest = line;

        while let Some(open) = rest.find(OPEN) {
            out.push_str(&rest[..open]);
            let after = &rest[open + OPEN.len()..];
            match after.get(..RANGE_LEN) {
                Some(range) if is_time_pair(range) && after[RANGE_LEN..].starts_with(']') => {
                    out.push_str(&self.minutes(range)?);
                    rest = &after[RANGE_LEN + 1..];
                }
                _ => {
                    out.push_str(OPEN);
                    rest = after;
                }
            }
        }
        out.push_str(rest);
        Ok(out)
    }
}

/// Renders with the default off-record label.
pub fn render(template: &str, data: &impl Lookup) -> Result<String, TemplateError> {
    TemplateEngine::default().render(template, data)
}

/// Replaces every `<N>` with field `N`, or nothing when the entry is shorter.
fn substitute_fields(format: &str, fields: &[Value]) -> String {
    let mut out = String::with_capacity(format.len());
    let mut rest = format;

    while let Some(open) = rest.find('<') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        let digits = after.bytes().take_while(u8::is_ascii_digit).count();
        if digits > 0 && after[digits..].starts_with('>') {
            if let Some(field) = after[..digits]
                .parse::<usize>()
                .ok()
                .and_then(|i| fields.get(i))
            {
                out.push_str(&value_to_text(field));
            }
            rest = &after[digits + 1..];
        } else {
            out.push('<');
            rest = after;
        }
    }
    out.push_str(rest);
    out
}

fn is_time_pair(range: &str) -> bool {
    let bytes = range.as_bytes();
    bytes.len() == 9
        && bytes[4] == b'-'
        && bytes[..4].iter().chain(&bytes[5..]).all(u8::is_ascii_digit)
}
