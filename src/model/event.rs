// File: ./src/model/event.rs
use crate::model::timerange::{SENTINEL, TimeRange};
use chrono::{NaiveDate, NaiveDateTime, Utc};
use icalendar::Component;
use serde_json::Value;
use uuid::Uuid;

const ICS_LOCAL_FORMAT: &str = "%Y%m%dT%H%M%S";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    pub summary: String,
    pub description: String,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl Event {
    /// Floating (timezone-less) VEVENT for this event.
    pub fn to_vevent(&self) -> icalendar::Event {
        let mut event = icalendar::Event::new();
        event.uid(&Uuid::new_v4().to_string());
        event.summary(&self.summary);
        event.description(&self.description);
        event.timestamp(Utc::now());
        event.add_property("DTSTART", self.start.format(ICS_LOCAL_FORMAT).to_string());
        event.add_property("DTEND", self.end.format(ICS_LOCAL_FORMAT).to_string());
        event.done()
    }
}

/// Resolved text for one format entry, waiting for its date values.
#[derive(Debug, Clone, Copy)]
pub struct EventDraft<'a> {
    /// Only used in diagnostics.
    pub institution: &'a str,
    pub title: &'a str,
    pub description: &'a str,
    pub url_text: &'a str,
    pub memo: &'a str,
}

impl EventDraft<'_> {
    /// Builds one event from a `#...` value.
    ///
    /// Returns `None` for values that are not time ranges, and for time
    /// ranges that cannot be parsed (after logging them).
    pub fn build(&self, value: &Value, today: NaiveDate) -> Option<Event> {
        self.build_titled(value, self.title, today)
    }

    /// Builds the events for a field value that is one time range or a list
    /// of them. List entries get a ` (n)` title suffix when there are two or
    /// more.
    pub fn build_all(&self, value: &Value, today: NaiveDate) -> Vec<Event> {
        match value {
            Value::Array(items) if items.len() > 1 => items
                .iter()
                .enumerate()
                .filter_map(|(idx, item)| {
                    let title = format!("{} ({})", self.title, idx + 1);
                    self.build_titled(item, &title, today)
                })
                .collect(),
            Value::Array(items) => items
                .iter()
                .filter_map(|item| self.build(item, today))
                .collect(),
            single => self.build(single, today).into_iter().collect(),
        }
    }

    fn build_titled(&self, value: &Value, title: &str, today: NaiveDate) -> Option<Event> {
        let token = value.as_str().filter(|s| s.starts_with(SENTINEL))?;

        let range = match TimeRange::parse_with_today(token, today) {
            Ok(range) => range,
            Err(e) => {
                log::warn!(
                    "Error: Time can't be parsed ({} / {}): {}",
                    self.institution,
                    title,
                    e
                );
                return None;
            }
        };

        let mut description = self.description.to_string();
        for extra in [self.url_text, self.memo] {
            if !extra.is_empty() {
                description.push('\n');
                description.push_str(extra);
            }
        }

        Some(Event {
            summary: title.to_string(),
            description,
            start: range.start,
            end: range.end,
        })
    }
}
