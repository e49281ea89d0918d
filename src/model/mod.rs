// File: ./src/model/mod.rs
pub mod calendar;
pub mod event;
pub mod format;
pub mod record;
pub mod template;
pub mod timerange;

pub use calendar::InstitutionCalendar;
pub use event::{Event, EventDraft};
pub use format::{FormatEntry, FormatSpec};
pub use record::{Institution, RecordError, RecordKeys, ResolvedData};
pub use template::{Lookup, Placeholder, TemplateEngine, TemplateError, render};
pub use timerange::{TimeRange, TimeRangeError, duration_minutes, duration_minutes_with_today};
