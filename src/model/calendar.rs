// File: ./src/model/calendar.rs
use crate::model::event::Event;
use icalendar::Calendar;

/// All events generated for one institution plus the calendar metadata.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InstitutionCalendar {
    /// Institution display name, also used for the file name.
    pub institution: String,
    /// X-WR-CALNAME
    pub name: String,
    /// X-WR-CALDESC
    pub description: String,
    /// X-WR-RELCALID
    pub source_url: String,
    pub product_id: String,
    pub events: Vec<Event>,
}

impl InstitutionCalendar {
    /// `<institution>.ics`, with path separators replaced.
    pub fn file_name(&self) -> String {
        let stem: String = self
            .institution
            .chars()
            .map(|c| if matches!(c, '/' | '\\') { '_' } else { c })
            .collect();
        format!("{}.ics", stem)
    }

    /// The full VCALENDAR document, one VEVENT per event.
    pub fn to_ics_string(&self) -> String {
        let mut calendar = Calendar::empty();
        calendar
            .append_property(("VERSION", "2.0"))
            .append_property(("PRODID", self.product_id.as_str()))
            .name(&self.name)
            .description(&self.description)
            .append_property(("X-WR-RELCALID", self.source_url.as_str()));
        for event in &self.events {
            calendar.push(event.to_vevent());
        }
        calendar.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn calendar() -> InstitutionCalendar {
        InstitutionCalendar {
            institution: "North".to_string(),
            name: "North calendar".to_string(),
            description: "North".to_string(),
            source_url: "https://north.example".to_string(),
            product_id: "-//AutoGenerator//NONSGML v1.0//EN".to_string(),
            events: vec![],
        }
    }

    #[test]
    fn test_text_values_are_escaped() {
        let calendar = InstitutionCalendar {
            description: "Entrance, exams; 2026".to_string(),
            ..calendar()
        };
        let ics = calendar.to_ics_string();
        assert!(ics.contains("DESCRIPTION:Entrance\\, exams\\; 2026\r\n"));
    }

    #[test]
    fn test_long_lines_are_folded() {
        let calendar = InstitutionCalendar {
            name: "あ".repeat(40),
            ..calendar()
        };
        let ics = calendar.to_ics_string();
        for line in ics.split("\r\n") {
            assert!(line.len() <= 75, "line too long: {}", line);
        }
        let unfolded = ics.replace("\r\n ", "");
        assert!(unfolded.contains(&format!("X-WR-CALNAME:{}\r\n", "あ".repeat(40))));
    }

    #[test]
    fn test_file_name_replaces_separators() {
        let calendar = InstitutionCalendar {
            institution: "North/South University".to_string(),
            ..Default::default()
        };
        assert_eq!(calendar.file_name(), "North_South University.ics");
    }

    #[test]
    fn test_empty_calendar_has_header_only() {
        let ics = calendar().to_ics_string();
        assert!(ics.starts_with("BEGIN:VCALENDAR\r\nVERSION:2.0\r\n"));
        assert!(ics.contains("PRODID:-//AutoGenerator//NONSGML v1.0//EN\r\n"));
        assert!(ics.contains("X-WR-CALNAME:North calendar\r\n"));
        assert!(ics.contains("X-WR-RELCALID:https://north.example\r\n"));
        assert!(!ics.contains("BEGIN:VEVENT"));
        assert!(ics.ends_with("END:VCALENDAR\r\n"));
    }
}
