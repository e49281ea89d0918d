// File: ./src/generator.rs
//! Turns institution records into calendars.
//!
//! For every admission type of an institution, each format entry whose key
//! appears in that type's details yields one event per time range stored
//! under the key. Titles and descriptions are rendered against the
//! institution's fields overlaid with the admission type's details.

use crate::config::Config;
use crate::model::template::value_to_text;
use crate::model::{
    EventDraft, FormatSpec, Institution, InstitutionCalendar, Lookup, RecordKeys, ResolvedData,
    TemplateEngine,
};
use crate::storage::Storage;
use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use std::path::PathBuf;

/// Outcome of a full run over the institution list.
#[derive(Debug, Default)]
pub struct RunReport {
    pub written: Vec<PathBuf>,
    /// Institution label and the error that stopped it.
    pub failed: Vec<(String, anyhow::Error)>,
}

impl RunReport {
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }
}

pub struct Generator<'a> {
    formats: &'a FormatSpec,
    config: &'a Config,
    engine: TemplateEngine,
    today: NaiveDate,
}

impl<'a> Generator<'a> {
    pub fn new(formats: &'a FormatSpec, config: &'a Config) -> Self {
        Self {
            formats,
            config,
            engine: TemplateEngine::new(config.off_record_label.clone()),
            today: Local::now().date_naive(),
        }
    }

    /// Overrides the reference date that omitted date parts default to.
    pub fn with_today(mut self, today: NaiveDate) -> Self {
        self.engine = self.engine.with_today(today);
        self.today = today;
        self
    }

    /// Builds the calendar for one institution without touching the disk.
    pub fn generate(&self, institution: &Institution) -> Result<InstitutionCalendar> {
        let keys = &self.config.keys;
        let name = institution.name(keys)?;

        let mut calendar = InstitutionCalendar {
            institution: name.to_string(),
            name: self
                .engine
                .render(&self.config.calendar_name, institution)
                .context("Failed to render calendar name")?,
            description: self
                .engine
                .render(&self.config.calendar_description, institution)
                .context("Failed to render calendar description")?,
            source_url: institution.url(keys)?.to_string(),
            product_id: self.config.product_id.clone(),
            events: Vec::new(),
        };

        for (admission_type, details) in institution.admission_types(keys)? {
            let data = ResolvedData::new(institution, details, keys, admission_type);

            for (field_key, entry) in self.formats.iter() {
                let Some(value) = data.details().get(field_key) else {
                    continue;
                };

                let context = || format!("Failed to render '{}' ({})", field_key, admission_type);
                let title = self.engine.render(&entry.title, &data).with_context(context)?;
                let description = self.engine.render(&entry.desc, &data).with_context(context)?;
                let url_text = link_lines(&data, keys, &entry.link);
                let memo = memo_for(&data, keys, field_key)
                    .map(|memo| format!("\n{}", memo))
                    .unwrap_or_default();

                let draft = EventDraft {
                    institution: name,
                    title: &title,
                    description: &description,
                    url_text: &url_text,
                    memo: &memo,
                };
                calendar.events.extend(draft.build_all(value, self.today));
            }
        }

        log::debug!(
            "Generated {} event(s) for {}",
            calendar.events.len(),
            calendar.institution
        );
        Ok(calendar)
    }

    /// Generates and writes one calendar per institution.
    ///
    /// An institution that fails is logged and recorded in the report; the
    /// remaining institutions are still processed.
    pub fn run(&self, institutions: &[Institution]) -> RunReport {
        let mut report = RunReport::default();

        for (idx, institution) in institutions.iter().enumerate() {
            let label = institution
                .name(&self.config.keys)
                .map(str::to_string)
                .unwrap_or_else(|_| format!("institution #{}", idx + 1));

            let result = self.generate(institution).and_then(|calendar| {
                let path = Storage::write_calendar(&self.config.output_dir, &calendar)?;
                log::info!(
                    "Wrote {} event(s) to {}",
                    calendar.events.len(),
                    path.display()
                );
                Ok(path)
            });

            match result {
                Ok(path) => report.written.push(path),
                Err(e) => {
                    log::error!("Skipping {}: {:#}", label, e);
                    report.failed.push((label, e));
                }
            }
        }

        report
    }
}

/// `key: <pdf link>#page=<n>` for every link key with a page under the
/// current admission type, one per line.
fn link_lines(data: &ResolvedData<'_>, keys: &RecordKeys, link_keys: &[String]) -> String {
    if link_keys.is_empty() {
        return String::new();
    }
    let Some(pdf) = data.lookup(&keys.pdf) else {
        log::debug!("No '{}' metadata for links", keys.pdf);
        return String::new();
    };
    let Some(pages) = pdf
        .get(&keys.pdf_page)
        .and_then(|pages| pages.get(data.admission_type()))
    else {
        return String::new();
    };
    let link = pdf.get(&keys.pdf_link).map(value_to_text).unwrap_or_default();

    link_keys
        .iter()
        .filter_map(|key| {
            pages
                .get(key)
                .map(|page| format!("{}: {}#page={}", key, link, value_to_text(page)))
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn memo_for(data: &ResolvedData<'_>, keys: &RecordKeys, field_key: &str) -> Option<String> {
    data.lookup(&keys.memo)?
        .get(data.admission_type())?
        .get(field_key)
        .map(value_to_text)
}
