// File: ./src/storage.rs
// Reads the JSON inputs and writes the generated calendars.
use crate::model::{FormatSpec, Institution, InstitutionCalendar};
use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use std::fs;
use std::path::{Path, PathBuf};

pub struct Storage;

impl Storage {
    /// Load the institution list from a JSON array file.
    pub fn load_institutions(path: &Path) -> Result<Vec<Institution>> {
        let institutions: Vec<Institution> = Self::load_json(path)?;
        log::debug!(
            "Loaded {} institution(s) from {}",
            institutions.len(),
            path.display()
        );
        Ok(institutions)
    }

    /// Load the format file (field key -> title/desc/link).
    pub fn load_format_spec(path: &Path) -> Result<FormatSpec> {
        let spec: FormatSpec = Self::load_json(path)?;
        log::debug!("Loaded {} format entries from {}", spec.len(), path.display());
        Ok(spec)
    }

    /// Serialize `calendar` into `dir`, returning the written path.
    pub fn write_calendar(dir: &Path, calendar: &InstitutionCalendar) -> Result<PathBuf> {
        if !dir.exists() {
            fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create directory: {:?}", dir))?;
        }
        let path = dir.join(calendar.file_name());
        Self::atomic_write(&path, calendar.to_ics_string())
            .with_context(|| format!("Failed to write calendar '{}'", path.display()))?;
        Ok(path)
    }

    pub fn atomic_write<P: AsRef<Path>, C: AsRef<[u8]>>(path: P, contents: C) -> Result<()> {
        let path = path.as_ref();
        let tmp_path = path.with_extension("tmp");
        fs::write(&tmp_path, contents)?;
        fs::rename(tmp_path, path)?;
        Ok(())
    }

    fn load_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
        let json = fs::read_to_string(path)
            .with_context(|| format!("Failed to read '{}'", path.display()))?;
        serde_json::from_str(&json)
            .with_context(|| format!("Failed to parse '{}'", path.display()))
    }
}
