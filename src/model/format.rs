// File: ./src/model/format.rs
use serde::Deserialize;
use serde_json::{Map, Value};

/// How one dated field of an admission type becomes an event.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct FormatEntry {
    pub title: String,
    #[serde(default)]
    pub desc: String,
    /// Keys looked up in the PDF page table, in output order.
    #[serde(default)]
    pub link: Vec<String>,
}

/// The whole format file, keeping the order fields were written in.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(try_from = "Map<String, Value>")]
pub struct FormatSpec {
    entries: Vec<(String, FormatEntry)>,
}

impl FormatSpec {
    pub fn iter(&self) -> impl Iterator<Item = (&str, &FormatEntry)> {
        self.entries
            .iter()
            .map(|(key, entry)| (key.as_str(), entry))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl TryFrom<Map<String, Value>> for FormatSpec {
    type Error = String;

    fn try_from(map: Map<String, Value>) -> Result<Self, Self::Error> {
        let entries = map
            .into_iter()
            .map(|(key, value)| {
                serde_json::from_value::<FormatEntry>(value)
                    .map(|entry| (key.clone(), entry))
                    .map_err(|e| format!("format entry '{}': {}", key, e))
            })
            .collect::<Result<_, _>>()?;
        Ok(Self { entries })
    }
}
