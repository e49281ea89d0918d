// File: ./src/model/record.rs
use crate::model::template::Lookup;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

fn default_name_key() -> String {
    "name".to_string()
}
fn default_url_key() -> String {
    "url".to_string()
}
fn default_admission_types_key() -> String {
    "admission-types".to_string()
}
fn default_admission_type_key() -> String {
    "admission-type".to_string()
}
fn default_memo_key() -> String {
    "memo".to_string()
}
fn default_pdf_key() -> String {
    "pdf".to_string()
}
fn default_pdf_link_key() -> String {
    "link".to_string()
}
fn default_pdf_page_key() -> String {
    "page".to_string()
}

/// Names of the keys an institution record is read through.
#[derive(Deserialize, Serialize, Clone, Debug, PartialEq, Eq)]
pub struct RecordKeys {
    #[serde(default = "default_name_key")]
    pub name: String,
    #[serde(default = "default_url_key")]
    pub url: String,
    #[serde(default = "default_admission_types_key")]
    pub admission_types: String,
    /// Injected into the resolved data with the current admission type.
    #[serde(default = "default_admission_type_key")]
    pub admission_type: String,
    #[serde(default = "default_memo_key")]
    pub memo: String,
    #[serde(default = "default_pdf_key")]
    pub pdf: String,
    #[serde(default = "default_pdf_link_key")]
    pub pdf_link: String,
    #[serde(default = "default_pdf_page_key")]
    pub pdf_page: String,
}

impl Default for RecordKeys {
    fn default() -> Self {
        Self {
            name: default_name_key(),
            url: default_url_key(),
            admission_types: default_admission_types_key(),
            admission_type: default_admission_type_key(),
            memo: default_memo_key(),
            pdf: default_pdf_key(),
            pdf_link: default_pdf_link_key(),
            pdf_page: default_pdf_page_key(),
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RecordError {
    #[error("missing required field '{0}'")]
    MissingField(String),
    #[error("field '{key}' must be {expected}")]
    WrongType { key: String, expected: &'static str },
}

/// One institution as read from the data file.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(transparent)]
pub struct Institution(Map<String, Value>);

impl Institution {
    pub fn new(fields: Map<String, Value>) -> Self {
        Self(fields)
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn name(&self, keys: &RecordKeys) -> Result<&str, RecordError> {
        self.required_str(&keys.name)
    }

    pub fn url(&self, keys: &RecordKeys) -> Result<&str, RecordError> {
        self.required_str(&keys.url)
    }

    /// Admission types in file order. A record without any yields nothing.
    pub fn admission_types(
        &self,
        keys: &RecordKeys,
    ) -> Result<Vec<(&str, &Map<String, Value>)>, RecordError> {
        let Some(types) = self.0.get(&keys.admission_types) else {
            return Ok(Vec::new());
        };
        let types = types.as_object().ok_or_else(|| RecordError::WrongType {
            key: keys.admission_types.clone(),
            expected: "a mapping",
        })?;

        types
            .iter()
            .map(|(name, details)| {
                details
                    .as_object()
                    .map(|details| (name.as_str(), details))
                    .ok_or_else(|| RecordError::WrongType {
                        key: format!("{}.{}", keys.admission_types, name),
                        expected: "a mapping",
                    })
            })
            .collect()
    }

    fn required_str(&self, key: &str) -> Result<&str, RecordError> {
        match self.0.get(key) {
            None => Err(RecordError::MissingField(key.to_string())),
            Some(Value::String(s)) => Ok(s),
            Some(_) => Err(RecordError::WrongType {
                key: key.to_string(),
                expected: "text",
            }),
        }
    }
}

impl Lookup for Institution {
    fn lookup(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }
}

/// Institution fields seen through one admission type's details.
///
/// Lookups try the injected admission-type name first, then the details,
/// then the institution's own fields. Neither layer is modified.
#[derive(Debug)]
pub struct ResolvedData<'a> {
    institution: &'a Map<String, Value>,
    details: &'a Map<String, Value>,
    type_key: &'a str,
    admission_type: Value,
}

impl<'a> ResolvedData<'a> {
    pub fn new(
        institution: &'a Institution,
        details: &'a Map<String, Value>,
        keys: &'a RecordKeys,
        admission_type: &str,
    ) -> Self {
        Self {
            institution: institution.fields(),
            details,
            type_key: &keys.admission_type,
            admission_type: Value::String(admission_type.to_string()),
        }
    }

    pub fn details(&self) -> &'a Map<String, Value> {
        self.details
    }

    pub fn admission_type(&self) -> &str {
        self.admission_type.as_str().unwrap_or_default()
    }
}

impl Lookup for ResolvedData<'_> {
    fn lookup(&self, key: &str) -> Option<&Value> {
        if key == self.type_key {
            return Some(&self.admission_type);
        }
        self.details
            .get(key)
            .or_else(|| self.institution.get(key))
    }
}
