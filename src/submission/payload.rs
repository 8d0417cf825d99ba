//! Flat field-name to value mapping sent to the endpoint.

use serde::Serialize;
use std::collections::BTreeMap;

/// Prefix of image field names; the suffix is the zero-based image index
pub const IMAGE_FIELD_PREFIX: &str = "imagen_";

pub fn image_field_name(index: usize) -> String {
    format!("{}{}", IMAGE_FIELD_PREFIX, index)
}

/// Payload of one submission attempt
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct SubmissionPayload {
    fields: BTreeMap<String, String>,
}

impl SubmissionPayload {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a field; a later insert with the same name wins
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.fields.insert(name.into(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Image field names sorted by their numeric index
    pub fn image_keys(&self) -> Vec<&str> {
        let mut keys: Vec<(usize, &str)> = self
            .fields
            .keys()
            .filter_map(|key| {
                key.strip_prefix(IMAGE_FIELD_PREFIX)
                    .and_then(|index| index.parse().ok())
                    .map(|index| (index, key.as_str()))
            })
            .collect();
        keys.sort_unstable();
        keys.into_iter().map(|(_, key)| key).collect()
    }

    pub fn image_count(&self) -> usize {
        self.image_keys().len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Flat JSON object text
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}
