//! Non-image form fields: collection, required-field validation and reset.

use crate::error::UploadError;
use serde::{Deserialize, Serialize};

/// Field carrying the form type in every payload
pub const FORM_TYPE_FIELD: &str = "tipoFormulario";

/// A named input of the form
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormField {
    pub name: String,
    pub value: String,
    #[serde(default)]
    pub required: bool,
}

impl FormField {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            required: false,
        }
    }

    pub fn required(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            required: true,
            ..Self::new(name, value)
        }
    }
}

/// The form being submitted, minus its images
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormData {
    pub form_type: String,
    pub fields: Vec<FormField>,
}

impl FormData {
    pub fn new(form_type: impl Into<String>) -> Self {
        Self {
            form_type: form_type.into(),
            fields: Vec::new(),
        }
    }

    pub fn with_field(mut self, field: FormField) -> Self {
        self.fields.push(field);
        self
    }

    /// Set a field's value, adding the field if it does not exist
    pub fn set(&mut self, name: &str, value: impl Into<String>) {
        match self.fields.iter_mut().find(|f| f.name == name) {
            Some(field) => field.value = value.into(),
            None => self.fields.push(FormField::new(name, value)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|f| f.name == name)
            .map(|f| f.value.as_str())
    }

    /// Required fields whose value is blank after trimming
    pub fn missing_required(&self) -> Vec<String> {
        self.fields
            .iter()
            .filter(|f| f.required && f.value.trim().is_empty())
            .map(|f| f.name.clone())
            .collect()
    }

    /// Run every check; report missing fields before a missing image.
    pub fn validate(&self, image_count: usize) -> Result<(), UploadError> {
        let missing = self.missing_required();
        if !missing.is_empty() {
            return Err(UploadError::MissingRequiredFields(missing));
        }
        if image_count == 0 {
            return Err(UploadError::NoImages);
        }
        Ok(())
    }

    /// Name/value pairs sent with the images, form type last
    pub fn to_fields(&self) -> Vec<(String, String)> {
        let mut pairs: Vec<_> = self
            .fields
            .iter()
            .map(|f| (f.name.clone(), f.value.clone()))
            .collect();
        pairs.push((FORM_TYPE_FIELD.to_string(), self.form_type.clone()));
        pairs
    }

    /// Clear all field values; names and the form type stay
    pub fn reset(&mut self) {
        for field in &mut self.fields {
            field.value.clear();
        }
    }
}
