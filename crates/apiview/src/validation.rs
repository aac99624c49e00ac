use crate::view::View;
use anyhow::{anyhow, Result};
use jsonschema::{Draft, JSONSchema};
use serde_json::Value;

const VIEW_SCHEMA: &str = include_str!("../../../contracts/apiview/view.json");

/// Checks documents against the bundled apiview envelope schema.
pub struct ViewValidator {
    schema: JSONSchema,
}

impl ViewValidator {
    pub fn new() -> Result<Self> {
        let schema_value: Value = serde_json::from_str(VIEW_SCHEMA)
            .map_err(|e| anyhow!("Failed to parse view schema: {}", e))?;

        let schema = JSONSchema::options()
            .with_draft(Draft::Draft7)
            .compile(&schema_value)
            .map_err(|e| anyhow!("Failed to compile view schema: {}", e))?;

        Ok(Self { schema })
    }

    pub fn validate(&self, view: &View) -> Result<()> {
        let view_value = view
            .to_value()
            .map_err(|e| anyhow!("Failed to serialize view for validation: {}", e))?;

        self.validate_json(&view_value)
    }

    /// Validates a rendered document. Failures are reported per top-level
    /// section, with resources named individually.
    pub fn validate_json(&self, document: &Value) -> Result<()> {
        let Err(errors) = self.schema.validate(document) else {
            return Ok(());
        };

        let mut sections: Vec<(String, Vec<String>)> = Vec::new();
        for error in errors {
            let path = error.instance_path.to_string();
            let section = section_of(&path);
            let message = format!("{} at {}", error, path);
            match sections.iter_mut().find(|(name, _)| *name == section) {
                Some((_, messages)) => messages.push(message),
                None => sections.push((section, vec![message])),
            }
        }

        let report: Vec<String> = sections
            .into_iter()
            .map(|(section, messages)| format!("{}: {}", section, messages.join(", ")))
            .collect();

        Err(anyhow!("View validation failed: {}", report.join("; ")))
    }
}

// "/resources/users/data/0" -> "resource users", "/notices/1" -> "notices".
fn section_of(path: &str) -> String {
    let mut segments = path.trim_start_matches('/').split('/');
    match (segments.next(), segments.next()) {
        (Some("resources"), Some(name)) => format!("resource {}", name),
        (Some(""), _) | (None, _) => "view".to_string(),
        (Some(top), _) => top.to_string(),
    }
}

impl View {
    pub fn validate(&self) -> Result<()> {
        let validator = ViewValidator::new()?;
        validator.validate(self)
    }

    pub fn validate_with(&self, validator: &ViewValidator) -> Result<()> {
        validator.validate(self)
    }
}
