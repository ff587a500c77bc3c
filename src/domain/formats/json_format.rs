use crate::domain::format::ModelFormat;
use crate::error::{Error, Result};
use crate::model::Model;

/// The model's JSON wire schema
pub struct JsonFormat;

impl JsonFormat {
    pub fn new() -> Self {
        JsonFormat
    }
}

impl Default for JsonFormat {
    fn default() -> Self {
        Self::new()
    }
}

impl ModelFormat for JsonFormat {
    fn read(&self, input: &str) -> Result<Model> {
        serde_json::from_str(input).map_err(Error::from)
    }

    fn write(&self, model: &Model) -> Result<String> {
        serde_json::to_string_pretty(model).map_err(Error::from)
    }

    fn name(&self) -> &str {
        "JSON"
    }

    fn content_type(&self) -> &str {
        "application/json"
    }
}
