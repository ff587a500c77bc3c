use crate::domain::format::ModelFormat;
use crate::domain::formats::{JsonFormat, MpsFormat};

/// Available model encodings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatType {
    Mps,
    Json,
}

impl FormatType {
    /// Parse format type from string (case-insensitive)
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "mps" => Some(FormatType::Mps),
            "json" | "model" => Some(FormatType::Json),
            _ => None,
        }
    }
}

/// Create a format instance based on the specified type
pub fn create_format(format_type: FormatType) -> Box<dyn ModelFormat> {
    match format_type {
        FormatType::Mps => Box::new(MpsFormat::new()),
        FormatType::Json => Box::new(JsonFormat::new()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_type_from_str() {
        assert_eq!(FormatType::from_str("mps"), Some(FormatType::Mps));
        assert_eq!(FormatType::from_str("MPS"), Some(FormatType::Mps));
        assert_eq!(FormatType::from_str("json"), Some(FormatType::Json));
        assert_eq!(FormatType::from_str("Model"), Some(FormatType::Json));
        assert_eq!(FormatType::from_str("lp"), None);
    }

    #[test]
    fn test_create_mps_format() {
        let format = create_format(FormatType::Mps);
        assert_eq!(format.name(), "MPS");
    }

    #[test]
    fn test_create_json_format() {
        let format = create_format(FormatType::Json);
        assert_eq!(format.name(), "JSON");
        assert_eq!(format.content_type(), "application/json");
    }
}
