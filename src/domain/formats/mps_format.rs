use crate::domain::format::ModelFormat;
use crate::error::Result;
use crate::model::Model;
use crate::mps;

/// Free-format MPS text
pub struct MpsFormat;

impl MpsFormat {
    pub fn new() -> Self {
        MpsFormat
    }
}

impl Default for MpsFormat {
    fn default() -> Self {
        Self::new()
    }
}

impl ModelFormat for MpsFormat {
    fn read(&self, input: &str) -> Result<Model> {
        Ok(mps::parse(input)?)
    }

    fn write(&self, model: &Model) -> Result<String> {
        Ok(mps::write(model)?)
    }

    fn name(&self) -> &str {
        "MPS"
    }

    fn content_type(&self) -> &str {
        "text/plain; charset=utf-8"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[test]
    fn test_read_reports_parse_errors() {
        let err = MpsFormat::new().read("ROWS\n N obj\n X c\n").unwrap_err();
        assert!(matches!(err, Error::Parse(_)));
        assert_eq!(err.line(), Some(3));
    }

    #[test]
    fn test_write_then_read() {
        let format = MpsFormat::new();
        let model = format.read("NAME small\nROWS\n N obj\n L c\nCOLUMNS\n x obj 1 c 2\nRHS\n RHS c 4\nENDATA\n").unwrap();
        let text = format.write(&model).unwrap();
        assert_eq!(format.read(&text).unwrap(), model);
    }
}
