use serde::{Deserialize, Serialize};

use crate::error::Error;

// ---------- API (wire) types: owned & serde-friendly ----------

/// Query string of `POST /convert`
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ConvertQuery {
    pub from: String,
    pub to: String,
}

/// Body of every non-2xx response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line: Option<usize>,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            code: code.into(),
            line: None,
        }
    }
}

impl From<&Error> for ErrorResponse {
    fn from(err: &Error) -> Self {
        Self {
            error: err.to_string(),
            code: err.code().to_string(),
            line: err.line(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ParseError;

    #[test]
    fn test_line_is_only_serialized_when_known() {
        let body = serde_json::to_value(ErrorResponse::new("bad", "X")).unwrap();
        assert_eq!(body, serde_json::json!({"error": "bad", "code": "X"}));

        let err: Error = ParseError::NumericFormat {
            line: 4,
            token: "1..2".to_string(),
        }
        .into();
        let body = serde_json::to_value(ErrorResponse::from(&err)).unwrap();
        assert_eq!(body["line"], 4);
        assert_eq!(body["code"], "MPS_NUMERIC_FORMAT");
    }
}
