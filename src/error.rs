use thiserror::Error;

/// Result type for conversions that may fail at any stage
pub type Result<T> = std::result::Result<T, Error>;

/// What kind of name a referential error points at
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Referent {
    Row,
    Variable,
}

impl std::fmt::Display for Referent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Referent::Row => write!(f, "row"),
            Referent::Variable => write!(f, "variable"),
        }
    }
}

/// Fatal errors raised while reading MPS text.
///
/// Every variant carries the 1-based line number it originated from. No
/// partially built model is ever returned alongside one of these.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseError {
    /// Bad keyword, section ordering or line grammar
    #[error("line {line}: {message}")]
    Format { line: usize, message: String },

    /// A numeric field could not be parsed
    #[error("line {line}: invalid numeric value `{token}`")]
    NumericFormat { line: usize, token: String },

    /// A record names a row or variable that was never declared
    #[error("line {line}: unknown {referent} `{name}`")]
    Referential {
        line: usize,
        referent: Referent,
        name: String,
    },

    /// INTORG/INTEND markers do not pair up
    #[error("line {line}: {message}")]
    UnbalancedMarker { line: usize, message: String },

    /// The input uses a construct the model cannot represent
    #[error("line {line}: unsupported feature: {feature}")]
    UnsupportedFeature { line: usize, feature: String },
}

impl ParseError {
    pub(crate) fn format(line: usize, message: impl Into<String>) -> Self {
        ParseError::Format {
            line,
            message: message.into(),
        }
    }

    /// Line of the input the error originated from.
    pub fn line(&self) -> usize {
        match self {
            ParseError::Format { line, .. }
            | ParseError::NumericFormat { line, .. }
            | ParseError::Referential { line, .. }
            | ParseError::UnbalancedMarker { line, .. }
            | ParseError::UnsupportedFeature { line, .. } => *line,
        }
    }

    /// Returns a semantic error code for programmatic handling.
    pub fn code(&self) -> &'static str {
        match self {
            ParseError::Format { .. } => "MPS_FORMAT",
            ParseError::NumericFormat { .. } => "MPS_NUMERIC_FORMAT",
            ParseError::Referential { .. } => "MPS_REFERENTIAL",
            ParseError::UnbalancedMarker { .. } => "MPS_UNBALANCED_MARKER",
            ParseError::UnsupportedFeature { .. } => "MPS_UNSUPPORTED_FEATURE",
        }
    }
}

/// Errors raised before any MPS text is emitted for a model.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum WriteError {
    /// A name is empty or contains characters MPS cannot carry
    #[error("invalid {entity} name `{name}`: {reason}")]
    InvalidName {
        entity: &'static str,
        name: String,
        reason: &'static str,
    },

    /// Two variables or two constraints share a name
    #[error("duplicate {entity} name `{name}`")]
    DuplicateName { entity: &'static str, name: String },

    /// Bounds that no combination of MPS records reproduces
    #[error("{entity} `{name}` has unrepresentable bounds [{lower}, {upper}]")]
    UnrepresentableBound {
        entity: &'static str,
        name: String,
        lower: f64,
        upper: f64,
    },

    /// A coefficient or the objective offset is not finite
    #[error("non-finite value {value} in {context}")]
    NonFiniteValue { context: String, value: f64 },

    /// A coefficient refers to a variable missing from the model
    #[error("{context} references unknown variable `{name}`")]
    UnknownVariable { context: String, name: String },

    /// No RANGES value reproduces the constraint interval exactly
    #[error("constraint `{name}` range [{lower}, {upper}] cannot be encoded exactly")]
    UnrepresentableRange {
        name: String,
        lower: f64,
        upper: f64,
    },
}

impl WriteError {
    /// Returns a semantic error code for programmatic handling.
    pub fn code(&self) -> &'static str {
        match self {
            WriteError::InvalidName { .. } => "WRITE_INVALID_NAME",
            WriteError::DuplicateName { .. } => "WRITE_DUPLICATE_NAME",
            WriteError::UnrepresentableBound { .. } => "WRITE_UNREPRESENTABLE_BOUND",
            WriteError::NonFiniteValue { .. } => "WRITE_NON_FINITE_VALUE",
            WriteError::UnknownVariable { .. } => "WRITE_UNKNOWN_VARIABLE",
            WriteError::UnrepresentableRange { .. } => "WRITE_UNREPRESENTABLE_RANGE",
        }
    }
}

/// Errors from the model mutation API
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ModelError {
    #[error("variable `{0}` already exists")]
    DuplicateVariable(String),

    #[error("constraint `{0}` already exists")]
    DuplicateConstraint(String),

    #[error("unknown variable `{0}`")]
    UnknownVariable(String),
}

impl ModelError {
    pub fn code(&self) -> &'static str {
        match self {
            ModelError::DuplicateVariable(_) => "MODEL_DUPLICATE_VARIABLE",
            ModelError::DuplicateConstraint(_) => "MODEL_DUPLICATE_CONSTRAINT",
            ModelError::UnknownVariable(_) => "MODEL_UNKNOWN_VARIABLE",
        }
    }
}

/// Top-level error for format conversions
#[derive(Error, Debug)]
pub enum Error {
    #[error("MPS parse failed: {0}")]
    Parse(#[from] ParseError),

    #[error("MPS write failed: {0}")]
    Write(#[from] WriteError),

    #[error("invalid model: {0}")]
    Model(#[from] ModelError),

    #[error("invalid model JSON: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    pub fn code(&self) -> &'static str {
        match self {
            Error::Parse(e) => e.code(),
            Error::Write(e) => e.code(),
            Error::Model(e) => e.code(),
            Error::Json(_) => "JSON_INVALID",
        }
    }

    /// Input line number, when the error came from parsing MPS text.
    pub fn line(&self) -> Option<usize> {
        match self {
            Error::Parse(e) => Some(e.line()),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_error_reports_line_and_code() {
        let err = ParseError::Referential {
            line: 12,
            referent: Referent::Variable,
            name: "x".to_string(),
        };
        assert_eq!(err.line(), 12);
        assert_eq!(err.code(), "MPS_REFERENTIAL");
        assert_eq!(err.to_string(), "line 12: unknown variable `x`");
    }

    #[test]
    fn test_error_wraps_parse_error() {
        let err: Error = ParseError::format(3, "bad").into();
        assert_eq!(err.code(), "MPS_FORMAT");
        assert_eq!(err.line(), Some(3));
    }
}
