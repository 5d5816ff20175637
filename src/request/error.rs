use std::fmt;

/// Raw request data the picker could not read.
///
/// The detail is for logs only; clients receive a generic "invalid input".
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PickError {
    /// The body is not valid JSON
    InvalidBody { detail: String },
    /// The body is JSON, but not an object
    BodyNotObject,
    /// The body exceeds the configured limit
    BodyTooLarge { limit: usize },
    /// A field's conversion rejected its value
    Conversion { field: String, detail: String },
    /// The body nests deeper than the configured limit
    TooDeep { max: usize },
}

impl fmt::Display for PickError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidBody { detail } => write!(f, "request body is not valid JSON: {detail}"),
            Self::BodyNotObject => f.write_str("request body must be a JSON object"),
            Self::BodyTooLarge { limit } => {
                write!(f, "request body exceeds the limit of {limit} bytes")
            }
            Self::Conversion { field, detail } => {
                write!(f, "conversion of field {field:?} failed: {detail}")
            }
            Self::TooDeep { max } => {
                write!(f, "request body nests deeper than {max} levels")
            }
        }
    }
}

impl std::error::Error for PickError {}

/// The validated map could not be deserialized into the destination type.
///
/// This points at drift between a schema and its destination struct rather than at bad
/// client input, so it is logged with full detail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodeError {
    pub detail: String,
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "failed to decode request input: {}", self.detail)
    }
}

impl std::error::Error for DecodeError {}

impl From<serde_json::Error> for DecodeError {
    fn from(err: serde_json::Error) -> Self {
        Self {
            detail: err.to_string(),
        }
    }
}
