use crate::decode::FieldName;
use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DecodeError {
    #[error("missing required field '{field}'")]
    MissingField { field: FieldName },

    #[error("field '{field}' must be quoted")]
    ExpectedQuote { field: FieldName },

    #[error("field '{field}' has an unterminated quoted value")]
    UnterminatedQuote { field: FieldName },

    #[error("field '{field}' has invalid {expected} value '{value}'")]
    InvalidValue {
        field: FieldName,
        expected: &'static str,
        value: String,
    },
}
