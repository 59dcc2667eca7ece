use crate::decode::FieldName;
use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ObservationError {
    #[error("decoded fields are missing '{field}'")]
    MissingField { field: FieldName },

    #[error("field '{field}' value '{value}' is not a non-negative number")]
    InvalidNumber { field: FieldName, value: String },
}
