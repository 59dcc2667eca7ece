//! Access log line decoding.
//!
//! varnishncsa is started with a `-F` format generated from a [`FieldSpec`], so the
//! same schema describes both what the producer writes and what the decoder reads.
//! Each field is found by its literal prefix token (`method=`, `time:`, ...) rather
//! than by position, which keeps the decoder tolerant of extra tokens.

mod decoder;
mod error;
mod fields;
mod spec;

pub use decoder::{LineDecoder, decode};
pub use error::DecodeError;
pub use fields::DecodedFields;
pub use spec::{FieldDef, FieldName, FieldOptions, FieldSpec, Quoting, ValueKind};
