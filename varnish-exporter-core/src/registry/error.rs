use crate::registry::CollectorKind;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RegistrationError {
    #[error("failed to build collector '{name}': {source}")]
    Build {
        name: String,
        #[source]
        source: prometheus::Error,
    },

    #[error("collector '{name}' was rejected by the registry: {source}")]
    Rejected {
        name: String,
        #[source]
        source: prometheus::Error,
    },

    #[error("collector '{name}' already exists as a {existing:?}, not a {requested:?}")]
    KindMismatch {
        name: String,
        existing: CollectorKind,
        requested: CollectorKind,
    },

    #[error("labels [{labels}] do not fit the collector schema: {source}")]
    Labels {
        labels: String,
        #[source]
        source: prometheus::Error,
    },

    #[error("failed to encode metrics: {source}")]
    Encode {
        #[source]
        source: prometheus::Error,
    },
}
