use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProducerError {
    #[error("failed to start '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("'{program}' was started without a stdout pipe")]
    MissingStdout { program: String },

    #[error("failed to wait for '{program}': {source}")]
    Wait {
        program: String,
        #[source]
        source: std::io::Error,
    },
}
