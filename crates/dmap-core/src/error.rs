use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("failed to read policy file {path}: {source}")]
    PolicyFileIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse policy file: {0}")]
    PolicyFileParse(#[from] serde_yaml::Error),

    #[error("invalid configuration: {0}")]
    Validation(String),
}
