use thiserror::Error;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}
