pub mod classify;
pub mod dedupe;
pub mod error;
pub mod normalize;
pub mod pipeline;
pub mod score;
pub mod stats;
pub mod validate;

pub use classify::{Classification, Classifier, RejectReason};
pub use dedupe::{DedupOutcome, Deduper};
pub use error::PipelineError;
pub use pipeline::{Pipeline, RawBatch};
pub use score::score;
pub use stats::{CleanStats, StateStats};
pub use validate::{
    HttpProbe, ProbeError, ProbeResponse, UrlProbe, ValidationProgress, WebsiteValidator,
};
