use std::path::PathBuf;

/// Runtime configuration for the cleaning pipeline and CLI.
///
/// Values come from `DMAP_*` environment variables with defaults; see
/// [`crate::config::load_app_config`].
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Log filter passed to the tracing subscriber.
    pub log_level: String,
    /// Directory of per-state raw batch files.
    pub raw_dir: PathBuf,
    /// Directory for cleaned output, stats, and CSV files.
    pub out_dir: PathBuf,
    /// Optional keyword policy YAML; built-in defaults when unset.
    pub policy_path: Option<PathBuf>,
    /// Per-request wall-clock budget for one website probe.
    pub probe_timeout_secs: u64,
    /// Maximum simultaneous in-flight website probes.
    pub probe_concurrency: usize,
    /// `User-Agent` sent by the website validator.
    pub probe_user_agent: String,
}
