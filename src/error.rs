use std::path::PathBuf;

use thiserror::Error;

/// Failures surfaced while assembling the feature table. All of them are
/// fatal to the run; the corpus is trusted and there is no skip policy.
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("failed to read {}: {source}", path.display())]
    Load {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("malformed transcript {} at line {line}: {reason}", path.display())]
    Parse {
        path: PathBuf,
        line: usize,
        reason: String,
    },
    #[error("duplicate transcript id `{id}` across the corpus")]
    IndexCollision { id: String },
    #[error("transcript `{id}` carries a non-integer screening score `{value}`")]
    ScoreParse { id: String, value: String },
}
