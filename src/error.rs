#[derive(Debug, thiserror::Error)]
pub enum CardatlasError {
    #[error("dataframe engine error: {0}")]
    Polars(#[from] polars::prelude::PolarsError),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Upstream schema changed in an incompatible way. Fatal at the checkpoint
    /// boundary that discovered it.
    #[error("schema mismatch at {stage}: {detail}")]
    SchemaMismatch { stage: String, detail: String },

    /// A lookup join found no match for a key. Non-fatal; callers null-propagate.
    #[error("lookup miss in {lookup}: key {key}")]
    LookupMiss { lookup: String, key: String },

    /// A relationship (meld triplet, variation group, ...) is missing members
    /// that scope should have contained. Warned, not aborted.
    #[error("incomplete relationship {kind}: {detail}")]
    RelationshipIncomplete { kind: String, detail: String },

    /// An output path already exists and the caller did not request resume-mode.
    #[error("write conflict at {path}: file exists and --resume-build was not set")]
    WriteConflict { path: String },

    /// A partition failed to upload to the object-store archive after retries.
    /// Non-fatal: the next run re-attempts the upload.
    #[error("object store upload failed for {partition}: {detail}")]
    ObjectStoreUpload { partition: String, detail: String },
}

pub type Result<T> = std::result::Result<T, CardatlasError>;
