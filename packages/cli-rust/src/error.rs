use std::path::PathBuf;

/// Errors surfaced by the CLI commands. All of them exit with status 2.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid JSON in {}: {source}", path.display())]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("invalid MsgPack in {}: {source}", path.display())]
    MsgPack {
        path: PathBuf,
        source: rmp_serde::decode::Error,
    },
    #[error("unsupported input format for {} (expected .json, .msgpack or .mp)", path.display())]
    UnsupportedFormat { path: PathBuf },
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    #[error("failed to encode output: {0}")]
    Encode(#[from] serde_json::Error),
}
