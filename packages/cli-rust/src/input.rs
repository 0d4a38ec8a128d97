//! Loading schemas, rows and form data from disk.
//!
//! The encoding is picked from the file extension: `.json` for JSON,
//! `.msgpack` or `.mp` for MsgPack.

use std::fs;
use std::path::Path;

use serde::de::DeserializeOwned;

use crate::error::CliError;

/// On-disk encoding of an input file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputFormat {
    Json,
    MsgPack,
}

impl InputFormat {
    /// Detects the encoding from `path`'s extension (case-insensitive).
    ///
    /// # Errors
    ///
    /// Returns [`CliError::UnsupportedFormat`] for any other extension.
    pub fn from_path(path: &Path) -> Result<Self, CliError> {
        let ext = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase);
        match ext.as_deref() {
            Some("json") => Ok(Self::Json),
            Some("msgpack" | "mp") => Ok(Self::MsgPack),
            _ => Err(CliError::UnsupportedFormat {
                path: path.to_path_buf(),
            }),
        }
    }
}

/// Reads and decodes `path` into `T`.
///
/// # Errors
///
/// Fails when the extension is unsupported, the file cannot be read, or its
/// contents do not decode into `T`.
pub fn load_document<T: DeserializeOwned>(path: &Path) -> Result<T, CliError> {
    let format = InputFormat::from_path(path)?;
    let bytes = fs::read(path).map_err(|source| CliError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    tracing::debug!(path = %path.display(), bytes = bytes.len(), ?format, "loaded input file");
    match format {
        InputFormat::Json => serde_json::from_slice(&bytes).map_err(|source| CliError::Json {
            path: path.to_path_buf(),
            source,
        }),
        InputFormat::MsgPack => rmp_serde::from_slice(&bytes).map_err(|source| CliError::MsgPack {
            path: path.to_path_buf(),
            source,
        }),
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use liquid_logic_core::{Row, Value};

    use super::*;

    fn write_file(dir: &tempfile::TempDir, name: &str, bytes: &[u8]) -> std::path::PathBuf {
        let path = dir.path().join(name);
        let mut file = fs::File::create(&path).expect("create");
        file.write_all(bytes).expect("write");
        path
    }

    #[test]
    fn detects_format_from_extension() {
        assert_eq!(
            InputFormat::from_path(Path::new("rows.json")).expect("json"),
            InputFormat::Json
        );
        assert_eq!(
            InputFormat::from_path(Path::new("rows.MSGPACK")).expect("msgpack"),
            InputFormat::MsgPack
        );
        assert_eq!(
            InputFormat::from_path(Path::new("rows.mp")).expect("mp"),
            InputFormat::MsgPack
        );
        assert!(matches!(
            InputFormat::from_path(Path::new("rows.csv")),
            Err(CliError::UnsupportedFormat { .. })
        ));
        assert!(InputFormat::from_path(Path::new("rows")).is_err());
    }

    #[test]
    fn loads_json_rows() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = write_file(&dir, "rows.json", br#"[{"name":"Amy","age":31}]"#);
        let rows: Vec<Row> = load_document(&path).expect("load");
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["name"], Value::from("Amy"));
        assert_eq!(rows[0]["age"], Value::Int(31));
    }

    #[test]
    fn loads_msgpack_rows() {
        let dir = tempfile::tempdir().expect("tempdir");
        let rows: Vec<Row> = vec![[("name".to_string(), Value::from("Bo"))].into()];
        let bytes = rmp_serde::to_vec_named(&rows).expect("encode");
        let path = write_file(&dir, "rows.msgpack", &bytes);
        let loaded: Vec<Row> = load_document(&path).expect("load");
        assert_eq!(loaded, rows);
    }

    #[test]
    fn reports_read_and_decode_errors() {
        let dir = tempfile::tempdir().expect("tempdir");
        let missing = dir.path().join("missing.json");
        assert!(matches!(
            load_document::<Vec<Row>>(&missing),
            Err(CliError::Io { .. })
        ));

        let broken = write_file(&dir, "broken.json", b"[{");
        let err = load_document::<Vec<Row>>(&broken).expect_err("broken json");
        assert!(matches!(err, CliError::Json { .. }));
        assert!(err.to_string().contains("broken.json"));
    }
}
