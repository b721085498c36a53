//! The boundary between a registry and the storage holding dataset files.
//!
//! A [`Registry`](crate::Registry) only ever calls [`TableLoader::load_table`]
//! with the source identifier declared for a dataset. [`CsvLoader`] is the
//! file-backed implementation; any `Fn(&str) -> Result<Table, DatasetError>`
//! closure works as well, which keeps tests free of the filesystem.

use std::fs;
use std::path::{Path, PathBuf};

use crate::csv_reader;
use crate::{DatasetError, Table};

/// Produces the table stored behind a source identifier.
pub trait TableLoader: Send + Sync {
    /// Reads and parses the resource named by `source_id`.
    ///
    /// # Errors
    ///
    /// - [`DatasetError::SourceUnavailable`] when the resource is missing or unreadable
    /// - [`DatasetError::ParseError`] when it is present but malformed
    fn load_table(&self, source_id: &str) -> Result<Table, DatasetError>;
}

impl<F> TableLoader for F
where
    F: Fn(&str) -> Result<Table, DatasetError> + Send + Sync,
{
    fn load_table(&self, source_id: &str) -> Result<Table, DatasetError> {
        self(source_id)
    }
}

/// Loads CSV files from a data directory.
///
/// # Examples
///
/// ```rust
/// use dataset_registry::{CsvLoader, TableLoader};
///
/// let loader = CsvLoader::new(concat!(env!("CARGO_MANIFEST_DIR"), "/data"));
/// let machines = loader.load_table("machines.csv").unwrap();
/// assert_eq!(machines[0], vec!["id", "type", "location"]);
/// ```
#[derive(Debug, Clone)]
pub struct CsvLoader {
    data_dir: PathBuf,
    delimiter: char,
}

impl CsvLoader {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            delimiter: ',',
        }
    }

    /// Uses `delimiter` instead of `,` to split fields.
    ///
    /// The delimiter must not be `"` or a line terminator.
    pub fn with_delimiter(mut self, delimiter: char) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// The directory source identifiers are resolved against.
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn delimiter(&self) -> char {
        self.delimiter
    }

    /// The file a source identifier resolves to.
    pub fn path_of(&self, source_id: &str) -> PathBuf {
        self.data_dir.join(source_id)
    }
}

impl TableLoader for CsvLoader {
    fn load_table(&self, source_id: &str) -> Result<Table, DatasetError> {
        let path = self.path_of(source_id);
        let bytes = fs::read(&path).map_err(|cause| DatasetError::SourceUnavailable {
            source_id: source_id.to_string(),
            path: path.clone(),
            cause,
        })?;

        let text = String::from_utf8(bytes).map_err(|err| {
            let valid = &err.as_bytes()[..err.utf8_error().valid_up_to()];
            DatasetError::ParseError {
                source_id: source_id.to_string(),
                line: valid.iter().filter(|b| **b == b'\n').count() + 1,
                detail: "invalid UTF-8".to_string(),
            }
        })?;

        csv_reader::parse(&text, self.delimiter).map_err(|err| DatasetError::ParseError {
            source_id: source_id.to_string(),
            line: err.line,
            detail: err.detail,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    fn write(dir: &Path, name: &str, contents: &[u8]) {
        fs::write(dir.join(name), contents).unwrap();
    }

    #[test]
    fn test_load_csv_file() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "machines.csv", b"id,type\n1,drill\n");

        let table = CsvLoader::new(dir.path()).load_table("machines.csv").unwrap();
        assert_eq!(
            table,
            vec![
                vec!["id".to_string(), "type".to_string()],
                vec!["1".to_string(), "drill".to_string()],
            ]
        );
    }

    #[test]
    fn test_sources_resolve_under_data_dir() {
        let dir = tempfile::tempdir().unwrap();
        let loader = CsvLoader::new(dir.path());

        assert_eq!(loader.data_dir(), dir.path());
        assert_eq!(loader.path_of("persons.csv"), dir.path().join("persons.csv"));
        assert_eq!(loader.delimiter(), ',');
    }

    #[test]
    fn test_missing_file_is_source_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        let err = CsvLoader::new(dir.path())
            .load_table("missing.csv")
            .unwrap_err();

        match err {
            DatasetError::SourceUnavailable {
                source_id,
                path,
                cause,
            } => {
                assert_eq!(source_id, "missing.csv");
                assert_eq!(path, dir.path().join("missing.csv"));
                assert_eq!(cause.kind(), io::ErrorKind::NotFound);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_invalid_utf8_is_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "bad.csv", b"a,b\nc,\xff\n");

        let err = CsvLoader::new(dir.path()).load_table("bad.csv").unwrap_err();
        assert!(matches!(
            err,
            DatasetError::ParseError { line: 2, ref detail, .. } if detail == "invalid UTF-8"
        ));
    }

    #[test]
    fn test_unterminated_quote_is_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "bad.csv", b"a,\"b\n");

        let err = CsvLoader::new(dir.path()).load_table("bad.csv").unwrap_err();
        assert!(matches!(
            err,
            DatasetError::ParseError { line: 1, ref source_id, .. } if source_id == "bad.csv"
        ));
    }

    #[test]
    fn test_custom_delimiter() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "semi.csv", b"a;b\n");

        let loader = CsvLoader::new(dir.path()).with_delimiter(';');
        assert_eq!(loader.delimiter(), ';');
        assert_eq!(
            loader.load_table("semi.csv").unwrap(),
            vec![vec!["a".to_string(), "b".to_string()]]
        );
    }

    #[test]
    fn test_closure_loader() {
        let loader = |source_id: &str| -> Result<Table, DatasetError> {
            Ok(vec![vec![source_id.to_string()]])
        };
        assert_eq!(
            loader.load_table("x.csv").unwrap(),
            vec![vec!["x.csv".to_string()]]
        );
    }
}
