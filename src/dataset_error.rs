use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Failures raised by a [`Registry`](crate::Registry) or a [`TableLoader`](crate::TableLoader).
///
/// `UnknownDataset` is detected by the registry itself before any loader runs.
/// The other two variants come from the loader and are passed through untouched.
#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("unknown dataset '{name}'")]
    UnknownDataset { name: String },

    #[error("source '{source_id}' is unavailable at {}: {cause}", .path.display())]
    SourceUnavailable {
        source_id: String,
        path: PathBuf,
        #[source]
        cause: io::Error,
    },

    #[error("failed to parse '{source_id}' at line {line}: {detail}")]
    ParseError {
        source_id: String,
        line: usize,
        detail: String,
    },
}

impl DatasetError {
    /// True for failures that happened while loading (and may succeed on retry).
    pub fn is_load_failure(&self) -> bool {
        !matches!(self, DatasetError::UnknownDataset { .. })
    }
}

/// Failures as seen through a namespace accessor.
///
/// An unknown name surfaces as a missing attribute of the namespace, the same
/// way a plain field lookup would fail. The registry error is kept as `source()`.
#[derive(Debug, Error)]
pub enum NamespaceError {
    #[error("namespace '{namespace}' has no attribute '{name}'")]
    NoSuchAttribute {
        namespace: String,
        name: String,
        #[source]
        source: DatasetError,
    },

    #[error("failed to load '{name}' in namespace '{namespace}': {source}")]
    Load {
        namespace: String,
        name: String,
        #[source]
        source: DatasetError,
    },
}

impl NamespaceError {
    pub(crate) fn from_registry(namespace: &str, name: &str, err: DatasetError) -> Self {
        match err {
            DatasetError::UnknownDataset { .. } => NamespaceError::NoSuchAttribute {
                namespace: namespace.to_string(),
                name: name.to_string(),
                source: err,
            },
            _ => NamespaceError::Load {
                namespace: namespace.to_string(),
                name: name.to_string(),
                source: err,
            },
        }
    }

    /// The attribute name that was looked up.
    pub fn name(&self) -> &str {
        match self {
            NamespaceError::NoSuchAttribute { name, .. } | NamespaceError::Load { name, .. } => {
                name.as_str()
            }
        }
    }

    /// The underlying registry or loader failure.
    pub fn dataset_error(&self) -> &DatasetError {
        match self {
            NamespaceError::NoSuchAttribute { source, .. }
            | NamespaceError::Load { source, .. } => source,
        }
    }
}

impl From<NamespaceError> for DatasetError {
    fn from(err: NamespaceError) -> Self {
        match err {
            NamespaceError::NoSuchAttribute { source, .. }
            | NamespaceError::Load { source, .. } => source,
        }
    }
}
