//! # Dataset Registry
//!
//! Lazily loaded, memoized access to a fixed set of file-backed datasets.
//! A dataset is read from disk the first time it is referenced and then kept
//! for the lifetime of its registry; later reads return the same `Arc`.
//!
//! ## Quick Start
//!
//! ```rust
//! use dataset_registry::datapkg;
//!
//! // Nothing is read until a dataset is referenced
//! let machines = datapkg::machines().unwrap();
//! assert_eq!(machines[0], vec!["id", "type", "location"]);
//!
//! // Unknown names fail like a missing attribute
//! let err = datapkg::attr("vehicles").unwrap_err();
//! assert_eq!(err.to_string(), "namespace 'datapkg' has no attribute 'vehicles'");
//! ```
//!
//! ## Features
//!
//! - **Load on demand**: no dataset is read until first referenced
//! - **At most once**: concurrent first readers block on a single load and share its result
//! - **Failures are not cached**: a failed load is retried on the next access
//! - **Declared once**: [`define_datasets!`] turns a `{name => "file"}` list into typed accessors
//! - **Tracing support**: optional per-registry callback for every lookup, plus `log` output
//!
//! ## Main Types
//!
//! - [`Registry`] - the name-to-table cache
//! - [`DatasetNamespace`] - attribute-style lookups over a registry
//! - [`Namespace`] - a namespace assembled at runtime
//! - [`TableLoader`] / [`CsvLoader`] - where tables come from
//! - [`datapkg`] - the bundled `machines` / `persons` namespace

#[macro_use]
mod macros;

mod csv_reader;
mod dataset_error;
mod loader;
mod registry;
mod registry_event;
mod registry_trait;

// Re-export the main public API
pub use dataset_error::{DatasetError, NamespaceError};
pub use loader::{CsvLoader, TableLoader};
pub use registry::{DatasetSpec, Registry, TraceCallback};
pub use registry_event::RegistryEvent;
pub use registry_trait::{DatasetNamespace, Namespace};

/// One record: an ordered sequence of text fields.
pub type Row = Vec<String>;

/// A loaded dataset: rows in file order.
pub type Table = Vec<Row>;

define_datasets! {
    /// The bundled datasets, read from this crate's `data/` directory.
    pub mod datapkg {
        data_dir: concat!(env!("CARGO_MANIFEST_DIR"), "/data"),
        datasets: {
            /// Machine inventory: `id`, `type`, `location`.
            machines => "machines.csv",
            /// People: `id`, `name`, `role`.
            persons => "persons.csv",
        }
    }
}
